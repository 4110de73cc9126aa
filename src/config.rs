//! Environment configuration.

use std::env;

pub const AUTO_RESUME_ENV: &str = "CHAT_RESUME_AUTO";
pub const DEBUG_ENV: &str = "CHAT_RESUME_DEBUG";
pub const LOG_PATH_ENV: &str = "CHAT_RESUME_LOG";
pub const LOG_FILTER_ENV: &str = "CHAT_RESUME_LOG_FILTER";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    /// Whether a mounted session may reattach to an interrupted stream.
    pub auto_resume: bool,
    pub debug: bool,
    pub log_path: Option<String>,
    pub log_filter: Option<String>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            auto_resume: !env_flag_off(AUTO_RESUME_ENV),
            debug: env_flag(DEBUG_ENV),
            log_path: env_string_opt(LOG_PATH_ENV),
            log_filter: env_string_opt(LOG_FILTER_ENV),
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            auto_resume: true,
            debug: false,
            log_path: None,
            log_filter: None,
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_flag_off(key: &str) -> bool {
    env::var(key).map(|value| value == "0").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{EnvConfig, AUTO_RESUME_ENV, DEBUG_ENV, LOG_FILTER_ENV, LOG_PATH_ENV};
    use std::env;
    use std::sync::{Mutex, OnceLock};

    struct EnvGuard {
        key: &'static str,
        previous: Option<String>,
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(value) = &self.previous {
                env::set_var(self.key, value);
            } else {
                env::remove_var(self.key);
            }
        }
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
            .lock()
            .expect("env lock poisoned")
    }

    fn set_env_guard(key: &'static str, value: Option<&str>) -> EnvGuard {
        let previous = env::var(key).ok();
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
        EnvGuard { key, previous }
    }

    #[test]
    fn env_defaults_enable_auto_resume_only() {
        let _lock = env_lock();
        let _g1 = set_env_guard(AUTO_RESUME_ENV, None);
        let _g2 = set_env_guard(DEBUG_ENV, None);
        let _g3 = set_env_guard(LOG_PATH_ENV, None);
        let _g4 = set_env_guard(LOG_FILTER_ENV, None);

        let config = EnvConfig::from_env();
        assert_eq!(config, EnvConfig::default());
        assert!(config.auto_resume);
        assert!(!config.debug);
    }

    #[test]
    fn auto_resume_is_disabled_only_by_zero() {
        let _lock = env_lock();
        let _g1 = set_env_guard(AUTO_RESUME_ENV, Some("0"));
        assert!(!EnvConfig::from_env().auto_resume);

        let _g2 = set_env_guard(AUTO_RESUME_ENV, Some("no"));
        assert!(EnvConfig::from_env().auto_resume);
    }

    #[test]
    fn env_values_are_read() {
        let _lock = env_lock();
        let _g1 = set_env_guard(DEBUG_ENV, Some("1"));
        let _g2 = set_env_guard(LOG_PATH_ENV, Some("/tmp/chat-resume.log"));
        let _g3 = set_env_guard(LOG_FILTER_ENV, Some("chat_resume=trace"));

        let config = EnvConfig::from_env();
        assert!(config.debug);
        assert_eq!(config.log_path.as_deref(), Some("/tmp/chat-resume.log"));
        assert_eq!(config.log_filter.as_deref(), Some("chat_resume=trace"));
    }

    #[test]
    fn blank_strings_are_ignored() {
        let _lock = env_lock();
        let _g1 = set_env_guard(LOG_PATH_ENV, Some("  "));
        let _g2 = set_env_guard(LOG_FILTER_ENV, Some(""));

        let config = EnvConfig::from_env();
        assert!(config.log_path.is_none());
        assert!(config.log_filter.is_none());
    }
}

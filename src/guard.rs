use std::sync::atomic::{AtomicBool, Ordering};

/// Single-use flag owned by one mounted chat session.
///
/// Created consumed-free at mount and dropped with the session; never persisted.
#[derive(Debug, Default)]
pub struct ResumeGuard {
    consumed: AtomicBool,
}

impl ResumeGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the guard consumed and returns true only for the first caller.
    pub fn try_consume(&self) -> bool {
        !self.consumed.swap(true, Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_consumed(&self) -> bool {
        self.consumed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::ResumeGuard;

    #[test]
    fn only_first_consume_wins() {
        let guard = ResumeGuard::new();
        assert!(!guard.is_consumed());

        assert!(guard.try_consume());
        assert!(!guard.try_consume());
        assert!(!guard.try_consume());
        assert!(guard.is_consumed());
    }

    #[test]
    fn guards_are_independent_per_session() {
        let first = ResumeGuard::new();
        let second = ResumeGuard::new();

        assert!(first.try_consume());
        assert!(second.try_consume());
    }
}

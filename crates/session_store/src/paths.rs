use std::path::{Path, PathBuf};

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub const SESSION_DIR: [&str; 2] = [".chat", "sessions"];

#[must_use]
pub fn session_root(cwd: &Path) -> PathBuf {
    cwd.join(SESSION_DIR[0]).join(SESSION_DIR[1])
}

#[must_use]
pub fn sanitize_timestamp_for_filename(timestamp: &str) -> String {
    timestamp
        .chars()
        .map(|c| match c {
            ':' | '/' | '\\' | ' ' => '-',
            _ => c,
        })
        .collect()
}

#[must_use]
pub fn session_file_name(created_at: &str, chat_id: &str) -> String {
    format!(
        "{}_{}.jsonl",
        sanitize_timestamp_for_filename(created_at),
        chat_id
    )
}

/// Returns true for file names produced by [`session_file_name`].
#[must_use]
pub(crate) fn is_session_file_name(name: &str) -> bool {
    name.ends_with(".jsonl") && name.contains('_')
}

/// Recovers the creation time encoded in a [`session_file_name`] prefix.
///
/// The fractional seconds have variable width, so names only order correctly once parsed.
#[must_use]
pub(crate) fn session_file_timestamp(name: &str) -> Option<OffsetDateTime> {
    let (prefix, _) = name.split_once('_')?;
    let (date, clock) = prefix.split_once('T')?;

    let mut clock: Vec<char> = clock.chars().collect();
    if clock.len() < 9 || clock[2] != '-' || clock[5] != '-' {
        return None;
    }
    clock[2] = ':';
    clock[5] = ':';
    let offset_colon = clock.len() - 3;
    if clock.last() != Some(&'Z') && clock[offset_colon] == '-' {
        clock[offset_colon] = ':';
    }

    let clock: String = clock.into_iter().collect();
    OffsetDateTime::parse(&format!("{date}T{clock}"), &Rfc3339).ok()
}

#[cfg(test)]
mod tests {
    use super::{is_session_file_name, session_file_name, session_file_timestamp};

    #[test]
    fn file_name_replaces_separators_and_keeps_chat_id() {
        let name = session_file_name("2026-10-18T09:30:00Z", "chat-1");
        assert_eq!(name, "2026-10-18T09-30-00Z_chat-1.jsonl");
        assert!(is_session_file_name(&name));
    }

    #[test]
    fn foreign_files_are_not_session_files() {
        assert!(!is_session_file_name("notes.txt"));
        assert!(!is_session_file_name("replay.jsonl"));
    }

    #[test]
    fn file_name_timestamp_orders_sub_second_prefixes_by_time() {
        let shorter = session_file_timestamp("2026-10-18T10-00-00.5Z_a.jsonl")
            .expect("sub-second name should parse");
        let longer = session_file_timestamp("2026-10-18T10-00-00.55Z_b.jsonl")
            .expect("sub-second name should parse");
        assert!(longer > shorter);

        let offset = session_file_timestamp("2026-10-18T12-00-00+02-00_c.jsonl")
            .expect("offset name should parse");
        let utc = session_file_timestamp("2026-10-18T10-00-00Z_d.jsonl")
            .expect("utc name should parse");
        assert_eq!(offset, utc);
    }

    #[test]
    fn file_name_timestamp_rejects_foreign_prefixes() {
        assert!(session_file_timestamp("notes_today.jsonl").is_none());
        assert!(session_file_timestamp("2026-10-18Tnoon_x.jsonl").is_none());
    }
}

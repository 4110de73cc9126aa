use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chat_stream::ChatMessage;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::SessionStoreError;
use crate::paths::{is_session_file_name, session_file_name, session_file_timestamp, session_root};
use crate::schema::{SessionEntry, SessionHeader, SessionLine, SESSION_VERSION};

pub struct SessionStore {
    pub(crate) path: PathBuf,
    pub(crate) file: File,
    pub(crate) header: SessionHeader,
    pub(crate) messages: Vec<ChatMessage>,
    pub(crate) message_ids: HashSet<String>,
}

impl SessionStore {
    /// Creates a fresh session file under `<cwd>/.chat/sessions` with a new chat id.
    pub fn create_new(cwd: &Path) -> Result<Self, SessionStoreError> {
        let cwd = std::path::absolute(cwd)
            .map_err(|source| SessionStoreError::io("resolving cwd", cwd, source))?;
        if !cwd.is_absolute() {
            return Err(SessionStoreError::NonAbsoluteCreateCwd { path: cwd });
        }

        let created_at = now_rfc3339()?;
        let chat_id = uuid::Uuid::new_v4().to_string();
        let root = session_root(&cwd);
        fs::create_dir_all(&root)
            .map_err(|source| SessionStoreError::io("creating session root", &root, source))?;

        let path = root.join(session_file_name(&created_at, &chat_id));
        let file = OpenOptions::new()
            .append(true)
            .create_new(true)
            .open(&path)
            .map_err(|source| SessionStoreError::io("creating session file", &path, source))?;

        let header = SessionHeader::v1(chat_id, created_at, cwd.display().to_string());
        let mut store = Self {
            path,
            file,
            header: header.clone(),
            messages: Vec::new(),
            message_ids: HashSet::new(),
        };
        store.write_line(&SessionLine::Session(header))?;

        tracing::debug!(
            path = %store.path.display(),
            chat_id = %store.header.chat_id,
            "created session file"
        );
        Ok(store)
    }

    pub fn open(path: &Path) -> Result<Self, SessionStoreError> {
        let path = path.to_path_buf();
        let read_file = File::open(&path)
            .map_err(|source| SessionStoreError::io("opening session file", &path, source))?;
        let reader = BufReader::new(read_file);

        let mut header: Option<SessionHeader> = None;
        let mut messages = Vec::new();
        let mut message_ids = HashSet::new();

        for (line_index, line_result) in reader.lines().enumerate() {
            let line_number = line_index + 1;
            let line = line_result
                .map_err(|source| SessionStoreError::io_line(&path, line_number, source))?;
            let parsed = parse_json_line(&path, line_number, &line)?;

            if line_number == 1 {
                match parsed {
                    SessionLine::Session(parsed_header) => {
                        validate_header_line(&path, line_number, &parsed_header)?;
                        header = Some(parsed_header);
                    }
                    SessionLine::Entry(_) => {
                        return Err(SessionStoreError::InvalidHeaderRecord {
                            path,
                            line: line_number,
                        });
                    }
                }

                continue;
            }

            match parsed {
                SessionLine::Session(_) => {
                    return Err(SessionStoreError::InvalidEntryRecord {
                        path,
                        line: line_number,
                    });
                }
                SessionLine::Entry(entry) => {
                    validate_rfc3339(&path, line_number, "ts", &entry.ts)?;
                    if !message_ids.insert(entry.message.id.clone()) {
                        return Err(SessionStoreError::DuplicateMessageId {
                            path,
                            line: line_number,
                            id: entry.message.id,
                        });
                    }

                    messages.push(entry.message);
                }
            }
        }

        let header =
            header.ok_or_else(|| SessionStoreError::MissingHeader { path: path.clone() })?;

        let file = OpenOptions::new()
            .append(true)
            .open(&path)
            .map_err(|source| {
                SessionStoreError::io("opening session file for append", &path, source)
            })?;

        tracing::debug!(
            path = %path.display(),
            chat_id = %header.chat_id,
            messages = messages.len(),
            "opened session file"
        );
        Ok(Self {
            path,
            file,
            header,
            messages,
            message_ids,
        })
    }

    /// Opens the most recently created session under `cwd`.
    pub fn open_latest(cwd: &Path) -> Result<Self, SessionStoreError> {
        let latest = Self::latest_session_path(cwd)?;
        Self::open(&latest)
    }

    /// Resolves the newest session file by the creation time encoded in its file name.
    ///
    /// Names whose prefix is not a timestamp are skipped. Equal times fall back to name order.
    pub fn latest_session_path(cwd: &Path) -> Result<PathBuf, SessionStoreError> {
        let root = session_root(cwd);
        let read_dir = match fs::read_dir(&root) {
            Ok(read_dir) => read_dir,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Err(SessionStoreError::NoSessionsFound { root });
            }
            Err(source) => {
                return Err(SessionStoreError::io("listing session root", &root, source));
            }
        };

        let mut latest: Option<((OffsetDateTime, String), PathBuf)> = None;
        for dir_entry in read_dir {
            let dir_entry = dir_entry
                .map_err(|source| SessionStoreError::io("listing session root", &root, source))?;
            let path = dir_entry.path();
            if !path.is_file() {
                continue;
            }

            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if !is_session_file_name(name) {
                continue;
            }
            let Some(created_at) = session_file_timestamp(name) else {
                continue;
            };

            let key = (created_at, name.to_string());
            let is_newer = latest
                .as_ref()
                .map_or(true, |(latest_key, _)| key > *latest_key);
            if is_newer {
                latest = Some((key, path.clone()));
            }
        }

        latest
            .map(|(_, path)| path)
            .ok_or(SessionStoreError::NoSessionsFound { root })
    }

    /// Appends one message to the end of the session.
    pub fn append(&mut self, message: ChatMessage) -> Result<(), SessionStoreError> {
        if self.message_ids.contains(&message.id) {
            return Err(SessionStoreError::DuplicateMessageId {
                path: self.path.clone(),
                line: self.messages.len() + 2,
                id: message.id,
            });
        }

        let entry = SessionEntry::new(now_rfc3339()?, message);
        self.write_line(&SessionLine::Entry(entry.clone()))?;

        self.message_ids.insert(entry.message.id.clone());
        self.messages.push(entry.message);
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn header(&self) -> &SessionHeader {
        &self.header
    }

    #[must_use]
    pub fn chat_id(&self) -> &str {
        &self.header.chat_id
    }

    /// Persisted messages in conversation order.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn write_line(&mut self, line: &SessionLine) -> Result<(), SessionStoreError> {
        self.write_lines(std::slice::from_ref(line))
    }

    /// Encodes every line before writing, then writes them with one call.
    pub(crate) fn write_lines(&mut self, lines: &[SessionLine]) -> Result<(), SessionStoreError> {
        let mut encoded = String::new();
        for line in lines {
            let json = serde_json::to_string(line)
                .map_err(|source| SessionStoreError::json_serialize(&self.path, source))?;
            encoded.push_str(&json);
            encoded.push('\n');
        }

        self.file
            .write_all(encoded.as_bytes())
            .and_then(|()| self.file.flush())
            .map_err(|source| SessionStoreError::io("appending session line", &self.path, source))
    }
}

pub(crate) fn parse_json_line(
    path: &Path,
    line_number: usize,
    line: &str,
) -> Result<SessionLine, SessionStoreError> {
    serde_json::from_str::<SessionLine>(line)
        .map_err(|source| SessionStoreError::json_line(path, line_number, source))
}

pub(crate) fn validate_header_line(
    path: &Path,
    line_number: usize,
    header: &SessionHeader,
) -> Result<(), SessionStoreError> {
    if header.version != SESSION_VERSION {
        return Err(SessionStoreError::UnsupportedVersion {
            path: path.to_path_buf(),
            line: line_number,
            found: header.version,
        });
    }

    validate_rfc3339(path, line_number, "created_at", &header.created_at)?;

    if !Path::new(&header.cwd).is_absolute() {
        return Err(SessionStoreError::NonAbsoluteCwd {
            path: path.to_path_buf(),
            line: line_number,
            cwd: header.cwd.clone(),
        });
    }

    Ok(())
}

pub(crate) fn validate_rfc3339(
    path: &Path,
    line_number: usize,
    field: &'static str,
    value: &str,
) -> Result<(), SessionStoreError> {
    if OffsetDateTime::parse(value, &Rfc3339).is_err() {
        return Err(SessionStoreError::InvalidTimestamp {
            path: path.to_path_buf(),
            line: line_number,
            field,
            value: value.to_string(),
        });
    }

    Ok(())
}

pub(crate) fn now_rfc3339() -> Result<String, SessionStoreError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(SessionStoreError::ClockFormat)
}

//! JSON snapshot file format
//!
//! A snapshot is a single JSON object keyed by the decimal user id, each value
//! holding the `id`, `name` and `email` of one user.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::domain::user::{json_type_name, user_id_from_value, User, UserValidationError};
use crate::domain::DomainError;

/// Reason a single snapshot entry was skipped during import
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EntryError {
    #[error("User data is not an object, got {0}")]
    NotAnObject(&'static str),

    #[error("Key is not an integer")]
    InvalidKey,

    #[error("Missing '{0}' field")]
    MissingField(&'static str),

    #[error("ID mismatch: key={key}, data id={found}")]
    IdMismatch { key: String, found: String },

    #[error(transparent)]
    Invalid(#[from] UserValidationError),
}

/// A snapshot entry that could not be turned into a user
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedEntry {
    pub key: String,
    pub reason: EntryError,
}

/// Outcome of a bulk import
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Users merged into the store
    pub loaded: usize,
    /// Entries rejected during preparation, in file order
    pub skipped: Vec<SkippedEntry>,
}

impl ImportReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Outcome of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The snapshot was written with this many users
    Written { count: usize },
    /// The store was empty and nothing was written
    Empty,
}

/// Read a snapshot file and return its root object
pub(crate) fn read_snapshot(path: &Path) -> Result<Map<String, Value>, DomainError> {
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => DomainError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => DomainError::IoFailure {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let root: Value =
        serde_json::from_slice(&bytes).map_err(|source| DomainError::MalformedJson {
            path: path.to_path_buf(),
            source,
        })?;

    match root {
        Value::Object(entries) => Ok(entries),
        other => Err(DomainError::InvalidFormat {
            path: path.to_path_buf(),
            found: json_type_name(&other),
        }),
    }
}

/// Turn every entry of a snapshot into a user, collecting the failures
pub(crate) fn materialize(entries: &Map<String, Value>) -> (Vec<User>, Vec<SkippedEntry>) {
    let mut users = Vec::with_capacity(entries.len());
    let mut skipped = Vec::new();

    for (key, value) in entries {
        match materialize_entry(key, value) {
            Ok(user) => users.push(user),
            Err(reason) => skipped.push(SkippedEntry {
                key: key.clone(),
                reason,
            }),
        }
    }

    (users, skipped)
}

fn materialize_entry(key: &str, value: &Value) -> Result<User, EntryError> {
    let data = value
        .as_object()
        .ok_or(EntryError::NotAnObject(json_type_name(value)))?;

    let id = data.get("id").ok_or(EntryError::MissingField("id"))?;
    let user_id = user_id_from_value(id)?;

    let key_id: i64 = key.trim().parse().map_err(|_| EntryError::InvalidKey)?;
    if user_id != key_id {
        return Err(EntryError::IdMismatch {
            key: key.to_string(),
            found: id.to_string(),
        });
    }

    let name = data.get("name").ok_or(EntryError::MissingField("name"))?;
    let email = data.get("email").ok_or(EntryError::MissingField("email"))?;

    Ok(User::from_values(id, name, email)?)
}

/// Serialize users into the snapshot layout, four-space indented
pub(crate) fn render_snapshot(users: &[User]) -> Result<Vec<u8>, serde_json::Error> {
    let mut root = Map::with_capacity(users.len());
    for user in users {
        root.insert(user.id().to_string(), serde_json::to_value(user)?);
    }

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    Value::Object(root).serialize(&mut serializer)?;

    Ok(buffer)
}

/// Write `contents` to `path` through a synced temporary file and a rename
///
/// Each call gets its own temporary file next to the target, so concurrent
/// writers never share one. The last rename wins.
pub(crate) fn write_snapshot(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp_file = NamedTempFile::new_in(dir)?;
    tmp_file.write_all(contents)?;
    tmp_file.as_file().sync_all()?;
    tmp_file.persist(path).map_err(|e| e.error)?;

    Ok(())
}

//! Session-token storage passed explicitly into authenticated flows.
//!
//! # Design
//! The store is a plain string key-value map owned by the host. Flows take it
//! as `&mut dyn SessionStore` (or `&dyn` for reads), so there is no ambient
//! global state. `FileSessionStore` keeps the map as a JSON object on disk so
//! a token survives between CLI invocations.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::ApiError;

/// Fixed key the session token is stored under.
pub const SESSION_TOKEN_KEY: &str = "session_token";

pub trait SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, ApiError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), ApiError>;
    fn remove(&mut self, key: &str) -> Result<(), ApiError>;

    fn token(&self) -> Result<Option<String>, ApiError> {
        self.get(SESSION_TOKEN_KEY)
    }

    fn store_token(&mut self, token: &str) -> Result<(), ApiError> {
        self.set(SESSION_TOKEN_KEY, token)
    }

    fn clear_token(&mut self) -> Result<(), ApiError> {
        self.remove(SESSION_TOKEN_KEY)
    }
}

/// In-process store; contents are lost on drop.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ApiError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), ApiError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by a JSON object file. Every write replaces the whole file
/// through a rename.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>, ApiError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                ApiError::Session(format!("{} is not a session file: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(ApiError::Session(format!("read {}: {e}", self.path.display()))),
        }
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| ApiError::Session(format!("create {}: {e}", parent.display())))?;
        }
        let raw = serde_json::to_string_pretty(entries)
            .map_err(|e| ApiError::Session(e.to_string()))?;

        // Write beside the target and rename over it, so a reader never sees
        // a half-written file.
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let write_err =
            |e: std::io::Error| ApiError::Session(format!("write {}: {e}", self.path.display()));
        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(raw.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        debug!(path = %self.path.display(), "session file written");
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ApiError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), ApiError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

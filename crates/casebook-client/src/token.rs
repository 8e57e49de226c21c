//! Durable session-token storage.
//!
//! A single file with a fixed name under the data directory, standing in
//! for the browser's local storage slot. The token is opaque: saved on
//! login, removed on logout, never inspected or refreshed. An expired
//! token only surfaces as a failed API call downstream.

use std::io;
use std::path::{Path, PathBuf};

/// Fixed file name for the stored token.
const TOKEN_FILE: &str = "token";

/// File-backed token store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(TOKEN_FILE),
        }
    }

    /// Default data directory: `.casebook` under the user's home, falling
    /// back to the current directory when no home is known.
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".casebook")
    }

    /// Persist the token, creating the data directory if needed.
    pub fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        tracing::debug!("Saved session token to {:?}", self.path);
        Ok(())
    }

    /// The stored token, or `None` when no file exists or it is empty.
    pub fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(token) => {
                let token = token.trim().to_string();
                if token.is_empty() {
                    None
                } else {
                    Some(token)
                }
            }
            Err(_) => None,
        }
    }

    /// Remove the stored token. Absence is not an error.
    pub fn clear(&self) {
        if self.path.exists() {
            let _ = std::fs::remove_file(&self.path);
            tracing::debug!("Deleted session token file");
        }
    }
}

//! Bearer token kept for the session and mirrored to disk.
//!
//! The on-disk copy lives in a file named `auth_token` inside the state
//! directory so a later process starts signed in. Writes go through a temp
//! file in the same directory and are renamed into place.

use anyhow::{Context, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const TOKEN_FILE: &str = "auth_token";

#[derive(Debug, Default)]
pub struct TokenStore {
    path: Option<PathBuf>,
    token: Option<String>,
}

impl TokenStore {
    /// Store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the durable store under `state_dir`, loading any saved token.
    pub fn open(state_dir: &Path) -> Result<Self> {
        let path = state_dir.join(TOKEN_FILE);
        let token = match fs::read_to_string(&path) {
            Ok(raw) => Some(raw.trim().to_string()).filter(|t| !t.is_empty()),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", path.display()));
            }
        };
        Ok(Self {
            path: Some(path),
            token,
        })
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Replace the token, persisting it when the store is durable.
    pub fn set(&mut self, token: &str) -> Result<()> {
        self.token = Some(token.to_string());
        let Some(path) = &self.path else {
            return Ok(());
        };
        let dir = path
            .parent()
            .with_context(|| format!("{} has no parent directory", path.display()))?;
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("creating temp file in {}", dir.display()))?;
        tmp.write_all(token.as_bytes())
            .context("writing token to temp file")?;
        tmp.persist(path)
            .map_err(|err| err.error)
            .with_context(|| format!("persisting {}", path.display()))?;
        Ok(())
    }

    /// Forget the token in memory and remove the durable copy.
    ///
    /// The in-memory token is dropped even when removing the file fails.
    pub fn clear(&mut self) -> Result<()> {
        self.token = None;
        let Some(path) = &self.path else {
            return Ok(());
        };
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("removing {}", path.display())),
        }
    }
}

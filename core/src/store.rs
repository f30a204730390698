//! Where a `RootState` lives between runs.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::state::RootState;

/// Load/save contract the service persists through. `load_state` returns
/// `None` on first run, when nothing has been stored yet.
pub trait StateAdapter {
    fn load_state(&mut self) -> Result<Option<RootState>>;
    fn save_state(&mut self, state: &RootState) -> Result<()>;
}

impl<S: StateAdapter + ?Sized> StateAdapter for Box<S> {
    fn load_state(&mut self) -> Result<Option<RootState>> {
        (**self).load_state()
    }

    fn save_state(&mut self, state: &RootState) -> Result<()> {
        (**self).save_state(state)
    }
}

/// Keeps the last saved state in memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Option<RootState>,
    saves: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_state(state: RootState) -> Self {
        Self {
            state: Some(state),
            saves: 0,
        }
    }

    #[must_use]
    pub fn saved(&self) -> Option<&RootState> {
        self.state.as_ref()
    }

    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl StateAdapter for MemoryStore {
    fn load_state(&mut self) -> Result<Option<RootState>> {
        Ok(self.state.clone())
    }

    fn save_state(&mut self, state: &RootState) -> Result<()> {
        self.state = Some(state.clone());
        self.saves += 1;
        Ok(())
    }
}

/// One pretty-printed JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateAdapter for JsonFileStore {
    fn load_state(&mut self) -> Result<Option<RootState>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read {}", self.path.display()));
            }
        };
        let state = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        debug!(path = %self.path.display(), "state loaded from file");
        Ok(Some(state))
    }

    fn save_state(&mut self, state: &RootState) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let payload = serde_json::to_vec_pretty(state).context("Failed to serialize state")?;

        // Write beside the target and rename over it so a crash never
        // leaves half a document behind.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, payload).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        debug!(path = %self.path.display(), "state saved to file");
        Ok(())
    }
}

//! Client state is kept as JSON files in the client home directory (`~/.eats` by default), one file per store.
use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::*;
use serde::{de::DeserializeOwned, Serialize};

use crate::config::{ensure_dir, set_permissions};

#[derive(Debug, Clone)]
pub struct StateDir {
    root: PathBuf,
}

impl StateDir {
    pub fn new<P: Into<PathBuf>>(root: P) -> Result<Self> {
        let root = root.into();
        ensure_dir(&root).with_context(|| format!("Could not create {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    fn file(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }

    /// Reads a saved state. A missing file is not an error and yields the default state. A corrupt file is
    /// logged and also yields the default, so one bad file never locks the user out of the client.
    pub fn load<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        let path = self.file(name);
        if !path.exists() {
            trace!("No saved {name} state");
            return Ok(T::default());
        }
        let data = fs::read_to_string(&path).with_context(|| format!("Could not read {}", path.display()))?;
        match serde_json::from_str(&data) {
            Ok(state) => Ok(state),
            Err(e) => {
                warn!("Ignoring saved {name} state in {}. {e}", path.display());
                Ok(T::default())
            },
        }
    }

    pub fn save<T: Serialize>(&self, name: &str, state: &T) -> Result<()> {
        let path = self.file(name);
        let data = serde_json::to_string_pretty(state)?;
        fs::write(&path, data).with_context(|| format!("Could not write {}", path.display()))?;
        set_permissions(&path, 0o600)?;
        trace!("Saved {name} state");
        Ok(())
    }
}

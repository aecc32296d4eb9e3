//! The client configuration lives in `~/.eats/config.toml`. It is created with default values the first time the
//! client runs.
use std::{
    fs,
    io,
    io::{Error, ErrorKind},
    path::{Path, PathBuf},
};

use dirs::home_dir;
use log::info;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_SERVER: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base url of the EatsOnline server
    pub server: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { server: DEFAULT_SERVER.to_string() }
    }
}

/// `~/.eats`, created (owner-only) if it does not exist yet.
pub fn default_home() -> io::Result<PathBuf> {
    let home = home_dir().ok_or_else(|| Error::new(ErrorKind::NotFound, "Home directory not found"))?;
    let dir = home.join(".eats");
    ensure_dir(&dir)?;
    Ok(dir)
}

pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        set_permissions(dir, 0o700)?;
    }
    Ok(())
}

pub fn set_permissions(path: &Path, perms: u32) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut permissions = fs::metadata(path)?.permissions();
        permissions.set_mode(perms);
        fs::set_permissions(path, permissions)?;
    }
    #[cfg(not(unix))]
    let _ = (path, perms);
    Ok(())
}

pub fn read_config(dir: &Path) -> io::Result<ClientConfig> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        info!("Creating default config file at {}", path.display());
        let config = ClientConfig::default();
        write_config(dir, &config)?;
        return Ok(config);
    }
    let config_str = fs::read_to_string(path)?;
    toml::from_str(&config_str).map_err(|e| Error::new(ErrorKind::InvalidData, e.to_string()))
}

pub fn write_config(dir: &Path, config: &ClientConfig) -> io::Result<()> {
    let path = dir.join(CONFIG_FILE);
    let config_str = toml::to_string(config).map_err(|e| Error::new(ErrorKind::InvalidData, e.to_string()))?;
    fs::write(&path, config_str)?;
    set_permissions(&path, 0o600)
}

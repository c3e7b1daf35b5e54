//! Common paths for PrimePlay data storage
//!
//! All PrimePlay data is stored under ~/.config/primeplay/ on all platforms:
//! - config.toml - User configuration
//! - session.enc - Encrypted login session
//! - primeplay.sqlite - Key-value database (favorites)

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the PrimePlay data directory (~/.config/primeplay/)
pub fn primeplay_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let dir = home.join(".config").join("primeplay");
    fs::create_dir_all(&dir).context("Failed to create primeplay directory")?;
    Ok(dir)
}

/// Get the config file path (~/.config/primeplay/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(primeplay_dir()?.join("config.toml"))
}

/// Get the database file path (~/.config/primeplay/primeplay.sqlite)
pub fn database_path() -> Result<PathBuf> {
    Ok(primeplay_dir()?.join("primeplay.sqlite"))
}

/// Get the session file path (~/.config/primeplay/session.enc)
pub fn session_path() -> Result<PathBuf> {
    Ok(primeplay_dir()?.join("session.enc"))
}

//! Session vault (encrypted file-based storage of the login session)
//!
//! The signed-in [`AuthSession`] is stored encrypted with AES-256-GCM in
//! ~/.config/primeplay/session.enc. The key is derived from machine-specific
//! identifiers, so the file is useless when copied to another machine.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use anyhow::{Context, Result};
use rand::Rng;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::AuthSession;
use crate::paths;

const NONCE_SIZE: usize = 12;
const KEY_SALT: &[u8] = b"primeplay-session-v1";

/// Get machine ID for key derivation
fn machine_id() -> String {
    #[cfg(target_os = "linux")]
    {
        for candidate in ["/etc/machine-id", "/var/lib/dbus/machine-id"] {
            if let Ok(id) = fs::read_to_string(candidate) {
                return id.trim().to_string();
            }
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(output) = std::process::Command::new("ioreg")
            .args(["-rd1", "-c", "IOPlatformExpertDevice"])
            .output()
        {
            let stdout = String::from_utf8_lossy(&output.stdout);
            if let Some(uuid) = stdout
                .lines()
                .find(|line| line.contains("IOPlatformUUID"))
                .and_then(|line| line.split('"').nth(3))
            {
                return uuid.to_string();
            }
        }
    }

    dirs::home_dir().map_or_else(
        || "primeplay-fallback-key".to_string(),
        |p| p.to_string_lossy().to_string(),
    )
}

/// Derive the encryption key from machine-specific data
fn derive_key() -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(machine_id().as_bytes());
    if let Some(home) = dirs::home_dir() {
        hasher.update(home.to_string_lossy().as_bytes());
    }
    hasher.update(KEY_SALT);
    hasher.finalize().into()
}

fn cipher() -> Result<Aes256Gcm> {
    Aes256Gcm::new_from_slice(&derive_key()).map_err(|_| anyhow::anyhow!("Invalid key length"))
}

/// Encrypted on-disk storage for one [`AuthSession`]
#[derive(Debug, Clone)]
pub struct SessionVault {
    path: PathBuf,
}

impl SessionVault {
    /// Vault at the default location
    pub fn open() -> Result<Self> {
        Ok(Self::at(paths::session_path()?))
    }

    /// Vault at a specific path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File backing this vault
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Encrypt and write `session`, replacing any previous one
    pub fn store(&self, session: &AuthSession) -> Result<()> {
        let json = serde_json::to_vec(session).context("Failed to serialize session")?;

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::rng().fill(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher()?
            .encrypt(nonce, json.as_slice())
            .map_err(|_| anyhow::anyhow!("Failed to encrypt session"))?;

        let mut output = nonce_bytes.to_vec();
        output.extend(ciphertext);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create session directory")?;
        }
        fs::write(&self.path, output).context("Failed to write session file")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Read the stored session, `None` if there is none
    pub fn load(&self) -> Result<Option<AuthSession>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let encrypted = fs::read(&self.path).context("Failed to read session file")?;
        if encrypted.len() < NONCE_SIZE {
            return Ok(None);
        }

        let (nonce_bytes, ciphertext) = encrypted.split_at(NONCE_SIZE);
        let plaintext = cipher()?
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| anyhow::anyhow!("Failed to decrypt session"))?;

        let session = serde_json::from_slice(&plaintext).context("Invalid session data")?;
        Ok(Some(session))
    }

    /// Delete the stored session; returns whether one existed
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path).context("Failed to remove session file")?;
        Ok(true)
    }
}

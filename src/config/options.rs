// src/config/options.rs
use std::fs;
use std::path::{ Path, PathBuf };
use std::time::Duration;

use serde::Deserialize;

use super::consts::*;
use crate::error::{ PortalError, Result };

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub base_url: String,
    /// PKCS#12 bundle holding the member certificate and its private key.
    pub pfx_path: PathBuf,
    pub pfx_pass: String,
    /// PEM file with one or more CA certificates for the portal.
    pub ca_path: PathBuf,
    /// Transactional endpoint answering in RET= / RET_CODE= lines.
    pub transaction_url: Option<String>,
    pub request_pause_ms: u64,
    pub timeout_secs: u64,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: s!(BASE_URL),
            pfx_path: PathBuf::new(),
            pfx_pass: s!(),
            ca_path: PathBuf::new(),
            transaction_url: None,
            request_pause_ms: REQUEST_PAUSE_MS,
            timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

impl PortalConfig {
    pub fn request_pause(&self) -> Duration {
        Duration::from_millis(self.request_pause_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Read a JSON config file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| PortalError::Config(format!("{}: {e}", path.display())))
    }
}

/// Certificate material as loaded from disk, not yet validated.
pub struct Credentials {
    pub pkcs12: Vec<u8>,
    pub passphrase: String,
    pub ca_pem: Vec<u8>,
}

impl Credentials {
    pub fn load(cfg: &PortalConfig) -> Result<Self> {
        let pkcs12 = read_nonempty(&cfg.pfx_path, "client certificate bundle")?;
        let ca_pem = read_nonempty(&cfg.ca_path, "CA certificate")?;
        Ok(Self { pkcs12, passphrase: cfg.pfx_pass.clone(), ca_pem })
    }
}

fn read_nonempty(path: &Path, what: &str) -> Result<Vec<u8>> {
    if path.as_os_str().is_empty() {
        return Err(PortalError::Credential(format!("no {what} path configured")));
    }
    let bytes = fs::read(path)
        .map_err(|e| PortalError::Credential(format!("{what} {}: {e}", path.display())))?;
    if bytes.is_empty() {
        return Err(PortalError::Credential(format!("{what} {} is empty", path.display())));
    }
    Ok(bytes)
}

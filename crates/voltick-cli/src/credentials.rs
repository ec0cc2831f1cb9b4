//! API key resolution.
//!
//! Order: explicit flag, then environment, then the per-user credential
//! file. A key passed by flag is persisted so later runs can omit it.

use std::fs;
use std::path::PathBuf;

use crate::error::CliError;

pub const API_KEY_ENV: &str = "VOLTICK_POLYGON_API_KEY";

fn credential_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".voltick").join("credentials"))
}

/// Resolve the API key, persisting a flag-provided key for later runs.
pub fn resolve_api_key(flag: Option<&str>) -> Result<String, CliError> {
    if let Some(key) = flag {
        let key = key.trim();
        if !key.is_empty() {
            persist_api_key(key);
            return Ok(key.to_owned());
        }
    }

    if let Ok(key) = std::env::var(API_KEY_ENV) {
        let key = key.trim().to_owned();
        if !key.is_empty() {
            return Ok(key);
        }
    }

    if let Some(path) = credential_path() {
        if let Ok(contents) = fs::read_to_string(&path) {
            let key = contents.trim().to_owned();
            if !key.is_empty() {
                return Ok(key);
            }
        }
    }

    Err(CliError::MissingCredential)
}

/// Best-effort save; a failed write only costs a warning.
fn persist_api_key(key: &str) {
    let Some(path) = credential_path() else {
        return;
    };

    let result = path
        .parent()
        .map(fs::create_dir_all)
        .unwrap_or(Ok(()))
        .and_then(|()| fs::write(&path, key));

    if let Err(error) = result {
        tracing::warn!(path = %path.display(), %error, "could not save credential file");
    }
}

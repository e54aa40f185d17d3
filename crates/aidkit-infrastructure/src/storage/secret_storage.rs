//! Reads API keys from `secret.json`.

use crate::paths::AidPaths;
use aidkit_core::config::SecretConfig;
use aidkit_core::error::{AidError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Loads `secret.json` from the aidkit config directory.
pub fn load_default_secrets() -> Result<Option<SecretConfig>> {
    let path = AidPaths::secret_file().map_err(|e| AidError::configuration(e.to_string()))?;
    load_secrets(&path)
}

/// Loads a secrets file; `Ok(None)` when it does not exist.
///
/// The file holds plaintext keys and should be readable by its owner only.
pub fn load_secrets(path: &Path) -> Result<Option<SecretConfig>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    Ok(Some(serde_json::from_str(&content)?))
}

//! Utility helpers shared across the project.

use anyhow::{Context, Result};
use log::error;
use serde::de::DeserializeOwned;
use std::{fs, path::Path};

/// Reads a TOML file into an arbitrary struct.
///
/// # Parameters
///
/// - `path`: The path of the TOML file.
///
/// # Returns
///
/// Returns a struct of the specified type containing deserialized data.
///
/// # Errors
///
/// Returns an error if the file cannot be read or data parsing fails.
pub fn read_toml_from_file<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let content = fs::read_to_string(path)
        .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
    let config: T = match toml::de::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to parse TOML file: {e}");
            return Err(e.into());
        }
    };
    Ok(config)
}

//! Represents the root configuration for the application.
///
/// This struct is used to deserialize the configuration from a file using the
/// `utils::read_toml_from_file` method. It ties the per-concern sections together:
/// - `nfs`: The shared staging location visible to both host and device.
/// - `device`: The device command channel selection.
/// - `executor`: Timeouts of command execution and result polling.
use crate::config::device_config::DeviceConfig;
use crate::config::executor_config::ExecutorOptions;
use crate::config::nfs_config::NfsConfig;
use crate::utils;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UserConfig {
    pub nfs: NfsConfig,
    pub device: DeviceConfig,
    #[serde(default)]
    pub executor: ExecutorOptions,
}

impl UserConfig {
    /// 从文件中读取
    pub fn from_file(file_path: &str) -> anyhow::Result<Self> {
        use std::path::PathBuf;
        let path = PathBuf::from(file_path);
        let config: Self = utils::read_toml_from_file(&path)?;
        Ok(config)
    }
}

//! Represents the configuration for the device command channel.

use crate::config::connection_config::ConnectionConfig;
use crate::config::serial_config::SerialConfig;
/// This struct selects how the device is driven.
/// It contains the following fields:
/// - `device_type`: A string representing the channel type ('serial' or 'ssh' or 'local').
/// - `connection`: An instance of `ConnectionConfig` (only required when device_type is 'ssh').
/// - `serial`: An instance of `SerialConfig` (only required when device_type is 'serial').
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct DeviceConfig {
    pub device_type: String, // 'serial' or 'ssh' or 'local'

    #[serde(rename = "connection")]
    #[serde(default)]
    pub connection: Option<ConnectionConfig>,

    #[serde(rename = "serial")]
    #[serde(default)]
    pub serial: Option<SerialConfig>,
}

impl DeviceConfig {
    /// 获取通道类型
    #[allow(dead_code)]
    pub fn get_device_type(&self) -> &str {
        &self.device_type
    }

    /// 获取SSH连接配置
    #[allow(dead_code)]
    pub fn get_connection(&self) -> Option<&ConnectionConfig> {
        self.connection.as_ref()
    }
}

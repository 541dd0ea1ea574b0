//! 配置模块
//!
//! 每个关注点一个配置结构体，统一通过 `utils::read_toml_from_file` 反序列化

pub mod cli_args;
pub mod connection_config;
pub mod device_config;
pub mod executor_config;
pub mod nfs_config;
pub mod root_config;
pub mod serial_config;

pub use cli_args::CliArgs;
pub use connection_config::ConnectionConfig;
pub use device_config::DeviceConfig;
pub use executor_config::ExecutorOptions;
pub use nfs_config::NfsConfig;
pub use root_config::UserConfig;
pub use serial_config::SerialConfig;

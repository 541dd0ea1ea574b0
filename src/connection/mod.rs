//! 设备命令通道模块
//!
//! 该模块提供了不同类型通道（串口、SSH、本地等）的统一接口。
//! 驱动只关心两件事：把一条命令连同执行类别和超时交给通道，
//! 拿回捕获的文本输出和一个成功/失败状态。

use crate::config::device_config::DeviceConfig;
use anyhow::{Result, bail};
use std::time::Duration;

/// 命令执行结果
#[derive(Debug, Clone)]
pub struct ChannelOutput {
    /// 捕获的文本输出（串口无法区分stdout/stderr，统一为一段文本）
    pub output: String,
    /// 命令是否按预期完成；false 时调用方必须中止当前阶段
    pub status: bool,
}

/// 命令的执行类别标签，由通道层透传
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandCategory {
    /// lite 设备上的 C++ gtest 用例
    LiteCppTest,
}

/// 设备命令通道特质
pub trait DeviceChannel {
    /// 执行命令并返回结果
    fn execute_command(
        &mut self,
        command: &str,
        category: CommandCategory,
        timeout: Option<Duration>,
    ) -> Result<ChannelOutput>;

    /// 建立通道
    ///
    /// 默认实现什么也不做并返回Ok，使实现该trait的类型可以选择是否重写此方法
    #[allow(unused)]
    fn setup(&mut self) -> Result<()> {
        Ok(())
    }

    /// 关闭通道
    fn close(&mut self) -> Result<()>;
}

/// 通道工厂，用于创建适合指定配置的设备通道
pub struct ChannelFactory;

impl ChannelFactory {
    /// 根据设备配置创建适当类型的通道
    pub fn create(config: &DeviceConfig) -> Result<Box<dyn DeviceChannel>> {
        match config.device_type.as_str() {
            "serial" => {
                let serial = match &config.serial {
                    Some(serial) => serial,
                    None => bail!("No serial configuration provided for serial channel"),
                };

                Ok(Box::new(SerialChannel::new(serial.clone())?))
            }
            "remote" | "ssh" => {
                let connection = match &config.connection {
                    Some(conn) => conn,
                    None => bail!("No connection configuration provided for remote/SSH"),
                };

                Ok(Box::new(SshChannel::new(connection)?))
            }
            "local" | "locally" => Ok(Box::new(LocalChannel::new())),
            _ => {
                bail!("Unknown device type: {}", config.device_type)
            }
        }
    }
}

mod local;
pub use local::LocalChannel;

mod serial;
pub use serial::SerialChannel;

mod ssh;
pub use ssh::SshChannel;

//! 执行器配置参数
use humantime_serde;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct ExecutorOptions {
    /// 单条设备命令的超时时间
    #[serde(with = "humantime_serde", default = "default_command_timeout")]
    pub command_timeout: Duration,
    /// 轮询结果文件的总超时时间（独立于单条命令超时）
    #[serde(with = "humantime_serde", default = "default_poll_timeout")]
    pub poll_timeout: Duration,
    /// 两次轮询之间的间隔
    #[serde(with = "humantime_serde", default = "default_poll_interval")]
    pub poll_interval: Duration,
}

fn default_command_timeout() -> Duration {
    Duration::from_secs(300)
}

fn default_poll_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(1)
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            command_timeout: default_command_timeout(),
            poll_timeout: default_poll_timeout(),
            poll_interval: default_poll_interval(),
        }
    }
}

//! 测试请求与请求上下文
//!
//! 一次请求的全部可变状态都放在显式的 `RequestContext` 里，
//! 由调用方在请求生命周期内独占持有，阶段之间不存在进程级隐藏状态。

use anyhow::{Result, anyhow};
use std::path::PathBuf;

use crate::config::executor_config::ExecutorOptions;
use crate::config::nfs_config::NfsConfig;
use crate::connection::{ChannelOutput, CommandCategory, DeviceChannel};

/// 一次测试执行请求
#[derive(Debug, Clone)]
pub struct TestRequest {
    /// 测试二进制在宿主机上的路径，
    /// 形如 `.../unittest/<subsystem>/<module>/bin/<caseName>`
    pub source_file: PathBuf,
    /// 用例名（source_file 的文件名）
    case_name: String,
    /// gtest 名称/模式筛选，与 level_filter 互斥
    pub case_filter: Option<String>,
    /// 逗号分隔的数字优先级列表，与 case_filter 互斥
    pub level_filter: Option<String>,
    /// 结果回收的目标根目录；缺省时只轮询不搬运
    pub report_path: Option<PathBuf>,
}

impl TestRequest {
    pub fn new(
        source_file: PathBuf,
        case_filter: Option<String>,
        level_filter: Option<String>,
        report_path: Option<PathBuf>,
    ) -> Result<Self> {
        let case_name = source_file
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow!("测试二进制路径没有文件名: {}", source_file.display()))?;
        Ok(Self {
            source_file,
            case_name,
            case_filter,
            level_filter,
            report_path,
        })
    }

    /// 用例名，即暂存到NFS目录后设备侧执行的文件名
    pub fn case_name(&self) -> &str {
        &self.case_name
    }

    /// 设备执行完成后产生的结果文件名
    pub fn result_name(&self) -> String {
        format!("{}.xml", self.case_name)
    }
}

/// 请求生命周期的状态机；`Failed` 为终态，不重试
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Staged,
    Executing,
    Polling,
    Collected,
    Failed,
}

/// 一次请求的显式上下文：请求本身、暂存位置、执行参数和设备通道
pub struct RequestContext {
    pub request: TestRequest,
    pub nfs: NfsConfig,
    pub options: ExecutorOptions,
    pub channel: Box<dyn DeviceChannel>,
    pub state: LifecycleState,
    channel_closed: bool,
}

impl RequestContext {
    pub fn new(
        request: TestRequest,
        nfs: NfsConfig,
        options: ExecutorOptions,
        channel: Box<dyn DeviceChannel>,
    ) -> Self {
        Self {
            request,
            nfs,
            options,
            channel,
            state: LifecycleState::Idle,
            channel_closed: false,
        }
    }

    /// 以本请求配置的命令超时执行一条设备命令
    pub fn run_device_command(&mut self, command: &str) -> Result<ChannelOutput> {
        self.channel.execute_command(
            command,
            CommandCategory::LiteCppTest,
            Some(self.options.command_timeout),
        )
    }

    /// 关闭设备通道；重复调用只生效一次
    pub fn close_channel(&mut self) -> Result<()> {
        if !self.channel_closed {
            self.channel.close()?;
            self.channel_closed = true;
        }
        Ok(())
    }

    pub fn channel_closed(&self) -> bool {
        self.channel_closed
    }
}

//! 本地通道
//!
//! 该模块用本地 shell 模拟设备命令通道，主要用于本地冒烟测试和集成测试。
//! 由于每条命令都在新的 sh 进程中执行，通道自己跟踪 `cd` 产生的工作目录。

use anyhow::{Context, Result};
use log::{debug, warn};
use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::connection::{ChannelOutput, CommandCategory, DeviceChannel};

/// 本地通道
pub struct LocalChannel {
    /// `cd` 命令建立的工作目录，后续命令在该目录下执行
    working_dir: Option<PathBuf>,
}

impl LocalChannel {
    /// 创建新的本地通道
    pub fn new() -> Self {
        Self { working_dir: None }
    }
}

impl Default for LocalChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceChannel for LocalChannel {
    /// 执行本地命令
    fn execute_command(
        &mut self,
        command: &str,
        category: CommandCategory,
        timeout: Option<Duration>,
    ) -> Result<ChannelOutput> {
        debug!("执行本地命令 ({category:?}): {command}");

        // `cd` 由通道自己记账，不产生子进程间可见的状态
        if let Some(dir) = command.trim().strip_prefix("cd ") {
            let path = PathBuf::from(dir.trim());
            let status = path.is_dir();
            if status {
                self.working_dir = Some(path);
            } else {
                warn!("目标目录不存在: {}", path.display());
            }
            return Ok(ChannelOutput {
                output: String::new(),
                status,
            });
        }

        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        let mut child = cmd
            .spawn()
            .with_context(|| format!("无法启动命令进程: {command}"))?;

        let start_time = Instant::now();
        let timeout_duration = timeout.unwrap_or(Duration::from_secs(60)); // 默认60秒超时

        // 检查是否超时
        let mut timed_out = false;
        while child.try_wait()?.is_none() {
            if start_time.elapsed() > timeout_duration {
                timed_out = true;
                warn!("命令执行超时: {command}");
                child.kill()?;
                break;
            }
            thread::sleep(Duration::from_millis(100));
        }

        // 获取结果
        let mut stdout = String::new();
        let mut stderr = String::new();

        if let Some(mut stdout_pipe) = child.stdout.take() {
            stdout_pipe.read_to_string(&mut stdout)?;
        }

        if let Some(mut stderr_pipe) = child.stderr.take() {
            stderr_pipe.read_to_string(&mut stderr)?;
        }

        // 获取退出码
        let exit_code = if timed_out {
            -1 // 超时返回-1
        } else {
            match child.wait()?.code() {
                Some(code) => code,
                None => -1, // 被信号终止
            }
        };

        debug!("命令执行完成: exit_code={exit_code}");

        let mut output = stdout;
        if !stderr.is_empty() {
            output.push_str(&stderr);
        }

        Ok(ChannelOutput {
            output,
            status: exit_code == 0,
        })
    }

    /// 设置通道（本地通道无需设置）
    fn setup(&mut self) -> Result<()> {
        Ok(())
    }

    /// 关闭通道（本地通道无需关闭）
    fn close(&mut self) -> Result<()> {
        self.working_dir = None;
        Ok(())
    }
}

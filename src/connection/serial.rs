//! 串口通道
//!
//! 该模块实现了通过串口 shell 驱动设备的命令通道。
//! 串口 shell 拿不到命令的退出码，因此在命令后追加一条
//! `echo __RC=$?` 回显，从输出中解析出成功/失败状态。

use anyhow::{Context, Result};
use log::debug;
use mio_serial::SerialPort;
use std::io::{Read, Write};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::serial_config::SerialConfig;
use crate::connection::{ChannelOutput, CommandCategory, DeviceChannel};

const RC_MARKER: &str = "__RC=";

/// 串口通道
pub struct SerialChannel {
    config: SerialConfig,
    port: Option<Box<dyn SerialPort + Send>>, // 线程安全
}

impl SerialChannel {
    pub fn new(config: SerialConfig) -> Result<Self> {
        Ok(Self { config, port: None })
    }

    /// 打开串口（使用mio-serial）
    fn open_port(&self) -> Result<Box<dyn SerialPort + Send>> {
        let mut builder = mio_serial::new(&self.config.port, self.config.baud_rate);
        builder = builder.timeout(self.config.timeout);
        let stream = builder
            .open_native()
            .with_context(|| format!("无法打开串口: {}", self.config.port))?;
        Ok(Box::new(stream))
    }

    /// 等待特定pattern出现
    fn wait_for_pattern(
        port: &mut dyn SerialPort,
        pattern: &str,
        timeout: Duration,
    ) -> Result<String> {
        let start = Instant::now();
        let mut buf = vec![0u8; 4096];
        let mut output = String::new();
        while start.elapsed() < timeout {
            match port.read(&mut buf) {
                Ok(n) if n > 0 => {
                    let s = String::from_utf8_lossy(&buf[..n]);
                    output.push_str(&s);
                    if output.contains(pattern) {
                        return Ok(output);
                    }
                }
                _ => thread::sleep(Duration::from_millis(50)),
            }
        }
        Err(anyhow::anyhow!("等待pattern超时: {pattern}"))
    }

    /// 发送一行并刷新
    fn send_line(port: &mut dyn SerialPort, line: &str) -> Result<()> {
        port.write_all(line.as_bytes())?;
        port.write_all(b"\n")?;
        port.flush()?;
        Ok(())
    }

    /// 从回显中解析 `__RC=<code>`，串口上这是唯一能拿到的状态来源
    fn parse_return_code(output: &str) -> Option<i32> {
        output
            .lines()
            .rev()
            .find_map(|line| line.trim().strip_prefix(RC_MARKER))
            .and_then(|rc| rc.trim().parse().ok())
    }
}

impl DeviceChannel for SerialChannel {
    /// 建立串口连接并登录shell
    fn setup(&mut self) -> Result<()> {
        debug!("串口setup: 打开串口并等待shell");
        let mut port: Box<dyn SerialPort + Send + 'static> = self.open_port()?;
        let timeout = self.config.timeout;
        // 登录流程
        if let Some(ref user_pat) = self.config.user_prompt {
            let _ = Self::wait_for_pattern(&mut *port, user_pat, timeout)?;
            if let Some(ref user) = self.config.username {
                Self::send_line(&mut *port, user)?;
            }
        }
        if let Some(ref pass_pat) = self.config.pass_prompt {
            let _ = Self::wait_for_pattern(&mut *port, pass_pat, timeout)?;
            if let Some(ref pass) = self.config.password {
                Self::send_line(&mut *port, pass)?;
            }
        }
        // 等待shell提示符
        let _ = Self::wait_for_pattern(&mut *port, &self.config.shell_prompt, timeout)?;
        self.port = Some(port);
        Ok(())
    }

    /// 执行命令
    fn execute_command(
        &mut self,
        command: &str,
        category: CommandCategory,
        timeout: Option<Duration>,
    ) -> Result<ChannelOutput> {
        let timeout = timeout.unwrap_or(self.config.timeout);
        let shell_prompt = self.config.shell_prompt.clone();
        let port = self
            .port
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("串口未连接，请先setup"))?;
        debug!("串口执行命令 ({category:?}): {command}");
        // 清空缓冲区
        let mut buf = [0u8; 4096];
        while let Ok(n) = port.read(&mut buf) {
            if n == 0 {
                break;
            }
        }
        // 发送命令并追加退出码回显
        Self::send_line(&mut **port, &format!("{command}; echo {RC_MARKER}$?"))?;
        // 读取直到下一个shell提示符
        let raw = Self::wait_for_pattern(&mut **port, &shell_prompt, timeout)?;
        let status = Self::parse_return_code(&raw).is_some_and(|rc| rc == 0);
        // 提取命令输出（去掉命令回显、退出码行和提示符）
        let lines: Vec<&str> = raw
            .lines()
            .filter(|line| {
                !line.contains(RC_MARKER)
                    && !line.contains(&shell_prompt)
                    && line.trim() != command.trim()
            })
            .collect();
        Ok(ChannelOutput {
            output: lines.join("\n"),
            status,
        })
    }

    /// 关闭串口连接（可选logout）
    fn close(&mut self) -> Result<()> {
        debug!("串口close: logout并关闭串口");
        if let Some(ref mut port) = self.port {
            let _ = Self::send_line(&mut **port, "logout");
        }
        self.port = None;
        Ok(())
    }
}

//! SSH通道
//!
//! 该模块实现了基于SSH的设备命令通道。每条命令在独立的exec通道中执行，
//! 工作目录不会跨命令保留，因此通道自己跟踪 `cd` 建立的工作目录，
//! 并在后续命令前自动补上。

use anyhow::{Context, Result, bail};
use log::{debug, error, warn};
use ssh2::{Channel, Session};
use std::fs::File;
use std::io::Read;
use std::net::TcpStream;
use std::time::{Duration, Instant};

use crate::config::connection_config::ConnectionConfig;
use crate::connection::{ChannelOutput, CommandCategory, DeviceChannel};

/// SSH通道
pub struct SshChannel {
    /// SSH会话
    session: Session,
    /// 连接状态
    connected: bool,
    /// `cd` 命令建立的工作目录
    working_dir: Option<String>,
}

impl SshChannel {
    /// 创建新的SSH通道并完成握手与认证
    pub fn new(connection_config: &ConnectionConfig) -> Result<Self> {
        let host = &connection_config.ip;
        let port = connection_config.port;
        let username = &connection_config.username;
        let password = connection_config.password.as_deref();
        let private_key_path = connection_config.private_key_path.as_deref();

        debug!("创建SSH连接: {username}@{host}:{port}");

        let tcp = TcpStream::connect(format!("{host}:{port}"))
            .with_context(|| format!("无法连接到 {host}:{port}"))?;

        let mut session = Session::new().with_context(|| "无法创建SSH会话")?;
        session.set_tcp_stream(tcp);
        session.handshake().with_context(|| "SSH握手失败")?;

        Self::authenticate_session(&mut session, username, password, private_key_path)?;

        Ok(Self {
            session,
            connected: true,
            working_dir: None,
        })
    }

    /// 使用密钥文件进行认证
    fn authenticate_with_key(
        session: &mut Session,
        username: &str,
        private_key_path: &str,
    ) -> Result<()> {
        let mut prikey_file = File::open(private_key_path)
            .with_context(|| format!("无法打开密钥文件: {private_key_path}"))?;

        let mut prikey_contents = Vec::new();
        prikey_file
            .read_to_end(&mut prikey_contents)
            .with_context(|| format!("无法读取密钥文件: {private_key_path}"))?;

        session
            .userauth_pubkey_memory(
                username,
                None,
                &String::from_utf8_lossy(&prikey_contents),
                None,
            )
            .with_context(|| "公钥认证失败")?;

        Ok(())
    }

    /// 身份验证
    fn authenticate_session(
        session: &mut Session,
        username: &str,
        password: Option<&str>,
        private_key_path: Option<&str>,
    ) -> Result<()> {
        if let Some(private_key) = private_key_path {
            Self::authenticate_with_key(session, username, private_key)
                .with_context(|| format!("密钥认证失败: {private_key}"))?;
        } else if let Some(pass) = password {
            debug!("使用密码进行认证");
            session
                .userauth_password(username, pass)
                .with_context(|| "密码认证失败")?;
        } else {
            debug!("尝试SSH代理认证");
            session
                .userauth_agent(username)
                .with_context(|| "SSH代理认证失败")?;
        }

        if !session.authenticated() {
            bail!("SSH认证失败");
        }

        Ok(())
    }
}

impl DeviceChannel for SshChannel {
    /// 检查SSH连接可用
    fn setup(&mut self) -> Result<()> {
        if !self.connected {
            bail!("SSH连接已关闭，需要重新连接");
        }
        debug!("SSH连接设置完成");
        Ok(())
    }

    /// 执行远程命令
    fn execute_command(
        &mut self,
        command: &str,
        category: CommandCategory,
        timeout: Option<Duration>,
    ) -> Result<ChannelOutput> {
        if !self.connected {
            bail!("SSH连接已关闭");
        }

        debug!("执行SSH命令 ({category:?}): {command}");

        // `cd` 不会跨exec通道保留，由本通道记账
        if let Some(dir) = command.trim().strip_prefix("cd ") {
            let dir = dir.trim().to_string();
            let probe = format!("cd {dir}");
            let (_, status) = self.exec_raw(&probe, timeout)?;
            if status {
                self.working_dir = Some(dir);
            } else {
                warn!("目标目录不存在: {dir}");
            }
            return Ok(ChannelOutput {
                output: String::new(),
                status,
            });
        }

        let actual_command = match &self.working_dir {
            Some(dir) => format!("cd {dir} && {command}"),
            None => command.to_string(),
        };
        let (output, status) = self.exec_raw(&actual_command, timeout)?;
        Ok(ChannelOutput { output, status })
    }

    /// 关闭SSH连接
    fn close(&mut self) -> Result<()> {
        if self.connected {
            self.session
                .disconnect(None, "正常关闭", None)
                .with_context(|| "关闭SSH连接失败")?;
            self.connected = false;
        }
        Ok(())
    }
}

impl SshChannel {
    /// 在新的exec通道中执行一条命令，返回合并的输出和成功状态
    fn exec_raw(&mut self, command: &str, timeout: Option<Duration>) -> Result<(String, bool)> {
        let mut channel = self
            .session
            .channel_session()
            .with_context(|| "无法打开SSH会话通道")?;

        channel
            .exec(command)
            .with_context(|| format!("无法执行远程命令: {command}"))?;

        channel.send_eof().with_context(|| "无法关闭标准输入")?;

        let (stdout, stderr, timed_out) = read_channel_with_timeout(&mut channel, timeout)?;

        let exit_code = channel.exit_status().with_context(|| "无法获取退出码")?;
        channel.wait_close().with_context(|| "等待通道关闭失败")?;

        debug!("SSH命令执行完成: exit_code={exit_code}");

        let mut output = stdout;
        if !stderr.is_empty() {
            output.push_str(&stderr);
        }

        Ok((output, exit_code == 0 && !timed_out))
    }
}

impl Drop for SshChannel {
    fn drop(&mut self) {
        if self.connected {
            if let Err(e) = self.session.disconnect(None, "连接被丢弃", None) {
                error!("关闭SSH连接失败: {e}");
            }
        }
    }
}

/// 读取通道输出（带超时）
fn read_channel_with_timeout(
    channel: &mut Channel,
    timeout: Option<Duration>,
) -> Result<(String, String, bool)> {
    let timeout_duration = timeout.unwrap_or(Duration::from_secs(60)); // 默认60秒超时
    let start_time = Instant::now();

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let mut buffer = [0; 4096];
    let mut stderr_buffer = [0; 4096];
    let mut timed_out = false;

    // 循环读取直到通道关闭或超时
    while !channel.eof() {
        if start_time.elapsed() > timeout_duration {
            warn!("SSH命令执行超时");
            timed_out = true;
            break;
        }

        // 读取标准输出
        match channel.read(&mut buffer) {
            Ok(n) => {
                if n > 0 {
                    stdout.extend_from_slice(&buffer[..n]);
                }
            }
            Err(e) => {
                if e.kind() != std::io::ErrorKind::WouldBlock {
                    return Err(anyhow::Error::from(e).context("读取标准输出失败"));
                }
            }
        }

        // 读取标准错误
        match channel.stderr().read(&mut stderr_buffer) {
            Ok(n) => {
                if n > 0 {
                    stderr.extend_from_slice(&stderr_buffer[..n]);
                }
            }
            Err(e) => {
                if e.kind() != std::io::ErrorKind::WouldBlock {
                    return Err(anyhow::Error::from(e).context("读取标准错误失败"));
                }
            }
        }

        std::thread::sleep(Duration::from_millis(50));
    }

    let stdout_str = String::from_utf8_lossy(&stdout).into_owned();
    let stderr_str = String::from_utf8_lossy(&stderr).into_owned();

    Ok((stdout_str, stderr_str, timed_out))
}

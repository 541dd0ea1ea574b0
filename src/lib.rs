//! literunner - 在 NFS 挂载的嵌入式设备上运行原生 gtest 测试的驱动
//!
//! 设备本身没有文件传输通道，宿主机通过共享的 NFS 挂载点暂存测试二进制，
//! 通过命令通道（串口 / SSH / 本地 shell）驱动设备执行，
//! 并轮询共享目录等待设备异步产生的 XML 结果文件。

pub mod config;
pub mod connection;
pub mod driver;
pub mod report;
pub mod request;
pub mod utils;

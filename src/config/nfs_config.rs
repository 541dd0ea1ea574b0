//! NFS 暂存目录配置
//!
//! `host_dir` 与 `board_dir` 指向同一块物理存储：前者是宿主机可见的挂载路径，
//! 后者是设备侧可见的挂载路径（不含前导斜杠）。两者必须一致才能保证
//! 暂存与结果回收的连贯性。

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NfsConfig {
    /// 宿主机可见的 NFS 挂载目录
    #[serde(default)]
    pub host_dir: String,
    /// 设备侧可见的挂载目录（设备上以 `/<board_dir>` 访问）
    #[serde(default)]
    pub board_dir: String,
}

//! 报告目录布局
//!
//! 结果文件按测试二进制的源路径归档到
//! `<reportPath>/result/[<subsystem>/[<module>/]]<caseName>.xml`。
//! 路径推导是一个显式的纯函数，便于单独测试。

use anyhow::{Context, Result, bail};
use log::debug;
use std::fs;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// 归档树的根目录名
pub const RESULT_DIR: &str = "result";

/// 从测试二进制的源路径推导出归档子目录
///
/// 取 `unittest<sep>` 之后的剩余部分，再取 `<sep>bin` 之前的前缀，
/// 得到 `subsystem`（一级）或 `subsystem/module`（两级）形式的相对路径。
/// 剩余部分不含 `<sep>bin`（如 `.../unittest/<caseName>`）或为空时，
/// 结果直接落在 `result/` 根下，不建子目录。
pub fn derive_report_subdir(source_file: &Path) -> Option<PathBuf> {
    let path_str = source_file.to_string_lossy();
    let marker = format!("unittest{MAIN_SEPARATOR}");
    let remainder = path_str.split_once(marker.as_str())?.1;
    let bin_marker = format!("{MAIN_SEPARATOR}bin");
    let (prefix, _) = remainder.split_once(bin_marker.as_str())?;
    if prefix.is_empty() {
        None
    } else {
        Some(PathBuf::from(prefix))
    }
}

/// 把结果文件从NFS暂存目录搬运到归档树，返回最终路径
///
/// 归档目录按需创建（幂等）。暂存文件缺失视为错误：
/// 此时设备侧目录列表声称文件存在，但宿主侧看不到。
pub fn relocate_result(
    host_dir: &str,
    result_name: &str,
    report_path: &Path,
    source_file: &Path,
) -> Result<PathBuf> {
    let staged = Path::new(host_dir).join(result_name);
    if !staged.exists() {
        bail!("结果文件在宿主侧暂存路径不存在: {}", staged.display());
    }

    let mut dest_dir = report_path.join(RESULT_DIR);
    if let Some(subdir) = derive_report_subdir(source_file) {
        dest_dir = dest_dir.join(subdir);
    }
    fs::create_dir_all(&dest_dir)
        .with_context(|| format!("无法创建归档目录: {}", dest_dir.display()))?;

    let final_path = dest_dir.join(result_name);
    fs::copy(&staged, &final_path).with_context(|| {
        format!(
            "无法复制结果文件: {} -> {}",
            staged.display(),
            final_path.display()
        )
    })?;
    debug!("结果文件已归档: {}", final_path.display());
    Ok(final_path)
}

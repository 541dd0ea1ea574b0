//! lite 设备上的 gtest 测试驱动
//!
//! 设备没有自己的文件传输通道：二进制经共享的 NFS 目录暂存，
//! 命令经设备通道下发，结果是设备在命令返回后异步写到共享目录的
//! `<caseName>.xml`。本驱动不解析结果内容，只以该文件的出现作为完成信号。

use anyhow::{Context, Result, bail};
use log::{debug, info, warn};
use std::fs;
use std::path::Path;
use std::thread;
use std::time::Instant;

use crate::driver::TestDriver;
use crate::driver::gtest_args::build_gtest_args;
use crate::report;
use crate::request::{LifecycleState, RequestContext};

/// lite gtest 测试驱动
pub struct LiteGtestDriver;

impl TestDriver for LiteGtestDriver {
    /// 暂存：删除同名陈旧产物，复制二进制到NFS目录，设备进入挂载目录
    fn stage(&self, ctx: &mut RequestContext) -> Result<()> {
        if ctx.nfs.host_dir.is_empty() {
            bail!("未配置NFS宿主目录");
        }

        let case_name = ctx.request.case_name().to_string();
        let host_dir = Path::new(&ctx.nfs.host_dir);

        // 先清理上次运行的同名产物，保证回收阶段看不到陈旧结果
        let staged_binary = host_dir.join(&case_name);
        if staged_binary.exists() {
            debug!("删除陈旧二进制: {}", staged_binary.display());
            fs::remove_file(&staged_binary)
                .with_context(|| format!("无法删除陈旧二进制: {}", staged_binary.display()))?;
        }
        let stale_result = host_dir.join(ctx.request.result_name());
        if stale_result.exists() {
            debug!("删除陈旧结果文件: {}", stale_result.display());
            fs::remove_file(&stale_result)
                .with_context(|| format!("无法删除陈旧结果文件: {}", stale_result.display()))?;
        }

        fs::copy(&ctx.request.source_file, &staged_binary).with_context(|| {
            format!(
                "无法复制测试二进制: {} -> {}",
                ctx.request.source_file.display(),
                staged_binary.display()
            )
        })?;

        let cd_command = format!("cd /{}", ctx.nfs.board_dir);
        let output = ctx.run_device_command(&cd_command)?;
        if !output.status {
            bail!("设备进入挂载目录失败: {cd_command}");
        }
        info!("暂存完成: {case_name}");
        ctx.state = LifecycleState::Staged;
        Ok(())
    }

    /// 执行：chmod后运行 `./<caseName> <参数>`，只看通道状态不解析输出
    fn execute(&self, ctx: &mut RequestContext) -> Result<()> {
        ctx.state = LifecycleState::Executing;
        let case_name = ctx.request.case_name().to_string();

        let test_para = build_gtest_args(
            ctx.request.case_filter.as_deref().unwrap_or(""),
            ctx.request.level_filter.as_deref().unwrap_or(""),
        );

        let chmod = format!("chmod 777 {case_name}");
        let output = ctx.run_device_command(&chmod)?;
        if !output.status {
            bail!("设置可执行权限失败: {chmod}");
        }

        let test_command = if test_para.is_empty() {
            format!("./{case_name}")
        } else {
            format!("./{case_name} {test_para}")
        };
        let output = ctx.run_device_command(&test_command)?;
        if !output.status {
            bail!("执行测试命令失败: {test_command}");
        }
        info!("测试命令执行成功: {test_command}");
        info!("用例输出:\n{}", output.output);
        Ok(())
    }

    /// 回收：轮询设备侧目录等待结果文件出现，然后归档到报告树
    fn collect(&self, ctx: &mut RequestContext) -> Result<()> {
        ctx.state = LifecycleState::Polling;
        let result_name = ctx.request.result_name();

        if !self.poll_for_artifact(ctx, &result_name)? {
            bail!(
                "轮询超时({:?})，结果文件未出现: {result_name}",
                ctx.options.poll_timeout
            );
        }

        let Some(report_path) = ctx.request.report_path.clone() else {
            // 没有配置报告目录时只确认结果出现，不搬运
            warn!("未配置报告目录，结果文件留在暂存位置: {result_name}");
            ctx.state = LifecycleState::Collected;
            return Ok(());
        };

        let final_path = report::relocate_result(
            &ctx.nfs.host_dir,
            &result_name,
            &report_path,
            &ctx.request.source_file,
        )?;
        info!("结果已归档: {}", final_path.display());
        ctx.state = LifecycleState::Collected;
        Ok(())
    }
}

impl LiteGtestDriver {
    /// 以固定间隔列出设备侧暂存目录，等待结果文件出现
    ///
    /// 文件一出现立即返回 true，不等满超时窗口；超时未出现返回 false。
    fn poll_for_artifact(&self, ctx: &mut RequestContext, result_name: &str) -> Result<bool> {
        let ls_command = format!("ls /{}", ctx.nfs.board_dir);
        let start_time = Instant::now();
        loop {
            let output = ctx.run_device_command(&ls_command)?;
            if !output.status {
                bail!("列出设备侧暂存目录失败: {ls_command}");
            }
            if output.output.contains(result_name) {
                debug!(
                    "结果文件已出现: {result_name} (耗时 {:?})",
                    start_time.elapsed()
                );
                return Ok(true);
            }
            if start_time.elapsed() >= ctx.options.poll_timeout {
                return Ok(false);
            }
            thread::sleep(ctx.options.poll_interval);
        }
    }
}

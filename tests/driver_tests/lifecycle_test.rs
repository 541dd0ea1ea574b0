use anyhow::Result;
use mockall::mock;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tempfile::{TempDir, tempdir};

use literunner::config::{ExecutorOptions, NfsConfig};
use literunner::connection::{ChannelOutput, CommandCategory, DeviceChannel, LocalChannel};
use literunner::driver::{LiteGtestDriver, TestDriver};
use literunner::request::{LifecycleState, RequestContext, TestRequest};

mock! {
    pub Channel {}

    impl DeviceChannel for Channel {
        fn execute_command(
            &mut self,
            command: &str,
            category: CommandCategory,
            timeout: Option<Duration>,
        ) -> Result<ChannelOutput>;

        fn close(&mut self) -> Result<()>;
    }
}

fn ok_output(output: &str) -> Result<ChannelOutput> {
    Ok(ChannelOutput {
        output: output.to_string(),
        status: true,
    })
}

fn failed_output() -> Result<ChannelOutput> {
    Ok(ChannelOutput {
        output: String::new(),
        status: false,
    })
}

fn fast_options() -> ExecutorOptions {
    ExecutorOptions {
        command_timeout: Duration::from_secs(5),
        poll_timeout: Duration::from_millis(300),
        poll_interval: Duration::from_millis(50),
    }
}

// 在临时目录里造一个"测试二进制"，返回 (目录, 请求)
fn fake_request(case_name: &str, report_path: Option<PathBuf>) -> (TempDir, TestRequest) {
    let src = tempdir().unwrap();
    let bin_dir = src.path().join("unittest/sysA/modB/bin");
    fs::create_dir_all(&bin_dir).unwrap();
    let binary = bin_dir.join(case_name);
    fs::write(&binary, b"\x7fELF fake").unwrap();
    let request = TestRequest::new(binary, None, None, report_path).unwrap();
    (src, request)
}

fn make_ctx(
    request: TestRequest,
    host_dir: &str,
    channel: Box<dyn DeviceChannel>,
) -> RequestContext {
    let nfs = NfsConfig {
        host_dir: host_dir.to_string(),
        board_dir: "nfs".to_string(),
    };
    RequestContext::new(request, nfs, fast_options(), channel)
}

// 未配置NFS宿主目录时暂存立即失败，且不产生任何设备交互
#[test]
fn stage_fails_fast_without_nfs_dir() {
    let (_src, request) = fake_request("CaseA", None);
    // 没有设置任何expectation: 任何设备命令都会触发mock panic
    let channel = MockChannel::new();
    let mut ctx = make_ctx(request, "", Box::new(channel));

    let result = LiteGtestDriver.stage(&mut ctx);
    assert!(result.is_err());
    assert_eq!(ctx.state, LifecycleState::Idle);
}

// 暂存会清理上一轮的同名产物，陈旧结果文件不会被下一轮回收看到
#[test]
fn staging_removes_stale_artifacts() {
    let staging = tempdir().unwrap();
    let (_src, request) = fake_request("CaseA", None);

    fs::write(staging.path().join("CaseA"), b"stale binary").unwrap();
    fs::write(staging.path().join("CaseA.xml"), "<stale/>").unwrap();

    let mut channel = MockChannel::new();
    channel
        .expect_execute_command()
        .withf(|cmd: &str, _, _| cmd.starts_with("cd /"))
        .times(2)
        .returning(|_, _, _| ok_output(""));
    let mut ctx = make_ctx(request, staging.path().to_str().unwrap(), Box::new(channel));

    for _ in 0..2 {
        LiteGtestDriver.stage(&mut ctx).unwrap();
        assert!(!staging.path().join("CaseA.xml").exists());
        assert_eq!(
            fs::read(staging.path().join("CaseA")).unwrap(),
            b"\x7fELF fake"
        );
    }
    assert_eq!(ctx.state, LifecycleState::Staged);
}

// 设备进入挂载目录失败时生命周期终止，且通道仍被恰好关闭一次
#[test]
fn run_closes_channel_once_on_stage_failure() {
    let staging = tempdir().unwrap();
    let (_src, request) = fake_request("CaseA", None);

    let mut channel = MockChannel::new();
    channel
        .expect_execute_command()
        .withf(|cmd: &str, _, _| cmd.starts_with("cd /"))
        .times(1)
        .returning(|_, _, _| failed_output());
    channel.expect_close().times(1).returning(|| Ok(()));
    let mut ctx = make_ctx(request, staging.path().to_str().unwrap(), Box::new(channel));

    let state = LiteGtestDriver.run(&mut ctx);
    assert_eq!(state, LifecycleState::Failed);
    assert!(ctx.channel_closed());
}

// 执行失败时不进入轮询阶段（mock 对 ls 没有expectation，调用会panic）
#[test]
fn execution_failure_skips_collection() {
    let staging = tempdir().unwrap();
    let (_src, request) = fake_request("CaseA", None);

    let mut channel = MockChannel::new();
    channel
        .expect_execute_command()
        .withf(|cmd: &str, _, _| cmd.starts_with("cd /"))
        .times(1)
        .returning(|_, _, _| ok_output(""));
    channel
        .expect_execute_command()
        .withf(|cmd: &str, _, _| cmd.starts_with("chmod 777"))
        .times(1)
        .returning(|_, _, _| ok_output(""));
    channel
        .expect_execute_command()
        .withf(|cmd: &str, _, _| cmd.starts_with("./CaseA"))
        .times(1)
        .returning(|_, _, _| failed_output());
    channel.expect_close().times(1).returning(|| Ok(()));
    let mut ctx = make_ctx(request, staging.path().to_str().unwrap(), Box::new(channel));

    let state = LiteGtestDriver.run(&mut ctx);
    assert_eq!(state, LifecycleState::Failed);
    assert!(ctx.channel_closed());
}

// 结果文件始终不出现时，轮询在超时窗口后返回失败
#[test]
fn polling_gives_up_after_timeout() {
    let staging = tempdir().unwrap();
    let (_src, request) = fake_request("CaseA", None);

    let mut channel = MockChannel::new();
    channel
        .expect_execute_command()
        .withf(|cmd: &str, _, _| cmd.starts_with("ls /"))
        .returning(|_, _, _| ok_output("OtherCase.xml\n"));
    let mut ctx = make_ctx(request, staging.path().to_str().unwrap(), Box::new(channel));

    let start = Instant::now();
    let result = LiteGtestDriver.collect(&mut ctx);
    assert!(result.is_err());
    assert!(start.elapsed() >= Duration::from_millis(300));
    assert_eq!(ctx.state, LifecycleState::Polling);
}

// 结果文件一出现轮询立即返回，不等满超时窗口
#[test]
fn polling_returns_as_soon_as_artifact_appears() {
    let staging = tempdir().unwrap();
    let (_src, request) = fake_request("CaseA", None);

    let mut channel = MockChannel::new();
    let mut calls = 0u32;
    channel
        .expect_execute_command()
        .withf(|cmd: &str, _, _| cmd.starts_with("ls /"))
        .times(2)
        .returning(move |_, _, _| {
            calls += 1;
            if calls < 2 {
                ok_output("")
            } else {
                ok_output("CaseA\nCaseA.xml\n")
            }
        });
    let mut ctx = RequestContext::new(
        request,
        NfsConfig {
            host_dir: staging.path().to_str().unwrap().to_string(),
            board_dir: "nfs".to_string(),
        },
        ExecutorOptions {
            command_timeout: Duration::from_secs(5),
            poll_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(50),
        },
        Box::new(channel),
    );

    let start = Instant::now();
    LiteGtestDriver.collect(&mut ctx).unwrap();
    // 远小于30秒的轮询窗口
    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(ctx.state, LifecycleState::Collected);
}

// 设备侧列表声称文件存在但宿主侧看不到: 归档失败，但通道仍被关闭
#[test]
fn listed_but_missing_host_file_fails_and_closes() {
    let staging = tempdir().unwrap();
    let report = tempdir().unwrap();
    let (_src, request) = fake_request("CaseA", Some(report.path().to_path_buf()));

    let mut channel = MockChannel::new();
    channel
        .expect_execute_command()
        .withf(|cmd: &str, _, _| cmd.starts_with("cd /"))
        .returning(|_, _, _| ok_output(""));
    channel
        .expect_execute_command()
        .withf(|cmd: &str, _, _| cmd.starts_with("chmod 777"))
        .returning(|_, _, _| ok_output(""));
    channel
        .expect_execute_command()
        .withf(|cmd: &str, _, _| cmd.starts_with("./CaseA"))
        .returning(|_, _, _| ok_output("[==========] Running"));
    channel
        .expect_execute_command()
        .withf(|cmd: &str, _, _| cmd.starts_with("ls /"))
        .returning(|_, _, _| ok_output("CaseA.xml\n"));
    channel.expect_close().times(1).returning(|| Ok(()));
    let mut ctx = make_ctx(request, staging.path().to_str().unwrap(), Box::new(channel));

    // 暂存的二进制会被stage复制进来，但结果xml从未真正落盘
    fs::remove_file(staging.path().join("CaseA.xml")).ok();
    let state = LiteGtestDriver.run(&mut ctx);
    assert_eq!(state, LifecycleState::Failed);
    assert!(ctx.channel_closed());
    assert!(!report.path().join("result/sysA/modB/CaseA.xml").exists());
}

// 端到端: 本地通道 + 延迟出现的结果文件 + 按源路径归档
#[test]
fn end_to_end_with_local_channel() {
    let staging = tempdir().unwrap();
    let report = tempdir().unwrap();

    // "测试二进制"是一个sh脚本: 异步写出结果文件，模拟设备在命令
    // 返回之后才产生XML的时序
    let src = tempdir().unwrap();
    let bin_dir = src.path().join("unittest/net/socket/bin");
    fs::create_dir_all(&bin_dir).unwrap();
    let binary = bin_dir.join("SuiteA");
    fs::write(
        &binary,
        "#!/bin/sh\n( sleep 1; printf '<testsuites/>' > SuiteA.xml ) >/dev/null 2>&1 &\necho gtest started\n",
    )
    .unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&binary, fs::Permissions::from_mode(0o755)).unwrap();
    }

    let request = TestRequest::new(
        binary,
        Some("SuiteA.*".to_string()),
        None,
        Some(report.path().to_path_buf()),
    )
    .unwrap();

    // 本地通道下设备侧路径就是宿主路径（去掉前导斜杠）
    let board_dir = staging
        .path()
        .to_str()
        .unwrap()
        .trim_start_matches('/')
        .to_string();
    let nfs = NfsConfig {
        host_dir: staging.path().to_str().unwrap().to_string(),
        board_dir,
    };
    let options = ExecutorOptions {
        command_timeout: Duration::from_secs(30),
        poll_timeout: Duration::from_secs(10),
        poll_interval: Duration::from_millis(200),
    };
    let mut ctx = RequestContext::new(request, nfs, options, Box::new(LocalChannel::new()));

    let state = LiteGtestDriver.run(&mut ctx);
    assert_eq!(state, LifecycleState::Collected);
    assert!(ctx.channel_closed());

    let final_path = report.path().join("result/net/socket/SuiteA.xml");
    assert_eq!(fs::read_to_string(final_path).unwrap(), "<testsuites/>");
}

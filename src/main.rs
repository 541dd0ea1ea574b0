use anyhow::{Result, bail};
use env_logger::Env;
use log::{debug, info};

use literunner::config::{CliArgs, UserConfig};
use literunner::connection::ChannelFactory;
use literunner::driver::DriverRegistry;
use literunner::request::{LifecycleState, RequestContext, TestRequest};

fn main() {
    let args = CliArgs::parse_args();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.get_log_level())).init();

    if let Err(e) = run(args) {
        eprintln!("literunner: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<()> {
    let config = UserConfig::from_file(&args.config)?;
    debug!("加载配置: {config:?}");

    let request = TestRequest::new(
        args.test_binary.clone(),
        args.case.clone(),
        args.level.clone(),
        args.report_dir.clone(),
    )?;
    info!("测试用例: {}", request.case_name());

    let mut channel = ChannelFactory::create(&config.device)?;
    channel.setup()?;

    let registry = DriverRegistry::with_builtin();
    let Some(driver) = registry.create(&args.driver) else {
        bail!(
            "未注册的测试驱动: {} (可用: {:?})",
            args.driver,
            registry.keys()
        );
    };

    let mut ctx = RequestContext::new(request, config.nfs, config.executor, channel);
    let state = driver.run(&mut ctx);
    if state != LifecycleState::Collected {
        bail!("测试请求失败，终态: {state:?}");
    }
    Ok(())
}

use clap::Parser;
use std::path::PathBuf;

// literunner - 在 NFS 挂载的嵌入式设备上运行原生 gtest 测试二进制
#[derive(Parser, Debug)]
#[clap(
    name = "literunner",
    version,
    about = "Run native gtest binaries on NFS-mounted embedded boards",
    after_help = "FILTER OPTIONS (mutually exclusive; both or neither means no filter):\n  --case <PATTERN>       Run cases matching a gtest filter pattern\n  --level <LIST>         Run cases tagged with the given priority levels\n\nEXAMPLES:\n  literunner --test-binary out/unittest/kernel/sched/bin/SchedTest\n  literunner --test-binary bin/NetTest --case 'NetSuite.*' --report-dir reports\n  literunner --test-binary bin/NetTest --level 1,2 --config board.toml"
)]
pub struct CliArgs {
    // Configuration file path
    // 配置文件路径
    #[clap(short = 'c', long = "config", default_value = "literunner.toml", help = "Configuration file")]
    pub config: String,

    // Test binary - host-side path of the binary to stage and run
    // 测试二进制 - 要暂存并执行的二进制在宿主机上的路径
    #[clap(long = "test-binary", help = "Host-side path of the test binary")]
    pub test_binary: PathBuf,

    // Case filter - exact gtest name/pattern filter
    // 用例筛选 - 精确的 gtest 名称/模式筛选
    #[clap(long = "case", help = "gtest case filter pattern")]
    pub case: Option<String>,

    // Level filter - comma-separated numeric priority levels
    // 级别筛选 - 逗号分隔的数字优先级列表
    #[clap(long = "level", help = "Comma-separated priority levels")]
    pub level: Option<String>,

    // Reports directory - destination root for collected results
    // 报告目录 - 回收结果的目标根目录
    #[clap(long = "report-dir", help = "Destination root for result artifacts")]
    pub report_dir: Option<PathBuf>,

    // Driver key - test-type key looked up in the driver registry
    // 驱动键 - 在驱动注册表中查询的测试类型键
    #[clap(long = "driver", default_value = "lite-gtest", help = "Test driver key")]
    pub driver: String,

    // Verbose mode - Show more log information
    // 详细模式 - 显示更多日志信息
    #[clap(short = 'v', long = "verbose", help = "Enable verbose logging")]
    pub verbose: bool,

    // Quiet mode - Suppress prompts and progress information
    // 安静模式 - 不显示提示和进度信息
    #[clap(short = 'q', long = "quiet", help = "Suppress non-essential output")]
    pub quiet: bool,
}

impl CliArgs {
    /// Parse command line arguments
    /// 解析命令行参数
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get log level
    /// 获取日志级别
    pub fn get_log_level(&self) -> &str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

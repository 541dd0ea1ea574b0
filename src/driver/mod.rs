//! 测试驱动模块
//!
//! `TestDriver` 是驱动的生命周期契约：暂存、执行、回收三个阶段
//! 严格顺序执行，任一阶段失败即中止本次请求的后续阶段。
//! 具体驱动在显式的 `DriverRegistry` 表中按测试类型键注册，
//! 由宿主按键查询，而不是依赖注册装饰的副作用。

use anyhow::Result;
use log::{error, info};
use std::collections::HashMap;

use crate::request::{LifecycleState, RequestContext};

pub mod gtest_args;
pub mod lite_gtest;

pub use lite_gtest::LiteGtestDriver;

/// lite 设备 gtest 驱动的注册键
pub const LITE_GTEST_DRIVER: &str = "lite-gtest";

/// 测试驱动特质
pub trait TestDriver {
    /// 暂存阶段：清理同名陈旧产物并把测试二进制放到共享目录
    fn stage(&self, ctx: &mut RequestContext) -> Result<()>;

    /// 执行阶段：在设备上运行暂存的二进制
    fn execute(&self, ctx: &mut RequestContext) -> Result<()>;

    /// 回收阶段：轮询结果文件并归档
    fn collect(&self, ctx: &mut RequestContext) -> Result<()>;

    /// 按顺序驱动三个阶段，并保证设备通道在任何退出路径上都恰好关闭一次
    fn run(&self, ctx: &mut RequestContext) -> LifecycleState {
        let result = self
            .stage(ctx)
            .and_then(|_| self.execute(ctx))
            .and_then(|_| self.collect(ctx));

        match result {
            Ok(()) => info!("请求执行成功: {}", ctx.request.case_name()),
            Err(e) => {
                error!(
                    "请求在 {:?} 阶段失败: {}: {e:#}",
                    ctx.state,
                    ctx.request.case_name()
                );
                ctx.state = LifecycleState::Failed;
            }
        }

        if let Err(e) = ctx.close_channel() {
            error!("关闭设备通道失败: {e:#}");
        }

        ctx.state
    }
}

/// 驱动注册表：测试类型键 -> 驱动构造函数
pub struct DriverRegistry {
    drivers: HashMap<&'static str, fn() -> Box<dyn TestDriver>>,
}

impl DriverRegistry {
    /// 创建空的注册表
    pub fn new() -> Self {
        Self {
            drivers: HashMap::new(),
        }
    }

    /// 创建带内置驱动的注册表
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(LITE_GTEST_DRIVER, || Box::new(LiteGtestDriver));
        registry
    }

    /// 注册一个驱动构造函数
    pub fn register(&mut self, key: &'static str, ctor: fn() -> Box<dyn TestDriver>) {
        self.drivers.insert(key, ctor);
    }

    /// 按测试类型键创建驱动实例
    pub fn create(&self, key: &str) -> Option<Box<dyn TestDriver>> {
        self.drivers.get(key).map(|ctor| ctor())
    }

    /// 已注册的测试类型键
    pub fn keys(&self) -> Vec<&'static str> {
        self.drivers.keys().copied().collect()
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

//! gtest 命令行参数构造
//!
//! 把请求里的用例筛选或级别筛选翻译成设备侧的单个参数串。
//! 两种筛选互斥：同时设置或都未设置时不传筛选参数，二进制跑全部用例。

use log::warn;
use std::collections::BTreeSet;

/// gtest 名称/模式筛选参数
pub const GTEST_FILTER: &str = "--gtest_filter";
/// gtest 级别筛选参数
pub const GTEST_TESTSIZE: &str = "--gtest_testsize";

/// 构造设备侧的筛选参数串（纯函数）
///
/// - 仅 case_filter 非空: `--gtest_filter=<case_filter>`
/// - 仅 level_filter 非空: `--gtest_testsize=Level<n1>,Level<n2>,...`，
///   级别去重、丢弃非数字项
/// - 其余情况: 空串
pub fn build_gtest_args(case_filter: &str, level_filter: &str) -> String {
    if !case_filter.is_empty() && level_filter.is_empty() {
        format!("{GTEST_FILTER}={case_filter}")
    } else if case_filter.is_empty() && !level_filter.is_empty() {
        let levels = parse_level_filter(level_filter);
        if levels.is_empty() {
            // 所有级别项都被丢弃时不传参数（跑全部用例），而不是传出
            // 退化的 `--gtest_testsize=` 让设备自行解释
            warn!("级别筛选 \"{level_filter}\" 没有有效的数字级别，按无筛选处理");
            return String::new();
        }
        let levels: Vec<String> = levels.into_iter().map(|l| format!("Level{l}")).collect();
        format!("{GTEST_TESTSIZE}={}", levels.join(","))
    } else {
        String::new()
    }
}

/// 解析级别列表：按逗号切分，去重，丢弃非纯数字项
fn parse_level_filter(level_filter: &str) -> BTreeSet<String> {
    level_filter
        .split(',')
        .filter(|item| !item.is_empty() && item.chars().all(|c| c.is_ascii_digit()))
        .map(|item| item.trim().to_string())
        .collect()
}

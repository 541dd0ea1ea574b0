use literunner::driver::gtest_args::build_gtest_args;

// 仅设置用例筛选时产生 --gtest_filter 参数
#[test]
fn case_filter_only() {
    assert_eq!(
        build_gtest_args("MyTest.Case1", ""),
        "--gtest_filter=MyTest.Case1"
    );
}

// 级别筛选去重并丢弃非数字项
#[test]
fn level_filter_dedups_and_drops_non_numeric() {
    assert_eq!(
        build_gtest_args("", "1,1,2,,abc"),
        "--gtest_testsize=Level1,Level2"
    );
}

// 两种筛选同时设置时不传筛选参数
#[test]
fn both_filters_set_yields_empty() {
    assert_eq!(build_gtest_args("MyTest.Case1", "1,2"), "");
}

// 都未设置时不传筛选参数
#[test]
fn neither_filter_set_yields_empty() {
    assert_eq!(build_gtest_args("", ""), "");
}

// 级别项全部无效时按无筛选处理，而不是传出空值参数
#[test_log::test]
fn all_invalid_levels_yields_empty() {
    assert_eq!(build_gtest_args("", "abc,x1,,"), "");
}

// 单个级别没有尾随逗号
#[test]
fn single_level_has_no_trailing_comma() {
    assert_eq!(build_gtest_args("", "3"), "--gtest_testsize=Level3");
}

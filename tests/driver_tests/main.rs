mod gtest_args_test;
mod lifecycle_test;
mod report_layout_test;

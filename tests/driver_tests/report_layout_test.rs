use literunner::report::{derive_report_subdir, relocate_result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

// 两级路径: unittest/<subsystem>/<module>/bin/<case>
#[test]
fn derives_subsystem_and_module() {
    let source = Path::new("/src/out/unittest/sysA/modB/bin/caseX");
    assert_eq!(derive_report_subdir(source), Some(PathBuf::from("sysA/modB")));
}

// 一级路径: unittest/<subsystem>/bin/<case>
#[test]
fn derives_flat_subsystem() {
    let source = Path::new("/src/out/unittest/sysA/bin/caseX");
    assert_eq!(derive_report_subdir(source), Some(PathBuf::from("sysA")));
}

// 无模块分层: unittest/<case> 直接落在 result/ 根下
#[test]
fn no_segmentation_means_no_subdir() {
    let source = Path::new("/src/out/unittest/caseX");
    assert_eq!(derive_report_subdir(source), None);
}

// 路径里没有 unittest 分段时同样不建子目录
#[test]
fn missing_unittest_marker_means_no_subdir() {
    let source = Path::new("/src/out/bin/caseX");
    assert_eq!(derive_report_subdir(source), None);
}

// 归档: 结果文件复制到派生出来的子目录，文件名保持不变
#[test]
fn relocates_into_derived_tree() {
    let staging = tempdir().unwrap();
    let report = tempdir().unwrap();
    fs::write(staging.path().join("caseX.xml"), "<testsuites/>").unwrap();

    let source = Path::new("/src/out/unittest/sysA/modB/bin/caseX");
    let final_path = relocate_result(
        staging.path().to_str().unwrap(),
        "caseX.xml",
        report.path(),
        source,
    )
    .unwrap();

    assert_eq!(
        final_path,
        report.path().join("result/sysA/modB/caseX.xml")
    );
    assert_eq!(fs::read_to_string(&final_path).unwrap(), "<testsuites/>");
}

// 归档是幂等的: 目录已存在时再次归档不报错
#[test]
fn relocation_is_idempotent() {
    let staging = tempdir().unwrap();
    let report = tempdir().unwrap();
    fs::write(staging.path().join("caseX.xml"), "<testsuites/>").unwrap();

    let source = Path::new("/src/out/unittest/sysA/bin/caseX");
    for _ in 0..2 {
        relocate_result(
            staging.path().to_str().unwrap(),
            "caseX.xml",
            report.path(),
            source,
        )
        .unwrap();
    }
    assert!(report.path().join("result/sysA/caseX.xml").exists());
}

// 暂存文件缺失时归档报错（设备侧列表声称存在但宿主侧看不到）
#[test]
fn missing_staged_file_is_an_error() {
    let staging = tempdir().unwrap();
    let report = tempdir().unwrap();

    let source = Path::new("/src/out/unittest/sysA/bin/caseX");
    let result = relocate_result(
        staging.path().to_str().unwrap(),
        "caseX.xml",
        report.path(),
        source,
    );
    assert!(result.is_err());
    assert!(!report.path().join("result/sysA/caseX.xml").exists());
}

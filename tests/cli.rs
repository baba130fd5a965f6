use std::path::Path;
use std::process::Command;

fn align_plot(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_align_plot"));
    cmd.current_dir(dir)
        .env_remove("DISPLAY")
        .env_remove("WAYLAND_DISPLAY");
    cmd
}

#[test]
fn plot_with_default_paths() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy("./test/results.csv", dir.path().join("results.csv")).unwrap();
    let status = align_plot(dir.path()).status().unwrap();
    assert!(status.success());
    let png = dir.path().join("execution_time_comparison.png");
    assert!(std::fs::metadata(png).unwrap().len() > 0);
}

#[test]
fn missing_input_fails_without_image() {
    let dir = tempfile::tempdir().unwrap();
    let status = align_plot(dir.path()).status().unwrap();
    assert!(!status.success());
    assert!(!dir.path().join("execution_time_comparison.png").exists());
}

#[test]
fn malformed_input_fails_without_image() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy("./test/missing_column.csv", dir.path().join("results.csv")).unwrap();
    let status = align_plot(dir.path()).status().unwrap();
    assert!(!status.success());
    assert!(!dir.path().join("execution_time_comparison.png").exists());
}

#[test]
fn benchmark_then_plot() {
    let dir = tempfile::tempdir().unwrap();
    let status = Command::new(env!("CARGO_BIN_EXE_align_bench"))
        .current_dir(dir.path())
        .args(["--runs", "4", "--size", "4096"])
        .status()
        .unwrap();
    assert!(status.success());
    let csv = std::fs::read_to_string(dir.path().join("results.csv")).unwrap();
    assert_eq!(csv.lines().count(), 5);
    let status = align_plot(dir.path())
        .args(["--pngfile", "bench.png", "--noshow"])
        .status()
        .unwrap();
    assert!(status.success());
    assert!(dir.path().join("bench.png").exists());
}

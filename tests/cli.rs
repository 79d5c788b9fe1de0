//! End-to-end runs of the histoplot binary.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn histoplot(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_histoplot"))
        .current_dir(cwd)
        .args(args)
        .env_remove("HISTOPLOT_NR")
        .env_remove("HISTOPLOT_NTH")
        .output()
        .expect("failed to run histoplot")
}

fn write_histogram(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

const SMALL_HISTOGRAM: &str = "\
# radial
0.01 1
0.02 1
# angular
-1.5 1
1.5 1
# 2d
0.005 -1.0 2
0.015 1.0 1
";

#[test]
fn test_missing_directory_argument_exits_with_usage() {
    let work = TempDir::new().unwrap();
    let output = histoplot(work.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn test_no_matching_files_exits_without_output() {
    let work = TempDir::new().unwrap();
    let data = work.path().join("data");
    std::fs::create_dir(&data).unwrap();
    write_histogram(&data, "histograma-001.dat", SMALL_HISTOGRAM);

    let output = histoplot(work.path(), &["data"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No histo_*.dat files found"));
    assert!(!work.path().join("histos_acumulados.svg").exists());
}

#[test]
fn test_renders_figure_and_summary() {
    let work = TempDir::new().unwrap();
    let data = work.path().join("data");
    std::fs::create_dir(&data).unwrap();
    write_histogram(&data, "histo_001.dat", SMALL_HISTOGRAM);
    write_histogram(&data, "histo_002.dat", SMALL_HISTOGRAM);

    let output = histoplot(
        work.path(),
        &[
            "data",
            "--nr",
            "2",
            "--nth",
            "2",
            "--no-progress",
            "--summary",
            "summary.json",
        ],
    );

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let figure = std::fs::read_to_string(work.path().join("histos_acumulados.svg")).unwrap();
    assert!(figure.contains("<svg"));

    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(work.path().join("summary.json")).unwrap())
            .unwrap();
    assert_eq!(summary["files"].as_array().map(Vec::len), Some(2));
    assert_eq!(summary["radial"][0][1], 0.5);
    assert_eq!(summary["angular"][1][1], 0.5);
}

#[test]
fn test_malformed_file_fails_the_run() {
    let work = TempDir::new().unwrap();
    let data = work.path().join("data");
    std::fs::create_dir(&data).unwrap();
    write_histogram(&data, "histo_001.dat", SMALL_HISTOGRAM);
    write_histogram(&data, "histo_002.dat", "0.01 1\n0.02\n-1.5 1\n1.5 1\n");

    let output = histoplot(work.path(), &["data", "--nr", "2", "--nth", "2", "-q"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("histo_002.dat"));
    assert!(!work.path().join("histos_acumulados.svg").exists());
}

#[test]
fn test_init_config_writes_default_file() {
    let work = TempDir::new().unwrap();

    let output = histoplot(work.path(), &["--init-config"]);
    assert_eq!(output.status.code(), Some(0));

    let content = std::fs::read_to_string(work.path().join(".histoplot.toml")).unwrap();
    assert!(content.contains("[histogram]"));

    let again = histoplot(work.path(), &["--init-config"]);
    assert_eq!(again.status.code(), Some(1));
}

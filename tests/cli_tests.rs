#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use std::fs;
use tempfile::NamedTempFile;

const DIAMOND_JSON: &str = r#"{"directed":true,"graph":{"name":"demo"},
"nodes":[{"id":"A","execution_time":10},{"id":"B","execution_time":25},
{"id":"C","execution_time":20},{"id":"D","execution_time":5}],
"links":[{"source":"A","target":"B","data_amount":20},{"source":"A","target":"C","data_amount":20},
{"source":"B","target":"D","data_amount":20},{"source":"C","target":"D","data_amount":20}]}"#;

#[allow(deprecated)]
fn run_cli(args: &[&str], script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.args(args).write_stdin(script.to_string()).assert()
}

fn diamond_file() -> NamedTempFile {
    let tmp = NamedTempFile::new().expect("create temp file");
    fs::write(tmp.path(), DIAMOND_JSON).expect("write workflow");
    tmp
}

#[test]
fn cli_analyzes_loaded_workflow() {
    let tmp = diamond_file();
    let script = format!("load {}\nanalyze\npath\nquit\n", tmp.path().display());
    run_cli(&[], &script)
        .success()
        .stdout(str_contains("Workflow loaded from"))
        .stdout(str_contains("completion=40.0"))
        .stdout(str_contains("Critical path: A -> B -> D (completion 40.0)"));
}

#[test]
fn cli_transfer_rate_flag_drives_transfer_analysis() {
    let tmp = diamond_file();
    let script = format!("load {}\nanalyze transfer\nquit\n", tmp.path().display());
    run_cli(&["--transfer-rate", "10"], &script)
        .success()
        .stdout(str_contains("completion=44.0, transfer=4.0"));
}

#[test]
fn cli_rejects_non_positive_rate() {
    run_cli(&[], "rate 0\nquit\n")
        .success()
        .stdout(str_contains("must be finite and positive"));
}

#[test]
fn cli_generate_is_reproducible_with_seed() {
    let script = "generate 12 1 5 0.5 1 50 seeded\nshow\nquit\n";
    let first = run_cli(&["--seed", "42"], script).success();
    let second = run_cli(&["--seed", "42"], script).success();
    let first_out = String::from_utf8_lossy(&first.get_output().stdout).to_string();
    let second_out = String::from_utf8_lossy(&second.get_output().stdout).to_string();
    assert!(first_out.contains("Generated workflow 'seeded' with 12 tasks"));
    assert!(first_out.contains("(seed 42)"));
    assert_eq!(first_out, second_out);
}

#[test]
fn cli_reports_generator_validation_errors() {
    run_cli(&[], "generate 1 1 5 0.5 1 50\nquit\n")
        .success()
        .stdout(str_contains("node count must be at least 2"));
}

#[test]
fn cli_exports_schedule_csv() {
    let workflow = diamond_file();
    let out = NamedTempFile::new().expect("create temp file");
    let script = format!(
        "load {}\nanalyze\nexport csv {}\nquit\n",
        workflow.path().display(),
        out.path().display()
    );
    run_cli(&[], &script)
        .success()
        .stdout(str_contains("Schedule exported to"));
    let csv = fs::read_to_string(out.path()).expect("read export");
    assert!(csv.starts_with("task_id,duration,earliest_start"));
    assert_eq!(csv.lines().count(), 5);
}

#[test]
fn cli_save_and_reload_round_trip() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().display().to_string();
    let script = format!("generate 8 1 3 0.2 1 10 saved\nsave {path}\nload {path}\nshow\nquit\n");
    run_cli(&["--seed", "3"], &script)
        .success()
        .stdout(str_contains("Workflow saved to"))
        .stdout(str_contains("(8 tasks,"))
        .stdout(str_contains("Start"));
}

#[test]
fn cli_requires_analysis_before_path() {
    run_cli(&[], "path\nshow\nquit\n")
        .success()
        .stdout(str_contains("No analysis yet. Run 'analyze' first."))
        .stdout(str_contains("No workflow loaded."));
}

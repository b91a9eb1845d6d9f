use std::path::Path;
use std::process::{Command, Output};

fn run(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_resume-nlu"))
        .current_dir(cwd)
        .args(args)
        .env_remove("RESUME_NLU_USERNAME")
        .env_remove("RESUME_NLU_PASSWORD")
        .env_remove("RUST_LOG")
        .output()
        .expect("run resume-nlu")
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn analyze_reports_unsupported_input_on_stderr() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("cv.txt"), "Jane Doe").unwrap();

    let out = run(dir.path(), &["analyze", "--input", "cv.txt"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("invalid document format"), "{}", stderr(&out));
}

#[test]
fn analyze_reports_missing_credentials_on_stderr() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("cv.pdf"), "%PDF-1.4").unwrap();

    let out = run(dir.path(), &["analyze", "--input", "cv.pdf"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("no NLU username"), "{}", stderr(&out));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn unreadable_config_is_reported_on_stderr() {
    let dir = tempfile::tempdir().unwrap();

    let out = run(dir.path(), &["--config", "missing.toml", "doctor"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("missing.toml"), "{}", stderr(&out));
}

#[test]
fn failures_after_logging_starts_still_reach_stderr() {
    let dir = tempfile::tempdir().unwrap();

    let out = run(dir.path(), &["parse", "--response", "nowhere.json"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("nowhere.json"), "{}", stderr(&out));
}

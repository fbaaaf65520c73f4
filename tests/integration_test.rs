use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn cargo_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cv-pdf"))
}

fn output_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

fn page_count(path: &Path) -> usize {
    let doc = lopdf::Document::load(path).expect("Output is not a readable PDF");
    doc.get_pages().len()
}

fn long_profile(jobs: usize) -> String {
    let experience: Vec<String> = (0..jobs)
        .map(|i| {
            format!(
                r#"{{"company_name": "Company {i}", "job_title": "Engineer {i}",
                    "start_date": "20{:02}-01-01", "end_date": "20{:02}-12-31",
                    "responsibilities": "Built things.\nShipped things.\nFixed things."}}"#,
                i % 20,
                i % 20
            )
        })
        .collect();
    format!(
        r#"{{"user": {{"full_name": "Long Career", "email": "long@example.com"}},
            "experience": [{}]}}"#,
        experience.join(",")
    )
}

#[test]
fn test_demo_profile() {
    let dir = output_dir();
    let output_file = dir.path().join("demo.pdf");

    let output = cargo_bin()
        .args(["-p", "demos/profile.json", "-o"])
        .arg(&output_file)
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(output_file.exists(), "PDF file was not created");

    let metadata = fs::metadata(&output_file).expect("Failed to get file metadata");
    assert!(metadata.len() > 1000, "PDF file is too small, likely empty or corrupt");
    assert_eq!(page_count(&output_file), 1);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✓ Generated:"));
    assert!(stdout.contains("Johnathan 'Johnny' Full - Lead Full Stack Developer"));
}

#[test]
fn test_long_profile_spans_pages() {
    let dir = output_dir();
    let profile = dir.path().join("long.json");
    fs::write(&profile, long_profile(40)).expect("Failed to write profile");
    let output_file = dir.path().join("long.pdf");

    let output = cargo_bin()
        .arg("-p")
        .arg(&profile)
        .arg("-o")
        .arg(&output_file)
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(page_count(&output_file) > 1);
}

#[test]
fn test_letter_paper_and_options() {
    let dir = output_dir();
    let output_file = dir.path().join("letter.pdf");

    let output = cargo_bin()
        .args([
            "-p", "demos/profile.json",
            "--paper", "letter",
            "--margin", "36",
            "--ongoing-label", "Ongoing",
            "--keep-order",
            "-vv",
            "-o",
        ])
        .arg(&output_file)
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(page_count(&output_file) >= 1);
}

#[test]
fn test_default_output_name() {
    let dir = output_dir();
    let profile = dir.path().join("profile.json");
    fs::write(&profile, r#"{"user": {"full_name": "Jane NoLinks"}}"#).expect("Failed to write profile");

    let output = cargo_bin()
        .arg("-p")
        .arg(&profile)
        .current_dir(dir.path())
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(dir.path().join("cv-jane-nolinks.pdf").exists());
}

#[test]
fn test_missing_profile_file() {
    let dir = output_dir();
    let output = cargo_bin()
        .args(["-p", "nonexistent.json", "-o"])
        .arg(dir.path().join("should-not-exist.pdf"))
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for missing profile");
    assert!(!dir.path().join("should-not-exist.pdf").exists());
}

#[test]
fn test_invalid_profile_json() {
    let dir = output_dir();
    let profile = dir.path().join("broken.json");
    fs::write(&profile, "{ not json").expect("Failed to write profile");

    let output = cargo_bin()
        .arg("-p")
        .arg(&profile)
        .arg("-o")
        .arg(dir.path().join("should-not-exist.pdf"))
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for invalid JSON");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read profile"));
}

#[test]
fn test_margin_too_large() {
    let dir = output_dir();
    let output = cargo_bin()
        .args(["-p", "demos/profile.json", "--margin", "300", "-o"])
        .arg(dir.path().join("should-not-exist.pdf"))
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for oversized margin");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid layout configuration"));
}

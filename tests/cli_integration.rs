use std::fs;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use serde_json::Value;
use tempfile::tempdir;

/// Run the built binary in `cwd` with stdin detached, so `--json` runs are
/// non-interactive.
fn nicelicense(cwd: &Path, args: &[&str], data: Option<&Path>) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_nicelicense"));
    command
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .env_remove("NICELICENSE_DATA")
        .env_remove("RUST_LOG");
    if let Some(data) = data {
        command.env("NICELICENSE_DATA", data);
    }
    command.output().expect("binary should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_lists_bundled_catalog() {
    let dir = tempdir().unwrap();
    let output = nicelicense(dir.path(), &["-l"], None);

    assert!(output.status.success(), "{}", stderr(&output));
    let listed = stdout(&output);
    for expected in [
        "MIT - MIT License",
        "Apache-2.0 - Apache License 2.0",
        "Unlicense - The Unlicense",
    ] {
        assert!(
            listed.lines().any(|line| line == expected),
            "missing {:?} in:\n{}",
            expected,
            listed
        );
    }
}

#[test]
fn test_json_existing_license() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("LICENSE"), "Existing license text\n").unwrap();

    let output = nicelicense(dir.path(), &["--json"], None);
    assert!(output.status.success(), "{}", stderr(&output));

    let parsed: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["status"], "existing");
    assert!(parsed["path"].as_str().unwrap().ends_with("LICENSE"));
}

#[test]
fn test_writes_bundled_license_offline() {
    let dir = tempdir().unwrap();
    let output = nicelicense(
        dir.path(),
        &[
            "--license",
            "BSD-2-Clause",
            "--yes",
            "--name",
            "Jane Doe",
            "--years",
            "2020-2024",
            "--json",
        ],
        None,
    );
    assert!(output.status.success(), "{}", stdout(&output));

    let parsed: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["status"], "written");

    let written = fs::read_to_string(dir.path().join("LICENSE")).unwrap();
    assert!(written.contains("Copyright (c) 2020-2024, Jane Doe"));
    assert!(written.ends_with('\n') && !written.ends_with("\n\n"));

    let output = nicelicense(dir.path(), &["--validate", "--json"], None);
    let parsed: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["status"], "identified");
    assert_eq!(parsed["spdx"], "BSD-2-Clause");
}

#[test]
fn test_unknown_license_exits_non_zero() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("licenses.json");
    fs::write(
        &data,
        r#"[{"spdx": "MIT", "name": "MIT License", "url": "https://example.com/mit"}]"#,
    )
    .unwrap();

    let output = nicelicense(dir.path(), &["--license", "Apache-2.0", "--yes"], Some(data.as_path()));
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Unknown license: Apache-2.0"));

    let output = nicelicense(
        dir.path(),
        &["--license", "Apache-2.0", "--yes", "--json"],
        Some(data.as_path()),
    );
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout(&output),
        "{\"status\":\"error\",\"message\":\"Unknown license: Apache-2.0\"}\n"
    );
}

#[test]
fn test_catalog_must_be_an_array() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("licenses.json");
    fs::write(&data, r#"{"spdx": "MIT"}"#).unwrap();

    let output = nicelicense(dir.path(), &["--list"], Some(data.as_path()));
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("License list JSON must be an array."));
}

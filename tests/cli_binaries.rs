use std::process::Command;

fn binary_output(path: &str, args: &[&str]) -> std::process::Output {
    Command::new(path)
        .args(args)
        .output()
        .unwrap_or_else(|error| panic!("failed to run {}: {}", path, error))
}

fn combined_utf8(output: &std::process::Output) -> String {
    let mut data = output.stdout.clone();
    data.extend_from_slice(&output.stderr);
    String::from_utf8(data).expect("binary output should be valid UTF-8")
}

#[test]
fn getfattr_help_lists_usage() {
    let output = binary_output(env!("CARGO_BIN_EXE_oc-getfattr"), &["--help"]);
    assert!(output.status.success(), "--help should succeed");
    assert!(
        output.stderr.is_empty(),
        "help output should not write to stderr"
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout is UTF-8");
    assert!(stdout.contains("Usage: oc-getfattr"));
    assert!(stdout.contains("--encoding"));
}

#[test]
fn getfattr_without_paths_is_a_usage_error() {
    let output = binary_output(env!("CARGO_BIN_EXE_oc-getfattr"), &[]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(combined_utf8(&output).contains("Usage:"));
}

#[test]
fn getfattr_rejects_unknown_flag() {
    let output = binary_output(
        env!("CARGO_BIN_EXE_oc-getfattr"),
        &["--definitely-not-a-flag", "x"],
    );
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_utf8(&output).contains("--definitely-not-a-flag"));
}

#[test]
fn version_flags_exit_zero() {
    for binary in [
        env!("CARGO_BIN_EXE_oc-getfattr"),
        env!("CARGO_BIN_EXE_oc-setfattr"),
    ] {
        let output = binary_output(binary, &["--version"]);
        assert!(output.status.success(), "{binary} --version should succeed");
        let stdout = String::from_utf8(output.stdout).expect("stdout is UTF-8");
        assert!(stdout.trim_end().ends_with(env!("CARGO_PKG_VERSION")));
    }
}

#[test]
fn setfattr_value_without_name_is_a_usage_error() {
    let output = binary_output(env!("CARGO_BIN_EXE_oc-setfattr"), &["-v", "1", "f"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_utf8(&output).contains("Usage: oc-setfattr"));
}

#[test]
fn setfattr_name_with_remove_is_a_usage_error() {
    let output = binary_output(
        env!("CARGO_BIN_EXE_oc-setfattr"),
        &["-n", "user.a", "-x", "user.a", "f"],
    );
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn attr_usage_errors_exit_one() {
    let output = binary_output(env!("CARGO_BIN_EXE_oc-attr"), &["-g", "a", "-l", "f"]);
    assert_eq!(output.status.code(), Some(1));
    let combined = combined_utf8(&output);
    assert!(combined.starts_with("Only one of -s, -g, -r, or -l allowed\n"));
    assert!(combined.contains("# list attrs"));
}

#[test]
fn missing_file_exits_one() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("absent");
    let missing = missing.to_str().expect("UTF-8 path");
    let output = binary_output(env!("CARGO_BIN_EXE_oc-getfattr"), &["-d", missing]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).expect("stderr is UTF-8");
    assert!(stderr.starts_with(&format!("oc-getfattr: {missing}: ")));
}

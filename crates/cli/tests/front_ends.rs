use std::ffi::OsStr;
use std::io::Cursor;
use std::path::Path;

use metadata::{AttributeAccess, FsAttributes};
use test_support::{Scratch, write_file};

fn getfattr(args: &[&OsStr]) -> (i32, Vec<u8>, String) {
    let mut full: Vec<&OsStr> = vec![OsStr::new("oc-getfattr")];
    full.extend_from_slice(args);
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let status = cli::getfattr::run(full, &mut stdout, &mut stderr);
    (status, stdout, String::from_utf8_lossy(&stderr).into_owned())
}

fn setfattr(args: &[&OsStr], input: &[u8]) -> (i32, String) {
    let mut full: Vec<&OsStr> = vec![OsStr::new("oc-setfattr")];
    full.extend_from_slice(args);
    let mut stdin = Cursor::new(input.to_vec());
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let status = cli::setfattr::run(full, &mut stdin, &mut stdout, &mut stderr);
    (status, String::from_utf8_lossy(&stderr).into_owned())
}

fn attribute(path: &Path, name: &str) -> Option<Vec<u8>> {
    FsAttributes.get(path, OsStr::new(name), false).ok()
}

#[test]
fn dump_then_restore_onto_a_fresh_tree() {
    let source = Scratch::with_file("top").unwrap();
    if !source.supports_xattrs() {
        return;
    }
    let nested = write_file(source.dir(), "sub/inner", b"data").unwrap();
    FsAttributes
        .set(source.file(), OsStr::new("user.a"), b"hello", false)
        .unwrap();
    FsAttributes
        .set(&nested, OsStr::new("user.b"), b"\x00\xff", false)
        .unwrap();

    let (status, dump, stderr) = getfattr(&[
        OsStr::new("-R"),
        OsStr::new("-a"),
        OsStr::new("-d"),
        OsStr::new("-e"),
        OsStr::new("base64"),
        source.dir().as_os_str(),
    ]);
    assert_eq!(status, 0, "{stderr}");
    let text = String::from_utf8(dump.clone()).unwrap();
    assert!(text.contains("user.a=0saGVsbG8=\n"), "{text}");
    assert!(text.contains("user.b=0sAP8=\n"), "{text}");

    FsAttributes
        .remove(source.file(), OsStr::new("user.a"), false)
        .unwrap();
    FsAttributes.remove(&nested, OsStr::new("user.b"), false).unwrap();

    let (status, stderr) = setfattr(&[OsStr::new("-B"), OsStr::new("-")], &dump);
    assert_eq!(status, 0, "{stderr}");

    assert_eq!(attribute(source.file(), "user.a").unwrap(), b"hello");
    assert_eq!(attribute(&nested, "user.b").unwrap(), b"\x00\xff");
}

#[test]
fn match_pattern_selects_names() {
    let scratch = Scratch::with_file("f").unwrap();
    if !scratch.supports_xattrs() {
        return;
    }
    for name in ["user.keep.one", "user.drop", "user.keep.two"] {
        FsAttributes.set(scratch.file(), OsStr::new(name), b"", false).unwrap();
    }
    let (status, stdout, _) = getfattr(&[
        OsStr::new("-a"),
        OsStr::new("-r"),
        OsStr::new(r"^user\.keep"),
        scratch.file().as_os_str(),
    ]);
    assert_eq!(status, 0);
    let text = String::from_utf8(stdout).unwrap();
    let lines: Vec<&str> = text.lines().skip(1).filter(|line| !line.is_empty()).collect();
    assert_eq!(lines, ["user.keep.one", "user.keep.two"]);
}

#[test]
fn only_values_prints_raw_bytes() {
    let scratch = Scratch::with_file("f").unwrap();
    if !scratch.supports_xattrs() {
        return;
    }
    FsAttributes
        .set(scratch.file(), OsStr::new("user.raw"), b"\x01\x02", false)
        .unwrap();
    let (status, stdout, _) = getfattr(&[
        OsStr::new("-n"),
        OsStr::new("user.raw"),
        OsStr::new("--only-values"),
        scratch.file().as_os_str(),
    ]);
    assert_eq!(status, 0);
    assert_eq!(stdout, b"\x01\x02");
}

#[test]
fn missing_named_attribute_fails() {
    let scratch = Scratch::with_file("f").unwrap();
    let (status, stdout, stderr) = getfattr(&[
        OsStr::new("-n"),
        OsStr::new("user.absent"),
        scratch.file().as_os_str(),
    ]);
    assert_eq!(status, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("user.absent: "), "{stderr}");
}

#[test]
fn restore_reports_bad_header_and_applies_nothing() {
    let scratch = Scratch::with_file("f").unwrap();
    let dump = format!("user.a=\"1\"\n# file: {}\nuser.b=\"2\"\n", scratch.file().display());
    let (status, stderr) = setfattr(&[OsStr::new("-B"), OsStr::new("-")], dump.as_bytes());
    assert_eq!(status, 1);
    assert_eq!(
        stderr,
        "oc-setfattr: No filename found in line 1 of standard input, aborting\n"
    );
    assert_eq!(attribute(scratch.file(), "user.b"), None);
}

#[test]
fn trusted_namespace_needs_privilege() {
    if metadata::running_as_root() {
        return;
    }
    let scratch = Scratch::with_file("f").unwrap();
    let file = scratch.file().as_os_str();
    let args = ["oc-attr", "-R", "-s", "t", "-V", "v"].map(OsStr::new);
    let mut full: Vec<&OsStr> = args.to_vec();
    full.push(file);
    let mut stdin: &[u8] = b"";
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let status = cli::attr::run(full, &mut stdin, &mut stdout, &mut stderr);
    assert_eq!(status, 1);
    assert!(stdout.is_empty());
    let stderr = String::from_utf8(stderr).unwrap();
    assert!(stderr.starts_with("attr_set: "), "{stderr}");
    assert!(stderr.ends_with(&format!("Could not set \"t\" for {}\n", scratch.file().display())));
}

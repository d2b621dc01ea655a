//! `oc-attr`: IRIX-style single-attribute front end.
//!
//! Names given on the command line are relative to the `user.` namespace, or
//! to `trusted.` with `-R`. Symbolic links are not followed unless `-L` is
//! given. Usage errors exit with status 1, like every other failure.

use crate::common::{clap_message, collect_args, program_name};
use crate::env;
use crate::exit_code::ExitCode;
use clap::builder::OsStringValueParser;
use clap::{Arg, ArgAction, Command};
use metadata::namespace::{Namespace, qualify, strip};
use metadata::{AttributeAccess, FsAttributes, MetadataError};
use std::ffi::OsString;
use std::io::{Read, Write};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

const PROGRAM: &str = "oc-attr";

/// Largest value `-s` reads from standard input.
pub const MAX_VALUE_LEN: u64 = 65536;

#[derive(Debug, PartialEq, Eq)]
enum Operation {
    Set {
        name: OsString,
        value: Option<OsString>,
    },
    Get {
        name: OsString,
    },
    Remove {
        name: OsString,
    },
    List,
}

#[derive(Debug)]
struct Request {
    operation: Operation,
    path: PathBuf,
    follow: bool,
    namespace: Namespace,
    verbose: bool,
    debug: Option<String>,
}

fn clap_command() -> Command {
    Command::new(PROGRAM)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("set")
                .short('s')
                .value_name("ATTRNAME")
                .action(ArgAction::Append)
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("value")
                .short('V')
                .value_name("ATTRVALUE")
                .action(ArgAction::Append)
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("get")
                .short('g')
                .value_name("ATTRNAME")
                .action(ArgAction::Append)
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("remove")
                .short('r')
                .value_name("ATTRNAME")
                .action(ArgAction::Append)
                .value_parser(OsStringValueParser::new()),
        )
        .arg(Arg::new("list").short('l').action(ArgAction::Count))
        .arg(Arg::new("follow").short('L').action(ArgAction::SetTrue))
        .arg(Arg::new("root").short('R').action(ArgAction::SetTrue))
        .arg(Arg::new("quiet").short('q').action(ArgAction::SetTrue))
        .arg(Arg::new("debug").long("debug").value_name("FLAGS"))
        .arg(
            Arg::new("paths")
                .value_name("PATHNAME")
                .num_args(0..)
                .action(ArgAction::Append)
                .value_parser(OsStringValueParser::new()),
        )
}

/// Parses the command line. `Err` carries the message printed before the
/// usage text.
fn parse_args(args: Vec<OsString>) -> Result<Request, String> {
    let mut matches = clap_command()
        .try_get_matches_from(args)
        .map_err(|error| clap_message(&error))?;

    let mut last = |id: &str| {
        matches
            .remove_many::<OsString>(id)
            .and_then(Iterator::last)
    };
    let set = last("set");
    let value = last("value");
    let get = last("get");
    let remove = last("remove");
    let list = matches.get_count("list") > 0;

    let chosen = [set.is_some(), get.is_some(), remove.is_some(), list]
        .into_iter()
        .filter(|&present| present)
        .count();
    if chosen > 1 {
        return Err("Only one of -s, -g, -r, or -l allowed".to_string());
    }
    if value.is_some() && set.is_none() {
        return Err("-V only allowed with -s".to_string());
    }

    let mut paths: Vec<OsString> = matches
        .remove_many::<OsString>("paths")
        .map(Iterator::collect)
        .unwrap_or_default();
    if paths.len() != 1 {
        return Err("A filename to operate on is required".to_string());
    }
    let path = PathBuf::from(paths.remove(0));

    let operation = if let Some(name) = set {
        Operation::Set { name, value }
    } else if let Some(name) = get {
        Operation::Get { name }
    } else if let Some(name) = remove {
        Operation::Remove { name }
    } else if list {
        Operation::List
    } else {
        return Err("At least one of -s, -g, -r, or -l is required".to_string());
    };

    Ok(Request {
        operation,
        path,
        follow: matches.get_flag("follow"),
        namespace: if matches.get_flag("root") {
            Namespace::Trusted
        } else {
            Namespace::User
        },
        verbose: !matches.get_flag("quiet"),
        debug: matches.remove_one::<String>("debug"),
    })
}

fn write_usage<W: Write + ?Sized>(stderr: &mut W, program: &str) {
    let _ = write!(
        stderr,
        "Usage: {program} [-LRq] -s attrname [-V attrvalue] pathname  # set value
       {program} [-LRq] -g attrname pathname                 # get value
       {program} [-LRq] -r attrname pathname                 # remove attr
       {program} [-LRq] -l pathname                          # list attrs
      -s reads a value from stdin and -g writes a value to stdout
"
    );
}

/// Writes `attr_op: message` followed by the `Could not ...` line.
fn report_failure<W: Write + ?Sized>(
    stderr: &mut W,
    operation: &str,
    error: &MetadataError,
    what: &str,
    path: &Path,
) {
    let _ = writeln!(stderr, "{operation}: {}", error.message());
    let _ = write!(stderr, "Could not {what} for ");
    let _ = stderr.write_all(path.as_os_str().as_bytes());
    let _ = stderr.write_all(b"\n");
}

fn write_line<W: Write + ?Sized>(out: &mut W, parts: &[&[u8]]) -> std::io::Result<()> {
    for part in parts {
        out.write_all(part)?;
    }
    out.write_all(b"\n")
}

fn execute<A, In, Out, Err>(
    request: &Request,
    access: &A,
    stdin: &mut In,
    stdout: &mut Out,
    stderr: &mut Err,
) -> ExitCode
where
    A: AttributeAccess + ?Sized,
    In: Read,
    Out: Write,
    Err: Write,
{
    let path = request.path.as_path();
    let file = path.as_os_str().as_bytes();
    let follow = request.follow;
    let namespace = request.namespace;

    match &request.operation {
        Operation::Set { name, value } => {
            let value = match value {
                Some(value) => value.as_bytes().to_vec(),
                None => {
                    let mut buffer = Vec::new();
                    if let Err(error) = stdin.take(MAX_VALUE_LEN).read_to_end(&mut buffer) {
                        let _ = writeln!(stderr, "read: {error}");
                        return ExitCode::Failure;
                    }
                    buffer
                }
            };
            if let Err(error) = access.set(path, &qualify(namespace, name), &value, follow) {
                let what = format!("set \"{}\"", name.to_string_lossy());
                report_failure(stderr, "attr_set", &error, &what, path);
                return ExitCode::Failure;
            }
            if request.verbose {
                let heading = format!(
                    "Attribute \"{}\" set to a {} byte value for ",
                    name.to_string_lossy(),
                    value.len()
                );
                let _ = write_line(stdout, &[heading.as_bytes(), file, b":"]);
                let _ = write_line(stdout, &[&value]);
            }
            ExitCode::Success
        }
        Operation::Get { name } => {
            let value = match access.get(path, &qualify(namespace, name), follow) {
                Ok(value) => value,
                Err(error) => {
                    let what = format!("get \"{}\"", name.to_string_lossy());
                    report_failure(stderr, "attr_get", &error, &what, path);
                    return ExitCode::Failure;
                }
            };
            if request.verbose {
                let heading = format!(
                    "Attribute \"{}\" had a {} byte value for ",
                    name.to_string_lossy(),
                    value.len()
                );
                let _ = write_line(stdout, &[heading.as_bytes(), file, b":"]);
                let _ = write_line(stdout, &[&value]);
            } else {
                let _ = stdout.write_all(&value);
            }
            ExitCode::Success
        }
        Operation::Remove { name } => {
            if let Err(error) = access.remove(path, &qualify(namespace, name), follow) {
                let what = format!("remove \"{}\"", name.to_string_lossy());
                report_failure(stderr, "attr_remove", &error, &what, path);
                return ExitCode::Failure;
            }
            ExitCode::Success
        }
        Operation::List => {
            let mut names = match access.list(path, follow) {
                Ok(names) => names,
                Err(error) => {
                    report_failure(stderr, "attr_list", &error, "list attributes", path);
                    return ExitCode::Failure;
                }
            };
            names.sort();
            let mut failures = 0;
            for full in names {
                let Some(short) = strip(namespace, &full) else {
                    continue;
                };
                if !request.verbose {
                    let _ = write_line(stdout, &[short.as_bytes()]);
                    continue;
                }
                match access.get(path, &full, follow) {
                    Ok(value) => {
                        let heading = format!(
                            "Attribute \"{}\" has a {} byte value for ",
                            short.to_string_lossy(),
                            value.len()
                        );
                        let _ = write_line(stdout, &[heading.as_bytes(), file]);
                    }
                    Err(error) => {
                        let what = format!("get \"{}\"", short.to_string_lossy());
                        report_failure(stderr, "attr_get", &error, &what, path);
                        failures += 1;
                    }
                }
            }
            ExitCode::from_failures(failures)
        }
    }
}

/// Runs `oc-attr` with the given arguments (including `argv[0]`).
///
/// `stdin` supplies the value for `-s` when `-V` is absent. Returns 0 on
/// success and 1 on any failure, including usage errors.
pub fn run<I, S, In, Out, Err>(
    arguments: I,
    stdin: &mut In,
    stdout: &mut Out,
    stderr: &mut Err,
) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    In: Read,
    Out: Write,
    Err: Write,
{
    let args = collect_args(arguments, PROGRAM);
    let program = program_name(&args, PROGRAM);

    let request = match parse_args(args) {
        Ok(request) => request,
        Err(message) => {
            let _ = writeln!(stderr, "{message}");
            write_usage(stderr, &program);
            return ExitCode::Failure.as_i32();
        }
    };

    if let Err(message) = env::setup(request.debug.as_deref()) {
        let _ = writeln!(stderr, "{program}: {message}");
        write_usage(stderr, &program);
        return ExitCode::Failure.as_i32();
    }

    let status = execute(&request, &FsAttributes, stdin, stdout, stderr);
    let _ = stdout.flush();
    env::flush(&program, stderr);
    status.as_i32()
}

#[cfg(test)]
mod tests {
    use super::*;
    use metadata::MemoryAttributes;
    use std::ffi::OsStr;

    fn parse(args: &[&str]) -> Result<Request, String> {
        let mut full = vec![OsString::from(PROGRAM)];
        full.extend(args.iter().map(OsString::from));
        parse_args(full)
    }

    fn exec(args: &[&str], store: &MemoryAttributes, input: &[u8]) -> (ExitCode, Vec<u8>, String) {
        let request = parse(args).expect("arguments parse");
        let mut stdin = input;
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let status = execute(&request, store, &mut stdin, &mut stdout, &mut stderr);
        (status, stdout, String::from_utf8(stderr).unwrap())
    }

    #[test]
    fn operation_conflicts() {
        assert_eq!(
            parse(&["-s", "a", "-g", "b", "f"]).unwrap_err(),
            "Only one of -s, -g, -r, or -l allowed"
        );
        assert_eq!(parse(&["-l", "-r", "a", "f"]).unwrap_err(), "Only one of -s, -g, -r, or -l allowed");
        assert_eq!(parse(&["-g", "a", "-V", "x", "f"]).unwrap_err(), "-V only allowed with -s");
        assert_eq!(parse(&["-g", "a"]).unwrap_err(), "A filename to operate on is required");
        assert_eq!(
            parse(&["-g", "a", "f", "g"]).unwrap_err(),
            "A filename to operate on is required"
        );
        assert_eq!(
            parse(&["f"]).unwrap_err(),
            "At least one of -s, -g, -r, or -l is required"
        );
    }

    #[test]
    fn defaults_and_flags() {
        let request = parse(&["-g", "a", "f"]).unwrap();
        assert!(!request.follow);
        assert!(request.verbose);
        assert_eq!(request.namespace, Namespace::User);

        let request = parse(&["-LRq", "-l", "f"]).unwrap();
        assert!(request.follow);
        assert!(!request.verbose);
        assert_eq!(request.namespace, Namespace::Trusted);
        assert_eq!(request.operation, Operation::List);
    }

    #[test]
    fn usage_errors_exit_one() {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let status = run(["oc-attr", "-l"], &mut &b""[..], &mut stdout, &mut stderr);
        assert_eq!(status, 1);
        let stderr = String::from_utf8(stderr).unwrap();
        assert!(stderr.starts_with("A filename to operate on is required\nUsage: oc-attr [-LRq]"));
        assert!(stderr.ends_with("-g writes a value to stdout\n"));
    }

    #[test]
    fn set_from_argument_is_namespaced() {
        let store = MemoryAttributes::new();
        let (status, stdout, _) = exec(&["-s", "color", "-V", "blue", "f"], &store, b"");
        assert_eq!(status, ExitCode::Success);
        assert_eq!(
            String::from_utf8(stdout).unwrap(),
            "Attribute \"color\" set to a 4 byte value for f:\nblue\n"
        );
        assert_eq!(store.attributes("f")[OsStr::new("user.color")], b"blue");
        assert_eq!(store.follows(), [(PathBuf::from("f"), false)]);
    }

    #[test]
    fn set_reads_stdin_when_value_missing() {
        let store = MemoryAttributes::new();
        let (status, stdout, _) = exec(&["-R", "-q", "-s", "k", "f"], &store, b"\x00raw");
        assert_eq!(status, ExitCode::Success);
        assert!(stdout.is_empty());
        assert_eq!(store.attributes("f")[OsStr::new("trusted.k")], b"\x00raw");
    }

    #[test]
    fn stdin_value_is_capped() {
        let store = MemoryAttributes::new();
        let input = vec![b'x'; 70_000];
        let (status, _, _) = exec(&["-q", "-s", "big", "f"], &store, &input);
        assert_eq!(status, ExitCode::Success);
        assert_eq!(store.attributes("f")[OsStr::new("user.big")].len(), 65536);
    }

    #[test]
    fn get_verbose_and_quiet() {
        let store = MemoryAttributes::new();
        store.insert("f", "user.a", b"xyz");

        let (_, stdout, _) = exec(&["-g", "a", "f"], &store, b"");
        assert_eq!(stdout, b"Attribute \"a\" had a 3 byte value for f:\nxyz\n");

        let (_, stdout, _) = exec(&["-q", "-g", "a", "f"], &store, b"");
        assert_eq!(stdout, b"xyz");
    }

    #[test]
    fn get_missing_reports_two_lines() {
        let store = MemoryAttributes::new();
        let (status, stdout, stderr) = exec(&["-g", "nope", "f"], &store, b"");
        assert_eq!(status, ExitCode::Failure);
        assert!(stdout.is_empty());
        assert_eq!(stderr, "attr_get: No such attribute\nCould not get \"nope\" for f\n");
    }

    #[test]
    fn remove_deletes() {
        let store = MemoryAttributes::new();
        store.insert("f", "user.a", b"1");
        let (status, _, _) = exec(&["-r", "a", "f"], &store, b"");
        assert_eq!(status, ExitCode::Success);
        assert!(store.attributes("f").is_empty());

        let (status, _, stderr) = exec(&["-r", "a", "f"], &store, b"");
        assert_eq!(status, ExitCode::Failure);
        assert!(stderr.ends_with("Could not remove \"a\" for f\n"));
    }

    #[test]
    fn list_shows_namespace_members_only() {
        let store = MemoryAttributes::new();
        store.insert("f", "user.b", b"22");
        store.insert("f", "user.a", b"1");
        store.insert("f", "trusted.t", b"333");

        let (status, stdout, _) = exec(&["-l", "f"], &store, b"");
        assert_eq!(status, ExitCode::Success);
        assert_eq!(
            String::from_utf8(stdout).unwrap(),
            "Attribute \"a\" has a 1 byte value for f\nAttribute \"b\" has a 2 byte value for f\n"
        );

        let (_, stdout, _) = exec(&["-R", "-q", "-l", "f"], &store, b"");
        assert_eq!(stdout, b"t\n");
    }

    #[test]
    fn list_failure() {
        let store = MemoryAttributes::new();
        store.fail("f", None, libc::EACCES);
        let (status, _, stderr) = exec(&["-l", "f"], &store, b"");
        assert_eq!(status, ExitCode::Failure);
        assert!(stderr.starts_with("attr_list: "));
        assert!(stderr.ends_with("Could not list attributes for f\n"));
    }
}

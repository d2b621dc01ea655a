//! `oc-setfattr`: set, remove and restore extended attributes.

use crate::common::{clap_message, collect_args, program_name, report};
use crate::env;
use crate::exit_code::ExitCode;
use clap::builder::OsStringValueParser;
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command};
use dump::{RestoreError, RestoreOptions, restore};
use metadata::{AttributeAccess, FsAttributes};
use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

const PROGRAM: &str = "oc-setfattr";
const SYNOPSIS_SET: &str = "{-n name|-x name} [-v value] [-hV] file...";
const SYNOPSIS_RESTORE: &str = "{-B filename} [-hV]";

#[derive(Debug, PartialEq, Eq)]
enum Action {
    Set {
        name: OsString,
        value: Option<OsString>,
    },
    Remove {
        name: OsString,
    },
    Restore {
        source: OsString,
    },
}

#[derive(Debug)]
struct ParsedArgs {
    show_help: bool,
    show_version: bool,
    action: Option<Action>,
    follow: bool,
    debug: Option<String>,
    files: Vec<PathBuf>,
}

fn clap_command() -> Command {
    Command::new(PROGRAM)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("help")
                .long("help")
                .help("Show this help text and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .short('V')
                .long("version")
                .help("Print the version and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("name")
                .short('n')
                .long("name")
                .value_name("NAME")
                .value_parser(OsStringValueParser::new())
                .conflicts_with("remove"),
        )
        .arg(
            Arg::new("value")
                .short('v')
                .long("value")
                .value_name("VALUE")
                .value_parser(OsStringValueParser::new())
                .requires("name"),
        )
        .arg(
            Arg::new("remove")
                .short('x')
                .long("remove")
                .value_name("NAME")
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("restore")
                .short('B')
                .long("restore")
                .value_name("FILE")
                .value_parser(OsStringValueParser::new())
                .conflicts_with_all(["name", "remove"]),
        )
        .arg(
            Arg::new("no-dereference")
                .short('h')
                .long("no-dereference")
                .short_alias('l')
                .action(ArgAction::SetTrue),
        )
        .arg(Arg::new("debug").long("debug").value_name("FLAGS"))
        .arg(
            Arg::new("files")
                .value_name("FILE")
                .num_args(0..)
                .action(ArgAction::Append)
                .value_parser(OsStringValueParser::new()),
        )
}

fn parse_args(args: Vec<OsString>) -> Result<ParsedArgs, clap::Error> {
    let mut matches = clap_command().try_get_matches_from(args)?;

    if matches.contains_id("value") && !matches.contains_id("name") {
        return Err(clap_command().error(
            ErrorKind::ArgumentConflict,
            "a value given with -v needs an attribute name given with -n",
        ));
    }

    let action = if let Some(source) = matches.remove_one::<OsString>("restore") {
        Some(Action::Restore { source })
    } else if let Some(name) = matches.remove_one::<OsString>("remove") {
        Some(Action::Remove { name })
    } else {
        matches
            .remove_one::<OsString>("name")
            .map(|name| Action::Set {
                name,
                value: matches.remove_one::<OsString>("value"),
            })
    };

    Ok(ParsedArgs {
        show_help: matches.get_flag("help"),
        show_version: matches.get_flag("version"),
        action,
        follow: !matches.get_flag("no-dereference"),
        debug: matches.remove_one::<String>("debug"),
        files: matches
            .remove_many::<OsString>("files")
            .map(|files| files.map(PathBuf::from).collect())
            .unwrap_or_default(),
    })
}

fn write_usage<W: Write + ?Sized>(stderr: &mut W, program: &str) {
    let _ = writeln!(stderr, "Usage: {program} {SYNOPSIS_SET}");
    let _ = writeln!(stderr, "       {program} {SYNOPSIS_RESTORE}");
    let _ = writeln!(stderr, "Try `{program} --help' for more information.");
}

fn render_help(program: &str) -> String {
    format!(
        "{program} {version} -- set extended attributes
Usage: {program} {SYNOPSIS_SET}
       {program} {SYNOPSIS_RESTORE}
  -n, --name=NAME          set value of extended attribute NAME
  -v, --value=VALUE        value for the attribute named with -n
  -x, --remove=NAME        remove extended attribute NAME
  -B, --restore=FILE       restore extended attributes from FILE ('-' is stdin)
  -h, --no-dereference     do not dereference symbolic links
      --debug=FLAGS        debug output (walk, xattr, codec, restore, all)
  -V, --version            print version and exit
      --help               this help text
",
        version = env!("CARGO_PKG_VERSION"),
    )
}

/// Runs `oc-setfattr` with the given arguments (including `argv[0]`).
///
/// `stdin` supplies the dump for `-B -`. Returns 0 on success, 1 when any
/// file failed or a restore aborted, and 2 on a usage error.
pub fn run<I, S, In, Out, Err>(
    arguments: I,
    stdin: &mut In,
    stdout: &mut Out,
    stderr: &mut Err,
) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    In: BufRead,
    Out: Write,
    Err: Write,
{
    let args = collect_args(arguments, PROGRAM);
    let program = program_name(&args, PROGRAM);

    let parsed = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(error) => {
            let _ = writeln!(stderr, "{program}: {}", clap_message(&error));
            write_usage(stderr, &program);
            return ExitCode::Usage.as_i32();
        }
    };

    if parsed.show_help {
        let _ = stdout.write_all(render_help(&program).as_bytes());
        return ExitCode::Success.as_i32();
    }
    if parsed.show_version {
        let _ = writeln!(stdout, "{program} {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::Success.as_i32();
    }

    let action = match parsed.action {
        Some(Action::Restore { .. }) if !parsed.files.is_empty() => None,
        Some(action @ Action::Restore { .. }) => Some(action),
        Some(_) if parsed.files.is_empty() => None,
        other => other,
    };
    let Some(action) = action else {
        write_usage(stderr, &program);
        return ExitCode::Usage.as_i32();
    };

    if let Err(message) = env::setup(parsed.debug.as_deref()) {
        let _ = writeln!(stderr, "{program}: {message}");
        write_usage(stderr, &program);
        return ExitCode::Usage.as_i32();
    }

    let status = match action {
        Action::Restore { source } => {
            let options = RestoreOptions {
                follow: parsed.follow,
                program: program.clone(),
            };
            run_restore(&source, stdin, &FsAttributes, &options, stderr)
        }
        Action::Set { name, value } => {
            let value = match value.as_deref().map(|raw| codec::decode(raw.as_bytes())) {
                None => Vec::new(),
                Some(Ok(value)) => value,
                Some(Err(error)) => {
                    let _ = writeln!(stderr, "{program}: {error}");
                    env::flush(&program, stderr);
                    return ExitCode::Failure.as_i32();
                }
            };
            let mut failures = 0;
            for file in &parsed.files {
                if let Err(error) = FsAttributes.set(file, &name, &value, parsed.follow) {
                    report(stderr, &program, file, &error.message());
                    failures += 1;
                }
            }
            ExitCode::from_failures(failures)
        }
        Action::Remove { name } => {
            let mut failures = 0;
            for file in &parsed.files {
                if let Err(error) = FsAttributes.remove(file, &name, parsed.follow) {
                    report(stderr, &program, file, &error.message());
                    failures += 1;
                }
            }
            ExitCode::from_failures(failures)
        }
    };

    env::flush(&program, stderr);
    status.as_i32()
}

/// Restores a dump read from `source`, or from `stdin` when it is `-`.
fn run_restore<In, A, Err>(
    source: &OsStr,
    stdin: &mut In,
    access: &A,
    options: &RestoreOptions,
    stderr: &mut Err,
) -> ExitCode
where
    In: BufRead,
    A: AttributeAccess + ?Sized,
    Err: Write,
{
    let from_stdin = source.as_bytes() == b"-";
    let result = if from_stdin {
        restore(stdin, access, options, stderr)
    } else {
        match File::open(source) {
            Ok(file) => restore(BufReader::new(file), access, options, stderr),
            Err(error) => {
                report(stderr, &options.program, Path::new(source), &error.to_string());
                return ExitCode::Failure;
            }
        }
    };

    match result {
        Ok(failures) => ExitCode::from_failures(failures),
        Err(RestoreError::MissingHeader { line }) => {
            let program = &options.program;
            if from_stdin {
                let _ = writeln!(
                    stderr,
                    "{program}: No filename found in line {line} of standard input, aborting"
                );
            } else {
                let _ = write!(stderr, "{program}: ");
                let _ = stderr.write_all(source.as_bytes());
                let _ = writeln!(stderr, ": No filename found in line {line}, aborting");
            }
            ExitCode::Failure
        }
        Err(error) => {
            report(stderr, &options.program, Path::new(source), &error.to_string());
            ExitCode::Failure
        }
    }
}

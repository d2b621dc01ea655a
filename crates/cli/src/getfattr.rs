//! `oc-getfattr`: print extended attributes of files and trees.

use crate::common::{clap_message, collect_args, program_name};
use crate::env;
use crate::exit_code::ExitCode;
use clap::builder::{OsStringValueParser, PossibleValuesParser};
use clap::{Arg, ArgAction, Command};
use codec::Encoding;
use dump::{DumpOptions, Dumper, PatternFilter};
use metadata::FsAttributes;
use std::ffi::OsString;
use std::io::Write;
use walk::{Order, SymlinkMode, TraversalPolicy, WalkBuilder};

const PROGRAM: &str = "oc-getfattr";
const SYNOPSIS: &str = "[-n name|-d] [-ahsvR5LPHV] [-e en] [-r regex] path...";

/// Which attribute names are printed.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Selection {
    User,
    SystemAndUser,
    Pattern(String),
}

#[derive(Debug)]
struct ParsedArgs {
    show_help: bool,
    show_version: bool,
    options: DumpOptions,
    selection: Selection,
    policy: TraversalPolicy,
    debug: Option<String>,
    paths: Vec<OsString>,
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
                .help("Dump the value of attribute NAME.")
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("dump")
                .short('d')
                .long("dump")
                .help("Dump all attribute values.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("encoding")
                .short('e')
                .long("encoding")
                .value_name("EN")
                .help("Encode values as text, hex or base64.")
                .value_parser(PossibleValuesParser::new(Encoding::ALL.map(Encoding::name))),
        )
        .arg(
            Arg::new("absolute-names")
                .short('a')
                .long("absolute-names")
                .help("Keep the leading '/' in path names.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-dereference")
                .short('h')
                .long("no-dereference")
                .short_alias('l')
                .help("Operate on symbolic links themselves.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("match")
                .short('r')
                .long("match")
                .value_name("REGEX")
                .help("Only include names matching REGEX ('-' matches all).")
                .overrides_with("system"),
        )
        .arg(
            Arg::new("system")
                .short('s')
                .help("Include system. as well as user. attributes.")
                .action(ArgAction::SetTrue)
                .overrides_with("match"),
        )
        .arg(
            Arg::new("only-values")
                .short('v')
                .long("only-values")
                .help("Print raw attribute values only.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("recursive")
                .short('R')
                .long("recursive")
                .help("Recurse into subdirectories.")
                .action(ArgAction::SetTrue)
                .overrides_with("postorder"),
        )
        .arg(
            Arg::new("postorder")
                .short('5')
                .long("postorder")
                .help("Recurse, visiting directory contents first.")
                .action(ArgAction::SetTrue)
                .overrides_with("recursive"),
        )
        .arg(
            Arg::new("logical")
                .short('L')
                .long("logical")
                .help("Logical walk: follow every symbolic link.")
                .action(ArgAction::SetTrue)
                .overrides_with_all(["physical", "half-logical"]),
        )
        .arg(
            Arg::new("physical")
                .short('P')
                .long("physical")
                .help("Physical walk: never follow symbolic links.")
                .action(ArgAction::SetTrue)
                .overrides_with_all(["logical", "half-logical"]),
        )
        .arg(
            Arg::new("half-logical")
                .short('H')
                .long("half-logical")
                .help("Follow symbolic links named on the command line only.")
                .action(ArgAction::SetTrue)
                .overrides_with_all(["logical", "physical"]),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .value_name("FLAGS")
                .help("Comma-separated debug flags (walk, xattr, codec, restore, all)."),
        )
        .arg(
            Arg::new("paths")
                .value_name("PATH")
                .num_args(0..)
                .action(ArgAction::Append)
                .value_parser(OsStringValueParser::new()),
        )
}

fn parse_args(args: Vec<OsString>) -> Result<ParsedArgs, clap::Error> {
    let mut matches = clap_command().try_get_matches_from(args)?;

    let encoding = match matches.remove_one::<String>("encoding") {
        Some(name) => Some(name.parse::<Encoding>().map_err(|error| {
            clap_command().error(clap::error::ErrorKind::InvalidValue, error.to_string())
        })?),
        None => None,
    };

    let selection = if let Some(pattern) = matches.remove_one::<String>("match") {
        Selection::Pattern(pattern)
    } else if matches.get_flag("system") {
        Selection::SystemAndUser
    } else {
        Selection::User
    };

    let symlink_mode = if matches.get_flag("logical") {
        SymlinkMode::FullLogical
    } else if matches.get_flag("physical") {
        SymlinkMode::Physical
    } else {
        SymlinkMode::HalfLogical
    };
    let postorder = matches.get_flag("postorder");
    let no_dereference = matches.get_flag("no-dereference");
    let policy = TraversalPolicy {
        recursive: postorder || matches.get_flag("recursive"),
        order: if postorder { Order::Postorder } else { Order::Preorder },
        symlink_mode,
        dereference: !no_dereference,
    };

    let name = matches.remove_one::<OsString>("name");
    let options = DumpOptions {
        encoding: encoding.unwrap_or_default(),
        dump_values: matches.get_flag("dump") || name.is_some() || encoding.is_some(),
        only_values: matches.get_flag("only-values"),
        absolute_names: matches.get_flag("absolute-names"),
        no_dereference,
        name,
        program: PROGRAM.to_string(),
    };

    Ok(ParsedArgs {
        show_help: matches.get_flag("help"),
        show_version: matches.get_flag("version"),
        options,
        selection,
        policy,
        debug: matches.remove_one::<String>("debug"),
        paths: matches
            .remove_many::<OsString>("paths")
            .map(Iterator::collect)
            .unwrap_or_default(),
    })
}

fn write_usage<W: Write + ?Sized>(stderr: &mut W, program: &str) {
    let _ = writeln!(stderr, "Usage: {program} {SYNOPSIS}");
    let _ = writeln!(stderr, "Try `{program} --help' for more information.");
}

fn render_help(program: &str) -> String {
    format!(
        "{program} {version} -- get extended attributes
Usage: {program} {SYNOPSIS}
  -n, --name=NAME          dump value of extended attribute NAME
  -d, --dump               dump all extended attribute values
  -e, --encoding=EN        encode values (EN = text|hex|base64)
  -r, --match=REGEX        only dump names matching REGEX ('-' matches all)
  -s                       dump system. and user. attributes
  -a, --absolute-names     absolute path names; leading '/' not stripped
  -h, --no-dereference     do not dereference symbolic links
  -v, --only-values        print the attribute values only
  -R, --recursive          recurse into subdirectories
  -5, --postorder          recurse, listing directory contents first
  -L, --logical            logical walk, follow symbolic links
  -P, --physical           physical walk, do not follow symbolic links
  -H, --half-logical       follow symbolic links named as arguments only
      --debug=FLAGS        debug output (walk, xattr, codec, restore, all)
  -V, --version            print version and exit
      --help               this help text
",
        version = env!("CARGO_PKG_VERSION"),
    )
}

/// Runs `oc-getfattr` with the given arguments (including `argv[0]`).
///
/// Returns 0 on success, 1 when any file or attribute failed, and 2 on a
/// usage error.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
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
    if parsed.paths.is_empty() {
        write_usage(stderr, &program);
        return ExitCode::Usage.as_i32();
    }

    if let Err(message) = env::setup(parsed.debug.as_deref()) {
        let _ = writeln!(stderr, "{program}: {message}");
        write_usage(stderr, &program);
        return ExitCode::Usage.as_i32();
    }

    let filter = match &parsed.selection {
        Selection::User => PatternFilter::user(),
        Selection::SystemAndUser => PatternFilter::system_and_user(),
        Selection::Pattern(pattern) => match PatternFilter::new(pattern) {
            Ok(filter) => filter,
            Err(_) => {
                let _ = writeln!(stderr, "{program}: invalid regular expression \"{pattern}\"");
                return ExitCode::Failure.as_i32();
            }
        },
    };

    let mut options = parsed.options;
    options.program.clone_from(&program);
    let mut failures = 0;
    {
        let mut dumper = Dumper::new(FsAttributes, filter, options, &mut *stdout, &mut *stderr);
        for path in parsed.paths {
            let walker = WalkBuilder::with_policy(path, parsed.policy).build();
            failures += walker.walk(|node| dumper.dump_node(node));
        }
    }
    let _ = stdout.flush();
    env::flush(&program, stderr);

    tracing::debug!(target: "fattr::walk", failures, "getfattr finished");
    ExitCode::from_failures(failures).as_i32()
}

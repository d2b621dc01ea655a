//! Pieces shared by the front ends.

use std::ffi::OsString;
use std::io::Write;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// Collects arguments, supplying `default` as `argv[0]` when none is given.
pub(crate) fn collect_args<I, S>(arguments: I, default: &str) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    if args.is_empty() {
        args.push(OsString::from(default));
    }
    args
}

/// The base name of `argv[0]`.
pub(crate) fn program_name(args: &[OsString], default: &str) -> String {
    args.first()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map_or_else(
            || default.to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
}

/// First line of a clap error, without its `error: ` prefix.
pub(crate) fn clap_message(error: &clap::Error) -> String {
    let rendered = error.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}

/// Writes `program: path: message`.
pub(crate) fn report<W: Write + ?Sized>(stderr: &mut W, program: &str, path: &Path, message: &str) {
    let _ = write!(stderr, "{program}: ");
    let _ = stderr.write_all(path.as_os_str().as_bytes());
    let _ = writeln!(stderr, ": {message}");
}

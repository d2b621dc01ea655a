use codec::{quote, unquote};
use logging::{trace_codec, trace_restore};
use metadata::AttributeAccess;
use std::ffi::OsString;
use std::io::{self, BufRead, Write};
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::PathBuf;
use thiserror::Error;

const HEADER: &[u8] = b"# file: ";

/// One `name[=value]` line of a dump, bound to the file of its block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestoreEntry {
    /// File named by the enclosing `# file:` header.
    pub path: PathBuf,
    /// Attribute name, unquoted.
    pub name: OsString,
    /// Encoded value text after `=`, if the line had one.
    pub raw_value: Option<Vec<u8>>,
    /// 1-based line number in the input.
    pub line: usize,
}

/// Fatal restore failures. Anything else is reported and skipped.
#[derive(Debug, Error)]
pub enum RestoreError {
    /// A block did not start with a `# file: ` header.
    #[error("No filename found in line {line}, aborting")]
    MissingHeader {
        /// Line holding the offending text.
        line: usize,
    },
    /// The input could not be read.
    #[error("error reading input: {0}")]
    Io(#[from] io::Error),
}

/// Streams [`RestoreEntry`] values out of dump text.
///
/// Blank lines separate blocks. Outside a block, the first non-blank line
/// must be a header; inside one, every line up to the next blank line is an
/// attribute. Parsing stops at the first error.
#[derive(Debug)]
pub struct RestoreEntries<R> {
    reader: R,
    line: usize,
    path: Option<PathBuf>,
    buf: Vec<u8>,
    done: bool,
}

impl<R: BufRead> RestoreEntries<R> {
    /// Starts parsing `reader`.
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            path: None,
            buf: Vec::new(),
            done: false,
        }
    }

    fn read_line(&mut self) -> io::Result<bool> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(false);
        }
        self.line += 1;
        while matches!(self.buf.last(), Some(b'\n' | b'\r')) {
            self.buf.pop();
        }
        Ok(true)
    }
}

impl<R: BufRead> Iterator for RestoreEntries<R> {
    type Item = Result<RestoreEntry, RestoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.read_line() {
                Ok(true) => {}
                Ok(false) => self.done = true,
                Err(error) => {
                    self.done = true;
                    return Some(Err(error.into()));
                }
            }
            if self.done {
                break;
            }

            let Some(path) = &self.path else {
                if self.buf.is_empty() {
                    continue;
                }
                let Some(quoted) = self.buf.strip_prefix(HEADER) else {
                    self.done = true;
                    return Some(Err(RestoreError::MissingHeader { line: self.line }));
                };
                let path = PathBuf::from(OsString::from_vec(unquote(quoted).into_owned()));
                trace_restore!("header for {} at line {}", path.display(), self.line);
                self.path = Some(path);
                continue;
            };

            if self.buf.is_empty() {
                self.path = None;
                continue;
            }

            let (name, raw_value) = match self.buf.iter().position(|&byte| byte == b'=') {
                Some(split) => (&self.buf[..split], Some(self.buf[split + 1..].to_vec())),
                None => (&self.buf[..], None),
            };
            return Some(Ok(RestoreEntry {
                path: path.clone(),
                name: OsString::from_vec(unquote(name).into_owned()),
                raw_value,
                line: self.line,
            }));
        }
        None
    }
}

/// How restored attributes are applied.
#[derive(Clone, Debug)]
pub struct RestoreOptions {
    /// Resolve symlinks named in headers.
    pub follow: bool,
    /// Prefix for diagnostics.
    pub program: String,
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self {
            follow: true,
            program: "setfattr".to_string(),
        }
    }
}

/// Applies every attribute in a dump through `access`.
///
/// Each entry is decoded and set as soon as it is parsed; a line without `=`
/// sets an empty value. Decode and set failures are written to `err` as
/// `program: path: message` and counted.
///
/// Returns the number of entries that could not be applied.
///
/// # Errors
///
/// Stops with [`RestoreError`] on a missing header or unreadable input.
/// Entries before that point have already been applied.
pub fn restore<R, A, E>(
    reader: R,
    access: &A,
    options: &RestoreOptions,
    err: &mut E,
) -> Result<usize, RestoreError>
where
    R: BufRead,
    A: AttributeAccess + ?Sized,
    E: Write + ?Sized,
{
    let mut failures = 0;
    for entry in RestoreEntries::new(reader) {
        let entry = entry?;
        let value = match entry.raw_value.as_deref().map(codec::decode) {
            None => Vec::new(),
            Some(Ok(value)) => value,
            Some(Err(error)) => {
                report(err, &options.program, &entry.path, &error.to_string());
                failures += 1;
                continue;
            }
        };
        trace_codec!(
            "line {}: {} decodes to {} bytes",
            entry.line,
            entry.name.to_string_lossy(),
            value.len()
        );
        if let Err(error) = access.set(&entry.path, &entry.name, &value, options.follow) {
            report(err, &options.program, &entry.path, &error.message());
            failures += 1;
        }
    }
    Ok(failures)
}

fn report<E: Write + ?Sized>(err: &mut E, program: &str, path: &std::path::Path, message: &str) {
    let _ = write!(err, "{program}: ");
    let _ = err.write_all(&quote(path.as_os_str().as_bytes(), b""));
    let _ = writeln!(err, ": {message}");
}

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Coarse classification of an attribute operation failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttrErrorKind {
    /// The named attribute does not exist (`ENODATA`/`ENOATTR`).
    NotFound,
    /// The caller lacks the privilege for this file or namespace.
    PermissionDenied,
    /// The attribute name or path exceeds a system limit.
    NameTooLong,
    /// The filesystem does not support extended attributes.
    Unsupported,
    /// Any other I/O failure, including a missing file.
    Io,
}

impl AttrErrorKind {
    /// Classifies an I/O error returned by an attribute system call.
    #[must_use]
    pub fn classify(error: &io::Error) -> Self {
        match error.raw_os_error() {
            Some(code) if code == NO_ATTRIBUTE => Self::NotFound,
            Some(code) if code == libc::ENOTSUP || code == libc::EOPNOTSUPP => Self::Unsupported,
            Some(libc::EACCES | libc::EPERM) => Self::PermissionDenied,
            Some(libc::ENAMETOOLONG) => Self::NameTooLong,
            Some(_) => Self::Io,
            None => match error.kind() {
                io::ErrorKind::PermissionDenied => Self::PermissionDenied,
                io::ErrorKind::Unsupported => Self::Unsupported,
                _ => Self::Io,
            },
        }
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
pub(crate) const NO_ATTRIBUTE: i32 = libc::ENODATA;
#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub(crate) const NO_ATTRIBUTE: i32 = libc::ENOATTR;

/// Error produced when an extended attribute operation fails.
#[derive(Debug)]
pub struct MetadataError {
    context: &'static str,
    path: PathBuf,
    name: Option<OsString>,
    kind: AttrErrorKind,
    source: io::Error,
}

impl MetadataError {
    /// Creates a new [`MetadataError`] from the supplied context, path, and source error.
    #[must_use]
    pub fn new(context: &'static str, path: &Path, source: io::Error) -> Self {
        Self {
            context,
            path: path.to_path_buf(),
            name: None,
            kind: AttrErrorKind::classify(&source),
            source,
        }
    }

    /// The error reported when a requested attribute is absent.
    #[must_use]
    pub fn missing(context: &'static str, path: &Path, name: &OsStr) -> Self {
        Self::new(context, path, io::Error::from_raw_os_error(NO_ATTRIBUTE)).with_name(name)
    }

    /// Attaches the attribute name the operation targeted.
    #[must_use]
    pub fn with_name(mut self, name: &OsStr) -> Self {
        self.name = Some(name.to_os_string());
        self
    }

    /// Returns the operation being performed when the error occurred.
    #[must_use]
    pub const fn context(&self) -> &'static str {
        self.context
    }

    /// Returns the path involved in the failing operation.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the attribute name, when the operation targeted one.
    #[must_use]
    pub fn name(&self) -> Option<&OsStr> {
        self.name.as_deref()
    }

    /// Returns the classified failure kind.
    #[must_use]
    pub const fn kind(&self) -> AttrErrorKind {
        self.kind
    }

    /// Returns the underlying [`io::Error`] that triggered this failure.
    #[must_use]
    pub fn source_error(&self) -> &io::Error {
        &self.source
    }

    /// Short system message suitable for `program: path: message` diagnostics.
    #[must_use]
    pub fn message(&self) -> String {
        if self.kind == AttrErrorKind::NotFound {
            return "No such attribute".to_string();
        }
        let text = self.source.to_string();
        match text.rfind(" (os error ") {
            Some(cut) => text[..cut].to_string(),
            None => text,
        }
    }

    /// Consumes the error and returns its constituent parts.
    #[must_use]
    pub fn into_parts(self) -> (&'static str, PathBuf, Option<OsString>, io::Error) {
        (self.context, self.path, self.name, self.source)
    }
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(
                f,
                "failed to {} '{}' on '{}': {}",
                self.context,
                name.to_string_lossy(),
                self.path.display(),
                self.message()
            ),
            None => write!(
                f,
                "failed to {} '{}': {}",
                self.context,
                self.path.display(),
                self.message()
            ),
        }
    }
}

impl std::error::Error for MetadataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Failure attached to a walk node.
#[derive(Debug)]
pub struct WalkError {
    kind: WalkErrorKind,
}

impl WalkError {
    pub(crate) fn new(kind: WalkErrorKind) -> Self {
        Self { kind }
    }

    pub(crate) fn name_too_long(path: PathBuf) -> Self {
        Self::new(WalkErrorKind::NameTooLong { path })
    }

    pub(crate) fn metadata(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::Metadata { path, source })
    }

    pub(crate) fn target(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::Target { path, source })
    }

    pub(crate) fn read_dir(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::ReadDir { path, source })
    }

    pub(crate) fn read_dir_entry(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::ReadDirEntry { path, source })
    }

    pub(crate) fn symlink_loop(path: PathBuf) -> Self {
        Self::new(WalkErrorKind::Loop { path })
    }

    /// Returns the specific failure.
    #[must_use]
    pub fn kind(&self) -> &WalkErrorKind {
        &self.kind
    }

    /// Returns the filesystem path associated with the error.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.kind.path()
    }

    /// The system message alone, as printed after `program: path: `.
    ///
    /// # Examples
    ///
    /// ```
    /// use walk::WalkBuilder;
    ///
    /// let count = WalkBuilder::new("./definitely_missing_root")
    ///     .build()
    ///     .walk(|node| {
    ///         let error = node.error().unwrap();
    ///         assert!(error.message().starts_with("No such file"));
    ///         assert!(error.path().ends_with("definitely_missing_root"));
    ///         1
    ///     });
    /// assert_eq!(count, 1);
    /// ```
    #[must_use]
    pub fn message(&self) -> String {
        match &self.kind {
            WalkErrorKind::NameTooLong { .. } => "File name too long".to_string(),
            WalkErrorKind::Loop { .. } => "Too many levels of symbolic links".to_string(),
            WalkErrorKind::Metadata { source, .. }
            | WalkErrorKind::Target { source, .. }
            | WalkErrorKind::ReadDir { source, .. }
            | WalkErrorKind::ReadDirEntry { source, .. } => {
                let text = source.to_string();
                match text.rfind(" (os error ") {
                    Some(cut) => text[..cut].to_string(),
                    None => text,
                }
            }
        }
    }
}

impl fmt::Display for WalkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WalkErrorKind::NameTooLong { path } => {
                write!(f, "path '{}' exceeds the length limit", path.display())
            }
            WalkErrorKind::Metadata { path, source } => {
                write!(
                    f,
                    "failed to inspect metadata for '{}': {}",
                    path.display(),
                    source
                )
            }
            WalkErrorKind::Target { path, source } => {
                write!(
                    f,
                    "failed to resolve symlink '{}': {}",
                    path.display(),
                    source
                )
            }
            WalkErrorKind::ReadDir { path, source } => {
                write!(
                    f,
                    "failed to read directory '{}': {}",
                    path.display(),
                    source
                )
            }
            WalkErrorKind::ReadDirEntry { path, source } => {
                write!(
                    f,
                    "failed to read entry in '{}': {}",
                    path.display(),
                    source
                )
            }
            WalkErrorKind::Loop { path } => {
                write!(
                    f,
                    "symlink '{}' leads back to a directory being walked",
                    path.display()
                )
            }
        }
    }
}

impl Error for WalkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            WalkErrorKind::Metadata { source, .. }
            | WalkErrorKind::Target { source, .. }
            | WalkErrorKind::ReadDir { source, .. }
            | WalkErrorKind::ReadDirEntry { source, .. } => Some(source),
            WalkErrorKind::NameTooLong { .. } | WalkErrorKind::Loop { .. } => None,
        }
    }
}

/// Classification of walk failures.
#[derive(Debug)]
pub enum WalkErrorKind {
    /// The path reached the length ceiling and was not accessed.
    NameTooLong {
        /// The over-long path.
        path: PathBuf,
    },
    /// `lstat` failed.
    Metadata {
        /// Path whose metadata could not be retrieved.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// A followed symlink could not be resolved.
    Target {
        /// The symlink.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// Failed to open a directory.
    ReadDir {
        /// Directory whose contents could not be read.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// Failed to obtain a directory entry during iteration.
    ReadDirEntry {
        /// Directory containing the problematic entry.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// A followed symlink resolves to one of its own ancestors.
    Loop {
        /// The symlink.
        path: PathBuf,
    },
}

impl WalkErrorKind {
    /// Returns the filesystem path tied to the failure.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NameTooLong { path }
            | Self::Metadata { path, .. }
            | Self::Target { path, .. }
            | Self::ReadDir { path, .. }
            | Self::ReadDirEntry { path, .. }
            | Self::Loop { path } => path,
        }
    }
}

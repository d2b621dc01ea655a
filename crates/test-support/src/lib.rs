//! Shared helpers for tests that touch real extended attributes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

const PROBE_NAME: &str = "user.test_support";

/// Checks whether `path` accepts `user.*` attributes.
///
/// Tests call this on their scratch file and return early when it is false,
/// since tmpfs and some container filesystems reject user attributes.
#[must_use]
pub fn xattrs_supported(path: &Path) -> bool {
    match xattr::set(path, PROBE_NAME, b"test") {
        Ok(()) => {
            let _ = xattr::remove(path, PROBE_NAME);
            true
        }
        Err(_) => false,
    }
}

/// A scratch directory paired with a file inside it.
pub struct Scratch {
    dir: TempDir,
    file: PathBuf,
}

impl Scratch {
    /// Creates a temporary directory holding an empty file named `name`.
    ///
    /// # Errors
    ///
    /// Propagates failures creating the directory or file.
    pub fn with_file(name: &str) -> io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join(name);
        fs::write(&file, b"")?;
        Ok(Self { dir, file })
    }

    /// The scratch directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// The file created by [`Scratch::with_file`].
    #[must_use]
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Whether the scratch filesystem supports `user.*` attributes.
    #[must_use]
    pub fn supports_xattrs(&self) -> bool {
        xattrs_supported(&self.file)
    }
}

/// Writes `contents` to `dir/relative`, creating parent directories.
///
/// # Errors
///
/// Propagates filesystem failures.
pub fn write_file(dir: &Path, relative: &str, contents: &[u8]) -> io::Result<PathBuf> {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, contents)?;
    Ok(path)
}

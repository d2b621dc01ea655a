use crate::error::WalkError;
use std::fs;
use std::path::{Path, PathBuf};

/// One filesystem object as seen by the walk visitor.
#[derive(Debug)]
pub struct WalkNode {
    pub(crate) path: PathBuf,
    pub(crate) metadata: Option<fs::Metadata>,
    pub(crate) depth: usize,
    pub(crate) symlink_not_followed: bool,
    pub(crate) error: Option<WalkError>,
}

impl WalkNode {
    pub(crate) fn ok(
        path: &Path,
        metadata: fs::Metadata,
        depth: usize,
        symlink_not_followed: bool,
    ) -> Self {
        Self {
            path: path.to_path_buf(),
            metadata: Some(metadata),
            depth,
            symlink_not_followed,
            error: None,
        }
    }

    pub(crate) fn failure(
        path: &Path,
        metadata: Option<fs::Metadata>,
        depth: usize,
        error: WalkError,
    ) -> Self {
        Self {
            path: path.to_path_buf(),
            metadata,
            depth,
            symlink_not_followed: false,
            error: Some(error),
        }
    }

    /// Path of the object, built from the root by joining names with `/`.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Metadata of the object, or of the link itself for unfollowed and
    /// non-dereferenced symlinks. `None` only for failed nodes.
    #[must_use]
    pub const fn metadata(&self) -> Option<&fs::Metadata> {
        self.metadata.as_ref()
    }

    /// Distance from the walk root, which has depth 1.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// True for a symlink the policy declined to resolve.
    #[must_use]
    pub const fn symlink_not_followed(&self) -> bool {
        self.symlink_not_followed
    }

    /// The failure attached to this node.
    #[must_use]
    pub const fn error(&self) -> Option<&WalkError> {
        self.error.as_ref()
    }

    /// Whether this node reports a failure.
    #[must_use]
    pub const fn failed(&self) -> bool {
        self.error.is_some()
    }
}

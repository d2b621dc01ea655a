use crate::policy::{Order, SymlinkMode, TraversalPolicy};
use crate::walker::Walker;
use std::path::PathBuf;

/// Configures a walk rooted at a specific path.
#[derive(Clone, Debug)]
pub struct WalkBuilder {
    root: PathBuf,
    policy: TraversalPolicy,
}

impl WalkBuilder {
    /// Creates a builder with the default [`TraversalPolicy`].
    #[must_use]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self::with_policy(root, TraversalPolicy::default())
    }

    /// Creates a builder starting from an existing policy.
    #[must_use]
    pub fn with_policy<P: Into<PathBuf>>(root: P, policy: TraversalPolicy) -> Self {
        Self {
            root: root.into(),
            policy,
        }
    }

    /// Descend into directories.
    #[must_use]
    pub const fn recursive(mut self, recursive: bool) -> Self {
        self.policy.recursive = recursive;
        self
    }

    /// Visit directories before or after their contents.
    #[must_use]
    pub const fn order(mut self, order: Order) -> Self {
        self.policy.order = order;
        self
    }

    /// Select which symlinks are followed.
    #[must_use]
    pub const fn symlink_mode(mut self, mode: SymlinkMode) -> Self {
        self.policy.symlink_mode = mode;
        self
    }

    /// Report a followed symlink's target metadata (`true`) or its own.
    #[must_use]
    pub const fn dereference(mut self, dereference: bool) -> Self {
        self.policy.dereference = dereference;
        self
    }

    /// Builds a [`Walker`]. Nothing touches the filesystem until
    /// [`Walker::walk`] runs.
    #[must_use]
    pub fn build(self) -> Walker {
        Walker::new(self.root, self.policy)
    }
}

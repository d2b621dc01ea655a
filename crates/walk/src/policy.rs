/// Whether a directory is visited before or after its contents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Order {
    /// Parent first.
    #[default]
    Preorder,
    /// Children first.
    Postorder,
}

/// Which symbolic links the walker resolves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SymlinkMode {
    /// Never follow symlinks (`-P`).
    Physical,
    /// Follow only symlinks named as walk roots (`-H`).
    #[default]
    HalfLogical,
    /// Follow every symlink (`-L`).
    FullLogical,
}

impl SymlinkMode {
    /// Whether a symlink found at `depth` is resolved. Roots have depth 1.
    #[must_use]
    pub const fn follows_at(self, depth: usize) -> bool {
        match self {
            Self::Physical => false,
            Self::HalfLogical => depth == 1,
            Self::FullLogical => true,
        }
    }
}

/// How one walk treats directories and symbolic links.
///
/// `dereference` only changes which metadata a followed symlink reports: its
/// target's (`true`) or its own (`false`). Descent through a followed symlink
/// to a directory happens either way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TraversalPolicy {
    /// Descend into directories.
    pub recursive: bool,
    /// Visit order for directories.
    pub order: Order,
    /// Symlink resolution rule.
    pub symlink_mode: SymlinkMode,
    /// Report the target's metadata for followed symlinks.
    pub dereference: bool,
}

impl Default for TraversalPolicy {
    fn default() -> Self {
        Self {
            recursive: false,
            order: Order::Preorder,
            symlink_mode: SymlinkMode::HalfLogical,
            dereference: true,
        }
    }
}

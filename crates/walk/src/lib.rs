#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `walk` visits a filesystem object and, when asked, everything beneath it.
//! A [`TraversalPolicy`] decides whether directories are descended into, in
//! which order they are visited and which symbolic links are resolved. Each
//! visited object is handed to a caller-supplied visitor as a [`WalkNode`].
//!
//! # Design
//!
//! - [`WalkBuilder`] assembles the policy and produces a [`Walker`].
//! - [`Walker::walk`] performs a synchronous depth-first descent. Directory
//!   entries are sorted by name before they are visited so output is stable.
//! - The visitor returns how many errors it produced for a node; the walk
//!   returns the total.
//!
//! # Invariants
//!
//! - Failures never stop the walk. A node that could not be inspected is
//!   delivered with [`WalkNode::error`] set and counts as at least one error.
//! - A path of [`PATH_LIMIT`] bytes or more is reported as
//!   [`WalkErrorKind::NameTooLong`] without touching the filesystem.
//! - Under [`SymlinkMode::FullLogical`], a symlink that resolves to a
//!   directory currently being walked is reported as
//!   [`WalkErrorKind::Loop`] instead of being entered again.
//! - Symlinks the policy does not follow are still delivered, with
//!   [`WalkNode::symlink_not_followed`] set, and are never descended into.
//!
//! # Examples
//!
//! ```
//! use walk::{Order, WalkBuilder};
//! use std::fs;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! let root = temp.path().join("src");
//! fs::create_dir_all(root.join("nested"))?;
//! fs::write(root.join("file.txt"), b"data")?;
//!
//! let mut seen = Vec::new();
//! let errors = WalkBuilder::new(&root)
//!     .recursive(true)
//!     .order(Order::Postorder)
//!     .build()
//!     .walk(|node| {
//!         seen.push(node.depth());
//!         usize::from(node.failed())
//!     });
//!
//! assert_eq!(errors, 0);
//! assert_eq!(seen, [2, 2, 1]);
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod builder;
mod entry;
mod error;
mod policy;
mod walker;

pub use builder::WalkBuilder;
pub use entry::WalkNode;
pub use error::{WalkError, WalkErrorKind};
pub use policy::{Order, SymlinkMode, TraversalPolicy};
pub use walker::{PATH_LIMIT, Walker};

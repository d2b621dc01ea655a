#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `metadata` is the attribute access port of the oc-fattr tools. The
//! [`AttributeAccess`] trait lists, reads, writes and removes extended
//! attributes; [`FsAttributes`] implements it on the host filesystem through
//! the `xattr` crate and [`MemoryAttributes`] keeps everything in memory.
//!
//! # Errors
//!
//! Every operation reports a [`MetadataError`] carrying the operation, the
//! path, the attribute name when there is one, and an [`AttrErrorKind`]
//! classification. A missing attribute is always
//! [`AttrErrorKind::NotFound`], regardless of the platform's errno for it.
//!
//! # Examples
//!
//! ```
//! use metadata::{AttributeAccess, MemoryAttributes, copy_xattrs};
//! use std::path::Path;
//!
//! let store = MemoryAttributes::new();
//! store.insert("a", "user.comment", b"hello");
//! let failures = copy_xattrs(&store, Path::new("a"), Path::new("b"), true, None).unwrap();
//! assert_eq!(failures, 0);
//! assert_eq!(store.attributes("b").len(), 1);
//! ```

mod error;
mod memory;
pub mod namespace;
mod access;

pub use error::{AttrErrorKind, MetadataError};
pub use memory::MemoryAttributes;
pub use access::{AttributeAccess, FsAttributes, copy_xattrs};

/// Whether the current process runs with an effective uid of 0.
///
/// Privileged processes may read `trusted.*` attributes and are not subject
/// to permission checks, which changes which failures tests can provoke.
#[must_use]
pub fn running_as_root() -> bool {
    rustix::process::geteuid().is_root()
}

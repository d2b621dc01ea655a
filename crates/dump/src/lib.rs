#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `dump` turns the extended attributes of a set of files into text and back.
//! The format is line oriented:
//!
//! ```text
//! # file: dir/file
//! user.comment="hello"
//! user.flag
//!
//! # file: dir/other
//! user.blob=0s3q2+7w==
//! ```
//!
//! Each block names a file in a `# file: ` header, lists one attribute per
//! line and ends with a blank line. A name without `=` has an empty value.
//! Paths and names are quoted with [`codec::quote`] so control characters and
//! `=` never break a line; values use the [`codec`] schemes.
//!
//! # Design
//!
//! - [`Dumper`] is the writing side. Its [`Dumper::dump_node`] method plugs
//!   directly into [`walk::Walker::walk`].
//! - [`NameFilter`] selects attribute names; [`PatternFilter`] implements the
//!   `--match` regular expression.
//! - [`RestoreEntries`] parses dump text one entry at a time and [`restore`]
//!   applies the entries through a [`metadata::AttributeAccess`] port.
//!
//! # Errors
//!
//! Per-file and per-attribute problems are written to a diagnostic writer
//! and counted. Only a block without a header, or unreadable input, stops a
//! restore ([`RestoreError`]).
//!
//! # Examples
//!
//! ```
//! use dump::{DumpOptions, Dumper, PatternFilter, RestoreOptions, restore};
//! use metadata::MemoryAttributes;
//! use std::path::Path;
//!
//! let source = MemoryAttributes::new();
//! source.insert("f", "user.a", b"hello");
//!
//! let options = DumpOptions { dump_values: true, ..DumpOptions::default() };
//! let mut dumper = Dumper::new(&source, PatternFilter::default(), options, Vec::new(), Vec::new());
//! assert_eq!(dumper.dump_path(Path::new("f")), 0);
//! let (text, _) = dumper.into_writers();
//! assert_eq!(text, b"# file: f\nuser.a=\"hello\"\n\n");
//!
//! let target = MemoryAttributes::new();
//! let failures = restore(&text[..], &target, &RestoreOptions::default(), &mut Vec::new()).unwrap();
//! assert_eq!(failures, 0);
//! assert_eq!(target.attributes("f"), source.attributes("f"));
//! ```

mod filter;
mod formatter;
mod parser;
mod record;

pub use filter::{NameFilter, PatternFilter};
pub use formatter::{DumpOptions, Dumper};
pub use parser::{RestoreEntries, RestoreEntry, RestoreError, RestoreOptions, restore};
pub use record::DumpRecord;

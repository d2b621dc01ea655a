#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` holds the command-line front ends of the workspace: `oc-getfattr`
//! dumps extended attributes, `oc-setfattr` sets, removes and restores them,
//! and `oc-attr` offers the IRIX-style single-attribute interface. The
//! binaries in the root package are thin wrappers around the `run` functions
//! exported here.
//!
//! # Design
//!
//! Each front end parses its arguments with a [`clap`] builder into a private
//! option struct, then drives the library crates: [`walk`] for traversal,
//! [`dump`] for the text format, and [`metadata`] for the system calls. All
//! input and output goes through the writers passed in, so the front ends
//! run unchanged against in-memory buffers in tests.
//!
//! Diagnostics are configured by `--debug` or, failing that, the
//! [`DEBUG_ENV`] variable; [`LOG_ENV`] feeds a `tracing` filter directive.
//! Collected debug events are written to stderr once the run finishes.
//!
//! # Exit status
//!
//! `0` on success, `1` when any file or attribute failed, `2` on a usage
//! error. `oc-attr` reports usage errors with `1`.
//!
//! # Examples
//!
//! ```
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let status = cli::getfattr::run(["oc-getfattr", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(status, 0);
//! assert!(String::from_utf8(stdout).unwrap().starts_with("oc-getfattr "));
//! ```

mod common;
mod env;
mod exit_code;

pub mod attr;
pub mod getfattr;
pub mod setfattr;

pub use env::{DEBUG_ENV, LOG_ENV};
pub use exit_code::{ExitCode, exit_code_from};

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` provides the debug verbosity system shared by the oc-fattr
//! crates. Each diagnostic belongs to a [`DebugFlag`] category (`walk`,
//! `xattr`, `codec`, `restore`) and is kept only when the flag's configured
//! level, held in a thread-local [`VerbosityConfig`], is high enough.
//!
//! # Design
//!
//! - [`debug_log!`] formats and records a [`DiagnosticEvent`] when enabled.
//! - With the `tracing` feature, [`FattrLayer`] turns `tracing` events with
//!   `fattr::<flag>` targets into the same events, and the `trace_*!` macros
//!   supply those targets.
//! - Front ends call [`drain_events`] after a run and render the events with
//!   [`render_events`].
//!
//! # Invariants
//!
//! - Events are only formatted when they will be kept.
//! - Configuration and events are per thread; the tools are single-threaded.
//!
//! # Examples
//!
//! ```
//! use logging::{debug_log, drain_events, init, render_events, VerbosityConfig};
//!
//! let mut config = VerbosityConfig::default();
//! config.apply_debug_list("walk2").unwrap();
//! init(config);
//!
//! debug_log!(Walk, 2, "entering {}", "src");
//! let mut out = Vec::new();
//! render_events("oc-getfattr", &drain_events(), &mut out).unwrap();
//! assert_eq!(out, b"oc-getfattr: [walk] entering src\n");
//! ```

use std::io::{self, Write};

mod config;
mod levels;
mod macros;
mod thread_local;
#[cfg(feature = "tracing")]
mod tracing_bridge;
#[cfg(feature = "tracing")]
mod tracing_macros;

pub use config::VerbosityConfig;
pub use levels::{DebugFlag, DebugLevels};
pub use thread_local::{DiagnosticEvent, debug_gte, drain_events, emit_debug, init};
#[cfg(feature = "tracing")]
pub use tracing_bridge::{FattrLayer, init_tracing};

/// Writes each event as `program: [flag] message`, one per line.
pub fn render_events<W: Write + ?Sized>(
    program: &str,
    events: &[DiagnosticEvent],
    writer: &mut W,
) -> io::Result<()> {
    for event in events {
        writeln!(writer, "{program}: [{}] {}", event.flag.name(), event.message)?;
    }
    Ok(())
}

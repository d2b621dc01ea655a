//! Diagnostics configuration from `--debug` and the environment.

use logging::{VerbosityConfig, drain_events, init_tracing, render_events};
use std::env;
use std::io::Write;

/// Default `--debug` flag list, e.g. `walk2,xattr`.
pub const DEBUG_ENV: &str = "OC_FATTR_DEBUG";
/// `tracing_subscriber::EnvFilter` directive applied to trace output.
pub const LOG_ENV: &str = "OC_FATTR_LOG";

/// Builds the debug configuration. A `--debug` argument replaces the
/// environment default rather than adding to it.
pub(crate) fn debug_config(
    argument: Option<&str>,
    environment: Option<&str>,
) -> Result<VerbosityConfig, String> {
    let mut config = VerbosityConfig::default();
    if let Some(list) = argument.or(environment) {
        config.apply_debug_list(list)?;
    }
    Ok(config)
}

/// Installs diagnostics for the current run.
pub(crate) fn setup(argument: Option<&str>) -> Result<(), String> {
    let environment = env::var(DEBUG_ENV).ok();
    let config = debug_config(argument, environment.as_deref())?;
    let directive = env::var(LOG_ENV).ok();
    init_tracing(config, directive.as_deref())
}

/// Writes the collected debug events to `stderr`.
pub(crate) fn flush<W: Write + ?Sized>(program: &str, stderr: &mut W) {
    let events = drain_events();
    let _ = render_events(program, &events, stderr);
}

//! crates/logging/src/tracing_bridge.rs
//! Bridge between the tracing crate and the debug flag system.
//!
//! Library crates emit events through the standard `tracing` macros (or the
//! `trace_*!` wrappers) using `fattr::<flag>` targets. [`FattrLayer`] maps
//! each target onto a [`DebugFlag`], consults the thread-local verbosity and
//! records the surviving events so the front end can print them.
//!
//! ```rust,ignore
//! use logging::{VerbosityConfig, init_tracing};
//!
//! init_tracing(VerbosityConfig::from_verbose_level(2), None)?;
//! tracing::debug!(target: "fattr::walk", "entering directory");
//! ```

use super::config::VerbosityConfig;
use super::levels::DebugFlag;
use super::thread_local::{debug_gte, emit_debug};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// A tracing layer that records `fattr::*` events as diagnostic events.
pub struct FattrLayer {
    _config: VerbosityConfig,
}

impl FattrLayer {
    /// Create a new layer with the given verbosity configuration.
    #[must_use]
    pub const fn new(config: VerbosityConfig) -> Self {
        Self { _config: config }
    }

    /// Map a tracing target to a debug flag.
    fn target_to_debug_flag(target: &str) -> Option<DebugFlag> {
        let leaf = target.rsplit("::").next().unwrap_or(target);
        match leaf {
            "walk" | "walker" => Some(DebugFlag::Walk),
            "xattr" => Some(DebugFlag::Xattr),
            "codec" => Some(DebugFlag::Codec),
            "restore" => Some(DebugFlag::Restore),
            _ => None,
        }
    }

    /// Map a tracing level to a verbosity level.
    const fn level_to_verbosity_level(level: &Level) -> u8 {
        match *level {
            Level::ERROR | Level::WARN | Level::INFO | Level::DEBUG => 1,
            Level::TRACE => 2,
        }
    }
}

impl<S> Layer<S> for FattrLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let Some(flag) = Self::target_to_debug_flag(metadata.target()) else {
            return;
        };
        let level = Self::level_to_verbosity_level(metadata.level());
        if !debug_gte(flag, level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        if let Some(message) = visitor.message {
            emit_debug(flag, level, message);
        }
    }
}

/// Visitor to extract the message from a tracing event.
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        }
    }
}

/// Initialize tracing with the given verbosity configuration.
///
/// `directive` is an optional [`EnvFilter`](tracing_subscriber::EnvFilter)
/// directive (typically the value of `OC_FATTR_LOG`) layered in front of the
/// bridge. Installing a global subscriber a second time is not an error; the
/// thread-local configuration is still updated.
pub fn init_tracing(config: VerbosityConfig, directive: Option<&str>) -> Result<(), String> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    super::thread_local::init(config.clone());

    let filter = directive
        .map(EnvFilter::try_new)
        .transpose()
        .map_err(|error| format!("invalid log filter: {error}"))?;

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(FattrLayer::new(config))
        .try_init();
    Ok(())
}

//! crates/logging/src/thread_local.rs
//! Per-thread debug configuration and the queue of events waiting to be
//! written to stderr.

use super::config::VerbosityConfig;
use super::levels::DebugFlag;
use std::cell::RefCell;

thread_local! {
    static VERBOSITY: RefCell<VerbosityConfig> = RefCell::new(VerbosityConfig::default());
    #[allow(clippy::missing_const_for_thread_local)]
    static EVENTS: RefCell<Vec<DiagnosticEvent>> = RefCell::new(Vec::new());
}

/// Diagnostic event collected during execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticEvent {
    /// The debug flag category.
    pub flag: DebugFlag,
    /// The verbosity level the event was emitted at.
    pub level: u8,
    /// The diagnostic message.
    pub message: String,
}

/// Replaces the debug configuration of the calling thread.
pub fn init(config: VerbosityConfig) {
    VERBOSITY.with_borrow_mut(|current| *current = config);
}

/// Whether `flag` is enabled at `level` or above on this thread.
pub fn debug_gte(flag: DebugFlag, level: u8) -> bool {
    VERBOSITY.with_borrow(|current| current.debug.get(flag) >= level)
}

/// Queues an event. Callers check [`debug_gte`] first; this does not.
pub fn emit_debug(flag: DebugFlag, level: u8, message: String) {
    let event = DiagnosticEvent {
        flag,
        level,
        message,
    };
    EVENTS.with_borrow_mut(|events| events.push(event));
}

/// Takes every queued event, leaving the queue empty.
pub fn drain_events() -> Vec<DiagnosticEvent> {
    EVENTS.with_borrow_mut(std::mem::take)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_controls_threshold() {
        let mut config = VerbosityConfig::default();
        config.debug.walk = 2;
        init(config);

        assert!(debug_gte(DebugFlag::Walk, 1));
        assert!(debug_gte(DebugFlag::Walk, 2));
        assert!(!debug_gte(DebugFlag::Walk, 3));
        assert!(!debug_gte(DebugFlag::Codec, 1));
    }

    #[test]
    fn emit_and_drain() {
        init(VerbosityConfig::default());
        drain_events();

        emit_debug(DebugFlag::Restore, 1, "applied".to_string());
        let events = drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].flag, DebugFlag::Restore);
        assert_eq!(events[0].message, "applied");
        assert!(drain_events().is_empty());
    }
}

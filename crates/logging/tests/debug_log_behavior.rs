//! Integration tests for `debug_log!` at different levels.

use logging::{DebugFlag, DiagnosticEvent, VerbosityConfig, debug_log, drain_events, init};

fn configure(tokens: &str) {
    let mut config = VerbosityConfig::default();
    config.apply_debug_list(tokens).expect("valid tokens");
    init(config);
    drain_events();
}

#[test]
fn debug_log_emits_when_level_sufficient() {
    configure("walk2");

    debug_log!(Walk, 1, "entering {}", "dir");

    let events = drain_events();
    assert_eq!(
        events,
        vec![DiagnosticEvent {
            flag: DebugFlag::Walk,
            level: 1,
            message: "entering dir".to_string(),
        }]
    );
}

#[test]
fn debug_log_suppresses_when_level_insufficient() {
    configure("xattr1");

    debug_log!(Xattr, 2, "should not appear");

    assert!(drain_events().is_empty());
}

#[test]
fn debug_log_flags_are_independent() {
    configure("restore");

    debug_log!(Restore, 1, "kept");
    debug_log!(Codec, 1, "dropped");

    let events = drain_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].flag, DebugFlag::Restore);
}

#[test]
fn debug_log_does_not_format_when_disabled() {
    configure("none");

    let mut formatted = false;
    let mut probe = || {
        formatted = true;
        "value"
    };
    debug_log!(Walk, 1, "{}", probe());

    assert!(!formatted);
    assert!(drain_events().is_empty());
}

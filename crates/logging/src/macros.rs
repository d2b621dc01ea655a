//! crates/logging/src/macros.rs
//! The `debug_log!` macro.

/// Record a debug event when the flag's configured level is high enough.
///
/// The flag is named by its [`DebugFlag`](crate::DebugFlag) variant and the
/// message is only formatted when it will be kept.
///
/// # Example
/// ```
/// use logging::{debug_log, drain_events, init, VerbosityConfig};
///
/// let mut config = VerbosityConfig::default();
/// config.debug.walk = 1;
/// init(config);
///
/// debug_log!(Walk, 1, "entering {}", "dir");
/// debug_log!(Walk, 2, "too chatty");
/// assert_eq!(drain_events().len(), 1);
/// ```
#[macro_export]
macro_rules! debug_log {
    ($flag:ident, $level:expr, $($arg:tt)*) => {
        if $crate::debug_gte($crate::DebugFlag::$flag, $level) {
            $crate::emit_debug($crate::DebugFlag::$flag, $level, format!($($arg)*));
        }
    };
}

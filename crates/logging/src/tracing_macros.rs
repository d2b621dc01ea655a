//! crates/logging/src/tracing_macros.rs
//! Convenience macros wrapping `tracing` with the targets understood by
//! [`FattrLayer`](crate::FattrLayer).

/// Emit a tree traversal trace.
///
/// # Example
/// ```ignore
/// trace_walk!("descending into {}", path.display());
/// ```
#[macro_export]
macro_rules! trace_walk {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "fattr::walk", $($arg)*);
    };
}

/// Emit an attribute system call trace.
///
/// # Example
/// ```ignore
/// trace_xattr!("listing attributes of {}", path.display());
/// ```
#[macro_export]
macro_rules! trace_xattr {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "fattr::xattr", $($arg)*);
    };
}

/// Emit a codec trace.
///
/// # Example
/// ```ignore
/// trace_codec!("decoded {} bytes", value.len());
/// ```
#[macro_export]
macro_rules! trace_codec {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: "fattr::codec", $($arg)*);
    };
}

/// Emit a restore parser trace.
///
/// # Example
/// ```ignore
/// trace_restore!("header for {} at line {}", path, line);
/// ```
#[macro_export]
macro_rules! trace_restore {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "fattr::restore", $($arg)*);
    };
}

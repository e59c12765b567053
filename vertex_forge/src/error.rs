//! Error types for Vertex Forge
//!
//! This module defines the error types used by layouts, buffers, vertex arrays
//! and drivers, plus the `forge_err!` / `forge_bail!` helpers that log an error
//! at the point where it is raised.

use std::fmt;

/// Result type for Vertex Forge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Vertex Forge errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Inconsistent setup (buffer added without a layout, record size mismatch, ...)
    ConfigurationError(String),

    /// Data does not fit the reserved storage of a buffer
    CapacityError(String),

    /// Invalid resource (moved-out buffer, out-of-range index, unknown handle, ...)
    InvalidResource(String),

    /// Driver-specific error
    BackendError(String),

    /// Out of driver memory
    OutOfMemory,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            Error::CapacityError(msg) => write!(f, "Capacity error: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of driver memory"),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an ERROR message and build the matching `Error` variant
///
/// # Example
///
/// ```no_run
/// use vertex_forge::forge_err;
///
/// let err = forge_err!("forge::VertexArray", ConfigurationError, "missing layout");
/// ```
#[macro_export]
macro_rules! forge_err {
    ($source:expr, $kind:ident, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::forge_error!($source, "{}", message);
        $crate::forge::Error::$kind(message)
    }};
}

/// Log an ERROR message and return the matching `Error` variant
///
/// # Example
///
/// ```no_run
/// use vertex_forge::forge_bail;
///
/// fn check(len: usize) -> vertex_forge::forge::Result<()> {
///     if len == 0 {
///         forge_bail!("forge::VertexBuffer", CapacityError, "empty write");
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! forge_bail {
    ($source:expr, $kind:ident, $($arg:tt)*) => {
        return Err($crate::forge_err!($source, $kind, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

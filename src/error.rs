//! Error codes shared by every error type in the crate.
//!
//! DESIGN
//! ======
//! Each module owns its own `thiserror` enum. The `ErrorCode` trait gives
//! every variant a stable, grepable code so the rendering layer can map
//! failures to copy without matching on `Display` text.

/// Grepable error code for structured error reporting.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}

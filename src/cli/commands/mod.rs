//! CLI command implementations
//!
//! Exit codes shared by all commands: 0 success, 1 fatal error,
//! 2 configuration error.

pub mod status;
pub mod sync;
pub mod validate;

/// Command succeeded
pub const EXIT_SUCCESS: i32 = 0;

/// Sync aborted or the database could not be reached
pub const EXIT_FATAL: i32 = 1;

/// Configuration could not be loaded or is invalid
pub const EXIT_CONFIG: i32 = 2;

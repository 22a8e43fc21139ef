//! Step configuration.
//!
//! This module provides:
//! - Configuration constants (redirect bound, timeouts, stream names)
//! - Logger format types

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::LogFormat;

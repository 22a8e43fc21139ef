//! Configuration constants.
//!
//! This module defines the operational constants used throughout the crate:
//! redirect bounds, default timeouts, and the names of the transcript streams.

use std::time::Duration;

/// Maximum number of redirect hops followed for a single request.
///
/// Redirect chains longer than this are cut short: the last redirect response
/// becomes the final response of the invocation instead of being followed.
pub const MAX_REDIRECT_HOPS: usize = 10;

/// Default per-request timeout applied at session creation.
///
/// Individual requests may override this with their own timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User-Agent string sent with every request issued through the shared session.
pub const DEFAULT_USER_AGENT: &str = concat!("http_step/", env!("CARGO_PKG_VERSION"));

/// Name of the narrative transcript stream (URLs visited, redirect chain, status).
pub const LOG_STREAM: &str = "log";

/// Name of the raw-content transcript stream (final response content only).
pub const CONTENT_STREAM: &str = "content";

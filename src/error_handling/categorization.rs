//! Transport failure categorization.

use super::stats::{ErrorType, StepStats};

/// Maps a transport-level failure to its statistics category.
///
/// Analyzes the error and picks the most specific matching category. Timeouts
/// and connection failures are checked first because `reqwest` may flag them
/// as request errors as well.
pub fn classify_transport_error(error: &reqwest::Error) -> ErrorType {
    if error.is_timeout() {
        ErrorType::TransportTimeout
    } else if error.is_connect() {
        ErrorType::TransportConnect
    } else if error.is_builder() {
        ErrorType::TransportBuilder
    } else if error.is_redirect() {
        ErrorType::TransportRedirect
    } else if error.is_body() {
        ErrorType::TransportBody
    } else if error.is_decode() {
        ErrorType::TransportDecode
    } else if error.is_request() {
        ErrorType::TransportRequest
    } else {
        ErrorType::TransportOther
    }
}

/// Records a transport-level failure in the shared statistics.
///
/// # Arguments
///
/// * `stats` - The failure tally to update
/// * `error` - The `reqwest::Error` to categorize and record
pub fn update_error_stats(stats: &StepStats, error: &reqwest::Error) {
    stats.increment(classify_transport_error(error));
}

/// Human-readable message for a transport-level failure.
///
/// The message is carried on the invocation's transport error and logged; the
/// reported status string is fixed regardless of the cause.
pub fn transport_message(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out: {error}")
    } else if error.is_connect() {
        format!("connection error: {error}")
    } else {
        format!("request error: {error}")
    }
}

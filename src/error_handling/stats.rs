//! Step failure statistics.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use strum::IntoEnumIterator;
use strum_macros::EnumIter as EnumIterMacro;

use super::types::StepError;

/// Categories of step failure, for tracking and reporting purposes.
///
/// Each variant represents a specific failure mode of a step invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    /// The request timed out.
    TransportTimeout,
    /// The connection could not be established.
    TransportConnect,
    /// The request could not be constructed.
    TransportBuilder,
    /// A redirect could not be followed.
    TransportRedirect,
    /// The request body could not be sent.
    TransportBody,
    /// The response body could not be decoded.
    TransportDecode,
    /// The request failed while in flight.
    TransportRequest,
    /// Any other transport-level failure.
    TransportOther,
    /// The final response carried a failure status code.
    HttpFailureStatus,
    /// A referenced property was absent from the store.
    MissingProperty,
    /// The step declaration itself was invalid.
    Configuration,
}

impl ErrorType {
    /// Human-readable label for this failure category.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::TransportTimeout => "Request timeout",
            ErrorType::TransportConnect => "Connection error",
            ErrorType::TransportBuilder => "Request builder error",
            ErrorType::TransportRedirect => "Redirect error",
            ErrorType::TransportBody => "Request body error",
            ErrorType::TransportDecode => "Response decode error",
            ErrorType::TransportRequest => "Request error",
            ErrorType::TransportOther => "Other transport error",
            ErrorType::HttpFailureStatus => "HTTP failure status",
            ErrorType::MissingProperty => "Missing property",
            ErrorType::Configuration => "Invalid step configuration",
        }
    }

    /// Category for a failure raised before the request was sent.
    pub fn for_step_error(error: &StepError) -> ErrorType {
        match error {
            StepError::MissingProperty(_) => ErrorType::MissingProperty,
            StepError::Configuration(_) => ErrorType::Configuration,
            StepError::Transport(_) => ErrorType::TransportOther,
        }
    }
}

/// Thread-safe failure tally shared across step invocations.
///
/// Tracks the count of each failure category using atomic counters, allowing
/// concurrent access from many in-flight steps. All categories are
/// initialized to zero on creation.
pub struct StepStats {
    errors: HashMap<ErrorType, AtomicUsize>,
}

impl StepStats {
    /// Creates a tally with every category at zero.
    pub fn new() -> Self {
        let mut errors = HashMap::new();
        for error in ErrorType::iter() {
            errors.insert(error, AtomicUsize::new(0));
        }
        StepStats { errors }
    }

    /// Records one failure of the given category.
    pub fn increment(&self, error: ErrorType) {
        // All ErrorType variants are initialized in new(), so unwrap() is safe
        self.errors
            .get(&error)
            .unwrap()
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Current count for the given category.
    pub fn get_count(&self, error: ErrorType) -> usize {
        // All ErrorType variants are initialized in new(), so unwrap() is safe
        self.errors.get(&error).unwrap().load(Ordering::SeqCst)
    }
}

impl Default for StepStats {
    fn default() -> Self {
        Self::new()
    }
}

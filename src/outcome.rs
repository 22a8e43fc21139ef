//! Step outcome classification.
//!
//! The mapping from an HTTP result to a build outcome is pure: it looks only
//! at the final status code (or the absence of a response), never at response
//! content.

use serde::Serialize;

use crate::error_handling::StepError;
use crate::fetch::ResponseRecord;

/// Terminal result tag for a step invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StepResult {
    /// The step passed.
    Success,
    /// The step failed.
    Failure,
}

/// The terminal signal reported for a step invocation.
///
/// Owned exclusively by the invocation that produced it and immutable after
/// creation: a result tag plus a short status string summarizing the numeric
/// code or terminal condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    result: StepResult,
    status: String,
}

impl Outcome {
    fn new(result: StepResult, status: String) -> Self {
        Outcome { result, status }
    }

    /// The result tag.
    pub fn result(&self) -> StepResult {
        self.result
    }

    /// The human-readable status string.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Whether the step passed.
    pub fn is_success(&self) -> bool {
        self.result == StepResult::Success
    }

    /// Classifies a numeric status code. Codes below 400 are successes.
    pub fn from_status(status: u16) -> Self {
        if status < 400 {
            Self::new(StepResult::Success, format!("Status code: {status}"))
        } else {
            Self::new(StepResult::Failure, format!("Status code: {status} (failure)"))
        }
    }

    /// Classifies a final response by its status code.
    pub fn from_record(record: &ResponseRecord) -> Self {
        Self::from_status(record.status)
    }

    /// The outcome of an invocation that failed before producing a response.
    ///
    /// Transport failures report the fixed status string
    /// `"Requested (failure)"`; rendering and configuration failures carry
    /// their own message.
    pub fn from_error(error: &StepError) -> Self {
        match error {
            StepError::Transport(_) => {
                Self::new(StepResult::Failure, "Requested (failure)".to_string())
            }
            other => Self::aborted(other.to_string()),
        }
    }

    /// The outcome of an invocation aborted with the given failure message.
    pub fn aborted(message: impl Into<String>) -> Self {
        Self::new(StepResult::Failure, message.into())
    }
}

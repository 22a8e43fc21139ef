//! Error handling for step invocations.
//!
//! This module defines the error taxonomy for a step invocation, the
//! process-wide failure statistics shared across invocations, and the
//! categorization of transport-level failures into those statistics.
//!
//! Every error defined here is handled inside the step invocation that
//! produced it and converted to a terminal outcome; nothing propagates past
//! the step boundary as a raw error.

mod categorization;
mod stats;
mod types;

pub use categorization::{classify_transport_error, transport_message, update_error_stats};
pub use stats::{ErrorType, StepStats};
pub use types::{InitializationError, StepError};

//! http_step library: a single-HTTP-request build step
//!
//! This library implements one unit of work in a build pipeline: issue an
//! outbound HTTP request, translate the result into a pass/fail outcome, and
//! persist a human-readable transcript of the interaction. Request fields may
//! be deferred values bound to named build properties; they are rendered
//! against the property store before the request is sent. All invocations of
//! a worker share one lazily-created HTTP session that ignores ambient proxy
//! environment variables.
//!
//! # Example
//!
//! ```no_run
//! use http_step::{HttpStep, MemoryLogSink, Properties, StepContext, StepRequest};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let ctx = StepContext::new();
//! let properties = Properties::new();
//! let mut sink = MemoryLogSink::new();
//!
//! let step = HttpStep::new(StepRequest::get("https://example.com/health"));
//! let outcome = step.run(&ctx, &properties, &mut sink).await;
//! println!(
//!     "{}: {}",
//!     if outcome.is_success() { "pass" } else { "fail" },
//!     outcome.status()
//! );
//!
//! // End of the worker's lifetime: tear down the shared session.
//! ctx.session.close();
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling [`HttpStep::run`] within an async
//! context.

#![warn(missing_docs)]

pub mod config;
mod error_handling;
mod fetch;
mod initialization;
mod outcome;
mod render;
mod session;
mod step;
mod transcript;

// Re-export public API
pub use config::{LogFormat, CONTENT_STREAM, LOG_STREAM, MAX_REDIRECT_HOPS};
pub use error_handling::{ErrorType, InitializationError, StepError, StepStats};
pub use fetch::{
    resolve, BasicAuth, RequestBody, ResolvedRequest, ResponseRecord, ResponseSnapshot,
    StepRequest, SUPPORTED_METHODS,
};
pub use initialization::init_logger_with;
pub use outcome::{Outcome, StepResult};
pub use render::{flatten_pairs, scalar_text, Properties, PropertyStore, Renderable};
pub use session::SessionManager;
pub use step::{HttpStep, StepContext};
pub use transcript::{content_log, narrative_log, LogSink, MemoryLogSink};

//! Step orchestration.
//!
//! One step invocation renders its request, performs it through the shared
//! session, and converts whatever happened into a terminal outcome plus the
//! two transcript streams. Errors never cross the step boundary.

use std::sync::Arc;

use log::{debug, warn};

use crate::config::{CONTENT_STREAM, LOG_STREAM};
use crate::error_handling::{ErrorType, StepStats};
use crate::fetch::{execute, resolve, StepRequest};
use crate::outcome::Outcome;
use crate::render::PropertyStore;
use crate::session::SessionManager;
use crate::transcript::{content_log, narrative_log, LogSink};

/// Shared resources a step invocation needs.
///
/// One context is created per worker and shared across all of its step
/// invocations, so the session and the failure tally outlive any single
/// invocation.
#[derive(Clone)]
pub struct StepContext {
    /// Session manager owning the shared HTTP client.
    pub session: Arc<SessionManager>,
    /// Failure tally shared across invocations.
    pub stats: Arc<StepStats>,
}

impl StepContext {
    /// Creates a context with a fresh session manager and statistics.
    pub fn new() -> Self {
        StepContext {
            session: Arc::new(SessionManager::new()),
            stats: Arc::new(StepStats::new()),
        }
    }
}

impl Default for StepContext {
    fn default() -> Self {
        Self::new()
    }
}

/// One HTTP request step in a build pipeline.
pub struct HttpStep {
    request: StepRequest,
}

impl HttpStep {
    /// Creates a step from its declared request.
    pub fn new(request: StepRequest) -> Self {
        HttpStep { request }
    }

    /// The declared request.
    pub fn request(&self) -> &StepRequest {
        &self.request
    }

    /// Runs the step.
    ///
    /// Renders the request against the property store, performs it through
    /// the shared session, writes the narrative and content transcript
    /// streams, and returns the terminal outcome. Every failure mode is
    /// converted to an outcome here; this method never returns an error.
    pub async fn run(
        &self,
        ctx: &StepContext,
        properties: &dyn PropertyStore,
        sink: &mut dyn LogSink,
    ) -> Outcome {
        let resolved = match resolve(&self.request, properties) {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(
                    "Failed to prepare {} request to {}: {e}",
                    self.request.method, self.request.url
                );
                ctx.stats.increment(ErrorType::for_step_error(&e));
                return Outcome::from_error(&e);
            }
        };

        let client = match ctx.session.acquire() {
            Ok(client) => client,
            Err(e) => {
                warn!("Failed to acquire HTTP session: {e}");
                return Outcome::aborted(e.to_string());
            }
        };

        debug!("Performing {} request to {}", resolved.method, resolved.url);

        match execute(&client, &resolved, &ctx.stats).await {
            Ok(record) => {
                sink.append(LOG_STREAM, &narrative_log(&record));
                sink.append(CONTENT_STREAM, &content_log(&record));
                let outcome = Outcome::from_record(&record);
                if !outcome.is_success() {
                    ctx.stats.increment(ErrorType::HttpFailureStatus);
                }
                outcome
            }
            // Transport failures were already tallied at the error site;
            // nothing is appended to either stream.
            Err(e) => {
                warn!(
                    "{} request to {} failed: {e}",
                    resolved.method, resolved.url
                );
                Outcome::from_error(&e)
            }
        }
    }
}

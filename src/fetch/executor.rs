//! Request execution with manual redirect tracking.

use log::{debug, warn};
use reqwest::header::{CONTENT_TYPE, LOCATION};

use super::redirects::{is_redirect, redirect_method, resolve_location};
use super::request::ResolvedRequest;
use super::response::{ResponseRecord, ResponseSnapshot};
use crate::config::MAX_REDIRECT_HOPS;
use crate::error_handling::{
    transport_message, update_error_stats, ErrorType, StepError, StepStats,
};

/// Sends a resolved request through the shared session.
///
/// Redirect responses are followed manually so that every intermediate hop
/// (URL, status, content) lands in the record's history in chronological
/// order. The loop terminates on a non-redirect status, a redirect without a
/// `Location` header, or after [`MAX_REDIRECT_HOPS`] hops; in every case the
/// terminating response becomes the final record. HTTP failure statuses are
/// normal records, never errors.
///
/// # Errors
///
/// Returns `StepError::Transport` on any network-level failure; no record is
/// produced in that case.
pub async fn execute(
    client: &reqwest::Client,
    request: &ResolvedRequest,
    stats: &StepStats,
) -> Result<ResponseRecord, StepError> {
    let mut history: Vec<ResponseSnapshot> = Vec::new();
    let mut url = request.url.clone();
    let mut method = request.method.clone();
    let mut body = request.body.clone();

    loop {
        let mut builder = client.request(method.clone(), url.clone());
        if let Some(ref request_body) = body {
            if let Some(content_type) = request_body.content_type {
                builder = builder.header(CONTENT_TYPE, content_type);
            }
            builder = builder.body(request_body.bytes.clone());
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(ref auth) = request.auth {
            builder = builder.basic_auth(&auth.username, auth.password.as_deref());
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                update_error_stats(stats, &e);
                return Err(StepError::Transport(transport_message(&e)));
            }
        };

        let status = response.status().as_u16();
        let response_url = response.url().clone();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                update_error_stats(stats, &e);
                return Err(StepError::Transport(transport_message(&e)));
            }
        };

        if !is_redirect(status) {
            return Ok(ResponseRecord {
                url: response_url.to_string(),
                status,
                body: bytes,
                history,
            });
        }

        let Some(location) = location else {
            warn!("Redirect status {status} for {response_url} but no Location header");
            return Ok(ResponseRecord {
                url: response_url.to_string(),
                status,
                body: bytes,
                history,
            });
        };

        if history.len() >= MAX_REDIRECT_HOPS {
            warn!("Redirect limit of {MAX_REDIRECT_HOPS} hops reached at {response_url}");
            return Ok(ResponseRecord {
                url: response_url.to_string(),
                status,
                body: bytes,
                history,
            });
        }

        history.push(ResponseSnapshot {
            url: response_url.to_string(),
            status,
            body: bytes,
        });

        let next = match resolve_location(&response_url, &location) {
            Ok(next) => next,
            Err(e) => {
                stats.increment(ErrorType::TransportRedirect);
                return Err(e);
            }
        };
        debug!("Following redirect {response_url} -> {next}");

        let next_method = redirect_method(status, &method);
        if next_method != method {
            // The downgraded GET re-issues without the original body
            body = None;
            method = next_method;
        }
        url = next;
    }
}

//! Shared HTTP session management.
//!
//! One `reqwest::Client` is shared across all step invocations of a worker:
//! lazily created on first acquisition, explicitly torn down on close. The
//! client is built with ambient proxy environment variables disabled so
//! builds are never routed through a host proxy, and with redirect following
//! disabled so the executor can track the redirect chain itself.

use std::sync::{Arc, Mutex};

use reqwest::ClientBuilder;

use crate::config::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use crate::error_handling::InitializationError;

/// Owns the one HTTP client shared by step invocations.
///
/// The session has two externally visible states: *absent* and *active*. It
/// transitions absent→active on the first [`acquire`](Self::acquire) and
/// active→absent on [`close`](Self::close). The handle is an
/// `Arc<reqwest::Client>`, so concurrently running steps share the same
/// connection pool safely.
pub struct SessionManager {
    session: Mutex<Option<Arc<reqwest::Client>>>,
}

impl SessionManager {
    /// Creates a manager with no active session.
    pub fn new() -> Self {
        SessionManager {
            session: Mutex::new(None),
        }
    }

    /// Returns the active session, creating it on first call.
    ///
    /// Creation is guarded by the manager's lock, so concurrent first
    /// acquisitions initialize exactly one client.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the client cannot be
    /// built.
    pub fn acquire(&self) -> Result<Arc<reqwest::Client>, InitializationError> {
        let mut guard = match self.session.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(client) = guard.as_ref() {
            return Ok(Arc::clone(client));
        }

        let client = ClientBuilder::new()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(DEFAULT_USER_AGENT)
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .build()?;
        let client = Arc::new(client);
        *guard = Some(Arc::clone(&client));
        log::debug!("Created shared HTTP session");
        Ok(client)
    }

    /// Whether a session is currently active.
    pub fn is_active(&self) -> bool {
        match self.session.lock() {
            Ok(guard) => guard.is_some(),
            Err(poisoned) => poisoned.into_inner().is_some(),
        }
    }

    /// Tears down the active session.
    ///
    /// Pooled connections are reclaimed once the last in-flight clone of the
    /// handle drops, so closing while requests are still running is safe. A
    /// subsequent [`acquire`](Self::acquire) creates a fresh session.
    pub fn close(&self) {
        let mut guard = match self.session.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.take().is_some() {
            log::debug!("Closed shared HTTP session");
        }
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

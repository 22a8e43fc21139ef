//! Step request declaration and resolution.
//!
//! A [`StepRequest`] is what a build definition declares: method, URL, and
//! fields that may still be bound to build properties. [`resolve`] turns it
//! into a [`ResolvedRequest`] in which every field is concrete, failing
//! before any network I/O if a property is missing or the declaration is
//! invalid.

use std::collections::BTreeMap;
use std::time::Duration;

use log::debug;
use reqwest::Method;
use serde_json::Value;
use url::{form_urlencoded, Url};

use crate::error_handling::StepError;
use crate::render::{flatten_pairs, scalar_text, PropertyStore, Renderable};

/// Methods a step may declare.
pub const SUPPORTED_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::HEAD,
    Method::OPTIONS,
];

/// Basic-auth credentials, passed through to the transport untouched.
#[derive(Debug, Clone)]
pub struct BasicAuth {
    /// Username.
    pub username: String,
    /// Password, if any.
    pub password: Option<String>,
}

/// A step's declared HTTP request.
///
/// Headers, params, and body fields may hold deferred values; everything else
/// is a passthrough transport option. At most one of `body`, `form`, and
/// `json` may be populated.
#[derive(Debug, Clone)]
pub struct StepRequest {
    /// Request method; must be one of [`SUPPORTED_METHODS`].
    pub method: Method,
    /// Request URL.
    pub url: String,
    /// Header name to value, in name order.
    pub headers: BTreeMap<String, Renderable>,
    /// Query parameters: a mapping rendered to ordered pairs, or a raw query
    /// string appended as-is.
    pub params: Option<Renderable>,
    /// Request body: raw text sent as-is, or a mapping sent form-encoded.
    pub body: Option<Renderable>,
    /// Form body: a mapping sent URL-form-encoded.
    pub form: Option<Renderable>,
    /// JSON body: any value sent JSON-encoded.
    pub json: Option<Renderable>,
    /// Per-request timeout overriding the session default.
    pub timeout: Option<Duration>,
    /// Basic-auth credentials applied to every hop.
    pub auth: Option<BasicAuth>,
}

impl StepRequest {
    /// Creates a request with the given method and URL.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        StepRequest {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            params: None,
            body: None,
            form: None,
            json: None,
            timeout: None,
            auth: None,
        }
    }

    /// A GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// A POST request.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// A PUT request.
    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    /// A DELETE request.
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// A HEAD request.
    pub fn head(url: impl Into<String>) -> Self {
        Self::new(Method::HEAD, url)
    }

    /// An OPTIONS request.
    pub fn options(url: impl Into<String>) -> Self {
        Self::new(Method::OPTIONS, url)
    }

    /// Adds a header; the value may be deferred.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<Renderable>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the query parameters; the value may be deferred.
    pub fn params(mut self, params: impl Into<Renderable>) -> Self {
        self.params = Some(params.into());
        self
    }

    /// Sets the raw body; the value may be deferred.
    pub fn body(mut self, body: impl Into<Renderable>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the form body; the value may be deferred.
    pub fn form(mut self, form: impl Into<Renderable>) -> Self {
        self.form = Some(form.into());
        self
    }

    /// Sets the JSON body; the value may be deferred.
    pub fn json(mut self, json: impl Into<Renderable>) -> Self {
        self.json = Some(json.into());
        self
    }

    /// Sets a per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets basic-auth credentials.
    pub fn basic_auth(mut self, username: impl Into<String>, password: Option<String>) -> Self {
        self.auth = Some(BasicAuth {
            username: username.into(),
            password,
        });
        self
    }
}

/// Request body bytes plus the content type implied by its encoding.
#[derive(Debug, Clone)]
pub struct RequestBody {
    /// Encoded body bytes.
    pub bytes: Vec<u8>,
    /// Content type set alongside the body, if the encoding implies one.
    pub content_type: Option<&'static str>,
}

/// A fully-resolved request; every field is concrete.
#[derive(Debug, Clone)]
pub struct ResolvedRequest {
    /// Request method.
    pub method: Method,
    /// Request URL with rendered query parameters applied.
    pub url: Url,
    /// Rendered headers in name order.
    pub headers: Vec<(String, String)>,
    /// Encoded request body, if any.
    pub body: Option<RequestBody>,
    /// Per-request timeout overriding the session default.
    pub timeout: Option<Duration>,
    /// Basic-auth credentials.
    pub auth: Option<BasicAuth>,
}

/// Renders every dynamic field of `request` against the property store.
///
/// Resolution is synchronous relative to the store's current snapshot; no
/// value is re-evaluated later in the invocation. Rendering an
/// already-concrete request yields the same request.
///
/// # Errors
///
/// * `StepError::MissingProperty` if a referenced property is absent
/// * `StepError::Configuration` for an unsupported method, an unparseable
///   URL, more than one body field, or a field value with no text form
pub fn resolve(
    request: &StepRequest,
    store: &dyn PropertyStore,
) -> Result<ResolvedRequest, StepError> {
    if !SUPPORTED_METHODS.contains(&request.method) {
        return Err(StepError::Configuration(format!(
            "unsupported method: {}",
            request.method
        )));
    }

    let mut url = Url::parse(&request.url)
        .map_err(|e| StepError::Configuration(format!("invalid URL '{}': {e}", request.url)))?;

    let mut headers = Vec::with_capacity(request.headers.len());
    for (name, value) in &request.headers {
        headers.push((name.clone(), scalar_text(&value.render(store)?)?));
    }

    if let Some(params) = &request.params {
        match params.render(store)? {
            Value::String(query) => append_raw_query(&mut url, &query),
            rendered => {
                url.query_pairs_mut().extend_pairs(flatten_pairs(&rendered)?);
            }
        }
        debug!("Rendered parameters: {}", url.query().unwrap_or_default());
    }

    let body = resolve_body(request, store)?;
    if let Some(ref body) = body {
        debug!("Rendered request body: {} bytes", body.bytes.len());
    }

    Ok(ResolvedRequest {
        method: request.method.clone(),
        url,
        headers,
        body,
        timeout: request.timeout,
        auth: request.auth.clone(),
    })
}

fn append_raw_query(url: &mut Url, query: &str) {
    let merged = match url.query() {
        Some(existing) if !existing.is_empty() => format!("{existing}&{query}"),
        _ => query.to_string(),
    };
    url.set_query(Some(&merged));
}

fn resolve_body(
    request: &StepRequest,
    store: &dyn PropertyStore,
) -> Result<Option<RequestBody>, StepError> {
    let populated = [&request.body, &request.form, &request.json]
        .iter()
        .filter(|field| field.is_some())
        .count();
    if populated > 1 {
        return Err(StepError::Configuration(
            "at most one of body, form, and json may be set".to_string(),
        ));
    }

    if let Some(body) = &request.body {
        let rendered = body.render(store)?;
        return Ok(Some(match rendered {
            // Mapping-typed data is form-encoded, like a form body
            Value::Object(_) => form_body(&rendered)?,
            other => RequestBody {
                bytes: scalar_text(&other)?.into_bytes(),
                content_type: None,
            },
        }));
    }
    if let Some(form) = &request.form {
        return Ok(Some(form_body(&form.render(store)?)?));
    }
    if let Some(json) = &request.json {
        let rendered = json.render(store)?;
        let bytes = serde_json::to_vec(&rendered)
            .map_err(|e| StepError::Configuration(format!("cannot encode JSON body: {e}")))?;
        return Ok(Some(RequestBody {
            bytes,
            content_type: Some("application/json"),
        }));
    }
    Ok(None)
}

fn form_body(value: &Value) -> Result<RequestBody, StepError> {
    let pairs = flatten_pairs(value)?;
    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    Ok(RequestBody {
        bytes: encoded.into_bytes(),
        content_type: Some("application/x-www-form-urlencoded"),
    })
}

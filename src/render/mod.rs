//! Dynamic parameter rendering.
//!
//! Request fields may be declared as deferred values bound to named build
//! properties. Rendering resolves every deferred value against the property
//! store's current snapshot before the request is constructed, so nothing
//! dynamic ever reaches the transport layer. Resolution happens exactly once
//! per invocation.

use std::collections::HashMap;

use serde_json::Value;

use crate::error_handling::StepError;

/// A key/value store of build-time properties consulted during rendering.
///
/// Values are scalars or mappings. The store is external to the step; this
/// trait is its interface boundary.
pub trait PropertyStore: Send + Sync {
    /// Looks up a property by name, returning its current value.
    fn lookup(&self, name: &str) -> Option<Value>;
}

/// In-memory property store.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    values: HashMap<String, Value>,
}

impl Properties {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }
}

impl PropertyStore for Properties {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }
}

/// A request field that is either concrete or bound to a named property.
#[derive(Debug, Clone, PartialEq)]
pub enum Renderable {
    /// An already-concrete value; rendering returns it unchanged.
    Literal(Value),
    /// A deferred value, resolved from the property store at render time.
    Property(String),
}

impl Renderable {
    /// A deferred value bound to the named property.
    pub fn property(name: impl Into<String>) -> Self {
        Renderable::Property(name.into())
    }

    /// Resolves this value against the store's current snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StepError::MissingProperty` if a referenced property is
    /// absent from the store.
    pub fn render(&self, store: &dyn PropertyStore) -> Result<Value, StepError> {
        match self {
            Renderable::Literal(value) => Ok(value.clone()),
            Renderable::Property(name) => store
                .lookup(name)
                .ok_or_else(|| StepError::MissingProperty(name.clone())),
        }
    }
}

impl From<&str> for Renderable {
    fn from(value: &str) -> Self {
        Renderable::Literal(Value::String(value.to_string()))
    }
}

impl From<String> for Renderable {
    fn from(value: String) -> Self {
        Renderable::Literal(Value::String(value))
    }
}

impl From<Value> for Renderable {
    fn from(value: Value) -> Self {
        Renderable::Literal(value)
    }
}

/// Converts a rendered scalar to its query/form text form.
///
/// Strings pass through unquoted; numbers and booleans convert to their
/// decimal/string form; null becomes the empty string.
///
/// # Errors
///
/// Returns `StepError::Configuration` for nested values, which have no
/// single-field text form.
pub fn scalar_text(value: &Value) -> Result<String, StepError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(StepError::Configuration(
            "nested values cannot be encoded as a query or form field".to_string(),
        )),
    }
}

/// Flattens a rendered mapping into ordered key/value pairs.
///
/// Pairs come out in the mapping's natural key order and are suitable for
/// query-string or form encoding.
///
/// # Errors
///
/// Returns `StepError::Configuration` if the value is not a mapping or one of
/// its entries is itself nested.
pub fn flatten_pairs(value: &Value) -> Result<Vec<(String, String)>, StepError> {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(key, entry)| Ok((key.clone(), scalar_text(entry)?)))
            .collect(),
        _ => Err(StepError::Configuration(
            "expected a mapping of field names to scalar values".to_string(),
        )),
    }
}

use std::collections::BTreeMap;

use thiserror::Error;

/// Field name → message, keyed by the backend's field names (`nombre`,
/// `precio`, `cantidadStock`, ...). Client-side and server-side validation
/// share this shape so both can be shown on the same surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    /// Overwrites entries for fields present in `other`; other fields are kept.
    pub fn merge(&mut self, other: &FieldErrors) {
        for (field, message) in &other.0 {
            self.0.insert(field.clone(), message.clone());
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<BTreeMap<String, String>> for FieldErrors {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

/// Errors that can occur talking to the catalog backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// No response received: connection failure, DNS, or timeout.
    #[error("network error: {0}")]
    Network(String),
    /// Non-2xx response without field-level detail.
    #[error("server error (HTTP {status}): {}", .message.as_deref().unwrap_or("no detail"))]
    Server { status: u16, message: Option<String> },
    /// Non-2xx response carrying per-field validation messages.
    #[error("validation error: {message}")]
    Validation { message: String, fields: FieldErrors },
    /// The target product does not exist.
    #[error("product not found")]
    NotFound,
    /// A 2xx response whose body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
    /// The HTTP client could not be built from the given configuration.
    #[error("config error: {0}")]
    Config(String),
}

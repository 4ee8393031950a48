use serde_json::{Map, Value};

/// A named capability that can pull one raw string token out of an opaque
/// input context. Implementations must be pure in the context and their
/// configured key, and must signal nothing beyond presence or absence;
/// deciding whether a token is *usable* belongs to converters and
/// validators, never to the source.
pub trait TokenSource: Send + Sync {
    /// Label for the part of the input this source reads, e.g. "headers".
    /// Used verbatim in missing-required-parameter messages.
    fn reads_from(&self) -> &str;

    /// The lookup key within that part.
    fn key(&self) -> &str;

    fn extract(&self, input: &Value) -> Option<String>;
}

fn section<'a>(input: &'a Value, name: &str) -> Option<&'a Map<String, Value>> {
    input.get(name).and_then(Value::as_object)
}

fn scalar_token(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(num) => Some(num.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Reads the `headers` section of the input. Header names match
/// case-insensitively.
pub struct HeaderSource {
    key: String,
}

impl HeaderSource {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl TokenSource for HeaderSource {
    fn reads_from(&self) -> &str {
        "headers"
    }

    fn key(&self) -> &str {
        &self.key
    }

    fn extract(&self, input: &Value) -> Option<String> {
        let headers = section(input, "headers")?;
        headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&self.key))
            .and_then(|(_, value)| scalar_token(value))
    }
}

/// Reads the `query` section of the input. Keys match exactly.
pub struct QuerySource {
    key: String,
}

impl QuerySource {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl TokenSource for QuerySource {
    fn reads_from(&self) -> &str {
        "query string"
    }

    fn key(&self) -> &str {
        &self.key
    }

    fn extract(&self, input: &Value) -> Option<String> {
        section(input, "query")?.get(&self.key).and_then(scalar_token)
    }
}

/// Reads the `route` section of the input. Keys match exactly.
pub struct RouteSource {
    key: String,
}

impl RouteSource {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl TokenSource for RouteSource {
    fn reads_from(&self) -> &str {
        "route"
    }

    fn key(&self) -> &str {
        &self.key
    }

    fn extract(&self, input: &Value) -> Option<String> {
        section(input, "route")?.get(&self.key).and_then(scalar_token)
    }
}

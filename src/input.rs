use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};

/// Builds the conventional input-context shape consumed by the built-in
/// token sources: an object with `headers`, `query` and `route` sections.
/// Any `Value` carrying those sections works just as well; this type is a
/// convenience only and the pipeline never requires it.
#[derive(Default)]
pub struct RequestInput {
    headers: Map<String, Value>,
    query: Map<String, Value>,
    route: Map<String, Value>,
}

impl RequestInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), Value::String(value.into()));
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), Value::String(value.into()));
        self
    }

    pub fn route(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.route.insert(key.into(), Value::String(value.into()));
        self
    }

    /// Splits a raw query string ("a=1&b=two%20words") into the query
    /// section, percent-decoding keys and values. A pair without `=`
    /// yields an empty value; a leading `?` is tolerated.
    pub fn query_string(mut self, raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        for pair in raw.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            self.query
                .insert(decode_component(key), Value::String(decode_component(value)));
        }
        self
    }

    pub fn into_value(self) -> Value {
        let mut root = Map::new();
        root.insert("headers".to_string(), Value::Object(self.headers));
        root.insert("query".to_string(), Value::Object(self.query));
        root.insert("route".to_string(), Value::Object(self.route));
        Value::Object(root)
    }
}

fn decode_component(text: &str) -> String {
    // '+' means space in query strings; literal plus arrives as %2B.
    let text = text.replace('+', " ");
    percent_decode_str(&text).decode_utf8_lossy().into_owned()
}

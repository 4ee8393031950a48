use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::source::TokenSource;

/// Converts a raw string token into a type-erased value. `None` means the
/// token is not a representation of the parameter's type.
pub type Converter = Arc<dyn Fn(&str) -> Option<Value> + Send + Sync>;

/// Inspects a resolved value and yields every problem found with it. An
/// empty list means the value is acceptable.
pub type Validator = Arc<dyn Fn(&Value) -> Vec<ValidationError> + Send + Sync>;

/// Invoked with a parameter's final value once the entire run is clean.
pub type OnResolved = Arc<dyn Fn(&Value) + Send + Sync>;

/// A single problem reported by a validator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    /// Panics when `message` is blank; a validator with nothing to report
    /// must return an empty list instead.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        assert!(
            !message.trim().is_empty(),
            "validation error message cannot be blank"
        );
        Self { message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// One token source bound to a parameter, together with the validators
/// that run only against values extracted through this source.
pub struct SourceBinding {
    pub(crate) source: Box<dyn TokenSource>,
    pub(crate) pre_validators: Vec<Validator>,
}

impl SourceBinding {
    pub fn new(source: Box<dyn TokenSource>) -> Self {
        Self {
            source,
            pre_validators: Vec::new(),
        }
    }
}

/// The immutable description of one declared parameter. Bindings are a
/// priority list: the engine walks them in order and the first decisive
/// source wins, so the highest-priority source belongs at index 0.
pub struct ParamSpec {
    pub(crate) name: String,
    pub(crate) required: bool,
    pub(crate) bindings: Vec<SourceBinding>,
    pub(crate) convert: Converter,
    pub(crate) post_validators: Vec<Validator>,
    pub(crate) default_value: Value,
    pub(crate) on_resolved: Vec<OnResolved>,
}

impl ParamSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn required(&self) -> bool {
        self.required
    }
}

impl fmt::Debug for ParamSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamSpec")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("bindings", &self.bindings.len())
            .field("default_value", &self.default_value)
            .finish()
    }
}

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Terminal result of one resolution run. Either every parameter resolved
/// and the outcome carries the full name-to-value mapping, or the run
/// failed and the outcome carries one aggregated error message. The
/// outcome holds no reference back to the resolver that produced it.
pub struct ParseOutcome {
    state: OutcomeState,
}

enum OutcomeState {
    Success { values: Vec<(String, Value)> },
    Failure { message: String },
}

impl ParseOutcome {
    pub(crate) fn success(values: Vec<(String, Value)>) -> Self {
        Self {
            state: OutcomeState::Success { values },
        }
    }

    pub(crate) fn failure(message: String) -> Self {
        debug_assert!(!message.trim().is_empty());
        Self {
            state: OutcomeState::Failure { message },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.state, OutcomeState::Success { .. })
    }

    /// The aggregated error message of a failed run, `None` on success.
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            OutcomeState::Success { .. } => None,
            OutcomeState::Failure { message } => Some(message),
        }
    }

    /// The resolved value of a parameter. Asking a failed outcome, or
    /// asking for a name that was never declared, is misuse and panics.
    pub fn value(&self, name: &str) -> &Value {
        match &self.state {
            OutcomeState::Failure { .. } => {
                panic!("cannot retrieve a value from a failed parse")
            }
            OutcomeState::Success { values } => values
                .iter()
                .find(|(candidate, _)| candidate == name)
                .map(|(_, value)| value)
                .unwrap_or_else(|| panic!("no parameter named ({name}) was declared")),
        }
    }

    /// Typed view of [`value`](Self::value). A value that does not
    /// deserialize as `T` means the caller asked for a type other than
    /// the one the parameter was declared with, which panics.
    pub fn value_as<T: DeserializeOwned>(&self, name: &str) -> T {
        serde_json::from_value(self.value(name).clone()).unwrap_or_else(|err| {
            panic!("parameter ({name}) does not hold the requested type: {err}")
        })
    }

    /// Name/value pairs in parameter-declaration order. Panics on a
    /// failed outcome.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        match &self.state {
            OutcomeState::Failure { .. } => {
                panic!("cannot retrieve values from a failed parse")
            }
            OutcomeState::Success { values } => {
                values.iter().map(|(name, value)| (name.as_str(), value))
            }
        }
    }
}

impl fmt::Debug for ParseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            OutcomeState::Success { values } => f
                .debug_struct("ParseOutcome")
                .field("success", &true)
                .field("values", values)
                .finish(),
            OutcomeState::Failure { message } => f
                .debug_struct("ParseOutcome")
                .field("success", &false)
                .field("error", message)
                .finish(),
        }
    }
}

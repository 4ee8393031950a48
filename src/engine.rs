use serde_json::Value;
use tracing::{debug, trace};

use crate::param::{ParamSpec, ValidationError};
use crate::settings::ResolverSettings;

/// What one engine run decided for one parameter. Created per run and
/// discarded once the final outcome is assembled.
pub(crate) struct ParamOutcome {
    pub(crate) value: Value,
    pub(crate) used_default: bool,
    pub(crate) success: bool,
    pub(crate) errors: Vec<ValidationError>,
}

impl ParamOutcome {
    fn resolved(value: Value, used_default: bool) -> Self {
        Self {
            value,
            used_default,
            success: true,
            errors: Vec::new(),
        }
    }

    fn failed(errors: Vec<ValidationError>) -> Self {
        Self {
            value: Value::Null,
            used_default: false,
            success: false,
            errors,
        }
    }
}

/// Walks the parameter's bindings in priority order and stops at the first
/// decisive one. Completion callbacks are not the engine's concern: they
/// only fire once the whole parameter set is known to be clean.
pub(crate) fn resolve_param(
    spec: &ParamSpec,
    input: &Value,
    settings: &ResolverSettings,
) -> ParamOutcome {
    let mut token_found = false;

    for binding in &spec.bindings {
        let source = binding.source.as_ref();
        let Some(token) = source.extract(input) else {
            trace!(
                parameter = spec.name.as_str(),
                reads_from = source.reads_from(),
                key = source.key(),
                "source yielded no token"
            );
            continue;
        };

        let Some(value) = (spec.convert)(&token) else {
            token_found = true;
            if settings.skip_failed_conversions {
                trace!(
                    parameter = spec.name.as_str(),
                    token = token.as_str(),
                    "unparsable token, next source"
                );
                continue;
            }
            return ParamOutcome::failed(vec![ValidationError::new(format!(
                "value provided ({token}) for parameter ({}) was invalid and could not be parsed",
                spec.name
            ))]);
        };

        let mut errors = Vec::new();
        for validator in &binding.pre_validators {
            errors.extend(validator(&value));
        }

        if errors.is_empty() {
            debug!(
                parameter = spec.name.as_str(),
                reads_from = source.reads_from(),
                "parameter resolved"
            );
            return ParamOutcome::resolved(value, false);
        }

        if settings.skip_failed_pre_validations {
            trace!(
                parameter = spec.name.as_str(),
                reads_from = source.reads_from(),
                "pre-validation failed, next source"
            );
            continue;
        }

        let mut failure = vec![ValidationError::new(format!(
            "parameter ({}) failed pre-validation...",
            spec.name
        ))];
        failure.extend(errors);
        return ParamOutcome::failed(failure);
    }

    if token_found {
        return ParamOutcome::failed(vec![ValidationError::new(format!(
            "value(s) provided for parameter ({}) were invalid and could not be parsed",
            spec.name
        ))]);
    }

    if spec.required {
        let usage: Vec<String> = spec
            .bindings
            .iter()
            .map(|binding| {
                format!(
                    "\trequest {} with a key of {}",
                    binding.source.reads_from(),
                    binding.source.key()
                )
            })
            .collect();
        return ParamOutcome::failed(vec![ValidationError::new(format!(
            "required parameter ({}) missing, it can be specified using:\n{}",
            spec.name,
            usage.join("\n")
        ))]);
    }

    debug!(parameter = spec.name.as_str(), "parameter absent, default used");
    ParamOutcome::resolved(spec.default_value.clone(), true)
}

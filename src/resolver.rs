use serde_json::Value;
use tracing::debug;

use crate::builder::ResolverBuilder;
use crate::engine::{resolve_param, ParamOutcome};
use crate::outcome::ParseOutcome;
use crate::param::ParamSpec;
use crate::settings::ResolverSettings;

/// The built, immutable set of parameter definitions.
///
/// A resolver is safe to share across threads: every `resolve` run
/// allocates its own per-parameter state and produces its own outcome, so
/// concurrent runs against independent inputs never interfere.
#[derive(Debug)]
pub struct Resolver {
    params: Vec<ParamSpec>,
    settings: ResolverSettings,
}

impl Resolver {
    pub(crate) fn new(params: Vec<ParamSpec>, settings: ResolverSettings) -> Self {
        Self { params, settings }
    }

    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }

    /// The settings the resolver was built with.
    pub fn settings(&self) -> ResolverSettings {
        self.settings
    }

    /// Declared parameter names, in declaration order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(ParamSpec::name)
    }

    /// Resolves `input` with the settings the resolver was built with.
    pub fn resolve(&self, input: &Value) -> ParseOutcome {
        self.resolve_with(input, self.settings)
    }

    /// Resolves `input` with explicit settings for this run only.
    pub fn resolve_with(&self, input: &Value, settings: ResolverSettings) -> ParseOutcome {
        // Per-parameter resolution; parameters are independent here.
        let outcomes: Vec<ParamOutcome> = self
            .params
            .iter()
            .map(|spec| resolve_param(spec, input, &settings))
            .collect();

        // Any individual failure ends the run before post-validation or
        // callbacks; messages aggregate in declaration order.
        if outcomes.iter().any(|outcome| !outcome.success) {
            let message: Vec<&str> = outcomes
                .iter()
                .filter(|outcome| !outcome.success)
                .flat_map(|outcome| outcome.errors.iter())
                .map(|error| error.message())
                .collect();
            debug!(
                failed = outcomes.iter().filter(|o| !o.success).count(),
                "resolution failed"
            );
            return ParseOutcome::failure(message.join("\n"));
        }

        // Post-validation only sees a fully resolved parameter set.
        let mut messages: Vec<String> = Vec::new();
        for (spec, outcome) in self.params.iter().zip(&outcomes) {
            let mut errors = Vec::new();
            for validator in &spec.post_validators {
                errors.extend(validator(&outcome.value));
            }
            if !errors.is_empty() {
                messages.push(format!("parameter ({}) failed validation...", spec.name));
                messages.extend(errors.into_iter().map(|error| error.message().to_string()));
            }
        }
        if !messages.is_empty() {
            debug!("post-validation failed");
            return ParseOutcome::failure(messages.join("\n"));
        }

        // The set is clean: completion callbacks fire exactly once, in
        // declaration order.
        for (spec, outcome) in self.params.iter().zip(&outcomes) {
            for callback in &spec.on_resolved {
                callback(&outcome.value);
            }
        }

        debug!(
            parameters = self.params.len(),
            defaults_used = outcomes.iter().filter(|o| o.used_default).count(),
            "resolution succeeded"
        );
        ParseOutcome::success(
            self.params
                .iter()
                .zip(outcomes)
                .map(|(spec, outcome)| (spec.name.clone(), outcome.value))
                .collect(),
        )
    }
}

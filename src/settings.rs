use serde::{Deserialize, Serialize};

/// Failure-skip policies for a resolution run.
///
/// Both default to `true` (lenient): a bad token from one source does not
/// stop lower-priority sources from being consulted. Strict mode (`false`)
/// turns the first bad token or pre-validation failure into a decisive
/// failure for that parameter.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverSettings {
    /// Keep consulting further sources when a token fails conversion.
    pub skip_failed_conversions: bool,
    /// Keep consulting further sources when a converted value fails the
    /// source's own pre-validators.
    pub skip_failed_pre_validations: bool,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            skip_failed_conversions: true,
            skip_failed_pre_validations: true,
        }
    }
}

impl ResolverSettings {
    /// Both skip policies disabled: fail fast on the first bad token.
    pub fn strict() -> Self {
        Self {
            skip_failed_conversions: false,
            skip_failed_pre_validations: false,
        }
    }
}

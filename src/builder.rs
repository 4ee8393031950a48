use std::any::{type_name, TypeId};
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::param::{Converter, OnResolved, ParamSpec, SourceBinding, ValidationError, Validator};
use crate::registry::ConverterRegistry;
use crate::resolver::Resolver;
use crate::settings::ResolverSettings;
use crate::source::{HeaderSource, QuerySource, RouteSource, TokenSource};

/// Accumulates the configuration of one parameter of type `T`.
///
/// Every call consumes and returns the builder by value; nothing is shared
/// or mutated behind the caller's back. The typed closures given here are
/// wrapped into their type-erased form immediately, and the whole builder
/// is erased when handed to [`ResolverBuilder::param`].
pub struct Param<T> {
    name: String,
    required: bool,
    bindings: Vec<SourceBinding>,
    converter: Option<Converter>,
    post_validators: Vec<Validator>,
    default_value: Value,
    on_resolved: Vec<OnResolved>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Param<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            bindings: Vec::new(),
            converter: None,
            post_validators: Vec::new(),
            default_value: Value::Null,
            on_resolved: Vec::new(),
            _marker: PhantomData,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Binds a header source. Sources are consulted in the order they are
    /// added; add the highest-priority one first.
    pub fn from_header(self, key: impl Into<String>) -> Self {
        self.from_source(HeaderSource::new(key))
    }

    pub fn from_query(self, key: impl Into<String>) -> Self {
        self.from_source(QuerySource::new(key))
    }

    pub fn from_route(self, key: impl Into<String>) -> Self {
        self.from_source(RouteSource::new(key))
    }

    pub fn from_source(mut self, source: impl TokenSource + 'static) -> Self {
        self.bindings.push(SourceBinding::new(Box::new(source)));
        self
    }

    /// Attaches a validator to the most recently added source; it runs
    /// only against values extracted through that source. Calling this
    /// before any source is bound is misuse and panics.
    pub fn pre_validate<F>(mut self, validate: F) -> Self
    where
        F: Fn(&T) -> Vec<ValidationError> + Send + Sync + 'static,
    {
        let binding = self
            .bindings
            .last_mut()
            .expect("pre_validate needs a preceding source to attach to");
        binding.pre_validators.push(erase_validator(validate));
        self
    }

    /// Replaces the registry-supplied converter for this parameter.
    pub fn convert_with<F>(mut self, parse: F) -> Self
    where
        F: Fn(&str) -> Option<T> + Send + Sync + 'static,
    {
        self.converter = Some(Arc::new(move |token| {
            parse(token).and_then(|value| serde_json::to_value(value).ok())
        }));
        self
    }

    /// Adds a validator that runs once every parameter has individually
    /// resolved. To check a value as it comes out of a specific source,
    /// use [`pre_validate`](Self::pre_validate) instead.
    pub fn post_validate<F>(mut self, validate: F) -> Self
    where
        F: Fn(&T) -> Vec<ValidationError> + Send + Sync + 'static,
    {
        self.post_validators.push(erase_validator(validate));
        self
    }

    /// The value an optional parameter takes when no source yields a
    /// usable token.
    pub fn default_value(mut self, value: T) -> Self {
        self.default_value =
            serde_json::to_value(value).expect("default value must serialize to a tagged value");
        self
    }

    /// Adds a callback invoked with the final value, only when the whole
    /// run succeeds.
    pub fn on_resolved<F>(mut self, callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.on_resolved.push(Arc::new(move |value: &Value| {
            callback(retype::<T>(value));
        }));
        self
    }

    fn erase(self) -> ParamConfig {
        ParamConfig {
            name: self.name,
            required: self.required,
            bindings: self.bindings,
            converter: self.converter,
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            post_validators: self.post_validators,
            default_value: self.default_value,
            on_resolved: self.on_resolved,
        }
    }
}

fn erase_validator<T, F>(validate: F) -> Validator
where
    T: DeserializeOwned + 'static,
    F: Fn(&T) -> Vec<ValidationError> + Send + Sync + 'static,
{
    Arc::new(move |value: &Value| validate(&retype::<T>(value)))
}

/// Values only ever enter a parameter through its own converter or
/// default, so a mismatch here means the caller declared one type and
/// asked for another.
fn retype<T: DeserializeOwned>(value: &Value) -> T {
    serde_json::from_value(value.clone())
        .expect("parameter value no longer matches its declared type")
}

/// The type-erased form of a parameter configuration, waiting for its
/// converter to be resolved at build time.
struct ParamConfig {
    name: String,
    required: bool,
    bindings: Vec<SourceBinding>,
    converter: Option<Converter>,
    type_id: TypeId,
    type_name: &'static str,
    post_validators: Vec<Validator>,
    default_value: Value,
    on_resolved: Vec<OnResolved>,
}

/// Accumulates parameter configurations, converter registrations and
/// settings, and produces an immutable [`Resolver`] in one explicit
/// `build` step.
pub struct ResolverBuilder {
    registry: ConverterRegistry,
    params: Vec<ParamConfig>,
    settings: ResolverSettings,
}

impl ResolverBuilder {
    /// Starts from the default converter registry.
    pub fn new() -> Self {
        Self {
            registry: ConverterRegistry::with_defaults(),
            params: Vec::new(),
            settings: ResolverSettings::default(),
        }
    }

    /// Replaces the converter registry wholesale.
    pub fn with_registry(mut self, registry: ConverterRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Registers a converter for `T` in the builder's registry.
    pub fn register_converter<T, F>(mut self, parse: F) -> Self
    where
        T: Serialize + 'static,
        F: Fn(&str) -> Option<T> + Send + Sync + 'static,
    {
        self.registry.register(parse);
        self
    }

    pub fn settings(mut self, settings: ResolverSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn param<T>(mut self, param: Param<T>) -> Self
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        self.params.push(param.erase());
        self
    }

    /// Produces the immutable resolver. Fails when a parameter name is
    /// blank or duplicated, or when a parameter's type has neither an
    /// explicit converter nor a registry entry.
    pub fn build(self) -> Result<Resolver> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut specs = Vec::with_capacity(self.params.len());

        for config in self.params {
            if config.name.trim().is_empty() {
                bail!("parameter names cannot be blank");
            }
            if !seen.insert(config.name.clone()) {
                bail!("parameter ({}) is declared more than once", config.name);
            }
            let convert = match config.converter {
                Some(converter) => converter,
                None => self.registry.lookup_by_id(config.type_id).ok_or_else(|| {
                    anyhow!(
                        "no converter registered for parameter ({}) of type {}",
                        config.name,
                        config.type_name
                    )
                })?,
            };
            specs.push(ParamSpec {
                name: config.name,
                required: config.required,
                bindings: config.bindings,
                convert,
                post_validators: config.post_validators,
                default_value: config.default_value,
                on_resolved: config.on_resolved,
            });
        }

        Ok(Resolver::new(specs, self.settings))
    }
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

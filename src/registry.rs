use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::param::Converter;

/// Explicit table of token converters keyed by target type.
///
/// The table is consulted once per parameter, at build time, for any
/// parameter that supplies no explicit converter; a declared type that is
/// neither listed here nor given one is a configuration error surfaced by
/// `build()`, not at first use.
pub struct ConverterRegistry {
    converters: HashMap<TypeId, Converter>,
}

impl ConverterRegistry {
    pub fn empty() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// Registry pre-populated for the primitive types tokens commonly
    /// carry: the integer widths, floats, `bool`, `char` and `String`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(|token: &str| token.parse::<i8>().ok());
        registry.register(|token: &str| token.parse::<i16>().ok());
        registry.register(|token: &str| token.parse::<i32>().ok());
        registry.register(|token: &str| token.parse::<i64>().ok());
        registry.register(|token: &str| token.parse::<u8>().ok());
        registry.register(|token: &str| token.parse::<u16>().ok());
        registry.register(|token: &str| token.parse::<u32>().ok());
        registry.register(|token: &str| token.parse::<u64>().ok());
        registry.register(|token: &str| token.parse::<f32>().ok().filter(|f| f.is_finite()));
        registry.register(|token: &str| token.parse::<f64>().ok().filter(|f| f.is_finite()));
        registry.register(|token: &str| match token.trim() {
            t if t.eq_ignore_ascii_case("true") => Some(true),
            t if t.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        });
        registry.register(|token: &str| {
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        });
        registry.register(|token: &str| Some(token.to_string()));
        registry
    }

    /// Registers (or replaces) the converter for `T`. The parse closure
    /// yields `None` for tokens that are not a representation of `T`.
    pub fn register<T, F>(&mut self, parse: F)
    where
        T: Serialize + 'static,
        F: Fn(&str) -> Option<T> + Send + Sync + 'static,
    {
        let converter: Converter =
            Arc::new(move |token| parse(token).and_then(|value| serde_json::to_value(value).ok()));
        self.converters.insert(TypeId::of::<T>(), converter);
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.converters.contains_key(&TypeId::of::<T>())
    }

    pub fn lookup<T: 'static>(&self) -> Option<Converter> {
        self.lookup_by_id(TypeId::of::<T>())
    }

    pub(crate) fn lookup_by_id(&self, id: TypeId) -> Option<Converter> {
        self.converters.get(&id).cloned()
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

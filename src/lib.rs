pub mod builder;
mod engine;
pub mod input;
pub mod outcome;
pub mod param;
pub mod registry;
pub mod resolver;
pub mod settings;
pub mod source;

pub use builder::{Param, ResolverBuilder};
pub use input::RequestInput;
pub use outcome::ParseOutcome;
pub use param::{SourceBinding, ValidationError};
pub use registry::ConverterRegistry;
pub use resolver::Resolver;
pub use settings::ResolverSettings;
pub use source::{HeaderSource, QuerySource, RouteSource, TokenSource};

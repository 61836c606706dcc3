//! System configuration: the typed schema, the row decoder, and a TTL cache.

pub mod cache;
pub mod error;
pub mod model;
pub mod source;

pub use cache::ConfigCache;
pub use error::ConfigError;
pub use model::{decode, ConfigEntry, SystemConfig};
pub use source::{ConfigSource, JsonFileSource};

//! Configuration sources and the loader that applies them to a datastore.

mod env;
mod file;
mod loader;
mod properties;
mod source;

pub use env::EnvSource;
pub use file::{FileSource, TomlSource};
pub use loader::Loader;
pub use properties::{parse_key_value, PropertySource};
pub use source::{Decoded, Entry, MergeMode, Source};

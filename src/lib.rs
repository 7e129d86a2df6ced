//! A hierarchical, typed configuration store.
//!
//! Configuration lives in a tree of [`Property`] nodes owned by a
//! [`Datastore`]. Nodes are addressed with dotted paths (`app.database.port`),
//! can carry a [`Schema`] describing their type, required-ness and value
//! constraints, and are populated from TOML files, `key=value` properties and
//! environment variables through the [`config::Loader`].

pub mod cmdline;
pub mod config;
mod datastore;
mod error;
pub mod logging;
pub mod prop;
pub mod schema;
pub mod value;

pub use datastore::Datastore;
pub use error::{Error, Result};
pub use prop::Property;
pub use schema::{Schema, SchemaBuilder};
pub use value::{Value, ValueType};

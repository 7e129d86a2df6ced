//! The datastore: owner of the property tree and its path-based API.

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::config::{parse_key_value, Decoded, Entry, FileSource, MergeMode, Source, TomlSource};
use crate::prop::{split_path, ObjectProperty, Property};
use crate::schema::Schema;
use crate::value::{infer_value, Value, ValueType};
use crate::{Error, Result};

const ROOT_KEY: &str = "root";

/// Owns the root object of a configuration tree.
///
/// The path API (`set_property`, `get_property`, ...) never creates nodes.
/// The ingestion API (`ingest*`, `parse_key_value_pair`) creates missing
/// intermediate objects and leaves with the type the source decoded.
///
/// ```
/// use config_tree::Datastore;
///
/// let mut store = Datastore::new();
/// store.parse_key_value_pair("app.database.port=5432")?;
/// store.set_property("app.database.port", 6543_i64)?;
///
/// let port = store.get_property("app.database.port")?;
/// assert_eq!(port.get_value()?.as_integer(), Some(6543));
/// # Ok::<(), config_tree::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Datastore {
    root: Property,
}

impl Default for Datastore {
    fn default() -> Self {
        Self::new()
    }
}

impl Datastore {
    pub fn new() -> Self {
        Self {
            root: Property::object(ROOT_KEY),
        }
    }

    pub fn root(&self) -> &Property {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Property {
        &mut self.root
    }

    fn object_at_mut(&mut self, path: &str) -> Result<&mut ObjectProperty> {
        let node = self.root.resolve_path_mut(path)?;
        let key = node.key().to_string();
        node.as_object_mut().ok_or(Error::NotAnObject(key))
    }

    /// Adds `property` as a child of the object at `parent_path` (root when
    /// empty), replacing any child with the same key.
    pub fn add_property(&mut self, parent_path: &str, property: Property) -> Result<()> {
        self.object_at_mut(parent_path)?.add_property(property);
        Ok(())
    }

    /// Sets the value of an existing leaf.
    pub fn set_property(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        self.root.set_path_value(path, value)
    }

    pub fn get_property(&self, path: &str) -> Result<&Property> {
        self.root.resolve_path(path)
    }

    pub fn get_property_mut(&mut self, path: &str) -> Result<&mut Property> {
        self.root.resolve_path_mut(path)
    }

    pub fn has_property(&self, path: &str) -> bool {
        self.root.resolve_path(path).is_ok()
    }

    /// Detaches and returns the subtree at `path`. The root cannot be removed.
    pub fn remove_property(&mut self, path: &str) -> Result<Property> {
        let segments = split_path(path)?;
        let Some((leaf, parents)) = segments.split_last() else {
            return Err(Error::InvalidPath("cannot remove the root property".into()));
        };

        let parent = self.root.resolve_segments_mut(parents)?;
        let key = parent.key().to_string();
        parent
            .as_object_mut()
            .ok_or(Error::NotAnObject(key))?
            .remove_property(leaf)
    }

    /// Attaches `schema` to the node at `path` (`""` for the root).
    pub fn set_schema(&mut self, path: &str, schema: Arc<Schema>) -> Result<()> {
        self.root.resolve_path_mut(path)?.set_schema(schema);
        Ok(())
    }

    pub fn get_schema(&self, path: &str) -> Result<Arc<Schema>> {
        self.get_property(path)?
            .schema()
            .cloned()
            .ok_or_else(|| Error::SchemaNotFound(path.to_string()))
    }

    pub fn validate_property(&self, path: &str) -> Result<()> {
        self.get_property(path)?.validate()
    }

    pub fn validate_all(&self) -> Result<()> {
        self.root.validate()
    }

    /// Lists the direct children of `base_path`, sorted.
    ///
    /// Entries are full paths (`base_path.child`); at the root they are the
    /// bare child keys.
    pub fn list_properties(&self, base_path: &str) -> Result<Vec<String>> {
        let base = self.get_property(base_path)?;
        let object = base
            .as_object()
            .ok_or_else(|| Error::NotAnObject(base_path.to_string()))?;

        let mut paths: Vec<String> = object
            .child_keys()
            .into_iter()
            .map(|key| {
                if base_path.is_empty() {
                    key
                } else {
                    format!("{base_path}.{key}")
                }
            })
            .collect();
        paths.sort();
        Ok(paths)
    }

    /// Number of nodes in the tree, not counting the root.
    pub fn size(&self) -> usize {
        self.root.node_count() - 1
    }

    /// Drops the whole tree, including any schema attached to the root.
    pub fn clear(&mut self) {
        self.root = Property::object(ROOT_KEY);
    }

    /// Writes one entry, creating intermediate objects as needed.
    pub fn ingest(&mut self, entry: Entry, mode: MergeMode) -> Result<()> {
        let segments = split_path(&entry.path)?;
        let Some((leaf, parents)) = segments.split_last() else {
            return Err(Error::InvalidPath(
                "cannot ingest a value at the root path".into(),
            ));
        };

        trace!(path = %entry.path, ?mode, "ingesting entry");
        let parent = self.root.object_at_or_create(parents)?;
        merge_child(parent, leaf, entry.value, mode)
    }

    /// Writes entries in order. On failure the entries already written stay
    /// in the tree.
    pub fn ingest_entries<I>(&mut self, entries: I, mode: MergeMode) -> Result<()>
    where
        I: IntoIterator<Item = Entry>,
    {
        entries
            .into_iter()
            .try_for_each(|entry| self.ingest(entry, mode))
    }

    pub fn ingest_source(&mut self, source: &dyn Source, mode: MergeMode) -> Result<()> {
        self.ingest_entries(source.entries()?, mode)
    }

    /// Ingests a TOML file, overwriting existing values.
    pub fn ingest_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.ingest_source(&FileSource::new(path, true), MergeMode::Overwrite)
    }

    /// Ingests an in-memory TOML document, overwriting existing values.
    pub fn ingest_toml_str(&mut self, text: &str) -> Result<()> {
        self.ingest_source(&TomlSource::new(text), MergeMode::Overwrite)
    }

    /// Ingests a `key=value` literal with an inferred type.
    pub fn parse_key_value_pair(&mut self, pair: &str) -> Result<()> {
        let (key, value) = parse_key_value(pair)?;
        self.ingest(Entry::new(key, infer_value(&value)), MergeMode::Overwrite)
    }

    /// Converts the tree into a TOML table.
    pub fn to_toml(&self) -> toml::Table {
        match self.root.to_toml() {
            toml::Value::Table(table) => table,
            _ => toml::Table::new(),
        }
    }

    /// Deserializes the whole tree into a typed configuration struct.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        toml::Value::Table(self.to_toml())
            .try_into()
            .map_err(|e: toml::de::Error| Error::ParsingError {
                context: "datastore contents".into(),
                message: e.to_string(),
            })
    }
}

fn merge_child(parent: &mut ObjectProperty, key: &str, value: Decoded, mode: MergeMode) -> Result<()> {
    if !parent.contains(key) {
        debug!(key, "creating property");
        parent.add_property(value.into_property(key));
        return Ok(());
    }

    let existing = parent.get_property_mut(key)?;
    merge_into(existing, value, mode)
}

fn merge_into(existing: &mut Property, value: Decoded, mode: MergeMode) -> Result<()> {
    let found = existing.value_type();
    match value {
        Decoded::Table(children) => {
            let object = existing.as_object_mut().ok_or(Error::TypeMismatch {
                expected: ValueType::Object,
                found,
            })?;
            children
                .into_iter()
                .try_for_each(|(key, child)| merge_child(object, &key, child, mode))
        }
        _ if mode == MergeMode::FillMissing => {
            trace!(key = existing.key(), "already set, keeping existing value");
            Ok(())
        }
        Decoded::Scalar(value) => {
            debug!(key = existing.key(), %value, "overwriting property");
            existing.set_value(value)
        }
        Decoded::Array(items) => {
            let array = existing.as_array_mut().ok_or(Error::TypeMismatch {
                expected: ValueType::Array,
                found,
            })?;
            array.replace_items(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| item.into_property(index.to_string()))
                    .collect(),
            );
            Ok(())
        }
    }
}

use std::collections::BTreeMap;

use super::Property;
use crate::{Error, Result};

/// Keyed container. Children are kept sorted by key.
#[derive(Debug, Clone, Default)]
pub struct ObjectProperty {
    children: BTreeMap<String, Property>,
}

impl ObjectProperty {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `property` under its own key, returning any child it replaced.
    pub fn add_property(&mut self, property: Property) -> Option<Property> {
        self.children.insert(property.key().to_string(), property)
    }

    pub fn get_property(&self, key: &str) -> Result<&Property> {
        self.children
            .get(key)
            .ok_or_else(|| Error::PropertyNotFound(key.to_string()))
    }

    pub fn get_property_mut(&mut self, key: &str) -> Result<&mut Property> {
        self.children
            .get_mut(key)
            .ok_or_else(|| Error::PropertyNotFound(key.to_string()))
    }

    /// Detaches and returns the subtree stored under `key`.
    pub fn remove_property(&mut self, key: &str) -> Result<Property> {
        self.children
            .remove(key)
            .ok_or_else(|| Error::PropertyNotFound(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.children.contains_key(key)
    }

    /// Direct child keys in lexicographic order.
    pub fn child_keys(&self) -> Vec<String> {
        self.children.keys().cloned().collect()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.children.iter().map(|(key, child)| (key.as_str(), child))
    }

    /// Returns the child at `key`, inserting the result of `create` first if absent.
    pub(crate) fn get_or_insert_with(
        &mut self,
        key: &str,
        create: impl FnOnce() -> Property,
    ) -> &mut Property {
        self.children
            .entry(key.to_string())
            .or_insert_with(create)
    }
}

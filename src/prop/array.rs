use super::Property;
use crate::{Error, Result};

/// Index-addressed container. Items may be of mixed types; only an item
/// schema constrains them.
#[derive(Debug, Clone, Default)]
pub struct ArrayProperty {
    items: Vec<Property>,
}

impl ArrayProperty {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&mut self, item: Property) {
        self.items.push(item);
    }

    pub fn get_item(&self, index: usize) -> Result<&Property> {
        let len = self.items.len();
        self.items
            .get(index)
            .ok_or(Error::OutOfBounds { index, len })
    }

    pub fn get_item_mut(&mut self, index: usize) -> Result<&mut Property> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(Error::OutOfBounds { index, len })
    }

    /// Removes the item at `index`, shifting later items down.
    pub fn remove_item(&mut self, index: usize) -> Result<Property> {
        if index >= self.items.len() {
            return Err(Error::OutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.items.iter()
    }

    pub(crate) fn replace_items(&mut self, items: Vec<Property>) {
        self.items = items;
    }
}

use std::collections::BTreeMap;
use std::sync::Arc;

use super::Constraint;
use crate::prop::{Property, PropertyKind};
use crate::value::{Value, ValueType};
use crate::{Error, Result};

/// Validation contract for one node of the property tree.
///
/// Object schemas carry one child schema per key, array schemas one item
/// schema applied to every element. The default value is descriptive only and
/// is never written into the tree.
#[derive(Debug, Clone)]
pub struct Schema {
    value_type: ValueType,
    required: bool,
    default: Option<Value>,
    constraints: Vec<Arc<dyn Constraint>>,
    description: String,
    properties: BTreeMap<String, Arc<Schema>>,
    item_schema: Option<Arc<Schema>>,
}

impl Schema {
    pub fn new(value_type: ValueType) -> Self {
        Self {
            value_type,
            required: false,
            default: None,
            constraints: Vec::new(),
            description: String::new(),
            properties: BTreeMap::new(),
            item_schema: None,
        }
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn set_default_value(&mut self, value: Value) {
        self.default = Some(value);
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn add_constraint(&mut self, constraint: Arc<dyn Constraint>) {
        self.constraints.push(constraint);
    }

    pub fn constraints(&self) -> &[Arc<dyn Constraint>] {
        &self.constraints
    }

    pub fn add_property_schema(&mut self, key: impl Into<String>, schema: Arc<Schema>) {
        self.properties.insert(key.into(), schema);
    }

    pub fn property_schema(&self, key: &str) -> Option<&Arc<Schema>> {
        self.properties.get(key)
    }

    pub fn property_schemas(&self) -> impl Iterator<Item = (&str, &Arc<Schema>)> {
        self.properties.iter().map(|(key, schema)| (key.as_str(), schema))
    }

    pub fn set_item_schema(&mut self, schema: Arc<Schema>) {
        self.item_schema = Some(schema);
    }

    pub fn item_schema(&self) -> Option<&Arc<Schema>> {
        self.item_schema.as_ref()
    }

    /// Runs every constraint in registration order; the first failure wins.
    pub fn validate(&self, value: &Value) -> Result<()> {
        self.constraints
            .iter()
            .try_for_each(|constraint| constraint.validate(value))
    }

    /// Returns `true` if a node for this schema must be present: it is
    /// marked required, or it is an object schema with a required
    /// descendant.
    pub fn requires_presence(&self) -> bool {
        self.required
            || (self.value_type == ValueType::Object
                && self.properties.values().any(|child| child.requires_presence()))
    }

    /// Checks a single node against this schema without descending into it.
    ///
    /// Scalars are checked against the constraints. Objects must contain a
    /// child for every child schema that [requires presence](Self::requires_presence);
    /// children that have no schema are accepted.
    pub fn validate_property(&self, property: &Property) -> Result<()> {
        if property.value_type() != self.value_type {
            return Err(Error::TypeMismatch {
                expected: self.value_type,
                found: property.value_type(),
            });
        }

        match property.kind() {
            PropertyKind::Scalar(value) => self.validate(value),
            PropertyKind::Object(object) => {
                let missing = self
                    .properties
                    .iter()
                    .find(|(key, schema)| schema.requires_presence() && !object.contains(key));
                match missing {
                    Some((key, _)) => Err(Error::InvalidConfiguration(format!(
                        "required property '{key}' is missing from '{}'",
                        property.key()
                    ))),
                    None => Ok(()),
                }
            }
            PropertyKind::Array(_) => Ok(()),
        }
    }
}

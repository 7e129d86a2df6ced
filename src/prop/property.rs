use std::path::PathBuf;
use std::sync::Arc;

use super::{split_path, ArrayProperty, ObjectProperty};
use crate::schema::Schema;
use crate::value::{Value, ValueType};
use crate::{Error, Result};

/// Body of a property node.
#[derive(Debug, Clone)]
pub enum PropertyKind {
    Scalar(Value),
    Object(ObjectProperty),
    Array(ArrayProperty),
}

/// One node of the configuration tree.
///
/// A property owns its children outright; resolution always walks downward
/// from the node it is called on.
#[derive(Debug, Clone)]
pub struct Property {
    key: String,
    schema: Option<Arc<Schema>>,
    kind: PropertyKind,
}

impl Property {
    fn with_kind(key: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            key: key.into(),
            schema: None,
            kind,
        }
    }

    /// Creates a leaf holding `value`; its declared type is the value's type.
    pub fn scalar(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::with_kind(key, PropertyKind::Scalar(value.into()))
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::scalar(key, Value::String(value.into()))
    }

    pub fn integer(key: impl Into<String>, value: i64) -> Self {
        Self::scalar(key, Value::Integer(value))
    }

    pub fn float(key: impl Into<String>, value: f32) -> Self {
        Self::scalar(key, Value::Float(value))
    }

    pub fn double(key: impl Into<String>, value: f64) -> Self {
        Self::scalar(key, Value::Double(value))
    }

    pub fn boolean(key: impl Into<String>, value: bool) -> Self {
        Self::scalar(key, Value::Boolean(value))
    }

    pub fn path(key: impl Into<String>, value: impl Into<PathBuf>) -> Self {
        Self::scalar(key, Value::Path(value.into()))
    }

    pub fn object(key: impl Into<String>) -> Self {
        Self::with_kind(key, PropertyKind::Object(ObjectProperty::new()))
    }

    pub fn array(key: impl Into<String>) -> Self {
        Self::with_kind(key, PropertyKind::Array(ArrayProperty::new()))
    }

    /// Creates an empty node of the given type. Scalars hold their type's default.
    pub fn typed(key: impl Into<String>, value_type: ValueType) -> Self {
        match Value::default_for(value_type) {
            Some(value) => Self::scalar(key, value),
            None if value_type == ValueType::Object => Self::object(key),
            None => Self::array(key),
        }
    }

    /// Attaches `schema` and returns the property.
    pub fn with_schema(mut self, schema: Arc<Schema>) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    pub fn schema(&self) -> Option<&Arc<Schema>> {
        self.schema.as_ref()
    }

    pub fn set_schema(&mut self, schema: Arc<Schema>) {
        self.schema = Some(schema);
    }

    pub fn clear_schema(&mut self) -> Option<Arc<Schema>> {
        self.schema.take()
    }

    pub fn value_type(&self) -> ValueType {
        match &self.kind {
            PropertyKind::Scalar(value) => value.value_type(),
            PropertyKind::Object(_) => ValueType::Object,
            PropertyKind::Array(_) => ValueType::Array,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.value_type().as_str()
    }

    pub fn is_object(&self) -> bool {
        matches!(self.kind, PropertyKind::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, PropertyKind::Array(_))
    }

    pub fn as_object(&self) -> Option<&ObjectProperty> {
        match &self.kind {
            PropertyKind::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ObjectProperty> {
        match &mut self.kind {
            PropertyKind::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayProperty> {
        match &self.kind {
            PropertyKind::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut ArrayProperty> {
        match &mut self.kind {
            PropertyKind::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Replaces the stored scalar.
    ///
    /// The new value must have the node's declared type. Containers have no
    /// direct value and always refuse.
    pub fn set_value(&mut self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        match &mut self.kind {
            PropertyKind::Scalar(current) => {
                if current.value_type() != value.value_type() {
                    return Err(Error::TypeMismatch {
                        expected: current.value_type(),
                        found: value.value_type(),
                    });
                }
                *current = value;
                Ok(())
            }
            PropertyKind::Object(_) => Err(Error::InvalidOperation(format!(
                "cannot set a value on object property '{}', add child properties instead",
                self.key
            ))),
            PropertyKind::Array(_) => Err(Error::InvalidOperation(format!(
                "cannot set a value on array property '{}', add items instead",
                self.key
            ))),
        }
    }

    /// Returns the stored scalar. Containers fail with `InvalidOperation`.
    pub fn get_value(&self) -> Result<&Value> {
        match &self.kind {
            PropertyKind::Scalar(value) => Ok(value),
            _ => Err(Error::InvalidOperation(format!(
                "{} property '{}' has no direct value",
                self.type_name(),
                self.key
            ))),
        }
    }

    /// Resolves a dotted path relative to this node.
    ///
    /// The empty path returns `self`. Every segment must pass through an object.
    pub fn resolve_path(&self, path: &str) -> Result<&Property> {
        let mut current = self;
        for segment in split_path(path)? {
            let object = current
                .as_object()
                .ok_or_else(|| Error::NotAnObject(current.key.clone()))?;
            current = object.get_property(segment)?;
        }
        Ok(current)
    }

    pub fn resolve_path_mut(&mut self, path: &str) -> Result<&mut Property> {
        let segments = split_path(path)?;
        self.resolve_segments_mut(&segments)
    }

    pub(crate) fn resolve_segments_mut(&mut self, segments: &[&str]) -> Result<&mut Property> {
        let mut current = self;
        for segment in segments {
            current = match &mut current.kind {
                PropertyKind::Object(object) => object.get_property_mut(segment)?,
                _ => return Err(Error::NotAnObject(current.key.clone())),
            };
        }
        Ok(current)
    }

    /// Walks `segments` from this node, creating missing objects on the way,
    /// and returns the object at the end of the walk.
    pub(crate) fn object_at_or_create(&mut self, segments: &[&str]) -> Result<&mut ObjectProperty> {
        let mut current = self;
        for segment in segments {
            current = match &mut current.kind {
                PropertyKind::Object(object) => object.get_or_insert_with(segment, || {
                    tracing::debug!(key = *segment, "creating intermediate object");
                    Property::object(*segment)
                }),
                _ => return Err(Error::NotAnObject(current.key.clone())),
            };
        }

        match &mut current.kind {
            PropertyKind::Object(object) => Ok(object),
            _ => Err(Error::NotAnObject(current.key.clone())),
        }
    }

    /// Sets the value of an existing leaf addressed by `path`.
    ///
    /// Nothing is created along the way: every intermediate object and the
    /// leaf itself must already exist.
    pub fn set_path_value(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        let segments = split_path(path)?;
        let Some((leaf, parents)) = segments.split_last() else {
            return Err(Error::InvalidPath("cannot set a value on the empty path".into()));
        };

        let parent = self.resolve_segments_mut(parents)?;
        let parent_key = parent.key.clone();
        parent
            .as_object_mut()
            .ok_or(Error::NotAnObject(parent_key))?
            .get_property_mut(leaf)?
            .set_value(value)
    }

    /// Validates this node and its whole subtree.
    ///
    /// The attached schema applies if present; children inherit the matching
    /// child schema (objects) or item schema (arrays) from their parent's
    /// effective schema. The first failure aborts the walk.
    pub fn validate(&self) -> Result<()> {
        self.validate_against(None)
    }

    fn validate_against(&self, inherited: Option<&Schema>) -> Result<()> {
        let schema = self.schema.as_deref().or(inherited);
        if let Some(schema) = schema {
            schema.validate_property(self)?;
        }

        match &self.kind {
            PropertyKind::Scalar(_) => Ok(()),
            PropertyKind::Object(object) => {
                for (key, child) in object.iter() {
                    let child_schema = schema.and_then(|s| s.property_schema(key));
                    child.validate_against(child_schema.map(|s| s.as_ref()))?;
                }
                Ok(())
            }
            PropertyKind::Array(array) => {
                let item_schema = schema.and_then(|s| s.item_schema());
                for item in array.iter() {
                    item.validate_against(item_schema.map(|s| s.as_ref()))?;
                }
                Ok(())
            }
        }
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + match &self.kind {
            PropertyKind::Scalar(_) => 0,
            PropertyKind::Object(object) => object.iter().map(|(_, c)| c.node_count()).sum::<usize>(),
            PropertyKind::Array(array) => array.iter().map(Property::node_count).sum::<usize>(),
        }
    }

    /// Converts the subtree into a TOML value.
    pub fn to_toml(&self) -> toml::Value {
        match &self.kind {
            PropertyKind::Scalar(value) => value.to_toml(),
            PropertyKind::Object(object) => toml::Value::Table(
                object
                    .iter()
                    .map(|(key, child)| (key.to_string(), child.to_toml()))
                    .collect(),
            ),
            PropertyKind::Array(array) => {
                toml::Value::Array(array.iter().map(Property::to_toml).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaBuilder;

    fn sample_tree() -> Property {
        let mut database = Property::object("database");
        let db = database.as_object_mut().unwrap();
        db.add_property(Property::string("host", "localhost"));
        db.add_property(Property::integer("port", 5432));

        let mut app = Property::object("app");
        app.as_object_mut().unwrap().add_property(database);

        let mut root = Property::object("root");
        root.as_object_mut().unwrap().add_property(app);
        root
    }

    #[test]
    fn test_set_and_get_value_round_trip() {
        let mut prop = Property::string("name", "");
        prop.set_value("demo").unwrap();
        assert_eq!(prop.get_value().unwrap(), &Value::String("demo".into()));
    }

    #[test]
    fn test_set_value_type_mismatch() {
        let mut prop = Property::integer("port", 80);
        let result = prop.set_value("eighty");
        assert!(matches!(
            result,
            Err(Error::TypeMismatch {
                expected: ValueType::Integer,
                found: ValueType::String
            })
        ));
        assert_eq!(prop.get_value().unwrap(), &Value::Integer(80));
    }

    #[test]
    fn test_float_and_double_are_distinct_types() {
        let mut prop = Property::float("ratio", 0.5);
        assert!(matches!(prop.set_value(0.25_f64), Err(Error::TypeMismatch { .. })));
        prop.set_value(0.25_f32).unwrap();
    }

    #[test]
    fn test_containers_reject_direct_values() {
        let mut object = Property::object("app");
        let mut array = Property::array("hosts");
        assert!(matches!(object.set_value(1_i64), Err(Error::InvalidOperation(_))));
        assert!(matches!(array.set_value(1_i64), Err(Error::InvalidOperation(_))));
        assert!(matches!(object.get_value(), Err(Error::InvalidOperation(_))));
        assert!(matches!(array.get_value(), Err(Error::InvalidOperation(_))));
    }

    #[test]
    fn test_typed_constructor_uses_defaults() {
        assert_eq!(
            Property::typed("n", ValueType::Integer).get_value().unwrap(),
            &Value::Integer(0)
        );
        assert_eq!(
            Property::typed("p", ValueType::Path).get_value().unwrap(),
            &Value::Path(PathBuf::new())
        );
        assert!(Property::typed("o", ValueType::Object).is_object());
        assert!(Property::typed("a", ValueType::Array).is_array());
    }

    #[test]
    fn test_resolve_path() {
        let root = sample_tree();
        assert_eq!(root.resolve_path("").unwrap().key(), "root");
        let host = root.resolve_path("app.database.host").unwrap();
        assert_eq!(host.get_value().unwrap().as_str(), Some("localhost"));
    }

    #[test]
    fn test_resolve_path_missing_segment() {
        let root = sample_tree();
        assert!(matches!(
            root.resolve_path("app.cache.size"),
            Err(Error::PropertyNotFound(key)) if key == "cache"
        ));
    }

    #[test]
    fn test_resolve_path_through_leaf_fails() {
        let root = sample_tree();
        assert!(matches!(
            root.resolve_path("app.database.host.name"),
            Err(Error::NotAnObject(key)) if key == "host"
        ));
    }

    #[test]
    fn test_set_path_value_requires_existing_nodes() {
        let mut root = sample_tree();
        root.set_path_value("app.database.port", 6543_i64).unwrap();
        assert_eq!(
            root.resolve_path("app.database.port").unwrap().get_value().unwrap(),
            &Value::Integer(6543)
        );

        assert!(matches!(
            root.set_path_value("app.database.user", "admin"),
            Err(Error::PropertyNotFound(_))
        ));
        assert!(matches!(
            root.set_path_value("app.server.port", 80_i64),
            Err(Error::PropertyNotFound(_))
        ));
        assert!(matches!(
            root.set_path_value("app.database.host.x", 1_i64),
            Err(Error::NotAnObject(_))
        ));
        assert!(matches!(root.set_path_value("", 1_i64), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_validate_without_schema_passes() {
        assert!(sample_tree().validate().is_ok());
    }

    #[test]
    fn test_validate_inherits_child_schemas() {
        let schema = SchemaBuilder::object()
            .property(
                "app",
                SchemaBuilder::object()
                    .property(
                        "database",
                        SchemaBuilder::object()
                            .property("port", SchemaBuilder::integer().range(1_i64, 1024_i64).build())
                            .build(),
                    )
                    .build(),
            )
            .build();

        let root = sample_tree().with_schema(schema);
        assert!(matches!(root.validate(), Err(Error::ValidationFailed(_))));
    }

    #[test]
    fn test_attached_schema_overrides_inherited() {
        let mut root = sample_tree().with_schema(
            SchemaBuilder::object()
                .property("app", SchemaBuilder::string().build())
                .build(),
        );
        assert!(matches!(root.validate(), Err(Error::TypeMismatch { .. })));

        root.resolve_path_mut("app")
            .unwrap()
            .set_schema(SchemaBuilder::object().build());
        assert!(root.validate().is_ok());
    }

    #[test]
    fn test_array_items_validated_against_item_schema() {
        let mut ports = Property::array("ports").with_schema(
            SchemaBuilder::array()
                .items(SchemaBuilder::integer().range(1_i64, 65535_i64).build())
                .build(),
        );
        let array = ports.as_array_mut().unwrap();
        array.add_item(Property::integer("0", 80));
        array.add_item(Property::integer("1", 443));
        assert!(ports.validate().is_ok());

        ports.as_array_mut().unwrap().add_item(Property::integer("2", 0));
        assert!(matches!(ports.validate(), Err(Error::ValidationFailed(_))));
    }

    #[test]
    fn test_node_count_includes_self() {
        assert_eq!(sample_tree().node_count(), 5);
        assert_eq!(Property::boolean("flag", true).node_count(), 1);
    }

    #[test]
    fn test_to_toml() {
        let table = sample_tree().to_toml();
        assert_eq!(
            table["app"]["database"]["port"],
            toml::Value::Integer(5432)
        );
    }
}

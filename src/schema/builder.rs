use std::sync::Arc;

use tracing::warn;

use super::{Constraint, EnumConstraint, RangeBound, RangeConstraint, Schema};
use crate::value::{Value, ValueType};

/// Fluent builder for [`Schema`] trees.
///
/// ```
/// use config_tree::schema::SchemaBuilder;
///
/// let schema = SchemaBuilder::object()
///     .description("Database connection")
///     .property("host", SchemaBuilder::string().required(true).build())
///     .property(
///         "port",
///         SchemaBuilder::integer()
///             .required(true)
///             .default_value(5432_i64)
///             .range(1_i64, 65535_i64)
///             .build(),
///     )
///     .build();
///
/// assert!(schema.property_schema("port").unwrap().is_required());
/// ```
///
/// [`build`](Self::build) hands out the same `Arc<Schema>` on every call. A
/// builder that is modified after building gets a private copy first, so
/// schemas already handed out never change.
#[derive(Debug, Clone)]
#[must_use = "builders do nothing until .build() is called"]
pub struct SchemaBuilder {
    schema: Arc<Schema>,
}

impl SchemaBuilder {
    pub fn new(value_type: ValueType) -> Self {
        Self {
            schema: Arc::new(Schema::new(value_type)),
        }
    }

    pub fn string() -> Self {
        Self::new(ValueType::String)
    }

    pub fn integer() -> Self {
        Self::new(ValueType::Integer)
    }

    pub fn float() -> Self {
        Self::new(ValueType::Float)
    }

    pub fn double() -> Self {
        Self::new(ValueType::Double)
    }

    pub fn boolean() -> Self {
        Self::new(ValueType::Boolean)
    }

    pub fn path() -> Self {
        Self::new(ValueType::Path)
    }

    pub fn object() -> Self {
        Self::new(ValueType::Object)
    }

    pub fn array() -> Self {
        Self::new(ValueType::Array)
    }

    fn edit(mut self, f: impl FnOnce(&mut Schema)) -> Self {
        f(Arc::make_mut(&mut self.schema));
        self
    }

    pub fn required(self, required: bool) -> Self {
        self.edit(|s| s.set_required(required))
    }

    /// Sets the documented default. A default of another type than the schema
    /// is kept but logged, and templates leave it out.
    pub fn default_value(self, value: impl Into<Value>) -> Self {
        let value = value.into();
        if value.value_type() != self.schema.value_type() {
            warn!(
                expected = %self.schema.value_type(),
                found = %value.value_type(),
                "schema default does not match the schema type"
            );
        }
        self.edit(|s| s.set_default_value(value))
    }

    pub fn description(self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.edit(|s| s.set_description(description))
    }

    /// Adds an inclusive range constraint. Use `i64` bounds for integer
    /// properties and `f64` bounds for float/double properties.
    pub fn range<T: RangeBound>(self, min: T, max: T) -> Self {
        self.edit(|s| s.add_constraint(Arc::new(RangeConstraint::new(min, max))))
    }

    pub fn enum_values<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let constraint = EnumConstraint::new(values);
        self.edit(|s| s.add_constraint(Arc::new(constraint)))
    }

    pub fn custom(self, constraint: impl Constraint + 'static) -> Self {
        self.edit(|s| s.add_constraint(Arc::new(constraint)))
    }

    /// Adds a child schema (object schemas).
    pub fn property(self, key: impl Into<String>, schema: Arc<Schema>) -> Self {
        let key = key.into();
        self.edit(|s| s.add_property_schema(key, schema))
    }

    /// Sets the schema applied to every element (array schemas).
    pub fn items(self, schema: Arc<Schema>) -> Self {
        self.edit(|s| s.set_item_schema(schema))
    }

    pub fn build(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }
}

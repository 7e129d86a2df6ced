//! Value constraints evaluated by a schema.

use std::fmt;

use crate::value::{Value, ValueType};
use crate::{Error, Result};

/// A single validation predicate over a scalar value.
pub trait Constraint: Send + Sync + fmt::Debug {
    fn validate(&self, value: &Value) -> Result<()>;

    /// Human readable summary, used in diagnostics and generated templates.
    fn description(&self) -> String;
}

/// Numeric types a [`RangeConstraint`] can be expressed in.
pub trait RangeBound:
    Copy + PartialOrd + fmt::Display + fmt::Debug + Send + Sync + 'static
{
    /// Type reported when a value cannot be read as `Self`.
    const VALUE_TYPE: ValueType;

    fn extract(value: &Value) -> Option<Self>;
}

impl RangeBound for i64 {
    const VALUE_TYPE: ValueType = ValueType::Integer;

    fn extract(value: &Value) -> Option<Self> {
        value.as_integer()
    }
}

impl RangeBound for f64 {
    const VALUE_TYPE: ValueType = ValueType::Double;

    /// Accepts both `Float` and `Double` values.
    fn extract(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

/// Inclusive numeric range `min <= v <= max`.
#[derive(Debug, Clone)]
pub struct RangeConstraint<T> {
    min: T,
    max: T,
}

impl<T: RangeBound> RangeConstraint<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> T {
        self.min
    }

    pub fn max(&self) -> T {
        self.max
    }
}

impl<T: RangeBound> Constraint for RangeConstraint<T> {
    fn validate(&self, value: &Value) -> Result<()> {
        let v = T::extract(value).ok_or(Error::TypeMismatch {
            expected: T::VALUE_TYPE,
            found: value.value_type(),
        })?;

        // NaN compares false both ways and must fail.
        if !(self.min <= v && v <= self.max) {
            return Err(Error::ValidationFailed(format!(
                "value {v} is outside range [{}, {}]",
                self.min, self.max
            )));
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("value must be in range [{}, {}]", self.min, self.max)
    }
}

/// String value must equal one of the allowed values exactly.
#[derive(Debug, Clone)]
pub struct EnumConstraint {
    allowed: Vec<String>,
}

impl EnumConstraint {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }
}

impl Constraint for EnumConstraint {
    fn validate(&self, value: &Value) -> Result<()> {
        let s = value.as_str().ok_or(Error::TypeMismatch {
            expected: ValueType::String,
            found: value.value_type(),
        })?;

        if self.allowed.iter().any(|allowed| allowed == s) {
            Ok(())
        } else {
            Err(Error::ValidationFailed(format!(
                "value '{s}' is not one of [{}]",
                self.allowed.join(", ")
            )))
        }
    }

    fn description(&self) -> String {
        format!("value must be one of [{}]", self.allowed.join(", "))
    }
}

type Predicate = dyn Fn(&Value) -> bool + Send + Sync;

/// User supplied predicate with a description of what it checks.
pub struct CustomConstraint {
    description: String,
    predicate: Box<Predicate>,
}

impl CustomConstraint {
    pub fn new(
        description: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            predicate: Box::new(predicate),
        }
    }
}

impl fmt::Debug for CustomConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomConstraint")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl Constraint for CustomConstraint {
    fn validate(&self, value: &Value) -> Result<()> {
        if (self.predicate)(value) {
            Ok(())
        } else {
            Err(Error::ValidationFailed(format!(
                "value {value} rejected: {}",
                self.description
            )))
        }
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

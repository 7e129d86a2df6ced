//! Scalar values and the type tags shared by properties and schemas.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::Error;

/// Declared type of a property node or schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Integer,
    Float,
    Double,
    Boolean,
    Path,
    Object,
    Array,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::Double => "double",
            ValueType::Boolean => "boolean",
            ValueType::Path => "path",
            ValueType::Object => "object",
            ValueType::Array => "array",
        }
    }

    /// Returns `true` for the types that hold a single [`Value`].
    pub fn is_scalar(&self) -> bool {
        !matches!(self, ValueType::Object | ValueType::Array)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "string" => Ok(ValueType::String),
            "integer" => Ok(ValueType::Integer),
            "float" => Ok(ValueType::Float),
            "double" => Ok(ValueType::Double),
            "boolean" => Ok(ValueType::Boolean),
            "path" => Ok(ValueType::Path),
            "object" => Ok(ValueType::Object),
            "array" => Ok(ValueType::Array),
            _ => Err(Error::InvalidInput(format!("unknown value type: {s}"))),
        }
    }
}

/// A single scalar held by a leaf property.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    Path(PathBuf),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::String(_) => ValueType::String,
            Value::Integer(_) => ValueType::Integer,
            Value::Float(_) => ValueType::Float,
            Value::Double(_) => ValueType::Double,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Path(_) => ValueType::Path,
        }
    }

    /// The default-constructed value for a scalar type, or `None` for containers.
    pub fn default_for(value_type: ValueType) -> Option<Value> {
        match value_type {
            ValueType::String => Some(Value::String(String::new())),
            ValueType::Integer => Some(Value::Integer(0)),
            ValueType::Float => Some(Value::Float(0.0)),
            ValueType::Double => Some(Value::Double(0.0)),
            ValueType::Boolean => Some(Value::Boolean(false)),
            ValueType::Path => Some(Value::Path(PathBuf::new())),
            ValueType::Object | ValueType::Array => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as `f64`, widening `Float`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(f64::from(*f)),
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&std::path::Path> {
        match self {
            Value::Path(p) => Some(p),
            _ => None,
        }
    }

    /// Converts into the TOML representation used for export and templates.
    pub fn to_toml(&self) -> toml::Value {
        match self {
            Value::String(s) => toml::Value::String(s.clone()),
            Value::Integer(i) => toml::Value::Integer(*i),
            Value::Float(f) => toml::Value::Float(f64::from(*f)),
            Value::Double(d) => toml::Value::Float(*d),
            Value::Boolean(b) => toml::Value::Boolean(*b),
            Value::Path(p) => toml::Value::String(p.to_string_lossy().into_owned()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<PathBuf> for Value {
    fn from(value: PathBuf) -> Self {
        Value::Path(value)
    }
}

impl From<&std::path::Path> for Value {
    fn from(value: &std::path::Path) -> Self {
        Value::Path(value.to_path_buf())
    }
}

/// Infers a typed value from a literal string.
///
/// `true`/`false` become booleans, an optional `-` followed by digits becomes
/// an integer, anything containing `.`, `e` or `E` that parses as a float
/// becomes a double. Everything else stays a string.
pub fn infer_value(literal: &str) -> Value {
    if literal == "true" {
        return Value::Boolean(true);
    }
    if literal == "false" {
        return Value::Boolean(false);
    }

    if looks_like_integer(literal) {
        if let Ok(i) = literal.parse::<i64>() {
            return Value::Integer(i);
        }
    }

    if literal.contains(['.', 'e', 'E']) {
        if let Ok(f) = literal.parse::<f64>() {
            return Value::Double(f);
        }
    }

    Value::String(literal.to_string())
}

fn looks_like_integer(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

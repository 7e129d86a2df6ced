use crate::prop::Property;
use crate::value::Value;
use crate::Result;

/// A value produced by a source, already carrying its decoded type.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Scalar(Value),
    Array(Vec<Decoded>),
    Table(Vec<(String, Decoded)>),
}

impl Decoded {
    /// Builds a fresh property tree for this value under `key`.
    ///
    /// Array elements are keyed by their index.
    pub fn into_property(self, key: impl Into<String>) -> Property {
        match self {
            Decoded::Scalar(value) => Property::scalar(key, value),
            Decoded::Array(items) => {
                let mut property = Property::array(key);
                if let Some(array) = property.as_array_mut() {
                    for (index, item) in items.into_iter().enumerate() {
                        array.add_item(item.into_property(index.to_string()));
                    }
                }
                property
            }
            Decoded::Table(children) => {
                let mut property = Property::object(key);
                if let Some(object) = property.as_object_mut() {
                    for (child_key, child) in children {
                        object.add_property(child.into_property(child_key));
                    }
                }
                property
            }
        }
    }
}

impl From<Value> for Decoded {
    fn from(value: Value) -> Self {
        Decoded::Scalar(value)
    }
}

/// One `(path, value)` pair to be written into the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub path: String,
    pub value: Decoded,
}

impl Entry {
    pub fn new(path: impl Into<String>, value: impl Into<Decoded>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
        }
    }
}

/// How an entry treats a path that already holds a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Replace existing values; the new value must match the node's type.
    Overwrite,
    /// Leave existing values alone and only create what is missing.
    FillMissing,
}

/// Anything that produces entries for the datastore.
pub trait Source: Send + Sync + std::fmt::Debug {
    fn entries(&self) -> Result<Vec<Entry>>;
}

/// Flattens a TOML table into dotted-path entries.
///
/// Nested tables recurse with the path accumulated; empty tables still yield
/// an entry so the object exists in the tree. Tables nested inside arrays are
/// kept whole.
pub(crate) fn flatten_table(prefix: &str, table: toml::Table) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    flatten_into(&mut entries, prefix, table)?;
    Ok(entries)
}

fn flatten_into(entries: &mut Vec<Entry>, prefix: &str, table: toml::Table) -> Result<()> {
    for (key, value) in table {
        let path = if prefix.is_empty() {
            key
        } else {
            format!("{prefix}.{key}")
        };

        match value {
            toml::Value::Table(nested) if !nested.is_empty() => {
                flatten_into(entries, &path, nested)?;
            }
            value => {
                let decoded = decode_toml(&path, value)?;
                entries.push(Entry::new(path, decoded));
            }
        }
    }
    Ok(())
}

fn decode_toml(path: &str, value: toml::Value) -> Result<Decoded> {
    Ok(match value {
        toml::Value::String(s) => Decoded::Scalar(Value::String(s)),
        toml::Value::Integer(i) => Decoded::Scalar(Value::Integer(i)),
        toml::Value::Float(f) => Decoded::Scalar(Value::Double(f)),
        toml::Value::Boolean(b) => Decoded::Scalar(Value::Boolean(b)),
        toml::Value::Datetime(dt) => {
            return Err(crate::Error::NotSupported(format!(
                "datetime value '{dt}' at '{path}'"
            )))
        }
        toml::Value::Array(items) => Decoded::Array(
            items
                .into_iter()
                .map(|item| decode_toml(path, item))
                .collect::<Result<_>>()?,
        ),
        toml::Value::Table(table) => Decoded::Table(
            table
                .into_iter()
                .map(|(key, item)| Ok((key, decode_toml(path, item)?)))
                .collect::<Result<_>>()?,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn parse(text: &str) -> toml::Table {
        toml::from_str(text).unwrap()
    }

    #[test]
    fn test_flatten_nested_tables() {
        let entries = flatten_table(
            "",
            parse(
                r#"
                name = "demo"

                [app.database]
                host = "localhost"
                port = 5432
                "#,
            ),
        )
        .unwrap();

        assert_eq!(
            entries,
            vec![
                Entry::new("app.database.host", Value::String("localhost".into())),
                Entry::new("app.database.port", Value::Integer(5432)),
                Entry::new("name", Value::String("demo".into())),
            ]
        );
    }

    #[test]
    fn test_flatten_keeps_empty_tables() {
        let entries = flatten_table("", parse("[cache]\n")).unwrap();
        assert_eq!(entries, vec![Entry::new("cache", Decoded::Table(Vec::new()))]);
    }

    #[test]
    fn test_decode_types() {
        let entries = flatten_table(
            "",
            parse(
                r#"
                ratio = 0.5
                debug = true
                hosts = ["a", "b"]
                servers = [{ name = "x" }]
                "#,
            ),
        )
        .unwrap();

        assert_eq!(entries[0].path, "debug");
        assert_eq!(entries[0].value, Decoded::Scalar(Value::Boolean(true)));
        assert_eq!(
            entries[1].value,
            Decoded::Array(vec![
                Decoded::Scalar(Value::String("a".into())),
                Decoded::Scalar(Value::String("b".into())),
            ])
        );
        assert_eq!(entries[2].value, Decoded::Scalar(Value::Double(0.5)));
        assert_eq!(
            entries[3].value,
            Decoded::Array(vec![Decoded::Table(vec![(
                "name".into(),
                Decoded::Scalar(Value::String("x".into()))
            )])])
        );
    }

    #[test]
    fn test_datetime_not_supported() {
        let result = flatten_table("", parse("started = 1979-05-27T07:32:00Z\n"));
        assert!(matches!(result, Err(Error::NotSupported(msg)) if msg.contains("started")));
    }

    #[test]
    fn test_into_property_indexes_array_items() {
        let property = Decoded::Array(vec![
            Decoded::Scalar(Value::Integer(1)),
            Decoded::Scalar(Value::Integer(2)),
        ])
        .into_property("ports");

        let array = property.as_array().unwrap();
        assert_eq!(array.size(), 2);
        assert_eq!(array.get_item(1).unwrap().key(), "1");
    }
}

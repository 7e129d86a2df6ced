use super::source::{Entry, Source};
use crate::value::infer_value;
use crate::{Error, Result};

/// Environment variables mapped onto property paths.
///
/// `MYAPP__DATABASE__HOST=db` with prefix `MYAPP` and separator `__` becomes
/// the entry `database.host = "db"`. Path segments are lower-cased and values
/// go through the same literal inference as command-line properties.
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
    separator: String,
}

impl EnvSource {
    /// An empty separator is reported as [`Error::InvalidInput`] when the
    /// source is read.
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            separator: separator.into(),
        }
    }

    /// Maps `(name, value)` pairs the same way [`Source::entries`] maps the
    /// process environment.
    pub fn entries_from<I>(&self, vars: I) -> Result<Vec<Entry>>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        if self.separator.is_empty() {
            return Err(Error::InvalidInput(format!(
                "empty separator for environment prefix '{}'",
                self.prefix
            )));
        }

        let prefix_with_sep = format!("{}{}", self.prefix, self.separator);
        let mut entries = Vec::new();

        for (key, value) in vars {
            let Some(path_str) = key.strip_prefix(&prefix_with_sep) else {
                continue;
            };
            let segments: Vec<String> = path_str
                .split(self.separator.as_str())
                .map(|s| s.to_lowercase())
                .collect();
            if segments.iter().any(|s| s.is_empty()) {
                tracing::warn!(variable = %key, "ignoring environment variable with empty path segment");
                continue;
            }

            entries.push(Entry::new(segments.join("."), infer_value(&value)));
        }

        Ok(entries)
    }
}

impl Source for EnvSource {
    fn entries(&self) -> Result<Vec<Entry>> {
        self.entries_from(std::env::vars())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_maps_prefixed_variables() {
        let source = EnvSource::new("MYAPP", "__");
        let entries = source.entries_from(vars(&[
            ("MYAPP__DATABASE__HOST", "db"),
            ("MYAPP__DATABASE__PORT", "5432"),
            ("OTHER__VALUE", "ignored"),
        ]))
        .unwrap();

        assert_eq!(
            entries,
            vec![
                Entry::new("database.host", Value::String("db".into())),
                Entry::new("database.port", Value::Integer(5432)),
            ]
        );
    }

    #[test]
    fn test_skips_empty_segments() {
        let source = EnvSource::new("MYAPP", "__");
        let entries = source.entries_from(vars(&[
            ("MYAPP__", "x"),
            ("MYAPP____HOST", "x"),
            ("MYAPP__DEBUG", "true"),
        ]))
        .unwrap();

        assert_eq!(entries, vec![Entry::new("debug", Value::Boolean(true))]);
    }

    #[test]
    fn test_empty_separator_is_invalid_input() {
        let source = EnvSource::new("MYAPP", "");
        assert!(matches!(
            source.entries_from(vars(&[("MYAPP_HOST", "x")])),
            Err(Error::InvalidInput(msg)) if msg.contains("MYAPP")
        ));
        assert!(matches!(source.entries(), Err(Error::InvalidInput(_))));
    }
}

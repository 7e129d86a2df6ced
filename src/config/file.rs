//! TOML documents as configuration sources.

use std::path::{Path, PathBuf};

use super::source::{flatten_table, Entry, Source};
use crate::{Error, Result};

/// A TOML file on disk, flattened into dotted-path entries.
///
/// A missing required file is a [`Error::FileNotFound`]; a missing optional
/// one yields no entries and a warning.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    required: bool,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>, required: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Looks for `name` in the current directory, the home directory, then `/etc`.
    ///
    /// Returns the first regular file found.
    pub fn discover(name: &str) -> Option<PathBuf> {
        let candidates = [
            std::env::current_dir().ok(),
            dirs::home_dir(),
            Some(PathBuf::from("/etc")),
        ];

        candidates
            .into_iter()
            .flatten()
            .map(|dir| dir.join(name))
            .find(|path| path.is_file())
    }
}

impl Source for FileSource {
    fn entries(&self) -> Result<Vec<Entry>> {
        match load_config_file(&self.path, self.required)? {
            Some(table) => flatten_table("", table),
            None => Ok(vec![]),
        }
    }
}

/// An in-memory TOML document.
#[derive(Debug, Clone)]
pub struct TomlSource {
    text: String,
}

impl TomlSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Source for TomlSource {
    fn entries(&self) -> Result<Vec<Entry>> {
        let table = toml::from_str(&self.text).map_err(|e| Error::ParsingError {
            context: "TOML string".into(),
            message: e.to_string(),
        })?;
        flatten_table("", table)
    }
}

/// `Ok(None)` means an optional file was absent.
fn load_config_file(path: &Path, required: bool) -> Result<Option<toml::Table>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let table = toml::from_str(&contents).map_err(|e| Error::ParsingError {
                context: format!("config file '{}'", path.display()),
                message: e.to_string(),
            })?;
            Ok(Some(table))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if required {
                Err(Error::FileNotFound(path.to_path_buf()))
            } else {
                tracing::warn!(path = %path.display(), "optional config file not found, skipping");
                Ok(None)
            }
        }
        Err(e) => Err(Error::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Decoded;
    use crate::value::Value;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_file_source_loads_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nhost = \"value\"").unwrap();

        let source = FileSource::new(file.path(), true);
        let entries = source.entries().unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "server.host");
        assert_eq!(
            entries[0].value,
            Decoded::Scalar(Value::String("value".into()))
        );
    }

    #[test]
    fn test_file_source_required_missing() {
        let source = FileSource::new("/nonexistent/path/config.toml", true);
        let result = source.entries();

        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_file_source_optional_missing() {
        let source = FileSource::new("/nonexistent/path/config.toml", false);
        let entries = source.entries().unwrap();

        assert!(entries.is_empty());
    }

    #[test]
    fn test_file_source_malformed_names_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server\nhost = ").unwrap();

        let result = FileSource::new(file.path(), true).entries();
        let expected = file.path().display().to_string();
        assert!(matches!(
            result,
            Err(Error::ParsingError { context, .. }) if context.contains(&expected)
        ));
    }

    #[test]
    fn test_toml_source() {
        let entries = TomlSource::new("level = \"debug\"").entries().unwrap();
        assert_eq!(entries[0].path, "level");

        assert!(matches!(
            TomlSource::new("level = ").entries(),
            Err(Error::ParsingError { .. })
        ));
    }

    #[test]
    fn test_discover_missing_file_returns_none() {
        let name = "config-tree-discover-test-does-not-exist.toml";
        assert!(FileSource::discover(name).is_none());
    }
}

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use super::env::EnvSource;
use super::file::FileSource;
use super::properties::PropertySource;
use super::source::MergeMode;
use crate::cmdline::Args;
use crate::schema::Schema;
use crate::{Datastore, Result};

/// Loads configuration from files, `key=value` properties and environment
/// variables into a [`Datastore`].
///
/// Precedence is fixed regardless of registration order:
///
/// 1. Files, in registration order; later files override earlier ones.
/// 2. Properties override anything the files set.
/// 3. Environment variables only fill paths that are still missing.
///
/// If a schema is given it is attached at the root and the whole tree is
/// validated once everything is loaded.
///
/// ## Example
///
/// ```no_run
/// use config_tree::config::Loader;
/// use config_tree::schema::SchemaBuilder;
///
/// let schema = SchemaBuilder::object()
///     .property("port", SchemaBuilder::integer().range(1_i64, 65535_i64).build())
///     .build();
///
/// let store = Loader::new()
///     .with_file("config/default.toml", true)
///     .with_file("config/local.toml", false)
///     .with_env("MYAPP", "__")
///     .with_properties(["port=8080"])
///     .with_schema(schema)
///     .load()?;
/// # Ok::<(), config_tree::Error>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "loaders do nothing until .load() is called"]
pub struct Loader {
    files: Vec<FileSource>,
    properties: PropertySource,
    env: Vec<EnvSource>,
    schema: Option<Arc<Schema>>,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a TOML file to be loaded.
    ///
    /// If `required` is `true`, loading fails if the file doesn't exist.
    /// Optional files that are missing are skipped.
    pub fn with_file(mut self, path: impl AsRef<Path>, required: bool) -> Self {
        self.files.push(FileSource::new(path, required));
        self
    }

    /// Adds `key=value` properties, typed by literal inference.
    pub fn with_properties<I, S>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for pair in pairs {
            self.properties.push(pair);
        }
        self
    }

    /// Reads environment variables named `PREFIX<separator>SEGMENT...`.
    ///
    /// An empty separator makes loading fail with `InvalidInput`.
    pub fn with_env(mut self, prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        self.env.push(EnvSource::new(prefix, separator));
        self
    }

    pub fn with_schema(mut self, schema: Arc<Schema>) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Registers `--config` as a required file and every `-p` property.
    pub fn with_args(self, args: &Args) -> Self {
        let loader = match &args.config {
            Some(path) => self.with_file(path, true),
            None => self,
        };
        loader.with_properties(args.properties.iter().cloned())
    }

    /// Loads into an existing datastore.
    ///
    /// Values written before a failing source stay in the store.
    pub fn load_into(&self, store: &mut Datastore) -> Result<()> {
        for file in &self.files {
            store.ingest_source(file, MergeMode::Overwrite)?;
        }
        store.ingest_source(&self.properties, MergeMode::Overwrite)?;
        for env in &self.env {
            store.ingest_source(env, MergeMode::FillMissing)?;
        }

        if let Some(schema) = &self.schema {
            store.set_schema("", Arc::clone(schema))?;
            store.validate_all()?;
        }

        info!(
            files = self.files.len(),
            properties = store.size(),
            "configuration loaded"
        );
        Ok(())
    }

    pub fn load(&self) -> Result<Datastore> {
        let mut store = Datastore::new();
        self.load_into(&mut store)?;
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaBuilder;
    use crate::value::Value;
    use crate::Error;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    fn value_at(store: &Datastore, path: &str) -> Value {
        store.get_property(path).unwrap().get_value().unwrap().clone()
    }

    #[test]
    fn test_later_files_override_earlier() {
        let defaults = toml_file("[server]\nhost = \"localhost\"\nport = 8080\n");
        let local = toml_file("[server]\nport = 9000\n");

        let store = Loader::new()
            .with_file(defaults.path(), true)
            .with_file(local.path(), true)
            .load()
            .unwrap();

        assert_eq!(value_at(&store, "server.host"), Value::String("localhost".into()));
        assert_eq!(value_at(&store, "server.port"), Value::Integer(9000));
    }

    #[test]
    fn test_properties_override_files() {
        let file = toml_file("[server]\nport = 8080\n");
        let store = Loader::new()
            .with_properties(["server.port=9999"])
            .with_file(file.path(), true)
            .load()
            .unwrap();

        assert_eq!(value_at(&store, "server.port"), Value::Integer(9999));
    }

    #[test]
    fn test_property_type_must_match_file() {
        let file = toml_file("[server]\nport = 8080\n");
        let result = Loader::new()
            .with_file(file.path(), true)
            .with_properties(["server.port=high"])
            .load();

        assert!(matches!(result, Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn test_env_only_fills_missing_paths() {
        std::env::set_var("CFGTREE_LOADER_TEST__SERVER__PORT", "1");
        std::env::set_var("CFGTREE_LOADER_TEST__SERVER__HOST", "from-env");

        let file = toml_file("[server]\nport = 8080\n");
        let store = Loader::new()
            .with_env("CFGTREE_LOADER_TEST", "__")
            .with_file(file.path(), true)
            .load()
            .unwrap();

        assert_eq!(value_at(&store, "server.port"), Value::Integer(8080));
        assert_eq!(value_at(&store, "server.host"), Value::String("from-env".into()));
    }

    #[test]
    fn test_empty_env_separator_fails_load() {
        let result = Loader::new()
            .with_properties(["name=demo"])
            .with_env("CFGTREE_LOADER_TEST", "")
            .load();
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_optional_missing_file_is_skipped() {
        let store = Loader::new()
            .with_file("/nonexistent/config.toml", false)
            .with_properties(["name=demo"])
            .load()
            .unwrap();
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn test_required_missing_file_fails() {
        let result = Loader::new()
            .with_file("/nonexistent/config.toml", true)
            .load();
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_schema_is_attached_and_validated() {
        let schema = SchemaBuilder::object()
            .property("name", SchemaBuilder::string().required(true).build())
            .build();

        let result = Loader::new().with_schema(Arc::clone(&schema)).load();
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));

        let store = Loader::new()
            .with_schema(Arc::clone(&schema))
            .with_properties(["name=demo"])
            .load()
            .unwrap();
        assert!(Arc::ptr_eq(&store.get_schema("").unwrap(), &schema));
    }

    #[test]
    fn test_load_into_keeps_partial_state_on_failure() {
        let file = toml_file("[server]\nport = 8080\n");
        let mut store = Datastore::new();
        let result = Loader::new()
            .with_file(file.path(), true)
            .with_file("/nonexistent/config.toml", true)
            .load_into(&mut store);

        assert!(matches!(result, Err(Error::FileNotFound(_))));
        assert!(store.has_property("server.port"));
    }

    #[test]
    fn test_with_args() {
        let file = toml_file("name = \"file\"\n");
        let args = Args {
            config: Some(file.path().to_path_buf()),
            properties: vec!["name=cli".into()],
            ..Args::default()
        };

        let store = Loader::new().with_args(&args).load().unwrap();
        assert_eq!(value_at(&store, "name"), Value::String("cli".into()));
    }
}

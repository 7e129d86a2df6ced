//! Small application wired up the way a real service would use the datastore.
//!
//! ```text
//! cargo run --example demo_app -- -g > app.toml
//! cargo run --example demo_app -- -c app.toml -p app.database.port=6543 --debug
//! DEMO_APP__APP__DATABASE__USER=admin cargo run --example demo_app -- -c app.toml
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use serde::Deserialize;
use tracing::{error, info};

use config_tree::cmdline::Args;
use config_tree::config::Loader;
use config_tree::schema::{template, SchemaBuilder};
use config_tree::{logging, Datastore, Schema};

#[derive(Debug, Deserialize)]
struct AppConfig {
    app: AppSection,
}

#[derive(Debug, Deserialize)]
struct AppSection {
    database: DatabaseConfig,
    #[serde(default)]
    log_level: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    host: String,
    port: i64,
    #[serde(default)]
    user: Option<String>,
}

fn app_schema() -> Arc<Schema> {
    let database = SchemaBuilder::object()
        .required(true)
        .description("Database connection")
        .property(
            "host",
            SchemaBuilder::string()
                .required(true)
                .default_value("localhost")
                .description("Database host name")
                .build(),
        )
        .property(
            "port",
            SchemaBuilder::integer()
                .required(true)
                .default_value(5432_i64)
                .range(1_i64, 65535_i64)
                .description("Database port")
                .build(),
        )
        .property(
            "user",
            SchemaBuilder::string()
                .description("Login user")
                .build(),
        )
        .build();

    SchemaBuilder::object()
        .property(
            "app",
            SchemaBuilder::object()
                .required(true)
                .property("database", database)
                .property(
                    "log_level",
                    SchemaBuilder::string()
                        .default_value("info")
                        .enum_values(["debug", "info", "warning", "error"])
                        .description("Application log level")
                        .build(),
                )
                .build(),
        )
        .build()
}

fn print_tree(store: &Datastore, base: &str) -> config_tree::Result<()> {
    for path in store.list_properties(base)? {
        let property = store.get_property(&path)?;
        if property.is_object() {
            print_tree(store, &path)?;
        } else {
            println!("{path} = {}", property.to_toml());
        }
    }
    Ok(())
}

fn run(args: &Args) -> config_tree::Result<()> {
    let schema = app_schema();

    if args.gen_config {
        print!("{}", template::render(&schema));
        return Ok(());
    }

    let store = Loader::new()
        .with_args(args)
        .with_env("DEMO_APP", "__")
        .with_schema(schema)
        .load()?;

    print_tree(&store, "")?;

    let config: AppConfig = store.deserialize()?;
    info!(
        host = %config.app.database.host,
        port = config.app.database.port,
        user = ?config.app.database.user,
        log_level = ?config.app.log_level,
        "connecting"
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init(args.log_level().unwrap_or_default()) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

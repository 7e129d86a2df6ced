//! Command-line surface: config file, properties, log level and template generation.

mod log_level;

pub use log_level::LogLevel;

use std::path::PathBuf;

use clap::Parser;

use crate::config::parse_key_value;

/// Command-line arguments understood by applications built on the datastore.
///
/// Unknown flags are rejected by clap.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a property, overriding the configuration file (repeatable)
    #[arg(
        short = 'p',
        long = "property",
        value_name = "KEY=VALUE",
        value_parser = parse_property_arg
    )]
    pub properties: Vec<String>,

    #[command(flatten)]
    pub log: LogFlags,

    /// Print a configuration template and exit
    #[arg(short = 'g', long = "gen-config")]
    pub gen_config: bool,
}

/// Mutually exclusive log level flags.
#[derive(clap::Args, Debug, Clone, Default)]
#[group(multiple = false)]
pub struct LogFlags {
    /// Log everything, including trace output
    #[arg(long)]
    pub trace: bool,

    /// Log debug messages and above
    #[arg(long)]
    pub debug: bool,

    /// Log informational messages and above
    #[arg(long)]
    pub info: bool,

    /// Log warnings and errors only
    #[arg(long)]
    pub warning: bool,

    /// Log errors only
    #[arg(long)]
    pub error: bool,
}

impl Args {
    /// The log level selected on the command line, if any.
    pub fn log_level(&self) -> Option<LogLevel> {
        let LogFlags {
            trace,
            debug,
            info,
            warning,
            error,
        } = self.log;

        [
            (trace, LogLevel::Trace),
            (debug, LogLevel::Debug),
            (info, LogLevel::Info),
            (warning, LogLevel::Warning),
            (error, LogLevel::Error),
        ]
        .into_iter()
        .find_map(|(set, level)| set.then_some(level))
    }
}

fn parse_property_arg(s: &str) -> Result<String, String> {
    parse_key_value(s)
        .map(|_| s.to_string())
        .map_err(|e| e.to_string())
}

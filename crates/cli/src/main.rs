//! schemapath CLI: resolve paths across schema-described records.
//!
//! `schemapath [flags] COMMAND` loads the schema and record documents named
//! by `schemapath.toml` (or `--schemas` / `--records`), runs one command and
//! exits. The exit code classifies failures by error kind.

mod commands;
mod format;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::ArgMatches;
use schemapath_core::{Error, ErrorKind};
use schemapath_engine::resolve;
use schemapath_storage::{MemoryStore, StoreConfig, CONFIG_FILE_NAME};
use tracing::debug;

use commands::build_cli;
use format::{format_error, format_list, format_value, OutputMode};

fn main() {
    let matches = build_cli().get_matches();

    let output_mode = if matches.get_flag("json") {
        OutputMode::Json
    } else if matches.get_flag("raw") {
        OutputMode::Raw
    } else {
        OutputMode::Human
    };

    if let Err(e) = init_tracing(matches.get_flag("quiet"), matches.get_flag("verbose")) {
        eprintln!("{}", format_error(&e, output_mode));
    }

    match run(&matches) {
        Ok(output) => {
            let rendered = match output {
                Output::Value(value) => format_value(&value, output_mode),
                Output::List(items) => format_list(&items, output_mode),
                Output::Message(message) => message,
            };
            if !rendered.is_empty() {
                println!("{}", rendered);
            }
        }
        Err(e) => {
            eprintln!("{}", format_error(&e, output_mode));
            process::exit(exit_code(&e));
        }
    }
}

/// Result of one command, before formatting.
enum Output {
    Value(serde_json::Value),
    List(Vec<String>),
    Message(String),
}

fn run(matches: &ArgMatches) -> anyhow::Result<Output> {
    let config_path = matches
        .get_one::<String>("config")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

    match matches.subcommand() {
        Some(("init", _)) => {
            let created = StoreConfig::write_default_if_missing(&config_path)?;
            let verb = if created { "created" } else { "kept existing" };
            Ok(Output::Message(format!("{} {}", verb, config_path.display())))
        }
        Some(("get", sub)) => {
            let store = open_store(matches, &config_path)?;
            let path = sub
                .get_one::<String>("path")
                .context("missing path argument")?;
            Ok(Output::Value(resolve(&store, path)?))
        }
        Some(("list", sub)) => {
            let store = open_store(matches, &config_path)?;
            let data_type = sub
                .get_one::<String>("type")
                .context("missing type argument")?;
            Ok(Output::List(store.list_ids(data_type)?))
        }
        Some(("types", _)) => {
            let store = open_store(matches, &config_path)?;
            Ok(Output::List(store.types()))
        }
        _ => anyhow::bail!("unknown command"),
    }
}

fn open_store(matches: &ArgMatches, config_path: &Path) -> anyhow::Result<MemoryStore> {
    let explicit = matches.get_one::<String>("config").is_some();
    let mut config = if explicit || config_path.exists() {
        StoreConfig::from_file(config_path)
            .with_context(|| format!("failed to load {}", config_path.display()))?
    } else {
        StoreConfig::default()
    };

    if let Some(schemas) = matches.get_one::<String>("schemas") {
        config.schemas = PathBuf::from(schemas);
    }
    if let Some(records) = matches.get_one::<String>("records") {
        config.records = PathBuf::from(records);
    }

    debug!(
        target: "schemapath::cli",
        schemas = %config.schemas.display(),
        records = %config.records.display(),
        "opening store"
    );
    Ok(MemoryStore::open(&config)?)
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("SCHEMAPATH_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

/// Map an error to the process exit code of its kind.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<Error>().map(Error::kind) {
        Some(ErrorKind::Path) => 2,
        Some(ErrorKind::Schema) => 3,
        Some(ErrorKind::Record) => 4,
        Some(ErrorKind::NotFound) => 5,
        Some(ErrorKind::Storage) => 6,
        None => 1,
    }
}

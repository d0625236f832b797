//! Clap command tree definition.

use clap::{Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("schemapath")
        .about("Resolve paths across schema-described records")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Config file (default: ./schemapath.toml if present)")
                .global(true),
        )
        .arg(
            Arg::new("schemas")
                .long("schemas")
                .help("Schema document, overrides the config file")
                .global(true),
        )
        .arg(
            Arg::new("records")
                .long("records")
                .help("Record document, overrides the config file")
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .conflicts_with("raw")
                .global(true),
        )
        .arg(
            Arg::new("raw")
                .long("raw")
                .help("Raw output mode (no quotes, no decoration)")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Debug logging")
                .action(ArgAction::SetTrue)
                .conflicts_with("quiet")
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("get")
                .about("Resolve a {type}/{id}/{path} expression")
                .arg(Arg::new("path").required(true).help("e.g. user/u1/address/city")),
        )
        .subcommand(
            Command::new("list")
                .about("List record ids of a type")
                .arg(Arg::new("type").required(true)),
        )
        .subcommand(Command::new("types").about("List declared schema types"))
        .subcommand(Command::new("init").about("Write a default schemapath.toml if absent"))
}

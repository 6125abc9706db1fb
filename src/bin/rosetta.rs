//! Command-line interface for rosetta
//! This binary parses rosetta sources and prints the resulting tree.
//!
//! Usage:
//!   rosetta parse `<path>` [--format `<format>`] [--config `<file>`] [--trace]
//!                [--trailing-token `<policy>`]          - Parse a file
//!   rosetta keywords [--config `<file>`]                 - List registered keywords
//!   rosetta formats                                    - List output formats
//!
//! Configuration is layered: built-in defaults, then `./rosetta.toml` if it
//! exists, then `--config`, then command-line overrides.

use clap::{Arg, ArgAction, ArgMatches, Command};
use rosetta::rosetta::config::{Loader, RosettaConfig, PROJECT_CONFIG};
use rosetta::rosetta::formats::{self, OutputFormat};
use rosetta::rosetta::keywords::KeywordRegistry;
use rosetta::rosetta::scanner::Scanner;
use rosetta::rosetta::source;
use std::fmt::Display;

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .short('c')
        .help("TOML file layered over the built-in defaults")
}

fn main() {
    let matches = Command::new("rosetta")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A keyword-driven parser for rosetta sources")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("parse")
                .about("Parse a file and print its tree")
                .arg(
                    Arg::new("path")
                        .help("Path to the rosetta file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (tag, treeviz, json, yaml)")
                        .default_value("treeviz"),
                )
                .arg(config_arg())
                .arg(
                    Arg::new("trace")
                        .long("trace")
                        .short('t')
                        .help("Print every dispatched token to stderr")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("trailing-token")
                        .long("trailing-token")
                        .help("What to do with a token left at end of input")
                        .value_parser(["dispatch", "discard", "error"]),
                ),
        )
        .subcommand(
            Command::new("keywords")
                .about("List registered keywords")
                .arg(config_arg()),
        )
        .subcommand(Command::new("formats").about("List all available output formats"))
        .get_matches();

    match matches.subcommand() {
        Some(("parse", parse_matches)) => {
            let path = parse_matches
                .get_one::<String>("path")
                .expect("path is a required argument");
            let format = parse_matches
                .get_one::<String>("format")
                .expect("format has a default value");
            handle_parse_command(path, format, parse_matches);
        }
        Some(("keywords", keywords_matches)) => {
            handle_keywords_command(keywords_matches);
        }
        Some(("formats", _)) => {
            handle_formats_command();
        }
        _ => unreachable!(),
    }
}

fn exit_with(context: &str, error: impl Display) -> ! {
    eprintln!("{}: {}", context, error);
    std::process::exit(1);
}

fn config_loader(path: Option<&String>) -> Loader {
    let loader = Loader::new().with_optional_file(PROJECT_CONFIG);
    match path {
        Some(path) => loader.with_file(path),
        None => loader,
    }
}

fn build_config(loader: Loader) -> RosettaConfig {
    loader
        .build()
        .unwrap_or_else(|e| exit_with("Configuration error", e))
}

fn build_registry(config: &RosettaConfig) -> KeywordRegistry {
    let mut registry = KeywordRegistry::new();
    config
        .apply_keywords(&mut registry)
        .unwrap_or_else(|e| exit_with("Configuration error", e));
    registry
}

/// Handle the parse command
fn handle_parse_command(path: &str, format: &str, matches: &ArgMatches) {
    let format: OutputFormat = format
        .parse()
        .unwrap_or_else(|e| exit_with("Invalid format", e));
    let mut loader = config_loader(matches.get_one::<String>("config"));
    if let Some(policy) = matches.get_one::<String>("trailing-token") {
        loader = loader
            .set_override("scanner.trailing_token", policy.as_str())
            .unwrap_or_else(|e| exit_with("Configuration error", e));
    }
    let config = build_config(loader);
    let registry = build_registry(&config);
    let patterns = config
        .pattern_table()
        .unwrap_or_else(|e| exit_with("Configuration error", e));
    let scanner = Scanner::with_config(&registry, &patterns, config.scanner.clone())
        .unwrap_or_else(|e| exit_with("Configuration error", e));

    let text = source::load(path, config.source.normalize_indentation)
        .unwrap_or_else(|e| exit_with("Error reading file", e));
    let output = scanner
        .parse(&text)
        .unwrap_or_else(|e| exit_with("Parse error", e));

    if matches.get_flag("trace") {
        eprint!("{}", output.trace);
    }

    let rendered =
        formats::serialize(&output.ast, format).unwrap_or_else(|e| exit_with("Format error", e));
    println!("{}", rendered.trim_end());
}

/// Handle the keywords command
fn handle_keywords_command(matches: &ArgMatches) {
    let config = build_config(config_loader(matches.get_one::<String>("config")));
    let registry = build_registry(&config);

    println!("Registered keywords:\n");
    for keyword in registry.definitions() {
        let action = keyword
            .action()
            .map(|action| action.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("  {:<12} {:<8} {}", keyword.name(), keyword.scope().to_string(), action);
    }
}

/// Handle the formats command
fn handle_formats_command() {
    println!("Available output formats:\n");
    for format in OutputFormat::ALL {
        println!("  {:<8} {}", format.name(), format.formatter().description());
    }
}

//! Command-line definition and argument extraction.

use std::path::PathBuf;

use clap::{Arg, ArgMatches, Command, value_parser};

/// Source file to analyze (positional).
fn source_path_arg() -> Arg {
    Arg::new("source_path")
        .value_name("SOURCE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Keel source file")
}

/// Module name override (-m/--module); defaults to the file stem.
fn module_arg() -> Arg {
    Arg::new("module")
        .short('m')
        .long("module")
        .value_name("NAME")
        .help("Module name (defaults to the file stem)")
}

/// Referenced-module signature table (--signatures).
fn signatures_arg() -> Arg {
    Arg::new("signatures")
        .long("signatures")
        .value_name("JSON")
        .value_parser(value_parser!(PathBuf))
        .help("JSON table of referenced-module signatures")
}

/// Color output control (--color).
fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

pub fn build_cli() -> Command {
    Command::new("keel")
        .about("Parser and static analysis for the Keel scripting language")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("check")
                .about("Parse and validate a module, printing diagnostics")
                .arg(source_path_arg())
                .arg(module_arg())
                .arg(signatures_arg())
                .arg(color_arg()),
        )
        .subcommand(
            Command::new("ast")
                .about("Print the parsed syntax tree")
                .arg(source_path_arg())
                .arg(module_arg()),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print semantic tokens as JSON lines")
                .arg(source_path_arg())
                .arg(module_arg()),
        )
}

fn color_choice(matches: &ArgMatches) -> bool {
    match matches.get_one::<String>("color").map(String::as_str) {
        Some("always") => true,
        Some("never") => false,
        _ => std::io::IsTerminal::is_terminal(&std::io::stderr()),
    }
}

pub struct CheckParams {
    pub source_path: PathBuf,
    pub module: Option<String>,
    pub signatures: Option<PathBuf>,
    pub color: bool,
}

impl CheckParams {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        CheckParams {
            source_path: matches
                .get_one::<PathBuf>("source_path")
                .expect("source_path is required")
                .clone(),
            module: matches.get_one::<String>("module").cloned(),
            signatures: matches.get_one::<PathBuf>("signatures").cloned(),
            color: color_choice(matches),
        }
    }
}

pub struct AstParams {
    pub source_path: PathBuf,
    pub module: Option<String>,
}

impl AstParams {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        AstParams {
            source_path: matches
                .get_one::<PathBuf>("source_path")
                .expect("source_path is required")
                .clone(),
            module: matches.get_one::<String>("module").cloned(),
        }
    }
}

pub struct TokensParams {
    pub source_path: PathBuf,
    pub module: Option<String>,
}

impl TokensParams {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        TokensParams {
            source_path: matches
                .get_one::<PathBuf>("source_path")
                .expect("source_path is required")
                .clone(),
            module: matches.get_one::<String>("module").cloned(),
        }
    }
}

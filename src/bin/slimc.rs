//! Command-line interface for slimc
//! This binary compiles templates to PHP, or dumps the intermediate tokens and tree as JSON.
//!
//! Usage:
//!   slimc `<path>` [--format `<php|tokens|ast>`]    - Compile a template (`-` reads stdin)
//!   slimc `<path>` --cache [--cache-dir `<dir>`]    - Compile into the cache, print the cached path
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use slimc::config::{Loader, SlimConfig, PROJECT_CONFIG_FILE};
use slimc::error::{Error, Result};
use slimc::parsing::ParseError;
use slimc::{parse, tokenize, Engine};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, Level};

const STDIN_PATH: &str = "-";

fn main() -> ExitCode {
    let matches = command().get_matches();
    init_logging(matches.get_count("verbose"));

    match run(&matches) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn command() -> Command {
    Command::new("slimc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile indentation-based templates into PHP")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the template, or '-' to read from stdin")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format")
                .value_parser(["php", "tokens", "ast"])
                .default_value("php"),
        )
        .arg(
            Arg::new("tab-width")
                .long("tab-width")
                .help("Spaces per tab in the template and per level in the output")
                .value_parser(value_parser!(i64).range(1..)),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults and ./slimc.toml")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("cache")
                .long("cache")
                .help("Compile into the cache directory and print the cached file's path")
                .action(ArgAction::SetTrue)
                .conflicts_with("format"),
        )
        .arg(
            Arg::new("cache-dir")
                .long("cache-dir")
                .help("Directory holding compiled templates")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log more detail to stderr (repeatable)")
                .action(ArgAction::Count),
        )
}

/// Logs go to stderr so that compiled output on stdout stays clean.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<SlimConfig> {
    let mut loader = Loader::new().with_optional_file(PROJECT_CONFIG_FILE);
    if let Some(path) = matches.get_one::<PathBuf>("config") {
        loader = loader.with_file(path);
    }
    if let Some(width) = matches.get_one::<i64>("tab-width") {
        loader = loader.set_override("render.tab_width", *width)?;
    }
    if let Some(dir) = matches.get_one::<PathBuf>("cache-dir") {
        loader = loader.set_override("cache.directory", dir.display().to_string())?;
    }
    Ok(loader.build()?)
}

fn run(matches: &ArgMatches) -> Result<String> {
    let config = load_config(matches)?;
    debug!(?config, "configuration loaded");

    let path = matches
        .get_one::<String>("path")
        .map(String::as_str)
        .unwrap_or(STDIN_PATH);
    let engine = Engine::from_config(&config)?;

    if matches.get_flag("cache") {
        if path == STDIN_PATH {
            return Err(Error::NotAFile(PathBuf::from(STDIN_PATH)));
        }
        let cached = engine.cache(path)?;
        return Ok(cached.display().to_string());
    }

    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("php");
    match format {
        "tokens" => {
            let (source, name) = read_source(path)?;
            let tokens = tokenize(&source, config.options())
                .map_err(|e| Error::from_parse(ParseError::Lex(e), &name))?;
            Ok(serde_json::to_string_pretty(&tokens)?)
        }
        "ast" => {
            let (source, name) = read_source(path)?;
            let root = parse(&source, config.options())
                .map_err(|e| Error::from_parse(e, &name))?;
            Ok(serde_json::to_string_pretty(&root)?)
        }
        _ if path == STDIN_PATH => {
            let (source, _) = read_source(path)?;
            engine.render_str(&source)
        }
        _ => engine.render_file(path),
    }
}

/// Template source and the name errors should report for it.
fn read_source(path: &str) -> Result<(String, String)> {
    if path == STDIN_PATH {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .map_err(|e| Error::io(STDIN_PATH, e))?;
        return Ok((source, slimc::engine::INPUT_SOURCE_NAME.to_string()));
    }
    let path = PathBuf::from(path);
    if !path.is_file() {
        return Err(Error::NotAFile(path));
    }
    let source = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
    Ok((source, path.display().to_string()))
}

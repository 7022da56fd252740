//! smash - a small Unix shell with job control
//!
//! Prints `<prompt>> `, reads a line, runs it, and repeats until
//! end-of-file or `quit`.

use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context};
use tracing::{debug, info, warn};

use smash::{ConfigLoader, Shell, ShellConfig};

/// Command-line options
#[derive(Debug, Default)]
struct AppArgs {
    /// Configuration file path
    config_path: Option<PathBuf>,
    /// Enable debug logging
    debug: bool,
}

impl AppArgs {
    /// Parse command line arguments
    fn parse() -> anyhow::Result<Self> {
        let args: Vec<String> = env::args().collect();
        let mut app_args = AppArgs::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => {
                    let Some(path) = args.get(i + 1) else {
                        bail!("Missing config file path");
                    };
                    app_args.config_path = Some(PathBuf::from(path));
                    i += 1;
                }
                "--debug" | "-d" => {
                    app_args.debug = true;
                }
                "--help" | "-h" => {
                    print_help();
                    process::exit(0);
                }
                "--version" | "-v" => {
                    println!("{} v{}", smash::NAME, smash::VERSION);
                    process::exit(0);
                }
                arg if arg.starts_with('-') => {
                    bail!("Unknown option: {}", arg);
                }
                arg => {
                    bail!("Unexpected argument: {}", arg);
                }
            }
            i += 1;
        }

        Ok(app_args)
    }
}

/// Print help information
fn print_help() {
    println!("{} - {}", smash::NAME, smash::DESCRIPTION);
    println!();
    println!("USAGE:");
    println!("    smash [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <PATH>    Path to configuration file (TOML or JSON)");
    println!("    -d, --debug            Enable debug logging on stderr");
    println!("    -h, --help             Print this help message");
    println!("    -v, --version          Print version information");
    println!();
    println!("CONFIGURATION:");
    println!("    smash looks for configuration files in the following order:");
    println!("    1. Path specified with --config");
    println!("    2. $SMASH_CONFIG");
    println!("    3. $XDG_CONFIG_HOME/smash/config.toml (or config.json)");
    println!("    4. ~/.smash/config.toml");
    println!("    5. Built-in defaults");
    println!();
    println!("ENVIRONMENT:");
    println!("    SMASH_CONFIG    Path to configuration file");
    println!("    SMASH_DEBUG     Enable debug logging (1 or true)");
    println!("    RUST_LOG        Set logging filter (error, warn, info, debug, trace)");
}

/// Load the configuration, falling back to defaults on any failure
fn load_configuration(args: &AppArgs) -> ShellConfig {
    let loaded = match &args.config_path {
        Some(path) => ConfigLoader::load_from_path(path)
            .with_context(|| format!("loading {}", path.display())),
        None => ConfigLoader::load().context("loading default configuration"),
    };

    loaded.unwrap_or_else(|e| {
        eprintln!("smash error: {:#}; using defaults", e);
        ShellConfig::default()
    })
}

fn debug_requested(args: &AppArgs) -> bool {
    args.debug
        || env::var("SMASH_DEBUG").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

fn main() {
    let args = AppArgs::parse().unwrap_or_else(|e| {
        eprintln!("smash error: {}", e);
        print_help();
        process::exit(1);
    });

    // Logging comes up before the config file is read, so a config
    // problem can itself be traced with --debug
    let debug_logging = debug_requested(&args);
    let config = if debug_logging {
        smash::init_logging("debug");
        load_configuration(&args)
    } else {
        let config = load_configuration(&args);
        smash::init_logging(&config.log_filter);
        config
    };

    info!("starting {} v{}", smash::NAME, smash::VERSION);
    debug!("configuration: {:?}", config);

    if let Err(e) = smash::signals::install_handlers() {
        e.report();
    }

    let mut shell = Shell::new(config);
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("{}", shell.prompt());
        if let Err(e) = io::stdout().flush() {
            warn!("failed to flush prompt: {}", e);
        }

        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => shell.execute_line(line.trim_end_matches('\n')),
            Err(e) => {
                eprintln!("smash error: read failed: {}", e);
                break;
            }
        }
    }

    info!("end of input, exiting");
}

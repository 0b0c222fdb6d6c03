// timberlog: single-sink leveled logging
// main.rs - Command-line entry point: write one entry

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};

use timberlog::{LoggerConfig, Severity};

fn cli() -> Command {
    Command::new("timberlog")
        .version(env!("CARGO_PKG_VERSION"))
        .author("TimberDB Team")
        .about("Append one timestamped, leveled entry to a log")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to a TOML configuration file"),
        )
        .arg(
            Arg::new("log-file")
                .short('f')
                .long("log-file")
                .value_name("PATH")
                .help("File to append to (default: standard output)"),
        )
        .arg(
            Arg::new("level")
                .short('l')
                .long("level")
                .value_name("LEVEL")
                .help("Minimum level to write: debug, info, warning, error, fatal"),
        )
        .arg(
            Arg::new("severity")
                .value_name("SEVERITY")
                .required(true)
                .help("Severity of the entry"),
        )
        .arg(
            Arg::new("message")
                .value_name("MESSAGE")
                .required(true)
                .num_args(1..)
                .action(ArgAction::Append)
                .help("Message words, joined by single spaces"),
        )
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<LoggerConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => LoggerConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => LoggerConfig::default(),
    };

    config.apply_env().context("Invalid environment override")?;

    if let Some(path) = matches.get_one::<String>("log-file") {
        config.log_file = Some(PathBuf::from(path));
    }
    if let Some(level) = matches.get_one::<String>("level") {
        config.log_level = level.parse()?;
    }

    Ok(config)
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let config = load_config(matches)?;

    let severity: Severity = matches
        .get_one::<String>("severity")
        .map(String::as_str)
        .unwrap_or_default()
        .parse()?;

    let message = matches
        .get_many::<String>("message")
        .map(|words| words.map(String::as_str).collect::<Vec<_>>().join(" "))
        .unwrap_or_default();

    // The diagnostic naming the path has already gone to stderr.
    timberlog::init_with_config(&config).context("Failed to initialize logging")?;

    timberlog::log(severity, format_args!("{}", message));
    timberlog::close();

    Ok(())
}

fn main() {
    let matches = cli().get_matches();

    if let Err(err) = run(&matches) {
        eprintln!("{:#}", err);
        process::exit(1);
    }
}

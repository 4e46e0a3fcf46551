//! smaps-analyzer - version 0.1.0
//!
//! Per-object memory analysis of /proc/<pid>/smaps with tracing logging.
//! This is the main entry point that resolves configuration and dispatches
//! to the analyze, check and config commands.

mod cli;
mod commands;
mod config;

use clap::{CommandFactory, Parser};
use tracing::level_filters::LevelFilter;
use tracing::{debug, info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, Registry};

use cli::{Args, Commands, LogLevel};
use commands::{command_analyze, command_check, command_config};
use config::{resolve_config, show_config, validate_effective_config, Config};

type LogHandle = reload::Handle<LevelFilter, Registry>;

fn level_filter(level: &LogLevel) -> LevelFilter {
    match level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}

/// Level used before any config file is read: the CLI flag, or warn.
fn startup_log_level(args: &Args) -> LogLevel {
    args.log_level.clone().unwrap_or(LogLevel::Warn)
}

/// Initializes tracing logging subsystem with the startup log level.
///
/// Logs go to stderr so they never interleave with reports on stdout. The
/// returned handle lets a config file level take over once it is loaded.
fn setup_logging(level: &LogLevel) -> LogHandle {
    let (filter, handle) = reload::Layer::new(level_filter(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    debug!("Logging initialized with level: {:?}", level);
    handle
}

/// Switches to the level of the effective config (CLI already merged in).
fn apply_config_log_level(handle: &LogHandle, config: &Config) {
    let Ok(level) = config.log_level() else {
        return;
    };
    if let Err(e) = handle.modify(|filter| *filter = level_filter(&level)) {
        warn!("Failed to apply log level {:?}: {}", level, e);
    } else {
        debug!("Log level set to {:?} from configuration", level);
    }
}

/// Helper function to load and validate configuration.
/// Exits the process with error code 1 if validation fails.
fn load_validated_config(
    args: &Args,
) -> Result<(Config, smaps_analyzer::ReportOptions), Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;
    match validate_effective_config(&config) {
        Ok(opts) => Ok((config, opts)),
        Err(e) => {
            eprintln!("❌ Configuration invalid: {}", e);
            std::process::exit(1);
        }
    }
}

/// Main application entry point.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let log_handle = setup_logging(&startup_log_level(&args));

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;
        apply_config_log_level(&log_handle, &config);

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format.clone());
    }

    // Handle subcommands
    if let Some(command) = &args.command {
        return match command {
            Commands::Config {
                output,
                format,
                commented,
            } => command_config(output.clone(), format.clone(), *commented),

            Commands::Check => {
                let config = resolve_config(&args)?;
                apply_config_log_level(&log_handle, &config);
                command_check(&config)
            }
        };
    }

    // Configuration errors stop the run before any input is read
    let (config, opts) = load_validated_config(&args)?;
    apply_config_log_level(&log_handle, &config);

    if !args.has_input() {
        Args::command().print_help()?;
        return Ok(());
    }

    info!(
        "Starting analysis sorted by {} ({} files, {} pids, pattern: {:?})",
        opts.sort_field.as_str(),
        args.files.len(),
        args.pid.len(),
        args.process_string
    );

    if !command_analyze(&args, &config, &opts)? {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_log_level_defaults_to_warn() {
        let args = Args::try_parse_from(["smaps-analyzer"]).unwrap();
        assert!(matches!(startup_log_level(&args), LogLevel::Warn));

        let args = Args::try_parse_from(["smaps-analyzer", "--log-level", "info"]).unwrap();
        assert!(matches!(startup_log_level(&args), LogLevel::Info));
        assert_eq!(level_filter(&startup_log_level(&args)), LevelFilter::INFO);
    }
}

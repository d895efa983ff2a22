//! netgauged: the netgauge daemon.
//!
//! Polls one interface octet counter over SNMP every tick and drives an
//! analog gauge plus warn/danger LEDs on an HTTP-controlled board.
//!
//! # Usage
//!
//! ```text
//! netgauged run --config /etc/netgauge.toml
//! netgauged check --config /etc/netgauge.toml
//! netgauged probe --config /etc/netgauge.toml
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use netgauge_core::GaugeConfig;

mod daemon;

/// Used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,netgauged=debug,netgauge_sampler=debug";

#[derive(Parser)]
#[command(
    name = "netgauged",
    about = "netgauge daemon, SNMP traffic counter to HTTP gauge",
    version
)]
struct Cli {
    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Sample and publish until interrupted.
    Run {
        /// Path to netgauge.toml.
        #[arg(short, long, default_value = "netgauge.toml")]
        config: PathBuf,

        /// Override [snmp].target.
        #[arg(long)]
        target: Option<String>,

        /// Override [display].address.
        #[arg(long)]
        display: Option<String>,
    },
    /// Validate the config and print it.
    Check {
        #[arg(short, long, default_value = "netgauge.toml")]
        config: PathBuf,
    },
    /// Read the counter once and print it.
    Probe {
        #[arg(short, long, default_value = "netgauge.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli.command {
        Command::Run {
            config,
            target,
            display,
        } => {
            let mut config = GaugeConfig::from_file(&config)?;
            daemon::apply_overrides(&mut config, target, display)?;
            daemon::run(config).await
        }
        Command::Check { config } => daemon::check(&GaugeConfig::from_file(&config)?),
        Command::Probe { config } => daemon::probe(&GaugeConfig::from_file(&config)?).await,
    }
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_overrides() {
        let cli = Cli::try_parse_from([
            "netgauged",
            "--log-format",
            "json",
            "run",
            "--config",
            "/etc/netgauge.toml",
            "--target",
            "192.0.2.1",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Command::Run {
                config,
                target,
                display,
            } => {
                assert_eq!(config, PathBuf::from("/etc/netgauge.toml"));
                assert_eq!(target.as_deref(), Some("192.0.2.1"));
                assert!(display.is_none());
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn default_filter_shows_sampler_ticks() {
        let filter = tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("netgauge_sampler=debug"), "{rendered}");
        assert!(rendered.contains("netgauged=debug"), "{rendered}");
    }

    #[test]
    fn config_defaults_to_working_directory() {
        let cli = Cli::try_parse_from(["netgauged", "check"]).unwrap();
        assert_eq!(cli.log_format, LogFormat::Text);
        match cli.command {
            Command::Check { config } => assert_eq!(config, PathBuf::from("netgauge.toml")),
            _ => panic!("expected check"),
        }
    }
}

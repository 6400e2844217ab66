//! CLI argument parsing definitions

use clap::{Parser, Subcommand};
use loadspread_config::ResponseEncoding;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send one batch of requests and chart how they were distributed
    Measure {
        /// URL of the load-balanced endpoint
        #[arg(long, value_name = "URL")]
        target: Option<String>,

        /// Number of requests in the batch
        #[arg(long, value_name = "N")]
        requests: Option<usize>,

        /// Response encoding: plain, structured
        #[arg(long, value_name = "MODE")]
        encoding: Option<ResponseEncoding>,

        /// Maximum requests in flight
        #[arg(long, value_name = "N")]
        concurrency: Option<usize>,

        /// Per-request timeout in milliseconds
        #[arg(long, value_name = "MS")]
        timeout_ms: Option<u64>,

        /// Directory for the chart
        #[arg(long, value_name = "DIR")]
        output: Option<String>,
    },

    /// Grow the server pool one server at a time and chart the average load
    Scale {
        /// Base URL of the balancer's management API
        #[arg(long, value_name = "URL")]
        control: Option<String>,

        /// URL of the load-balanced endpoint
        #[arg(long, value_name = "URL")]
        target: Option<String>,

        /// Server count of the first round
        #[arg(long, value_name = "N")]
        min: Option<u32>,

        /// Server count of the last round
        #[arg(long, value_name = "N")]
        max: Option<u32>,

        /// Requests per round
        #[arg(long, value_name = "N")]
        requests: Option<usize>,

        /// Directory for the per-round charts
        #[arg(long, value_name = "DIR")]
        output: Option<String>,
    },

    /// Show the balancer's replica set
    Replicas,

    /// Add servers to the balancer
    Add {
        /// Units of capacity to add
        #[arg(long, value_name = "N", default_value_t = 1)]
        count: u32,

        /// Hostname for a new server (repeatable)
        #[arg(long = "hostname", value_name = "NAME")]
        hostnames: Vec<String>,
    },

    /// Remove servers from the balancer
    Remove {
        /// Units of capacity to remove
        #[arg(long, value_name = "N", default_value_t = 1)]
        count: u32,

        /// Hostname of a server to remove (repeatable)
        #[arg(long = "hostname", value_name = "NAME")]
        hostnames: Vec<String>,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        #[arg(long, value_name = "PATH")]
        config_file: PathBuf,
    },

    /// Generate a sample configuration file
    Generate {
        /// Output file path
        #[arg(long, value_name = "PATH")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Show current configuration in use
    Show {
        /// Output format: yaml, json
        #[arg(long, value_name = "FORMAT", default_value = "yaml")]
        format: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_flags() {
        let cli = Cli::try_parse_from([
            "loadspread",
            "--log-level",
            "debug",
            "measure",
            "--target",
            "http://lb:5000/home",
            "--requests",
            "10000",
            "--encoding",
            "plain",
        ])
        .unwrap();

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Commands::Measure {
                target,
                requests,
                encoding,
                concurrency,
                ..
            } => {
                assert_eq!(target.as_deref(), Some("http://lb:5000/home"));
                assert_eq!(requests, Some(10_000));
                assert_eq!(encoding, Some(ResponseEncoding::Plain));
                assert_eq!(concurrency, None);
            }
            _ => panic!("expected measure"),
        }
    }

    #[test]
    fn test_repeated_hostnames() {
        let cli = Cli::try_parse_from([
            "loadspread",
            "add",
            "--count",
            "2",
            "--hostname",
            "S7",
            "--hostname",
            "S8",
        ])
        .unwrap();

        match cli.command {
            Commands::Add { count, hostnames } => {
                assert_eq!(count, 2);
                assert_eq!(hostnames, vec!["S7".to_string(), "S8".to_string()]);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_unknown_encoding_is_rejected() {
        let result = Cli::try_parse_from(["loadspread", "measure", "--encoding", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["loadspread", "scale", "--max", "8", "--config", "lb.yaml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("lb.yaml")));
    }
}

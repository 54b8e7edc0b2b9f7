use crate::error::MonitorError;
use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(name = "bitflip-monitor", version, about)]
pub struct Cli {
    /// Path to configuration file
    #[clap(long, default_value = "./config.toml")]
    pub config: PathBuf,

    /// Override serial port path
    #[clap(long)]
    pub port: Option<String>,

    /// Override baud rate
    #[clap(long)]
    pub baud_rate: Option<u32>,

    /// Override log file path
    #[clap(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub port: String,
    pub baud_rate: u32,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            baud_rate: 9600,
            log_file: PathBuf::from("bitflip_log.txt"),
        }
    }
}

fn default_port() -> String {
    if cfg!(windows) {
        "COM5".to_string()
    } else {
        "/dev/ttyUSB0".to_string()
    }
}

pub fn load_config(cli: &Cli) -> Result<Config> {
    // A missing config file is fine, the defaults cover the usual bench setup.
    // A present but malformed file is an error.
    let mut config = if cli.config.exists() {
        let config_content = fs::read_to_string(&cli.config)
            .with_context(|| format!("Failed to read config file: {:?}", cli.config))?;

        toml::from_str(&config_content).context("Failed to parse config file")?
    } else {
        Config::default()
    };

    // Apply CLI overrides
    if let Some(ref port) = cli.port {
        config.port = port.clone();
    }

    if let Some(baud_rate) = cli.baud_rate {
        config.baud_rate = baud_rate;
    }

    if let Some(ref log_file) = cli.log_file {
        config.log_file = log_file.clone();
    }

    if config.baud_rate == 0 {
        return Err(MonitorError::Config("baud_rate must be positive".to_string()).into());
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_with_defaults() -> Cli {
        Cli {
            config: PathBuf::from("/nonexistent/config.toml"),
            port: None,
            baud_rate: None,
            log_file: None,
        }
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let config = load_config(&cli_with_defaults()).unwrap();
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.log_file, PathBuf::from("bitflip_log.txt"));
    }

    #[test]
    fn toml_config_parses_with_partial_fields() {
        let config: Config =
            toml::from_str("port = \"/dev/ttyACM0\"\nbaud_rate = 115200\n").unwrap();
        assert_eq!(config.port, "/dev/ttyACM0");
        assert_eq!(config.baud_rate, 115200);
        assert_eq!(config.log_file, PathBuf::from("bitflip_log.txt"));
    }

    #[test]
    fn cli_overrides_take_precedence() {
        let mut cli = cli_with_defaults();
        cli.port = Some("/dev/ttyS3".to_string());
        cli.baud_rate = Some(57600);
        cli.log_file = Some(PathBuf::from("other_log.txt"));

        let config = load_config(&cli).unwrap();
        assert_eq!(config.port, "/dev/ttyS3");
        assert_eq!(config.baud_rate, 57600);
        assert_eq!(config.log_file, PathBuf::from("other_log.txt"));
    }

    #[test]
    fn zero_baud_rate_is_rejected() {
        let mut cli = cli_with_defaults();
        cli.baud_rate = Some(0);

        let err = load_config(&cli).unwrap_err();
        assert!(err.to_string().contains("baud_rate"));
    }
}

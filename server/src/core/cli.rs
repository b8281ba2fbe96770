use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    ENV_CONFIG, ENV_DEBUG, ENV_HOST, ENV_JQUERY_UI_VERSION, ENV_PORT, ENV_SHOP_PER_PAGE,
    ENV_SLIDER_EXTREMA_TRACKING, ENV_SLIDER_KEY_PARSING,
};
use crate::domain::slider::{ExtremaTracking, KeyParsing};

#[derive(Parser)]
#[command(name = "numslider")]
#[command(version, about = "Numeric range slider storefront", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Enable debug mode (logs the SQL of compiled listing filters)
    #[arg(long, global = true, env = ENV_DEBUG)]
    pub debug: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Products per listing page
    #[arg(long, global = true, env = ENV_SHOP_PER_PAGE)]
    pub per_page: Option<u32>,

    /// How term extrema are tracked (independent or legacy)
    #[arg(long, global = true, env = ENV_SLIDER_EXTREMA_TRACKING, value_parser = parse_extrema_tracking)]
    pub extrema_tracking: Option<ExtremaTracking>,

    /// How attribute names are read from bound keys (suffix or first_underscore)
    #[arg(long, global = true, env = ENV_SLIDER_KEY_PARSING, value_parser = parse_key_parsing)]
    pub key_parsing: Option<KeyParsing>,

    /// jQuery UI version loaded from the CDN
    #[arg(long, global = true, env = ENV_JQUERY_UI_VERSION)]
    pub jquery_ui_version: Option<String>,
}

/// Parse extrema tracking mode from CLI/env string
fn parse_extrema_tracking(s: &str) -> Result<ExtremaTracking, String> {
    match s.to_lowercase().as_str() {
        "independent" => Ok(ExtremaTracking::Independent),
        "legacy" => Ok(ExtremaTracking::Legacy),
        _ => Err(format!(
            "Invalid extrema tracking '{}'. Valid options: independent, legacy",
            s
        )),
    }
}

/// Parse key parsing mode from CLI/env string
fn parse_key_parsing(s: &str) -> Result<KeyParsing, String> {
    match s.to_lowercase().replace('-', "_").as_str() {
        "suffix" => Ok(KeyParsing::Suffix),
        "first_underscore" => Ok(KeyParsing::FirstUnderscore),
        _ => Err(format!(
            "Invalid key parsing '{}'. Valid options: suffix, first_underscore",
            s
        )),
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// Catalog management commands
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// System maintenance commands
    System {
        #[command(subcommand)]
        command: SystemCommands,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum CatalogCommands {
    /// Import attributes, terms and products from a JSON seed file
    Import {
        /// Path to the seed file
        file: PathBuf,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum SystemCommands {
    /// Delete local data directory (catalog database). Requires confirmation.
    Prune {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: bool,
    pub config: Option<PathBuf>,
    pub per_page: Option<u32>,
    pub extrema_tracking: Option<ExtremaTracking>,
    pub key_parsing: Option<KeyParsing>,
    pub jquery_ui_version: Option<String>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        debug: cli.debug,
        config: cli.config,
        per_page: cli.per_page,
        extrema_tracking: cli.extrema_tracking,
        key_parsing: cli.key_parsing,
        jquery_ui_version: cli.jquery_ui_version,
    };
    (config, cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extrema_tracking() {
        assert_eq!(
            parse_extrema_tracking("Legacy"),
            Ok(ExtremaTracking::Legacy)
        );
        assert!(parse_extrema_tracking("sometimes").is_err());
    }

    #[test]
    fn test_parse_key_parsing_accepts_dashes() {
        assert_eq!(
            parse_key_parsing("first-underscore"),
            Ok(KeyParsing::FirstUnderscore)
        );
        assert_eq!(parse_key_parsing("suffix"), Ok(KeyParsing::Suffix));
        assert!(parse_key_parsing("prefix").is_err());
    }

    #[test]
    fn test_catalog_import_subcommand() {
        let cli = Cli::try_parse_from(["numslider", "catalog", "import", "seed.json"]).unwrap();
        match cli.command {
            Some(Commands::Catalog {
                command: CatalogCommands::Import { file },
            }) => assert_eq!(file, PathBuf::from("seed.json")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["numslider", "start", "--port", "8080"]).unwrap();
        assert_eq!(cli.port, Some(8080));
        assert!(matches!(cli.command, Some(Commands::Start)));
    }
}

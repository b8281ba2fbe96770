use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::slider::{ExtremaTracking, KeyParsing};
use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_JQUERY_UI_VERSION, DEFAULT_PORT,
    DEFAULT_SHOP_BASE_PATH, DEFAULT_SHOP_PER_PAGE, MAX_SHOP_PER_PAGE,
};

// =============================================================================
// File Config Structs (all fields optional for merging)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Shop listing configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ShopFileConfig {
    pub per_page: Option<u32>,
    pub base_path: Option<String>,
}

/// Slider behavior configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SliderFileConfig {
    pub extrema_tracking: Option<ExtremaTracking>,
    pub key_parsing: Option<KeyParsing>,
}

/// Front-end asset configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AssetsFileConfig {
    pub jquery_ui_version: Option<String>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub shop: Option<ShopFileConfig>,
    pub slider: Option<SliderFileConfig>,
    pub assets: Option<AssetsFileConfig>,
    pub debug: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
        }

        if let Some(shop) = other.shop {
            let current = self.shop.get_or_insert_with(ShopFileConfig::default);
            if shop.per_page.is_some() {
                tracing::trace!(per_page = ?shop.per_page, "Merging shop.per_page");
                current.per_page = shop.per_page;
            }
            if shop.base_path.is_some() {
                tracing::trace!(base_path = ?shop.base_path, "Merging shop.base_path");
                current.base_path = shop.base_path;
            }
        }

        if let Some(slider) = other.slider {
            let current = self.slider.get_or_insert_with(SliderFileConfig::default);
            if slider.extrema_tracking.is_some() {
                tracing::trace!(
                    extrema_tracking = ?slider.extrema_tracking,
                    "Merging slider.extrema_tracking"
                );
                current.extrema_tracking = slider.extrema_tracking;
            }
            if slider.key_parsing.is_some() {
                tracing::trace!(key_parsing = ?slider.key_parsing, "Merging slider.key_parsing");
                current.key_parsing = slider.key_parsing;
            }
        }

        if let Some(assets) = other.assets {
            let current = self.assets.get_or_insert_with(AssetsFileConfig::default);
            if assets.jquery_ui_version.is_some() {
                tracing::trace!(
                    jquery_ui_version = ?assets.jquery_ui_version,
                    "Merging assets.jquery_ui_version"
                );
                current.jquery_ui_version = assets.jquery_ui_version;
            }
        }

        if other.debug.is_some() {
            tracing::trace!(debug = ?other.debug, "Merging debug");
            self.debug = other.debug;
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Shop listing configuration
#[derive(Debug, Clone)]
pub struct ShopConfig {
    pub per_page: u32,
    pub base_path: String,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_SHOP_PER_PAGE,
            base_path: DEFAULT_SHOP_BASE_PATH.to_string(),
        }
    }
}

/// Slider behavior configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliderConfig {
    pub extrema_tracking: ExtremaTracking,
    pub key_parsing: KeyParsing,
}

/// Front-end asset configuration
#[derive(Debug, Clone)]
pub struct AssetsConfig {
    pub jquery_ui_version: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            jquery_ui_version: DEFAULT_JQUERY_UI_VERSION.to_string(),
        }
    }
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub shop: ShopConfig,
    pub slider: SliderConfig,
    pub assets: AssetsConfig,
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
            },
            shop: ShopConfig::default(),
            slider: SliderConfig::default(),
            assets: AssetsConfig::default(),
            debug: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.numslider/numslider.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let config = Self::layer(file_config, cli);
        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            per_page = config.shop.per_page,
            base_path = %config.shop.base_path,
            extrema_tracking = %config.slider.extrema_tracking,
            key_parsing = %config.slider.key_parsing,
            jquery_ui_version = %config.assets.jquery_ui_version,
            debug = config.debug,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Layer configs: defaults -> file config -> CLI/env overrides
    fn layer(file_config: FileConfig, cli: &CliConfig) -> Self {
        let defaults = Self::default();
        let file_server = file_config.server.unwrap_or_default();
        let file_shop = file_config.shop.unwrap_or_default();
        let file_slider = file_config.slider.unwrap_or_default();
        let file_assets = file_config.assets.unwrap_or_default();

        Self {
            server: ServerConfig {
                host: cli
                    .host
                    .clone()
                    .or(file_server.host)
                    .unwrap_or(defaults.server.host),
                port: cli
                    .port
                    .or(file_server.port)
                    .unwrap_or(defaults.server.port),
            },
            shop: ShopConfig {
                per_page: cli
                    .per_page
                    .or(file_shop.per_page)
                    .unwrap_or(defaults.shop.per_page),
                base_path: file_shop.base_path.unwrap_or(defaults.shop.base_path),
            },
            slider: SliderConfig {
                extrema_tracking: cli
                    .extrema_tracking
                    .or(file_slider.extrema_tracking)
                    .unwrap_or_default(),
                key_parsing: cli
                    .key_parsing
                    .or(file_slider.key_parsing)
                    .unwrap_or_default(),
            },
            assets: AssetsConfig {
                jquery_ui_version: cli
                    .jquery_ui_version
                    .clone()
                    .or(file_assets.jquery_ui_version)
                    .unwrap_or(defaults.assets.jquery_ui_version),
            },
            // --debug flag enables, file config can also enable
            debug: cli.debug || file_config.debug.unwrap_or(false),
        }
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        if self.shop.per_page == 0 || self.shop.per_page > MAX_SHOP_PER_PAGE {
            anyhow::bail!(
                "Configuration error: shop.per_page must be between 1 and {}",
                MAX_SHOP_PER_PAGE
            );
        }

        let base_path = &self.shop.base_path;
        if !base_path.starts_with('/')
            || base_path.len() < 2
            || base_path.ends_with('/')
            || base_path.contains(['{', '}', '*', '?', '#'])
        {
            anyhow::bail!(
                "Configuration error: shop.base_path must look like '/shop', got '{}'",
                base_path
            );
        }

        let version = &self.assets.jquery_ui_version;
        if version.is_empty() || !version.chars().all(|c| c.is_ascii_digit() || c == '.') {
            anyhow::bail!(
                "Configuration error: assets.jquery_ui_version must be a dotted version, got '{}'",
                version
            );
        }

        Ok(())
    }
}

/// Check if host binds to all network interfaces
pub(crate) fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}

/// Get the profile config path (~/.numslider/numslider.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_file_config_parse_full() {
        let json = r#"{
            "server": { "host": "0.0.0.0", "port": 8080 },
            "shop": { "per_page": 24, "base_path": "/store" },
            "slider": { "extrema_tracking": "legacy", "key_parsing": "first_underscore" },
            "assets": { "jquery_ui_version": "1.12.1" },
            "debug": true
        }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        assert_eq!(
            config.server.as_ref().unwrap().host,
            Some("0.0.0.0".to_string())
        );
        assert_eq!(config.shop.as_ref().unwrap().per_page, Some(24));
        assert_eq!(
            config.slider.as_ref().unwrap().extrema_tracking,
            Some(ExtremaTracking::Legacy)
        );
        assert_eq!(
            config.slider.as_ref().unwrap().key_parsing,
            Some(KeyParsing::FirstUnderscore)
        );
        assert_eq!(config.debug, Some(true));
    }

    #[test]
    fn test_file_config_parse_empty() {
        let config: FileConfig = serde_json::from_str("{}").unwrap();
        assert!(config.server.is_none());
        assert!(config.slider.is_none());
    }

    #[test]
    fn test_file_config_parse_extra_fields() {
        let json = r#"{ "server": { "port": 1 }, "sliders": {} }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();
        match &config.extra {
            serde_json::Value::Object(map) => assert!(map.contains_key("sliders")),
            other => panic!("unexpected extra: {:?}", other),
        }
    }

    #[test]
    fn test_file_config_rejects_unknown_mode() {
        let json = r#"{ "slider": { "extrema_tracking": "sometimes" } }"#;
        assert!(serde_json::from_str::<FileConfig>(json).is_err());
    }

    #[test]
    fn test_file_config_merge() {
        let mut base: FileConfig = serde_json::from_str(
            r#"{
                "server": { "host": "base.host", "port": 1000 },
                "shop": { "per_page": 10 },
                "slider": { "extrema_tracking": "legacy" },
                "debug": false
            }"#,
        )
        .unwrap();
        let overlay: FileConfig = serde_json::from_str(
            r#"{
                "server": { "port": 2000 },
                "slider": { "key_parsing": "first_underscore" },
                "debug": true
            }"#,
        )
        .unwrap();

        base.merge(overlay);

        let server = base.server.unwrap();
        assert_eq!(server.host, Some("base.host".to_string()));
        assert_eq!(server.port, Some(2000));
        assert_eq!(base.shop.unwrap().per_page, Some(10));
        let slider = base.slider.unwrap();
        assert_eq!(slider.extrema_tracking, Some(ExtremaTracking::Legacy));
        assert_eq!(slider.key_parsing, Some(KeyParsing::FirstUnderscore));
        assert_eq!(base.debug, Some(true));
    }

    #[test]
    fn test_layer_defaults() {
        let config = AppConfig::layer(FileConfig::default(), &CliConfig::default());

        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.shop.per_page, DEFAULT_SHOP_PER_PAGE);
        assert_eq!(config.shop.base_path, DEFAULT_SHOP_BASE_PATH);
        assert_eq!(config.slider, SliderConfig::default());
        assert_eq!(config.slider.extrema_tracking, ExtremaTracking::Independent);
        assert_eq!(config.slider.key_parsing, KeyParsing::Suffix);
        assert!(!config.debug);
    }

    #[test]
    fn test_layer_cli_overrides_file() {
        let file: FileConfig = serde_json::from_str(
            r#"{
                "server": { "host": "file.host", "port": 1000 },
                "slider": { "extrema_tracking": "legacy" }
            }"#,
        )
        .unwrap();
        let cli = CliConfig {
            port: Some(3000),
            extrema_tracking: Some(ExtremaTracking::Independent),
            ..Default::default()
        };

        let config = AppConfig::layer(file, &cli);
        assert_eq!(config.server.host, "file.host");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.slider.extrema_tracking, ExtremaTracking::Independent);
    }

    #[test]
    fn test_load_from_config_path() {
        let file = write_config(
            r#"{ "shop": { "per_page": 5, "base_path": "/store" }, "slider": { "key_parsing": "first_underscore" } }"#,
        );
        let cli = CliConfig {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };

        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.shop.per_page, 5);
        assert_eq!(config.shop.base_path, "/store");
        assert_eq!(config.slider.key_parsing, KeyParsing::FirstUnderscore);
    }

    #[test]
    fn test_load_missing_config_path_fails() {
        let cli = CliConfig {
            config: Some(PathBuf::from("/nonexistent/numslider.json")),
            ..Default::default()
        };
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_invalid_json_fails() {
        let file = write_config("{ not json");
        let cli = CliConfig {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_validation_port_zero() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_per_page_bounds() {
        let mut config = AppConfig::default();
        config.shop.per_page = 0;
        assert!(config.validate().is_err());
        config.shop.per_page = MAX_SHOP_PER_PAGE + 1;
        assert!(config.validate().is_err());
        config.shop.per_page = MAX_SHOP_PER_PAGE;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_base_path() {
        let mut config = AppConfig::default();
        for bad in ["shop", "/", "/shop/", "/{shop}"] {
            config.shop.base_path = bad.to_string();
            assert!(config.validate().is_err(), "accepted {}", bad);
        }
        config.shop.base_path = "/catalog/all".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_is_all_interfaces() {
        assert!(is_all_interfaces("0.0.0.0"));
        assert!(is_all_interfaces("[::]"));
        assert!(!is_all_interfaces("127.0.0.1"));
    }

    #[test]
    fn test_validation_jquery_ui_version() {
        let mut config = AppConfig::default();
        config.assets.jquery_ui_version = "latest".to_string();
        assert!(config.validate().is_err());
    }
}

//! Effective configuration with full provenance
//!
//! The effective config captures the merged configuration plus
//! information about where each layer came from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use salesdash_settings::{merge_layers, SettingValue, SettingsTree};

use super::defaults::BuiltinDefaults;
use crate::chart::ChartKind;
use crate::format::CurrencyFormat;

/// Schema version for effective_config
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "salesdash/effective_config@1";

/// Project config file name, looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "salesdash.toml";

/// Largest accepted `currency.decimals`
const MAX_DECIMALS: u64 = 6;

/// Origin of a configuration source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    Host,
    Project,
    Cli,
}

/// A contributing config source with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    /// Origin of this source
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Effective configuration with full provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When this config was computed
    pub created_at: DateTime<Utc>,

    /// The merged configuration tree
    pub config: SettingsTree,

    /// Contributing sources in precedence order
    pub sources: Vec<ConfigSource>,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl EffectiveConfig {
    /// Build effective config from layers
    ///
    /// Host and project files that do not exist are skipped.
    pub fn build(
        host_config_path: Option<&Path>,
        project_config_path: Option<&Path>,
        cli_overrides: Option<SettingsTree>,
    ) -> Result<Self, ConfigError> {
        let mut layers = Vec::new();
        let mut sources = Vec::new();

        // Layer 1: Built-in defaults
        layers.push(BuiltinDefaults::default().to_tree());
        sources.push(ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        });

        // Layers 2 and 3: host and project files
        for (origin, path) in [
            (ConfigOrigin::Host, host_config_path),
            (ConfigOrigin::Project, project_config_path),
        ] {
            let Some(path) = path else { continue };
            if !path.exists() {
                tracing::debug!(path = %path.display(), ?origin, "config file absent, skipping");
                continue;
            }
            let (tree, digest) = load_settings_file(path)?;
            tracing::debug!(path = %path.display(), ?origin, %digest, "loaded config layer");
            layers.push(tree);
            sources.push(ConfigSource {
                origin,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            });
        }

        // Layer 4: CLI overrides
        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(&layers);
        Self::validate_config(&merged)?;

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            config: merged,
            sources,
        })
    }

    /// Build from the default host path and `./salesdash.toml`.
    pub fn load_default(cli_overrides: Option<SettingsTree>) -> Result<Self, ConfigError> {
        let host = default_host_path();
        if host.is_none() {
            tracing::warn!("HOME not set, skipping host config");
        }
        Self::build(host.as_deref(), Some(Path::new(PROJECT_CONFIG_FILE)), cli_overrides)
    }

    /// Validate configuration values
    fn validate_config(config: &SettingsTree) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::ValidationError(msg));

        if let Some(symbol) = config.get_path("currency.symbol") {
            if symbol.as_str().is_none() {
                return invalid(format!("currency.symbol must be a string, got {}", symbol.kind_name()));
            }
        }

        if let Some(decimals) = config.get_path("currency.decimals") {
            match decimals.as_u64() {
                Some(d) if d <= MAX_DECIMALS => {}
                _ => return invalid(format!("currency.decimals must be an integer in [0, {}]", MAX_DECIMALS)),
            }
        }

        if let Some(percent) = config.get_path("palette.darken_percent") {
            match percent.as_u64() {
                Some(p) if p <= 100 => {}
                _ => return invalid("palette.darken_percent must be an integer in [0, 100]".to_string()),
            }
        }

        if let Some(top_n) = config.get_path("presets.top_n") {
            match top_n.as_u64() {
                Some(n) if n > 0 => {}
                _ => return invalid("presets.top_n must be a positive integer".to_string()),
            }
        }

        if let Some(charts) = config.get_path("charts") {
            let Some(charts) = charts.as_tree() else {
                return invalid(format!("charts must be a table, got {}", charts.kind_name()));
            };
            for (name, options) in charts {
                if ChartKind::from_config_key(name).is_none() {
                    return invalid(format!(
                        "charts.{} is not a chart kind (expected bar, line, doughnut or pie)",
                        name
                    ));
                }
                if !options.is_tree() {
                    return invalid(format!("charts.{} must be a table, got {}", name, options.kind_name()));
                }
            }
        }

        Ok(())
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write to file
    pub fn write_to_file(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JSON serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)
    }

    /// Get a config value by path (dot-separated)
    pub fn get(&self, path: &str) -> Option<&SettingValue> {
        self.config.get_path(path)
    }

    /// Get a config value as u64
    pub fn get_u64(&self, path: &str) -> Option<u64> {
        self.config.get_u64(path)
    }

    /// Get a config value as string
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.config.get_str(path)
    }

    /// Currency format for labels
    pub fn currency(&self) -> CurrencyFormat {
        let fallback = CurrencyFormat::default();
        CurrencyFormat {
            symbol: self
                .get_str("currency.symbol")
                .map(str::to_string)
                .unwrap_or(fallback.symbol),
            decimals: self
                .get_u64("currency.decimals")
                .map(|d| d as usize)
                .unwrap_or(fallback.decimals),
        }
    }

    /// Border darkening percent
    pub fn darken_percent(&self) -> u32 {
        self.get_u64("palette.darken_percent")
            .and_then(|p| u32::try_from(p).ok())
            .unwrap_or(20)
    }

    /// Bars kept in ranked charts
    pub fn top_n(&self) -> usize {
        self.get_u64("presets.top_n")
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(10)
    }

    /// Configured option overrides for a chart kind (`charts.<kind>`).
    ///
    /// `charts.pie` is read for doughnut charts when `charts.doughnut` is
    /// absent.
    pub fn chart_overrides(&self, kind: ChartKind) -> Option<&SettingsTree> {
        let lookup = |name: &str| self.get(&format!("charts.{}", name)).and_then(SettingValue::as_tree);
        match kind {
            ChartKind::Doughnut => lookup("doughnut").or_else(|| lookup("pie")),
            other => lookup(other.as_str()),
        }
    }
}

/// Default host config path (`~/.config/salesdash/config.toml`)
pub fn default_host_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config/salesdash/config.toml"))
}

/// Load a settings file, returning the tree and the SHA-256 of its bytes
///
/// `.json` files are parsed as JSON, anything else as TOML. The document
/// root must be a table/object.
pub fn load_settings_file(path: &Path) -> Result<(SettingsTree, String), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hex::encode(hasher.finalize());

    let contents = String::from_utf8(bytes)
        .map_err(|e| ConfigError::ParseError(format!("Invalid UTF-8: {}", e)))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let tree = if is_json {
        let value: serde_json::Value = serde_json::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("JSON parse error in {}: {}", path.display(), e)))?;
        SettingsTree::try_from(value)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?
    } else {
        let table: toml::Table = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error in {}: {}", path.display(), e)))?;
        table.into_iter().map(|(k, v)| (k, toml_to_setting(v))).collect()
    };

    Ok((tree, digest))
}

/// Convert a TOML value to a settings value
fn toml_to_setting(toml: toml::Value) -> SettingValue {
    match toml {
        toml::Value::String(s) => SettingValue::from(s),
        toml::Value::Integer(i) => SettingValue::from(i),
        toml::Value::Float(f) => SettingValue::from(f),
        toml::Value::Boolean(b) => SettingValue::from(b),
        toml::Value::Datetime(dt) => SettingValue::from(dt.to_string()),
        toml::Value::Array(arr) => {
            SettingValue::Sequence(arr.into_iter().map(toml_to_setting).collect())
        }
        toml::Value::Table(table) => SettingValue::Tree(
            table.into_iter().map(|(k, v)| (k, toml_to_setting(v))).collect(),
        ),
    }
}

//! Built-in dashboard defaults (layer 1)
//!
//! Hardcoded defaults for every configuration value.

use serde::{Deserialize, Serialize};

use salesdash_settings::SettingsTree;

use crate::format::DEFAULT_CURRENCY;

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Currency prefix (default: "MWK")
    pub currency_symbol: String,

    /// Currency fraction digits (default: 2)
    pub currency_decimals: u64,

    /// Border darkening in percent (default: 20)
    pub darken_percent: u64,

    /// Bars kept in ranked charts (default: 10)
    pub top_n: u64,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY.to_string(),
            currency_decimals: 2,
            darken_percent: 20,
            top_n: 10,
        }
    }
}

impl BuiltinDefaults {
    /// Convert to a settings tree for merging.
    ///
    /// `charts` starts empty; per-kind chart options come from the chart
    /// module's built-in trees and only configured overrides live here.
    pub fn to_tree(&self) -> SettingsTree {
        SettingsTree::new()
            .with(
                "currency",
                SettingsTree::new()
                    .with("symbol", self.currency_symbol.as_str())
                    .with("decimals", self.currency_decimals),
            )
            .with("palette", SettingsTree::new().with("darken_percent", self.darken_percent))
            .with("presets", SettingsTree::new().with("top_n", self.top_n))
            .with("charts", SettingsTree::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = BuiltinDefaults::default();
        assert_eq!(defaults.currency_symbol, "MWK");
        assert_eq!(defaults.currency_decimals, 2);
        assert_eq!(defaults.darken_percent, 20);
        assert_eq!(defaults.top_n, 10);
    }

    #[test]
    fn test_to_tree() {
        let tree = BuiltinDefaults::default().to_tree();
        assert_eq!(tree.get_str("currency.symbol"), Some("MWK"));
        assert_eq!(tree.get_u64("currency.decimals"), Some(2));
        assert_eq!(tree.get_u64("palette.darken_percent"), Some(20));
        assert_eq!(tree.get_u64("presets.top_n"), Some(10));
        assert!(tree.get_path("charts").unwrap().is_tree());
    }
}

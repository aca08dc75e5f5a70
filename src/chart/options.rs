//! Default option trees per chart kind.
//!
//! Label callbacks are expressed as named formats under `format` keys
//! (`scales.<axis>.ticks.format`, `plugins.tooltip.format`), see
//! [`LabelFormat`](crate::format::LabelFormat).

use std::collections::BTreeMap;

use salesdash_settings::{merge, SettingsTree};

use super::ChartKind;
use crate::config::EffectiveConfig;
use crate::format::{CurrencyFormat, LabelFormat};

fn node() -> SettingsTree {
    SettingsTree::new()
}

fn common_options() -> SettingsTree {
    node()
        .with("responsive", true)
        .with("maintainAspectRatio", false)
}

fn value_axis() -> SettingsTree {
    node()
        .with("beginAtZero", true)
        .with("ticks", node().with("format", LabelFormat::Number.as_str()))
}

/// Built-in options for a chart kind, before any configuration or caller
/// overrides are applied.
pub fn default_options(kind: ChartKind) -> SettingsTree {
    match kind {
        ChartKind::Bar => common_options()
            .with("plugins", node().with("legend", node().with("position", "top")))
            .with("scales", node().with("y", value_axis())),
        ChartKind::Line => default_options(ChartKind::Bar)
            .with("elements", node().with("line", node().with("tension", 0.1))),
        ChartKind::Doughnut => common_options().with(
            "plugins",
            node()
                .with("legend", node().with("position", "right"))
                .with("tooltip", node().with("format", LabelFormat::Share.as_str())),
        ),
    }
}

/// Per-kind defaults plus presentation settings shared by presets.
///
/// Built either from the built-in trees or from an effective configuration,
/// whose `charts.<kind>` trees are merged over the built-ins.
#[derive(Debug, Clone)]
pub struct ChartDefaults {
    options: BTreeMap<ChartKind, SettingsTree>,

    /// Currency used by currency label formats
    pub currency: CurrencyFormat,

    /// Percentage used to darken border colours
    pub darken_percent: u32,

    /// Maximum bars in ranked charts
    pub top_n: usize,
}

impl Default for ChartDefaults {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ChartDefaults {
    /// Built-in defaults only.
    pub fn builtin() -> Self {
        Self {
            options: ChartKind::ALL.iter().map(|k| (*k, default_options(*k))).collect(),
            currency: CurrencyFormat::default(),
            darken_percent: 20,
            top_n: 10,
        }
    }

    /// Built-in defaults with configuration applied.
    pub fn from_config(config: &EffectiveConfig) -> Self {
        let options = ChartKind::ALL
            .iter()
            .map(|kind| {
                let builtin = default_options(*kind);
                let merged = match config.chart_overrides(*kind) {
                    Some(overrides) => {
                        tracing::debug!(kind = %kind, keys = overrides.len(), "applying configured chart options");
                        merge(&builtin, overrides)
                    }
                    None => builtin,
                };
                (*kind, merged)
            })
            .collect();

        Self {
            options,
            currency: config.currency(),
            darken_percent: config.darken_percent(),
            top_n: config.top_n(),
        }
    }

    /// Default options tree for `kind`.
    pub fn options(&self, kind: ChartKind) -> SettingsTree {
        self.options
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| default_options(kind))
    }

    /// Effective options: defaults for `kind` with `overrides` merged on top.
    pub fn resolve(&self, kind: ChartKind, overrides: &SettingsTree) -> SettingsTree {
        match self.options.get(&kind) {
            Some(defaults) => merge(defaults, overrides),
            None => merge(&default_options(kind), overrides),
        }
    }
}

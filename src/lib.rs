//! Salesdash charts - chart configuration for the sales dashboard
//!
//! This crate produces the configuration documents the dashboard hands to
//! its charting library: per-kind default options merged with caller
//! overrides, preset sales charts, label formatting, palette helpers and an
//! owned registry of live charts.

pub mod chart;
pub mod config;
pub mod demo;
pub mod format;
pub mod logging;
pub mod palette;

pub use salesdash_settings as settings;
pub use salesdash_settings::{merge, merge_layers, SettingValue, SettingsTree};

pub use chart::{ChartDefaults, ChartKind, ChartRegistry, ChartSpec, Preset};
pub use config::{ConfigError, EffectiveConfig};

//! Chart kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chart type understood by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    /// Pie charts are drawn as doughnuts
    #[serde(alias = "pie")]
    Doughnut,
}

/// Returned for an unrecognised chart kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown chart kind '{0}' (expected bar, line, doughnut or pie)")]
pub struct UnknownChartKind(pub String);

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Bar, ChartKind::Line, ChartKind::Doughnut];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Doughnut => "doughnut",
        }
    }

    /// Kind for an exact `charts.<name>` config key; `pie` reads as doughnut.
    ///
    /// No trimming or case folding, unlike [`FromStr`].
    pub fn from_config_key(name: &str) -> Option<Self> {
        match name {
            "bar" => Some(ChartKind::Bar),
            "line" => Some(ChartKind::Line),
            "doughnut" | "pie" => Some(ChartKind::Doughnut),
            _ => None,
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = UnknownChartKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bar" => Ok(ChartKind::Bar),
            "line" => Ok(ChartKind::Line),
            "doughnut" | "pie" => Ok(ChartKind::Doughnut),
            _ => Err(UnknownChartKind(s.to_string())),
        }
    }
}

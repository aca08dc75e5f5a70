//! Chart documents handed to the renderer.
//!
//! A [`ChartSpec`] serializes to the `{type, data, options}` shape the
//! browser charting library takes as its constructor argument.

use serde::{Deserialize, Serialize};

use salesdash_settings::{SettingValue, SettingsTree};

use super::ChartKind;
use crate::format::{CurrencyFormat, LabelContext, LabelFormat};

/// Serialized dataset fields that `style` must not repeat.
const RESERVED_KEYS: [&str; 2] = ["label", "data"];

/// One data series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    pub data: Vec<f64>,

    /// Renderer styling (colours, borderWidth, fill, tension...)
    #[serde(flatten)]
    pub style: SettingsTree,
}

impl Dataset {
    pub fn new(label: impl Into<String>, data: Vec<f64>) -> Self {
        Self {
            label: Some(label.into()),
            data,
            style: SettingsTree::new(),
        }
    }

    /// Dataset without a series label (pie slices are labelled by category).
    pub fn unlabelled(data: Vec<f64>) -> Self {
        Self {
            label: None,
            data,
            style: SettingsTree::new(),
        }
    }

    /// Builder-style style property.
    ///
    /// `label` and `data` are dataset fields, not styling, and are ignored
    /// here so they are never serialized twice.
    pub fn style(mut self, key: &str, value: impl Into<SettingValue>) -> Self {
        if RESERVED_KEYS.contains(&key) {
            tracing::warn!(key, "ignoring dataset style key that shadows a dataset field");
            return self;
        }
        self.style.insert(key, value);
        self
    }

    pub fn total(&self) -> f64 {
        self.data.iter().sum()
    }
}

/// Category labels plus datasets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub labels: Vec<String>,

    #[serde(default)]
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    pub fn new(labels: Vec<String>, datasets: Vec<Dataset>) -> Self {
        Self { labels, datasets }
    }
}

/// Complete chart configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: ChartKind,

    pub data: ChartData,

    /// Effective options (defaults merged with overrides)
    pub options: SettingsTree,
}

impl ChartSpec {
    /// Assemble a spec from already-resolved options.
    pub fn new(kind: ChartKind, data: ChartData, options: SettingsTree) -> Self {
        Self { kind, data, options }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    fn format_at(&self, path: &str) -> Option<LabelFormat> {
        self.options.get_str(path).and_then(|s| s.parse().ok())
    }

    /// Label for a tick on `axis` (`x` or `y`), if the axis names a format.
    pub fn tick_label(&self, axis: &str, value: f64, currency: &CurrencyFormat) -> Option<String> {
        let format = self.format_at(&format!("scales.{}.ticks.format", axis))?;
        Some(format.apply(value, &LabelContext::default(), currency))
    }

    /// Tooltip text for point `index` of dataset `dataset`.
    ///
    /// Uses `plugins.tooltip.format` when set. `plugins.tooltip.label`
    /// replaces the series label for series formats. Without a format the
    /// text is `label: value`.
    pub fn tooltip_label(&self, dataset: usize, index: usize, currency: &CurrencyFormat) -> Option<String> {
        let series = self.data.datasets.get(dataset)?;
        let value = *series.data.get(index)?;
        let category = self.data.labels.get(index).map(String::as_str).unwrap_or("");
        let series_label = self
            .options
            .get_str("plugins.tooltip.label")
            .or(series.label.as_deref())
            .unwrap_or("");

        let text = match self.format_at("plugins.tooltip.format") {
            Some(format @ (LabelFormat::Share | LabelFormat::Customers)) => {
                let ctx = LabelContext { label: category, total: series.total() };
                format.apply(value, &ctx, currency)
            }
            Some(format) => {
                let ctx = LabelContext { label: series_label, total: series.total() };
                format.apply(value, &ctx, currency)
            }
            None => {
                let label = if series_label.is_empty() { category } else { series_label };
                format!("{}: {}", label, value)
            }
        };
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ChartSpec {
        let data = ChartData::new(
            vec!["Jan".to_string(), "Feb".to_string()],
            vec![Dataset::new("Sales", vec![1500.0, 2500.0]).style("borderWidth", 2i64)],
        );
        let options = SettingsTree::try_from(json!({
            "scales": {"y": {"ticks": {"format": "currency"}}},
            "plugins": {"tooltip": {"format": "series_currency"}}
        }))
        .unwrap();
        ChartSpec::new(ChartKind::Line, data, options)
    }

    #[test]
    fn test_serializes_renderer_shape() {
        let value = sample().to_value().unwrap();
        assert_eq!(value["type"], "line");
        assert_eq!(value["data"]["labels"], json!(["Jan", "Feb"]));
        assert_eq!(value["data"]["datasets"][0]["label"], "Sales");
        assert_eq!(value["data"]["datasets"][0]["borderWidth"], 2);
        assert_eq!(value["options"]["scales"]["y"]["ticks"]["format"], "currency");
    }

    #[test]
    fn test_deserializes_flattened_style() {
        let spec: ChartSpec = serde_json::from_value(json!({
            "type": "bar",
            "data": {"labels": ["A"], "datasets": [{"data": [1.0], "backgroundColor": "#4e73df"}]},
            "options": {}
        }))
        .unwrap();
        let dataset = &spec.data.datasets[0];
        assert!(dataset.label.is_none());
        assert_eq!(dataset.style.get_str("backgroundColor"), Some("#4e73df"));
    }

    #[test]
    fn test_tick_and_tooltip_labels() {
        let spec = sample();
        let currency = CurrencyFormat::default();
        assert_eq!(spec.tick_label("y", 20000.0, &currency).unwrap(), "MWK 20,000");
        assert!(spec.tick_label("x", 1.0, &currency).is_none());
        assert_eq!(spec.tooltip_label(0, 1, &currency).unwrap(), "Sales: MWK 2,500");
        assert!(spec.tooltip_label(0, 5, &currency).is_none());
        assert!(spec.tooltip_label(3, 0, &currency).is_none());
    }

    #[test]
    fn test_style_ignores_dataset_fields() {
        let dataset = Dataset::new("Sales", vec![1.0])
            .style("label", "Other")
            .style("data", vec![9.0])
            .style("fill", true);

        assert!(!dataset.style.contains_key("label"));
        assert!(!dataset.style.contains_key("data"));
        assert_eq!(dataset.style.get_bool("fill"), Some(true));

        let json = serde_json::to_string(&dataset).unwrap();
        assert_eq!(json.matches("\"label\"").count(), 1);
        assert_eq!(json.matches("\"data\"").count(), 1);
        assert_eq!(
            serde_json::to_value(&dataset).unwrap(),
            json!({"label": "Sales", "data": [1.0], "fill": true})
        );
    }

    #[test]
    fn test_tooltip_without_format() {
        let data = ChartData::new(vec!["Jan".to_string()], vec![Dataset::unlabelled(vec![3.0])]);
        let spec = ChartSpec::new(ChartKind::Bar, data, SettingsTree::new());
        assert_eq!(spec.tooltip_label(0, 0, &CurrencyFormat::default()).unwrap(), "Jan: 3");
    }
}

//! Dashboard chart presets.
//!
//! Each preset builds its data and an override tree, then resolves options
//! through [`ChartDefaults`] so configured defaults still apply underneath.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use salesdash_settings::{SettingValue, SettingsTree};

use super::{ChartData, ChartDefaults, ChartKind, ChartSpec, Dataset};
use crate::format::LabelFormat;
use crate::palette::{darken_color, hex_to_rgba, palette_color, ColorError, CHART_COLORS};

/// Errors from building a preset chart.
#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    #[error("colour error: {0}")]
    Color(#[from] ColorError),

    #[error("{what} has {actual} values but there are {expected} labels")]
    LengthMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid preset input: {0}")]
    Input(#[from] serde_json::Error),

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
}

/// A named series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub data: Vec<f64>,
}

/// A labelled slice of a segmentation chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub label: String,
    pub value: f64,
}

fn node() -> SettingsTree {
    SettingsTree::new()
}

fn currency_axis() -> SettingsTree {
    node()
        .with("beginAtZero", true)
        .with("ticks", node().with("format", LabelFormat::Currency.as_str()))
}

fn series_tooltip() -> SettingsTree {
    node().with("format", LabelFormat::SeriesCurrency.as_str())
}

fn check_len(what: &str, expected: usize, actual: usize) -> Result<(), PresetError> {
    if expected != actual {
        return Err(PresetError::LengthMismatch {
            what: what.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

/// Line chart of one or more sales series, currency axis.
pub fn sales_trend(
    defaults: &ChartDefaults,
    labels: Vec<String>,
    series: Vec<Series>,
) -> Result<ChartSpec, PresetError> {
    let mut datasets = Vec::with_capacity(series.len());
    for (index, s) in series.into_iter().enumerate() {
        check_len(&format!("series '{}'", s.label), labels.len(), s.data.len())?;
        let color = palette_color(index);
        datasets.push(
            Dataset::new(s.label, s.data)
                .style("borderColor", color)
                .style("backgroundColor", hex_to_rgba(color, 0.1)?)
                .style("borderWidth", 2i64)
                .style("fill", true)
                .style("tension", 0.1),
        );
    }

    let overrides = node()
        .with("scales", node().with("y", currency_axis()))
        .with("plugins", node().with("tooltip", series_tooltip()));

    let options = defaults.resolve(ChartKind::Line, &overrides);
    Ok(ChartSpec::new(ChartKind::Line, ChartData::new(labels, datasets), options))
}

/// Horizontal bar chart of the best-selling products.
///
/// Products without a matching sales figure count as zero. Only the top
/// `defaults.top_n` products are kept, highest first.
pub fn product_performance(
    defaults: &ChartDefaults,
    products: Vec<String>,
    sales: &[f64],
) -> Result<ChartSpec, PresetError> {
    let mut ranked: Vec<(String, f64)> = products
        .into_iter()
        .enumerate()
        .map(|(i, product)| (product, sales.get(i).copied().unwrap_or(0.0)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(defaults.top_n);

    let background: Vec<SettingValue> =
        (0..ranked.len()).map(|i| SettingValue::from(palette_color(i))).collect();
    let border = (0..ranked.len())
        .map(|i| darken_color(palette_color(i), defaults.darken_percent).map(SettingValue::from))
        .collect::<Result<Vec<_>, _>>()?;

    let (labels, values): (Vec<String>, Vec<f64>) = ranked.into_iter().unzip();
    let dataset = Dataset::new("Sales Revenue", values)
        .style("backgroundColor", background)
        .style("borderColor", border)
        .style("borderWidth", 1i64);

    let overrides = node()
        .with("indexAxis", "y")
        .with("scales", node().with("x", currency_axis()))
        .with(
            "plugins",
            node()
                .with("legend", node().with("display", false))
                .with("tooltip", series_tooltip().with("label", "Sales")),
        );

    let options = defaults.resolve(ChartKind::Bar, &overrides);
    Ok(ChartSpec::new(ChartKind::Bar, ChartData::new(labels, vec![dataset]), options))
}

/// Doughnut chart of customer segments.
pub fn customer_segmentation(
    defaults: &ChartDefaults,
    segments: Vec<Segment>,
) -> Result<ChartSpec, PresetError> {
    let mut background = Vec::with_capacity(segments.len());
    let mut border = Vec::with_capacity(segments.len());
    for index in 0..segments.len() {
        let color = palette_color(index);
        background.push(SettingValue::from(color));
        border.push(SettingValue::from(darken_color(color, defaults.darken_percent)?));
    }

    let (labels, values): (Vec<String>, Vec<f64>) =
        segments.into_iter().map(|s| (s.label, s.value)).unzip();
    let dataset = Dataset::unlabelled(values)
        .style("backgroundColor", background)
        .style("borderColor", border)
        .style("borderWidth", 2i64);

    let overrides = node().with(
        "plugins",
        node().with("tooltip", node().with("format", LabelFormat::Customers.as_str())),
    );

    let options = defaults.resolve(ChartKind::Doughnut, &overrides);
    Ok(ChartSpec::new(ChartKind::Doughnut, ChartData::new(labels, vec![dataset]), options))
}

/// Bar chart comparing this month with the previous one.
pub fn monthly_comparison(
    defaults: &ChartDefaults,
    current: Vec<f64>,
    previous: Vec<f64>,
    labels: Vec<String>,
) -> Result<ChartSpec, PresetError> {
    check_len("current month", labels.len(), current.len())?;
    check_len("previous month", labels.len(), previous.len())?;

    let bars = |label: &str, data: Vec<f64>, color: &str| -> Result<Dataset, PresetError> {
        Ok(Dataset::new(label, data)
            .style("backgroundColor", hex_to_rgba(color, 0.7)?)
            .style("borderColor", color)
            .style("borderWidth", 2i64))
    };
    let datasets = vec![
        bars("Current Month", current, CHART_COLORS.primary)?,
        bars("Previous Month", previous, CHART_COLORS.secondary)?,
    ];

    let overrides = node()
        .with("scales", node().with("y", currency_axis()))
        .with("plugins", node().with("tooltip", series_tooltip()));

    let options = defaults.resolve(ChartKind::Bar, &overrides);
    Ok(ChartSpec::new(ChartKind::Bar, ChartData::new(labels, datasets), options))
}

/// The dashboard's monthly sales line chart.
pub fn dashboard_sales(
    defaults: &ChartDefaults,
    months: Vec<String>,
    totals: Vec<f64>,
) -> Result<ChartSpec, PresetError> {
    check_len("sales totals", months.len(), totals.len())?;

    let primary = CHART_COLORS.primary;
    let solid = hex_to_rgba(primary, 1.0)?;
    let dataset = Dataset::new(format!("Monthly Sales ({})", defaults.currency.symbol), totals)
        .style("backgroundColor", hex_to_rgba(primary, 0.05)?)
        .style("borderColor", solid.clone())
        .style("borderWidth", 2i64)
        .style("pointBackgroundColor", solid)
        .style("pointBorderColor", "#fff")
        .style("pointBorderWidth", 2i64)
        .style("pointRadius", 4i64)
        .style("tension", 0.1)
        .style("fill", true);

    let overrides = node()
        .with(
            "plugins",
            node()
                .with("legend", node().with("display", true).with("position", "top"))
                .with(
                    "tooltip",
                    node()
                        .with("format", LabelFormat::SeriesCurrencyFixed.as_str())
                        .with("label", "Sales")
                        .with("mode", "index")
                        .with("intersect", false),
                ),
        )
        .with(
            "scales",
            node()
                .with("y", currency_axis().with("grid", node().with("drawBorder", false)))
                .with("x", node().with("grid", node().with("display", false))),
        )
        .with("interaction", node().with("intersect", false).with("mode", "nearest"));

    let options = defaults.resolve(ChartKind::Line, &overrides);
    Ok(ChartSpec::new(ChartKind::Line, ChartData::new(months, vec![dataset]), options))
}

/// Preset selectable by name, with JSON input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    SalesTrend,
    ProductPerformance,
    CustomerSegmentation,
    MonthlyComparison,
    DashboardSales,
}

#[derive(Deserialize)]
struct SalesTrendInput {
    labels: Vec<String>,
    series: Vec<Series>,
}

#[derive(Deserialize)]
struct ProductPerformanceInput {
    products: Vec<String>,
    #[serde(default)]
    sales: Vec<f64>,
}

#[derive(Deserialize)]
struct CustomerSegmentationInput {
    segments: Vec<Segment>,
}

#[derive(Deserialize)]
struct MonthlyComparisonInput {
    labels: Vec<String>,
    current: Vec<f64>,
    previous: Vec<f64>,
}

/// Same field names as the `/api/sales-data` response.
#[derive(Deserialize)]
struct DashboardSalesInput {
    months: Vec<String>,
    totals: Vec<f64>,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::SalesTrend,
        Preset::ProductPerformance,
        Preset::CustomerSegmentation,
        Preset::MonthlyComparison,
        Preset::DashboardSales,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::SalesTrend => "sales-trend",
            Preset::ProductPerformance => "product-performance",
            Preset::CustomerSegmentation => "customer-segmentation",
            Preset::MonthlyComparison => "monthly-comparison",
            Preset::DashboardSales => "dashboard-sales",
        }
    }

    /// Build the preset from its JSON input document.
    pub fn build(&self, defaults: &ChartDefaults, input: serde_json::Value) -> Result<ChartSpec, PresetError> {
        tracing::debug!(preset = self.as_str(), "building preset chart");
        match self {
            Preset::SalesTrend => {
                let input: SalesTrendInput = serde_json::from_value(input)?;
                sales_trend(defaults, input.labels, input.series)
            }
            Preset::ProductPerformance => {
                let input: ProductPerformanceInput = serde_json::from_value(input)?;
                product_performance(defaults, input.products, &input.sales)
            }
            Preset::CustomerSegmentation => {
                let input: CustomerSegmentationInput = serde_json::from_value(input)?;
                customer_segmentation(defaults, input.segments)
            }
            Preset::MonthlyComparison => {
                let input: MonthlyComparisonInput = serde_json::from_value(input)?;
                monthly_comparison(defaults, input.current, input.previous, input.labels)
            }
            Preset::DashboardSales => {
                let input: DashboardSalesInput = serde_json::from_value(input)?;
                dashboard_sales(defaults, input.months, input.totals)
            }
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = PresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| PresetError::UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sales_trend_styles_each_series() {
        let defaults = ChartDefaults::builtin();
        let spec = sales_trend(
            &defaults,
            labels(&["Jan", "Feb"]),
            vec![
                Series { label: "2024".to_string(), data: vec![100.0, 200.0] },
                Series { label: "2023".to_string(), data: vec![90.0, 150.0] },
            ],
        )
        .unwrap();

        assert_eq!(spec.kind, ChartKind::Line);
        let second = &spec.data.datasets[1];
        assert_eq!(second.style.get_str("borderColor"), Some("#1cc88a"));
        assert_eq!(second.style.get_str("backgroundColor"), Some("rgba(28, 200, 138, 0.1)"));
        assert_eq!(spec.options.get_str("scales.y.ticks.format"), Some("currency"));
        // Line defaults survive underneath the preset overrides
        assert_eq!(spec.options.get_f64("elements.line.tension"), Some(0.1));
        assert_eq!(spec.options.get_bool("responsive"), Some(true));
    }

    #[test]
    fn test_sales_trend_rejects_short_series() {
        let err = sales_trend(
            &ChartDefaults::builtin(),
            labels(&["Jan", "Feb"]),
            vec![Series { label: "x".to_string(), data: vec![1.0] }],
        )
        .unwrap_err();
        assert!(matches!(err, PresetError::LengthMismatch { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn test_product_performance_ranks_and_truncates() {
        let mut defaults = ChartDefaults::builtin();
        defaults.top_n = 3;
        let products = labels(&["Laptop", "Mouse", "Keyboard", "Monitor", "Webcam"]);
        let spec = product_performance(&defaults, products, &[500.0, 50.0, 300.0, 900.0]).unwrap();

        assert_eq!(spec.data.labels, labels(&["Monitor", "Laptop", "Keyboard"]));
        assert_eq!(spec.data.datasets[0].data, vec![900.0, 500.0, 300.0]);
        assert_eq!(spec.options.get_str("indexAxis"), Some("y"));
        assert_eq!(spec.options.get_bool("plugins.legend.display"), Some(false));
        assert_eq!(spec.options.get_str("plugins.legend.position"), Some("top"));
        let borders = spec.data.datasets[0].style.get("borderColor").unwrap().as_sequence().unwrap();
        assert_eq!(borders.len(), 3);
        assert_eq!(borders[0].as_str(), Some("#3e5cb2"));
    }

    #[test]
    fn test_product_missing_sales_count_as_zero() {
        let spec = product_performance(&ChartDefaults::builtin(), labels(&["A", "B"]), &[]).unwrap();
        assert_eq!(spec.data.datasets[0].data, vec![0.0, 0.0]);
    }

    #[test]
    fn test_customer_segmentation_tooltip() {
        let spec = customer_segmentation(
            &ChartDefaults::builtin(),
            vec![
                Segment { label: "New Customers".to_string(), value: 45.0 },
                Segment { label: "VIP Customers".to_string(), value: 5.0 },
            ],
        )
        .unwrap();
        assert_eq!(spec.kind, ChartKind::Doughnut);
        assert_eq!(spec.options.get_str("plugins.legend.position"), Some("right"));
        let text = spec.tooltip_label(0, 0, &ChartDefaults::builtin().currency).unwrap();
        assert_eq!(text, "New Customers: 45 customers (90.0%)");
    }

    #[test]
    fn test_monthly_comparison_colours() {
        let spec = monthly_comparison(
            &ChartDefaults::builtin(),
            vec![10.0, 20.0],
            vec![5.0, 15.0],
            labels(&["Week 1", "Week 2"]),
        )
        .unwrap();
        assert_eq!(spec.data.datasets.len(), 2);
        assert_eq!(
            spec.data.datasets[1].style.get_str("backgroundColor"),
            Some("rgba(133, 135, 150, 0.7)")
        );
    }

    #[test]
    fn test_dashboard_sales_from_api_shape() {
        let input = json!({"months": ["Jan", "Feb", "Mar"], "totals": [1200.5, 3400.0, 2100.0]});
        let spec = Preset::DashboardSales.build(&ChartDefaults::builtin(), input).unwrap();
        assert_eq!(spec.data.datasets[0].label.as_deref(), Some("Monthly Sales (MWK)"));
        assert_eq!(spec.options.get_str("interaction.mode"), Some("nearest"));
        assert_eq!(spec.options.get_bool("scales.x.grid.display"), Some(false));
        assert_eq!(spec.options.get_bool("scales.y.beginAtZero"), Some(true));
        let currency = ChartDefaults::builtin().currency;
        assert_eq!(spec.tooltip_label(0, 1, &currency).unwrap(), "Sales: MWK 3,400.00");
        assert_eq!(spec.tooltip_label(0, 0, &currency).unwrap(), "Sales: MWK 1,200.50");
        assert_eq!(
            spec.options.get_str("plugins.tooltip.format"),
            Some("series_currency_fixed")
        );
    }

    #[test]
    fn test_preset_names() {
        for preset in Preset::ALL {
            assert_eq!(preset.as_str().parse::<Preset>().unwrap(), preset);
        }
        assert!(matches!("radar".parse::<Preset>(), Err(PresetError::UnknownPreset(_))));
    }

    #[test]
    fn test_preset_bad_input() {
        let err = Preset::SalesTrend
            .build(&ChartDefaults::builtin(), json!({"labels": "nope"}))
            .unwrap_err();
        assert!(matches!(err, PresetError::Input(_)));
    }
}

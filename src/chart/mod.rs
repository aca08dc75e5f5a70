//! Chart configuration: kinds, default options, presets and the registry
//! of live charts.

mod kind;
mod options;
mod presets;
mod registry;
mod spec;

pub use kind::{ChartKind, UnknownChartKind};
pub use options::{default_options, ChartDefaults};
pub use presets::{
    customer_segmentation, dashboard_sales, monthly_comparison, product_performance, sales_trend,
    Preset, PresetError, Segment, Series,
};
pub use registry::{ChartRegistry, RegistryError};
pub use spec::{ChartData, ChartSpec, Dataset};

//! Demo data for dashboards without a backend.

use rand::Rng;

use crate::chart::{
    customer_segmentation, product_performance, sales_trend, ChartDefaults, ChartRegistry,
    PresetError, Segment, Series,
};

/// `count` whole numbers drawn uniformly from `min..=max`.
///
/// Bounds given in the wrong order are swapped.
pub fn generate_demo_data<R: Rng>(rng: &mut R, count: usize, min: u32, max: u32) -> Vec<f64> {
    let (low, high) = if min <= max { (min, max) } else { (max, min) };
    (0..count).map(|_| f64::from(rng.gen_range(low..=high))).collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Registry holding the three demo charts.
pub fn demo_charts<R: Rng>(
    defaults: &ChartDefaults,
    rng: &mut R,
) -> Result<ChartRegistry, PresetError> {
    let mut registry = ChartRegistry::new();

    let months = strings(&["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul"]);
    let sales = generate_demo_data(rng, months.len(), 5_000, 20_000);
    registry.render(
        "demoSalesChart",
        sales_trend(
            defaults,
            months,
            vec![Series {
                label: "Monthly Sales".to_string(),
                data: sales,
            }],
        )?,
    );

    let products = strings(&["Laptop", "Mouse", "Keyboard", "Monitor", "Headphones", "Webcam", "Tablet"]);
    let product_sales = generate_demo_data(rng, products.len(), 1_000, 10_000);
    registry.render(
        "demoProductChart",
        product_performance(defaults, products, &product_sales)?,
    );

    let segments = [
        ("New Customers", 45.0),
        ("Regular Customers", 120.0),
        ("VIP Customers", 25.0),
        ("Inactive Customers", 60.0),
    ]
    .into_iter()
    .map(|(label, value)| Segment {
        label: label.to_string(),
        value,
    })
    .collect();
    registry.render("demoCustomerChart", customer_segmentation(defaults, segments)?);

    tracing::debug!(charts = registry.len(), "built demo charts");
    Ok(registry)
}

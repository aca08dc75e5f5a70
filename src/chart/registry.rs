//! Live chart registry.
//!
//! Charts are keyed by the id of the canvas they are drawn on. Rendering
//! onto an id that already holds a chart destroys the old one first.

use std::collections::BTreeMap;

use super::ChartSpec;

/// Errors from registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("chart '{0}' not found")]
    NotFound(String),
}

/// Owned set of live charts.
#[derive(Debug, Clone, Default)]
pub struct ChartRegistry {
    charts: BTreeMap<String, ChartSpec>,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `spec` under `id`, returning the chart it replaced.
    pub fn render(&mut self, id: impl Into<String>, spec: ChartSpec) -> Option<ChartSpec> {
        let id = id.into();
        let previous = self.charts.insert(id.clone(), spec);
        if previous.is_some() {
            tracing::debug!(chart = %id, "replaced existing chart");
        } else {
            tracing::debug!(chart = %id, "created chart");
        }
        previous
    }

    /// Replace dataset values and optionally the category labels.
    ///
    /// `new_data[i]` replaces dataset `i` when it is `Some`; datasets
    /// without a corresponding entry keep their values.
    pub fn update_data(
        &mut self,
        id: &str,
        new_data: Vec<Option<Vec<f64>>>,
        new_labels: Option<Vec<String>>,
    ) -> Result<&ChartSpec, RegistryError> {
        let Some(chart) = self.charts.get_mut(id) else {
            tracing::warn!(chart = %id, "update for unknown chart");
            return Err(RegistryError::NotFound(id.to_string()));
        };

        for (dataset, data) in chart.data.datasets.iter_mut().zip(new_data) {
            if let Some(data) = data {
                dataset.data = data;
            }
        }
        if let Some(labels) = new_labels {
            chart.data.labels = labels;
        }
        tracing::debug!(chart = %id, "updated chart data");
        Ok(chart)
    }

    /// Remove a chart. Returns whether one was registered.
    pub fn destroy(&mut self, id: &str) -> bool {
        let removed = self.charts.remove(id).is_some();
        if removed {
            tracing::debug!(chart = %id, "destroyed chart");
        }
        removed
    }

    pub fn get(&self, id: &str) -> Option<&ChartSpec> {
        self.charts.get(id)
    }

    /// Chart lookup that reports a missing id as an error.
    pub fn require(&self, id: &str) -> Result<&ChartSpec, RegistryError> {
        self.get(id).ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.charts.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChartSpec)> {
        self.charts.iter().map(|(id, spec)| (id.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartData, ChartKind, Dataset};
    use salesdash_settings::SettingsTree;

    fn chart(values: Vec<Vec<f64>>) -> ChartSpec {
        let datasets = values
            .into_iter()
            .enumerate()
            .map(|(i, data)| Dataset::new(format!("s{}", i), data))
            .collect();
        ChartSpec::new(
            ChartKind::Bar,
            ChartData::new(vec!["a".to_string(), "b".to_string()], datasets),
            SettingsTree::new(),
        )
    }

    #[test]
    fn test_render_and_replace() {
        let mut registry = ChartRegistry::new();
        assert!(registry.render("salesChart", chart(vec![vec![1.0, 2.0]])).is_none());
        let previous = registry.render("salesChart", chart(vec![vec![3.0, 4.0]]));
        assert_eq!(previous.unwrap().data.datasets[0].data, vec![1.0, 2.0]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_update_data_partial() {
        let mut registry = ChartRegistry::new();
        registry.render("c", chart(vec![vec![1.0, 2.0], vec![3.0, 4.0]]));

        let updated = registry
            .update_data("c", vec![None, Some(vec![9.0, 9.0])], Some(vec!["x".to_string(), "y".to_string()]))
            .unwrap();

        assert_eq!(updated.data.datasets[0].data, vec![1.0, 2.0]);
        assert_eq!(updated.data.datasets[1].data, vec![9.0, 9.0]);
        assert_eq!(updated.data.labels, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_update_extra_entries_ignored() {
        let mut registry = ChartRegistry::new();
        registry.render("c", chart(vec![vec![1.0]]));
        let updated = registry
            .update_data("c", vec![Some(vec![2.0]), Some(vec![7.0])], None)
            .unwrap();
        assert_eq!(updated.data.datasets.len(), 1);
        assert_eq!(updated.data.datasets[0].data, vec![2.0]);
    }

    #[test]
    fn test_update_unknown_chart() {
        let mut registry = ChartRegistry::new();
        assert_eq!(
            registry.update_data("missing", vec![], None).unwrap_err(),
            RegistryError::NotFound("missing".to_string())
        );
    }

    #[test]
    fn test_destroy() {
        let mut registry = ChartRegistry::new();
        registry.render("c", chart(vec![vec![1.0]]));
        assert!(registry.destroy("c"));
        assert!(!registry.destroy("c"));
        assert!(registry.is_empty());
        assert!(registry.require("c").is_err());
    }
}

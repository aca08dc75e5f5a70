//! Dot-separated path access into settings trees.
//!
//! Paths look like `plugins.legend.position`. Assignments of the form
//! `path=value` are how command-line overrides are expressed.

use crate::value::{SettingValue, SettingsTree};

/// Errors from parsing paths and assignments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("empty settings path")]
    EmptyPath,

    #[error("empty segment in settings path '{0}'")]
    EmptySegment(String),

    #[error("expected 'path=value', got '{0}'")]
    MissingEquals(String),
}

fn segments(path: &str) -> Result<Vec<&str>, PathError> {
    if path.trim().is_empty() {
        return Err(PathError::EmptyPath);
    }
    let parts: Vec<&str> = path.split('.').map(str::trim).collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(PathError::EmptySegment(path.to_string()));
    }
    Ok(parts)
}

impl SettingsTree {
    /// Look up a value by dot-separated path.
    pub fn get_path(&self, path: &str) -> Option<&SettingValue> {
        let mut parts = path.split('.');
        let mut current = self.get(parts.next()?)?;
        for part in parts {
            current = current.as_tree()?.get(part)?;
        }
        Some(current)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get_path(path).and_then(SettingValue::as_str)
    }

    pub fn get_f64(&self, path: &str) -> Option<f64> {
        self.get_path(path).and_then(SettingValue::as_f64)
    }

    pub fn get_u64(&self, path: &str) -> Option<u64> {
        self.get_path(path).and_then(SettingValue::as_u64)
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get_path(path).and_then(SettingValue::as_bool)
    }

    /// Set a value by dot-separated path.
    ///
    /// Missing intermediate trees are created. A non-tree intermediate is
    /// replaced by a tree, matching how a tree override replaces a primitive.
    pub fn set_path(&mut self, path: &str, value: impl Into<SettingValue>) -> Result<(), PathError> {
        let parts = segments(path)?;
        let (last, parents) = parts.split_last().ok_or(PathError::EmptyPath)?;

        let mut current = self;
        for part in parents {
            current = current.subtree_mut(part);
        }
        current.insert(*last, value);
        Ok(())
    }

    /// Build a tree from `(path, value)` pairs, later pairs winning.
    pub fn from_dotted<P, V, I>(pairs: I) -> Result<Self, PathError>
    where
        P: AsRef<str>,
        V: Into<SettingValue>,
        I: IntoIterator<Item = (P, V)>,
    {
        let mut tree = SettingsTree::new();
        for (path, value) in pairs {
            tree.set_path(path.as_ref(), value)?;
        }
        Ok(tree)
    }
}

/// Parse a `path=value` assignment.
pub fn parse_assignment(input: &str) -> Result<(String, SettingValue), PathError> {
    let (path, raw) = input
        .split_once('=')
        .ok_or_else(|| PathError::MissingEquals(input.to_string()))?;
    let path = segments(path)?.join(".");
    Ok((path, parse_scalar(raw)))
}

/// Interpret a command-line value.
///
/// Booleans, `null`, integers, floats and JSON arrays/objects are recognised;
/// anything else is taken as a string.
pub fn parse_scalar(raw: &str) -> SettingValue {
    let trimmed = raw.trim();
    match trimmed {
        "true" => return SettingValue::from(true),
        "false" => return SettingValue::from(false),
        "null" => return SettingValue::NULL,
        _ => {}
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return SettingValue::from(n);
    }
    if let Ok(n) = trimmed.parse::<f64>() {
        if n.is_finite() {
            return SettingValue::from(n);
        }
    }
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
            return SettingValue::from(value);
        }
    }
    SettingValue::from(raw.to_string())
}

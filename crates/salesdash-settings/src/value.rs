//! Settings tree value types.
//!
//! A settings value is exactly one of three shapes: a primitive leaf, an
//! ordered sequence, or a nested tree. The merge rules dispatch on these
//! variants, so anything that is not a sequence or a tree is a primitive.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// Leaf value in a settings tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

/// A single value in a settings tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum SettingValue {
    Primitive(Primitive),
    /// Sequences are opaque to the merge: an override replaces them whole.
    Sequence(Vec<SettingValue>),
    Tree(SettingsTree),
}

/// Nested string-keyed settings.
///
/// Keys are kept ordered so serialized output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsTree(BTreeMap<String, SettingValue>);

/// Returned when a JSON value is not an object and so cannot be a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected a settings tree (JSON object), got {0}")]
pub struct NotATree(pub &'static str);

impl SettingValue {
    /// Null primitive.
    pub const NULL: SettingValue = SettingValue::Primitive(Primitive::Null);

    pub fn is_tree(&self) -> bool {
        matches!(self, SettingValue::Tree(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, SettingValue::Sequence(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SettingValue::Primitive(Primitive::Null))
    }

    pub fn as_tree(&self) -> Option<&SettingsTree> {
        match self {
            SettingValue::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn as_tree_mut(&mut self) -> Option<&mut SettingsTree> {
        match self {
            SettingValue::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[SettingValue]> {
        match self {
            SettingValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Primitive(Primitive::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Primitive(Primitive::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SettingValue::Primitive(Primitive::Number(n)) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            SettingValue::Primitive(Primitive::Number(n)) => n.as_u64(),
            _ => None,
        }
    }

    /// Short name of the variant shape, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SettingValue::Primitive(Primitive::Null) => "null",
            SettingValue::Primitive(Primitive::Bool(_)) => "boolean",
            SettingValue::Primitive(Primitive::Number(_)) => "number",
            SettingValue::Primitive(Primitive::String(_)) => "string",
            SettingValue::Sequence(_) => "sequence",
            SettingValue::Tree(_) => "tree",
        }
    }

    /// Convert into a `serde_json::Value`.
    pub fn to_json(&self) -> Value {
        Value::from(self.clone())
    }
}

impl SettingsTree {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut SettingValue> {
        self.0.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SettingValue>) -> Option<SettingValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<SettingValue> {
        self.0.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, SettingValue> {
        self.0.iter()
    }

    /// Child tree at `key`, created or replacing a non-tree value.
    pub(crate) fn subtree_mut(&mut self, key: &str) -> &mut SettingsTree {
        let slot = self
            .0
            .entry(key.to_string())
            .or_insert_with(|| SettingValue::Tree(SettingsTree::new()));
        if !slot.is_tree() {
            *slot = SettingValue::Tree(SettingsTree::new());
        }
        match slot {
            SettingValue::Tree(tree) => tree,
            _ => unreachable!("slot holds a tree"),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Convert into a `serde_json::Value` object.
    pub fn to_json(&self) -> Value {
        Value::from(self.clone())
    }

    /// Render as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl IntoIterator for SettingsTree {
    type Item = (String, SettingValue);
    type IntoIter = btree_map::IntoIter<String, SettingValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a SettingsTree {
    type Item = (&'a String, &'a SettingValue);
    type IntoIter = btree_map::Iter<'a, String, SettingValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<SettingValue>> FromIterator<(K, V)> for SettingsTree {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Display for SettingsTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

// JSON conversions

impl From<Value> for SettingValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => SettingValue::NULL,
            Value::Bool(b) => SettingValue::Primitive(Primitive::Bool(b)),
            Value::Number(n) => SettingValue::Primitive(Primitive::Number(n)),
            Value::String(s) => SettingValue::Primitive(Primitive::String(s)),
            Value::Array(items) => {
                SettingValue::Sequence(items.into_iter().map(SettingValue::from).collect())
            }
            Value::Object(map) => SettingValue::Tree(SettingsTree::from(map)),
        }
    }
}

impl From<SettingValue> for Value {
    fn from(value: SettingValue) -> Self {
        match value {
            SettingValue::Primitive(Primitive::Null) => Value::Null,
            SettingValue::Primitive(Primitive::Bool(b)) => Value::Bool(b),
            SettingValue::Primitive(Primitive::Number(n)) => Value::Number(n),
            SettingValue::Primitive(Primitive::String(s)) => Value::String(s),
            SettingValue::Sequence(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            SettingValue::Tree(tree) => Value::from(tree),
        }
    }
}

impl From<Map<String, Value>> for SettingsTree {
    fn from(map: Map<String, Value>) -> Self {
        Self(map.into_iter().map(|(k, v)| (k, SettingValue::from(v))).collect())
    }
}

impl From<SettingsTree> for Value {
    fn from(tree: SettingsTree) -> Self {
        let map: Map<String, Value> = tree.0.into_iter().map(|(k, v)| (k, Value::from(v))).collect();
        Value::Object(map)
    }
}

impl TryFrom<Value> for SettingsTree {
    type Error = NotATree;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(SettingsTree::from(map)),
            other => Err(NotATree(json_kind(&other))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// Scalar conversions

impl From<SettingsTree> for SettingValue {
    fn from(tree: SettingsTree) -> Self {
        SettingValue::Tree(tree)
    }
}

impl From<Primitive> for SettingValue {
    fn from(p: Primitive) -> Self {
        SettingValue::Primitive(p)
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        SettingValue::Primitive(Primitive::Bool(b))
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        SettingValue::Primitive(Primitive::String(s.to_string()))
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        SettingValue::Primitive(Primitive::String(s))
    }
}

impl From<i64> for SettingValue {
    fn from(n: i64) -> Self {
        SettingValue::Primitive(Primitive::Number(n.into()))
    }
}

impl From<u64> for SettingValue {
    fn from(n: u64) -> Self {
        SettingValue::Primitive(Primitive::Number(n.into()))
    }
}

impl From<i32> for SettingValue {
    fn from(n: i32) -> Self {
        SettingValue::Primitive(Primitive::Number(n.into()))
    }
}

/// Non-finite floats have no JSON form and become null.
impl From<f64> for SettingValue {
    fn from(n: f64) -> Self {
        Number::from_f64(n)
            .map(|n| SettingValue::Primitive(Primitive::Number(n)))
            .unwrap_or(SettingValue::NULL)
    }
}

impl<T: Into<SettingValue>> From<Vec<T>> for SettingValue {
    fn from(items: Vec<T>) -> Self {
        SettingValue::Sequence(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_object_becomes_tree() {
        let value = SettingValue::from(json!({"a": {"b": 1}, "c": [1, 2], "d": null}));
        let tree = value.as_tree().unwrap();
        assert!(tree.get("a").unwrap().is_tree());
        assert!(tree.get("c").unwrap().is_sequence());
        assert!(tree.get("d").unwrap().is_null());
    }

    #[test]
    fn test_array_of_objects_is_sequence() {
        let value = SettingValue::from(json!([{"x": 1}, {"x": 2}]));
        assert_eq!(value.kind_name(), "sequence");
        assert_eq!(value.as_sequence().unwrap().len(), 2);
    }

    #[test]
    fn test_tree_try_from_rejects_non_object() {
        let err = SettingsTree::try_from(json!([1, 2])).unwrap_err();
        assert_eq!(err, NotATree("array"));
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn test_serde_matches_plain_json() {
        let source = json!({"plugins": {"legend": {"position": "top"}}, "responsive": true});
        let tree: SettingsTree = serde_json::from_value(source.clone()).unwrap();
        assert_eq!(serde_json::to_value(&tree).unwrap(), source);
    }

    #[test]
    fn test_non_finite_float_is_null() {
        assert!(SettingValue::from(f64::NAN).is_null());
        assert_eq!(SettingValue::from(0.5).as_f64(), Some(0.5));
    }

    #[test]
    fn test_keys_are_ordered() {
        let tree: SettingsTree = [("b", 1i64), ("a", 2i64), ("c", 3i64)].into_iter().collect();
        let keys: Vec<&str> = tree.keys().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }
}

//! Recursive override merge for settings trees.
//!
//! Merge semantics:
//! - Trees: merged key by key (recursive) when both sides are trees
//! - Sequences: REPLACE (override wins entirely, never concatenated)
//! - Primitives: override wins
//! - Shape mismatch: override replaces the default wholesale

use crate::value::{SettingValue, SettingsTree};

/// Merge an override tree onto a default tree, producing a new tree.
///
/// Neither input is modified. Keys present only in `default_tree` are copied
/// over, keys present only in `override_tree` are taken as-is, and keys in
/// both are resolved with [`merge_value`]. The result owns all of its nodes,
/// so mutating it never reaches back into either input.
pub fn merge(default_tree: &SettingsTree, override_tree: &SettingsTree) -> SettingsTree {
    merge_owned(default_tree.clone(), override_tree)
}

/// Resolve a single key present on both sides.
///
/// Recurses only when both values are trees; every other combination is
/// override-wins.
pub fn merge_value(default_value: &SettingValue, override_value: &SettingValue) -> SettingValue {
    match (default_value, override_value) {
        (SettingValue::Tree(base), SettingValue::Tree(overlay)) => {
            SettingValue::Tree(merge(base, overlay))
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Merge several layers in order (first is base, last has highest precedence).
///
/// An empty list yields an empty tree.
pub fn merge_layers<'a, I>(layers: I) -> SettingsTree
where
    I: IntoIterator<Item = &'a SettingsTree>,
{
    layers
        .into_iter()
        .fold(SettingsTree::new(), |acc, layer| merge_owned(acc, layer))
}

/// Merge that consumes the base so nested trees are not cloned twice.
fn merge_owned(mut base: SettingsTree, overlay: &SettingsTree) -> SettingsTree {
    for (key, overlay_value) in overlay {
        let merged = match (base.remove(key), overlay_value) {
            (Some(SettingValue::Tree(base_tree)), SettingValue::Tree(overlay_tree)) => {
                SettingValue::Tree(merge_owned(base_tree, overlay_tree))
            }
            (_, overlay_value) => overlay_value.clone(),
        };
        base.insert(key.clone(), merged);
    }
    base
}

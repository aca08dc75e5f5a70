//! Merge property tests
//!
//! Exercises the override merge through the public API only: identity,
//! override dominance, recursion, shape mismatch, key union, sequence
//! replacement and non-aliasing of the result.

use salesdash_settings::{merge, merge_layers, SettingValue, SettingsTree};
use serde_json::json;

fn tree(value: serde_json::Value) -> SettingsTree {
    SettingsTree::try_from(value).unwrap()
}

fn sample_options() -> SettingsTree {
    tree(json!({
        "responsive": true,
        "maintainAspectRatio": false,
        "plugins": {"legend": {"position": "top"}},
        "scales": {"y": {"beginAtZero": true, "ticks": {"format": "number"}}},
        "labels": ["Jan", "Feb"],
        "title": null
    }))
}

// =============================================================================
// Identity and empty inputs
// =============================================================================

#[test]
fn test_merge_with_empty_override_is_identity() {
    let options = sample_options();
    assert_eq!(merge(&options, &SettingsTree::new()), options);
}

#[test]
fn test_merge_empty_default_takes_override() {
    let options = sample_options();
    assert_eq!(merge(&SettingsTree::new(), &options), options);
}

#[test]
fn test_merge_both_empty() {
    assert!(merge(&SettingsTree::new(), &SettingsTree::new()).is_empty());
}

// =============================================================================
// Per-key resolution
// =============================================================================

#[test]
fn test_override_dominance_for_primitives() {
    assert_eq!(merge(&tree(json!({"a": 1})), &tree(json!({"a": 2}))), tree(json!({"a": 2})));
    assert_eq!(
        merge(&tree(json!({"a": "top"})), &tree(json!({"a": false}))),
        tree(json!({"a": false}))
    );
}

#[test]
fn test_recursive_merge_on_nested_trees() {
    let result = merge(&tree(json!({"a": {"x": 1, "y": 2}})), &tree(json!({"a": {"y": 3}})));
    assert_eq!(result, tree(json!({"a": {"x": 1, "y": 3}})));
}

#[test]
fn test_deep_recursion_keeps_untouched_siblings() {
    let result = merge(
        &sample_options(),
        &tree(json!({"scales": {"y": {"ticks": {"format": "currency"}}}})),
    );
    assert_eq!(result.get_str("scales.y.ticks.format"), Some("currency"));
    assert_eq!(result.get_bool("scales.y.beginAtZero"), Some(true));
    assert_eq!(result.get_str("plugins.legend.position"), Some("top"));
}

#[test]
fn test_wholesale_replace_when_shapes_mismatch() {
    assert_eq!(
        merge(&tree(json!({"a": 1})), &tree(json!({"a": {"x": 1}}))),
        tree(json!({"a": {"x": 1}}))
    );
    assert_eq!(
        merge(&tree(json!({"a": {"x": 1}})), &tree(json!({"a": 1}))),
        tree(json!({"a": 1}))
    );
    assert_eq!(
        merge(&tree(json!({"a": [1, 2]})), &tree(json!({"a": {"x": 1}}))),
        tree(json!({"a": {"x": 1}}))
    );
}

#[test]
fn test_union_of_keys() {
    assert_eq!(
        merge(&tree(json!({"a": 1})), &tree(json!({"b": 2}))),
        tree(json!({"a": 1, "b": 2}))
    );
}

#[test]
fn test_sequence_replacement_not_concatenation() {
    assert_eq!(
        merge(&tree(json!({"a": [1, 2, 3]})), &tree(json!({"a": [4]}))),
        tree(json!({"a": [4]}))
    );
}

#[test]
fn test_unknown_keys_pass_through() {
    let result = merge(&sample_options(), &tree(json!({"indexAxis": "y"})));
    assert_eq!(result.get_str("indexAxis"), Some("y"));
    assert_eq!(result.len(), sample_options().len() + 1);
}

// =============================================================================
// Inputs are untouched and the result is not shared
// =============================================================================

#[test]
fn test_inputs_not_mutated() {
    let defaults = sample_options();
    let overrides = tree(json!({"plugins": {"legend": {"position": "right"}}}));
    let defaults_before = defaults.clone();
    let overrides_before = overrides.clone();

    let _ = merge(&defaults, &overrides);

    assert_eq!(defaults, defaults_before);
    assert_eq!(overrides, overrides_before);
}

#[test]
fn test_mutating_result_does_not_alias_inputs() {
    let defaults = tree(json!({"a": {"x": 1}, "only_default": {"k": "v"}}));
    let overrides = tree(json!({"a": {"y": 2}, "only_override": {"k": "v"}}));

    let mut result = merge(&defaults, &overrides);
    for key in ["a", "only_default", "only_override"] {
        result
            .get_mut(key)
            .and_then(SettingValue::as_tree_mut)
            .unwrap()
            .insert("mutated", true);
    }

    assert_eq!(defaults, tree(json!({"a": {"x": 1}, "only_default": {"k": "v"}})));
    assert_eq!(overrides, tree(json!({"a": {"y": 2}, "only_override": {"k": "v"}})));
}

#[test]
fn test_merge_is_deterministic() {
    let overrides = tree(json!({"scales": {"x": {"display": false}}, "labels": []}));
    let first = merge(&sample_options(), &overrides);
    let second = merge(&sample_options(), &overrides);
    assert_eq!(first, second);
    assert_eq!(first.to_json_pretty().unwrap(), second.to_json_pretty().unwrap());
}

#[test]
fn test_layers_fold_left_to_right() {
    let layers = vec![
        tree(json!({"legend": {"position": "top", "display": true}})),
        tree(json!({"legend": {"position": "right"}})),
        tree(json!({"legend": {"display": false}})),
    ];
    assert_eq!(
        merge_layers(&layers),
        tree(json!({"legend": {"position": "right", "display": false}}))
    );
}

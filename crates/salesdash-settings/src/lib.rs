//! Settings trees for chart configuration.
//!
//! A chart is drawn from an effective settings tree produced by laying a
//! caller's override tree over a per-chart default tree. This crate holds the
//! tree types and the merge; it knows nothing about what the keys mean.

mod merge;
mod path;
mod value;

pub use merge::{merge, merge_layers, merge_value};
pub use path::{parse_assignment, parse_scalar, PathError};
pub use value::{NotATree, Primitive, SettingValue, SettingsTree};

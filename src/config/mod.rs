//! Dashboard configuration
//!
//! Implements the 4-layer configuration merge:
//! 1. Built-in defaults
//! 2. Host/user config (~/.config/salesdash/config.toml)
//! 3. Project config (./salesdash.toml)
//! 4. CLI `--set path=value` flags
//!
//! Layers are combined with the settings tree merge, so tables merge key by
//! key while arrays and scalars from a later layer replace earlier ones.

mod defaults;
mod effective;

pub use defaults::BuiltinDefaults;
pub use effective::{
    default_host_path, load_settings_file, ConfigError, ConfigOrigin, ConfigSource,
    EffectiveConfig, PROJECT_CONFIG_FILE,
};

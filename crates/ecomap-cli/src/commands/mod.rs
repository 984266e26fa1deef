pub mod analyze;
pub mod convert;
pub mod presets;
pub mod zone;

use ecomap_core::config::builtin;
use ecomap_core::config::schema::AnalysisConfig;
use ecomap_core::error::EcomapError;
use std::path::Path;

/// Pick the config from `--config`, then `--preset`, then the default preset.
pub fn resolve_config(
    preset: Option<&str>,
    config_file: Option<&Path>,
) -> Result<AnalysisConfig, EcomapError> {
    match (config_file, preset) {
        (Some(path), _) => ecomap_core::config::load_config(path),
        (None, Some(name)) => builtin::load_preset(name),
        (None, None) => builtin::default_config(),
    }
}

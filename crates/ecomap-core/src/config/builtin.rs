use crate::config::schema::AnalysisConfig;
use crate::error::EcomapError;

const SINADER_JSON: &str = include_str!("../../../../presets/sinader-2021-2024.json");
const RETC_JSON: &str = include_str!("../../../../presets/retc-2019-2023.json");

/// Available predefined reporting series.
pub const PRESETS: &[&str] = &["sinader", "retc"];

/// Preset used when neither a preset nor a config file is given.
pub const DEFAULT_PRESET: &str = "sinader";

/// Load a predefined config by name.
pub fn load_preset(name: &str) -> Result<AnalysisConfig, EcomapError> {
    let json = match name {
        "sinader" => SINADER_JSON,
        "retc" => RETC_JSON,
        _ => {
            return Err(EcomapError::ConfigInvalid(format!(
                "unknown preset '{}'. Available: {}",
                name,
                PRESETS.join(", ")
            )))
        }
    };
    let config: AnalysisConfig = serde_json::from_str(json)?;
    Ok(config)
}

pub fn default_config() -> Result<AnalysisConfig, EcomapError> {
    load_preset(DEFAULT_PRESET)
}

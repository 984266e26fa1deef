pub mod builtin;
pub mod schema;

use crate::error::EcomapError;
use schema::AnalysisConfig;
use std::path::Path;

/// Load an analysis config from a JSON file.
pub fn load_config(path: &Path) -> Result<AnalysisConfig, EcomapError> {
    let content = std::fs::read_to_string(path).map_err(|e| EcomapError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_config(&content, path)
}

/// Parse an analysis config from a JSON string read from `source`.
pub fn parse_config(json: &str, source: &Path) -> Result<AnalysisConfig, EcomapError> {
    let config: AnalysisConfig =
        serde_json::from_str(json).map_err(|e| EcomapError::ConfigLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse an analysis config from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<AnalysisConfig, EcomapError> {
    let config: AnalysisConfig = serde_json::from_str(json).map_err(EcomapError::Json)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate that a config is usable by the engine.
pub fn validate_config(config: &AnalysisConfig) -> Result<(), EcomapError> {
    if config.name.trim().is_empty() {
        return Err(EcomapError::ConfigInvalid("name must not be empty".into()));
    }

    if !config.default_radius_km.is_finite() || config.default_radius_km <= 0.0 {
        return Err(EcomapError::ConfigInvalid(format!(
            "default_radius_km must be positive, got {}",
            config.default_radius_km
        )));
    }

    if config.top_emitters == 0 {
        return Err(EcomapError::ConfigInvalid(
            "top_emitters must be at least 1".into(),
        ));
    }

    if config.breakdown_limit == 0 {
        return Err(EcomapError::ConfigInvalid(
            "breakdown_limit must be at least 1".into(),
        ));
    }

    // Room for at least one character plus the ellipsis.
    if config.residue_label_max < 4 {
        return Err(EcomapError::ConfigInvalid(format!(
            "residue_label_max must be at least 4, got {}",
            config.residue_label_max
        )));
    }

    for r in &config.radius_choices {
        if !r.is_finite() || *r <= 0.0 {
            return Err(EcomapError::ConfigInvalid(format!(
                "radius choice {r} is not a positive number of kilometres"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_minimal_config_fills_defaults() {
        let json = r#"{ "name": "Test", "years": [2024, 2021, 2022, 2023, 2022] }"#;
        let cfg = parse_config_str(json).unwrap();
        assert_eq!(cfg.years.as_slice(), &[2021, 2022, 2023, 2024]);
        assert_eq!(cfg.default_radius_km, 3.0);
        assert_eq!(cfg.top_emitters, 5);
        assert_eq!(cfg.breakdown_limit, 5);
        assert_eq!(cfg.residue_label_max, 40);
        assert_eq!(cfg.radius_choices, vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_empty_years_rejected() {
        let json = r#"{ "name": "Bad", "years": [] }"#;
        assert!(parse_config_str(json).is_err());
    }

    #[test]
    fn test_zero_top_emitters_rejected() {
        let json = r#"{ "name": "Bad", "years": [2021], "top_emitters": 0 }"#;
        assert!(parse_config_str(json).is_err());
    }

    #[test]
    fn test_negative_radius_rejected() {
        let json = r#"{ "name": "Bad", "years": [2021], "default_radius_km": -2 }"#;
        assert!(parse_config_str(json).is_err());
    }

    #[test]
    fn test_short_label_max_rejected() {
        let json = r#"{ "name": "Bad", "years": [2021], "residue_label_max": 3 }"#;
        assert!(parse_config_str(json).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "name": "Local", "years": [2020, 2021] }}"#).unwrap();
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.name, "Local");
        assert_eq!(cfg.years.last(), 2021);
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/nonexistent/ecomap.json")).unwrap_err();
        assert!(matches!(err, EcomapError::ConfigLoad { .. }));
    }
}

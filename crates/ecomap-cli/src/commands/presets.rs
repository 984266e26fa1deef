use ecomap_core::config::builtin;
use std::path::Path;

pub fn list() -> Result<(), ecomap_core::error::EcomapError> {
    println!("Available presets:\n");
    for name in builtin::PRESETS {
        let cfg = builtin::load_preset(name)?;
        let default_marker = if *name == builtin::DEFAULT_PRESET {
            " (default)"
        } else {
            ""
        };
        println!(
            "  {:<8} {} [{}-{}]{}",
            name,
            cfg.name,
            cfg.years.first(),
            cfg.years.last(),
            default_marker
        );
        if let Some(ref desc) = cfg.description {
            println!("           {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn show(preset: &str) -> Result<(), ecomap_core::error::EcomapError> {
    let cfg = builtin::load_preset(preset)?;
    println!("{}", serde_json::to_string_pretty(&cfg)?);
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), ecomap_core::error::EcomapError> {
    let cfg = ecomap_core::config::load_config(file)?;

    let years: Vec<String> = cfg.years.as_slice().iter().map(|y| y.to_string()).collect();
    println!("Config '{}' is valid.", cfg.name);
    println!("  Years: {}", years.join(", "));
    println!("  Trend window: {}-{}", cfg.years.first(), cfg.years.last());
    println!("  Default radius: {} km", cfg.default_radius_km);

    // Potential issues (warnings, not errors)
    let mut warnings = Vec::new();
    let span = (cfg.years.last() - cfg.years.first() + 1) as usize;
    if span != cfg.years.len() {
        warnings.push(format!(
            "years are not consecutive ({} listed over a {}-year span)",
            cfg.years.len(),
            span
        ));
    }
    if cfg.years.len() == 1 {
        warnings.push("a single tracked year always yields a 0% trend".to_string());
    }
    if !cfg.radius_choices.is_empty() && !cfg.radius_choices.contains(&cfg.default_radius_km) {
        warnings.push(format!(
            "default radius {} km is not one of the radius choices",
            cfg.default_radius_km
        ));
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}

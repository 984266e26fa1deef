use ecomap_core::analysis::{summarize, ZonalAnalyzer};
use ecomap_core::error::EcomapError;
use ecomap_core::ingest::load_dataset;
use ecomap_core::model::LngLat;
use std::path::PathBuf;
use tracing::info;

use crate::output;

pub struct AnalyzeArgs {
    pub data_file: PathBuf,
    pub lng: f64,
    pub lat: f64,
    pub radius: Option<f64>,
    pub preset: Option<String>,
    pub config: Option<PathBuf>,
    pub output_format: String,
    pub summary: bool,
    pub closest: Option<usize>,
}

pub fn run(args: AnalyzeArgs) -> Result<(), EcomapError> {
    let config = super::resolve_config(args.preset.as_deref(), args.config.as_deref())?;

    let origin = LngLat::new(args.lng, args.lat);
    if !origin.is_finite() {
        return Err(EcomapError::InvalidQuery(format!(
            "point {origin} is not a finite coordinate"
        )));
    }

    let dataset = load_dataset(&args.data_file)?;
    info!(
        facilities = dataset.len(),
        config = %config.name,
        "dataset loaded"
    );

    let analyzer = ZonalAnalyzer::new(&config);
    let result = analyzer
        .analyze(Some(origin), args.radius, Some(&dataset))
        .ok_or_else(|| EcomapError::InvalidQuery("no analysis available".into()))?;

    let summary = args.summary.then(|| summarize(&result));
    let closest = args
        .closest
        .map(|n| analyzer.closest_in_zone(origin, args.radius, &dataset, n));

    match args.output_format.as_str() {
        "json" => output::json::print(&result, summary.as_ref(), closest.as_deref())?,
        _ => output::table::print(&result, summary.as_ref(), closest.as_deref()),
    }

    Ok(())
}

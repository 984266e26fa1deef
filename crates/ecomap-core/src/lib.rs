pub mod analysis;
pub mod config;
pub mod error;
pub mod ingest;
pub mod model;
pub mod spatial;

use analysis::{AnalysisResult, ZonalAnalyzer};
use config::schema::AnalysisConfig;
use model::{Dataset, LngLat};

/// Main API entry point: analyze the zone around a selected point.
///
/// Returns `None` until both a point and a dataset are available, so
/// callers can treat it as "no analysis yet". `radius_km` defaults to the
/// config's radius (3 km in the built-in presets).
pub fn analyze_location(
    origin: Option<LngLat>,
    radius_km: Option<f64>,
    dataset: Option<&Dataset>,
    config: &AnalysisConfig,
) -> Option<AnalysisResult> {
    ZonalAnalyzer::new(config).analyze(origin, radius_km, dataset)
}

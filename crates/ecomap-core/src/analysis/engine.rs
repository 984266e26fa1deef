use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::breakdown::{shorten_label, split_residues, tally_top};
use crate::analysis::outcome::{AnalysisResult, ChartRow, NearestFacility, TopEmitter, ZoneStats};
use crate::config::schema::AnalysisConfig;
use crate::model::{Dataset, Facility, LngLat};
use crate::spatial::{distance_km, within_radius};

/// Runs zonal queries against a shared, read-only dataset.
///
/// Holds no state between queries: every call derives its distances and
/// aggregates afresh and never writes back to the dataset.
#[derive(Debug, Clone, Copy)]
pub struct ZonalAnalyzer<'a> {
    config: &'a AnalysisConfig,
}

/// An in-zone facility with its distance to the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneMatch {
    pub id: String,
    pub name: String,
    pub location: LngLat,
    pub distance_km: f64,
}

impl<'a> ZonalAnalyzer<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        self.config
    }

    /// Analyze the zone of `radius_km` around `origin`.
    ///
    /// Returns `None` when the origin or the dataset is missing. A missing
    /// radius falls back to the configured default.
    pub fn analyze(
        &self,
        origin: Option<LngLat>,
        radius_km: Option<f64>,
        dataset: Option<&Dataset>,
    ) -> Option<AnalysisResult> {
        let origin = origin?;
        let dataset = dataset?;
        let radius_km = radius_km.unwrap_or(self.config.default_radius_km);
        let years = &self.config.years;
        let facilities = &dataset.facilities;

        // Per-query distance index, parallel to the dataset.
        let distances: Vec<f64> = facilities
            .iter()
            .map(|f| distance_km(origin, f.location))
            .collect();

        let in_zone: Vec<usize> = (0..facilities.len())
            .filter(|&i| within_radius(distances[i], radius_km))
            .collect();

        let top_emitters = rank_emitters(facilities, &in_zone, self.config.top_emitters);

        let chart_data: Vec<ChartRow> = years
            .as_slice()
            .iter()
            .map(|&year| ChartRow {
                year,
                values: top_emitters
                    .iter()
                    .map(|&(i, _)| facilities[i].tonnage_in(year))
                    .collect(),
            })
            .collect();

        let first_year_total: f64 = in_zone
            .iter()
            .map(|&i| facilities[i].tonnage_in(years.first()))
            .sum();
        let last_year_total: f64 = in_zone
            .iter()
            .map(|&i| facilities[i].tonnage_in(years.last()))
            .sum();
        let trend = percent_change(first_year_total, last_year_total);

        // min_by keeps the first of equally close facilities
        let nearest = (0..facilities.len())
            .min_by(|&a, &b| distances[a].total_cmp(&distances[b]))
            .map(|i| NearestFacility {
                facility: facilities[i].clone(),
                distance_km: distances[i],
            });

        let regional_name = nearest
            .as_ref()
            .and_then(|n| n.facility.region_tag())
            .map(str::to_string);
        let regional_total = regional_name.as_deref().map(|region| {
            facilities
                .iter()
                .filter(|f| f.region.as_deref() == Some(region))
                .map(Facility::total_tonnage)
                .sum::<f64>()
        });

        let top_emitters_total = top_emitters.iter().map(|&(_, total)| total).sum();

        let limit = self.config.breakdown_limit;
        let top_categories = tally_top(
            in_zone
                .iter()
                .map(|&i| facilities[i].category_label().to_string()),
            limit,
        );
        let label_max = self.config.residue_label_max;
        let top_residues = tally_top(
            in_zone.iter().flat_map(|&i| {
                split_residues(facilities[i].residues.as_deref().unwrap_or(""))
                    .into_iter()
                    .map(move |r| shorten_label(r, label_max))
            }),
            limit,
        );

        let top_emitters: Vec<TopEmitter> = top_emitters
            .into_iter()
            .map(|(i, total)| TopEmitter {
                id: facilities[i].id.clone(),
                name: facilities[i].name.clone(),
                total_tonnage: total,
                distance_km: distances[i],
            })
            .collect();

        debug!(
            %origin,
            radius_km,
            facilities = facilities.len(),
            in_zone = in_zone.len(),
            top = ?top_emitters.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
            trend,
            "zonal analysis complete"
        );

        Some(AnalysisResult {
            origin,
            stats: ZoneStats {
                count: in_zone.len(),
                trend,
                radius_km,
                first_year: years.first(),
                last_year: years.last(),
                first_year_total,
                last_year_total,
                regional_total,
                regional_name,
                top_emitters_total,
                top_categories,
                top_residues,
            },
            top_emitters,
            chart_data,
            nearest,
        })
    }

    /// In-zone facilities ordered by distance, closest first, at most `limit`.
    pub fn closest_in_zone(
        &self,
        origin: LngLat,
        radius_km: Option<f64>,
        dataset: &Dataset,
        limit: usize,
    ) -> Vec<ZoneMatch> {
        let radius_km = radius_km.unwrap_or(self.config.default_radius_km);
        let mut matches: Vec<ZoneMatch> = dataset
            .iter()
            .filter_map(|f| {
                let location = f.location?;
                let d = distance_km(origin, Some(location));
                within_radius(d, radius_km).then(|| ZoneMatch {
                    id: f.id.clone(),
                    name: f.name.clone(),
                    location,
                    distance_km: d,
                })
            })
            .collect();
        matches.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        matches.truncate(limit);
        matches
    }
}

/// Rank in-zone facilities by all-time tonnage, highest first.
///
/// The sort is stable, so equal totals keep dataset order.
fn rank_emitters(facilities: &[Facility], in_zone: &[usize], limit: usize) -> Vec<(usize, f64)> {
    let mut ranked: Vec<(usize, f64)> = in_zone
        .iter()
        .map(|&i| (i, facilities[i].total_tonnage()))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

/// Percentage change from `first` to `last`; 0 when `first` is not positive.
pub fn percent_change(first: f64, last: f64) -> f64 {
    if first > 0.0 {
        (last - first) / first * 100.0
    } else {
        0.0
    }
}

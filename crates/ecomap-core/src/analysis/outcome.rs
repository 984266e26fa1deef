use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::{Facility, LngLat};

/// Occurrence count for a category or residue descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub name: String,
    pub count: usize,
}

/// A facility selected for the time-series chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopEmitter {
    pub id: String,
    /// Display label; not guaranteed to be unique.
    pub name: String,
    /// Sum of every reported year.
    pub total_tonnage: f64,
    pub distance_km: f64,
}

/// One year of the pivot table.
///
/// `values[i]` is the tonnage of `AnalysisResult::top_emitters[i]` that
/// year, 0 when the facility did not report it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    pub year: i32,
    pub values: Vec<f64>,
}

/// The facility closest to the query origin, over the whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestFacility {
    pub facility: Facility,
    pub distance_km: f64,
}

/// Aggregates over the facilities inside the zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneStats {
    /// Facilities within the radius.
    pub count: usize,
    /// Percentage change between the first and last tracked year.
    pub trend: f64,
    pub radius_km: f64,
    pub first_year: i32,
    pub last_year: i32,
    pub first_year_total: f64,
    pub last_year_total: f64,
    /// All-time tonnage of the nearest facility's region, across the dataset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regional_total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regional_name: Option<String>,
    /// All-time tonnage of the top emitters combined.
    pub top_emitters_total: f64,
    pub top_categories: Vec<Tally>,
    pub top_residues: Vec<Tally>,
}

/// Outcome of one zonal query. Rebuilt from scratch for every query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub origin: LngLat,
    pub stats: ZoneStats,
    /// Highest all-time emitters inside the zone, descending.
    pub top_emitters: Vec<TopEmitter>,
    /// One row per tracked year, ascending.
    pub chart_data: Vec<ChartRow>,
    /// `None` only for an empty dataset.
    pub nearest: Option<NearestFacility>,
}

impl AnalysisResult {
    /// Series labels in chart order.
    pub fn line_keys(&self) -> Vec<&str> {
        self.top_emitters.iter().map(|e| e.name.as_str()).collect()
    }

    /// Ids of the facilities to highlight on the map.
    pub fn top_ids(&self) -> Vec<&str> {
        self.top_emitters.iter().map(|e| e.id.as_str()).collect()
    }

    pub fn is_empty_zone(&self) -> bool {
        self.stats.count == 0
    }

    /// Tonnage of facility `id` in `year`, 0 when it is not charted.
    pub fn value_at(&self, year: i32, id: &str) -> f64 {
        let Some(col) = self.top_emitters.iter().position(|e| e.id == id) else {
            return 0.0;
        };
        self.chart_data
            .iter()
            .find(|r| r.year == year)
            .and_then(|r| r.values.get(col).copied())
            .unwrap_or(0.0)
    }

    /// Chart rows keyed by display name, as charting widgets expect:
    /// `{"year": "2021", "<name>": value, ...}`.
    ///
    /// When two top emitters share a name, the later one overwrites the
    /// earlier column. The `year` key is written last, so an emitter named
    /// `year` never replaces it; use `chart_data` for lossless rows.
    pub fn named_chart_rows(&self) -> Vec<Map<String, Value>> {
        self.chart_data
            .iter()
            .map(|row| {
                let mut obj = Map::new();
                for (emitter, value) in self.top_emitters.iter().zip(&row.values) {
                    obj.insert(emitter.name.clone(), json_number(*value));
                }
                obj.insert("year".into(), Value::String(row.year.to_string()));
                obj
            })
            .collect()
    }

    /// Flat payload for the dashboard widgets: stats, named chart rows,
    /// line keys, highlighted ids and the nearest facility.
    ///
    /// Every key, nested ones included, is camelCase.
    pub fn dashboard_payload(&self) -> Value {
        serde_json::json!({
            "stats": self.stats,
            "chartData": self.named_chart_rows(),
            "lineKeys": self.line_keys(),
            "topIds": self.top_ids(),
            "nearest": self.nearest,
        })
    }
}

fn json_number(v: f64) -> Value {
    serde_json::Number::from_f64(v)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

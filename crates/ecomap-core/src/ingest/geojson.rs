use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use std::path::Path;
use tracing::warn;

use crate::error::EcomapError;
use crate::model::{Dataset, Facility, LngLat, YearValue};

#[derive(Debug, Deserialize)]
struct RawCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    geometry: Option<RawGeometry>,
    /// `null` is valid GeoJSON and reads as empty properties.
    #[serde(default)]
    properties: Option<RawProperties>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawProperties {
    #[serde(default, deserialize_with = "string_or_number")]
    id_vu: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    name: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    category: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    residues: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    region: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    comuna: Option<String>,
    #[serde(default)]
    history: Option<RawHistory>,
}

/// History arrives either as an array or as a JSON string holding one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawHistory {
    Entries(Vec<YearValue>),
    Encoded(String),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Load a facility dataset from a GeoJSON file.
pub fn load_dataset(path: &Path) -> Result<Dataset, EcomapError> {
    let content = std::fs::read_to_string(path).map_err(|e| EcomapError::DatasetLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_dataset(&content).map_err(|e| match e {
        EcomapError::Json(err) => EcomapError::DatasetLoad {
            path: path.to_path_buf(),
            reason: err.to_string(),
        },
        other => other,
    })
}

/// Parse a GeoJSON FeatureCollection into facilities.
///
/// Features keep their input order. A feature whose coordinates cannot be
/// read is kept without a location, so it never matches a zone.
pub fn parse_dataset(json: &str) -> Result<Dataset, EcomapError> {
    let raw: RawCollection = serde_json::from_str(json)?;
    if raw.kind != "FeatureCollection" {
        return Err(EcomapError::DatasetInvalid(format!(
            "expected a FeatureCollection, found '{}'",
            raw.kind
        )));
    }

    let facilities = raw
        .features
        .into_iter()
        .enumerate()
        .map(|(idx, f)| to_facility(idx, f))
        .collect();

    Ok(Dataset::new(facilities))
}

fn to_facility(idx: usize, feature: RawFeature) -> Facility {
    let props = feature.properties.unwrap_or_default();

    let id = props.id_vu.or(props.id).unwrap_or_else(|| {
        warn!(feature = idx, "feature has no id, using its position");
        format!("feature-{idx}")
    });

    let location = feature.geometry.as_ref().and_then(read_point);
    if location.is_none() {
        warn!(feature = idx, id = %id, "feature has no usable point coordinates");
    }

    let history = match props.history {
        None => Vec::new(),
        Some(RawHistory::Entries(entries)) => entries,
        Some(RawHistory::Encoded(text)) => match serde_json::from_str::<Vec<YearValue>>(&text) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(feature = idx, id = %id, error = %e, "could not decode history string");
                Vec::new()
            }
        },
    };

    Facility {
        name: props.name.unwrap_or_else(|| id.clone()),
        id,
        category: present(props.category),
        residues: present(props.residues),
        region: present(props.region),
        commune: present(props.comuna),
        location,
        history,
    }
}

fn read_point(geometry: &RawGeometry) -> Option<LngLat> {
    if geometry.kind != "Point" {
        return None;
    }
    let lng = geometry.coordinates.first()?.as_f64()?;
    let lat = geometry.coordinates.get(1)?.as_f64()?;
    let p = LngLat::new(lng, lat);
    p.is_finite().then_some(p)
}

/// Drop empty attribute values. Spreadsheet exports write missing cells as `nan`.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| {
        let t = v.trim();
        !t.is_empty() && !t.eq_ignore_ascii_case("nan")
    })
}

/// Serialize a dataset back into a GeoJSON FeatureCollection.
pub fn to_feature_collection(dataset: &Dataset) -> Value {
    let features: Vec<Value> = dataset
        .iter()
        .map(|f| {
            let geometry = match f.location {
                Some(p) => json!({ "type": "Point", "coordinates": [p.lng, p.lat] }),
                None => Value::Null,
            };
            let mut props = serde_json::Map::new();
            props.insert("id_vu".into(), json!(f.id));
            props.insert("name".into(), json!(f.name));
            for (key, value) in [
                ("category", &f.category),
                ("residues", &f.residues),
                ("comuna", &f.commune),
                ("region", &f.region),
            ] {
                if let Some(v) = value {
                    props.insert(key.into(), json!(v));
                }
            }
            props.insert("history".into(), json!(f.history));
            json!({ "type": "Feature", "properties": props, "geometry": geometry })
        })
        .collect();

    json!({ "type": "FeatureCollection", "features": features })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {
                    "id_vu": 1001,
                    "name": "Empresa A",
                    "category": "Manufactura",
                    "residues": "Lodos; Chatarra",
                    "region": "Metropolitana",
                    "comuna": "Maipú",
                    "history": [{ "year": 2021, "value": 100 }, { "year": 2024, "value": 120.5 }]
                },
                "geometry": { "type": "Point", "coordinates": [-70.6, -33.4] }
            },
            {
                "type": "Feature",
                "properties": {
                    "id": "2",
                    "name": "Empresa B",
                    "category": "nan",
                    "history": "[{\"year\": 2021, \"value\": 50}]"
                },
                "geometry": { "type": "Point", "coordinates": ["x", -33.41] }
            },
            {
                "type": "Feature",
                "properties": { "id_vu": "3", "history": "not json" },
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn test_parse_sample_collection() {
        let ds = parse_dataset(SAMPLE).unwrap();
        assert_eq!(ds.len(), 3);

        let a = &ds.facilities[0];
        assert_eq!(a.id, "1001");
        assert_eq!(a.location, Some(LngLat::new(-70.6, -33.4)));
        assert_eq!(a.commune.as_deref(), Some("Maipú"));
        assert_eq!(a.value_for_year(2024), Some(120.5));
    }

    #[test]
    fn test_history_encoded_as_string() {
        let ds = parse_dataset(SAMPLE).unwrap();
        let b = &ds.facilities[1];
        assert_eq!(b.id, "2");
        assert_eq!(b.history, vec![YearValue { year: 2021, value: 50.0 }]);
    }

    #[test]
    fn test_bad_coordinates_and_history_tolerated() {
        let ds = parse_dataset(SAMPLE).unwrap();
        assert!(ds.facilities[1].location.is_none());
        assert!(ds.facilities[1].category.is_none());
        let c = &ds.facilities[2];
        assert!(c.location.is_none());
        assert!(c.history.is_empty());
        assert_eq!(c.name, "3");
    }

    #[test]
    fn test_null_properties_keep_the_feature() {
        let json = r#"{ "type": "FeatureCollection", "features": [
            { "type": "Feature", "properties": null,
              "geometry": { "type": "Point", "coordinates": [-70.6, -33.4] } },
            { "type": "Feature", "properties": { "id": "b", "name": "Bodega" },
              "geometry": { "type": "Point", "coordinates": [-70.7, -33.5] } }
        ] }"#;
        let ds = parse_dataset(json).unwrap();
        assert_eq!(ds.len(), 2);
        let first = &ds.facilities[0];
        assert_eq!(first.id, "feature-0");
        assert!(first.history.is_empty());
        assert!(first.location.is_some());
        assert_eq!(ds.facilities[1].name, "Bodega");
    }

    #[test]
    fn test_not_a_feature_collection() {
        let err = parse_dataset(r#"{ "type": "Feature", "features": [] }"#).unwrap_err();
        assert!(matches!(err, EcomapError::DatasetInvalid(_)));
    }

    #[test]
    fn test_feature_collection_written_back() {
        let ds = parse_dataset(SAMPLE).unwrap();
        let value = to_feature_collection(&ds);
        let reparsed = parse_dataset(&value.to_string()).unwrap();
        assert_eq!(reparsed, ds);
    }

    #[test]
    fn test_load_dataset_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let ds = load_dataset(file.path()).unwrap();
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn test_load_dataset_reports_path_on_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        let err = load_dataset(file.path()).unwrap_err();
        assert!(matches!(err, EcomapError::DatasetLoad { .. }));
    }
}

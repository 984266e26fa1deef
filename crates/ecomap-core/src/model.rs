use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Category bucket for facilities that report no industrial classification.
pub const UNCLASSIFIED: &str = "unclassified";

/// A WGS84 position in degrees, longitude first as in GeoJSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// True when both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lng.is_finite() && self.lat.is_finite()
    }

    pub fn to_point(self) -> geo::Point<f64> {
        geo::Point::new(self.lng, self.lat)
    }
}

impl fmt::Display for LngLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lng, self.lat)
    }
}

/// Tonnes reported by a facility for one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

/// An industrial establishment with its yearly waste-generation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Free-text waste descriptors separated by `,` or `;`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residues: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commune: Option<String>,
    /// `None` when the source coordinates were missing or unusable.
    pub location: Option<LngLat>,
    #[serde(default)]
    pub history: Vec<YearValue>,
}

impl Facility {
    /// Sum of every history entry, regardless of year.
    pub fn total_tonnage(&self) -> f64 {
        self.history.iter().map(|h| h.value).sum()
    }

    /// Value reported for `year`. The first entry wins when a year is duplicated.
    pub fn value_for_year(&self, year: i32) -> Option<f64> {
        self.history.iter().find(|h| h.year == year).map(|h| h.value)
    }

    /// Like [`value_for_year`](Self::value_for_year) but 0 when the year is absent.
    pub fn tonnage_in(&self, year: i32) -> f64 {
        self.value_for_year(year).unwrap_or(0.0)
    }

    pub fn category_label(&self) -> &str {
        non_blank(self.category.as_deref()).unwrap_or(UNCLASSIFIED)
    }

    pub fn region_tag(&self) -> Option<&str> {
        non_blank(self.region.as_deref())
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}

/// The in-memory facility collection, loaded once and shared read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub facilities: Vec<Facility>,
}

impl Dataset {
    pub fn new(facilities: Vec<Facility>) -> Self {
        Self { facilities }
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Facility> {
        self.facilities.iter()
    }

    /// Every year that appears in at least one facility history, ascending.
    pub fn years_present(&self) -> Vec<i32> {
        self.facilities
            .iter()
            .flat_map(|f| f.history.iter().map(|h| h.year))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facility(history: Vec<(i32, f64)>) -> Facility {
        Facility {
            id: "1".into(),
            name: "Planta Norte".into(),
            category: None,
            residues: None,
            region: Some("   ".into()),
            commune: None,
            location: Some(LngLat::new(-70.6, -33.4)),
            history: history
                .into_iter()
                .map(|(year, value)| YearValue { year, value })
                .collect(),
        }
    }

    #[test]
    fn test_total_tonnage_sums_all_years() {
        let f = facility(vec![(2021, 10.0), (2022, 2.5), (2024, 0.5)]);
        assert!((f.total_tonnage() - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_year_first_match_wins() {
        let f = facility(vec![(2021, 10.0), (2021, 99.0)]);
        assert_eq!(f.value_for_year(2021), Some(10.0));
        assert_eq!(f.tonnage_in(2023), 0.0);
    }

    #[test]
    fn test_missing_category_is_unclassified() {
        let mut f = facility(vec![]);
        assert_eq!(f.category_label(), UNCLASSIFIED);
        f.category = Some(String::new());
        assert_eq!(f.category_label(), UNCLASSIFIED);
        f.category = Some("Minería".into());
        assert_eq!(f.category_label(), "Minería");
    }

    #[test]
    fn test_blank_region_is_absent() {
        assert_eq!(facility(vec![]).region_tag(), None);
    }

    #[test]
    fn test_years_present_sorted_unique() {
        let ds = Dataset::new(vec![
            facility(vec![(2024, 1.0), (2021, 1.0)]),
            facility(vec![(2022, 1.0), (2021, 3.0)]),
        ]);
        assert_eq!(ds.years_present(), vec![2021, 2022, 2024]);
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analysis::outcome::AnalysisResult;

/// Trend magnitude, in percent, beyond which a zone counts as changing.
pub const OUTLOOK_THRESHOLD_PCT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outlook {
    Rising,
    Falling,
    Stable,
}

impl Outlook {
    pub fn from_trend(trend: f64) -> Outlook {
        if trend > OUTLOOK_THRESHOLD_PCT {
            Outlook::Rising
        } else if trend < -OUTLOOK_THRESHOLD_PCT {
            Outlook::Falling
        } else {
            Outlook::Stable
        }
    }
}

impl fmt::Display for Outlook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outlook::Rising => write!(f, "ALERT"),
            Outlook::Falling => write!(f, "IMPROVING"),
            Outlook::Stable => write!(f, "STABLE"),
        }
    }
}

/// The charted facility with the largest tonnage in the last tracked year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestLeader {
    pub id: String,
    pub name: String,
    pub year: i32,
    pub tonnage: f64,
}

/// Plain-language reading of an analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSummary {
    pub radius_km: f64,
    pub count: usize,
    pub trend: f64,
    pub first_year: i32,
    pub last_year: i32,
    pub outlook: Outlook,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_leader: Option<LatestLeader>,
}

pub fn summarize(result: &AnalysisResult) -> ZoneSummary {
    let stats = &result.stats;
    ZoneSummary {
        radius_km: stats.radius_km,
        count: stats.count,
        trend: stats.trend,
        first_year: stats.first_year,
        last_year: stats.last_year,
        outlook: Outlook::from_trend(stats.trend),
        latest_leader: latest_leader(result),
    }
}

/// Leader of the last chart row. Only strictly positive values qualify and
/// the first emitter wins a tie.
fn latest_leader(result: &AnalysisResult) -> Option<LatestLeader> {
    let row = result.chart_data.last()?;
    let mut best: Option<(usize, f64)> = None;
    for (col, &value) in row.values.iter().enumerate() {
        let current = best.map(|(_, v)| v).unwrap_or(0.0);
        if value > current {
            best = Some((col, value));
        }
    }
    let (col, tonnage) = best?;
    let emitter = result.top_emitters.get(col)?;
    Some(LatestLeader {
        id: emitter.id.clone(),
        name: emitter.name.clone(),
        year: row.year,
        tonnage,
    })
}

impl fmt::Display for ZoneSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            return write!(
                f,
                "No reporting facilities within {} km of the selected point.",
                self.radius_km
            );
        }

        writeln!(
            f,
            "Within the selected radius of {} km, {} reporting facilit{} found.",
            self.radius_km,
            self.count,
            if self.count == 1 { "y was" } else { "ies were" }
        )?;
        let direction = if self.trend > 0.0 { "upward" } else { "downward" };
        write!(
            f,
            "{}: accumulated waste shows a {:.1}% {} trend between {} and {}.",
            self.outlook,
            self.trend.abs(),
            direction,
            self.first_year,
            self.last_year
        )?;
        if let Some(ref leader) = self.latest_leader {
            write!(
                f,
                "\nThe most relevant actor in the zone is {}, with the largest recent load ({} t in {}).",
                leader.name, leader.tonnage, leader.year
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::outcome::{ChartRow, TopEmitter, ZoneStats};
    use crate::model::LngLat;

    fn result(trend: f64, last_row: Vec<f64>) -> AnalysisResult {
        let top_emitters = (0..last_row.len())
            .map(|i| TopEmitter {
                id: i.to_string(),
                name: format!("Empresa {i}"),
                total_tonnage: 0.0,
                distance_km: 0.0,
            })
            .collect();
        AnalysisResult {
            origin: LngLat::new(-70.6, -33.4),
            stats: ZoneStats {
                count: 10,
                trend,
                radius_km: 3.0,
                first_year: 2021,
                last_year: 2024,
                first_year_total: 0.0,
                last_year_total: 0.0,
                regional_total: None,
                regional_name: None,
                top_emitters_total: 0.0,
                top_categories: vec![],
                top_residues: vec![],
            },
            top_emitters,
            chart_data: vec![ChartRow {
                year: 2024,
                values: last_row,
            }],
            nearest: None,
        }
    }

    #[test]
    fn test_outlook_thresholds() {
        assert_eq!(Outlook::from_trend(15.5), Outlook::Rising);
        assert_eq!(Outlook::from_trend(5.0), Outlook::Stable);
        assert_eq!(Outlook::from_trend(2.0), Outlook::Stable);
        assert_eq!(Outlook::from_trend(-5.0), Outlook::Stable);
        assert_eq!(Outlook::from_trend(-5.1), Outlook::Falling);
    }

    #[test]
    fn test_latest_leader_picks_largest() {
        let s = summarize(&result(15.5, vec![10.0, 40.0, 40.0, 5.0]));
        let leader = s.latest_leader.unwrap();
        assert_eq!(leader.id, "1");
        assert_eq!(leader.tonnage, 40.0);
        assert_eq!(leader.year, 2024);
    }

    #[test]
    fn test_no_leader_when_all_zero() {
        let s = summarize(&result(0.0, vec![0.0, 0.0]));
        assert!(s.latest_leader.is_none());
    }

    #[test]
    fn test_display_mentions_trend_and_leader() {
        let text = summarize(&result(15.5, vec![12.0])).to_string();
        assert!(text.contains("ALERT"));
        assert!(text.contains("15.5%"));
        assert!(text.contains("Empresa 0"));
    }

    #[test]
    fn test_display_empty_zone() {
        let mut r = result(0.0, vec![]);
        r.stats.count = 0;
        let text = summarize(&r).to_string();
        assert!(text.starts_with("No reporting facilities"));
    }
}

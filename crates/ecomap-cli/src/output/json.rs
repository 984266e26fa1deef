use ecomap_core::analysis::{AnalysisResult, ZoneMatch, ZoneSummary};
use ecomap_core::error::EcomapError;

pub fn print(
    result: &AnalysisResult,
    summary: Option<&ZoneSummary>,
    closest: Option<&[ZoneMatch]>,
) -> Result<(), EcomapError> {
    let mut payload = result.dashboard_payload();
    if let Some(obj) = payload.as_object_mut() {
        if let Some(s) = summary {
            obj.insert("summary".into(), serde_json::to_value(s)?);
            obj.insert("summaryText".into(), s.to_string().into());
        }
        if let Some(c) = closest {
            obj.insert("closest".into(), serde_json::to_value(c)?);
        }
    }
    let json = serde_json::to_string_pretty(&payload)?;
    println!("{json}");
    Ok(())
}

use ecomap_core::error::EcomapError;
use ecomap_core::model::LngLat;
use ecomap_core::spatial::zone_polygon;
use serde_json::json;

pub fn run(lng: f64, lat: f64, radius_km: f64, steps: usize) -> Result<(), EcomapError> {
    let center = LngLat::new(lng, lat);
    let polygon = zone_polygon(center, radius_km, steps)?;

    let ring: Vec<[f64; 2]> = polygon.exterior().coords().map(|c| [c.x, c.y]).collect();
    let feature = json!({
        "type": "Feature",
        "properties": {
            "center": [center.lng, center.lat],
            "radius_km": radius_km,
            "steps": steps,
        },
        "geometry": {
            "type": "Polygon",
            "coordinates": [ring],
        },
    });

    println!("{}", serde_json::to_string_pretty(&feature)?);
    Ok(())
}

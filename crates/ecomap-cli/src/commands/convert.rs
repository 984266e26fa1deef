use ecomap_core::error::EcomapError;
use ecomap_core::ingest::{parse_sinader_xlsx, to_feature_collection};
use std::path::PathBuf;

pub fn run(input_file: PathBuf, out: PathBuf) -> Result<(), EcomapError> {
    let bytes = std::fs::read(&input_file)?;
    let import = parse_sinader_xlsx(&bytes)?;

    let geojson = to_feature_collection(&import.dataset);
    std::fs::write(&out, serde_json::to_string_pretty(&geojson)?)?;

    let years: Vec<String> = import.years.iter().map(|y| y.to_string()).collect();
    eprintln!(
        "Converted {} establishment(s) over years {}, written to {}",
        import.dataset.len(),
        if years.is_empty() {
            "(none)".to_string()
        } else {
            years.join(", ")
        },
        out.display()
    );
    if !import.skipped_rows.is_empty() {
        eprintln!("  {} row(s) skipped during conversion", import.skipped_rows.len());
        for s in import.skipped_rows.iter().take(10) {
            eprintln!("  row {}: {}", s.row, s.reason);
        }
        if import.skipped_rows.len() > 10 {
            eprintln!("  ...");
        }
    }

    Ok(())
}

pub mod geojson;
pub mod sinader_xlsx;

pub use geojson::{load_dataset, parse_dataset, to_feature_collection};
pub use sinader_xlsx::{parse_sinader_xlsx, SinaderImport};

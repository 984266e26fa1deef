pub mod breakdown;
pub mod engine;
pub mod outcome;
pub mod summary;

pub use engine::{ZonalAnalyzer, ZoneMatch};
pub use outcome::{AnalysisResult, ChartRow, NearestFacility, Tally, TopEmitter, ZoneStats};
pub use summary::{summarize, Outlook, ZoneSummary};

//! Store performance report: loads the store and product tables, computes
//! descriptive statistics and a composite performance score, renders the
//! report charts and the recommendation text.

pub mod aggregation;
pub mod config;
pub mod error;
pub mod model;
pub mod numfmt;
pub mod ranking;
pub mod report;
pub mod schema;
pub mod scoring;
pub mod visualization;

pub use config::{load_config, ReportConfig};
pub use error::ReportError;
pub use model::{StoreModel, StoreRecord};
pub use report::{generate_report, ReportOptions, ReportSummary};
pub use scoring::ScoreWeights;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! JSON reports and the pipeline run summary

pub mod model_report;
pub mod quality_report;
pub mod summary;

pub use model_report::*;
pub use quality_report::*;
pub use summary::*;

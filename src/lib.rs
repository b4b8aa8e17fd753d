//! Credo: Baseline Credit-Decisioning Pipeline
//!
//! A library for normalizing raw loan-application records, reporting data
//! quality, training a gradient-boosted default-risk classifier, and serving
//! predictions over HTTP.

pub mod cli;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod service;
pub mod utils;

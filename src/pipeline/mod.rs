//! Pipeline module - batch stages from raw loan records to a trained model

pub mod encode;
pub mod loader;
pub mod metrics;
pub mod quality;
pub mod split;
pub mod target;
pub mod trainer;
pub mod values;

pub use encode::*;
pub use loader::*;
pub use metrics::*;
pub use quality::*;
pub use split::*;
pub use target::*;
pub use trainer::*;
pub use values::*;

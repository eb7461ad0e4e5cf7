//! Pipelines.
//!
//! Provides a light [pipeline::Pipeline] trait, implemented by the sentence cleaner
//! and by [crate::training::Calibrator].
mod cleaner;
#[allow(clippy::module_inception)]
pub mod pipeline;

pub use cleaner::{
    Cleaner, CleanerOptions, CleanerPipeline, RunSummary, Scoring, NO_WRONG_LANGUAGE,
};
pub use pipeline::Pipeline;

//! Fluency scoring: language model perplexity mapped onto [0, 1]
//! using statistics gathered at training time.
mod scorer;
mod stats;

pub use scorer::{FluencyScorer, LmScorer};
pub use stats::{mean_stddev, CalibrationStats};

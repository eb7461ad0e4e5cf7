//! Fluency model training.
//!
//! The corpus is shuffled and split into a training set and a dev set. A language model
//! is estimated on the training set, then scored on the dev set and on a noisy copy of it
//! (characters shuffled within each sentence). The resulting statistics calibrate the
//! perplexity-to-score curve, see [crate::scoring::CalibrationStats].
mod calibrate;
pub mod corpus;

pub use calibrate::{Calibrator, TrainOptions};

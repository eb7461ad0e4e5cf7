//! Fluency scoring.
use std::path::Path;

use log::info;

use super::CalibrationStats;
use crate::error::Error;
use crate::lm::{self, LanguageModel};
use crate::metadata::Metadata;
use crate::preprocess::TextPreprocessor;

/// Preprocessor and language model, yielding the perplexity proxy of a sentence.
///
/// The proxy is the log10 probability divided by the number of tokens plus one
/// (the end of sentence marker). It is computed the same way at calibration and
/// scoring time.
pub struct LmScorer {
    preprocessor: TextPreprocessor,
    lm: Box<dyn LanguageModel>,
}

impl LmScorer {
    pub fn new(preprocessor: TextPreprocessor, lm: Box<dyn LanguageModel>) -> Self {
        Self { preprocessor, lm }
    }

    /// Perplexity proxy. Higher is more fluent.
    pub fn raw_score(&self, sentence: &str) -> Result<f64, Error> {
        let tokens = self.preprocessor.process(sentence)?;
        let log_prob = self.lm.score(&tokens) as f64;
        Ok(log_prob / (tokens.len() + 1) as f64)
    }
}

/// Calibrated fluency scorer.
pub struct FluencyScorer {
    scorer: LmScorer,
    stats: CalibrationStats,
}

impl FluencyScorer {
    pub fn new(scorer: LmScorer, stats: CalibrationStats) -> Self {
        stats.warn_if_degenerate();
        Self { scorer, stats }
    }

    /// Load the model described by `metadata`, stored in `model_dir`.
    pub fn from_metadata(model_dir: &Path, metadata: &Metadata) -> Result<Self, Error> {
        info!(
            "loading {} fluency model for {}",
            metadata.lm_type, metadata.language
        );
        let preprocessor = TextPreprocessor::new(
            &metadata.language,
            metadata.lm_type,
            metadata.tokenizer_command.as_deref(),
        )?;
        let lm = lm::load(&metadata.lm_path(model_dir))?;
        Ok(Self::new(LmScorer::new(preprocessor, lm), metadata.stats()))
    }

    pub fn raw_score(&self, sentence: &str) -> Result<f64, Error> {
        self.scorer.raw_score(sentence)
    }

    /// Fluency score in [0, 1].
    pub fn score(&self, sentence: &str) -> Result<f64, Error> {
        let perp = self.scorer.raw_score(sentence)?;
        Ok(self.stats.perplexity_to_score(perp))
    }
}

//! Model training and calibration.
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tempfile::TempDir;

use super::corpus;
use crate::error::Error;
use crate::lm::estimate::{EstimateParams, Estimator};
use crate::lm::{self, LmType};
use crate::metadata::Metadata;
use crate::pipelines::Pipeline;
use crate::preprocess::TextPreprocessor;
use crate::scoring::{CalibrationStats, LmScorer};

/// Training parameters.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    pub language: String,
    pub lm_type: LmType,
    pub tokenizer_command: Option<String>,
    /// Number of sentences held out for calibration.
    pub dev_size: usize,
    pub estimate: EstimateParams,
    pub seed: u64,
    /// Where intermediate files are created. System temp dir if `None`.
    pub tmp_dir: Option<PathBuf>,
}

impl TrainOptions {
    pub fn new(language: String) -> Self {
        Self {
            language,
            lm_type: LmType::default(),
            tokenizer_command: None,
            dev_size: 4000,
            estimate: EstimateParams::default(),
            seed: rand::random(),
            tmp_dir: None,
        }
    }
}

/// Trains a language model on a corpus and calibrates it on a held-out dev set
/// and its character-shuffled counterpart.
pub struct Calibrator<E: Estimator> {
    corpus: PathBuf,
    model_dir: PathBuf,
    options: TrainOptions,
    estimator: E,
}

impl<E: Estimator> Calibrator<E> {
    pub fn new(corpus: PathBuf, model_dir: PathBuf, options: TrainOptions, estimator: E) -> Self {
        Self {
            corpus,
            model_dir,
            options,
            estimator,
        }
    }

    fn workdir(&self) -> Result<TempDir, Error> {
        let dir = match &self.options.tmp_dir {
            Some(root) => tempfile::Builder::new()
                .prefix("monoclean-")
                .tempdir_in(root)?,
            None => tempfile::Builder::new().prefix("monoclean-").tempdir()?,
        };
        debug!("working directory: {:?}", dir.path());
        Ok(dir)
    }

    fn model_file_name(&self, model: &Path) -> String {
        let name = format!("lm.{}", self.options.language);
        match model.extension().and_then(OsStr::to_str) {
            Some("arpa") => format!("{name}.arpa"),
            _ => name,
        }
    }

    fn raw_scores(scorer: &LmScorer, sentences: &[String]) -> Result<Vec<f64>, Error> {
        sentences
            .par_iter()
            .map(|s| scorer.raw_score(s))
            .collect()
    }

    fn train(&self, workdir: &Path) -> Result<Metadata, Error> {
        let options = &self.options;
        info!("using seed {}", options.seed);
        let mut rng = StdRng::seed_from_u64(options.seed);

        info!("shuffling {:?}", self.corpus);
        let lines = corpus::read_lines(&self.corpus)?;
        let (train, dev) = corpus::shuffle_split(lines, options.dev_size, &mut rng);
        if train.is_empty() {
            return Err(Error::Config(format!(
                "corpus has no sentence left for training after holding out {} dev sentences",
                options.dev_size
            )));
        }
        if dev.is_empty() {
            return Err(Error::Config("dev set is empty".to_string()));
        }
        let noisy = corpus::shuffle_chars(&dev, &mut rng);
        info!(
            "{} training sentences, {} dev sentences",
            train.len(),
            dev.len()
        );

        let preprocessor = TextPreprocessor::new(
            &options.language,
            options.lm_type,
            options.tokenizer_command.as_deref(),
        )?;

        let tokenized = train
            .iter()
            .map(|s| preprocessor.process(s).map(|tokens| tokens.join(" ")))
            .collect::<Result<Vec<_>, _>>()?;
        let train_path = workdir.join("train.tok");
        corpus::write_lines(&train_path, &tokenized)?;

        info!("training language model");
        let model = self
            .estimator
            .estimate(&train_path, &options.estimate, &workdir.join("lm"))?;

        let scorer = LmScorer::new(preprocessor, lm::load(&model)?);
        let clean_scores = Self::raw_scores(&scorer, &dev)?;
        let noisy_scores = Self::raw_scores(&scorer, &noisy)?;
        let stats = CalibrationStats::from_samples(&clean_scores, &noisy_scores)?;

        info!("clean mean: {}", stats.clean_mean);
        info!("clean stddev: {}", stats.clean_stddev);
        info!("noisy mean: {}", stats.noisy_mean);
        info!("noisy stddev: {}", stats.noisy_stddev);
        stats.warn_if_degenerate();

        let lm_file = self.model_file_name(&model);
        fs::copy(&model, self.model_dir.join(&lm_file))?;

        let metadata = Metadata::new(
            options.language.clone(),
            options.lm_type,
            lm_file,
            options.tokenizer_command.clone(),
            &stats,
        );
        metadata.write(&self.model_dir)?;
        Ok(metadata)
    }
}

impl<E: Estimator> Pipeline<Metadata> for Calibrator<E> {
    fn run(&self) -> Result<Metadata, Error> {
        let start = Instant::now();
        if !self.model_dir.exists() {
            warn!(
                "model directory {:?} does not exist. Creating.",
                self.model_dir
            );
            fs::create_dir_all(&self.model_dir)?;
        }

        // removed on drop, whatever the outcome
        let workdir = self.workdir()?;
        let metadata = self.train(workdir.path())?;

        info!(
            "model and metadata saved at {:?} ({:.1}s)",
            self.model_dir,
            start.elapsed().as_secs_f32()
        );
        Ok(metadata)
    }
}

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use monoclean::error::Error;
use monoclean::lm::estimate::{EstimateParams, Estimator};
use monoclean::lm::LmType;
use monoclean::metadata::Metadata;
use monoclean::pipelines::Pipeline;
use monoclean::scoring::FluencyScorer;
use monoclean::training::{Calibrator, TrainOptions};

/// Bigram estimator writing relative frequencies as an ARPA file.
struct Bigrams;

fn log10_ratio(a: usize, b: usize) -> f64 {
    (a as f64 / b as f64).log10()
}

impl Estimator for Bigrams {
    fn estimate(
        &self,
        corpus: &Path,
        _params: &EstimateParams,
        dst: &Path,
    ) -> Result<PathBuf, Error> {
        let text = fs::read_to_string(corpus)?;
        let mut unigrams: HashMap<String, usize> = HashMap::new();
        let mut bigrams: HashMap<(String, String), usize> = HashMap::new();
        let mut total = 0;

        for line in text.lines() {
            let mut previous = "<s>".to_string();
            *unigrams.entry(previous.clone()).or_default() += 1;
            for token in line.split(' ').filter(|t| !t.is_empty()).chain(["</s>"]) {
                *unigrams.entry(token.to_string()).or_default() += 1;
                *bigrams
                    .entry((previous.clone(), token.to_string()))
                    .or_default() += 1;
                previous = token.to_string();
                total += 1;
            }
        }

        let path = dst.with_extension("arpa");
        let mut f = fs::File::create(&path)?;
        writeln!(f, "\\data\\")?;
        writeln!(f, "ngram 1={}", unigrams.len() + 1)?;
        writeln!(f, "ngram 2={}", bigrams.len())?;
        writeln!(f)?;
        writeln!(f, "\\1-grams:")?;
        writeln!(f, "-5.0\t<unk>\t0")?;
        for (word, count) in &unigrams {
            let prob = if word == "<s>" {
                -99.0
            } else {
                log10_ratio(*count, total)
            };
            writeln!(f, "{prob}\t{word}\t-1.0")?;
        }
        writeln!(f)?;
        writeln!(f, "\\2-grams:")?;
        for ((a, b), count) in &bigrams {
            writeln!(f, "{}\t{a} {b}", log10_ratio(*count, unigrams[a]))?;
        }
        writeln!(f)?;
        writeln!(f, "\\end\\")?;
        Ok(path)
    }
}

struct Failing;

impl Estimator for Failing {
    fn estimate(&self, _: &Path, _: &EstimateParams, _: &Path) -> Result<PathBuf, Error> {
        Err(Error::Custom("estimation failed".to_string()))
    }
}

fn write_corpus(dir: &Path) -> PathBuf {
    let subjects = ["the cat", "a dog", "my friend", "the old man", "our teacher"];
    let verbs = ["eats", "sees", "likes", "finds"];
    let objects = ["the fish", "a red ball", "some bread", "the small house"];

    let mut corpus = String::new();
    for s in subjects {
        for v in verbs {
            for o in objects {
                corpus.push_str(&format!("{s} {v} {o}.\n"));
            }
        }
    }
    let path = dir.join("corpus.txt");
    fs::write(&path, corpus).unwrap();
    path
}

fn options(seed: u64, tmp: &Path) -> TrainOptions {
    let mut options = TrainOptions::new("en".to_string());
    options.lm_type = LmType::Character;
    options.dev_size = 20;
    options.seed = seed;
    options.tmp_dir = Some(tmp.to_path_buf());
    options
}

fn is_empty(dir: &Path) -> bool {
    fs::read_dir(dir).unwrap().next().is_none()
}

#[test]
fn train_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    let corpus = write_corpus(dir.path());
    let model_dir = dir.path().join("model");

    let metadata = Calibrator::new(corpus, model_dir.clone(), options(42, tmp.path()), Bigrams)
        .run()
        .unwrap();

    assert_eq!(metadata.language, "en");
    assert_eq!(metadata.lm_type, LmType::Character);
    assert_eq!(metadata.lm_file, "lm.en.arpa");
    assert!(metadata.clean_mean_perp > metadata.noisy_mean_perp);
    assert!(is_empty(tmp.path()));

    let read = Metadata::from_dir(&model_dir).unwrap();
    assert_eq!(read, metadata);

    let scorer = FluencyScorer::from_metadata(&model_dir, &read).unwrap();
    let clean = "the cat likes some bread.";
    let noisy = "hte act ilsek omse berad.";
    assert!(scorer.raw_score(clean).unwrap() > scorer.raw_score(noisy).unwrap());
    for sentence in [clean, noisy] {
        let score = scorer.score(sentence).unwrap();
        assert!((0.0..=1.0).contains(&score));
    }
    assert!(scorer.score(clean).unwrap() >= scorer.score(noisy).unwrap());
}

#[test]
fn same_seed_same_model() {
    let dir = tempfile::tempdir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    let corpus = write_corpus(dir.path());

    let run = |name: &str, seed: u64| {
        Calibrator::new(
            corpus.clone(),
            dir.path().join(name),
            options(seed, tmp.path()),
            Bigrams,
        )
        .run()
        .unwrap()
    };

    let first = run("a", 7);
    let second = run("b", 7);
    assert_eq!(first, second);
}

#[test]
fn failing_estimator_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    let corpus = write_corpus(dir.path());
    let model_dir = dir.path().join("model");

    let res = Calibrator::new(corpus, model_dir.clone(), options(1, tmp.path()), Failing).run();
    assert!(res.is_err());
    assert!(is_empty(tmp.path()));
    assert!(!model_dir.join(Metadata::FILE_NAME).exists());
}

#[test]
fn corpus_too_small() {
    let dir = tempfile::tempdir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    let corpus = write_corpus(dir.path());
    let mut options = options(1, tmp.path());
    options.dev_size = 1000;

    let res = Calibrator::new(corpus, dir.path().join("model"), options, Bigrams).run();
    assert!(matches!(res, Err(Error::Config(_))));
    assert!(is_empty(tmp.path()));
}

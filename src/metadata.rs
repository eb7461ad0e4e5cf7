//! Model metadata, stored as `metadata.yaml` next to the language model.
//!
//! ```yaml
//! language: en
//! lm_type: CHARACTER
//! lm_file: lm.en
//! clean_mean_perp: -1.02
//! clean_stddev_perp: 0.21
//! noisy_mean_perp: -2.87
//! noisy_stddev_perp: 0.34
//! ```
use std::fs::File;
use std::path::{Path, PathBuf};

use log::debug;
use oxilangtag::LanguageTag;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::lm::LmType;
use crate::scoring::CalibrationStats;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Metadata {
    pub language: String,
    pub lm_type: LmType,
    /// Model file name, relative to the model directory.
    pub lm_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokenizer_command: Option<String>,
    pub clean_mean_perp: f64,
    pub clean_stddev_perp: f64,
    pub noisy_mean_perp: f64,
    pub noisy_stddev_perp: f64,
}

impl Metadata {
    pub const FILE_NAME: &'static str = "metadata.yaml";

    pub fn new(
        language: String,
        lm_type: LmType,
        lm_file: String,
        tokenizer_command: Option<String>,
        stats: &CalibrationStats,
    ) -> Self {
        Self {
            language,
            lm_type,
            lm_file,
            tokenizer_command,
            clean_mean_perp: stats.clean_mean,
            clean_stddev_perp: stats.clean_stddev,
            noisy_mean_perp: stats.noisy_mean,
            noisy_stddev_perp: stats.noisy_stddev,
        }
    }

    /// Read and validate `metadata.yaml` from a model directory.
    ///
    /// # Errors
    /// Fails if the file is missing or malformed, if the language is not a valid tag
    /// or if the model file does not exist.
    pub fn from_dir(model_dir: &Path) -> Result<Self, Error> {
        let path = model_dir.join(Self::FILE_NAME);
        if !path.is_file() {
            return Err(Error::Config(format!(
                "no {} in model directory {:?}",
                Self::FILE_NAME,
                model_dir
            )));
        }
        debug!("reading {:?}", path);
        let metadata: Self = serde_yaml::from_reader(File::open(&path)?)?;
        metadata.validate(model_dir)?;
        Ok(metadata)
    }

    fn validate(&self, model_dir: &Path) -> Result<(), Error> {
        LanguageTag::parse(self.language.clone())?;
        let lm_path = self.lm_path(model_dir);
        if !lm_path.is_file() {
            return Err(Error::Config(format!(
                "language model {:?} referenced in {} does not exist",
                lm_path,
                Self::FILE_NAME
            )));
        }
        Ok(())
    }

    /// Write `metadata.yaml` into `model_dir`.
    pub fn write(&self, model_dir: &Path) -> Result<(), Error> {
        let path = model_dir.join(Self::FILE_NAME);
        debug!("writing {:?}", path);
        serde_yaml::to_writer(File::create(path)?, self)?;
        Ok(())
    }

    pub fn lm_path(&self, model_dir: &Path) -> PathBuf {
        model_dir.join(&self.lm_file)
    }

    pub fn stats(&self) -> CalibrationStats {
        CalibrationStats::new(
            self.clean_mean_perp,
            self.clean_stddev_perp,
            self.noisy_mean_perp,
            self.noisy_stddev_perp,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> Metadata {
        Metadata::new(
            "en".to_string(),
            LmType::Character,
            "lm.en".to_string(),
            None,
            &CalibrationStats::new(-1.0, 0.2, -3.0, 0.5),
        )
    }

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lm.en"), "").unwrap();
        let m = metadata();
        m.write(dir.path()).unwrap();

        let read = Metadata::from_dir(dir.path()).unwrap();
        assert_eq!(read, m);
        assert_eq!(read.stats(), CalibrationStats::new(-1.0, 0.2, -3.0, 0.5));
    }

    #[test]
    fn parse() {
        let yaml = "language: fr
lm_type: PLACEHOLDER
lm_file: lm.fr
tokenizer_command: moses -l fr
clean_mean_perp: -1.5
clean_stddev_perp: 0.3
noisy_mean_perp: -3.2
noisy_stddev_perp: 0.4
";
        let m: Metadata = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(m.lm_type, LmType::Placeholder);
        assert_eq!(m.tokenizer_command.as_deref(), Some("moses -l fr"));
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Metadata::from_dir(dir.path()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn missing_lm() {
        let dir = tempfile::tempdir().unwrap();
        metadata().write(dir.path()).unwrap();
        assert!(matches!(
            Metadata::from_dir(dir.path()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn missing_key() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lm.en"), "").unwrap();
        std::fs::write(
            dir.path().join(Metadata::FILE_NAME),
            "language: en\nlm_type: CHARACTER\nlm_file: lm.en\n",
        )
        .unwrap();
        assert!(matches!(Metadata::from_dir(dir.path()), Err(Error::Yaml(_))));
    }
}

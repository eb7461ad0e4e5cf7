/*! Language models

[LanguageModel] is the scoring seam: given preprocessed tokens, return the total
log10 probability of the sentence, including the begin/end of sentence markers.

Two backends are available:
- [arpa::ArpaModel], a back-off n-gram model read from an ARPA file,
- `kenlm::KenLm`, binary KenLM models (requires the `kenlm` feature).

Models are produced by an [estimate::Estimator].
!*/
pub mod arpa;
pub mod estimate;
#[cfg(feature = "kenlm")]
pub mod kenlm;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub trait LanguageModel: Send + Sync {
    /// log10 probability of `tokens` as a full sentence.
    fn score(&self, tokens: &[String]) -> f32;
}

/// Kind of model, deciding tokenization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LmType {
    /// One token per character.
    #[default]
    Character,
    /// Word tokens replaced by placeholders.
    Placeholder,
}

impl LmType {
    pub const VARIANTS: [&'static str; 2] = ["CHARACTER", "PLACEHOLDER"];
}

impl fmt::Display for LmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LmType::Character => write!(f, "CHARACTER"),
            LmType::Placeholder => write!(f, "PLACEHOLDER"),
        }
    }
}

impl FromStr for LmType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CHARACTER" => Ok(LmType::Character),
            "PLACEHOLDER" => Ok(LmType::Placeholder),
            other => Err(format!("unknown language model type: {other}")),
        }
    }
}

/// Load a model file.
///
/// With the `kenlm` feature, binary and ARPA files are loaded by KenLM.
/// Otherwise only ARPA files are supported.
///
/// # Errors
/// Fails if the file is missing or cannot be loaded.
pub fn load(path: &Path) -> Result<Box<dyn LanguageModel>, Error> {
    if !path.is_file() {
        return Err(Error::Config(format!(
            "language model {:?} does not exist",
            path
        )));
    }
    info!("loading language model {:?}", path);

    #[cfg(feature = "kenlm")]
    {
        Ok(Box::new(kenlm::KenLm::new(path)?))
    }

    #[cfg(not(feature = "kenlm"))]
    {
        Ok(Box::new(arpa::ArpaModel::from_path(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lm_type() {
        assert_eq!(LmType::from_str("character"), Ok(LmType::Character));
        assert_eq!(LmType::from_str("PLACEHOLDER"), Ok(LmType::Placeholder));
        assert!(LmType::from_str("word").is_err());
        assert_eq!(LmType::Placeholder.to_string(), "PLACEHOLDER");
    }

    #[test]
    fn lm_type_yaml() {
        let t: LmType = serde_yaml::from_str("CHARACTER").unwrap();
        assert_eq!(t, LmType::Character);
        assert_eq!(
            serde_yaml::to_string(&LmType::Placeholder).unwrap().trim(),
            "PLACEHOLDER"
        );
    }

    #[test]
    fn missing() {
        assert!(matches!(
            load(Path::new("/nonexistent/lm.en")),
            Err(Error::Config(_))
        ));
    }
}

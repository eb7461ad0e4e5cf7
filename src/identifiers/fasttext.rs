//! Fasttext identifier
use std::path::Path;

use fasttext::{FastText as FastTextLib, Prediction};
use log::debug;
use unicode_script::{Script, UnicodeScript};

use super::LanguageIdentifier;
use crate::error::Error;
use crate::lang;

/// Clean the prediction label field from `__label__xx` into `xx`.
///
/// Be aware that the function only skips 9 chars without doing any parsing,
/// so it may silently fail if `prediction.label.chars().count() > 9`
/// but not of a `__label__xx` form.
///
/// # Errors
/// Returns an error if provided prediction is too short to be cleaned.
fn clean_prediction(prediction: &Prediction) -> Result<String, Error> {
    if prediction.label.chars().count() < 9 {
        return Err(Error::FastText(format!(
            "Label is too short to be cleaned: {}",
            prediction.label
        )));
    }
    Ok(prediction.label.chars().skip(9).collect())
}

/// `_lat` or `_cyr` depending on the dominant script, `None` for neither.
pub fn script_suffix(sentence: &str) -> Option<&'static str> {
    let (latin, cyrillic) = sentence
        .chars()
        .fold((0usize, 0usize), |(latin, cyrillic), c| match c.script() {
            Script::Latin => (latin + 1, cyrillic),
            Script::Cyrillic => (latin, cyrillic + 1),
            _ => (latin, cyrillic),
        });

    if latin == 0 && cyrillic == 0 {
        None
    } else if cyrillic > latin {
        Some("_cyr")
    } else {
        Some("_lat")
    }
}

/// Holds a [fasttext::FastText] instance and its parameters.
///
/// Labels of the Serbo-Croatian group are reported as `hbs` unless `group_hbs` is off,
/// and get a script suffix when `detect_script` is on.
pub struct FastText {
    predictor: FastTextLib,
    pub threshold: f32,
    pub group_hbs: bool,
    pub detect_script: bool,
}

impl FastText {
    /// Load a fasttext language identification model (`lid.176.bin`).
    ///
    /// # Errors
    /// Propagates [fasttext::FastText] errors.
    pub fn new(filename: &Path, group_hbs: bool, detect_script: bool) -> Result<Self, Error> {
        let mut predictor = FastTextLib::new();
        let filename_str = filename.to_str();
        match filename_str {
            None => Err(Error::Config(format!(
                "invalid filepath for lid: {:?}",
                filename
            ))),
            Some(path) => {
                if !filename.is_file() {
                    return Err(Error::Config(format!(
                        "language identification model {:?} does not exist",
                        filename
                    )));
                }
                predictor.load_model(path).map_err(Error::FastText)?;
                debug!("loaded lid model {path}");
                Ok(Self {
                    predictor,
                    threshold: 0.0,
                    group_hbs,
                    detect_script,
                })
            }
        }
    }

    /// Apply grouping and script detection to a cleaned label.
    fn label(&self, code: String, sentence: &str) -> String {
        if !lang::SERBO_CROATIAN.contains(code.as_str()) {
            return code;
        }
        let code = if self.group_hbs {
            lang::HBS.to_string()
        } else {
            code
        };
        match (self.detect_script, script_suffix(sentence)) {
            (true, Some(suffix)) => code + suffix,
            _ => code,
        }
    }
}

impl LanguageIdentifier for FastText {
    fn identify(&self, sentence: &str) -> Result<Option<String>, Error> {
        // null chars crash fasttext
        let sentence = sentence.replace(char::from(0), "").replace('\n', " ");
        let predictions = self
            .predictor
            .predict(&sentence, 1, self.threshold)
            .map_err(Error::FastText)?;

        match predictions.first() {
            Some(prediction) => {
                let code = clean_prediction(prediction)?;
                Ok(Some(self.label(code, &sentence)))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean() {
        let prediction = Prediction {
            prob: 0.9,
            label: "__label__fr".to_string(),
        };
        assert_eq!(clean_prediction(&prediction).unwrap(), "fr");

        let prediction = Prediction {
            prob: 0.9,
            label: "fr".to_string(),
        };
        assert!(clean_prediction(&prediction).is_err());
    }

    #[test]
    fn scripts() {
        assert_eq!(script_suffix("ovo je rečenica"), Some("_lat"));
        assert_eq!(script_suffix("ово је реченица"), Some("_cyr"));
        assert_eq!(script_suffix("1234 !"), None);
    }

    #[test]
    fn missing_model() {
        assert!(matches!(
            FastText::new(Path::new("no-such-lid.bin"), true, false),
            Err(Error::Config(_))
        ));
    }

    #[test]
    #[ignore = "needs lid.176.bin"]
    fn identify_en() {
        let classifier = FastText::new(Path::new("lid.176.bin"), true, false).unwrap();
        let sentence = "a perfectly, innocent, quite lengthy sentence. how lengthy and normal this sentence is!";
        assert_eq!(classifier.identify(sentence).unwrap().as_deref(), Some("en"));
    }
}

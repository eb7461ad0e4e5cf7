/*! Identifier trait and the language identification stage.

All identifiers should implement [LanguageIdentifier] to be useable by [LangIdStage].
!*/
use log::debug;

use crate::error::Error;
use crate::lang;

/// Label reported when no language could be identified.
pub const UNKNOWN: &str = "unk";

pub trait LanguageIdentifier: Send + Sync {
    /// Returns a language code, possibly with a script suffix (`hbs_lat`).
    /// `None` if no reliable identification has been done.
    fn identify(&self, sentence: &str) -> Result<Option<String>, Error>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identification {
    /// Identified label, as reported by the identifier.
    pub language: String,
    pub matches_expected: bool,
}

/// Checks sentences against the expected language.
pub struct LangIdStage {
    identifier: Box<dyn LanguageIdentifier>,
    expected: String,
    strip_script: bool,
}

impl LangIdStage {
    /// `group_hbs` maps an expected Serbo-Croatian language to `hbs`, matching
    /// what a grouping identifier reports. `strip_script` removes script suffixes
    /// before comparing.
    pub fn new(
        identifier: Box<dyn LanguageIdentifier>,
        expected: &str,
        group_hbs: bool,
        strip_script: bool,
    ) -> Self {
        let expected = if group_hbs && lang::SERBO_CROATIAN.contains(expected) {
            lang::HBS.to_string()
        } else {
            expected.to_string()
        };
        debug!("language identification expects {expected}");
        Self {
            identifier,
            expected,
            strip_script,
        }
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// Identify the (lowercased) sentence.
    pub fn run(&self, sentence: &str) -> Result<Identification, Error> {
        let language = self
            .identifier
            .identify(&sentence.to_lowercase())?
            .unwrap_or_else(|| UNKNOWN.to_string());

        let code = if self.strip_script {
            language.split('_').next().unwrap_or_default()
        } else {
            language.as_str()
        };
        let matches_expected = code == self.expected;

        Ok(Identification {
            language,
            matches_expected,
        })
    }
}

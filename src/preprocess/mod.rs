/*! Text preprocessing

Sentences go through the same steps at training and scoring time:

1. punctuation normalization ([normalize::PunctNormalizer]),
2. tokenization ([tokenizer]),
3. optional placeholder substitution ([placeholder]).

The resulting tokens are what the language model sees.
!*/
pub mod normalize;
pub mod placeholder;
pub mod tokenizer;

use log::debug;

use crate::error::Error;
use crate::lm::LmType;
use normalize::{NormalizerOptions, PunctNormalizer};
use tokenizer::{Characters, External, Tokenize, Words};

type BoxedTokenizer = Box<dyn Tokenize + Send + Sync>;

pub struct TextPreprocessor {
    normalizer: PunctNormalizer,
    tokenizer: BoxedTokenizer,
    placeholders: bool,
}

impl TextPreprocessor {
    /// Build the preprocessor matching a model type.
    ///
    /// Character models ignore `tokenizer_command`.
    /// Placeholder models use `tokenizer_command` if provided, [Words] otherwise.
    pub fn new(
        lang: &str,
        lm_type: LmType,
        tokenizer_command: Option<&str>,
    ) -> Result<Self, Error> {
        let normalizer = PunctNormalizer::new(lang, &NormalizerOptions::default())?;
        let tokenizer: BoxedTokenizer = match (lm_type, tokenizer_command) {
            (LmType::Character, _) => Box::new(Characters),
            (LmType::Placeholder, Some(command)) => Box::new(External::spawn(command)?),
            (LmType::Placeholder, None) => Box::new(Words),
        };
        debug!("preprocessor for {lang}: {lm_type:?}");

        Ok(Self::with_parts(
            normalizer,
            tokenizer,
            lm_type == LmType::Placeholder,
        ))
    }

    pub fn with_parts(
        normalizer: PunctNormalizer,
        tokenizer: BoxedTokenizer,
        placeholders: bool,
    ) -> Self {
        Self {
            normalizer,
            tokenizer,
            placeholders,
        }
    }

    /// Normalize, tokenize and optionally substitute tokens.
    pub fn process(&self, sentence: &str) -> Result<Vec<String>, Error> {
        let normalized = self.normalizer.normalize(sentence);
        let tokens = self.tokenizer.tokenize(&normalized)?;
        if self.placeholders {
            Ok(tokens.iter().map(|t| placeholder::placeholder(t)).collect())
        } else {
            Ok(tokens)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character() {
        let p = TextPreprocessor::new("en", LmType::Character, None).unwrap();
        assert_eq!(
            p.process("  a  (b)").unwrap(),
            vec!["a", tokenizer::SPACE, "(", "b", ")"]
        );
    }

    #[test]
    fn placeholder() {
        let p = TextPreprocessor::new("en", LmType::Placeholder, None).unwrap();
        assert_eq!(
            p.process("Paris has 2 airports.").unwrap(),
            vec![
                "TOKEN:ALPHA:TITLE:BASIC_LATIN",
                "TOKEN:ALPHA:LOWER:BASIC_LATIN",
                "TOKEN:NUMERIC",
                "TOKEN:ALPHA:LOWER:BASIC_LATIN",
                "."
            ]
        );
    }
}

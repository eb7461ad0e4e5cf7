/*! Language identification

Holds a [LanguageIdentifier] trait for implementing other ones.

The current identifier used is [fasttext](https://fasttext.cc) !*/
mod fasttext;
mod identifier;

pub use self::fasttext::{script_suffix, FastText};
pub use identifier::{Identification, LangIdStage, LanguageIdentifier, UNKNOWN};

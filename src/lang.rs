//! Language sets.
//!
//! Most sentence rules and the punctuation normalizer have language-specific
//! exceptions. They are all keyed on ISO 639-1 codes and gathered here.
use std::collections::HashSet;

use lazy_static::lazy_static;

lazy_static! {
    /// Chinese, Japanese and Korean: whitespace does not delimit words.
    pub static ref CJK: HashSet<&'static str> = ["zh", "ja", "ko"].into_iter().collect();

    /// Languages where `Ã` is legitimate text and not a mis-decoding marker.
    pub static ref ATILDE: HashSet<&'static str> = ["pt"].into_iter().collect();

    /// Languages where `Â` is legitimate text and not a mis-decoding marker.
    pub static ref ACIRCUMFLEX: HashSet<&'static str> =
        ["cy", "fr", "fa", "it", "pt", "tr", "vi"].into_iter().collect();

    /// Languages with a tokenization reliable enough for word-aware
    /// repeated phrase detection.
    pub static ref SAFE_NOISE_DETECTION: HashSet<&'static str> = [
        "en", "es", "fr", "pl", "de", "it", "pt", "nl", "cs", "ro", "fi", "lv", "et", "bg", "hr",
        "da", "hu", "ga", "eu", "gl", "sl", "sv", "mt", "sk", "is", "lt", "nb", "nn", "no",
    ]
    .into_iter()
    .collect();

    /// Languages with words made of several consecutive high codepoints (`þýðir`).
    pub static ref DENSE_DIACRITICS: HashSet<&'static str> = ["is", "fi"].into_iter().collect();

    /// Labels grouped under `hbs` by language identification.
    pub static ref SERBO_CROATIAN: HashSet<&'static str> =
        ["hbs", "hr", "sr", "bs", "sh", "me"].into_iter().collect();

    /// Languages using a comma as decimal separator.
    pub static ref DECIMAL_COMMA: HashSet<&'static str> =
        ["de", "es", "cz", "cs", "fr"].into_iter().collect();

    /// Languages that put the quotation mark after the comma (`,"` -> `",`).
    pub static ref QUOTE_BEFORE_COMMA: HashSet<&'static str> =
        ["de", "es", "fr"].into_iter().collect();
}

/// Tag used for the Serbo-Croatian group.
pub const HBS: &str = "hbs";

/// `true` if `lang` is Chinese, Japanese or Korean.
pub fn is_cjk(lang: &str) -> bool {
    CJK.contains(lang)
}

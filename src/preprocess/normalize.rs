//! Punctuation normalization.
//!
//! An ordered list of regex substitutions, always applied in sequence. Later
//! substitutions assume that whitespace has already been collapsed by earlier ones.
use regex::Regex;

use crate::error::Error;
use crate::lang;

const EXTRA_WHITESPACE: &[(&str, &str)] = &[
    (r"\r", ""),
    (r"\(", " ("),
    (r"\)", ") "),
    (r" +", " "),
    (r"\) ([.!:?;,])", ")${1}"),
    (r"\( ", "("),
    (r" \)", ")"),
    (r"(\d) %", "${1}%"),
    (r" :", ":"),
    (r" ;", ";"),
];

const PENN_QUOTES: &[(&str, &str)] = &[("`", "'"), ("''", " \" ")];

const UNICODE_QUOTES: &[(&str, &str)] = &[
    ("„", "\""),
    ("“", "\""),
    ("”", "\""),
    ("–", "-"),
    ("—", " - "),
    (r" +", " "),
    ("´", "'"),
    ("([a-zA-Z])‘([a-zA-Z])", "${1}'${2}"),
    ("([a-zA-Z])’([a-zA-Z])", "${1}'${2}"),
    ("‘", "'"),
    ("‚", "'"),
    ("’", "'"),
    ("''", "\""),
    ("´´", "\""),
    ("…", "..."),
];

const FRENCH_QUOTES: &[(&str, &str)] = &[
    ("\u{00A0}«\u{00A0}", "\""),
    ("«\u{00A0}", "\""),
    ("«", "\""),
    ("\u{00A0}»\u{00A0}", "\""),
    ("\u{00A0}»", "\""),
    ("»", "\""),
];

const PSEUDO_SPACES: &[(&str, &str)] = &[
    ("\u{00A0}%", "%"),
    ("nº\u{00A0}", "nº "),
    ("\u{00A0}:", ":"),
    ("\u{00A0}ºC", " ºC"),
    ("\u{00A0}cm", " cm"),
    ("\u{00A0}\\?", "?"),
    ("\u{00A0}!", "!"),
    ("\u{00A0};", ";"),
    (",\u{00A0}", ", "),
    (r" +", " "),
];

const EN_QUOTE_COMMA: &[(&str, &str)] = &[(r#""([,.]+)"#, "${1}\"")];

const QUOTE_COMMA: &[(&str, &str)] = &[
    (r#",""#, "\","),
    // keep the period of a sentence-final quote
    (r#"(\.+)"(\s*[^<])"#, "\"${1}${2}"),
];

const DECIMAL_COMMA: &[(&str, &str)] = &[("(\\d)\u{00A0}(\\d)", "${1},${2}")];

const DECIMAL_PERIOD: &[(&str, &str)] = &[("(\\d)\u{00A0}(\\d)", "${1}.${2}")];

const UNICODE_PUNCTUATION: &[(&str, &str)] = &[
    ("，", ","),
    (r"。\s*", ". "),
    ("、", ","),
    ("”", "\""),
    ("“", "\""),
    ("∶", ":"),
    ("：", ":"),
    ("？", "?"),
    ("《", "\""),
    ("》", "\""),
    ("）", ")"),
    ("！", "!"),
    ("（", "("),
    ("；", ";"),
    ("」", "\""),
    ("「", "\""),
    ("０", "0"),
    ("１", "1"),
    ("２", "2"),
    ("３", "3"),
    ("４", "4"),
    ("５", "5"),
    ("６", "6"),
    ("７", "7"),
    ("８", "8"),
    ("９", "9"),
    (r"．\s*", ". "),
    ("～", "~"),
    ("’", "'"),
    ("…", "..."),
    ("━", "-"),
    ("〈", "<"),
    ("〉", ">"),
    ("【", "["),
    ("】", "]"),
    ("％", "%"),
];

/// Normalizer switches.
#[derive(Debug, Clone)]
pub struct NormalizerOptions {
    /// Normalize Penn Treebank style quotes.
    pub penn: bool,
    /// Language-dependent quote/comma ordering.
    pub norm_quote_commas: bool,
    /// Language-dependent decimal separators.
    pub norm_numbers: bool,
    /// Replace full-width/CJK punctuation before normalizing.
    pub pre_replace_unicode_punct: bool,
    /// Remove control characters after normalizing.
    pub post_remove_control_chars: bool,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self {
            penn: true,
            norm_quote_commas: true,
            norm_numbers: true,
            pre_replace_unicode_punct: false,
            post_remove_control_chars: false,
        }
    }
}

#[derive(Debug, Clone)]
struct Substitution {
    pattern: Regex,
    replacement: &'static str,
}

fn compile(table: &[(&str, &'static str)]) -> Result<Vec<Substitution>, Error> {
    table
        .iter()
        .map(|(pattern, replacement)| {
            Ok(Substitution {
                pattern: Regex::new(pattern)?,
                replacement,
            })
        })
        .collect()
}

fn apply(substitutions: &[Substitution], text: String) -> String {
    substitutions.iter().fold(text, |text, sub| {
        sub.pattern
            .replace_all(&text, sub.replacement)
            .into_owned()
    })
}

/// Language-aware punctuation normalizer.
#[derive(Debug, Clone)]
pub struct PunctNormalizer {
    substitutions: Vec<Substitution>,
    pre: Vec<Substitution>,
    control_chars: Option<Regex>,
}

impl PunctNormalizer {
    pub fn new(lang: &str, options: &NormalizerOptions) -> Result<Self, Error> {
        let mut tables = vec![EXTRA_WHITESPACE];
        if options.penn {
            tables.push(PENN_QUOTES);
        }
        tables.extend([UNICODE_QUOTES, FRENCH_QUOTES, PSEUDO_SPACES]);

        if options.norm_quote_commas {
            if lang == "en" {
                tables.push(EN_QUOTE_COMMA);
            } else if lang::QUOTE_BEFORE_COMMA.contains(lang) {
                tables.push(QUOTE_COMMA);
            }
        }

        if options.norm_numbers {
            if lang::DECIMAL_COMMA.contains(lang) {
                tables.push(DECIMAL_COMMA);
            } else {
                tables.push(DECIMAL_PERIOD);
            }
        }

        let mut substitutions = Vec::new();
        for table in tables {
            substitutions.extend(compile(table)?);
        }

        let pre = if options.pre_replace_unicode_punct {
            compile(UNICODE_PUNCTUATION)?
        } else {
            Vec::new()
        };

        let control_chars = if options.post_remove_control_chars {
            Some(Regex::new(r"\p{C}")?)
        } else {
            None
        };

        Ok(Self {
            substitutions,
            pre,
            control_chars,
        })
    }

    /// Returns a string with normalized punctuation, trimmed.
    pub fn normalize(&self, text: &str) -> String {
        let text = apply(&self.pre, text.to_string());
        let mut text = apply(&self.substitutions, text);

        if let Some(control_chars) = &self.control_chars {
            text = control_chars.replace_all(&text, "").into_owned();
        }

        text.trim().to_string()
    }
}

//! Token placeholders.
//!
//! Placeholder models replace each token by a label describing its shape,
//! e.g. `Paris` becomes `TOKEN:ALPHA:TITLE:BASIC_LATIN` and `1984` becomes `TOKEN:NUMERIC`.
//! Punctuation is kept as is.
//!
//! Labels are part of trained model vocabularies and must not change.
use std::fmt;

use unic_ucd::GeneralCategory;
use unicode_script::{Script, UnicodeScript};

/// Letter case of an alphabetic token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Lower,
    Title,
    Upper,
    Mixed,
}

/// Script family of an alphabetic token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFamily {
    BasicLatin,
    LatinSupplement,
    LatinExtended,
    Arabic,
    Greek,
    Cyrillic,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Alpha(Case, ScriptFamily),
    Numeric,
    Punctuation,
    Mixed,
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Case::Lower => "LOWER",
            Case::Title => "TITLE",
            Case::Upper => "UPPER",
            Case::Mixed => "MIXED",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for ScriptFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScriptFamily::BasicLatin => "BASIC_LATIN",
            ScriptFamily::LatinSupplement => "LATIN_SUPPLEMENT",
            ScriptFamily::LatinExtended => "LATIN_EXTENDED",
            ScriptFamily::Arabic => "ARABIC",
            ScriptFamily::Greek => "GREEK",
            // sic
            ScriptFamily::Cyrillic => "CYRILIC",
            ScriptFamily::Other => "OTHER",
        };
        write!(f, "{s}")
    }
}

fn is_alpha(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| GeneralCategory::of(c).is_letter())
}

fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_numeric)
}

fn is_cased(c: char) -> bool {
    c.is_lowercase() || c.is_uppercase()
}

fn is_title(token: &str) -> bool {
    let mut previous_cased = false;
    let mut cased = false;
    for c in token.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else {
            previous_cased = false;
        }
    }
    cased
}

impl Case {
    pub fn of(token: &str) -> Self {
        let mut cased = token.chars().filter(|c| is_cased(*c)).peekable();
        if cased.peek().is_none() {
            return Case::Mixed;
        }
        let cased: Vec<char> = cased.collect();
        if cased.iter().all(|c| c.is_lowercase()) {
            Case::Lower
        } else if is_title(token) {
            Case::Title
        } else if cased.iter().all(|c| c.is_uppercase()) {
            Case::Upper
        } else {
            Case::Mixed
        }
    }
}

impl ScriptFamily {
    pub fn of(token: &str) -> Self {
        let all_below = |max: u32| token.chars().all(|c| (c as u32) <= max);
        let all_script = |script: Script| token.chars().all(|c| c.script() == script);

        if all_below(0x7F) {
            ScriptFamily::BasicLatin
        } else if all_below(0xFF) {
            ScriptFamily::LatinSupplement
        } else if all_below(0x24F) {
            ScriptFamily::LatinExtended
        } else if all_script(Script::Arabic) {
            ScriptFamily::Arabic
        } else if all_script(Script::Greek) {
            ScriptFamily::Greek
        } else if all_script(Script::Cyrillic) {
            ScriptFamily::Cyrillic
        } else {
            ScriptFamily::Other
        }
    }
}

impl TokenClass {
    pub fn of(token: &str) -> Self {
        if is_alpha(token) {
            TokenClass::Alpha(Case::of(token), ScriptFamily::of(token))
        } else if is_numeric(token) {
            TokenClass::Numeric
        } else if token.chars().all(|c| !c.is_alphanumeric()) {
            TokenClass::Punctuation
        } else {
            TokenClass::Mixed
        }
    }
}

/// Placeholder for a single token.
pub fn placeholder(token: &str) -> String {
    match TokenClass::of(token) {
        TokenClass::Alpha(case, script) => format!("TOKEN:ALPHA:{case}:{script}"),
        TokenClass::Numeric => "TOKEN:NUMERIC".to_string(),
        TokenClass::Punctuation => token.to_string(),
        TokenClass::Mixed => "TOKEN:MIXED".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha() {
        assert_eq!(placeholder("hello"), "TOKEN:ALPHA:LOWER:BASIC_LATIN");
        assert_eq!(placeholder("Paris"), "TOKEN:ALPHA:TITLE:BASIC_LATIN");
        assert_eq!(placeholder("NASA"), "TOKEN:ALPHA:UPPER:BASIC_LATIN");
        assert_eq!(placeholder("iPhone"), "TOKEN:ALPHA:MIXED:BASIC_LATIN");
        assert_eq!(placeholder("A"), "TOKEN:ALPHA:TITLE:BASIC_LATIN");
    }

    #[test]
    fn scripts() {
        assert_eq!(placeholder("café"), "TOKEN:ALPHA:LOWER:LATIN_SUPPLEMENT");
        assert_eq!(placeholder("łódź"), "TOKEN:ALPHA:LOWER:LATIN_EXTENDED");
        assert_eq!(placeholder("Москва"), "TOKEN:ALPHA:TITLE:CYRILIC");
        assert_eq!(placeholder("λόγος"), "TOKEN:ALPHA:LOWER:GREEK");
        assert_eq!(placeholder("سلام"), "TOKEN:ALPHA:MIXED:ARABIC");
        assert_eq!(placeholder("東京"), "TOKEN:ALPHA:MIXED:OTHER");
    }

    #[test]
    fn others() {
        assert_eq!(placeholder("1984"), "TOKEN:NUMERIC");
        assert_eq!(placeholder("..."), "...");
        assert_eq!(placeholder(","), ",");
        assert_eq!(placeholder("3.5"), "TOKEN:MIXED");
        assert_eq!(placeholder("B2B"), "TOKEN:MIXED");
    }
}

//! sentence-level filtering
//!
//! Each rule is a small [Filter] over a raw sentence, returning `false` when the sentence
//! should be discarded. Rules are pure: language-dependent thresholds and compiled
//! patterns are fixed at construction time.
//!
//! Lengths and ratios are computed over unicode codepoints, not bytes.
use regex::Regex;
use unic_ucd::GeneralCategory;

use super::Filter;
use crate::error::Error;
use crate::lang;

/// Rejects empty sentences.
#[derive(Debug, Default)]
pub struct NotEmpty;

impl Filter<&str> for NotEmpty {
    fn detect(&self, sentence: &str) -> bool {
        !sentence.is_empty()
    }
}

/// Rejects single-token sentences (titles, menu items, headers).
#[derive(Debug, Default)]
pub struct NotTitle;

impl Filter<&str> for NotTitle {
    fn detect(&self, sentence: &str) -> bool {
        sentence.trim().split(' ').count() > 1
    }
}

/// Sentences of this many codepoints or more are too long.
pub const MAX_LENGTH: usize = 1024;

/// Maximum length filter.
/// Returns `false` if provided sentence is [MaxLength::max_size] unicode codepoints or more.
///
/// [MaxLength::max_size] is [MAX_LENGTH] by default.
#[derive(Debug)]
pub struct MaxLength {
    max_size: usize,
}

impl MaxLength {
    /// Get a reference to the length's max size.
    pub fn max_size(&self) -> &usize {
        &self.max_size
    }
}

impl Default for MaxLength {
    fn default() -> Self {
        Self {
            max_size: MAX_LENGTH,
        }
    }
}

impl Filter<&str> for MaxLength {
    fn detect(&self, sentence: &str) -> bool {
        sentence.chars().count() < self.max_size
    }
}

/// Minimal length filter.
///
/// Requires at least 3 words (counted as 2 blanks, regular or non-breaking)
/// or, for CJK languages, 3 codepoints.
#[derive(Debug, Default)]
pub struct MinLength {
    cjk: bool,
    disabled: bool,
}

impl MinLength {
    pub fn new(lang: &str, disabled: bool) -> Self {
        Self {
            cjk: lang::is_cjk(lang),
            disabled,
        }
    }
}

impl Filter<&str> for MinLength {
    fn detect(&self, sentence: &str) -> bool {
        if self.disabled {
            return true;
        }

        if self.cjk {
            return sentence.chars().count() >= 3;
        }

        sentence
            .chars()
            .filter(|c| *c == ' ' || *c == '\u{00A0}')
            .count()
            >= 2
    }
}

/// Detects mis-decoded text (UTF-8 read as Latin-1 and re-encoded).
///
/// `Ã` and `Â` are the usual markers, unless the language uses them legitimately.
#[derive(Debug, Default)]
pub struct Encoding {
    allow_atilde: bool,
    allow_acircumflex: bool,
}

impl Encoding {
    pub fn new(lang: &str) -> Self {
        Self {
            allow_atilde: lang::ATILDE.contains(lang),
            allow_acircumflex: lang::ACIRCUMFLEX.contains(lang),
        }
    }
}

impl Filter<&str> for Encoding {
    fn detect(&self, sentence: &str) -> bool {
        if !self.allow_atilde && sentence.contains('Ã') {
            return false;
        }
        if !self.allow_acircumflex && sentence.contains('Â') {
            return false;
        }
        true
    }
}

/// Keeps sentences whose letter ratio is above `threshold` (0.1 by default).
///
/// An empty sentence has no letters and is rejected.
#[derive(Debug)]
pub struct AlphaRatio {
    threshold: f64,
}

impl Default for AlphaRatio {
    fn default() -> Self {
        Self { threshold: 0.1 }
    }
}

impl Filter<&str> for AlphaRatio {
    fn detect(&self, sentence: &str) -> bool {
        let (total, letters) = sentence.chars().fold((0usize, 0usize), |(t, l), c| {
            (t + 1, l + usize::from(GeneralCategory::of(c).is_letter()))
        });
        if total == 0 {
            return false;
        }
        letters as f64 / total as f64 > self.threshold
    }
}

/// Keeps sentences whose decimal digit ratio is below `threshold`
/// (0.5, or 0.7 for CJK languages).
#[derive(Debug)]
pub struct DigitRatio {
    threshold: f64,
}

impl DigitRatio {
    pub fn new(lang: &str) -> Self {
        let threshold = if lang::is_cjk(lang) { 0.7 } else { 0.5 };
        Self { threshold }
    }
}

impl Default for DigitRatio {
    fn default() -> Self {
        Self { threshold: 0.5 }
    }
}

impl Filter<&str> for DigitRatio {
    fn detect(&self, sentence: &str) -> bool {
        let (total, digits) = sentence.chars().fold((0usize, 0usize), |(t, d), c| {
            (
                t + 1,
                d + usize::from(GeneralCategory::of(c) == GeneralCategory::DecimalNumber),
            )
        });
        if total == 0 {
            return true;
        }
        (digits as f64 / total as f64) < self.threshold
    }
}

/// Rejects anything that looks like an URL or a domain name.
#[derive(Debug)]
pub struct Urls {
    pattern: Regex,
}

impl Urls {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            pattern: Regex::new(
                r"(https?://.)?(www\.)?[-a-zA-Z0-9@:%._+~#=]{2,256}\.[a-z]{2,6}\b([-a-zA-Z0-9@:%_+.~#?&/=]*)",
            )?,
        })
    }
}

impl Filter<&str> for Urls {
    fn detect(&self, sentence: &str) -> bool {
        !self.pattern.is_match(sentence)
    }
}

/// Breadcrumb navigation heuristic (`Home > Products > Shoes`, `News | Sports | Weather`).
///
/// Keeps a sentence only if it has fewer than 3 separators of the first kind
/// *and* fewer than 2 of the second kind.
#[derive(Debug)]
pub struct Breadcrumbs {
    primary: Regex,
    secondary: Regex,
}

impl Breadcrumbs {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            primary: Regex::new(r"[ ][-/][ ]|[<>*]|[ ]:[ ]")?,
            secondary: Regex::new(r"[ ]»[ ]|[|→←•·¬]")?,
        })
    }
}

impl Filter<&str> for Breadcrumbs {
    fn detect(&self, sentence: &str) -> bool {
        self.primary.find_iter(sentence).count() < 3
            && self.secondary.find_iter(sentence).count() < 2
    }
}

/// Rejects runs of Latin-1 supplement codepoints, typical of mojibake.
///
/// The run length is 3, or 7 for languages with dense diacritics.
#[derive(Debug)]
pub struct UnicodeNoise {
    pattern: Regex,
}

impl UnicodeNoise {
    pub fn new(lang: &str) -> Result<Self, Error> {
        let pattern = if lang::DENSE_DIACRITICS.contains(lang) {
            r"[\x{80}-\x{FF}]{7,}"
        } else {
            r"[\x{80}-\x{FF}]{3,}"
        };
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl Filter<&str> for UnicodeNoise {
    fn detect(&self, sentence: &str) -> bool {
        !self.pattern.is_match(sentence)
    }
}

/// Rejects spaced-out characters (`s p a c e d`).
#[derive(Debug)]
pub struct SpaceNoise {
    pattern: Regex,
}

impl SpaceNoise {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            pattern: Regex::new(r"([ ]\D){4,}[ ]")?,
        })
    }
}

impl Filter<&str> for SpaceNoise {
    fn detect(&self, sentence: &str) -> bool {
        !self.pattern.is_match(sentence)
    }
}

/// Bracket sanity.
///
/// `[]`, `{}` and `⟨⟩` must be balanced and appear at most 6 times in total (per pair).
/// Parentheses only have to be balanced.
#[derive(Debug, Default)]
pub struct Brackets;

impl Brackets {
    const LIMITED: [(char, char); 3] = [('[', ']'), ('{', '}'), ('⟨', '⟩')];
}

impl Filter<&str> for Brackets {
    fn detect(&self, sentence: &str) -> bool {
        let count = |needle: char| sentence.chars().filter(|c| *c == needle).count();

        for (open, close) in Self::LIMITED {
            let (open, close) = (count(open), count(close));
            if open + close > 6 || open != close {
                return false;
            }
        }

        count('(') == count(')')
    }
}

/// Rejects sentences containing markup or template fragments.
#[derive(Debug)]
pub struct Literals {
    literals: &'static [&'static str],
}

impl Default for Literals {
    fn default() -> Self {
        Self {
            literals: &["Re:", "{{", "%s", "}}", "+++", "***", "=\""],
        }
    }
}

impl Filter<&str> for Literals {
    fn detect(&self, sentence: &str) -> bool {
        !self.literals.iter().any(|l| sentence.contains(l))
    }
}

/// Rejects escaped codepoints (`\x41`, `\u00e9`).
#[derive(Debug)]
pub struct EscapedUnicode {
    pattern: Regex,
}

impl EscapedUnicode {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            pattern: Regex::new(r"\\[xu][0-9a-fA-F]{2,}")?,
        })
    }
}

impl Filter<&str> for EscapedUnicode {
    fn detect(&self, sentence: &str) -> bool {
        !self.pattern.is_match(sentence)
    }
}

/// Rejects words glued together (`HomeProductsContact`).
#[derive(Debug)]
pub struct GluedWords {
    pattern: Regex,
}

impl GluedWords {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            pattern: Regex::new(r"(\p{Alphabetic}*\p{Uppercase}\p{Lowercase}+){3}")?,
        })
    }
}

impl Filter<&str> for GluedWords {
    fn detect(&self, sentence: &str) -> bool {
        !self.pattern.is_match(sentence)
    }
}

/// Repeated words or substrings.
///
/// For languages in [lang::SAFE_NOISE_DETECTION], looks for a phrase (starting on a word
/// boundary) immediately repeated after whitespace, case-insensitively (`the cat the cat`).
/// Otherwise, looks for any substring immediately repeated (`abcabc`).
///
/// A repetition only counts if it is longer than 7 codepoints (4 for CJK) once trimmed
/// and contains at least one letter.
///
/// The scan is quadratic, so sentences of [MAX_LENGTH] codepoints or more are not
/// scanned and pass. [MaxLength] already rejects them.
#[derive(Debug)]
pub struct RepeatedWords {
    word_aware: bool,
    min_chars: usize,
}

impl RepeatedWords {
    pub fn new(lang: &str) -> Self {
        Self {
            word_aware: lang::SAFE_NOISE_DETECTION.contains(lang),
            min_chars: if lang::is_cjk(lang) { 4 } else { 7 },
        }
    }

    /// A repetition is meaningful if long enough and not only made of symbols/digits.
    fn is_significant(&self, chars: &[char]) -> bool {
        let matching: String = chars.iter().collect();
        let matching = matching.trim();
        matching.chars().count() > self.min_chars && matching.chars().any(char::is_alphabetic)
    }
}

impl Filter<&str> for RepeatedWords {
    fn detect(&self, sentence: &str) -> bool {
        let chars: Vec<char> = sentence.chars().collect();
        if chars.len() >= MAX_LENGTH {
            return true;
        }
        let matcher = if self.word_aware {
            repeated_phrase
        } else {
            repeated_substring
        };

        let mut pos = 0;
        while pos < chars.len() {
            match matcher(&chars, pos) {
                Some(end) => {
                    if self.is_significant(&chars[pos..end]) {
                        return false;
                    }
                    pos = end;
                }
                None => pos += 1,
            }
        }
        true
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// `\b` at `idx`
fn is_word_boundary(chars: &[char], idx: usize) -> bool {
    let before = idx > 0 && chars.get(idx - 1).map_or(false, |c| is_word_char(*c));
    let after = chars.get(idx).map_or(false, |c| is_word_char(*c));
    before != after
}

fn eq_ignore_case(a: &[char], b: &[char]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| x == y || x.to_lowercase().eq(y.to_lowercase()))
}

/// Longest `P␣+P` at `start`, where `P` starts on a word boundary with a non-blank
/// character, is at least 2 codepoints long, and the repeated `P` ends on a word boundary.
///
/// Returns the (exclusive) end of the whole match.
fn repeated_phrase(chars: &[char], start: usize) -> Option<usize> {
    if chars[start].is_whitespace() || !is_word_boundary(chars, start) {
        return None;
    }

    // P, at least one blank, P
    let remaining = chars.len() - start;
    for len in (2..=remaining.saturating_sub(1) / 2).rev() {
        let phrase_end = start + len;

        let blanks = chars[phrase_end..]
            .iter()
            .take_while(|c| c.is_whitespace())
            .count();
        if blanks == 0 {
            continue;
        }

        let repeat_start = phrase_end + blanks;
        let repeat_end = repeat_start + len;
        if repeat_end > chars.len() {
            continue;
        }

        if is_word_boundary(chars, repeat_start)
            && eq_ignore_case(&chars[start..phrase_end], &chars[repeat_start..repeat_end])
            && is_word_boundary(chars, repeat_end)
        {
            return Some(repeat_end);
        }
    }
    None
}

/// Longest `PP` at `start`. Returns the (exclusive) end of the match.
fn repeated_substring(chars: &[char], start: usize) -> Option<usize> {
    let remaining = chars.len() - start;
    (1..=remaining / 2)
        .rev()
        .find(|len| chars[start..start + len] == chars[start + len..start + 2 * len])
        .map(|len| start + 2 * len)
}

//! Rule cascade.
//!
//! Hard rules are applied in a fixed order, which is part of the behaviour:
//! in [Mode::ShortCircuit] the reported reason is the first failing rule.
//!
//! | # | name | rule |
//! |---|------|------|
//! | 1 | `no_empty` | [NotEmpty] |
//! | 2 | `no_titles` | [NotTitle] |
//! | 3 | `not_too_long` | [MaxLength] |
//! | 4 | `not_too_short` | [MinLength] |
//! | 5 | `no_bad_encoding` | [Encoding] |
//! | 6 | `no_only_symbols` | [AlphaRatio] |
//! | 7 | `no_only_numbers` | [DigitRatio] |
//! | 8 | `no_urls` | [Urls] |
//! | 9 | `no_breadcrumbs` | [Breadcrumbs] |
//! | 10 | `no_unicode_noise` | [UnicodeNoise] |
//! | 11 | `no_space_noise` | [SpaceNoise] |
//! | 12 | `no_paren` | [Brackets] |
//! | 13 | `no_literals` | [Literals] |
//! | 14 | `no_escaped_unicode` | [EscapedUnicode] |
//! | 15 | `no_glued_words` | [GluedWords] |
//! | 16 | `no_repeated_words` | [RepeatedWords] |
//!
//! Language identification (`no_wrong_language`) is not a rule of the cascade,
//! see [crate::identifiers::LangIdStage].
use std::fmt;

use itertools::Itertools;
use log::debug;

use super::sentence::{
    AlphaRatio, Brackets, Breadcrumbs, DigitRatio, Encoding, EscapedUnicode, GluedWords, Literals,
    MaxLength, MinLength, NotEmpty, NotTitle, RepeatedWords, SpaceNoise, UnicodeNoise, Urls,
};
use super::Filter;
use crate::error::Error;

type BoxedFilter = Box<dyn for<'a> Filter<&'a str> + Send + Sync>;

/// Cascade evaluation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Stop at the first failing rule.
    #[default]
    ShortCircuit,
    /// Run every rule and report every failure.
    Accumulate,
}

/// Cascade configuration, bound at start-up.
#[derive(Debug, Clone, Default)]
pub struct CascadeOptions {
    pub language: String,
    pub disable_minimal_length: bool,
    pub mode: Mode,
}

/// Outcome of a single rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleResult {
    pub name: &'static str,
    pub passed: bool,
}

/// Cascade outcome: either kept, or the names of the failing rules, in cascade order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Keep,
    Discard(Vec<&'static str>),
}

impl Tag {
    pub fn is_keep(&self) -> bool {
        matches!(self, Tag::Keep)
    }

    /// Add a failing reason.
    pub fn push(&mut self, reason: &'static str) {
        match self {
            Tag::Keep => *self = Tag::Discard(vec![reason]),
            Tag::Discard(reasons) => reasons.push(reason),
        }
    }

    /// Failing reasons, empty if kept.
    pub fn reasons(&self) -> &[&'static str] {
        match self {
            Tag::Keep => &[],
            Tag::Discard(reasons) => reasons,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Keep => write!(f, "keep"),
            Tag::Discard(reasons) => write!(f, "{}", reasons.iter().join("+")),
        }
    }
}

struct Rule {
    name: &'static str,
    filter: BoxedFilter,
}

impl Rule {
    fn new<F>(name: &'static str, filter: F) -> Self
    where
        F: for<'a> Filter<&'a str> + Send + Sync + 'static,
    {
        Self {
            name,
            filter: Box::new(filter),
        }
    }
}

/// Ordered list of named hard rules.
pub struct RuleCascade {
    rules: Vec<Rule>,
    mode: Mode,
}

impl RuleCascade {
    /// Build the cascade for a language.
    ///
    /// # Errors
    /// Fails if one of the rule patterns does not compile.
    pub fn new(options: &CascadeOptions) -> Result<Self, Error> {
        let lang = options.language.as_str();
        let rules = vec![
            Rule::new("no_empty", NotEmpty),
            Rule::new("no_titles", NotTitle),
            Rule::new("not_too_long", MaxLength::default()),
            Rule::new("not_too_short", MinLength::new(lang, options.disable_minimal_length)),
            Rule::new("no_bad_encoding", Encoding::new(lang)),
            Rule::new("no_only_symbols", AlphaRatio::default()),
            Rule::new("no_only_numbers", DigitRatio::new(lang)),
            Rule::new("no_urls", Urls::new()?),
            Rule::new("no_breadcrumbs", Breadcrumbs::new()?),
            Rule::new("no_unicode_noise", UnicodeNoise::new(lang)?),
            Rule::new("no_space_noise", SpaceNoise::new()?),
            Rule::new("no_paren", Brackets),
            Rule::new("no_literals", Literals::default()),
            Rule::new("no_escaped_unicode", EscapedUnicode::new()?),
            Rule::new("no_glued_words", GluedWords::new()?),
            Rule::new("no_repeated_words", RepeatedWords::new(lang)),
        ];

        debug!("built cascade of {} rules for {lang}", rules.len());

        Ok(Self {
            rules,
            mode: options.mode,
        })
    }

    /// Rule names, in evaluation order.
    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.name)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Run every rule, regardless of the mode.
    pub fn results(&self, sentence: &str) -> Vec<RuleResult> {
        self.rules
            .iter()
            .map(|rule| RuleResult {
                name: rule.name,
                passed: rule.filter.detect(sentence),
            })
            .collect()
    }

    /// Evaluate sentence according to the cascade mode.
    pub fn evaluate(&self, sentence: &str) -> Tag {
        let mut tag = Tag::Keep;
        for rule in &self.rules {
            if !rule.filter.detect(sentence) {
                tag.push(rule.name);
                if self.mode == Mode::ShortCircuit {
                    break;
                }
            }
        }
        tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cascade(lang: &str, mode: Mode) -> RuleCascade {
        RuleCascade::new(&CascadeOptions {
            language: lang.to_string(),
            disable_minimal_length: false,
            mode,
        })
        .unwrap()
    }

    #[test]
    fn order() {
        let c = cascade("en", Mode::ShortCircuit);
        let names: Vec<_> = c.rule_names().collect();
        assert_eq!(
            names,
            vec![
                "no_empty",
                "no_titles",
                "not_too_long",
                "not_too_short",
                "no_bad_encoding",
                "no_only_symbols",
                "no_only_numbers",
                "no_urls",
                "no_breadcrumbs",
                "no_unicode_noise",
                "no_space_noise",
                "no_paren",
                "no_literals",
                "no_escaped_unicode",
                "no_glued_words",
                "no_repeated_words",
            ]
        );
    }

    #[test]
    fn empty_short_circuit() {
        let c = cascade("en", Mode::ShortCircuit);
        assert_eq!(c.evaluate("").to_string(), "no_empty");
    }

    #[test]
    fn empty_accumulate() {
        let c = cascade("en", Mode::Accumulate);
        let tag = c.evaluate("");
        assert_eq!(
            tag.reasons(),
            &["no_empty", "no_titles", "not_too_short", "no_only_symbols"]
        );
        assert_eq!(
            tag.to_string(),
            "no_empty+no_titles+not_too_short+no_only_symbols"
        );
    }

    #[test]
    fn single_word() {
        for mode in [Mode::ShortCircuit, Mode::Accumulate] {
            let c = cascade("en", mode);
            let tag = c.evaluate("Hello");
            assert!(!tag.is_keep());
            assert!(tag.reasons().contains(&"no_titles"));
        }
    }

    #[test]
    fn accumulate_in_order() {
        let c = cascade("en", Mode::Accumulate);
        let tag = c.evaluate("http://example.com/page");
        assert_eq!(
            tag.reasons(),
            &["no_titles", "not_too_short", "no_urls"]
        );

        let c = cascade("en", Mode::ShortCircuit);
        assert_eq!(c.evaluate("http://example.com/page").to_string(), "no_titles");
    }

    #[test]
    fn brackets_reason() {
        let c = cascade("en", Mode::Accumulate);
        assert!(c.evaluate("[[[[[[[a").reasons().contains(&"no_paren"));
    }

    #[test]
    fn keep() {
        let c = cascade("fr", Mode::Accumulate);
        let results = c.results("Le chat dort bien.");
        assert!(results.iter().all(|r| r.passed), "{results:?}");
        assert_eq!(c.evaluate("Le chat dort bien."), Tag::Keep);
        assert_eq!(Tag::Keep.to_string(), "keep");
    }

    #[test]
    fn minimal_length_disabled() {
        let c = RuleCascade::new(&CascadeOptions {
            language: "en".to_string(),
            disable_minimal_length: true,
            mode: Mode::Accumulate,
        })
        .unwrap();
        assert_eq!(c.evaluate("Hello there"), Tag::Keep);
    }

    #[test]
    fn tag_push() {
        let mut tag = Tag::Keep;
        tag.push("no_urls");
        tag.push("no_wrong_language");
        assert_eq!(tag.to_string(), "no_urls+no_wrong_language");
    }
}

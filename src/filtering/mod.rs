/*! Filtering utilities

Filters operate on raw sentences, before any normalization or tokenization.

Each hard rule implements [Filter] (see [sentence] for the rules themselves),
and [RuleCascade] chains them in a fixed, explicit order.
! */
mod cascade;
mod filter;
pub mod sentence;

pub use cascade::{CascadeOptions, Mode, RuleCascade, RuleResult, Tag};
pub use filter::Filter;

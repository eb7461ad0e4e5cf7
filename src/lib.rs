/*! # monoclean

Sentence-level filtering and fluency scoring of monolingual corpora.

Sentences go through a cascade of hard rules ([filtering]), an optional language
identification step ([identifiers]) and are scored by a calibrated character or
placeholder language model ([scoring]). Models are trained with [training].

This crate can be used both as a tool (see the `monoclean` binary) or as a library.
!*/
pub mod error;
pub mod filtering;
pub mod identifiers;
pub mod lang;
pub mod lm;
pub mod metadata;
pub mod pipelines;
pub mod preprocess;
pub mod scoring;
pub mod training;

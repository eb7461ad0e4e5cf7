//! Sentence cleaning pipeline.
//!
//! Reads tab-separated lines, extracts the sentence column and annotates each line with:
//! 1. the hard rules verdict ([RuleCascade]),
//! 1. the identified language ([LangIdStage]), when enabled,
//! 1. a fluency score ([FluencyScorer]) for kept sentences, or a binary keep/discard score.
//!
//! Lines are processed in parallel by batches; output order is input order.
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use rayon::prelude::*;

use super::Pipeline;
use crate::error::Error;
use crate::filtering::{Mode, RuleCascade, Tag};
use crate::identifiers::{Identification, LangIdStage};
use crate::scoring::FluencyScorer;

/// Annotation added when the identified language is not the expected one.
pub const NO_WRONG_LANGUAGE: &str = "no_wrong_language";

/// How kept sentences are scored.
pub enum Scoring {
    /// Calibrated language model score, `0` for discarded sentences.
    Fluency(FluencyScorer),
    /// `1` for kept sentences, `0` otherwise.
    Binary,
}

#[derive(Debug, Clone)]
pub struct CleanerOptions {
    /// Sentence column, starting at 1.
    pub scol: usize,
    /// Keep every sentence, ignore language mismatches.
    pub disable_hardrules: bool,
    /// Only output the score (and requested annotations).
    pub score_only: bool,
    /// Output the identified language.
    pub add_lang_ident: bool,
    /// Output the hard rules tag.
    pub annotated_output: bool,
    /// Number of lines processed in parallel at once.
    pub batch_size: usize,
}

impl Default for CleanerOptions {
    fn default() -> Self {
        Self {
            scol: 1,
            disable_hardrules: false,
            score_only: false,
            add_lang_ident: false,
            annotated_output: false,
            batch_size: 10_000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Input lines.
    pub lines: usize,
    /// Output records.
    pub written: usize,
    /// Lines without enough columns.
    pub skipped: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.lines as f64 / secs
        } else {
            0.0
        }
    }
}

pub struct Cleaner {
    cascade: RuleCascade,
    langid: Option<LangIdStage>,
    scoring: Scoring,
    options: CleanerOptions,
}

impl Cleaner {
    /// # Errors
    /// Fails if `scol` or `batch_size` is zero.
    pub fn new(
        cascade: RuleCascade,
        langid: Option<LangIdStage>,
        scoring: Scoring,
        mut options: CleanerOptions,
    ) -> Result<Self, Error> {
        if options.scol == 0 {
            return Err(Error::Config("sentence column starts at 1".to_string()));
        }
        if options.batch_size == 0 {
            return Err(Error::Config("batch size must be positive".to_string()));
        }
        if langid.is_none() && options.add_lang_ident {
            warn!("language identification is disabled, not adding identified languages");
            options.add_lang_ident = false;
        }

        Ok(Self {
            cascade,
            langid,
            scoring,
            options,
        })
    }

    fn tag(&self, sentence: &str) -> Tag {
        if self.options.disable_hardrules {
            Tag::Keep
        } else {
            self.cascade.evaluate(sentence)
        }
    }

    /// Annotate a single line.
    ///
    /// Returns `None` if the line does not have enough columns.
    pub fn process_line(&self, line: &str, line_number: usize) -> Result<Option<String>, Error> {
        let columns: Vec<&str> = line.split('\t').collect();
        let sentence = match columns.get(self.options.scol - 1) {
            Some(sentence) => *sentence,
            None => {
                error!(
                    "scol ({}) index above column number ({}) on line {}",
                    self.options.scol,
                    columns.len(),
                    line_number
                );
                return Ok(None);
            }
        };

        let mut tag = self.tag(sentence);

        // accumulate mode always reports a language mismatch
        let accumulate = !self.options.disable_hardrules && self.cascade.mode() == Mode::Accumulate;

        let mut identification: Option<Identification> = None;
        if let Some(langid) = &self.langid {
            if self.options.add_lang_ident || tag.is_keep() || accumulate {
                let id = langid.run(sentence)?;
                if !self.options.disable_hardrules
                    && !id.matches_expected
                    && (tag.is_keep() || accumulate)
                {
                    tag.push(NO_WRONG_LANGUAGE);
                }
                identification = Some(id);
            }
        }

        let score = match &self.scoring {
            Scoring::Fluency(scorer) if tag.is_keep() => format!("{:.3}", scorer.score(sentence)?),
            Scoring::Fluency(_) => "0".to_string(),
            Scoring::Binary if tag.is_keep() => "1".to_string(),
            Scoring::Binary => "0".to_string(),
        };

        let language = identification.map(|id| id.language).unwrap_or_else(|| {
            self.langid
                .as_ref()
                .map(|l| l.expected().to_string())
                .unwrap_or_default()
        });

        let mut record: Vec<String> = Vec::with_capacity(4);
        if !self.options.score_only {
            record.push(line.to_string());
        }
        if self.options.add_lang_ident {
            record.push(language);
        }
        record.push(score);
        if self.options.annotated_output {
            record.push(tag.to_string());
        }

        Ok(Some(record.join("\t")))
    }

    /// Annotate every line of `input` into `output`.
    pub fn run<R: BufRead, W: Write>(&self, input: R, mut output: W) -> Result<RunSummary, Error> {
        let start = Instant::now();
        info!("start scoring text");

        let mut summary = RunSummary::default();
        let mut lines = input.lines();
        loop {
            let batch: Vec<String> = lines
                .by_ref()
                .take(self.options.batch_size)
                .collect::<Result<_, _>>()?;
            if batch.is_empty() {
                break;
            }

            let offset = summary.lines;
            summary.lines += batch.len();
            debug!("batch of {} lines", batch.len());

            let records: Vec<Option<String>> = batch
                .par_iter()
                .enumerate()
                .map(|(idx, line)| self.process_line(line, offset + idx + 1))
                .collect::<Result<_, Error>>()?;

            for record in records {
                match record {
                    Some(record) => {
                        writeln!(output, "{record}")?;
                        summary.written += 1;
                    }
                    None => summary.skipped += 1,
                }
            }
        }
        output.flush()?;

        summary.elapsed = start.elapsed();
        info!("finished");
        info!("input lines: {} rows", summary.lines);
        if summary.skipped > 0 {
            warn!("skipped lines: {} rows", summary.skipped);
        }
        info!("elapsed time {:.2} s", summary.elapsed.as_secs_f64());
        info!("throughput: {} rows/s", summary.throughput() as u64);

        Ok(summary)
    }
}

/// Runs a [Cleaner] from a file or stdin, into a file or stdout.
pub struct CleanerPipeline {
    src: Option<PathBuf>,
    dst: Option<PathBuf>,
    cleaner: Cleaner,
}

impl CleanerPipeline {
    pub fn new(src: Option<PathBuf>, dst: Option<PathBuf>, cleaner: Cleaner) -> Self {
        Self { src, dst, cleaner }
    }
}

impl Pipeline<RunSummary> for CleanerPipeline {
    fn run(&self) -> Result<RunSummary, Error> {
        let input: Box<dyn BufRead> = match &self.src {
            Some(src) => Box::new(BufReader::new(File::open(src)?)),
            None => Box::new(io::stdin().lock()),
        };
        let output: Box<dyn Write> = match &self.dst {
            Some(dst) => Box::new(BufWriter::new(File::create(dst)?)),
            None => Box::new(BufWriter::new(io::stdout().lock())),
        };

        let summary = self.cleaner.run(input, output)?;
        match &self.dst {
            Some(dst) => info!("output file: {:?}", dst),
            None => info!("output file: <stdout>"),
        }
        Ok(summary)
    }
}

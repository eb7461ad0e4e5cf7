//! Back-off n-gram model read from an ARPA file.
//!
//! Probabilities are stored as in the file (log10). Unknown words map to `<unk>`.
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};

use super::LanguageModel;
use crate::error::Error;

const BOS: &str = "<s>";
const EOS: &str = "</s>";
const UNK: &str = "<unk>";

/// Probability of words absent from the vocabulary when there is no `<unk>` entry.
const UNKNOWN_PROB: f32 = -100.0;

#[derive(Debug, Clone, Copy)]
struct Entry {
    prob: f32,
    backoff: f32,
}

#[derive(Debug)]
pub struct ArpaModel {
    vocab: HashMap<String, u32>,
    /// `ngrams[n - 1]` holds the n-grams.
    ngrams: Vec<HashMap<Vec<u32>, Entry>>,
    unk: Option<u32>,
}

fn parse_error(line_number: usize, msg: &str) -> Error {
    Error::Model(format!("arpa line {}: {msg}", line_number + 1))
}

impl ArpaModel {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let reader = BufReader::new(File::open(path)?);
        Self::from_reader(reader)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut vocab: HashMap<String, u32> = HashMap::new();
        let mut ngrams: Vec<HashMap<Vec<u32>, Entry>> = Vec::new();
        let mut seen_header = false;
        let mut section: Option<usize> = None;

        for (line_number, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if !seen_header {
                if line == "\\data\\" {
                    seen_header = true;
                    continue;
                }
                return Err(Error::Model(
                    "not an ARPA file (binary KenLM models need the `kenlm` feature)".to_string(),
                ));
            }

            if line == "\\end\\" {
                break;
            }

            if let Some(order) = line
                .strip_prefix('\\')
                .and_then(|l| l.strip_suffix("-grams:"))
            {
                let order: usize = order
                    .parse()
                    .map_err(|_| parse_error(line_number, "invalid section"))?;
                if order != ngrams.len() + 1 {
                    return Err(parse_error(line_number, "unexpected section order"));
                }
                ngrams.push(HashMap::new());
                section = Some(order);
                continue;
            }

            let order = match section {
                Some(order) => order,
                // `ngram n=count` lines
                None => continue,
            };

            let mut fields = line.split_whitespace();
            let prob: f32 = fields
                .next()
                .and_then(|p| p.parse().ok())
                .ok_or_else(|| parse_error(line_number, "invalid probability"))?;
            let fields: Vec<&str> = fields.collect();

            let (words, backoff) = if fields.len() == order + 1 {
                let backoff: f32 = fields[order]
                    .parse()
                    .map_err(|_| parse_error(line_number, "invalid backoff"))?;
                (&fields[..order], backoff)
            } else if fields.len() == order {
                (&fields[..], 0.0)
            } else {
                return Err(parse_error(line_number, "wrong number of words"));
            };

            let key = words
                .iter()
                .map(|w| {
                    let next_id = vocab.len() as u32;
                    *vocab.entry(w.to_string()).or_insert(next_id)
                })
                .collect();
            ngrams[order - 1].insert(key, Entry { prob, backoff });
        }

        if ngrams.is_empty() {
            return Err(Error::Model("ARPA file holds no n-grams".to_string()));
        }

        let unk = vocab.get(UNK).copied();
        if unk.is_none() {
            warn!("language model has no {UNK} entry");
        }
        debug!(
            "loaded {}-gram model, {} words",
            ngrams.len(),
            vocab.len()
        );

        Ok(Self { vocab, ngrams, unk })
    }

    pub fn order(&self) -> usize {
        self.ngrams.len()
    }

    fn id(&self, word: &str) -> Option<u32> {
        self.vocab.get(word).copied().or(self.unk)
    }

    /// log10 p(word | history), history being oldest first.
    fn log_prob(&self, history: &[Option<u32>], word: Option<u32>) -> f32 {
        let word = match word {
            Some(word) => word,
            None => return UNKNOWN_PROB,
        };

        let mut backoff = 0.0;
        for start in 0..=history.len() {
            let context = &history[start..];
            // an unknown word in the context cannot be part of an n-gram
            let context: Option<Vec<u32>> = context.iter().copied().collect();
            let mut key = match context {
                Some(context) => context,
                None => continue,
            };

            key.push(word);
            if let Some(entry) = self.ngrams[key.len() - 1].get(&key) {
                return backoff + entry.prob;
            }

            key.pop();
            if !key.is_empty() {
                if let Some(entry) = self.ngrams[key.len() - 1].get(&key) {
                    backoff += entry.backoff;
                }
            }
        }

        backoff + UNKNOWN_PROB
    }
}

impl LanguageModel for ArpaModel {
    fn score(&self, tokens: &[String]) -> f32 {
        let max_history = self.order() - 1;
        let mut history: Vec<Option<u32>> = vec![self.vocab.get(BOS).copied()];
        let mut total = 0.0;

        let words = tokens
            .iter()
            .map(|t| self.id(t))
            .chain(std::iter::once(self.vocab.get(EOS).copied()));

        for word in words {
            if history.len() > max_history {
                history.drain(..history.len() - max_history);
            }
            total += self.log_prob(&history, word);
            history.push(word);
        }

        total
    }
}

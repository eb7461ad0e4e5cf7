//! KenLM backend.
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use ctclib::Model;

use super::LanguageModel;
use crate::error::Error;

/// KenLM model (binary or ARPA).
///
/// Queries go through a lock.
pub struct KenLm {
    model: Mutex<Model>,
}

impl KenLm {
    pub fn new(path: &Path) -> Result<Self, Error> {
        let model = Model::new(path)
            .map_err(|e| Error::Model(format!("could not load {:?}: {:?}", path, e)))?;
        Ok(Self {
            model: Mutex::new(model),
        })
    }
}

impl LanguageModel for KenLm {
    fn score(&self, tokens: &[String]) -> f32 {
        let mut model = self.model.lock().unwrap_or_else(PoisonError::into_inner);
        let token_ids: Vec<_> = tokens
            .iter()
            .map(|tok| model.vocab().index(tok.as_str()))
            .collect();

        let mut total = 0f32;
        let mut state = model.begin_context();
        for token_id in token_ids {
            let (new_state, score) = model.base_score(&state, token_id);
            total += score;
            state = new_state;
        }
        let end = model.vocab().end_sentence();
        let (_, score) = model.base_score(&state, end);
        total + score
    }
}


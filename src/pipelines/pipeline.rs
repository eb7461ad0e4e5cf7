//! Pipeline trait.
use crate::error::Error;

/// Implemented by top-level runs (scoring a file, training a model),
/// generic over what the run returns.
pub trait Pipeline<T> {
    fn run(&self) -> Result<T, Error>;
}

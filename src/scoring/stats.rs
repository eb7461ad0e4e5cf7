//! Calibration statistics and perplexity-to-score mapping.
use log::warn;

use crate::error::Error;

/// Mean and standard deviation of the perplexity proxy on clean and noisy dev sets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationStats {
    pub clean_mean: f64,
    pub clean_stddev: f64,
    pub noisy_mean: f64,
    pub noisy_stddev: f64,
}

/// Mean and population standard deviation.
///
/// # Errors
/// Fails on an empty sample.
pub fn mean_stddev(values: &[f64]) -> Result<(f64, f64), Error> {
    if values.is_empty() {
        return Err(Error::Custom(
            "cannot compute statistics on an empty sample".to_string(),
        ));
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Ok((mean, variance.sqrt()))
}

impl CalibrationStats {
    pub fn new(clean_mean: f64, clean_stddev: f64, noisy_mean: f64, noisy_stddev: f64) -> Self {
        Self {
            clean_mean,
            clean_stddev,
            noisy_mean,
            noisy_stddev,
        }
    }

    /// Compute stats from clean and noisy samples.
    pub fn from_samples(clean: &[f64], noisy: &[f64]) -> Result<Self, Error> {
        let (clean_mean, clean_stddev) = mean_stddev(clean)?;
        let (noisy_mean, noisy_stddev) = mean_stddev(noisy)?;
        Ok(Self::new(clean_mean, clean_stddev, noisy_mean, noisy_stddev))
    }

    /// Proxy values above this map to 1.
    pub fn upper_limit(&self) -> f64 {
        self.clean_mean + self.clean_stddev
    }

    /// Proxy values below this map to 0.
    pub fn lower_limit(&self) -> f64 {
        self.noisy_mean - self.noisy_stddev
    }

    /// Maps to 0.5.
    pub fn middle_point(&self) -> f64 {
        self.clean_mean + (self.noisy_mean - self.clean_mean) / 2.0
    }

    /// `true` when noisy text does not score lower than clean text,
    /// in which case the curve is meaningless.
    pub fn is_degenerate(&self) -> bool {
        self.noisy_mean >= self.clean_mean || self.upper_limit() <= self.lower_limit()
    }

    /// Log a warning if stats are degenerate. Returns `true` if they are.
    pub fn warn_if_degenerate(&self) -> bool {
        let degenerate = self.is_degenerate();
        if degenerate {
            warn!(
                "degenerate calibration: clean mean {:.4}, noisy mean {:.4}. Scores will not be meaningful.",
                self.clean_mean, self.noisy_mean
            );
        }
        degenerate
    }

    /// Piecewise-linear mapping of a perplexity proxy onto [0, 1].
    pub fn perplexity_to_score(&self, perp: f64) -> f64 {
        let upper = self.upper_limit();
        let lower = self.lower_limit();
        let middle = self.middle_point();

        let score = if perp > upper {
            1.0
        } else if perp < lower {
            0.0
        } else if perp < middle {
            0.5 - ((perp - middle) / (lower - middle)) * 0.5
        } else {
            1.0 - ((perp - upper) / (middle - upper)) * 0.5
        };

        // degenerate stats can make the segments overshoot
        if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 1.0)
        }
    }
}

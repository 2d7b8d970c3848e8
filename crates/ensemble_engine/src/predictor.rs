//! The predictor seam: anything that maps the current tensor to a
//! predicted next-position tensor.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::tensor::ProbabilityTensor;

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("prediction failed: {0}")]
    Failed(String),
    #[error("predictor unavailable")]
    Unavailable,
}

/// A move-predicting model. Output is raw flat scores; the resolver checks
/// the shape before using them.
pub trait Predictor: Send + Sync {
    fn name(&self) -> &str;

    fn predict(&self, input: &ProbabilityTensor) -> Result<Vec<f32>, PredictorError>;
}

/// Adapts a closure into a [`Predictor`].
pub struct FnPredictor<F> {
    name: String,
    f: F,
}

impl<F> FnPredictor<F>
where
    F: Fn(&ProbabilityTensor) -> Result<Vec<f32>, PredictorError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Predictor for FnPredictor<F>
where
    F: Fn(&ProbabilityTensor) -> Result<Vec<f32>, PredictorError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, input: &ProbabilityTensor) -> Result<Vec<f32>, PredictorError> {
        (self.f)(input)
    }
}

/// Baseline that echoes its input with uniform noise in `[0, amplitude)`
/// added to every score. Lets the pipeline run without any model.
///
/// An amplitude of zero or below echoes the input unchanged; a NaN or
/// infinite amplitude makes every call fail.
pub struct NoisyEchoPredictor {
    name: String,
    amplitude: f32,
    rng: Mutex<StdRng>,
}

impl NoisyEchoPredictor {
    pub fn new(name: impl Into<String>, amplitude: f32) -> Self {
        Self::with_rng(name, amplitude, StdRng::from_entropy())
    }

    /// Reproducible noise.
    pub fn seeded(name: impl Into<String>, amplitude: f32, seed: u64) -> Self {
        Self::with_rng(name, amplitude, StdRng::seed_from_u64(seed))
    }

    fn with_rng(name: impl Into<String>, amplitude: f32, rng: StdRng) -> Self {
        Self {
            name: name.into(),
            amplitude,
            rng: Mutex::new(rng),
        }
    }
}

impl Predictor for NoisyEchoPredictor {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, input: &ProbabilityTensor) -> Result<Vec<f32>, PredictorError> {
        let mut scores = input.as_slice().to_vec();
        if !self.amplitude.is_finite() {
            return Err(PredictorError::Failed(format!(
                "noise amplitude {} is not finite",
                self.amplitude
            )));
        }
        if self.amplitude <= 0.0 {
            return Ok(scores);
        }
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| PredictorError::Failed("noise source poisoned".to_string()))?;
        for s in &mut scores {
            *s += rng.gen_range(0.0..self.amplitude);
        }
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;
    use crate::scorer::matches;

    #[test]
    fn test_fn_predictor_forwards() {
        let p = FnPredictor::new("echo", |t: &ProbabilityTensor| Ok(t.as_slice().to_vec()));
        let start = Position::startpos();
        assert_eq!(p.name(), "echo");
        assert_eq!(p.predict(&start.tensor()).unwrap(), start.tensor().into_vec());
    }

    #[test]
    fn test_noisy_echo_keeps_argmax() {
        let p = NoisyEchoPredictor::seeded("noise", 0.4, 7);
        let start = Position::startpos();
        let out = ProbabilityTensor::from_flat(p.predict(&start.tensor()).unwrap()).unwrap();
        assert_ne!(out, start.tensor());
        assert!(matches(&out, &start.grid));
    }

    #[test]
    fn test_noisy_echo_is_reproducible() {
        let input = Position::startpos().tensor();
        let a = NoisyEchoPredictor::seeded("a", 0.1, 42).predict(&input).unwrap();
        let b = NoisyEchoPredictor::seeded("b", 0.1, 42).predict(&input).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_amplitude_is_plain_echo() {
        let input = Position::startpos().tensor();
        let out = NoisyEchoPredictor::new("flat", 0.0).predict(&input).unwrap();
        assert_eq!(out, input.into_vec());
    }

    #[test]
    fn test_non_finite_amplitude_fails() {
        let input = Position::startpos().tensor();
        for amplitude in [f32::INFINITY, f32::NEG_INFINITY, f32::NAN] {
            let result = NoisyEchoPredictor::seeded("wild", amplitude, 1).predict(&input);
            assert!(
                matches!(result, Err(PredictorError::Failed(_))),
                "amplitude {amplitude}"
            );
        }
    }
}

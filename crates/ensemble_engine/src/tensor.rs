//! Per-square score tensor exchanged with predictors.
//!
//! Layout is square-major: the 13 category scores of square 0 (`a8`) come
//! first, then square 1, and so on, for 64 × 13 = 832 values. Scores are
//! expected to be non-negative and need not sum to one.

use std::ops::AddAssign;

use crate::error::{EngineError, Result};
use crate::grid::{CATEGORIES, CategoricalGrid, SQUARES, Square};

/// Total number of scores in a tensor.
pub const TENSOR_LEN: usize = SQUARES * CATEGORIES;

#[derive(Clone, Debug, PartialEq)]
pub struct ProbabilityTensor {
    scores: Vec<f32>,
}

impl Default for ProbabilityTensor {
    fn default() -> Self {
        Self::zeros()
    }
}

impl ProbabilityTensor {
    pub fn zeros() -> Self {
        Self {
            scores: vec![0.0; TENSOR_LEN],
        }
    }

    /// Build from a flat square-major buffer of exactly 832 finite scores.
    pub fn from_flat(scores: Vec<f32>) -> Result<Self> {
        if scores.len() != TENSOR_LEN {
            return Err(EngineError::Decode(format!(
                "expected {TENSOR_LEN} scores, got {}",
                scores.len()
            )));
        }
        if let Some(i) = scores.iter().position(|v| !v.is_finite()) {
            return Err(EngineError::Decode(format!(
                "non-finite score at square {} category {}",
                i / CATEGORIES,
                i % CATEGORIES
            )));
        }
        Ok(Self { scores })
    }

    /// Build from 64 per-square score vectors of 13 entries each.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        if rows.len() != SQUARES {
            return Err(EngineError::Decode(format!(
                "expected {SQUARES} squares, got {}",
                rows.len()
            )));
        }
        if let Some((sq, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != CATEGORIES) {
            return Err(EngineError::Decode(format!(
                "square {sq} has {} categories, expected {CATEGORIES}",
                row.len()
            )));
        }
        Self::from_flat(rows.concat())
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.scores
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.scores
    }

    pub fn square(&self, sq: Square) -> &[f32] {
        let start = sq.index() * CATEGORIES;
        &self.scores[start..start + CATEGORIES]
    }

    pub fn square_mut(&mut self, sq: Square) -> &mut [f32] {
        let start = sq.index() * CATEGORIES;
        &mut self.scores[start..start + CATEGORIES]
    }

    pub fn squares(&self) -> impl Iterator<Item = &[f32]> {
        self.scores.chunks_exact(CATEGORIES)
    }

    /// Dot product of the flattened tensors.
    pub fn dot(&self, other: &ProbabilityTensor) -> f32 {
        self.scores
            .iter()
            .zip(&other.scores)
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Dot product with the one-hot encoding of `grid`, without building it.
    pub fn dot_grid(&self, grid: &CategoricalGrid) -> f32 {
        self.squares()
            .zip(grid.labels())
            .map(|(scores, label)| scores[label.index()])
            .sum()
    }
}

impl AddAssign<&ProbabilityTensor> for ProbabilityTensor {
    fn add_assign(&mut self, rhs: &ProbabilityTensor) {
        for (a, b) in self.scores.iter_mut().zip(&rhs.scores) {
            *a += b;
        }
    }
}

/// Index of the highest score; the lowest index wins ties.
pub fn argmax(scores: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in scores.iter().enumerate().skip(1) {
        if v > scores[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
#[path = "tensor_tests.rs"]
mod tensor_tests;

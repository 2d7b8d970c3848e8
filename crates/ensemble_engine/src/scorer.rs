//! Confidence and sanity checks on predicted tensors.

use serde::{Deserialize, Serialize};

use crate::codec::tensor_to_grid;
use crate::grid::{CategoricalGrid, Square};
use crate::tensor::{ProbabilityTensor, argmax};

/// How per-square certainty is measured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceMode {
    /// Top score minus the sum of the others.
    #[default]
    Linear,
    /// As `Linear`, on squared scores. Rewards peaked squares, punishes
    /// flat ones.
    Squared,
}

fn margin(scores: &[f32], mode: ConfidenceMode) -> f32 {
    let best = scores.get(argmax(scores)).copied().unwrap_or_default();
    let (top, total) = match mode {
        ConfidenceMode::Linear => (best, scores.iter().sum::<f32>()),
        ConfidenceMode::Squared => (best * best, scores.iter().map(|s| s * s).sum::<f32>()),
    };
    top - (total - top)
}

/// Certainty margin summed over all 64 squares. Higher is more confident.
pub fn confidence(tensor: &ProbabilityTensor, mode: ConfidenceMode) -> f32 {
    tensor.squares().map(|scores| margin(scores, mode)).sum()
}

/// The two squares that differ between `before` and `after`, in board
/// order, or `None` unless exactly two differ.
pub fn moved_squares(before: &CategoricalGrid, after: &CategoricalGrid) -> Option<(Square, Square)> {
    let mut changed = Square::all().filter(|&sq| before.get(sq) != after.get(sq));
    let first = changed.next()?;
    let second = changed.next()?;
    match changed.next() {
        Some(_) => None,
        None => Some((first, second)),
    }
}

/// Certainty margin over the two squares a single-piece move touches.
///
/// 0.0 when the prediction does not read as exactly one piece moving.
pub fn focused_confidence(
    before: &CategoricalGrid,
    prediction: &ProbabilityTensor,
    mode: ConfidenceMode,
) -> f32 {
    match moved_squares(before, &tensor_to_grid(prediction)) {
        Some((a, b)) => margin(prediction.square(a), mode) + margin(prediction.square(b), mode),
        None => 0.0,
    }
}

/// Whether the arg-max form of `tensor` is exactly `grid`.
pub fn matches(tensor: &ProbabilityTensor, grid: &CategoricalGrid) -> bool {
    tensor_to_grid(tensor) == *grid
}

/// True if `after` shows more of some piece than `before` does.
///
/// A single move never adds a piece, except a promotion, so this flags
/// predictions that conjure pieces out of nowhere.
pub fn cloned_piece_detected(before: &ProbabilityTensor, after: &ProbabilityTensor) -> bool {
    let before = tensor_to_grid(before).piece_counts();
    let after = tensor_to_grid(after).piece_counts();
    before.iter().zip(after.iter()).any(|(b, a)| a > b)
}

#[cfg(test)]
#[path = "scorer_tests.rs"]
mod scorer_tests;

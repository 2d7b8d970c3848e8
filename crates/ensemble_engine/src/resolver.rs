//! The ensemble decision cascade.
//!
//! Every predictor is asked for the next position. Their answers are summed
//! and the first tier that lands on a legal candidate decides:
//!
//! 1. `consensus-raw`: the arg-max of all predictions summed.
//! 2. `consensus-legal`: the arg-max of the predictions that were legal.
//! 3. `most-confident-legal`: the single most confident legal prediction.
//! 4. `best-similarity`: the candidate with the largest dot product
//!    against the raw sum. Always decides when candidates exist.
//!
//! A position without legal moves resolves to [`Resolution::NoLegalMoves`]
//! before any predictor is queried.

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::codec::{PositionText, tensor_to_grid};
use crate::config::{EnsembleConfig, FailurePolicy};
use crate::error::{EngineError, Result};
use crate::moves::Move;
use crate::oracle::{Candidate, CandidateSet, OracleAdapter, RulesOracle, StandardRules};
use crate::position::Position;
use crate::predictor::{Predictor, PredictorError};
use crate::scorer::{cloned_piece_detected, confidence};
use crate::tensor::ProbabilityTensor;

/// Which tier of the cascade picked the move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecisionTag {
    ConsensusRaw,
    ConsensusLegal,
    MostConfidentLegal,
    BestSimilarity,
}

impl DecisionTag {
    pub fn as_str(self) -> &'static str {
        match self {
            DecisionTag::ConsensusRaw => "consensus-raw",
            DecisionTag::ConsensusLegal => "consensus-legal",
            DecisionTag::MostConfidentLegal => "most-confident-legal",
            DecisionTag::BestSimilarity => "best-similarity",
        }
    }
}

impl fmt::Display for DecisionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    /// Position after the chosen move.
    pub position: Position,
    pub mv: Move,
    pub tag: DecisionTag,
    /// The tensor the deciding tier looked at.
    pub prediction: ProbabilityTensor,
    /// Predictions that took part in the vote.
    pub votes: usize,
    /// Of those, the ones that matched a legal move.
    pub legal_votes: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    Selected(Selection),
    /// Checkmate or stalemate; the two are not told apart.
    NoLegalMoves,
}

impl Resolution {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Resolution::NoLegalMoves)
    }

    pub fn selection(&self) -> Option<&Selection> {
        match self {
            Resolution::Selected(selection) => Some(selection),
            Resolution::NoLegalMoves => None,
        }
    }
}

/// Sums gathered from one round of predictions.
struct Tally {
    raw_total: ProbabilityTensor,
    legal_total: ProbabilityTensor,
    legal_votes: usize,
    /// Index of the most confident legal prediction.
    most_confident: Option<usize>,
}

impl Tally {
    fn collect(
        input: &ProbabilityTensor,
        candidates: &CandidateSet,
        predictions: &[ProbabilityTensor],
        config: &EnsembleConfig,
    ) -> Self {
        let mut raw_total = ProbabilityTensor::zeros();
        let mut unfiltered = ProbabilityTensor::zeros();
        let mut legal_total = ProbabilityTensor::zeros();
        let mut legal_votes = 0;
        let mut rejected = 0;
        let mut best: Option<(f32, usize)> = None;

        for (i, prediction) in predictions.iter().enumerate() {
            unfiltered += prediction;
            if candidates.find(&tensor_to_grid(prediction)).is_some() {
                raw_total += prediction;
                legal_total += prediction;
                legal_votes += 1;
                let score = confidence(prediction, config.confidence_mode);
                if best.is_none_or(|(top, _)| score > top) {
                    best = Some((score, i));
                }
            } else if config.reject_cloned_pieces && cloned_piece_detected(input, prediction) {
                debug!(prediction = i, "ignoring prediction with a cloned piece");
                rejected += 1;
            } else {
                raw_total += prediction;
            }
        }

        // Nothing left to vote with: fall back to everything.
        if rejected == predictions.len() {
            raw_total = unfiltered;
        }

        Self {
            raw_total,
            legal_total,
            legal_votes,
            most_confident: best.map(|(_, i)| i),
        }
    }
}

/// Picks one legal move from a set of noisy predictions.
pub struct EnsembleResolver<O = StandardRules> {
    adapter: OracleAdapter<O>,
    config: EnsembleConfig,
}

impl EnsembleResolver<StandardRules> {
    pub fn new(config: EnsembleConfig) -> Self {
        Self::with_oracle(StandardRules, config)
    }
}

impl Default for EnsembleResolver<StandardRules> {
    fn default() -> Self {
        Self::new(EnsembleConfig::default())
    }
}

impl<O: RulesOracle> EnsembleResolver<O> {
    pub fn with_oracle(oracle: O, config: EnsembleConfig) -> Self {
        Self {
            adapter: OracleAdapter::new(oracle),
            config,
        }
    }

    pub fn adapter(&self) -> &OracleAdapter<O> {
        &self.adapter
    }

    pub fn config(&self) -> &EnsembleConfig {
        &self.config
    }

    pub fn resolve_text(
        &self,
        text: &PositionText,
        predictors: &[Box<dyn Predictor>],
    ) -> Result<Resolution> {
        self.resolve(&Position::parse(text)?, predictors)
    }

    /// Run one decision cycle for the side to move in `position`.
    pub fn resolve(
        &self,
        position: &Position,
        predictors: &[Box<dyn Predictor>],
    ) -> Result<Resolution> {
        let candidates = self.adapter.enumerate_position(position)?;
        if candidates.is_empty() {
            info!("no legal moves, position is terminal");
            return Ok(Resolution::NoLegalMoves);
        }

        let input = position.tensor();
        let predictions = self.query(&input, predictors)?;
        if predictions.is_empty() {
            return Err(EngineError::NoPredictions);
        }

        let tally = Tally::collect(&input, &candidates, &predictions, &self.config);
        let votes = predictions.len();
        let select = |candidate: &Candidate, tag: DecisionTag, prediction: &ProbabilityTensor| {
            info!(mv = %candidate.mv, tag = %tag, votes, legal_votes = tally.legal_votes, "selected move");
            Resolution::Selected(Selection {
                position: candidate.position.clone(),
                mv: candidate.mv,
                tag,
                prediction: prediction.clone(),
                votes,
                legal_votes: tally.legal_votes,
            })
        };

        if let Some(c) = candidates.find(&tensor_to_grid(&tally.raw_total)) {
            return Ok(select(c, DecisionTag::ConsensusRaw, &tally.raw_total));
        }
        debug!("no consensus in raw predictions");

        if tally.legal_votes > 0 {
            if let Some(c) = candidates.find(&tensor_to_grid(&tally.legal_total)) {
                return Ok(select(c, DecisionTag::ConsensusLegal, &tally.legal_total));
            }
            debug!(legal_votes = tally.legal_votes, "legal predictions disagree");

            if let Some(best) = tally.most_confident.and_then(|i| predictions.get(i))
                && let Some(c) = candidates.find(&tensor_to_grid(best))
            {
                return Ok(select(c, DecisionTag::MostConfidentLegal, best));
            }
        }

        let mut closest: Option<(&Candidate, f32)> = None;
        for c in &candidates {
            let score = tally.raw_total.dot_grid(&c.position.grid);
            if closest.is_none_or(|(_, top)| score > top) {
                closest = Some((c, score));
            }
        }
        match closest {
            Some((c, _)) => Ok(select(c, DecisionTag::BestSimilarity, &tally.raw_total)),
            None => Ok(Resolution::NoLegalMoves),
        }
    }

    /// Ask every predictor, keeping the well-formed answers in predictor
    /// order.
    fn query(
        &self,
        input: &ProbabilityTensor,
        predictors: &[Box<dyn Predictor>],
    ) -> Result<Vec<ProbabilityTensor>> {
        let outcomes: Vec<std::result::Result<Vec<f32>, PredictorError>> = if self.config.parallel {
            predictors.par_iter().map(|p| p.predict(input)).collect()
        } else {
            predictors.iter().map(|p| p.predict(input)).collect()
        };

        let mut predictions = Vec::with_capacity(outcomes.len());
        for (predictor, outcome) in predictors.iter().zip(outcomes) {
            let name = predictor.name();
            match outcome {
                Ok(scores) => match ProbabilityTensor::from_flat(scores) {
                    Ok(tensor) => predictions.push(tensor),
                    Err(e) => warn!(predictor = name, error = %e, "excluding malformed prediction"),
                },
                Err(source) => match self.config.predictor_failure {
                    FailurePolicy::Skip => {
                        warn!(predictor = name, error = %source, "skipping failed predictor");
                    }
                    FailurePolicy::Abort => {
                        return Err(EngineError::Predictor {
                            name: name.to_string(),
                            source,
                        });
                    }
                },
            }
        }
        debug!(
            asked = predictors.len(),
            usable = predictions.len(),
            "collected predictions"
        );
        Ok(predictions)
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod resolver_tests;

//! Weighted scoring model evaluation.
//!
//! [`evaluate`] is a pure function of a decision snapshot: it scores every option, ranks the
//! results, and explains the winner. It never mutates its input and keeps no state between
//! calls, so it is safe to invoke concurrently on shared snapshots.
//!
//! Preconditions: weights and raw scores are finite. Range checks belong to
//! [`super::validation`]; out-of-range values are scored as given.

mod explanation;
mod ranking;
mod scoring;

pub use explanation::generate_explanation;
pub use scoring::score_option;

use super::domain::{CriterionId, Decision, DecisionOption};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub(crate) const NO_OPTIONS_PROVIDED: &str = "No options provided.";
pub(crate) const NO_CRITERIA_DEFINED: &str = "No criteria defined.";

/// One criterion's weighted impact on an option's total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionContribution {
    pub criterion_id: CriterionId,
    /// Display name captured at evaluation time.
    pub criterion: String,
    pub raw: f64,
    pub weight: f64,
    pub contribution: f64,
}

/// Per-criterion contributions in criteria order, keyed by criterion id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreBreakdown(Vec<CriterionContribution>);

impl ScoreBreakdown {
    pub fn new(entries: Vec<CriterionContribution>) -> Self {
        Self(entries)
    }

    pub fn get(&self, criterion: &CriterionId) -> Option<&CriterionContribution> {
        self.0.iter().find(|entry| &entry.criterion_id == criterion)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CriterionContribution> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Copy of an option carrying its computed total and breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedOption {
    #[serde(flatten)]
    pub option: DecisionOption,
    pub total_score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Evaluation output: ranking plus a prose explanation of the winner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub ranked_options: Vec<RankedOption>,
    pub explanation: String,
}

impl EvaluationResult {
    fn empty(explanation: &str) -> Self {
        Self {
            ranked_options: Vec::new(),
            explanation: explanation.to_string(),
        }
    }

    pub fn winner(&self) -> Option<&RankedOption> {
        self.ranked_options.first()
    }

    pub fn runner_up(&self) -> Option<&RankedOption> {
        self.ranked_options.get(1)
    }
}

/// Score, rank, and explain every option of `decision`.
pub fn evaluate(decision: &Decision) -> EvaluationResult {
    if decision.options.is_empty() {
        return EvaluationResult::empty(NO_OPTIONS_PROVIDED);
    }
    if decision.criteria.is_empty() {
        return EvaluationResult::empty(NO_CRITERIA_DEFINED);
    }

    let mut ranked_options: Vec<RankedOption> = decision
        .options
        .iter()
        .map(|option| {
            let (total_score, breakdown) = score_option(option, &decision.criteria);
            RankedOption {
                option: option.clone(),
                total_score,
                breakdown,
            }
        })
        .collect();

    ranking::rank(&mut ranked_options);

    let explanation = generate_explanation(
        ranked_options.first(),
        ranked_options.get(1),
        &decision.criteria,
    );

    debug!(
        decision_id = %decision.id,
        options = ranked_options.len(),
        criteria = decision.criteria.len(),
        "decision evaluated"
    );

    EvaluationResult {
        ranked_options,
        explanation,
    }
}

//! Decision intake, storage, and weighted scoring evaluation.
//!
//! Decisions arrive as drafts, pass through the [`validation::DecisionGuard`], and are stored
//! behind a [`repository::DecisionRepository`]. Evaluation reads the latest stored snapshot and
//! never writes back.

pub mod domain;
pub mod evaluation;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    Criterion, CriterionDraft, CriterionId, Decision, DecisionDraft, DecisionId, DecisionOption,
    DecisionUpdate, OptionDraft, OptionId, Scores,
};
pub use evaluation::{
    evaluate, generate_explanation, score_option, CriterionContribution, EvaluationResult,
    RankedOption, ScoreBreakdown,
};
pub use repository::{DecisionRepository, DecisionSummary, RepositoryError};
pub use router::{decision_router, Envelope};
pub use service::{DecisionService, ServiceError};
pub use validation::{DecisionGuard, ValidationError, WeightCheck, WeightPolicy};

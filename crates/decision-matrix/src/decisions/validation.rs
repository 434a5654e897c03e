use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{CriterionId, Decision, OptionId};

pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 500;
pub const MAX_WEIGHT: f64 = 1.0;
pub const MAX_SCORE: f64 = 10.0;

/// Validation errors raised before a decision is stored.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("decision title is required")]
    MissingTitle,
    #[error("decision title cannot be more than 100 characters (found {0})")]
    TitleTooLong(usize),
    #[error("description cannot be more than 500 characters (found {0})")]
    DescriptionTooLong(usize),
    #[error("at least one criterion is required")]
    NoCriteria,
    #[error("criterion {index} name is required")]
    MissingCriterionName { index: usize },
    #[error("criterion '{name}' weight {weight} must be between 0 and 1")]
    WeightOutOfRange { name: String, weight: f64 },
    #[error("criterion id '{0}' is used more than once")]
    DuplicateCriterion(CriterionId),
    #[error("option {index} name is required")]
    MissingOptionName { index: usize },
    #[error("option id '{0}' is used more than once")]
    DuplicateOption(OptionId),
    #[error("option '{option}' score {raw} for criterion '{criterion}' must be between 0 and 10")]
    ScoreOutOfRange {
        option: String,
        criterion: CriterionId,
        raw: f64,
    },
    #[error("criteria weights sum to {total:.3}, expected 1.0 within {tolerance}")]
    WeightSum { total: f64, tolerance: f64 },
}

/// Outcome of the weight-sum check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeightCheck {
    Balanced,
    Unbalanced { total: f64 },
}

/// Whether criteria weights must sum to 1.0.
///
/// Lenient policies store unbalanced decisions and log a warning; totals then scale
/// proportionally without changing the ranking. Strict policies reject them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightPolicy {
    pub strict: bool,
    pub tolerance: f64,
}

impl WeightPolicy {
    pub const DEFAULT_TOLERANCE: f64 = 0.01;

    pub fn lenient() -> Self {
        Self {
            strict: false,
            tolerance: Self::DEFAULT_TOLERANCE,
        }
    }

    pub fn strict() -> Self {
        Self {
            strict: true,
            tolerance: Self::DEFAULT_TOLERANCE,
        }
    }

    pub fn check(&self, weights: impl IntoIterator<Item = f64>) -> WeightCheck {
        let total: f64 = weights.into_iter().sum();
        if (total - 1.0).abs() > self.tolerance {
            WeightCheck::Unbalanced { total }
        } else {
            WeightCheck::Balanced
        }
    }
}

impl Default for WeightPolicy {
    fn default() -> Self {
        Self::lenient()
    }
}

/// Guard that every decision passes through before the repository sees it.
#[derive(Debug, Clone, Default)]
pub struct DecisionGuard {
    policy: WeightPolicy,
}

impl DecisionGuard {
    pub fn with_policy(policy: WeightPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &WeightPolicy {
        &self.policy
    }

    /// Validate a fully assembled decision and apply the weight policy.
    pub fn check(&self, decision: &Decision) -> Result<WeightCheck, ValidationError> {
        let title = decision.title.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        let title_chars = title.chars().count();
        if title_chars > MAX_TITLE_CHARS {
            return Err(ValidationError::TitleTooLong(title_chars));
        }

        if let Some(description) = &decision.description {
            let chars = description.chars().count();
            if chars > MAX_DESCRIPTION_CHARS {
                return Err(ValidationError::DescriptionTooLong(chars));
            }
        }

        if decision.criteria.is_empty() {
            return Err(ValidationError::NoCriteria);
        }

        let mut criterion_ids = BTreeSet::new();
        for (index, criterion) in decision.criteria.iter().enumerate() {
            if criterion.name.trim().is_empty() {
                return Err(ValidationError::MissingCriterionName { index });
            }
            if !criterion.weight.is_finite() || !(0.0..=MAX_WEIGHT).contains(&criterion.weight) {
                return Err(ValidationError::WeightOutOfRange {
                    name: criterion.name.clone(),
                    weight: criterion.weight,
                });
            }
            if !criterion_ids.insert(&criterion.id) {
                return Err(ValidationError::DuplicateCriterion(criterion.id.clone()));
            }
        }

        let mut option_ids = BTreeSet::new();
        for (index, option) in decision.options.iter().enumerate() {
            if option.name.trim().is_empty() {
                return Err(ValidationError::MissingOptionName { index });
            }
            if !option_ids.insert(&option.id) {
                return Err(ValidationError::DuplicateOption(option.id.clone()));
            }
            for (criterion, raw) in option.scores.iter() {
                if !raw.is_finite() || !(0.0..=MAX_SCORE).contains(&raw) {
                    return Err(ValidationError::ScoreOutOfRange {
                        option: option.name.clone(),
                        criterion: criterion.clone(),
                        raw,
                    });
                }
            }
        }

        let check = self
            .policy
            .check(decision.criteria.iter().map(|criterion| criterion.weight));
        if let WeightCheck::Unbalanced { total } = check {
            if self.policy.strict {
                return Err(ValidationError::WeightSum {
                    total,
                    tolerance: self.policy.tolerance,
                });
            }
            warn!(
                decision_id = %decision.id,
                title = %decision.title,
                total_weight = total,
                "decision saved with criteria weights not summing to 1.0"
            );
        }

        Ok(check)
    }
}

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{
    Criterion, CriterionDraft, CriterionId, Decision, DecisionDraft, DecisionId, DecisionOption,
    DecisionUpdate, OptionDraft, OptionId,
};
use super::evaluation::{self, EvaluationResult};
use super::repository::{DecisionRepository, DecisionSummary, RepositoryError};
use super::validation::{DecisionGuard, ValidationError, WeightPolicy};

/// Service composing the validation guard, repository, and evaluation engine.
pub struct DecisionService<R> {
    guard: Arc<DecisionGuard>,
    repository: Arc<R>,
}

static DECISION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static CRITERION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static OPTION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_decision_id() -> DecisionId {
    let id = DECISION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DecisionId(format!("dec-{id:06}"))
}

fn next_criterion_id() -> CriterionId {
    let id = CRITERION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CriterionId(format!("crit-{id:06}"))
}

fn next_option_id() -> OptionId {
    let id = OPTION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    OptionId(format!("opt-{id:06}"))
}

/// Draw from `next` until the id is not already claimed by the client.
pub(crate) fn unclaimed_id<T: Ord>(claimed: &BTreeSet<T>, mut next: impl FnMut() -> T) -> T {
    loop {
        let id = next();
        if !claimed.contains(&id) {
            return id;
        }
    }
}

fn criteria_from_drafts(drafts: Vec<CriterionDraft>) -> Vec<Criterion> {
    let claimed: BTreeSet<CriterionId> = drafts
        .iter()
        .filter_map(|draft| draft.id.clone())
        .collect();
    drafts
        .into_iter()
        .map(|draft| Criterion {
            id: draft
                .id
                .unwrap_or_else(|| unclaimed_id(&claimed, next_criterion_id)),
            name: draft.name.trim().to_string(),
            weight: draft.weight,
        })
        .collect()
}

fn options_from_drafts(drafts: Vec<OptionDraft>) -> Vec<DecisionOption> {
    let claimed: BTreeSet<OptionId> = drafts
        .iter()
        .filter_map(|draft| draft.id.clone())
        .collect();
    drafts
        .into_iter()
        .map(|draft| DecisionOption {
            id: draft
                .id
                .unwrap_or_else(|| unclaimed_id(&claimed, next_option_id)),
            name: draft.name.trim().to_string(),
            scores: draft.scores,
        })
        .collect()
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description.filter(|text| !text.trim().is_empty())
}

impl<R> DecisionService<R>
where
    R: DecisionRepository + 'static,
{
    pub fn new(repository: Arc<R>, policy: WeightPolicy) -> Self {
        Self::with_guard(DecisionGuard::with_policy(policy), repository)
    }

    pub fn with_guard(guard: DecisionGuard, repository: Arc<R>) -> Self {
        Self {
            guard: Arc::new(guard),
            repository,
        }
    }

    pub fn policy(&self) -> &WeightPolicy {
        self.guard.policy()
    }

    /// Create a decision, assigning ids to the decision and any unidentified criteria or options.
    pub fn create(&self, draft: DecisionDraft) -> Result<Decision, ServiceError> {
        let decision = Decision {
            id: next_decision_id(),
            title: draft.title.trim().to_string(),
            description: normalize_description(draft.description),
            criteria: criteria_from_drafts(draft.criteria),
            options: options_from_drafts(draft.options),
            created_at: Utc::now(),
        };

        self.guard.check(&decision)?;
        let stored = self.repository.insert(decision)?;

        info!(
            decision_id = %stored.id,
            criteria = stored.criteria.len(),
            options = stored.options.len(),
            "decision created"
        );
        Ok(stored)
    }

    /// Fetch a decision for API responses.
    pub fn get(&self, id: &DecisionId) -> Result<Decision, ServiceError> {
        let decision = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(decision)
    }

    /// Summaries of every stored decision, oldest first.
    pub fn list(&self) -> Result<Vec<DecisionSummary>, ServiceError> {
        let mut decisions = self.repository.list()?;
        decisions.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(decisions.iter().map(DecisionSummary::from).collect())
    }

    /// Replace the provided fields, re-validate, and persist the merged decision.
    pub fn update(&self, id: &DecisionId, update: DecisionUpdate) -> Result<Decision, ServiceError> {
        let mut decision = self.get(id)?;

        let DecisionUpdate {
            title,
            description,
            criteria,
            options,
        } = update;

        if let Some(title) = title {
            decision.title = title.trim().to_string();
        }
        if description.is_some() {
            decision.description = normalize_description(description);
        }
        if let Some(criteria) = criteria {
            decision.criteria = criteria_from_drafts(criteria);
        }
        if let Some(options) = options {
            decision.options = options_from_drafts(options);
        }

        self.guard.check(&decision)?;
        self.repository.update(decision.clone())?;

        info!(decision_id = %decision.id, "decision updated");
        Ok(decision)
    }

    /// Remove a decision, returning the deleted snapshot.
    pub fn delete(&self, id: &DecisionId) -> Result<Decision, ServiceError> {
        let removed = self
            .repository
            .delete(id)?
            .ok_or(RepositoryError::NotFound)?;
        info!(decision_id = %removed.id, "decision deleted");
        Ok(removed)
    }

    /// Evaluate the latest stored snapshot of a decision.
    pub fn evaluate(&self, id: &DecisionId) -> Result<EvaluationResult, ServiceError> {
        let decision = self.get(id)?;
        let result = evaluation::evaluate(&decision);

        match result.winner() {
            Some(winner) => info!(
                decision_id = %decision.id,
                winner = %winner.option.name,
                total_score = winner.total_score,
                "decision evaluated"
            ),
            None => info!(
                decision_id = %decision.id,
                explanation = %result.explanation,
                "decision evaluated without a ranking"
            ),
        }

        Ok(result)
    }
}

/// Error raised by the decision service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

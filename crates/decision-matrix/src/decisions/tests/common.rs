use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::decisions::domain::{
    Criterion, CriterionDraft, Decision, DecisionDraft, DecisionId, DecisionOption, OptionDraft,
    Scores,
};
use crate::decisions::repository::{DecisionRepository, RepositoryError};
use crate::decisions::validation::WeightPolicy;
use crate::decisions::{decision_router, DecisionService};

pub(super) fn cost_quality_criteria() -> Vec<Criterion> {
    vec![
        Criterion::new("c1", "Cost", 0.6),
        Criterion::new("c2", "Quality", 0.4),
    ]
}

pub(super) fn option(id: &str, name: &str, scores: &[(&str, f64)]) -> DecisionOption {
    DecisionOption::new(id, name, scores.iter().copied().collect::<Scores>())
}

pub(super) fn decision_with(criteria: Vec<Criterion>, options: Vec<DecisionOption>) -> Decision {
    Decision {
        id: DecisionId("dec-test".to_string()),
        title: "Pick a laptop".to_string(),
        description: None,
        criteria,
        options,
        created_at: Utc
            .with_ymd_and_hms(2025, 10, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

/// Two options: A scores 6.8 and B scores 5.4 under the Cost/Quality criteria.
pub(super) fn cost_quality_decision() -> Decision {
    decision_with(
        cost_quality_criteria(),
        vec![
            option("o1", "A", &[("c1", 8.0), ("c2", 5.0)]),
            option("o2", "B", &[("c1", 3.0), ("c2", 9.0)]),
        ],
    )
}

pub(super) fn draft() -> DecisionDraft {
    DecisionDraft {
        title: "  Pick a laptop  ".to_string(),
        description: Some("Work machine refresh".to_string()),
        criteria: vec![
            CriterionDraft {
                id: None,
                name: "Cost".to_string(),
                weight: 0.6,
            },
            CriterionDraft {
                id: None,
                name: " Quality ".to_string(),
                weight: 0.4,
            },
        ],
        options: Vec::new(),
    }
}

pub(super) fn option_draft(name: &str, scores: Scores) -> OptionDraft {
    OptionDraft {
        id: None,
        name: name.to_string(),
        scores,
    }
}

pub(super) fn build_service() -> (DecisionService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = DecisionService::new(repository.clone(), WeightPolicy::lenient());
    (service, repository)
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<DecisionId, Decision>>>,
}

impl DecisionRepository for MemoryRepository {
    fn insert(&self, decision: Decision) -> Result<Decision, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&decision.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(decision.id.clone(), decision.clone());
        Ok(decision)
    }

    fn update(&self, decision: Decision) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.get_mut(&decision.id) {
            Some(slot) => {
                *slot = decision;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &DecisionId) -> Result<Option<Decision>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn delete(&self, id: &DecisionId) -> Result<Option<Decision>, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.remove(id))
    }

    fn list(&self) -> Result<Vec<Decision>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

pub(super) struct UnavailableRepository;

impl DecisionRepository for UnavailableRepository {
    fn insert(&self, _decision: Decision) -> Result<Decision, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _decision: Decision) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &DecisionId) -> Result<Option<Decision>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &DecisionId) -> Result<Option<Decision>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Decision>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(service: DecisionService<MemoryRepository>) -> axum::Router {
    decision_router(Arc::new(service))
}

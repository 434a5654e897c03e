use chrono::Utc;
use decision_matrix::decisions::{
    Criterion, Decision, DecisionGuard, DecisionId, DecisionOption, DecisionRepository,
    RepositoryError, ServiceError, WeightPolicy,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local decision store. The mutex serializes read-modify-write cycles per process.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDecisionRepository {
    records: Arc<Mutex<HashMap<DecisionId, Decision>>>,
}

impl InMemoryDecisionRepository {
    fn records(&self) -> Result<MutexGuard<'_, HashMap<DecisionId, Decision>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("decision store poisoned".to_string()))
    }
}

impl DecisionRepository for InMemoryDecisionRepository {
    fn insert(&self, decision: Decision) -> Result<Decision, RepositoryError> {
        let mut guard = self.records()?;
        if guard.contains_key(&decision.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(decision.id.clone(), decision.clone());
        Ok(decision)
    }

    fn update(&self, decision: Decision) -> Result<(), RepositoryError> {
        let mut guard = self.records()?;
        if guard.contains_key(&decision.id) {
            guard.insert(decision.id.clone(), decision);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &DecisionId) -> Result<Option<Decision>, RepositoryError> {
        let guard = self.records()?;
        Ok(guard.get(id).cloned())
    }

    fn delete(&self, id: &DecisionId) -> Result<Option<Decision>, RepositoryError> {
        let mut guard = self.records()?;
        Ok(guard.remove(id))
    }

    fn list(&self) -> Result<Vec<Decision>, RepositoryError> {
        let guard = self.records()?;
        Ok(guard.values().cloned().collect())
    }
}

/// Self-contained decision document evaluated without touching the store.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DecisionDocument {
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    pub(crate) criteria: Vec<Criterion>,
    #[serde(default)]
    pub(crate) options: Vec<DecisionOption>,
}

impl DecisionDocument {
    /// Validate the document the same way stored decisions are validated.
    pub(crate) fn into_decision(self, policy: WeightPolicy) -> Result<Decision, ServiceError> {
        let decision = Decision {
            id: DecisionId("inline".to_string()),
            title: self.title,
            description: self.description,
            criteria: self.criteria,
            options: self.options,
            created_at: Utc::now(),
        };
        DecisionGuard::with_policy(policy).check(&decision)?;
        Ok(decision)
    }
}

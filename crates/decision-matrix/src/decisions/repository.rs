use serde::Serialize;

use super::domain::{Decision, DecisionId};

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Implementations are responsible for serializing concurrent writes to the same decision.
pub trait DecisionRepository: Send + Sync {
    fn insert(&self, decision: Decision) -> Result<Decision, RepositoryError>;
    fn update(&self, decision: Decision) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &DecisionId) -> Result<Option<Decision>, RepositoryError>;
    fn delete(&self, id: &DecisionId) -> Result<Option<Decision>, RepositoryError>;
    fn list(&self) -> Result<Vec<Decision>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("decision already exists")]
    Conflict,
    #[error("decision not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Listing row so clients can pick a decision without pulling every option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionSummary {
    pub id: DecisionId,
    pub title: String,
    pub criteria: usize,
    pub options: usize,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Decision> for DecisionSummary {
    fn from(decision: &Decision) -> Self {
        Self {
            id: decision.id.clone(),
            title: decision.title.clone(),
            criteria: decision.criteria.len(),
            options: decision.options.len(),
            created_at: decision.created_at,
        }
    }
}

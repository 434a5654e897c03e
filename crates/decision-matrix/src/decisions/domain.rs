use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for stored decisions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionId(pub String);

/// Identifier of a criterion, unique within its decision.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CriterionId(pub String);

/// Identifier of an option, unique within its decision.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(pub String);

impl fmt::Display for DecisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CriterionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CriterionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for OptionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A weighted dimension of evaluation (e.g. Cost, Quality).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: CriterionId,
    pub name: String,
    /// Expected in `[0, 1]`.
    pub weight: f64,
}

impl Criterion {
    pub fn new(id: impl Into<String>, name: impl Into<String>, weight: f64) -> Self {
        Self {
            id: CriterionId(id.into()),
            name: name.into(),
            weight,
        }
    }
}

/// Sparse mapping of criterion id to raw score. Unscored criteria read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scores(BTreeMap<CriterionId, f64>);

impl Scores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, criterion: &CriterionId) -> f64 {
        self.0.get(criterion).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, criterion: CriterionId, raw: f64) -> Option<f64> {
        self.0.insert(criterion, raw)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CriterionId, f64)> {
        self.0.iter().map(|(id, raw)| (id, *raw))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<CriterionId>> FromIterator<(K, f64)> for Scores {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(id, raw)| (id.into(), raw)).collect())
    }
}

/// A candidate evaluated against every criterion of its decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOption {
    pub id: OptionId,
    pub name: String,
    #[serde(default)]
    pub scores: Scores,
}

impl DecisionOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>, scores: Scores) -> Self {
        Self {
            id: OptionId(id.into()),
            name: name.into(),
            scores,
        }
    }
}

/// Decision snapshot as stored by the service and read by the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id: DecisionId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub criteria: Vec<Criterion>,
    #[serde(default)]
    pub options: Vec<DecisionOption>,
    pub created_at: DateTime<Utc>,
}

impl Decision {
    pub fn total_weight(&self) -> f64 {
        self.criteria.iter().map(|criterion| criterion.weight).sum()
    }
}

/// Inbound criterion; the id is assigned by the service when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionDraft {
    #[serde(default)]
    pub id: Option<CriterionId>,
    pub name: String,
    pub weight: f64,
}

/// Inbound option; the id is assigned by the service when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDraft {
    #[serde(default)]
    pub id: Option<OptionId>,
    pub name: String,
    #[serde(default)]
    pub scores: Scores,
}

/// Payload for creating a decision. Options may be added later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub criteria: Vec<CriterionDraft>,
    #[serde(default)]
    pub options: Vec<OptionDraft>,
}

/// Partial update; provided fields replace the stored ones wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub criteria: Option<Vec<CriterionDraft>>,
    #[serde(default)]
    pub options: Option<Vec<OptionDraft>>,
}

//! End-to-end scenarios exercised through the public service facade and the pure evaluator.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use decision_matrix::decisions::{
        CriterionDraft, Decision, DecisionDraft, DecisionId, DecisionRepository, DecisionService,
        RepositoryError, WeightPolicy,
    };

    #[derive(Default)]
    pub(super) struct MemoryRepository {
        records: Mutex<HashMap<DecisionId, Decision>>,
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
            if !guard.contains_key(&decision.id) {
                return Err(RepositoryError::NotFound);
            }
            guard.insert(decision.id.clone(), decision);
            Ok(())
        }

        fn fetch(&self, id: &DecisionId) -> Result<Option<Decision>, RepositoryError> {
            Ok(self
                .records
                .lock()
                .expect("repository mutex poisoned")
                .get(id)
                .cloned())
        }

        fn delete(&self, id: &DecisionId) -> Result<Option<Decision>, RepositoryError> {
            Ok(self
                .records
                .lock()
                .expect("repository mutex poisoned")
                .remove(id))
        }

        fn list(&self) -> Result<Vec<Decision>, RepositoryError> {
            Ok(self
                .records
                .lock()
                .expect("repository mutex poisoned")
                .values()
                .cloned()
                .collect())
        }
    }

    pub(super) fn service(policy: WeightPolicy) -> DecisionService<MemoryRepository> {
        DecisionService::new(Arc::new(MemoryRepository::default()), policy)
    }

    pub(super) fn criterion(id: &str, name: &str, weight: f64) -> CriterionDraft {
        CriterionDraft {
            id: Some(id.into()),
            name: name.to_string(),
            weight,
        }
    }

    pub(super) fn vendor_draft() -> DecisionDraft {
        DecisionDraft {
            title: "Choose a CRM vendor".to_string(),
            description: Some("Annual renewal".to_string()),
            criteria: vec![
                criterion("price", "Price", 0.5),
                criterion("support", "Support", 0.3),
                criterion("fit", "Feature fit", 0.2),
            ],
            options: Vec::new(),
        }
    }
}

use common::*;
use decision_matrix::decisions::{
    evaluate, DecisionUpdate, OptionDraft, Scores, ServiceError, ValidationError, WeightPolicy,
};

fn scores(entries: &[(&str, f64)]) -> Scores {
    entries.iter().copied().collect()
}

fn vendor(name: &str, entries: &[(&str, f64)]) -> OptionDraft {
    OptionDraft {
        id: None,
        name: name.to_string(),
        scores: scores(entries),
    }
}

#[test]
fn vendor_selection_ranks_and_explains() {
    let service = service(WeightPolicy::default());
    let decision = service.create(vendor_draft()).expect("draft is valid");

    service
        .update(
            &decision.id,
            DecisionUpdate {
                options: Some(vec![
                    vendor("Northwind", &[("price", 6.0), ("support", 9.0), ("fit", 7.0)]),
                    vendor("Contoso", &[("price", 9.0), ("support", 5.0), ("fit", 6.0)]),
                    vendor("Fabrikam", &[("price", 4.0), ("support", 4.0)]),
                ]),
                ..DecisionUpdate::default()
            },
        )
        .expect("options stored");

    let result = service.evaluate(&decision.id).expect("evaluation runs");

    let names: Vec<&str> = result
        .ranked_options
        .iter()
        .map(|ranked| ranked.option.name.as_str())
        .collect();
    assert_eq!(names, vec!["Contoso", "Northwind", "Fabrikam"]);
    assert_eq!(
        result.explanation,
        "Contoso is the recommended choice with a score of 7.20. \
         It performed best in Price, contributing significantly to its score. \
         It beat Northwind by 0.10 points. \
         Crucially, Contoso had a stronger rating in Price compared to Northwind."
    );
}

#[test]
fn evaluation_matches_service_snapshot() {
    let service = service(WeightPolicy::default());
    let mut draft = vendor_draft();
    draft.options = vec![
        vendor("Northwind", &[("price", 6.0)]),
        vendor("Contoso", &[("support", 6.0)]),
    ];
    let decision = service.create(draft).expect("draft is valid");

    let via_service = service.evaluate(&decision.id).expect("evaluation runs");
    let direct = evaluate(&service.get(&decision.id).expect("stored"));

    assert_eq!(via_service, direct);
}

#[test]
fn strict_policy_is_opt_in() {
    let mut draft = vendor_draft();
    draft.criteria[0].weight = 0.9;

    let lenient = service(WeightPolicy::lenient());
    assert!(lenient.create(draft.clone()).is_ok());

    let strict = service(WeightPolicy::strict());
    assert!(matches!(
        strict.create(draft),
        Err(ServiceError::Validation(ValidationError::WeightSum { .. }))
    ));
}

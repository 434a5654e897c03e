use super::super::domain::{Criterion, DecisionOption};
use super::{CriterionContribution, ScoreBreakdown};

/// Weighted sum of an option's raw scores across the full criteria list.
///
/// Unscored criteria contribute zero. Ranges are not checked here; the validation guard
/// rejects out-of-range weights and scores before a decision is stored.
pub fn score_option(option: &DecisionOption, criteria: &[Criterion]) -> (f64, ScoreBreakdown) {
    let mut entries = Vec::with_capacity(criteria.len());
    let mut total_score = 0.0;

    for criterion in criteria {
        let raw = option.scores.raw(&criterion.id);
        let contribution = raw * criterion.weight;
        total_score += contribution;

        entries.push(CriterionContribution {
            criterion_id: criterion.id.clone(),
            criterion: criterion.name.clone(),
            raw,
            weight: criterion.weight,
            contribution,
        });
    }

    (total_score, ScoreBreakdown::new(entries))
}

use super::super::domain::Criterion;
use super::ranking::descending;
use super::{CriterionContribution, RankedOption};

pub(crate) const NO_OPTIONS_TO_EVALUATE: &str = "No options to evaluate.";

/// Prose summary of why the winner ranked first, and what separated it from the runner-up.
pub fn generate_explanation(
    winner: Option<&RankedOption>,
    runner_up: Option<&RankedOption>,
    criteria: &[Criterion],
) -> String {
    let Some(winner) = winner else {
        return NO_OPTIONS_TO_EVALUATE.to_string();
    };

    let mut explanation = format!(
        "{} is the recommended choice with a score of {:.2}. ",
        winner.option.name, winner.total_score
    );

    if let Some(top_factor) = top_factor(winner) {
        explanation.push_str(&format!(
            "It performed best in {}, contributing significantly to its score. ",
            display_name(top_factor, criteria)
        ));
    }

    let Some(runner_up) = runner_up else {
        return explanation;
    };

    explanation.push_str(&format!(
        "It beat {} by {:.2} points. ",
        runner_up.option.name,
        winner.total_score - runner_up.total_score
    ));

    if let Some(advantage) = largest_advantage(winner, runner_up) {
        explanation.push_str(&format!(
            "Crucially, {} had a stronger rating in {} compared to {}.",
            winner.option.name,
            display_name(advantage, criteria),
            runner_up.option.name
        ));
    }

    explanation
}

/// Highest contribution in the winner's breakdown; the earliest criterion wins ties.
pub(crate) fn top_factor(winner: &RankedOption) -> Option<&CriterionContribution> {
    let mut contributions: Vec<&CriterionContribution> = winner.breakdown.iter().collect();
    contributions.sort_by(|a, b| descending(a.contribution, b.contribution));
    contributions.first().copied()
}

/// Criterion where the winner out-contributed the runner-up by the widest margin.
///
/// Runner-up contributions are matched by criterion id; a criterion missing from the
/// runner-up's breakdown counts as zero. The earliest criterion wins ties.
pub(crate) fn largest_advantage<'a>(
    winner: &'a RankedOption,
    runner_up: &RankedOption,
) -> Option<&'a CriterionContribution> {
    let mut advantages: Vec<(&CriterionContribution, f64)> = winner
        .breakdown
        .iter()
        .map(|entry| {
            let lose_val = runner_up
                .breakdown
                .get(&entry.criterion_id)
                .map(|other| other.contribution)
                .unwrap_or(0.0);
            (entry, entry.contribution - lose_val)
        })
        .collect();
    advantages.sort_by(|a, b| descending(a.1, b.1));
    advantages.first().map(|(entry, _)| *entry)
}

/// Prefer the live criterion name; fall back to the name captured in the breakdown.
fn display_name<'a>(entry: &'a CriterionContribution, criteria: &'a [Criterion]) -> &'a str {
    criteria
        .iter()
        .find(|criterion| criterion.id == entry.criterion_id)
        .map(|criterion| criterion.name.as_str())
        .unwrap_or(entry.criterion.as_str())
}

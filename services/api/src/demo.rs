use crate::infra::{DecisionDocument, InMemoryDecisionRepository};
use clap::Args;
use decision_matrix::decisions::{
    evaluate, CriterionDraft, DecisionDraft, DecisionService, DecisionUpdate, EvaluationResult,
    OptionDraft, Scores, WeightPolicy,
};
use decision_matrix::error::AppError;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Path to a decision document (title, criteria, options) in JSON
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Print the raw evaluation result as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
    /// Reject documents whose criteria weights do not sum to 1.0
    #[arg(long)]
    pub(crate) strict_weights: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the raw evaluation result as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

fn policy(strict: bool) -> WeightPolicy {
    if strict {
        WeightPolicy::strict()
    } else {
        WeightPolicy::lenient()
    }
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        file,
        json,
        strict_weights,
    } = args;

    let raw = std::fs::read_to_string(&file)?;
    let document: DecisionDocument = serde_json::from_str(&raw)?;
    let title = document.title.clone();
    let decision = document.into_decision(policy(strict_weights))?;
    let result = evaluate(&decision);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_result(&title, &result));
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = DecisionService::new(
        Arc::new(InMemoryDecisionRepository::default()),
        WeightPolicy::lenient(),
    );

    let decision = service.create(DecisionDraft {
        title: "Pick a laptop".to_string(),
        description: Some("Two candidates scored on cost and quality".to_string()),
        criteria: vec![
            CriterionDraft {
                id: None,
                name: "Cost".to_string(),
                weight: 0.6,
            },
            CriterionDraft {
                id: None,
                name: "Quality".to_string(),
                weight: 0.4,
            },
        ],
        options: Vec::new(),
    })?;
    println!("Created decision {} ({})", decision.id, decision.title);

    let cost = decision.criteria[0].id.clone();
    let quality = decision.criteria[1].id.clone();
    let option = |name: &str, cost_score: f64, quality_score: f64| OptionDraft {
        id: None,
        name: name.to_string(),
        scores: [(cost.clone(), cost_score), (quality.clone(), quality_score)]
            .into_iter()
            .collect::<Scores>(),
    };

    service.update(
        &decision.id,
        DecisionUpdate {
            options: Some(vec![option("A", 8.0, 5.0), option("B", 3.0, 9.0)]),
            ..DecisionUpdate::default()
        },
    )?;
    println!("Scored options A and B\n");

    let result = service.evaluate(&decision.id)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_result(&decision.title, &result));
    }
    Ok(())
}

pub(crate) fn render_result(title: &str, result: &EvaluationResult) -> String {
    let mut output = format!("Decision: {title}\n");

    if result.ranked_options.is_empty() {
        output.push_str(&format!("{}\n", result.explanation));
        return output;
    }

    output.push_str(&format!("{:<6}{:<24}{:>10}\n", "Rank", "Option", "Score"));
    for (index, ranked) in result.ranked_options.iter().enumerate() {
        output.push_str(&format!(
            "{:<6}{:<24}{:>10.2}\n",
            index + 1,
            ranked.option.name,
            ranked.total_score
        ));
        for entry in ranked.breakdown.iter() {
            output.push_str(&format!(
                "      - {:<20} {:>5.1} x {:<5.2} = {:>6.2}\n",
                entry.criterion, entry.raw, entry.weight, entry.contribution
            ));
        }
    }

    output.push_str(&format!("\n{}\n", result.explanation));
    output
}

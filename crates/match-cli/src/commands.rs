use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use match_cli::pool::{load_candidate, load_pool, load_profile, prefilter_pool};
use match_engine::RuleEngine;
use match_model::RuleSet;
use match_rules::{default_rules, load_rules};

use crate::cli::{ExplainArgs, RankArgs, RulesArgs};
use crate::summary::{print_evaluation, print_recommendations, print_rules};

pub fn run_rank(args: &RankArgs) -> Result<()> {
    let profile = load_profile(&args.profile)?;
    let pool = load_pool(&args.pool)?;
    let rules = load_rules_or_default(args.rules.as_deref())?;
    let engine = RuleEngine::new(&rules);

    let loaded = pool.len();
    let pool = if args.no_prefilter {
        pool
    } else {
        prefilter_pool(pool, engine.now())
    };
    info!(
        profile = %profile.id,
        loaded,
        eligible_pool = pool.len(),
        "ranking candidate pool"
    );

    let recommendations = engine.recommend(&profile, &pool, args.limit);
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&recommendations).context("serialize matches")?
        );
    } else {
        print_recommendations(&profile, &recommendations);
    }
    Ok(())
}

pub fn run_explain(args: &ExplainArgs) -> Result<()> {
    let profile = load_profile(&args.profile)?;
    let candidate = load_candidate(&args.candidate)?;
    let rules = load_rules_or_default(args.rules.as_deref())?;
    let engine = RuleEngine::new(&rules);
    let result = engine.evaluate(&profile, &candidate);
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("serialize evaluation")?
        );
    } else {
        print_evaluation(&candidate, &result);
    }
    Ok(())
}

pub fn run_rules(args: &RulesArgs) -> Result<()> {
    let rules = load_rules_or_default(args.rules.as_deref())?;
    print_rules(&rules);
    Ok(())
}

fn load_rules_or_default(path: Option<&Path>) -> Result<RuleSet> {
    match path {
        Some(path) => {
            load_rules(path).with_context(|| format!("load rule document {}", path.display()))
        }
        None => default_rules().context("load built-in rule document"),
    }
}

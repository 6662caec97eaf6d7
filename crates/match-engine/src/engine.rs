//! Per-pair evaluation and batch ranking.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use match_expr::{Expr, ExpressionError, Scope, Value, evaluate};
use match_model::{
    Candidate, EvaluationResult, Explain, Fairness, Gender, IncomeBand, Profile, RankedMatch,
    RuleFailure, RuleSet,
};

/// Failure reason used when a hard rule declares none.
const GENERIC_FAIL_REASON: &str = "Failed";

/// Downscaling applied to the tie-breaker sum so it only separates
/// candidates whose soft+fairness scores are otherwise equal.
const TIE_BREAKER_SCALE: f64 = 1e-3;

type CompiledExpr = Result<Expr, ExpressionError>;

struct CompiledHardRule {
    id: String,
    when: Option<CompiledExpr>,
    check: CompiledExpr,
    fail_reason: Option<String>,
}

struct CompiledSoftRule {
    id: String,
    score: CompiledExpr,
    weight: f64,
}

enum HardOutcome {
    Skipped,
    Passed,
    Failed,
}

/// A rule set compiled for evaluation.
///
/// Construction compiles every expression exactly once; a rule whose
/// expression does not parse is kept and degrades at evaluation time (hard
/// rule fails, soft rule and tie-breaker score 0) instead of poisoning the
/// whole set. The engine holds no mutable state: every evaluation is a pure
/// function of the profile, the candidate, and this compiled set, so it is
/// safe to share one engine across threads.
pub struct RuleEngine {
    hard: Vec<CompiledHardRule>,
    soft: Vec<CompiledSoftRule>,
    fairness: Fairness,
    tie_breakers: Vec<CompiledExpr>,
    now: DateTime<Utc>,
}

impl RuleEngine {
    pub fn new(rules: &RuleSet) -> Self {
        Self::with_now(rules, Utc::now())
    }

    /// Build an engine with an explicit evaluation timestamp. Every
    /// evaluation against this engine sees the same `now()`, which is what
    /// makes results reproducible.
    pub fn with_now(rules: &RuleSet, now: DateTime<Utc>) -> Self {
        let hard = rules
            .hard_rules
            .iter()
            .map(|rule| CompiledHardRule {
                id: rule.id.clone(),
                when: rule.when.as_deref().map(|source| compile(source, &rule.id)),
                check: compile(&rule.check, &rule.id),
                fail_reason: rule.fail_reason.clone(),
            })
            .collect();
        let soft = rules
            .soft_rules
            .iter()
            .map(|rule| CompiledSoftRule {
                id: rule.id.clone(),
                score: compile(&rule.score, &rule.id),
                weight: rule.weight,
            })
            .collect();
        let tie_breakers = rules
            .tie_breakers
            .iter()
            .enumerate()
            .map(|(index, source)| compile(source, &format!("tie_breaker[{index}]")))
            .collect();
        Self {
            hard,
            soft,
            fairness: rules.fairness.clone(),
            tie_breakers,
            now,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Evaluate one profile/candidate pair.
    pub fn evaluate(&self, profile: &Profile, candidate: &Candidate) -> EvaluationResult {
        let profile_value = Value::from_record(profile);
        self.evaluate_bound(profile, &profile_value, candidate)
    }

    /// Evaluate every candidate, drop the ineligible, and sort eligible
    /// matches by score descending. The sort is stable, so equal scores
    /// keep their relative pool order.
    pub fn rank<'a>(&self, profile: &Profile, pool: &'a [Candidate]) -> Vec<RankedMatch<'a>> {
        let profile_value = Value::from_record(profile);

        #[cfg(feature = "parallel")]
        let results: Vec<EvaluationResult> = {
            use rayon::prelude::*;
            pool.par_iter()
                .map(|candidate| self.evaluate_bound(profile, &profile_value, candidate))
                .collect()
        };
        #[cfg(not(feature = "parallel"))]
        let results: Vec<EvaluationResult> = pool
            .iter()
            .map(|candidate| self.evaluate_bound(profile, &profile_value, candidate))
            .collect();

        let mut ranked: Vec<RankedMatch<'a>> = pool
            .iter()
            .zip(results)
            .filter_map(|(candidate, result)| match result {
                EvaluationResult::Eligible { score, explain } => Some(RankedMatch {
                    candidate,
                    score,
                    explain,
                }),
                EvaluationResult::Ineligible { .. } => None,
            })
            .collect();
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        debug!(
            pool = pool.len(),
            eligible = ranked.len(),
            "ranked candidate pool"
        );
        ranked
    }

    pub(crate) fn evaluate_bound(
        &self,
        profile: &Profile,
        profile_value: &Value,
        candidate: &Candidate,
    ) -> EvaluationResult {
        let candidate_value = Value::from_record(candidate);
        let scope = Scope::pair(profile_value, &candidate_value, self.now);

        // Hard phase: every rule runs so the caller sees ALL failures.
        let mut failures = Vec::new();
        let mut passed_rules = Vec::new();
        for rule in &self.hard {
            match hard_outcome(rule, &scope) {
                HardOutcome::Skipped => {}
                HardOutcome::Passed => passed_rules.push(rule.id.clone()),
                HardOutcome::Failed => failures.push(RuleFailure {
                    rule_id: rule.id.clone(),
                    reason: rule
                        .fail_reason
                        .clone()
                        .unwrap_or_else(|| GENERIC_FAIL_REASON.to_string()),
                }),
            }
        }
        if !failures.is_empty() {
            return EvaluationResult::Ineligible { failures };
        }

        // Soft phase: weighted sum, unweighted per-rule scores retained.
        let mut soft_sum = 0.0;
        let mut soft_scores = BTreeMap::new();
        for rule in &self.soft {
            let raw = match eval_compiled(&rule.score, &scope) {
                Ok(value) => value.as_number(),
                Err(error) => {
                    debug!(rule = %rule.id, %error, "soft rule scored 0");
                    0.0
                }
            };
            let score = if raw.is_finite() { raw } else { 0.0 };
            soft_sum += rule.weight * score;
            soft_scores.insert(rule.id.clone(), round3(score));
        }

        let fairness = self.fairness_boost(profile);

        // Tie-breakers bind the candidate alone.
        let tie_scope = Scope::candidate_only(&candidate_value, self.now);
        let mut tie_breaker = 0.0;
        for compiled in &self.tie_breakers {
            let raw = match eval_compiled(compiled, &tie_scope) {
                Ok(value) => value.as_number(),
                Err(error) => {
                    debug!(%error, "tie-breaker scored 0");
                    0.0
                }
            };
            if raw.is_finite() {
                tie_breaker += raw;
            }
        }

        let score = round3(soft_sum + fairness + tie_breaker * TIE_BREAKER_SCALE);
        EvaluationResult::Eligible {
            score,
            explain: Explain {
                passed_rules,
                soft_scores,
                fairness,
                tie_breaker,
            },
        }
    }

    /// Additive diversity boost, clamped to the per-session cap. Each boost
    /// applies independently; a profile can qualify for all three.
    fn fairness_boost(&self, profile: &Profile) -> f64 {
        let table = &self.fairness.diversity_boost;
        let constraints = &profile.constraints;
        let mut boost = 0.0;
        if constraints.gender == Gender::Female
            && let Some(women) = table.women
        {
            boost += women;
        }
        if constraints.disability
            && let Some(pwd) = table.pwd
        {
            boost += pwd;
        }
        if constraints.income_band == IncomeBand::Ews
            && let Some(ews) = table.ews
        {
            boost += ews;
        }
        boost.min(self.fairness.cap_per_session)
    }
}

fn compile(source: &str, rule_id: &str) -> CompiledExpr {
    Expr::parse(source).map_err(|error| {
        let error = error.for_rule(rule_id);
        warn!(rule = rule_id, %error, "rule expression failed to compile");
        error
    })
}

fn eval_compiled(compiled: &CompiledExpr, scope: &Scope<'_>) -> Result<Value, ExpressionError> {
    match compiled {
        Ok(expr) => evaluate(expr, scope),
        Err(error) => Err(error.clone()),
    }
}

fn hard_outcome(rule: &CompiledHardRule, scope: &Scope<'_>) -> HardOutcome {
    if let Some(when) = &rule.when {
        match eval_compiled(when, scope) {
            Ok(value) if !value.truthy() => return HardOutcome::Skipped,
            Ok(_) => {}
            Err(error) => {
                debug!(rule = %rule.id, %error, "hard rule guard errored; rule fails");
                return HardOutcome::Failed;
            }
        }
    }
    match eval_compiled(&rule.check, scope) {
        Ok(value) if value.truthy() => HardOutcome::Passed,
        Ok(_) => HardOutcome::Failed,
        Err(error) => {
            debug!(rule = %rule.id, %error, "hard rule errored; rule fails");
            HardOutcome::Failed
        }
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

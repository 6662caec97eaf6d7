//! End-to-end engine tests: hard/soft/fairness/tie-break phases, ranking,
//! and collaborator shaping.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};

use match_engine::{MAX_POOL, RuleEngine};
use match_model::{
    Candidate, Constraints, DiversityEligibility, Education, EducationRequired, EvaluationResult,
    Gender, GeoPoint, IncomeBand, Preferences, Profile, RuleSet,
};
use match_rules::{default_rules, rules_from_toml};

fn fixed_now() -> DateTime<Utc> {
    "2025-06-15T12:00:00Z".parse().expect("fixed timestamp")
}

fn rules(doc: &str) -> RuleSet {
    rules_from_toml(doc, Path::new("inline-test-rules")).expect("parse rules")
}

fn engine(doc: &str) -> RuleEngine {
    RuleEngine::with_now(&rules(doc), fixed_now())
}

fn asha() -> Profile {
    Profile {
        id: "u_asha".to_string(),
        name: "Asha".to_string(),
        education: Some(Education {
            degree: "B.Tech".to_string(),
            branch: "CSE".to_string(),
            year: 3,
            cgpa: 8.2,
        }),
        skills: vec!["java".to_string(), "sql".to_string()],
        certifications: vec![],
        language_pref: vec![],
        preferences: Preferences {
            roles: vec!["Software".to_string()],
            locations: vec!["Delhi".to_string()],
            min_stipend: 5000.0,
            org_types: vec!["Private".to_string()],
        },
        constraints: Constraints {
            disability: false,
            gender: Gender::Female,
            income_band: IncomeBand::General,
        },
        geo: Some(GeoPoint {
            lon: 77.209,
            lat: 28.6139,
        }),
    }
}

fn posting(id: &str) -> Candidate {
    Candidate {
        id: id.to_string(),
        title: "Software Intern".to_string(),
        org: "Acme Labs".to_string(),
        org_type: "Private".to_string(),
        description: "Backend work in Java and SQL".to_string(),
        skills_required: vec!["java".to_string(), "sql".to_string()],
        skills_nice_to_have: vec!["spring".to_string()],
        education_required: EducationRequired {
            degree: vec!["B.Tech".to_string(), "B.Sc".to_string()],
            branches: vec![],
            year_min: Some(2),
        },
        location: "Delhi".to_string(),
        is_remote: false,
        stipend: 10000.0,
        duration_months: 6,
        application_deadline: Some(fixed_now() + Duration::days(30)),
        posted_at: Some(fixed_now() - Duration::days(3)),
        language_required: vec![],
        diversity_eligibility: DiversityEligibility::default(),
        geo: Some(GeoPoint {
            lon: 77.1,
            lat: 28.7,
        }),
        verified: true,
        active: true,
    }
}

#[test]
fn eligible_candidate_appears_in_ranked_output() {
    let engine = RuleEngine::with_now(&default_rules().expect("built-in rules"), fixed_now());
    let pool = vec![posting("c1")];
    let result = engine.evaluate(&asha(), &pool[0]);
    assert!(result.is_eligible(), "got {result:?}");
    let ranked = engine.rank(&asha(), &pool);
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].candidate.id, "c1");
}

#[test]
fn guarded_rules_are_skipped_not_passed() {
    let engine = RuleEngine::with_now(&default_rules().expect("built-in rules"), fixed_now());
    // No branch requirement and not women-only: both guards are falsy.
    let result = engine.evaluate(&asha(), &posting("c1"));
    let EvaluationResult::Eligible { explain, .. } = result else {
        panic!("expected eligible");
    };
    assert_eq!(explain.passed_rules, vec!["degree", "year", "skills"]);
}

#[test]
fn all_hard_failures_are_collected() {
    let engine = RuleEngine::with_now(&default_rules().expect("built-in rules"), fixed_now());
    let mut candidate = posting("c1");
    candidate.education_required.degree = vec!["MCA".to_string()];
    candidate.education_required.year_min = Some(5);
    candidate.skills_required = vec!["go".to_string()];
    let result = engine.evaluate(&asha(), &candidate);
    let EvaluationResult::Ineligible { failures } = result else {
        panic!("expected ineligible");
    };
    let ids: Vec<&str> = failures.iter().map(|f| f.rule_id.as_str()).collect();
    assert_eq!(ids, vec!["degree", "year", "skills"]);
    assert_eq!(failures[0].reason, "Degree not accepted for this posting");
}

#[test]
fn women_only_posting_gates_on_gender() {
    let engine = RuleEngine::with_now(&default_rules().expect("built-in rules"), fixed_now());
    let mut candidate = posting("c1");
    candidate.diversity_eligibility.women_only = true;

    // A women-only posting stays open to a woman...
    assert!(engine.evaluate(&asha(), &candidate).is_eligible());

    // ...and excludes anyone else, with the declared reason.
    let mut profile = asha();
    profile.constraints.gender = Gender::Male;
    let EvaluationResult::Ineligible { failures } = engine.evaluate(&profile, &candidate) else {
        panic!("expected ineligible");
    };
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].rule_id, "women_only");
    assert_eq!(failures[0].reason, "Restricted to women applicants");
}

#[test]
fn ineligible_candidates_never_rank() {
    let engine = RuleEngine::with_now(&default_rules().expect("built-in rules"), fixed_now());
    let mut blocked = posting("blocked");
    blocked.skills_required = vec!["cobol".to_string()];
    let pool = vec![blocked, posting("open")];
    let ranked = engine.rank(&asha(), &pool);
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].candidate.id, "open");
}

#[test]
fn soft_scores_sum_weighted_and_report_unweighted() {
    let engine = engine(
        r#"
        [[soft_rules]]
        id = "a"
        score = "2"
        weight = 2.0

        [[soft_rules]]
        id = "b"
        score = "0.5"
    "#,
    );
    let EvaluationResult::Eligible { score, explain } = engine.evaluate(&asha(), &posting("c1"))
    else {
        panic!("expected eligible");
    };
    // Total carries the weights; the breakdown shows raw rule scores.
    assert!((score - 4.5).abs() < 1e-9, "got {score}");
    assert_eq!(explain.soft_scores["a"], 2.0);
    assert_eq!(explain.soft_scores["b"], 0.5);
}

#[test]
fn malformed_soft_rule_scores_zero() {
    let engine = engine(
        r#"
        [[soft_rules]]
        id = "broken"
        score = "(("

        [[soft_rules]]
        id = "ok"
        score = "1"
    "#,
    );
    let EvaluationResult::Eligible { score, explain } = engine.evaluate(&asha(), &posting("c1"))
    else {
        panic!("expected eligible");
    };
    assert!((score - 1.0).abs() < 1e-9);
    assert_eq!(explain.soft_scores["broken"], 0.0);
    assert_eq!(explain.soft_scores["ok"], 1.0);
}

#[test]
fn malformed_hard_rule_fails_that_rule() {
    let engine = engine(
        r#"
        [[hard_rules]]
        id = "broken"
        check = "(("
    "#,
    );
    let EvaluationResult::Ineligible { failures } = engine.evaluate(&asha(), &posting("c1")) else {
        panic!("expected ineligible");
    };
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].rule_id, "broken");
    assert_eq!(failures[0].reason, "Failed");
}

#[test]
fn unbound_identifier_fails_the_rule_not_the_batch() {
    let engine = engine(
        r#"
        [[hard_rules]]
        id = "typo"
        check = "user.skills"
        fail_reason = "Unresolvable"

        [[soft_rules]]
        id = "ok"
        score = "1"
    "#,
    );
    let EvaluationResult::Ineligible { failures } = engine.evaluate(&asha(), &posting("c1")) else {
        panic!("expected ineligible");
    };
    assert_eq!(failures[0].rule_id, "typo");
    assert_eq!(failures[0].reason, "Unresolvable");
}

#[test]
fn single_fairness_boost_applies_exactly() {
    let engine = engine(
        r#"
        [fairness]
        cap_per_session = 0.2

        [fairness.diversity_boost]
        women = 0.1
    "#,
    );
    // Female, no disability, income band General: only the women boost.
    let EvaluationResult::Eligible { score, explain } = engine.evaluate(&asha(), &posting("c1"))
    else {
        panic!("expected eligible");
    };
    assert_eq!(explain.fairness, 0.1);
    assert_eq!(score, 0.1);
}

#[test]
fn stacked_fairness_boosts_clamp_to_cap() {
    let engine = engine(
        r#"
        [fairness]
        cap_per_session = 0.2

        [fairness.diversity_boost]
        women = 0.15
        pwd = 0.15
        ews = 0.15
    "#,
    );
    let mut profile = asha();
    profile.constraints.disability = true;
    profile.constraints.income_band = IncomeBand::Ews;
    let EvaluationResult::Eligible { explain, .. } = engine.evaluate(&profile, &posting("c1"))
    else {
        panic!("expected eligible");
    };
    assert_eq!(explain.fairness, 0.2);
}

#[test]
fn fairness_cap_defaults_when_absent() {
    let engine = engine(
        r#"
        [fairness.diversity_boost]
        women = 0.3
    "#,
    );
    let EvaluationResult::Eligible { explain, .. } = engine.evaluate(&asha(), &posting("c1"))
    else {
        panic!("expected eligible");
    };
    assert_eq!(explain.fairness, 0.2);
}

#[test]
fn non_qualifying_profile_gets_no_boost() {
    let engine = engine(
        r#"
        [fairness.diversity_boost]
        women = 0.1
        pwd = 0.1
        ews = 0.1
    "#,
    );
    let mut profile = asha();
    profile.constraints.gender = Gender::Male;
    let EvaluationResult::Eligible { explain, .. } = engine.evaluate(&profile, &posting("c1"))
    else {
        panic!("expected eligible");
    };
    assert_eq!(explain.fairness, 0.0);
}

#[test]
fn tie_breakers_separate_equal_soft_scores() {
    let engine = engine(
        r#"
        tie_breakers = ["candidate.stipend / 10000"]

        [[soft_rules]]
        id = "flat"
        score = "1"
    "#,
    );
    let mut low = posting("low");
    low.stipend = 10000.0;
    let mut high = posting("high");
    high.stipend = 20000.0;
    // Lower-stipend candidate first in the pool; tie-breaker reorders.
    let pool = vec![low, high];
    let ranked = engine.rank(&asha(), &pool);
    assert_eq!(ranked[0].candidate.id, "high");
    assert_eq!(ranked[0].explain.tie_breaker, 2.0);
    assert!((ranked[0].score - 1.002).abs() < 1e-9);
    assert!((ranked[1].score - 1.001).abs() < 1e-9);
}

#[test]
fn tie_breakers_never_override_distinct_soft_scores() {
    let engine = engine(
        r#"
        tie_breakers = ["candidate.stipend / 10000"]

        [[soft_rules]]
        id = "stipend_fit"
        score = "candidate.stipend >= profile.preferences.min_stipend ? 1.002 : 1"
    "#,
    );
    let mut strong = posting("strong");
    strong.stipend = 9000.0;
    let mut weak = posting("weak");
    weak.stipend = 4000.0; // below min_stipend: soft 1.0, but tie value 0.4
    let pool = vec![weak, strong];
    let ranked = engine.rank(&asha(), &pool);
    assert_eq!(ranked[0].candidate.id, "strong");
}

#[test]
fn equal_scores_keep_pool_order() {
    let engine = engine(
        r#"
        [[soft_rules]]
        id = "flat"
        score = "1"
    "#,
    );
    let pool = vec![posting("first"), posting("second")];
    let ranked = engine.rank(&asha(), &pool);
    assert_eq!(ranked[0].candidate.id, "first");
    assert_eq!(ranked[1].candidate.id, "second");

    let pool = vec![posting("second"), posting("first")];
    let ranked = engine.rank(&asha(), &pool);
    assert_eq!(ranked[0].candidate.id, "second");
}

#[test]
fn evaluation_is_deterministic() {
    let engine = RuleEngine::with_now(&default_rules().expect("built-in rules"), fixed_now());
    let profile = asha();
    let candidate = posting("c1");
    let first = engine.evaluate(&profile, &candidate);
    let second = engine.evaluate(&profile, &candidate);
    assert_eq!(first, second);
}

#[test]
fn engine_ignores_application_deadline() {
    // Deadline filtering belongs to the collaborator; fed directly, a
    // past-deadline posting ranks exactly like a future one.
    let engine = RuleEngine::with_now(&default_rules().expect("built-in rules"), fixed_now());
    let mut expired = posting("expired");
    expired.application_deadline = Some(fixed_now() - Duration::days(10));
    let fresh = posting("fresh");
    let expired_score = engine
        .evaluate(&asha(), &expired)
        .score()
        .expect("eligible");
    let fresh_score = engine.evaluate(&asha(), &fresh).score().expect("eligible");
    assert_eq!(expired_score, fresh_score);
    assert_eq!(engine.rank(&asha(), &[expired, fresh]).len(), 2);
}

#[test]
fn empty_pool_ranks_empty() {
    let engine = RuleEngine::with_now(&default_rules().expect("built-in rules"), fixed_now());
    assert!(engine.rank(&asha(), &[]).is_empty());
    assert!(engine.recommend(&asha(), &[], 10).is_empty());
}

#[test]
fn recommend_shapes_and_limits() {
    let engine = engine(
        r#"
        [[soft_rules]]
        id = "flat"
        score = "1"
        "#,
    );
    let mut remote = posting("remote");
    remote.is_remote = true;
    remote.stipend = 12000.0;
    let onsite = posting("onsite");
    let pool = vec![remote, onsite];

    let recommendations = engine.recommend(&asha(), &pool, 1);
    assert_eq!(recommendations.len(), 1);
    let top = &recommendations[0];
    assert_eq!(top.candidate_id, "remote");
    assert_eq!(top.location, "Delhi / Remote");
    assert_eq!(top.stipend, 12000.0);
    assert_eq!(top.duration_months, 6);
    assert_eq!(top.why.soft_scores["flat"], 1.0);
}

#[test]
fn recommend_bounds_the_evaluated_pool() {
    let engine = engine(
        r#"
        [[soft_rules]]
        id = "flat"
        score = "1"
        "#,
    );
    let pool: Vec<Candidate> = (0..MAX_POOL + 50)
        .map(|i| posting(&format!("c{i}")))
        .collect();
    let recommendations = engine.recommend(&asha(), &pool, MAX_POOL + 50);
    assert_eq!(recommendations.len(), MAX_POOL);
}

#[test]
fn missing_education_fails_gated_rules_without_crashing() {
    let engine = RuleEngine::with_now(&default_rules().expect("built-in rules"), fixed_now());
    let mut profile = asha();
    profile.education = None;
    let EvaluationResult::Ineligible { failures } = engine.evaluate(&profile, &posting("c1"))
    else {
        panic!("expected ineligible");
    };
    let ids: Vec<&str> = failures.iter().map(|f| f.rule_id.as_str()).collect();
    assert!(ids.contains(&"degree"));
    assert!(ids.contains(&"year"));
}

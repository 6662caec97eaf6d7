//! Tree-walking evaluator and the fixed helper registry.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use match_core::{haversine_km, jaccard_similarity, keyword_match, normalize_skills, recency_decay};
use match_model::GeoPoint;

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::ExpressionError;
use crate::value::Value;

/// The bindings visible to one expression evaluation.
///
/// Only the records named here resolve as root identifiers; everything else
/// is an `UnknownIdentifier` error. Tie-breaker expressions bind the
/// candidate alone.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    profile: Option<&'a Value>,
    candidate: Option<&'a Value>,
    now: DateTime<Utc>,
}

impl<'a> Scope<'a> {
    pub fn pair(profile: &'a Value, candidate: &'a Value, now: DateTime<Utc>) -> Self {
        Self {
            profile: Some(profile),
            candidate: Some(candidate),
            now,
        }
    }

    pub fn candidate_only(candidate: &'a Value, now: DateTime<Utc>) -> Self {
        Self {
            profile: None,
            candidate: Some(candidate),
            now,
        }
    }
}

pub fn evaluate(expr: &Expr, scope: &Scope<'_>) -> Result<Value, ExpressionError> {
    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Str(s) => Ok(Value::Str(s.clone())),
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Null => Ok(Value::Null),
        Expr::List(items) => {
            let values = items
                .iter()
                .map(|item| evaluate(item, scope))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::List(values))
        }
        Expr::Ident(name) => resolve(name, scope),
        Expr::Field { object, name } => Ok(evaluate(object, scope)?.field(name)),
        Expr::Call { name, args } => call(name, args, scope),
        Expr::Unary { op, operand } => {
            let value = evaluate(operand, scope)?;
            Ok(match op {
                UnaryOp::Not => Value::Bool(!value.truthy()),
                UnaryOp::Neg => Value::Number(-value.as_number()),
            })
        }
        Expr::Binary { op, lhs, rhs } => binary(*op, lhs, rhs, scope),
        Expr::Ternary {
            cond,
            then,
            otherwise,
        } => {
            if evaluate(cond, scope)?.truthy() {
                evaluate(then, scope)
            } else {
                evaluate(otherwise, scope)
            }
        }
    }
}

fn resolve(name: &str, scope: &Scope<'_>) -> Result<Value, ExpressionError> {
    let bound = match name {
        "profile" => scope.profile,
        "candidate" => scope.candidate,
        _ => None,
    };
    bound.cloned().ok_or_else(|| ExpressionError::UnknownIdentifier {
        name: name.to_string(),
    })
}

fn binary(
    op: BinaryOp,
    lhs: &Expr,
    rhs: &Expr,
    scope: &Scope<'_>,
) -> Result<Value, ExpressionError> {
    // Short-circuit forms first; their right side may never run.
    match op {
        BinaryOp::And => {
            if !evaluate(lhs, scope)?.truthy() {
                return Ok(Value::Bool(false));
            }
            return Ok(Value::Bool(evaluate(rhs, scope)?.truthy()));
        }
        BinaryOp::Or => {
            if evaluate(lhs, scope)?.truthy() {
                return Ok(Value::Bool(true));
            }
            return Ok(Value::Bool(evaluate(rhs, scope)?.truthy()));
        }
        _ => {}
    }

    let left = evaluate(lhs, scope)?;
    let right = evaluate(rhs, scope)?;
    Ok(match op {
        BinaryOp::Add => Value::Number(left.as_number() + right.as_number()),
        BinaryOp::Sub => Value::Number(left.as_number() - right.as_number()),
        BinaryOp::Mul => Value::Number(left.as_number() * right.as_number()),
        BinaryOp::Div => Value::Number(left.as_number() / right.as_number()),
        BinaryOp::Eq => Value::Bool(left == right),
        BinaryOp::Ne => Value::Bool(left != right),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            Value::Bool(compare(op, &left, &right))
        }
        BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
    })
}

/// Ordering comparisons. Two strings compare lexicographically, which makes
/// RFC 3339 timestamps order correctly; any other pairing is compared
/// numerically after coercion.
fn compare(op: BinaryOp, lhs: &Value, rhs: &Value) -> bool {
    if let (Value::Str(a), Value::Str(b)) = (lhs, rhs) {
        return match op {
            BinaryOp::Lt => a < b,
            BinaryOp::Le => a <= b,
            BinaryOp::Gt => a > b,
            BinaryOp::Ge => a >= b,
            _ => false,
        };
    }
    let a = lhs.as_number();
    let b = rhs.as_number();
    match op {
        BinaryOp::Lt => a < b,
        BinaryOp::Le => a <= b,
        BinaryOp::Gt => a > b,
        BinaryOp::Ge => a >= b,
        _ => false,
    }
}

fn call(name: &str, args: &[Expr], scope: &Scope<'_>) -> Result<Value, ExpressionError> {
    let values = args
        .iter()
        .map(|arg| evaluate(arg, scope))
        .collect::<Result<Vec<_>, _>>()?;
    match name {
        "now" => {
            expect_arity(name, &values, 0)?;
            Ok(Value::Str(
                scope.now.to_rfc3339_opts(SecondsFormat::Secs, true),
            ))
        }
        "subsetOf" => {
            expect_arity(name, &values, 2)?;
            Ok(Value::Bool(subset_of(&values[0], &values[1])))
        }
        "normalizeSkills" => {
            expect_arity(name, &values, 1)?;
            let normalized = normalize_skills(&str_items(&values[0]));
            Ok(Value::List(normalized.into_iter().map(Value::Str).collect()))
        }
        "arrayIncludes" => {
            expect_arity(name, &values, 2)?;
            let found = match &values[0] {
                Value::List(items) => items.contains(&values[1]),
                _ => false,
            };
            Ok(Value::Bool(found))
        }
        "anyOverlap" => {
            expect_arity(name, &values, 2)?;
            let overlap = match (&values[0], &values[1]) {
                (Value::List(a), Value::List(b)) => a.iter().any(|item| b.contains(item)),
                _ => false,
            };
            Ok(Value::Bool(overlap))
        }
        "distanceKm" => {
            expect_arity(name, &values, 2)?;
            let a = geo_point(&values[0]);
            let b = geo_point(&values[1]);
            Ok(Value::Number(haversine_km(a.as_ref(), b.as_ref())))
        }
        "jaccardSimilarity" => {
            expect_arity(name, &values, 2)?;
            Ok(Value::Number(jaccard_similarity(
                &string_set(&values[0]),
                &string_set(&values[1]),
            )))
        }
        "keywordMatch" => {
            expect_arity(name, &values, 3)?;
            let roles = str_items(&values[0]);
            let title = str_or_empty(&values[1]);
            let description = str_or_empty(&values[2]);
            Ok(Value::Number(keyword_match(&roles, title, description)))
        }
        "recencyDecay" => {
            expect_arity(name, &values, 1)?;
            let posted_at = match &values[0] {
                Value::Str(s) => parse_datetime(s),
                _ => None,
            };
            Ok(Value::Number(recency_decay(posted_at, scope.now)))
        }
        _ => Err(ExpressionError::UnknownFunction {
            name: name.to_string(),
        }),
    }
}

fn expect_arity(name: &str, values: &[Value], expected: usize) -> Result<(), ExpressionError> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(ExpressionError::Arity {
            name: name.to_string(),
            expected,
            got: values.len(),
        })
    }
}

/// Every string item of `required`, lower-cased, must be present in the
/// string set of `superset`. A `null` requirement is trivially satisfied;
/// non-string items are ignored.
fn subset_of(required: &Value, superset: &Value) -> bool {
    let have = string_set(superset);
    match required {
        Value::Null => true,
        Value::Str(s) => have.contains(&s.trim().to_lowercase()),
        Value::List(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Str(s) => Some(s.trim().to_lowercase()),
                _ => None,
            })
            .all(|needed| have.contains(&needed)),
        _ => false,
    }
}

/// Lower-cased, trimmed string set of a list value.
fn string_set(value: &Value) -> BTreeSet<String> {
    match value {
        Value::List(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Str(s) => {
                    let folded = s.trim().to_lowercase();
                    (!folded.is_empty()).then_some(folded)
                }
                _ => None,
            })
            .collect(),
        Value::Str(s) => {
            let folded = s.trim().to_lowercase();
            if folded.is_empty() {
                BTreeSet::new()
            } else {
                BTreeSet::from([folded])
            }
        }
        _ => BTreeSet::new(),
    }
}

fn str_items(value: &Value) -> Vec<String> {
    match value {
        Value::List(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Str(s) => Some(s.clone()),
                _ => None,
            })
            .collect(),
        Value::Str(s) => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn str_or_empty(value: &Value) -> &str {
    match value {
        Value::Str(s) => s.as_str(),
        _ => "",
    }
}

fn geo_point(value: &Value) -> Option<GeoPoint> {
    let (Value::Number(lon), Value::Number(lat)) = (value.field("lon"), value.field("lat")) else {
        return None;
    };
    Some(GeoPoint { lon, lat })
}

fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

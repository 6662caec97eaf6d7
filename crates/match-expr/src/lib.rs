//! The rule expression language.
//!
//! Rule documents carry small boolean/numeric expressions evaluated against
//! exactly two named records, `profile` and `candidate`, plus a fixed set of
//! helper functions. The language is sandboxed by construction: expressions
//! are compiled into a closed AST (no dynamic code), the only reachable
//! identifiers are the two bound records, and every allowed operation is
//! enumerated in the evaluator.
//!
//! Helpers: `now()`, `subsetOf(required, have)`, `normalizeSkills(list)`,
//! `arrayIncludes(list, value)`, `anyOverlap(a, b)`, `distanceKm(a, b)`,
//! `jaccardSimilarity(a, b)`, `keywordMatch(terms, title, description)`,
//! `recencyDecay(timestamp)`.
//!
//! Coercions are deliberately scripting-like so rule documents read the way
//! rule authors expect: boolean contexts use truthiness (`null`, `false`,
//! `0`, `""` and the empty list are falsy), scoring contexts coerce through
//! [`Value::as_number`], and
//! ordering comparisons between two strings are lexicographic so RFC 3339
//! timestamps compare correctly. Set-valued helpers consider only string
//! items and fold them to lower case.

mod ast;
mod error;
mod eval;
mod parser;
mod token;
mod value;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use error::ExpressionError;
pub use eval::{Scope, evaluate};
pub use value::Value;

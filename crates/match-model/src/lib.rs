pub mod candidate;
pub mod geo;
pub mod outcome;
pub mod profile;
pub mod rules;

pub use candidate::{Candidate, DiversityEligibility, EducationRequired};
pub use geo::GeoPoint;
pub use outcome::{EvaluationResult, Explain, RankedMatch, Recommendation, RuleFailure};
pub use profile::{Constraints, Education, Gender, IncomeBand, Preferences, Profile};
pub use rules::{DiversityBoost, Fairness, HardRule, RuleSet, SoftRule};

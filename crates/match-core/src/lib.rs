pub mod geo;
pub mod recency;
pub mod skills;

pub use geo::haversine_km;
pub use recency::recency_decay;
pub use skills::{jaccard_similarity, keyword_match, normalize_skills};

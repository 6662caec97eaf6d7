//! Collaborator-facing output shaping.

use match_model::{Candidate, Profile, Recommendation};

use crate::engine::RuleEngine;

/// Hard upper bound on the evaluated pool per call, keeping worst-case
/// latency predictable even when the collaborator forgets to bound its
/// query.
pub const MAX_POOL: usize = 1000;

impl RuleEngine {
    /// Rank a (pre-filtered) pool and shape the top `limit` matches for the
    /// collaborator. The engine does not re-check `verified`, `active`, or
    /// the application deadline here; that filtering belongs to the caller.
    pub fn recommend(
        &self,
        profile: &Profile,
        pool: &[Candidate],
        limit: usize,
    ) -> Vec<Recommendation> {
        let bounded = &pool[..pool.len().min(MAX_POOL)];
        self.rank(profile, bounded)
            .into_iter()
            .take(limit)
            .map(|matched| Recommendation {
                candidate_id: matched.candidate.id.clone(),
                title: matched.candidate.title.clone(),
                org: matched.candidate.org.clone(),
                location: display_location(matched.candidate),
                stipend: matched.candidate.stipend,
                duration_months: matched.candidate.duration_months,
                score: matched.score,
                why: matched.explain,
            })
            .collect()
    }
}

fn display_location(candidate: &Candidate) -> String {
    if candidate.is_remote {
        format!("{} / Remote", candidate.location)
    } else {
        candidate.location.clone()
    }
}

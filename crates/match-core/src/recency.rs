//! Posting-age decay buckets.

use chrono::{DateTime, Utc};

/// Step-wise decay for posting freshness: 1.0 within a week, 0.7 within a
/// month, 0.4 within a quarter, 0.1 beyond that. A missing date scores 0.0.
/// Future-dated postings count as zero days old.
pub fn recency_decay(posted_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(posted_at) = posted_at else {
        return 0.0;
    };
    let days = (now - posted_at).num_days().max(0);
    match days {
        0..=7 => 1.0,
        8..=30 => 0.7,
        31..=90 => 0.4,
        _ => 0.1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        "2025-06-15T12:00:00Z"
            .parse()
            .expect("parse fixed timestamp")
    }

    #[test]
    fn buckets_follow_posting_age() {
        let now = now();
        assert_eq!(recency_decay(Some(now - Duration::days(3)), now), 1.0);
        assert_eq!(recency_decay(Some(now - Duration::days(7)), now), 1.0);
        assert_eq!(recency_decay(Some(now - Duration::days(8)), now), 0.7);
        assert_eq!(recency_decay(Some(now - Duration::days(30)), now), 0.7);
        assert_eq!(recency_decay(Some(now - Duration::days(31)), now), 0.4);
        assert_eq!(recency_decay(Some(now - Duration::days(90)), now), 0.4);
        assert_eq!(recency_decay(Some(now - Duration::days(91)), now), 0.1);
        assert_eq!(recency_decay(Some(now - Duration::days(400)), now), 0.1);
    }

    #[test]
    fn missing_date_scores_zero() {
        assert_eq!(recency_decay(None, now()), 0.0);
    }

    #[test]
    fn future_posting_counts_as_fresh() {
        let now = now();
        assert_eq!(recency_decay(Some(now + Duration::days(2)), now), 1.0);
    }
}

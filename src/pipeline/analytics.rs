//! Session analytics.

use chrono::{DateTime, Utc};

use crate::models::{CustomerStatus, ScoringConfig, Session};
use crate::pipeline::ledger::CustomerLedger;
use crate::pipeline::score::score_post;

/// Aggregate statistics over the working collections.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AnalyticsSummary {
    pub total_posts: usize,
    pub total_comments: usize,
    pub posts_with_images: usize,
    pub high_score_posts: usize,
    pub today_posts: usize,
    /// Posts matched per keyword, sorted by count descending
    pub keyword_stats: Vec<(String, usize)>,
    pub total_customers: usize,
    pub interested_customers: usize,
}

/// Compute summary statistics for the session.
pub fn summarize(
    session: &Session,
    ledger: &CustomerLedger,
    keywords: &[String],
    scoring: &ScoringConfig,
    now: DateTime<Utc>,
) -> AnalyticsSummary {
    let today = now.date_naive();

    let mut keyword_stats: Vec<(String, usize)> = keywords
        .iter()
        .map(|keyword| {
            let lowered = keyword.to_lowercase();
            let count = session
                .posts
                .iter()
                .filter(|post| post.message.to_lowercase().contains(&lowered))
                .count();
            (keyword.clone(), count)
        })
        .collect();
    keyword_stats.sort_by(|a, b| b.1.cmp(&a.1));

    AnalyticsSummary {
        total_posts: session.posts.len(),
        total_comments: session.comments.len(),
        posts_with_images: session.posts.iter().filter(|p| p.has_images()).count(),
        high_score_posts: session
            .posts
            .iter()
            .filter(|post| score_post(post, keywords, scoring) > scoring.highlight_threshold)
            .count(),
        today_posts: session
            .posts
            .iter()
            .filter(|post| post.created_at.date_naive() == today)
            .count(),
        keyword_stats,
        total_customers: ledger.len(),
        interested_customers: ledger.count_by_status(CustomerStatus::Interested),
    }
}

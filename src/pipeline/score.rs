//! Relevance scoring.
//!
//! Pure and deterministic; recomputed on demand rather than cached on the
//! post, so a keyword change re-ranks everything without invalidation logic.

use crate::models::{Post, ScoringConfig};

/// Score a post against the active keyword set.
///
/// Each keyword found as a case-insensitive substring of the message counts
/// independently (duplicates in the set count multiple times), every comment
/// adds its weight, and carrying at least one image adds a flat bonus.
pub fn score_post(post: &Post, keywords: &[String], weights: &ScoringConfig) -> u32 {
    let mut score = 0;
    let message = post.message.to_lowercase();

    for keyword in keywords {
        if message.contains(&keyword.to_lowercase()) {
            score += weights.keyword_points;
        }
    }

    score += post.comments.len() as u32 * weights.comment_points;

    if post.has_images() {
        score += weights.image_points;
    }

    score
}

//! Post filter engine.
//!
//! Composes the date window, minimum score, free-text search, and keyword
//! allow/deny predicates into a single inclusion test over posts. Criteria
//! are built once per change, so the keyword match
//! strategy (plain substrings vs compiled patterns) is resolved up front
//! instead of per post.

use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};

use crate::models::{DateWindow, FilterConfig, Post, ScoringConfig};
use crate::pipeline::score::score_post;

/// How the keyword allow-set is matched against a post's text.
#[derive(Debug)]
pub enum MatchStrategy {
    /// Case-insensitive substring containment
    Substring,
    /// Compiled case-insensitive patterns; a match on any pattern passes
    Patterns(Vec<Regex>),
}

/// Active filter criteria, evaluated per post.
#[derive(Debug)]
pub struct FilterCriteria {
    window: DateWindow,
    min_score: u32,
    query: String,
    keywords_enabled: bool,
    allow: Vec<String>,
    deny: Vec<String>,
    strategy: MatchStrategy,
    scoring: ScoringConfig,
}

impl FilterCriteria {
    /// Build criteria from configuration plus the active keyword lists.
    ///
    /// In regex mode each allow-keyword is compiled case-insensitively; a
    /// compilation failure anywhere degrades the whole set to substring
    /// matching rather than failing per post.
    pub fn build(
        config: &FilterConfig,
        allow: Vec<String>,
        deny: Vec<String>,
        scoring: ScoringConfig,
    ) -> Self {
        let strategy = if config.regex_mode {
            compile_patterns(&allow)
        } else {
            MatchStrategy::Substring
        };

        Self {
            window: config.date_window,
            min_score: config.min_score,
            query: config.query.to_lowercase(),
            keywords_enabled: config.keywords_enabled,
            allow,
            deny,
            strategy,
            scoring,
        }
    }

    /// The keyword set driving scoring and keyword filtering.
    pub fn keywords(&self) -> &[String] {
        &self.allow
    }

    /// Whether the post passes every filter stage.
    pub fn include(&self, post: &Post, now: DateTime<Utc>) -> bool {
        self.passes_date(post, now)
            && score_post(post, &self.allow, &self.scoring) >= self.min_score
            && self.passes_query(post)
            && self.passes_keywords(post)
    }

    /// Inclusive day-boundary semantics: a post is excluded only when its
    /// age in whole days exceeds the window's threshold.
    fn passes_date(&self, post: &Post, now: DateTime<Utc>) -> bool {
        match self.window.max_age_days() {
            None => true,
            Some(limit) => (now - post.created_at).num_days() <= limit,
        }
    }

    fn passes_query(&self, post: &Post) -> bool {
        if self.query.is_empty() {
            return true;
        }
        post.message.to_lowercase().contains(&self.query)
            || post.author_name().to_lowercase().contains(&self.query)
            || post.comments.iter().any(|comment| {
                comment.message.to_lowercase().contains(&self.query)
                    || comment.author_name().to_lowercase().contains(&self.query)
            })
    }

    fn passes_keywords(&self, post: &Post) -> bool {
        if !self.keywords_enabled || self.allow.is_empty() {
            return true;
        }

        let blob = text_blob(post);
        match &self.strategy {
            MatchStrategy::Patterns(patterns) => {
                patterns.iter().any(|pattern| pattern.is_match(&blob))
            }
            MatchStrategy::Substring => {
                let lower = blob.to_lowercase();
                let has_allowed = self
                    .allow
                    .iter()
                    .any(|keyword| lower.contains(&keyword.to_lowercase()));
                let has_denied = self
                    .deny
                    .iter()
                    .any(|keyword| lower.contains(&keyword.to_lowercase()));
                has_allowed && !has_denied
            }
        }
    }
}

/// Combined text of the post message, author name, and all comment
/// messages/author names.
fn text_blob(post: &Post) -> String {
    let mut blob = String::new();
    blob.push_str(&post.message);
    blob.push(' ');
    blob.push_str(post.author_name());
    for comment in &post.comments {
        blob.push(' ');
        blob.push_str(&comment.message);
        blob.push(' ');
        blob.push_str(comment.author_name());
    }
    blob
}

fn compile_patterns(allow: &[String]) -> MatchStrategy {
    let mut patterns = Vec::with_capacity(allow.len());
    for keyword in allow {
        match RegexBuilder::new(keyword).case_insensitive(true).build() {
            Ok(pattern) => patterns.push(pattern),
            Err(error) => {
                log::warn!(
                    "Invalid filter pattern '{keyword}': {error}; falling back to substring matching"
                );
                return MatchStrategy::Substring;
            }
        }
    }
    MatchStrategy::Patterns(patterns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Author, Comment};
    use chrono::Duration;

    fn make_post(message: &str, age_days: i64) -> Post {
        Post {
            id: "p1".to_string(),
            group_id: "g1".to_string(),
            group_name: "Group".to_string(),
            author: Some(Author {
                id: "u1".to_string(),
                name: "Alice Seller".to_string(),
                picture: None,
            }),
            message: message.to_string(),
            created_at: Utc::now() - Duration::days(age_days),
            images: vec![],
            comments: vec![Comment {
                id: "c1".to_string(),
                post_id: "p1".to_string(),
                author: Some(Author {
                    id: "u2".to_string(),
                    name: "Bob Buyer".to_string(),
                    picture: None,
                }),
                message: "count me in".to_string(),
                created_at: Utc::now(),
            }],
        }
    }

    fn criteria(config: FilterConfig, allow: &[&str], deny: &[&str]) -> FilterCriteria {
        FilterCriteria::build(
            &config,
            allow.iter().map(|s| s.to_string()).collect(),
            deny.iter().map(|s| s.to_string()).collect(),
            ScoringConfig::default(),
        )
    }

    #[test]
    fn default_criteria_include_everything() {
        let criteria = criteria(FilterConfig::default(), &[], &[]);
        assert!(criteria.include(&make_post("anything", 400), Utc::now()));
    }

    #[test]
    fn date_window_thresholds_are_inclusive() {
        let now = Utc::now();
        let post_3d = make_post("x", 3);
        let post_8d = make_post("x", 8);
        let post_31d = make_post("x", 31);

        let today = criteria(
            FilterConfig {
                date_window: DateWindow::Today,
                ..FilterConfig::default()
            },
            &[],
            &[],
        );
        let week = criteria(
            FilterConfig {
                date_window: DateWindow::Week,
                ..FilterConfig::default()
            },
            &[],
            &[],
        );
        let month = criteria(
            FilterConfig {
                date_window: DateWindow::Month,
                ..FilterConfig::default()
            },
            &[],
            &[],
        );

        assert!(!today.include(&post_3d, now));
        assert!(week.include(&post_3d, now));
        assert!(!week.include(&post_8d, now));
        assert!(month.include(&post_8d, now));
        assert!(!month.include(&post_31d, now));
    }

    #[test]
    fn score_threshold_excludes_despite_matching_query() {
        let config = FilterConfig {
            min_score: 50,
            query: "offer".to_string(),
            ..FilterConfig::default()
        };
        let criteria = criteria(config, &["offer"], &[]);
        // One keyword + one comment = 12 < 50, even though the query matches.
        assert!(!criteria.include(&make_post("great offer", 0), Utc::now()));
    }

    #[test]
    fn query_matches_comment_author_name() {
        let config = FilterConfig {
            query: "bob buyer".to_string(),
            ..FilterConfig::default()
        };
        let criteria = criteria(config, &[], &[]);
        assert!(criteria.include(&make_post("unrelated", 0), Utc::now()));
    }

    #[test]
    fn keyword_stage_disabled_leaves_other_stages_in_charge() {
        let config = FilterConfig {
            keywords_enabled: false,
            ..FilterConfig::default()
        };
        let criteria = criteria(config, &["missing"], &[]);
        assert!(criteria.include(&make_post("no keywords here", 0), Utc::now()));
    }

    #[test]
    fn substring_mode_requires_allow_and_no_deny() {
        let config = FilterConfig {
            keywords_enabled: true,
            ..FilterConfig::default()
        };
        let criteria = criteria(config, &["offer"], &["spam"]);

        assert!(criteria.include(&make_post("an OFFER for you", 0), Utc::now()));
        assert!(!criteria.include(&make_post("an offer, pure spam", 0), Utc::now()));
        assert!(!criteria.include(&make_post("nothing relevant", 0), Utc::now()));
    }

    #[test]
    fn regex_mode_matches_any_pattern_case_insensitively() {
        let config = FilterConfig {
            keywords_enabled: true,
            regex_mode: true,
            ..FilterConfig::default()
        };
        let criteria = criteria(config, &[r"off\w+", r"^never$"], &[]);
        assert!(criteria.include(&make_post("big OFFER", 0), Utc::now()));
        assert!(!criteria.include(&make_post("nothing", 0), Utc::now()));
    }

    #[test]
    fn invalid_pattern_falls_back_to_substring_for_the_whole_set() {
        let config = FilterConfig {
            keywords_enabled: true,
            regex_mode: true,
            ..FilterConfig::default()
        };
        // "(" does not compile; the set degrades to substring matching.
        let criteria = criteria(config, &["(", "offer"], &[]);
        assert!(matches!(criteria.strategy, MatchStrategy::Substring));
        assert!(criteria.include(&make_post("an offer (limited)", 0), Utc::now()));
        assert!(!criteria.include(&make_post("plain text", 0), Utc::now()));
    }

    #[test]
    fn enabled_stage_with_empty_allow_set_passes() {
        let config = FilterConfig {
            keywords_enabled: true,
            ..FilterConfig::default()
        };
        let criteria = criteria(config, &[], &["spam"]);
        assert!(criteria.include(&make_post("spammy spam", 0), Utc::now()));
    }
}

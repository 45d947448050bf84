//! Multi-group feed ingestion orchestrator.
//!
//! Drives per-group fetch loops against a [`FeedSource`], tracks continuation
//! cursors, and produces an outcome that the caller merges into the session.
//! Groups are fetched sequentially, never in parallel: the gateway is rate
//! limited per credential, and one slow group must not reorder the rest.
//!
//! A failure for one group is logged and skipped; ingestion always continues
//! with the remaining groups and the overall call never aborts.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;

use crate::models::{Comment, NoCursorPolicy, Post, Session};
use crate::services::{FeedSource, normalize_post};

/// Whether an ingestion replaces or extends the working collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestMode {
    /// Replace the working post/comment collections
    Full,
    /// Append to them, continuing from stored cursors
    Incremental,
}

/// What happened to a group's cursor on a successful page fetch.
///
/// A consumed cursor is always either replaced or cleared, never left in
/// place to be reused for a second fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorUpdate {
    /// The response carried a next-page link; continue from this token
    Advance(String),
    /// No further pages are known for the group
    Exhausted,
}

/// Options for one ingestion call.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub mode: IngestMode,
    /// Scheduled (auto) run: progress is logged at debug level
    pub auto: bool,
    pub no_cursor_policy: NoCursorPolicy,
    /// Delay between per-group requests
    pub request_delay_ms: u64,
}

/// Result of one ingestion call.
#[derive(Debug, Default)]
pub struct IngestOutcome {
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
    pub cursors: HashMap<String, CursorUpdate>,
    /// Groups a fetch was attempted for
    pub group_total: usize,
    /// Groups whose page fetch failed and was skipped
    pub group_failures: usize,
}

impl IngestOutcome {
    /// Merge this outcome into the session. FULL mode replaces the working
    /// collections; INCREMENTAL mode appends. Cursor updates apply per group
    /// in both modes.
    pub fn merge_into(self, session: &mut Session, mode: IngestMode) {
        match mode {
            IngestMode::Full => {
                session.posts = self.posts;
                session.comments = self.comments;
            }
            IngestMode::Incremental => {
                session.posts.extend(self.posts);
                session.comments.extend(self.comments);
            }
        }

        for (group_id, update) in self.cursors {
            match update {
                CursorUpdate::Advance(token) => {
                    session.cursors.insert(group_id, token);
                }
                CursorUpdate::Exhausted => {
                    session.cursors.remove(&group_id);
                }
            }
        }

        session.last_update = Some(Utc::now());
    }
}

/// Fetch one feed page for every monitored group, sequentially.
///
/// `cursors` is the caller's snapshot of the stored continuation tokens. In
/// INCREMENTAL mode a group without one is skipped (or refetched from the
/// first page, per `no_cursor_policy`).
pub async fn ingest(
    source: &dyn FeedSource,
    groups: &[String],
    cursors: &HashMap<String, String>,
    options: &IngestOptions,
) -> IngestOutcome {
    let mut outcome = IngestOutcome::default();
    let delay = Duration::from_millis(options.request_delay_ms);

    progress(options.auto, &format!("Ingesting {} groups", groups.len()));

    for (index, group_id) in groups.iter().enumerate() {
        // A full reload always starts from the head of the feed; only
        // incremental runs continue from the stored cursor.
        let after = match options.mode {
            IngestMode::Full => None,
            IngestMode::Incremental => cursors.get(group_id),
        };
        if options.mode == IngestMode::Incremental
            && after.is_none()
            && options.no_cursor_policy == NoCursorPolicy::Skip
        {
            log::debug!("Group {group_id}: no stored cursor, skipping");
            continue;
        }

        outcome.group_total += 1;

        // Display name is best-effort; the raw identifier stands in on failure.
        let group_name = match source.group_name(group_id).await {
            Ok(name) => name,
            Err(error) => {
                log::warn!("Cannot resolve name for group {group_id}: {error}");
                group_id.clone()
            }
        };

        match source.feed_page(group_id, after.map(String::as_str)).await {
            Ok(page) => {
                let update = match page.next_cursor() {
                    Some(token) => CursorUpdate::Advance(token),
                    None => CursorUpdate::Exhausted,
                };
                outcome.cursors.insert(group_id.clone(), update);

                let fetched = page.data.len();
                for raw in page.data {
                    let post = normalize_post(raw, group_id, &group_name);
                    outcome.comments.extend(post.comments.iter().cloned());
                    outcome.posts.push(post);
                }

                progress(
                    options.auto,
                    &format!(
                        "Group {}/{} {group_name}: {fetched} posts",
                        index + 1,
                        groups.len()
                    ),
                );
            }
            Err(error) => {
                outcome.group_failures += 1;
                log::warn!("Group {group_id} skipped: {error}");
            }
        }

        if delay.as_millis() > 0 && index + 1 < groups.len() {
            tokio::time::sleep(delay).await;
        }
    }

    progress(
        options.auto,
        &format!(
            "Ingested {} posts and {} comments ({} of {} groups failed)",
            outcome.posts.len(),
            outcome.comments.len(),
            outcome.group_failures,
            outcome.group_total
        ),
    );

    outcome
}

fn progress(auto: bool, message: &str) {
    if auto {
        log::debug!("{message}");
    } else {
        log::info!("{message}");
    }
}

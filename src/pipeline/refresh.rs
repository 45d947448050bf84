//! Auto-refresh scheduler.
//!
//! One cancellable periodic task drives scheduled incremental ingestion and
//! exposes the remaining time to the next run. The task ticks at 1 Hz,
//! counting a shared seconds counter down to zero, then runs an INCREMENTAL
//! ingestion in auto mode and resets the counter.
//!
//! Cancellation (explicit or on drop of the handle) aborts the task at the
//! next await point, so no ingestion fires afterwards. An ingestion already
//! in flight when the feature is toggled off is allowed to complete and its
//! result is still merged.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use crate::models::{NoCursorPolicy, ScoringConfig, Session};
use crate::pipeline::ingest::{IngestMode, IngestOptions, ingest};
use crate::pipeline::ledger::Notifier;
use crate::pipeline::score::score_post;
use crate::services::FeedSource;
use crate::utils::format_countdown;

/// Everything a scheduled refresh needs to run on its own.
pub struct RefreshContext {
    pub source: Arc<dyn FeedSource>,
    pub session: Arc<Mutex<Session>>,
    pub notifier: Arc<dyn Notifier>,
    pub groups: Vec<String>,
    pub keywords: Vec<String>,
    pub scoring: ScoringConfig,
    pub no_cursor_policy: NoCursorPolicy,
    pub request_delay_ms: u64,
}

/// Handle to the running refresh task.
pub struct RefreshHandle {
    remaining: Arc<AtomicU64>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Seconds until the next scheduled ingestion.
    pub fn remaining_secs(&self) -> u64 {
        self.remaining.load(Ordering::Relaxed)
    }

    /// Stop the scheduler. Deterministic: nothing fires after this returns.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Whether the task has stopped (cancelled, or the post collection
    /// became empty).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start the refresh scheduler with the given period.
pub fn spawn(context: RefreshContext, period_secs: u64) -> RefreshHandle {
    let period = period_secs.max(1);
    let remaining = Arc::new(AtomicU64::new(period));
    let counter = Arc::clone(&remaining);

    let task = tokio::spawn(async move {
        let mut tick = interval(Duration::from_secs(1));
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // An interval's first tick completes immediately; consume it so the
        // countdown starts at the full period.
        tick.tick().await;

        loop {
            tick.tick().await;
            let left = counter.load(Ordering::Relaxed);
            if left <= 1 {
                counter.store(period, Ordering::Relaxed);
                if !refresh_once(&context).await {
                    break;
                }
                log::debug!("Next auto-refresh in {}", format_countdown(period));
            } else {
                counter.store(left - 1, Ordering::Relaxed);
            }
        }
    });

    RefreshHandle { remaining, task }
}

/// Run one scheduled ingestion. Returns `false` when the scheduler should
/// stop because the post collection is empty.
async fn refresh_once(context: &RefreshContext) -> bool {
    let cursors = {
        let session = context.session.lock().await;
        if session.posts.is_empty() {
            log::debug!("Post collection is empty; stopping auto-refresh");
            return false;
        }
        session.cursors.clone()
    };

    let options = IngestOptions {
        mode: IngestMode::Incremental,
        auto: true,
        no_cursor_policy: context.no_cursor_policy,
        request_delay_ms: context.request_delay_ms,
    };

    // The session lock is not held across the fetch; a user-triggered
    // ingestion may run concurrently and both results merge in call order.
    let outcome = ingest(
        context.source.as_ref(),
        &context.groups,
        &cursors,
        &options,
    )
    .await;

    let added = outcome.posts.len();
    let high_scoring = outcome
        .posts
        .iter()
        .filter(|post| {
            score_post(post, &context.keywords, &context.scoring)
                > context.scoring.highlight_threshold
        })
        .count();

    let mut session = context.session.lock().await;
    outcome.merge_into(&mut session, IngestMode::Incremental);
    drop(session);

    if added > 0 && high_scoring > 0 {
        context.notifier.notify(
            "New high-scoring posts",
            &format!("{high_scoring} of {added} new posts look promising"),
        );
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use chrono::Utc;

    use crate::error::Result;
    use crate::models::{Author, FeedPage, Post};

    struct CountingSource {
        pages: AtomicUsize,
    }

    #[async_trait]
    impl FeedSource for CountingSource {
        async fn group_name(&self, group_id: &str) -> Result<String> {
            Ok(group_id.to_string())
        }

        async fn feed_page(&self, _group_id: &str, _after: Option<&str>) -> Result<FeedPage> {
            let n = self.pages.fetch_add(1, Ordering::SeqCst);
            Ok(serde_json::from_str(&format!(r#"{{"data": [{{"id": "auto_{n}"}}]}}"#)).unwrap())
        }
    }

    fn seeded_session() -> Session {
        let mut session = Session::default();
        session.posts.push(Post {
            id: "p0".to_string(),
            group_id: "g1".to_string(),
            group_name: "Group".to_string(),
            author: Some(Author {
                id: "u1".to_string(),
                name: "Alice".to_string(),
                picture: None,
            }),
            message: String::new(),
            created_at: Utc::now(),
            images: vec![],
            comments: vec![],
        });
        session
    }

    struct SilentNotifier;
    impl Notifier for SilentNotifier {
        fn notify(&self, _title: &str, _body: &str) {}
    }

    fn make_context(source: Arc<CountingSource>, session: Arc<Mutex<Session>>) -> RefreshContext {
        RefreshContext {
            source,
            session,
            notifier: Arc::new(SilentNotifier),
            groups: vec!["g1".to_string()],
            keywords: vec![],
            scoring: ScoringConfig::default(),
            no_cursor_policy: NoCursorPolicy::FirstPage,
            request_delay_ms: 0,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_after_period_and_stops_on_cancel() {
        let source = Arc::new(CountingSource {
            pages: AtomicUsize::new(0),
        });
        let session = Arc::new(Mutex::new(seeded_session()));
        let handle = spawn(make_context(Arc::clone(&source), Arc::clone(&session)), 3);
        assert_eq!(handle.remaining_secs(), 3);

        tokio::time::sleep(Duration::from_secs(5)).await;
        let fired = source.pages.load(Ordering::SeqCst);
        assert!(fired >= 1, "expected at least one scheduled ingestion");
        assert!(session.lock().await.posts.len() > 1);

        handle.cancel();
        tokio::time::sleep(Duration::from_millis(50)).await;
        let after_cancel = source.pages.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(
            source.pages.load(Ordering::SeqCst),
            after_cancel,
            "no ingestion may fire after cancellation"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_before_first_fire_prevents_any_ingestion() {
        let source = Arc::new(CountingSource {
            pages: AtomicUsize::new(0),
        });
        let session = Arc::new(Mutex::new(seeded_session()));
        let handle = spawn(
            make_context(Arc::clone(&source), Arc::clone(&session)),
            600,
        );
        handle.cancel();

        tokio::time::sleep(Duration::from_secs(1200)).await;
        assert_eq!(source.pages.load(Ordering::SeqCst), 0);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_post_collection_stops_the_scheduler() {
        let source = Arc::new(CountingSource {
            pages: AtomicUsize::new(0),
        });
        let session = Arc::new(Mutex::new(Session::default()));
        let handle = spawn(make_context(Arc::clone(&source), Arc::clone(&session)), 1);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(source.pages.load(Ordering::SeqCst), 0);
        assert!(handle.is_finished());
    }
}

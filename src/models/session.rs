//! In-memory session state.
//!
//! All entity state lives here for the duration of one operator session.
//! Collections are mutated only through explicit merge/upsert operations,
//! keyed so that each key has a single writer per operation: cursors by group
//! id, resolved contacts by author id.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::models::{Comment, Post};

/// Working collections for one monitoring session.
#[derive(Debug, Default)]
pub struct Session {
    /// Ingested posts, in ingestion order
    pub posts: Vec<Post>,

    /// Flattened comments for all ingested posts
    pub comments: Vec<Comment>,

    /// Continuation cursor per group; absence means no further pages known
    pub cursors: HashMap<String, String>,

    /// Lazily resolved author contacts
    pub contacts: ContactDirectory,

    /// Time of the last successful merge
    pub last_update: Option<DateTime<Utc>>,
}

impl Session {
    /// Distinct post author ids, in first-seen order.
    pub fn distinct_post_authors(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut authors = Vec::new();
        for post in &self.posts {
            if let Some(id) = post.author_id() {
                if !id.is_empty() && seen.insert(id.to_string()) {
                    authors.push(id.to_string());
                }
            }
        }
        authors
    }
}

/// Resolved contact values keyed by author id.
///
/// An entry is written at most once per completed lookup (a re-query
/// overwrites: last writer wins). The pending set is an advisory guard that
/// suppresses duplicate concurrent lookups for the same identifier; it is
/// not a mutex.
#[derive(Debug, Default)]
pub struct ContactDirectory {
    resolved: HashMap<String, Option<String>>,
    pending: HashSet<String>,
}

impl ContactDirectory {
    /// Mark an identifier as being looked up. Returns `false` when a lookup
    /// for it is already in flight.
    pub fn begin(&mut self, id: &str) -> bool {
        self.pending.insert(id.to_string())
    }

    /// Record the outcome of a lookup (`None` = unresolved) and clear the
    /// pending mark.
    pub fn complete(&mut self, id: &str, contact: Option<String>) {
        self.pending.remove(id);
        self.resolved.insert(id.to_string(), contact);
    }

    /// Resolved contact value for an identifier, if a lookup found one.
    pub fn contact(&self, id: &str) -> Option<&str> {
        self.resolved.get(id).and_then(|c| c.as_deref())
    }

    /// Whether a lookup has completed for this identifier.
    pub fn is_resolved(&self, id: &str) -> bool {
        self.resolved.contains_key(id)
    }

    /// Whether a lookup is currently in flight for this identifier.
    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.contains(id)
    }

    /// Number of completed lookups.
    pub fn resolved_count(&self) -> usize {
        self.resolved.len()
    }
}

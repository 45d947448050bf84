//! Report writers.
//!
//! Renders the working collections and the customer ledger as CSV, plus the
//! keyword list as JSON, and writes them atomically (write to temp, then
//! rename) under the configured output directory.

use std::path::PathBuf;

use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::{ScoringConfig, Session};
use crate::pipeline::ledger::CustomerLedger;
use crate::pipeline::score::score_post;
use crate::storage::files::keywords_json;
use crate::utils::{csv_row, format_time};

const POSTS_HEADER: &str = "Type,GroupId,AuthorName,Phone,Message,Time,AuthorId,PostId,Score";
const CUSTOMERS_HEADER: &str = "Name,Phone,Status,Score,PostsCount,LastContact,Notes";

/// Writes session reports into one output directory.
pub struct ReportWriter {
    out_dir: PathBuf,
}

impl ReportWriter {
    /// Create a writer rooted at the given directory.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.out_dir).await?;
        let path = self.out_dir.join(name);

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(path)
    }

    /// Write the combined posts-and-comments CSV.
    pub async fn write_posts_csv(
        &self,
        session: &Session,
        keywords: &[String],
        scoring: &ScoringConfig,
    ) -> Result<PathBuf> {
        let csv = posts_csv(session, keywords, scoring);
        self.write_bytes("posts_and_comments.csv", csv.as_bytes())
            .await
    }

    /// Write the customer report CSV.
    pub async fn write_customers_csv(&self, ledger: &CustomerLedger) -> Result<PathBuf> {
        let csv = customers_csv(ledger);
        self.write_bytes("customers_report.csv", csv.as_bytes())
            .await
    }

    /// Export the active keyword list as JSON.
    pub async fn export_keywords(&self, keywords: &[String]) -> Result<PathBuf> {
        self.write_bytes("keywords.json", keywords_json(keywords).as_bytes())
            .await
    }
}

/// Render posts and comments as CSV. Post rows carry the recomputed score;
/// comment rows reference their parent post.
pub fn posts_csv(session: &Session, keywords: &[String], scoring: &ScoringConfig) -> String {
    let mut rows = Vec::with_capacity(1 + session.posts.len() + session.comments.len());
    rows.push(POSTS_HEADER.to_string());

    for post in &session.posts {
        let score = score_post(post, keywords, scoring).to_string();
        let phone = post
            .author_id()
            .and_then(|id| session.contacts.contact(id))
            .unwrap_or("");
        rows.push(csv_row(&[
            "Post",
            &post.group_name,
            post.author_name(),
            phone,
            &post.message,
            &format_time(post.created_at),
            post.author_id().unwrap_or(""),
            &post.id,
            &score,
        ]));
    }

    for comment in &session.comments {
        let phone = comment
            .author_id()
            .and_then(|id| session.contacts.contact(id))
            .unwrap_or("");
        rows.push(csv_row(&[
            "Comment",
            "",
            comment.author_name(),
            phone,
            &comment.message,
            &format_time(comment.created_at),
            comment.author_id().unwrap_or(""),
            &comment.post_id,
            "0",
        ]));
    }

    rows.join("\n")
}

/// Render the customer ledger as CSV.
pub fn customers_csv(ledger: &CustomerLedger) -> String {
    let mut rows = Vec::with_capacity(1 + ledger.len());
    rows.push(CUSTOMERS_HEADER.to_string());

    for customer in ledger.customers() {
        rows.push(csv_row(&[
            &customer.name,
            customer.phone.as_deref().unwrap_or(""),
            customer.status.as_str(),
            &customer.score.to_string(),
            &customer.post_ids.len().to_string(),
            &customer.last_contact.format("%Y-%m-%d").to_string(),
            &customer.notes,
        ]));
    }

    rows.join("\n")
}

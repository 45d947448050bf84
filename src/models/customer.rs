//! Prospective customer records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Contact workflow status of a customer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    #[default]
    Interested,
    Contacted,
    Converted,
    NotInterested,
}

impl CustomerStatus {
    /// Wire/report representation of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            CustomerStatus::Interested => "interested",
            CustomerStatus::Contacted => "contacted",
            CustomerStatus::Converted => "converted",
            CustomerStatus::NotInterested => "not_interested",
        }
    }
}

/// One prospective customer, aggregated across every post attributed to the
/// same author identity. Identity is unique by author id; records are
/// upserted and never deleted for the lifetime of the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Author identifier
    pub id: String,

    /// Author display name
    pub name: String,

    /// Resolved contact value; absent until a lookup succeeds
    pub phone: Option<String>,

    /// Contact workflow status
    pub status: CustomerStatus,

    /// Identifiers of every post attributed to this customer
    pub post_ids: Vec<String>,

    /// Accumulated relevance score; only ever increases
    pub score: u32,

    /// Time of the most recent contact touchpoint
    pub last_contact: DateTime<Utc>,

    /// Free-form operator notes
    pub notes: String,
}

//! Customer ledger.
//!
//! One record per distinct author identity, upserted as scored posts are
//! attributed to it and never deleted for the lifetime of the session.
//! Alert delivery is an external collaborator behind the [`Notifier`] trait.

use chrono::Utc;

use crate::models::{Customer, CustomerStatus, Post};

/// External alert sink invoked when a high-scoring prospect appears.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str);
}

/// Notifier that writes alerts to the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str) {
        log::info!("[ALERT] {title}: {body}");
    }
}

/// In-memory ledger of prospective customers.
#[derive(Debug, Default)]
pub struct CustomerLedger {
    customers: Vec<Customer>,
    alert_threshold: u32,
}

impl CustomerLedger {
    /// Create a ledger alerting on creation above the given score.
    pub fn new(alert_threshold: u32) -> Self {
        Self {
            customers: Vec::new(),
            alert_threshold,
        }
    }

    /// Attribute a scored post to its author's customer record.
    ///
    /// No-op without a non-empty author identity. An existing customer gains
    /// the post id and the score (scores only ever accumulate); its contact
    /// value is filled if absent but never overwritten. A new customer starts
    /// as `Interested`, and the notifier fires when its initial score exceeds
    /// the alert threshold.
    pub fn upsert(
        &mut self,
        post: &Post,
        score: u32,
        contact: Option<&str>,
        notifier: &dyn Notifier,
    ) -> Option<String> {
        let author = post
            .author
            .as_ref()
            .filter(|author| !author.id.is_empty() && !author.name.is_empty())?;
        let contact = contact.filter(|value| !value.is_empty());

        if let Some(existing) = self.customers.iter_mut().find(|c| c.id == author.id) {
            existing.post_ids.push(post.id.clone());
            existing.score += score;
            if existing.phone.is_none() {
                existing.phone = contact.map(str::to_string);
            }
            return Some(existing.id.clone());
        }

        let customer = Customer {
            id: author.id.clone(),
            name: author.name.clone(),
            phone: contact.map(str::to_string),
            status: CustomerStatus::Interested,
            post_ids: vec![post.id.clone()],
            score,
            last_contact: Utc::now(),
            notes: String::new(),
        };

        if score > self.alert_threshold {
            notifier.notify(
                "High-value prospect",
                &format!("{} scored {}", customer.name, score),
            );
        }

        let id = customer.id.clone();
        self.customers.push(customer);
        Some(id)
    }

    /// All customers, in first-seen order.
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Look up a customer by author id.
    pub fn get(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Number of customers in the given status.
    pub fn count_by_status(&self, status: CustomerStatus) -> usize {
        self.customers.iter().filter(|c| c.status == status).count()
    }
}

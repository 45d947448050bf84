//! Pipeline entry points and engines for the lead monitor.
//!
//! - `ingest`: sequential multi-group feed ingestion and cursor tracking
//! - `score`/`filter`: relevance scoring and post filtering
//! - `ledger`: customer upserts and alerting
//! - `refresh`: the auto-refresh scheduler
//! - `analytics`: session summary statistics
//! - `run`: one entry function per CLI command

pub mod analytics;
pub mod filter;
pub mod ingest;
pub mod ledger;
pub mod refresh;
pub mod run;
pub mod score;

pub use run::{run_fetch, run_resolve, run_test, run_validate, run_watch};

//! Service layer for the lead monitor.
//!
//! This module contains the engines that talk to the outside world:
//! - Feed gateway client (`FeedGateway`, behind the `FeedSource` trait)
//! - Content normalization (`normalize_post`, `normalize_comment`)
//! - Streaming contact lookup (`ContactLookup`)

mod gateway;
mod lookup;
mod normalize;

pub use gateway::{FeedGateway, FeedSource};
pub use lookup::ContactLookup;
pub use normalize::{normalize_comment, normalize_post};

// src/models/mod.rs

//! Domain models for the lead monitor.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod customer;
mod feed;
mod post;
mod session;

// Re-export all public types
pub use config::{
    Config, DateWindow, FilterConfig, GatewayConfig, LoggingConfig, LookupConfig, NoCursorPolicy,
    PathsConfig, RefreshConfig, ScoringConfig,
};
pub use customer::{Customer, CustomerStatus};
pub use feed::{
    ApiError, AttachmentList, CommentList, FeedPage, GroupInfo, Paging, Profile, RawAttachment,
    RawAuthor, RawComment, RawImage, RawMedia, RawPicture, RawPictureData, RawPost,
};
pub use post::{Author, Comment, Post};
pub use session::{ContactDirectory, Session};

//! Post and comment data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The author of a post or comment.
///
/// Absent authorship on the wire is represented as `Option<Author>` on the
/// owning record rather than sentinel strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    /// Platform identifier
    pub id: String,

    /// Display name (may be empty when the platform withholds it)
    pub name: String,

    /// Profile picture URL
    #[serde(default)]
    pub picture: Option<String>,
}

/// A post ingested from a group feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    /// Platform post identifier
    pub id: String,

    /// Raw identifier of the group the post came from
    pub group_id: String,

    /// Resolved group display name (falls back to the raw identifier)
    pub group_name: String,

    /// Post author, when the feed exposes one
    pub author: Option<Author>,

    /// Message text (empty when the post has none)
    pub message: String,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Image URLs collected from the full picture and photo attachments
    pub images: Vec<String>,

    /// First page of comments
    pub comments: Vec<Comment>,
}

/// A comment attached to a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    /// Platform comment identifier
    pub id: String,

    /// Identifier of the parent post
    pub post_id: String,

    /// Comment author, when the feed exposes one
    pub author: Option<Author>,

    /// Message text
    pub message: String,

    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Author identifier, when known.
    pub fn author_id(&self) -> Option<&str> {
        self.author.as_ref().map(|a| a.id.as_str())
    }

    /// Author display name, empty when unknown.
    pub fn author_name(&self) -> &str {
        self.author.as_ref().map_or("", |a| a.name.as_str())
    }

    /// Whether the post carries at least one image.
    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }
}

impl Comment {
    /// Author identifier, when known.
    pub fn author_id(&self) -> Option<&str> {
        self.author.as_ref().map(|a| a.id.as_str())
    }

    /// Author display name, empty when unknown.
    pub fn author_name(&self) -> &str {
        self.author.as_ref().map_or("", |a| a.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post() -> Post {
        Post {
            id: "g1_p1".to_string(),
            group_id: "g1".to_string(),
            group_name: "Test Group".to_string(),
            author: Some(Author {
                id: "u1".to_string(),
                name: "Alice".to_string(),
                picture: None,
            }),
            message: "hello".to_string(),
            created_at: Utc::now(),
            images: vec![],
            comments: vec![],
        }
    }

    #[test]
    fn author_accessors() {
        let post = sample_post();
        assert_eq!(post.author_id(), Some("u1"));
        assert_eq!(post.author_name(), "Alice");
    }

    #[test]
    fn authorless_post_has_empty_name() {
        let mut post = sample_post();
        post.author = None;
        assert_eq!(post.author_id(), None);
        assert_eq!(post.author_name(), "");
    }
}

//! Raw feed gateway wire types.
//!
//! Mirrors the Graph-style JSON the gateway returns for the `posts`, `name`,
//! and `test` actions. Every field the platform may omit is optional; the
//! normalizer is responsible for turning these into domain records.

use serde::Deserialize;
use url::Url;

/// One page of a group feed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedPage {
    /// Feed entries
    #[serde(default)]
    pub data: Vec<RawPost>,

    /// Pagination links
    #[serde(default)]
    pub paging: Option<Paging>,

    /// Error object carried in an otherwise well-formed payload
    #[serde(default)]
    pub error: Option<ApiError>,
}

impl FeedPage {
    /// Extract the continuation token from the next-page link, if any.
    pub fn next_cursor(&self) -> Option<String> {
        let next = self.paging.as_ref()?.next.as_deref()?;
        let url = Url::parse(next).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == "after")
            .map(|(_, value)| value.into_owned())
    }
}

/// Pagination block of a feed page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paging {
    /// Absolute URL of the next page
    #[serde(default)]
    pub next: Option<String>,
}

/// Error object embedded in a gateway payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub code: Option<i64>,
}

impl ApiError {
    /// Human-readable description of the error.
    pub fn describe(&self) -> String {
        match (&self.message, self.code) {
            (Some(message), Some(code)) => format!("{message} (code {code})"),
            (Some(message), None) => message.clone(),
            (None, Some(code)) => format!("code {code}"),
            (None, None) => "unknown gateway error".to_string(),
        }
    }
}

/// A raw feed entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPost {
    pub id: String,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub created_time: Option<String>,

    #[serde(default)]
    pub full_picture: Option<String>,

    #[serde(default)]
    pub attachments: Option<AttachmentList>,

    #[serde(default)]
    pub from: Option<RawAuthor>,

    #[serde(default)]
    pub comments: Option<CommentList>,
}

/// Attachment collection of a raw post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttachmentList {
    #[serde(default)]
    pub data: Vec<RawAttachment>,
}

/// A single attachment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAttachment {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub media: Option<RawMedia>,

    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMedia {
    #[serde(default)]
    pub image: Option<RawImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawImage {
    #[serde(default)]
    pub src: Option<String>,
}

/// Author block on a raw post or comment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAuthor {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub picture: Option<RawPicture>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPicture {
    #[serde(default)]
    pub data: Option<RawPictureData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPictureData {
    #[serde(default)]
    pub url: Option<String>,
}

/// Comment collection of a raw post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentList {
    #[serde(default)]
    pub data: Vec<RawComment>,
}

/// A raw comment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawComment {
    pub id: String,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub created_time: Option<String>,

    #[serde(default)]
    pub from: Option<RawAuthor>,
}

/// Response to the `name` action.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupInfo {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub error: Option<ApiError>,
}

/// Response to the `test` (credential validation) action.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub error: Option<ApiError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_cursor_extracted_from_next_link() {
        let page: FeedPage = serde_json::from_str(
            r#"{"data": [], "paging": {"next": "https://example.com/feed?limit=25&after=tok123"}}"#,
        )
        .unwrap();
        assert_eq!(page.next_cursor(), Some("tok123".to_string()));
    }

    #[test]
    fn next_cursor_absent_without_paging() {
        let page: FeedPage = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert_eq!(page.next_cursor(), None);
    }

    #[test]
    fn next_cursor_absent_without_after_param() {
        let page: FeedPage = serde_json::from_str(
            r#"{"data": [], "paging": {"next": "https://example.com/feed?limit=25"}}"#,
        )
        .unwrap();
        assert_eq!(page.next_cursor(), None);
    }

    #[test]
    fn minimal_post_deserializes() {
        let page: FeedPage = serde_json::from_str(r#"{"data": [{"id": "p1"}]}"#).unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, "p1");
        assert!(page.data[0].message.is_none());
    }

    #[test]
    fn error_payload_describes_itself() {
        let page: FeedPage = serde_json::from_str(
            r#"{"error": {"message": "Invalid OAuth token", "code": 190}}"#,
        )
        .unwrap();
        let error = page.error.unwrap();
        assert_eq!(error.describe(), "Invalid OAuth token (code 190)");
    }
}

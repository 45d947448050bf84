//! Content normalizer.
//!
//! Pure, side-effect-free mapping from raw feed wire records to domain
//! [`Post`] and [`Comment`] records. Every optional wire field may be absent.

use chrono::{DateTime, Utc};

use crate::models::{Author, Comment, Post, RawAuthor, RawComment, RawPost};

/// Map one raw feed entry to a [`Post`], attributed to the given group.
pub fn normalize_post(raw: RawPost, group_id: &str, group_name: &str) -> Post {
    let images = collect_images(&raw);
    let comments = raw
        .comments
        .map(|list| {
            list.data
                .into_iter()
                .map(|comment| normalize_comment(comment, &raw.id))
                .collect()
        })
        .unwrap_or_default();

    Post {
        group_id: group_id.to_string(),
        group_name: group_name.to_string(),
        author: normalize_author(raw.from),
        message: raw.message.unwrap_or_default(),
        created_at: parse_timestamp(raw.created_time.as_deref()),
        images,
        comments,
        id: raw.id,
    }
}

/// Map one raw comment to a [`Comment`], attributed to its parent post.
pub fn normalize_comment(raw: RawComment, post_id: &str) -> Comment {
    Comment {
        id: raw.id,
        post_id: post_id.to_string(),
        author: normalize_author(raw.from),
        message: raw.message.unwrap_or_default(),
        created_at: parse_timestamp(raw.created_time.as_deref()),
    }
}

/// Collect image URLs from the full picture plus any photo-type attachment.
fn collect_images(raw: &RawPost) -> Vec<String> {
    let mut images = Vec::new();

    if let Some(full_picture) = &raw.full_picture {
        if !full_picture.is_empty() {
            images.push(full_picture.clone());
        }
    }

    if let Some(attachments) = &raw.attachments {
        for attachment in &attachments.data {
            if attachment.kind.as_deref() != Some("photo") {
                continue;
            }
            if let Some(src) = attachment
                .media
                .as_ref()
                .and_then(|media| media.image.as_ref())
                .and_then(|image| image.src.as_ref())
            {
                images.push(src.clone());
            }
        }
    }

    images
}

/// An author exists only when the wire record carries a non-empty id;
/// the display name defaults to empty when withheld.
fn normalize_author(raw: Option<RawAuthor>) -> Option<Author> {
    let raw = raw?;
    let id = raw.id.filter(|id| !id.is_empty())?;
    Some(Author {
        id,
        name: raw.name.unwrap_or_default(),
        picture: raw
            .picture
            .and_then(|picture| picture.data)
            .and_then(|data| data.url),
    })
}

/// Parse a Graph-style timestamp, tolerating RFC 3339 and the compact
/// `+0000` offset form; absent or unparseable values default to now.
fn parse_timestamp(value: Option<&str>) -> DateTime<Utc> {
    let Some(value) = value else {
        return Utc::now();
    };
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z"))
        .map(|parsed| parsed.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeedPage;

    const FULL_ENTRY: &str = r#"{
        "id": "g1_p1",
        "message": "selling a great offer",
        "created_time": "2026-08-01T10:30:00+0000",
        "full_picture": "https://cdn.example.com/full.jpg",
        "attachments": {"data": [
            {"type": "photo", "media": {"image": {"src": "https://cdn.example.com/a.jpg"}}},
            {"type": "share", "url": "https://example.com/link"}
        ]},
        "from": {"id": "u1", "name": "Alice", "picture": {"data": {"url": "https://cdn.example.com/p.jpg"}}},
        "comments": {"data": [
            {"id": "c1", "message": "interested!", "created_time": "2026-08-01T11:00:00+0000", "from": {"id": "u2", "name": "Bob"}}
        ]}
    }"#;

    #[test]
    fn full_entry_normalizes() {
        let raw: RawPost = serde_json::from_str(FULL_ENTRY).unwrap();
        let post = normalize_post(raw, "g1", "My Group");

        assert_eq!(post.id, "g1_p1");
        assert_eq!(post.group_id, "g1");
        assert_eq!(post.group_name, "My Group");
        assert_eq!(post.message, "selling a great offer");
        assert_eq!(
            post.images,
            vec![
                "https://cdn.example.com/full.jpg".to_string(),
                "https://cdn.example.com/a.jpg".to_string()
            ]
        );

        let author = post.author.as_ref().unwrap();
        assert_eq!(author.id, "u1");
        assert_eq!(author.name, "Alice");
        assert_eq!(author.picture.as_deref(), Some("https://cdn.example.com/p.jpg"));

        assert_eq!(post.comments.len(), 1);
        let comment = &post.comments[0];
        assert_eq!(comment.post_id, "g1_p1");
        assert_eq!(comment.message, "interested!");
        assert_eq!(comment.author_id(), Some("u2"));
    }

    #[test]
    fn every_optional_field_absent_is_tolerated() {
        let raw: RawPost = serde_json::from_str(r#"{"id": "p0"}"#).unwrap();
        let post = normalize_post(raw, "g1", "g1");

        assert_eq!(post.id, "p0");
        assert_eq!(post.message, "");
        assert!(post.author.is_none());
        assert!(post.images.is_empty());
        assert!(post.comments.is_empty());
    }

    #[test]
    fn non_photo_attachments_are_ignored() {
        let raw: RawPost = serde_json::from_str(
            r#"{"id": "p1", "attachments": {"data": [
                {"type": "share", "media": {"image": {"src": "https://x/share.jpg"}}}
            ]}}"#,
        )
        .unwrap();
        let post = normalize_post(raw, "g1", "g1");
        assert!(post.images.is_empty());
    }

    #[test]
    fn author_without_id_is_absent() {
        let raw: RawPost =
            serde_json::from_str(r#"{"id": "p1", "from": {"name": "Ghost"}}"#).unwrap();
        let post = normalize_post(raw, "g1", "g1");
        assert!(post.author.is_none());
    }

    #[test]
    fn timestamps_parse_both_offset_forms() {
        let compact = parse_timestamp(Some("2026-08-01T10:30:00+0000"));
        let rfc3339 = parse_timestamp(Some("2026-08-01T10:30:00+00:00"));
        assert_eq!(compact, rfc3339);
    }

    #[test]
    fn whole_page_normalizes() {
        let page: FeedPage = serde_json::from_str(&format!(r#"{{"data": [{FULL_ENTRY}]}}"#)).unwrap();
        let posts: Vec<Post> = page
            .data
            .into_iter()
            .map(|raw| normalize_post(raw, "g1", "My Group"))
            .collect();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].comments.len(), 1);
    }
}

//! Operator file formats.
//!
//! The operator supplies the session's inputs as plain files: an access
//! token (trimmed text), a group-id list and keyword lists (JSON arrays of
//! strings). Keyword lists round-trip losslessly through export and import.
//! A malformed file is reported to the caller; prior application state is
//! never touched by a failed import.

use std::path::Path;

use crate::error::{AppError, Result};

/// Load and trim the access token file.
pub async fn load_token(path: &Path) -> Result<String> {
    let text = read_file(path).await?;
    let token = text.trim().to_string();
    if token.is_empty() {
        return Err(AppError::credential(format!(
            "token file {} is empty",
            path.display()
        )));
    }
    Ok(token)
}

/// Load a JSON array of group identifiers.
pub async fn load_group_ids(path: &Path) -> Result<Vec<String>> {
    let text = read_file(path).await?;
    parse_string_list(&text).map_err(|error| AppError::import(path.display().to_string(), error))
}

/// Load a JSON array of keywords.
pub async fn load_keywords(path: &Path) -> Result<Vec<String>> {
    let text = read_file(path).await?;
    parse_string_list(&text).map_err(|error| AppError::import(path.display().to_string(), error))
}

/// Parse a JSON array of strings.
pub fn parse_string_list(text: &str) -> serde_json::Result<Vec<String>> {
    serde_json::from_str(text.trim())
}

/// Render a keyword list as JSON; `parse_string_list` reads it back
/// unchanged.
pub fn keywords_json(keywords: &[String]) -> String {
    serde_json::to_string_pretty(keywords).unwrap_or_else(|_| "[]".to_string())
}

async fn read_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|error| AppError::import(path.display().to_string(), error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn token_is_trimmed() {
        let file = write_file("  EAAtoken123\n");
        assert_eq!(load_token(file.path()).await.unwrap(), "EAAtoken123");
    }

    #[tokio::test]
    async fn empty_token_file_is_a_credential_error() {
        let file = write_file("   \n");
        assert!(matches!(
            load_token(file.path()).await.unwrap_err(),
            AppError::Credential(_)
        ));
    }

    #[tokio::test]
    async fn group_list_parses_json_array() {
        let file = write_file(r#"["123", "456"]"#);
        assert_eq!(
            load_group_ids(file.path()).await.unwrap(),
            vec!["123".to_string(), "456".to_string()]
        );
    }

    #[tokio::test]
    async fn malformed_group_list_is_an_import_error() {
        let file = write_file("123, 456");
        assert!(matches!(
            load_group_ids(file.path()).await.unwrap_err(),
            AppError::Import { .. }
        ));
    }

    #[tokio::test]
    async fn missing_file_is_an_import_error() {
        let result = load_keywords(Path::new("/nonexistent/keywords.json")).await;
        assert!(matches!(result.unwrap_err(), AppError::Import { .. }));
    }

    #[test]
    fn keyword_list_round_trips_losslessly() {
        let keywords = vec![
            "offer".to_string(),
            "عرض".to_string(),
            "for sale".to_string(),
            "offer".to_string(),
        ];
        let exported = keywords_json(&keywords);
        let imported = parse_string_list(&exported).unwrap();
        assert_eq!(imported, keywords);
    }

    #[test]
    fn empty_keyword_list_round_trips() {
        let exported = keywords_json(&[]);
        assert_eq!(parse_string_list(&exported).unwrap(), Vec::<String>::new());
    }
}

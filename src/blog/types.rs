use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Cover image used when the author leaves the field empty
pub const DEFAULT_COVER_IMAGE: &str =
  "https://images.pexels.com/photos/262508/pexels-photo-262508.jpeg";

/// Category assigned when the author gives none
pub const DEFAULT_CATEGORY: &str = "GENERAL";

/// Server-assigned article identifier.
///
/// Opaque to the client. Some backends emit numeric ids, so both JSON
/// strings and integers are accepted and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ArticleId(String);

impl ArticleId {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl From<&str> for ArticleId {
  fn from(s: &str) -> Self {
    Self(s.to_string())
  }
}

impl From<String> for ArticleId {
  fn from(s: String) -> Self {
    Self(s)
  }
}

impl fmt::Display for ArticleId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl<'de> Deserialize<'de> for ArticleId {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
      Text(String),
      Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
      RawId::Text(s) => Self(s),
      RawId::Number(n) => Self(n.to_string()),
    })
  }
}

/// A blog article as stored on the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
  pub id: ArticleId,
  pub title: String,
  #[serde(default)]
  pub category: Vec<String>,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub date: String,
  #[serde(default)]
  pub cover_image: String,
  #[serde(default)]
  pub content: String,
}

impl Article {
  /// First category, shown as the article's primary tag
  pub fn primary_category(&self) -> Option<&str> {
    self.category.first().map(String::as_str)
  }

  pub fn published_at(&self) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&self.date)
      .ok()
      .map(|dt| dt.with_timezone(&Utc))
  }

  /// Estimated reading time in minutes at 200 words per minute
  pub fn read_minutes(&self) -> usize {
    let words = self.content.split_whitespace().count();
    words.div_ceil(200).max(1)
  }
}

/// Payload for creating an article; the server assigns the id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
  pub title: String,
  pub category: Vec<String>,
  pub description: String,
  pub cover_image: String,
  pub content: String,
  pub date: String,
}

/// Format a timestamp the way the API stores creation dates
pub fn format_timestamp(at: DateTime<Utc>) -> String {
  at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  #[test]
  fn test_deserialize_article_with_string_id() {
    let json = r#"{
      "id": "1",
      "title": "Future of Fintech",
      "category": ["FINANCE", "TECH"],
      "description": "How tech is changing finance",
      "date": "2026-01-11T09:12:45.120Z",
      "coverImage": "https://example.com/a.jpg",
      "content": "line one\nline two"
    }"#;

    let article: Article = serde_json::from_str(json).unwrap();
    assert_eq!(article.id, ArticleId::from("1"));
    assert_eq!(article.category, vec!["FINANCE", "TECH"]);
    assert_eq!(article.cover_image, "https://example.com/a.jpg");
    assert_eq!(article.content, "line one\nline two");
    assert_eq!(article.primary_category(), Some("FINANCE"));
  }

  #[test]
  fn test_deserialize_numeric_id() {
    let json = r#"{"id": 42, "title": "Numbers"}"#;
    let article: Article = serde_json::from_str(json).unwrap();
    assert_eq!(article.id.as_str(), "42");
    assert!(article.category.is_empty());
  }

  #[test]
  fn test_new_article_uses_camel_case() {
    let payload = NewArticle {
      title: "t".into(),
      category: vec!["GENERAL".into()],
      description: "d".into(),
      cover_image: DEFAULT_COVER_IMAGE.into(),
      content: "c".into(),
      date: "2026-01-01T00:00:00.000Z".into(),
    };
    let value = serde_json::to_value(&payload).unwrap();
    assert_eq!(value["coverImage"], DEFAULT_COVER_IMAGE);
    assert!(value.get("id").is_none());
  }

  #[test]
  fn test_published_at_and_read_time() {
    let mut article: Article = serde_json::from_str(r#"{"id": "1", "title": "x"}"#).unwrap();
    assert_eq!(article.published_at(), None);
    assert_eq!(article.read_minutes(), 1);

    article.date = "2026-03-04T10:00:00Z".into();
    assert_eq!(
      article.published_at(),
      Some(Utc.with_ymd_and_hms(2026, 3, 4, 10, 0, 0).unwrap())
    );

    article.content = "word ".repeat(401);
    assert_eq!(article.read_minutes(), 3);
  }

  #[test]
  fn test_format_timestamp() {
    let at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
    assert_eq!(format_timestamp(at), "2026-10-19T08:30:00.000Z");
  }
}

use serde::{Deserialize, Deserializer};

/// One news item as returned by the feed endpoint.
///
/// Field names follow the wire format. Every field is optional on the wire; a
/// field holding something other than a string is treated as absent.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Article {
    #[serde(rename = "articleId", default, deserialize_with = "lenient_id")]
    pub article_id: String,
    #[serde(rename = "Title", default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(rename = "Description", default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(rename = "Source", default, deserialize_with = "lenient_string")]
    pub source: Option<String>,
    #[serde(rename = "PubDate", default, deserialize_with = "lenient_string")]
    pub pub_date: Option<String>,
}

impl Article {
    /// Build an article from one element of the feed array. Elements that are
    /// not objects become an article with every field absent.
    pub fn from_value(value: serde_json::Value) -> Self {
        // Derived struct deserializers also accept arrays by position, so
        // only objects are decoded.
        if !value.is_object() {
            tracing::debug!("feed element is not an article object");
            return Self::default();
        }
        match serde_json::from_value(value) {
            Ok(article) => article,
            Err(e) => {
                tracing::debug!(error = %e, "feed element could not be decoded");
                Self::default()
            }
        }
    }

    pub fn display_title(&self) -> &str {
        non_empty(self.title.as_deref()).unwrap_or("Untitled Article")
    }

    pub fn display_source(&self) -> &str {
        non_empty(self.source.as_deref()).unwrap_or("Unknown")
    }

    pub fn display_description(&self) -> Option<&str> {
        non_empty(self.description.as_deref())
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_article_wire_names() {
        let article = Article::from_value(json!({
            "articleId": "https://example.com/story",
            "Title": "Headline",
            "Description": "Body",
            "Source": "BBC News",
            "PubDate": "Mon, 01 Jan 2024 10:00:00 GMT"
        }));

        assert_eq!(article.article_id, "https://example.com/story");
        assert_eq!(article.title.as_deref(), Some("Headline"));
        assert_eq!(article.description.as_deref(), Some("Body"));
        assert_eq!(article.source.as_deref(), Some("BBC News"));
        assert_eq!(
            article.pub_date.as_deref(),
            Some("Mon, 01 Jan 2024 10:00:00 GMT")
        );
    }

    #[test]
    fn test_missing_and_mistyped_fields_are_absent() {
        let article = Article::from_value(json!({
            "Title": 12,
            "Source": null,
            "Extra": "ignored"
        }));

        assert_eq!(article.article_id, "");
        assert_eq!(article.title, None);
        assert_eq!(article.source, None);
        assert_eq!(article.display_title(), "Untitled Article");
        assert_eq!(article.display_source(), "Unknown");
    }

    #[test]
    fn test_non_object_element_becomes_empty_article() {
        assert_eq!(Article::from_value(json!("just a string")), Article::default());
        assert_eq!(Article::from_value(json!(null)), Article::default());
        assert_eq!(Article::from_value(json!(42)), Article::default());
        assert_eq!(
            Article::from_value(json!(["https://x.com/a", "T"])),
            Article::default()
        );
    }

    #[test]
    fn test_empty_strings_fall_back() {
        let article = Article {
            title: Some(String::new()),
            description: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(article.display_title(), "Untitled Article");
        assert_eq!(article.display_description(), None);
    }
}

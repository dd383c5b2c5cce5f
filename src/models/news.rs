//! Destination headlines

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NewsArticle {
    pub title: String,
    pub url: String,
    /// Publisher name
    pub source: String,
    /// ISO timestamp as delivered by the provider
    pub published_at: String,
    pub description: String,
    pub image: Option<String>,
}

impl NewsArticle {
    /// `YYYY-MM-DD` prefix of the publication timestamp
    #[must_use]
    pub fn published_date(&self) -> &str {
        self.published_at
            .get(..10)
            .unwrap_or(self.published_at.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_published_date_prefix() {
        let mut article = NewsArticle {
            title: "Festival".to_string(),
            url: "https://example.com".to_string(),
            source: "Example".to_string(),
            published_at: "2026-10-18T09:00:00Z".to_string(),
            description: String::new(),
            image: None,
        };
        assert_eq!(article.published_date(), "2026-10-18");

        article.published_at = "2026".to_string();
        assert_eq!(article.published_date(), "2026");
    }
}

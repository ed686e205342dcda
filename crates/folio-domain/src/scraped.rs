//! Raw records produced by the publication-index scraper

use serde::{Deserialize, Serialize};

use crate::RecordError;

/// One publication as observed on the external index during a sync run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedRecord {
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    /// Free-text venue label as shown by the index
    #[serde(default)]
    pub venue: String,
    /// The scraper's best guess; often stale or defaulted
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub citations: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl ScrapedRecord {
    pub fn new(title: impl Into<String>, authors: Vec<String>) -> Self {
        Self {
            title: title.into(),
            authors,
            venue: String::new(),
            year: 0,
            citations: 0,
            link: None,
        }
    }

    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = venue.into();
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    pub fn with_citations(mut self, citations: u32) -> Self {
        self.citations = citations;
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// The link, treating an empty string as absent
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref().map(str::trim).filter(|l| !l.is_empty())
    }

    /// Check the engine's input contract: a title and at least one author
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.title.trim().is_empty() {
            return Err(RecordError::EmptyTitle);
        }
        if self.authors.iter().all(|a| a.trim().is_empty()) {
            return Err(RecordError::NoAuthors {
                title: self.title.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        let ok = ScrapedRecord::new("Paper", vec!["J Smith".to_string()]);
        assert!(ok.validate().is_ok());

        let untitled = ScrapedRecord::new("  ", vec!["J Smith".to_string()]);
        assert_eq!(untitled.validate(), Err(RecordError::EmptyTitle));

        let anonymous = ScrapedRecord::new("Paper", vec![" ".to_string()]);
        assert!(matches!(
            anonymous.validate(),
            Err(RecordError::NoAuthors { .. })
        ));
    }

    #[test]
    fn test_empty_link_is_absent() {
        let record = ScrapedRecord::new("Paper", vec![]).with_link("");
        assert_eq!(record.link(), None);
        let record = record.with_link("https://arxiv.org/abs/2403.01234");
        assert_eq!(record.link(), Some("https://arxiv.org/abs/2403.01234"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"[{"title": "Paper", "authors": ["A B"]}]"#;
        let records: Vec<ScrapedRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0].citations, 0);
        assert_eq!(records[0].venue, "");
        assert!(records[0].link.is_none());
    }
}

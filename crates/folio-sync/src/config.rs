//! Configuration for folio-sync
//!
//! Tunables of the reconciliation engine. The defaults are the values the
//! site has always synced with; a settings file only needs to name the keys
//! it changes.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Engine-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Records with more citations than this are marked featured
    pub featured_citation_threshold: u32,
    /// Earliest year accepted from an arXiv identifier
    pub min_arxiv_year: i32,
    /// Earliest year accepted from venue text or the scraper
    pub min_trusted_year: i32,
    /// Teaser image for records created by the engine
    pub default_image: String,
    /// Icon of the paper link on records created by the engine
    pub paper_link_icon: String,
    /// Duplicate detection thresholds
    pub dedup: DedupConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            featured_citation_threshold: 10,
            min_arxiv_year: 2000,
            min_trusted_year: 2020,
            default_image: "teaser/preprint.jpg".to_string(),
            paper_link_icon: "ai ai-arxiv".to_string(),
            dedup: DedupConfig::default(),
        }
    }
}

/// Duplicate detection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Core-word overlap only applies when both titles are longer than this
    pub core_word_min_title_chars: usize,
    /// Tokens must be longer than this to count as core words
    pub core_word_min_token_chars: usize,
    /// Core-word overlap ratio that must be exceeded
    pub core_word_ratio: f64,
    /// Authors must be longer than this to be compared
    pub min_author_chars: usize,
    /// Common authors needed for the author+title rule
    pub min_common_authors: usize,
    /// Title tokens must be longer than this to count toward title overlap
    pub title_token_min_chars: usize,
    /// Title overlap needed by the author+title rule
    pub min_title_overlap: usize,
    /// Overlap ratio needed when both titles are surveys
    pub survey_overlap_ratio: f64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            core_word_min_title_chars: 20,
            core_word_min_token_chars: 3,
            core_word_ratio: 0.85,
            min_author_chars: 2,
            min_common_authors: 3,
            title_token_min_chars: 4,
            min_title_overlap: 5,
            survey_overlap_ratio: 0.70,
        }
    }
}

impl SyncConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_arxiv_year > self.min_trusted_year {
            return Err(ConfigError::InvalidThreshold(
                "min_arxiv_year must not be later than min_trusted_year".to_string(),
            ));
        }

        for (name, ratio) in [
            ("dedup.core_word_ratio", self.dedup.core_word_ratio),
            ("dedup.survey_overlap_ratio", self.dedup.survey_overlap_ratio),
        ] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(ConfigError::OutOfRange(format!(
                    "{} must be between 0.0 and 1.0",
                    name
                )));
            }
        }

        if self.dedup.min_common_authors == 0 {
            return Err(ConfigError::OutOfRange(
                "dedup.min_common_authors must be positive".to_string(),
            ));
        }

        if self.default_image.trim().is_empty() {
            return Err(ConfigError::OutOfRange(
                "default_image must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

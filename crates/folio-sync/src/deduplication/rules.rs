//! Duplicate match rules
//!
//! Each rule is a standalone predicate over a candidate and one existing
//! record. [`MatchRule::ALL`] fixes the order in which they are tried.

use folio_domain::{PublicationRecord, ScrapedRecord};

use super::normalization::{normalize_author, normalize_title, tokens_longer_than};
use crate::config::DedupConfig;

/// A scraped record prepared for comparison
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub title: &'a str,
    title_lower: String,
    clean_title: String,
    authors: Vec<String>,
}

impl<'a> Candidate<'a> {
    pub fn new(record: &'a ScrapedRecord) -> Self {
        Self {
            title: &record.title,
            title_lower: record.title.to_lowercase(),
            clean_title: normalize_title(&record.title),
            authors: record.authors.iter().map(|a| normalize_author(a)).collect(),
        }
    }
}

/// The rule that identified a duplicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchRule {
    /// Case-insensitive title equality
    ExactTitle,
    /// Title equality after stripping punctuation
    NormalizedTitle,
    /// Most significant title words shared
    CoreWordOverlap,
    /// Several shared authors plus overlapping title words
    AuthorTitle,
}

impl MatchRule {
    /// Rules in evaluation order
    pub const ALL: [MatchRule; 4] = [
        MatchRule::ExactTitle,
        MatchRule::NormalizedTitle,
        MatchRule::CoreWordOverlap,
        MatchRule::AuthorTitle,
    ];

    pub fn matches(
        &self,
        candidate: &Candidate<'_>,
        existing: &PublicationRecord,
        config: &DedupConfig,
    ) -> bool {
        match self {
            MatchRule::ExactTitle => exact_title(candidate, existing),
            MatchRule::NormalizedTitle => normalized_title(candidate, existing),
            MatchRule::CoreWordOverlap => core_word_overlap(candidate, existing, config),
            MatchRule::AuthorTitle => author_title(candidate, existing, config),
        }
    }
}

impl std::fmt::Display for MatchRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MatchRule::ExactTitle => "exact title",
            MatchRule::NormalizedTitle => "normalized title",
            MatchRule::CoreWordOverlap => "core word",
            MatchRule::AuthorTitle => "author+title",
        };
        f.write_str(name)
    }
}

pub fn exact_title(candidate: &Candidate<'_>, existing: &PublicationRecord) -> bool {
    candidate.title_lower == existing.title.to_lowercase()
}

pub fn normalized_title(candidate: &Candidate<'_>, existing: &PublicationRecord) -> bool {
    candidate.clean_title == normalize_title(&existing.title)
}

/// Share of significant words in common, for titles long enough to judge
pub fn core_word_overlap(
    candidate: &Candidate<'_>,
    existing: &PublicationRecord,
    config: &DedupConfig,
) -> bool {
    let min_title = config.core_word_min_title_chars;
    if candidate.title.chars().count() <= min_title || existing.title.chars().count() <= min_title
    {
        return false;
    }

    let existing_clean = normalize_title(&existing.title);
    let new_words = tokens_longer_than(&candidate.clean_title, config.core_word_min_token_chars);
    let existing_words = tokens_longer_than(&existing_clean, config.core_word_min_token_chars);

    let denominator = new_words.len().max(existing_words.len());
    if denominator == 0 {
        return false;
    }

    let common = new_words
        .iter()
        .filter(|w| existing_words.contains(w))
        .count();
    common as f64 / denominator as f64 > config.core_word_ratio
}

/// Shared authors plus title vocabulary; surveys need a proportional overlap
pub fn author_title(
    candidate: &Candidate<'_>,
    existing: &PublicationRecord,
    config: &DedupConfig,
) -> bool {
    let min_chars = config.min_author_chars;
    let existing_authors: Vec<String> = existing
        .authors
        .iter()
        .map(|a| normalize_author(a))
        .filter(|a| a.chars().count() > min_chars)
        .collect();

    let common_authors = candidate
        .authors
        .iter()
        .filter(|na| na.chars().count() > min_chars)
        .filter(|na| {
            existing_authors
                .iter()
                .any(|ea| ea.contains(na.as_str()) || na.contains(ea.as_str()))
        })
        .count();
    if common_authors < config.min_common_authors {
        return false;
    }

    let existing_clean = normalize_title(&existing.title);
    let title_overlap = tokens_longer_than(&candidate.clean_title, config.title_token_min_chars)
        .into_iter()
        .filter(|w| existing_clean.contains(w))
        .count();

    if is_survey(&candidate.clean_title) && is_survey(&existing_clean) {
        let denominator = candidate
            .clean_title
            .split_whitespace()
            .count()
            .max(existing_clean.split_whitespace().count());
        if denominator == 0 {
            return false;
        }
        let ratio = title_overlap as f64 / denominator as f64;
        if ratio >= config.survey_overlap_ratio {
            return true;
        }
        tracing::debug!(
            "Surveys share {} authors but not a topic: {:?} vs {:?} (overlap ratio {:.2})",
            common_authors,
            candidate.title,
            existing.title,
            ratio
        );
        false
    } else {
        title_overlap >= config.min_title_overlap
    }
}

fn is_survey(clean_title: &str) -> bool {
    clean_title.contains("survey")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scraped(title: &str, authors: &[&str]) -> ScrapedRecord {
        ScrapedRecord::new(title, authors.iter().map(|a| a.to_string()).collect())
    }

    fn existing(title: &str, authors: &[&str]) -> PublicationRecord {
        PublicationRecord::new(title, authors.iter().map(|a| a.to_string()).collect())
    }

    const TEAM: [&str; 3] = ["Jane Doe", "John Smith", "Ada Lovelace"];

    #[test]
    fn test_exact_title() {
        let record = scraped("Deep Learning Is Cool", &[]);
        let candidate = Candidate::new(&record);
        assert!(exact_title(&candidate, &existing("deep learning is cool", &[])));
        assert!(!exact_title(&candidate, &existing("Deep Learning Is Cool!", &[])));
    }

    #[test]
    fn test_normalized_title() {
        let record = scraped("NeRF: Neural Radiance Fields", &[]);
        let candidate = Candidate::new(&record);
        assert!(normalized_title(&candidate, &existing("nerf neural radiance fields", &[])));
        assert!(!normalized_title(&candidate, &existing("NeRF Radiance Fields", &[])));
    }

    #[test]
    fn test_core_word_overlap() {
        let config = DedupConfig::default();
        let record = scraped(
            "Learning Dense Correspondence Fields for Robust Video Matting",
            &[],
        );
        let candidate = Candidate::new(&record);

        // All seven significant words shared, only short words differ
        let same = existing(
            "Learning Dense Correspondence Fields in Robust Video Matting",
            &[],
        );
        assert!(core_word_overlap(&candidate, &same, &config));

        // 6 of 7 shared is 0.857, just above the bar
        let near = existing(
            "Learning Dense Correspondence Fields for Robust Image Matting",
            &[],
        );
        assert!(core_word_overlap(&candidate, &near, &config));

        // 5 of 7 is not enough
        let far = existing(
            "Learning Sparse Correspondence Fields for Robust Image Matting",
            &[],
        );
        assert!(!core_word_overlap(&candidate, &far, &config));
    }

    #[test]
    fn test_core_word_overlap_needs_long_titles() {
        let config = DedupConfig::default();
        let record = scraped("Dense Video Matting", &[]);
        let candidate = Candidate::new(&record);
        assert!(!core_word_overlap(&candidate, &existing("Dense Video Matting!!", &[]), &config));
    }

    #[test]
    fn test_core_word_overlap_without_significant_words() {
        let config = DedupConfig::default();
        let record = scraped("a b c d e f g h i j k l m", &[]);
        let candidate = Candidate::new(&record);
        assert!(!core_word_overlap(&candidate, &existing("a b c d e f g h i j k l m n", &[]), &config));
    }

    #[test]
    fn test_author_title_requires_three_authors() {
        let config = DedupConfig::default();
        let record = scraped(
            "Efficient Neural Rendering Through Sparse Voxel Grids",
            &["Jane Doe", "John Smith"],
        );
        let candidate = Candidate::new(&record);
        let other = existing(
            "Efficient Neural Rendering Using Sparse Voxel Grids Revisited",
            &TEAM,
        );
        assert!(!author_title(&candidate, &other, &config));
    }

    #[test]
    fn test_author_title_match() {
        let config = DedupConfig::default();
        let record = scraped(
            "Efficient Neural Rendering Through Sparse Voxel Grids",
            &["J Doe", "John Smith", "Ada Lovelace", "Someone Else"],
        );
        let candidate = Candidate::new(&record);
        // "j doe" is not contained in "jane doe", the other three authors match
        let renamed = existing(
            "Towards Efficient Neural Rendering with Sparse Voxel Grids",
            &["Jane Doe", "John Smith", "Ada Lovelace", "Someone Else"],
        );
        assert!(author_title(&candidate, &renamed, &config));

        let unrelated = existing(
            "Efficient Sparse Attention for Language Models",
            &["Jane Doe", "John Smith", "Ada Lovelace", "Someone Else"],
        );
        assert!(!author_title(&candidate, &unrelated, &config));
    }

    #[test]
    fn test_author_containment_needs_three_chars() {
        let config = DedupConfig::default();
        let record = scraped(
            "Efficient Neural Rendering Through Sparse Voxel Grids",
            &["Al", "Bo", "Cy"],
        );
        let candidate = Candidate::new(&record);
        let other = existing(
            "Efficient Neural Rendering Through Sparse Voxel Grids v2",
            &["Alan", "Bob", "Cyril"],
        );
        assert!(!author_title(&candidate, &other, &config));
    }

    #[test]
    fn test_survey_needs_proportional_overlap() {
        let config = DedupConfig::default();

        let record = scraped("Survey Vision Models Medical Imaging Robotics", &TEAM);
        let candidate = Candidate::new(&record);
        // 3 of 6 words overlap
        let half = existing("Survey Vision Models Language Agents Planning", &TEAM);
        assert!(!author_title(&candidate, &half, &config));

        let record = scraped("Survey Diffusion Models Video Generation", &TEAM);
        let candidate = Candidate::new(&record);
        // 4 of 5 words overlap
        let most = existing("Survey Diffusion Models Image Generation", &TEAM);
        assert!(author_title(&candidate, &most, &config));
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(MatchRule::ALL[0], MatchRule::ExactTitle);
        assert_eq!(MatchRule::ALL[3], MatchRule::AuthorTitle);
        assert_eq!(MatchRule::CoreWordOverlap.to_string(), "core word");
    }
}

//! Duplicate detection for scraped publications
//!
//! A scraped record is compared against every record of every year bucket,
//! since the same paper is often filed under a different year than the one
//! inferred for it now. The match rules are independent predicates tried in
//! order; see [`rules`].

mod normalization;
pub mod rules;

use folio_domain::{PublicationStore, RecordLocation, ScrapedRecord};

use crate::config::DedupConfig;

pub use normalization::{normalize_author, normalize_title};
pub use rules::MatchRule;

/// An existing record judged to be the same publication as a candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateMatch {
    pub location: RecordLocation,
    pub rule: MatchRule,
}

/// Find the existing record a candidate duplicates, if any.
///
/// Records are visited in document order and every rule is tried on a
/// record before moving on, so the first record matching any rule wins even
/// when a later record matches a stricter rule.
pub fn find_duplicate(
    candidate: &ScrapedRecord,
    store: &PublicationStore,
    config: &DedupConfig,
) -> Option<DuplicateMatch> {
    let candidate = rules::Candidate::new(candidate);

    store.records().find_map(|(location, existing)| {
        let rule = MatchRule::ALL
            .into_iter()
            .find(|rule| rule.matches(&candidate, existing, config))?;
        tracing::debug!(
            "Found {} match: {:?} vs {:?}",
            rule,
            candidate.title,
            existing.title
        );
        Some(DuplicateMatch { location, rule })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_domain::PublicationRecord;

    fn authors(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_searches_every_bucket() {
        let mut store = PublicationStore::new();
        store.push("2025", PublicationRecord::new("Other Paper", authors(&["X Y"])));
        store.push("2023", PublicationRecord::new("Neural Fields", authors(&["X Y"])));

        let candidate = ScrapedRecord::new("neural fields", authors(&["X Y"]));
        let found = find_duplicate(&candidate, &store, &DedupConfig::default()).unwrap();
        assert_eq!(found.location.bucket, "2023");
        assert_eq!(found.rule, MatchRule::ExactTitle);
    }

    #[test]
    fn test_earlier_record_beats_stricter_rule() {
        let mut store = PublicationStore::new();
        // Matches only by punctuation-insensitive comparison
        store.push(
            "2025",
            PublicationRecord::new("Neural Fields: A Primer", authors(&["X Y"])),
        );
        // Matches exactly
        store.push(
            "2024",
            PublicationRecord::new("Neural Fields A Primer", authors(&["X Y"])),
        );

        let candidate = ScrapedRecord::new("Neural Fields A Primer", authors(&["X Y"]));
        let found = find_duplicate(&candidate, &store, &DedupConfig::default()).unwrap();
        assert_eq!(found.location.bucket, "2025");
        assert_eq!(found.rule, MatchRule::NormalizedTitle);
    }

    #[test]
    fn test_no_match() {
        let mut store = PublicationStore::new();
        store.push("2024", PublicationRecord::new("Neural Fields", authors(&["X Y"])));
        let candidate = ScrapedRecord::new("Gaussian Splats", authors(&["X Y"]));
        assert!(find_duplicate(&candidate, &store, &DedupConfig::default()).is_none());
        assert!(find_duplicate(&candidate, &PublicationStore::new(), &DedupConfig::default()).is_none());
    }
}

//! folio-sync: publication reconciliation engine
//!
//! This library merges publication records scraped from an external index
//! into the year-bucketed publication store of the site document:
//! - Venue classification and display labels
//! - Year inference (arXiv identifiers, venue text, scraper year)
//! - Duplicate detection across every year bucket
//! - Author name normalization against known full names
//! - Restricted, non-destructive updates of existing records
//! - Document-level sync runs with run metadata

pub mod authors;
pub mod config;
pub mod deduplication;
pub mod error;
pub mod merge;
pub mod reconcile;
pub mod sync;
pub mod venue;
pub mod year;

// Re-export main types for convenience
pub use authors::{normalize_authors, AuthorLookup};
pub use config::{DedupConfig, SyncConfig};
pub use deduplication::{find_duplicate, DuplicateMatch, MatchRule};
pub use error::{ConfigError, SyncError};
pub use merge::{apply_restricted_update, is_venue_user_customized, FieldChange, UpdateOutcome};
pub use reconcile::{reconcile, ReconcileReport, Reconciler, RecordOutcome};
pub use sync::{sync_document, SyncRun};
pub use venue::{classify, format_venue, ClassifiedVenue};
pub use year::{infer, infer_year, InferredYear, YearSource};

/// Returns the version of folio-sync
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}

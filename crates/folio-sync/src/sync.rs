//! Document-level sync runs
//!
//! Wraps a reconciliation pass over the document's publication store and
//! records the run under `_scholar_sync`.

use folio_domain::{DocumentError, ScrapedRecord, SiteDocument, SyncMetadata};

use crate::error::Result;
use crate::reconcile::{ReconcileReport, Reconciler};

/// Outcome of syncing one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncRun {
    pub report: ReconcileReport,
    /// Whether the document has changes worth saving
    pub changes_made: bool,
}

impl SyncRun {
    /// A run that did nothing
    pub fn skipped() -> Self {
        Self::default()
    }
}

/// Sync scraped records into a document.
///
/// The owner is `owner_override` when given, else `personal.name`. An empty
/// input leaves the document untouched, run metadata included.
pub fn sync_document(
    document: &mut SiteDocument,
    scraped: &[ScrapedRecord],
    reconciler: &Reconciler,
    owner_override: Option<&str>,
) -> Result<SyncRun> {
    let owner = match owner_override.map(str::trim) {
        Some("") => return Err(DocumentError::MissingOwner.into()),
        Some(owner) => owner.to_string(),
        None => document.owner_name()?.to_string(),
    };

    if scraped.is_empty() {
        tracing::info!("No scraped publications, nothing to sync");
        return Ok(SyncRun::skipped());
    }

    tracing::info!(
        "Syncing {} scraped publications for {}",
        scraped.len(),
        owner
    );
    let report = reconciler.reconcile(scraped, &mut document.publications, &owner);

    document.scholar_sync = Some(SyncMetadata {
        last_sync_date: reconciler.today(),
        last_sync_status: report.summary(),
    });

    let changes_made = report.has_changes();
    Ok(SyncRun {
        report,
        changes_made,
    })
}

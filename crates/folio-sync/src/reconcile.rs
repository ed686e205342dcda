//! Reconciliation of scraped records into the publication store
//!
//! Records are processed one at a time in input order. Each one is either
//! filed as a new publication, used to refresh the record it duplicates, or
//! dropped because the match is protected or the record is malformed.
//! Records created earlier in a pass take part in deduplication of later
//! ones.

use chrono::{Datelike, NaiveDate};
use folio_domain::{
    PublicationLink, PublicationRecord, PublicationStore, RecordError, ScrapedRecord,
    PAPER_LINK_NAME,
};
use indexmap::IndexMap;

use crate::authors::AuthorLookup;
use crate::config::SyncConfig;
use crate::deduplication::find_duplicate;
use crate::merge::{apply_restricted_update, FieldChange};
use crate::venue::{classify, format_venue, ClassifiedVenue};
use crate::year::infer;

/// What happened to one scraped record
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// Filed as a new publication under `year`
    Created { year: String, title: String },
    /// Matched an existing record and changed visible fields
    Updated {
        title: String,
        changes: Vec<FieldChange>,
    },
    /// Matched an existing record that needed no visible change
    Unchanged { title: String },
    /// Matched a record frozen with `auto_sync: false`
    Protected { title: String },
    /// Failed validation; `index` is its position in the input
    Rejected { index: usize, reason: RecordError },
}

/// Result of a reconciliation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    /// New records by year label, in creation order
    pub created: IndexMap<String, Vec<PublicationRecord>>,
    pub updated_count: usize,
    pub skipped_protected_count: usize,
    /// Matched records whose stored citation count changed
    pub citations_refreshed: usize,
    /// One entry per scraped record, in input order
    pub outcomes: Vec<RecordOutcome>,
}

impl ReconcileReport {
    pub fn created_count(&self) -> usize {
        self.created.values().map(Vec::len).sum()
    }

    pub fn rejected_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, RecordOutcome::Rejected { .. }))
            .count()
    }

    /// Whether the pass changed anything worth saving
    pub fn has_changes(&self) -> bool {
        self.created_count() > 0 || self.updated_count > 0 || self.citations_refreshed > 0
    }

    /// One-line human-readable summary
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} added, {} updated, {} protected skipped, {} citation counts refreshed",
            self.created_count(),
            self.updated_count,
            self.skipped_protected_count,
            self.citations_refreshed
        );
        let rejected = self.rejected_count();
        if rejected > 0 {
            summary.push_str(&format!(", {} rejected", rejected));
        }
        summary
    }
}

/// Reconciliation engine with its settings and reference date
#[derive(Debug, Clone)]
pub struct Reconciler {
    config: SyncConfig,
    today: NaiveDate,
}

impl Reconciler {
    pub fn new(config: SyncConfig, today: NaiveDate) -> Self {
        Self { config, today }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Merge scraped records into `store`.
    ///
    /// New records are appended to the store right away and also listed in
    /// [`ReconcileReport::created`]. An empty input leaves the store alone.
    pub fn reconcile(
        &self,
        scraped: &[ScrapedRecord],
        store: &mut PublicationStore,
        owner: &str,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        for (index, record) in scraped.iter().enumerate() {
            let outcome = match record.validate() {
                Ok(()) => self.reconcile_one(record, store, owner, &mut report),
                Err(reason) => {
                    tracing::warn!("Rejecting scraped record #{}: {}", index, reason);
                    RecordOutcome::Rejected { index, reason }
                }
            };
            report.outcomes.push(outcome);
        }

        if !scraped.is_empty() {
            tracing::info!("Reconciliation finished: {}", report.summary());
        }
        report
    }

    fn reconcile_one(
        &self,
        record: &ScrapedRecord,
        store: &mut PublicationStore,
        owner: &str,
        report: &mut ReconcileReport,
    ) -> RecordOutcome {
        let classified = classify(&record.venue);
        let inferred = infer(record, &classified, self.today.year(), &self.config);
        let venue_label = format_venue(&classified, inferred.arxiv_yymm.as_deref());

        let candidate = ScrapedRecord {
            authors: AuthorLookup::build(owner, store).normalize(&record.authors),
            ..record.clone()
        };

        let existing = match find_duplicate(&candidate, store, &self.config.dedup) {
            Some(found) => {
                let existing = store.get_mut(&found.location);
                debug_assert!(existing.is_some(), "no record at {:?}", found.location);
                if existing.is_none() {
                    tracing::warn!(
                        "Matched record at {:?} is missing, adding {:?} as new",
                        found.location,
                        candidate.title
                    );
                }
                existing
            }
            None => None,
        };
        match existing {
            Some(existing) if existing.is_protected() => {
                tracing::info!("Skipping protected publication: {:?}", existing.title);
                report.skipped_protected_count += 1;
                RecordOutcome::Protected {
                    title: existing.title.clone(),
                }
            }
            Some(existing) => {
                let update = apply_restricted_update(
                    existing,
                    &candidate,
                    &venue_label,
                    &classified,
                    &self.config,
                    self.today,
                );
                if update.citations_stamped {
                    report.citations_refreshed += 1;
                }

                let title = existing.title.clone();
                if update.changed() {
                    for change in &update.changes {
                        tracing::info!("Updated {:?}: {}", title, change);
                    }
                    report.updated_count += 1;
                    RecordOutcome::Updated {
                        title,
                        changes: update.changes,
                    }
                } else {
                    tracing::debug!("No visible changes for {:?}", title);
                    RecordOutcome::Unchanged { title }
                }
            }
            None => {
                let year = inferred.label();
                let created = self.new_record(candidate, venue_label, &classified);
                tracing::info!(
                    "Added new publication under {}: {:?} (year from {})",
                    year,
                    created.title,
                    inferred.source
                );

                let title = created.title.clone();
                store.push(year.clone(), created.clone());
                report.created.entry(year.clone()).or_default().push(created);
                RecordOutcome::Created { year, title }
            }
        }
    }

    fn new_record(
        &self,
        candidate: ScrapedRecord,
        venue_label: String,
        classified: &ClassifiedVenue,
    ) -> PublicationRecord {
        let link = PublicationLink::new(
            PAPER_LINK_NAME,
            candidate.link().unwrap_or("#"),
            self.config.paper_link_icon.as_str(),
        );

        let mut record = PublicationRecord::new(candidate.title, candidate.authors)
            .with_venue(venue_label, classified.venue_type.clone())
            .with_auto_sync(true)
            .with_link(link);
        record.image = Some(self.config.default_image.clone());
        record.featured = candidate.citations > self.config.featured_citation_threshold;
        if candidate.citations > 0 {
            record.scholar_citations = Some(candidate.citations);
            record.scholar_last_updated = Some(self.today);
        }
        record
    }
}

/// Reconcile with the default settings
pub fn reconcile(
    scraped: &[ScrapedRecord],
    store: &mut PublicationStore,
    owner: &str,
    today: NaiveDate,
) -> ReconcileReport {
    Reconciler::new(SyncConfig::default(), today).reconcile(scraped, store, owner)
}

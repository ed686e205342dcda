//! Restricted update of matched records
//!
//! Once a scraped record matches a persisted one, only a few fields may be
//! touched: the featured flag, a generic venue label, a placeholder paper
//! link, and the private citation stamp. Everything else belongs to the
//! site owner.

mod venue_guard;

use chrono::NaiveDate;
use folio_domain::{PublicationRecord, ScrapedRecord, VenueType, PAPER_LINK_NAME};

use crate::config::SyncConfig;
use crate::venue::ClassifiedVenue;

pub use venue_guard::is_venue_user_customized;

/// Venue labels that only say what kind of venue a record has
const PLACEHOLDER_VENUES: &[&str] = &["Conference", "Journal", "arXiv"];

/// A visible field changed by a restricted update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    Featured,
    Venue { from: String, to: String },
    Link { url: String },
}

impl std::fmt::Display for FieldChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldChange::Featured => write!(f, "featured"),
            FieldChange::Venue { from, to } => write!(f, "venue {:?} -> {:?}", from, to),
            FieldChange::Link { url } => write!(f, "paper link {}", url),
        }
    }
}

/// What a restricted update did to a record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub changes: Vec<FieldChange>,
    /// The stored citation count changed (not a visible change)
    pub citations_stamped: bool,
}

impl UpdateOutcome {
    /// Whether any visible field changed
    pub fn changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

fn is_placeholder_venue(record: &PublicationRecord) -> bool {
    PLACEHOLDER_VENUES.contains(&record.venue.as_str())
        || record.venue_type == Some(VenueType::Conference)
}

/// Apply a new observation to a matched, unprotected record.
///
/// `venue_label` is the formatted label for the observation and
/// `classified` its classification. The caller checks protection first.
pub fn apply_restricted_update(
    existing: &mut PublicationRecord,
    observation: &ScrapedRecord,
    venue_label: &str,
    classified: &ClassifiedVenue,
    config: &SyncConfig,
    today: NaiveDate,
) -> UpdateOutcome {
    let mut outcome = UpdateOutcome::default();

    if observation.citations > config.featured_citation_threshold && !existing.featured {
        existing.featured = true;
        outcome.changes.push(FieldChange::Featured);
    }

    if is_venue_user_customized(&existing.venue) {
        tracing::debug!(
            "Keeping user-customized venue {:?} of {:?}",
            existing.venue,
            existing.title
        );
    } else if is_placeholder_venue(existing)
        && !venue_label.is_empty()
        && existing.venue != venue_label
    {
        let from = std::mem::replace(&mut existing.venue, venue_label.to_string());
        existing.venue_type = Some(classified.venue_type.clone());
        outcome.changes.push(FieldChange::Venue {
            from,
            to: venue_label.to_string(),
        });
    }

    if let Some(url) = observation.link().filter(|url| *url != "#") {
        if let Some(link) = existing.links.iter_mut().find(|link| link.is_placeholder()) {
            tracing::debug!(
                "Replacing {:?} link of {:?} with {}",
                link.name,
                existing.title,
                url
            );
            link.url = url.to_string();
            link.name = PAPER_LINK_NAME.to_string();
            outcome.changes.push(FieldChange::Link {
                url: url.to_string(),
            });
        }
    }

    if observation.citations > 0 {
        outcome.citations_stamped = existing.scholar_citations != Some(observation.citations);
        existing.scholar_citations = Some(observation.citations);
        existing.scholar_last_updated = Some(today);
    }

    outcome
}

//! Venue classification
//!
//! Maps the free-text venue shown by the publication index to a venue type
//! and the label stored on the record.

use folio_domain::VenueType;

/// Known venues, matched case-insensitively as substrings. Order matters:
/// the first entry contained in the text wins.
const KNOWN_VENUES: &[(&str, VenueType)] = &[
    ("CVPR", VenueType::Conference),
    ("ICCV", VenueType::Conference),
    ("ECCV", VenueType::Conference),
    ("NeurIPS", VenueType::Conference),
    ("ICML", VenueType::Conference),
    ("ICLR", VenueType::Conference),
    ("AAAI", VenueType::Conference),
    ("IJCAI", VenueType::Conference),
    ("WACV", VenueType::Conference),
    ("3DV", VenueType::Conference),
    ("arXiv", VenueType::Preprint),
];

const ARXIV: &str = "arXiv";

/// Result of classifying a venue string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedVenue {
    pub venue_type: VenueType,
    pub display_name: String,
}

impl ClassifiedVenue {
    fn new(venue_type: VenueType, display_name: impl Into<String>) -> Self {
        Self {
            venue_type,
            display_name: display_name.into(),
        }
    }
}

/// Classify a venue string. Never fails: unknown venues are conferences.
pub fn classify(venue_text: &str) -> ClassifiedVenue {
    let lower = venue_text.to_lowercase();

    if let Some((name, venue_type)) = KNOWN_VENUES
        .iter()
        .find(|(name, _)| lower.contains(&name.to_lowercase()))
    {
        return ClassifiedVenue::new(venue_type.clone(), *name);
    }

    if lower.contains("arxiv") {
        ClassifiedVenue::new(VenueType::Preprint, ARXIV)
    } else if lower.contains("journal") {
        ClassifiedVenue::new(VenueType::Journal, venue_text)
    } else {
        ClassifiedVenue::new(VenueType::Conference, venue_text)
    }
}

/// The venue label stored on a record.
///
/// Preprints whose venue text carried an arXiv identifier are labelled
/// `arXiv'YYMM`; everything else uses the classifier's display name.
pub fn format_venue(classified: &ClassifiedVenue, arxiv_yymm: Option<&str>) -> String {
    match (&classified.venue_type, arxiv_yymm) {
        (VenueType::Preprint, Some(yymm)) => format!("{}'{}", ARXIV, yymm),
        _ => classified.display_name.clone(),
    }
}

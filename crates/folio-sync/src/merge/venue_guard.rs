//! Detection of venue labels written by hand

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // CVPR'22, NeurIPS'25, 3DV'24
    static ref ABBREV_YY_REGEX: Regex = Regex::new(r"^[A-Za-z0-9]+'[0-9]{2}$").unwrap();

    // CVPR 2022, WACV 2025
    static ref NAME_YEAR_REGEX: Regex = Regex::new(r"^[A-Za-z]+\s+20[0-9]{2}$").unwrap();

    // arXiv'2508
    static ref ARXIV_YYMM_REGEX: Regex = Regex::new(r"^arXiv'[0-9]{4}$").unwrap();
}

const SPECIAL_VENUES: &[&str] = &["Under Review", "Journal", "Conference"];

// Plain case-sensitive substring tests: `and` also fires inside words, so
// "Grand Challenge" counts as hand-written. Existing sites depend on this.
const CUSTOM_MARKERS: &[&str] = &["(", ")", "&", "and"];

/// Whether a stored venue label looks curated by a human.
///
/// Such labels are never overwritten by a sync. An empty label is not
/// customized.
pub fn is_venue_user_customized(venue: &str) -> bool {
    if venue.is_empty() {
        return false;
    }

    ABBREV_YY_REGEX.is_match(venue)
        || NAME_YEAR_REGEX.is_match(venue)
        || ARXIV_YYMM_REGEX.is_match(venue)
        || SPECIAL_VENUES.contains(&venue)
        || CUSTOM_MARKERS.iter().any(|marker| venue.contains(marker))
}

//! Year inference for scraped records
//!
//! Index pages often carry a stale or defaulted year, while arXiv
//! identifiers embed the submission date. Sources are tried in order:
//! arXiv link, arXiv identifier in the venue text, a year in the venue,
//! the scraper's year, and finally the current year.

use folio_domain::ScrapedRecord;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::config::SyncConfig;
use crate::venue::ClassifiedVenue;

lazy_static! {
    // New-style identifier in a link: .../abs/YYMM.NNNNN (or /pdf/)
    static ref ARXIV_LINK_REGEX: Regex = Regex::new(
        r"/(?:abs|pdf)/(?P<yy>\d{2})(?P<mm>\d{2})\.\d{4,5}"
    ).unwrap();

    // Legacy identifier in a link: .../abs/subject-class/YYMMnnn
    static ref ARXIV_LEGACY_LINK_REGEX: Regex = Regex::new(
        r"(?i)/(?:abs|pdf)/[a-z-]+(?:\.[a-z-]+)?/(?P<yy>\d{2})(?P<mm>\d{2})\d{3}"
    ).unwrap();

    // Identifier in venue text: arXiv:YYMM.NNNNN, arxiv.org/abs/YYMM.NNNNN, arXiv YYMM.NNNNN
    static ref ARXIV_VENUE_REGEX: Regex = Regex::new(
        r"(?i)arxiv(?:\.org)?[:\s/]*(?:abs/)?(?P<yy>\d{2})(?P<mm>\d{2})\.\d{4,5}"
    ).unwrap();

    static ref YEAR_REGEX: Regex = Regex::new(r"20\d{2}").unwrap();
}

/// Where an inferred year came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearSource {
    ArxivLink,
    ArxivVenue,
    Venue,
    Scraper,
    Fallback,
}

impl std::fmt::Display for YearSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            YearSource::ArxivLink => "arXiv link",
            YearSource::ArxivVenue => "arXiv venue",
            YearSource::Venue => "venue",
            YearSource::Scraper => "scraper",
            YearSource::Fallback => "current",
        };
        f.write_str(name)
    }
}

/// An inferred year with its provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredYear {
    pub year: i32,
    pub source: YearSource,
    /// `YYMM` of an arXiv identifier found in the venue text
    pub arxiv_yymm: Option<String>,
}

impl InferredYear {
    /// Bucket label for the inferred year
    pub fn label(&self) -> String {
        self.year.to_string()
    }
}

/// Decode the two-digit year of a new-style identifier (April 2007 onward)
fn decode_arxiv_yy(yy: i32) -> i32 {
    if yy >= 7 {
        2000 + yy
    } else {
        2100 + yy
    }
}

/// Decode the two-digit year of a legacy `subject-class/YYMMnnn` identifier
fn decode_legacy_arxiv_yy(yy: i32) -> i32 {
    if yy >= 91 {
        1900 + yy
    } else {
        2000 + yy
    }
}

fn captured_yy(caps: &Captures) -> Option<i32> {
    caps.name("yy")?.as_str().parse().ok()
}

fn captured_yymm(caps: &Captures) -> Option<String> {
    Some(format!("{}{}", caps.name("yy")?.as_str(), caps.name("mm")?.as_str()))
}

/// Year encoded in an arXiv link, if any
pub fn arxiv_link_year(link: &str) -> Option<i32> {
    if let Some(caps) = ARXIV_LINK_REGEX.captures(link) {
        return captured_yy(&caps).map(decode_arxiv_yy);
    }
    ARXIV_LEGACY_LINK_REGEX
        .captures(link)
        .and_then(|caps| captured_yy(&caps))
        .map(decode_legacy_arxiv_yy)
}

/// Year and `YYMM` of an arXiv identifier in venue text, if any
pub fn arxiv_venue_id(venue_text: &str) -> Option<(i32, String)> {
    let caps = ARXIV_VENUE_REGEX.captures(venue_text)?;
    let year = decode_arxiv_yy(captured_yy(&caps)?);
    Some((year, captured_yymm(&caps)?))
}

fn venue_year(classified: &ClassifiedVenue, venue_text: &str) -> Option<i32> {
    YEAR_REGEX
        .find(&classified.display_name)
        .or_else(|| YEAR_REGEX.find(venue_text))
        .and_then(|m| m.as_str().parse().ok())
}

/// Infer the year bucket of a scraped record
pub fn infer(
    record: &ScrapedRecord,
    classified: &ClassifiedVenue,
    current_year: i32,
    config: &SyncConfig,
) -> InferredYear {
    let arxiv_range = config.min_arxiv_year..=current_year;
    let trusted_range = config.min_trusted_year..=current_year;

    let venue_id = arxiv_venue_id(&record.venue).filter(|(year, _)| arxiv_range.contains(year));
    let arxiv_yymm = venue_id.as_ref().map(|(_, yymm)| yymm.clone());

    let (year, source) = if let Some(year) = record
        .link()
        .and_then(arxiv_link_year)
        .filter(|year| arxiv_range.contains(year))
    {
        (year, YearSource::ArxivLink)
    } else if let Some((year, _)) = venue_id {
        (year, YearSource::ArxivVenue)
    } else if let Some(year) =
        venue_year(classified, &record.venue).filter(|year| trusted_range.contains(year))
    {
        (year, YearSource::Venue)
    } else if trusted_range.contains(&record.year) {
        (record.year, YearSource::Scraper)
    } else {
        tracing::debug!(
            "No reliable year for {:?}, using current year {}",
            record.title,
            current_year
        );
        (current_year, YearSource::Fallback)
    };

    tracing::debug!("Using {} year {} for {:?}", source, year, record.title);
    InferredYear {
        year,
        source,
        arxiv_yymm,
    }
}

/// Infer the year of a scraped record with the default settings
pub fn infer_year(record: &ScrapedRecord, classified: &ClassifiedVenue, current_year: i32) -> i32 {
    infer(record, classified, current_year, &SyncConfig::default()).year
}

//! Test fixture loading utilities

use std::path::PathBuf;

use chrono::NaiveDate;
use folio_domain::{PublicationRecord, PublicationStore, ScrapedRecord, SiteDocument};

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load a fixture file as a string
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", name))
}

/// Load the sample site document
#[allow(dead_code)]
pub fn load_document() -> SiteDocument {
    SiteDocument::from_json(&load_fixture("config.json")).expect("valid config fixture")
}

/// Load the sample scraped records
#[allow(dead_code)]
pub fn load_scraped() -> Vec<ScrapedRecord> {
    serde_json::from_str(&load_fixture("scraped.json")).expect("valid scraped fixture")
}

/// The fixed reference date of the test suites
#[allow(dead_code)]
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

#[allow(dead_code)]
pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|n| n.to_string()).collect()
}

/// Build a store from `(year, record)` pairs
#[allow(dead_code)]
pub fn store_with(records: Vec<(&str, PublicationRecord)>) -> PublicationStore {
    let mut store = PublicationStore::new();
    for (year, record) in records {
        store.push(year, record);
    }
    store
}

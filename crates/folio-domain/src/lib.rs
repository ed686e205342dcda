//! Domain types for the folio site generator
//!
//! This crate provides the data model shared by the sync engine and the CLI:
//! - PublicationRecord: a publication as persisted in the site document
//! - ScrapedRecord: a raw observation produced by the publication-index scraper
//! - PublicationStore: year-bucketed, insertion-ordered publication records
//! - SiteDocument: the whole configuration document, with load/save

pub mod document;
pub mod error;
pub mod publication;
pub mod scraped;
pub mod store;

pub use document::*;
pub use error::*;
pub use publication::*;
pub use scraped::*;
pub use store::*;

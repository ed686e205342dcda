//! Error types for folio-domain

use std::path::PathBuf;

use thiserror::Error;

/// Errors loading or saving the site document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Reading or writing the file failed
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid site document
    #[error("Invalid document {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `personal.name` is missing or blank
    #[error("Missing owner name (personal.name)")]
    MissingOwner,
}

/// A scraped record that violates the engine's input contract
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Scraped record has an empty title")]
    EmptyTitle,

    #[error("Scraped record {title:?} has no authors")]
    NoAuthors { title: String },
}

/// A stored publication entry that cannot be read as a record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("Publication entry is a {0}, not an object")]
    NotAnObject(&'static str),

    #[error("Publication entry has no string title")]
    MissingTitle,
}

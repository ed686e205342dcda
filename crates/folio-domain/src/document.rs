//! The site configuration document (`config.json`)
//!
//! Only the parts the sync engine touches are typed. Every other top-level
//! key is carried through untouched and in place, so a load/save cycle leaves
//! the rest of the document as the editor wrote it.

use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use serde::de::Error as _;
use serde::ser::{Error as _, SerializeMap};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::{DocumentError, PublicationStore};

/// Owner details used by the engine
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Personal {
    #[serde(default)]
    pub name: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Metadata describing the last sync run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncMetadata {
    pub last_sync_date: NaiveDate,
    pub last_sync_status: String,
}

const PERSONAL_KEY: &str = "personal";
const PUBLICATIONS_KEY: &str = "publications";
const SYNC_KEY: &str = "_scholar_sync";

/// The whole configuration document
#[derive(Clone, Debug, Default)]
pub struct SiteDocument {
    pub personal: Personal,
    pub publications: PublicationStore,
    pub scholar_sync: Option<SyncMetadata>,

    /// Top-level keys in document order; typed keys hold a null slot
    layout: Map<String, Value>,
}

impl Serialize for SiteDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let personal = serde_json::to_value(&self.personal).map_err(S::Error::custom)?;
        let publications = serde_json::to_value(&self.publications).map_err(S::Error::custom)?;
        let scholar_sync = serde_json::to_value(&self.scholar_sync).map_err(S::Error::custom)?;

        let mut map = serializer.serialize_map(None)?;
        for key in self.keys() {
            match key {
                PERSONAL_KEY => map.serialize_entry(key, &personal)?,
                PUBLICATIONS_KEY => map.serialize_entry(key, &publications)?,
                SYNC_KEY => map.serialize_entry(key, &scholar_sync)?,
                _ => map.serialize_entry(key, &self.layout[key])?,
            }
        }
        map.end()
    }
}

/// Documents are equal when they would be written out identically
impl PartialEq for SiteDocument {
    fn eq(&self, other: &Self) -> bool {
        let keys = self.keys();
        self.personal == other.personal
            && self.publications == other.publications
            && self.scholar_sync == other.scholar_sync
            && keys == other.keys()
            && keys.iter().all(|key| self.extra(key) == other.extra(key))
    }
}

impl<'de> Deserialize<'de> for SiteDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut layout: Map<String, Value> = Map::deserialize(deserializer)?;

        fn take<T: DeserializeOwned>(
            layout: &mut Map<String, Value>,
            key: &str,
        ) -> Result<Option<T>, serde_json::Error> {
            match layout.get_mut(key).map(Value::take) {
                Some(Value::Null) | None => Ok(None),
                Some(value) => serde_json::from_value(value).map(Some),
            }
        }

        let personal: Personal = take(&mut layout, PERSONAL_KEY)
            .map_err(D::Error::custom)?
            .unwrap_or_default();
        let publications: PublicationStore = take(&mut layout, PUBLICATIONS_KEY)
            .map_err(D::Error::custom)?
            .unwrap_or_default();
        let scholar_sync = take(&mut layout, SYNC_KEY).map_err(D::Error::custom)?;

        Ok(Self {
            personal,
            publications,
            scholar_sync,
            layout,
        })
    }
}

impl SiteDocument {
    /// Parse a document from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize as pretty JSON (two-space indent, trailing newline)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }

    /// Load a document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document = Self::from_json(&contents).map_err(|source| DocumentError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(
            "Loaded {:?}: {} publications in {} buckets",
            path,
            document.publications.len(),
            document.publications.labels().count()
        );
        Ok(document)
    }

    /// Write the document to disk, replacing the file atomically
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let json = self.to_json().map_err(|source| DocumentError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        let io_err = |source: std::io::Error| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = Path::new(&tmp_name);
        {
            let mut file = fs::File::create(tmp_path).map_err(io_err)?;
            file.write_all(json.as_bytes()).map_err(io_err)?;
            file.sync_all().map_err(io_err)?;
        }
        fs::rename(tmp_path, path).map_err(io_err)?;
        tracing::info!("Saved {:?}", path);
        Ok(())
    }

    /// Top-level keys in output order.
    ///
    /// Keys keep their position in the loaded file; typed keys the file
    /// lacked are appended, and `_scholar_sync` only appears once set.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .layout
            .keys()
            .map(String::as_str)
            .filter(|key| *key != SYNC_KEY || self.scholar_sync.is_some())
            .collect();
        for key in [PERSONAL_KEY, PUBLICATIONS_KEY] {
            if !self.layout.contains_key(key) {
                keys.push(key);
            }
        }
        if self.scholar_sync.is_some() && !self.layout.contains_key(SYNC_KEY) {
            keys.push(SYNC_KEY);
        }
        keys
    }

    /// A top-level key the engine does not model
    pub fn extra(&self, key: &str) -> Option<&Value> {
        match key {
            PERSONAL_KEY | PUBLICATIONS_KEY | SYNC_KEY => None,
            _ => self.layout.get(key),
        }
    }

    /// The owner's full name, if set
    pub fn owner_name(&self) -> Result<&str, DocumentError> {
        let name = self.personal.name.trim();
        if name.is_empty() {
            Err(DocumentError::MissingOwner)
        } else {
            Ok(name)
        }
    }
}

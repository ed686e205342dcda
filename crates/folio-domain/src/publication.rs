//! Publication domain model
//!
//! Records are read from and written back to the site document. A record
//! remembers the JSON object it was read from, and writing it back only
//! touches the keys whose value actually changed, so untouched records keep
//! their key order, explicit defaults and odd values byte for byte.

use chrono::NaiveDate;
use serde::de::{DeserializeOwned, Error as _};
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::EntryError;

/// Name given to a resolved paper link
pub const PAPER_LINK_NAME: &str = "Paper";

/// Name of the placeholder link authors add before a paper is public
pub const COMING_SOON_LINK_NAME: &str = "Paper (Coming Soon)";

const TITLE_KEY: &str = "title";
const AUTHORS_KEY: &str = "authors";
const VENUE_KEY: &str = "venue";
const VENUE_TYPE_KEY: &str = "venue_type";
const IMAGE_KEY: &str = "image";
const FEATURED_KEY: &str = "featured";
const AUTO_SYNC_KEY: &str = "auto_sync";
const LINKS_KEY: &str = "links";
const CITATIONS_KEY: &str = "_scholar_citations";
const LAST_UPDATED_KEY: &str = "_scholar_last_updated";

const RECORD_KEYS: [&str; 10] = [
    TITLE_KEY,
    AUTHORS_KEY,
    VENUE_KEY,
    VENUE_TYPE_KEY,
    IMAGE_KEY,
    FEATURED_KEY,
    AUTO_SYNC_KEY,
    LINKS_KEY,
    CITATIONS_KEY,
    LAST_UPDATED_KEY,
];

const LINK_KEYS: [&str; 3] = ["name", "url", "icon"];

/// How a venue is rendered on the publications page
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum VenueType {
    Conference,
    Journal,
    Preprint,
    UnderReview,
    Working,
    /// A type the site theme renders but the engine never assigns
    Other(String),
}

impl VenueType {
    pub fn from_name(name: &str) -> Self {
        match name {
            "conference" => VenueType::Conference,
            "journal" => VenueType::Journal,
            "preprint" => VenueType::Preprint,
            "under-review" => VenueType::UnderReview,
            "working" => VenueType::Working,
            other => VenueType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            VenueType::Conference => "conference",
            VenueType::Journal => "journal",
            VenueType::Preprint => "preprint",
            VenueType::UnderReview => "under-review",
            VenueType::Working => "working",
            VenueType::Other(name) => name,
        }
    }
}

impl std::fmt::Display for VenueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for VenueType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for VenueType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(VenueType::from_name(&name))
    }
}

/// A link rendered under a publication (paper, code, project page, ...)
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PublicationLink {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub icon: String,

    /// Keys the engine does not model (e.g. `coming_soon`)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PublicationLink {
    pub fn new(name: impl Into<String>, url: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            icon: icon.into(),
            extra: Map::new(),
        }
    }

    /// A link that still waits for its real URL
    pub fn is_placeholder(&self) -> bool {
        self.url.is_empty() || self.url == "#" || self.name == COMING_SOON_LINK_NAME
    }

    /// This link written over the object it was read from, if any
    fn to_value_over(&self, source: Option<&Value>) -> Value {
        let original: Option<PublicationLink> =
            source.and_then(|value| serde_json::from_value(value.clone()).ok());
        let mut object = source
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let was = original.as_ref();
        let fields = [
            ("name", &self.name, was.map(|link| &link.name)),
            ("url", &self.url, was.map(|link| &link.url)),
            ("icon", &self.icon, was.map(|link| &link.icon)),
        ];
        for (key, value, was) in fields {
            if was != Some(value) {
                object.insert(key.to_string(), Value::String(value.clone()));
            }
        }
        overlay_extra(&mut object, &self.extra, &LINK_KEYS);
        Value::Object(object)
    }
}

impl Serialize for PublicationLink {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value_over(None).serialize(serializer)
    }
}

/// A publication as persisted in the site document
#[derive(Clone, Debug)]
pub struct PublicationRecord {
    pub title: String,
    pub authors: Vec<String>,
    pub venue: String,
    pub venue_type: Option<VenueType>,
    pub image: Option<String>,
    pub featured: bool,

    /// `Some(false)` freezes the record against every automated change
    pub auto_sync: Option<bool>,

    pub links: Vec<PublicationLink>,

    // Engine metadata, `_scholar_*` keys
    pub scholar_citations: Option<u32>,
    pub scholar_last_updated: Option<NaiveDate>,

    /// Keys the engine does not model (e.g. `is_oral`), kept verbatim
    pub extra: Map<String, Value>,

    /// The object this record was read from; `None` for new records
    source: Option<Map<String, Value>>,
}

/// Records are equal when their fields are; where they were read from does not matter
impl PartialEq for PublicationRecord {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
            && self.authors == other.authors
            && self.venue == other.venue
            && self.venue_type == other.venue_type
            && self.image == other.image
            && self.featured == other.featured
            && self.auto_sync == other.auto_sync
            && self.links == other.links
            && self.scholar_citations == other.scholar_citations
            && self.scholar_last_updated == other.scholar_last_updated
            && self.extra == other.extra
    }
}

/// Read a modeled field; a missing key or a value of the wrong type reads as the default
fn field<T: DeserializeOwned + Default>(object: &Map<String, Value>, key: &str) -> T {
    object
        .get(key)
        .and_then(|value| T::deserialize(value).ok())
        .unwrap_or_default()
}

/// Write `value` under `key` unless it still equals what was read.
/// A default value removes the key instead of spelling it out.
fn put<T: Serialize + PartialEq>(
    object: &mut Map<String, Value>,
    key: &str,
    value: &T,
    original: Option<&T>,
    is_default: bool,
) -> Result<(), serde_json::Error> {
    if original == Some(value) {
        return Ok(());
    }
    if is_default {
        object.shift_remove(key);
    } else {
        object.insert(key.to_string(), serde_json::to_value(value)?);
    }
    Ok(())
}

fn overlay_extra(object: &mut Map<String, Value>, extra: &Map<String, Value>, modeled: &[&str]) {
    for (key, value) in extra {
        if object.get(key) != Some(value) {
            object.insert(key.clone(), value.clone());
        }
    }
    object.retain(|key, _| modeled.contains(&key.as_str()) || extra.contains_key(key));
}

impl PublicationRecord {
    /// Create a record with a title and authors; everything else empty
    pub fn new(title: impl Into<String>, authors: Vec<String>) -> Self {
        Self {
            title: title.into(),
            authors,
            venue: String::new(),
            venue_type: None,
            image: None,
            featured: false,
            auto_sync: None,
            links: Vec::new(),
            scholar_citations: None,
            scholar_last_updated: None,
            extra: Map::new(),
            source: None,
        }
    }

    /// Read a record from a stored publication entry.
    ///
    /// Only a string `title` is required. A modeled key holding a value of
    /// the wrong type reads as its default and is written back as it was.
    pub fn from_value(value: &Value) -> Result<Self, EntryError> {
        let object = value
            .as_object()
            .ok_or_else(|| EntryError::NotAnObject(json_kind(value)))?;
        let mut record = Self::decode(object)?;
        record.source = Some(object.clone());
        Ok(record)
    }

    fn decode(object: &Map<String, Value>) -> Result<Self, EntryError> {
        let title = object
            .get(TITLE_KEY)
            .and_then(Value::as_str)
            .ok_or(EntryError::MissingTitle)?;

        let extra = object
            .iter()
            .filter(|(key, _)| !RECORD_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self {
            title: title.to_string(),
            authors: field(object, AUTHORS_KEY),
            venue: field(object, VENUE_KEY),
            venue_type: field(object, VENUE_TYPE_KEY),
            image: field(object, IMAGE_KEY),
            featured: field(object, FEATURED_KEY),
            auto_sync: field(object, AUTO_SYNC_KEY),
            links: field(object, LINKS_KEY),
            scholar_citations: field(object, CITATIONS_KEY),
            scholar_last_updated: field(object, LAST_UPDATED_KEY),
            extra,
            source: None,
        })
    }

    /// The record as a JSON object, written over the object it was read from
    pub fn to_object(&self) -> Result<Map<String, Value>, serde_json::Error> {
        let original = self
            .source
            .as_ref()
            .and_then(|source| Self::decode(source).ok());
        let was = original.as_ref();
        let mut object = self.source.clone().unwrap_or_default();

        put(&mut object, TITLE_KEY, &self.title, was.map(|r| &r.title), false)?;
        put(&mut object, AUTHORS_KEY, &self.authors, was.map(|r| &r.authors), false)?;
        put(&mut object, VENUE_KEY, &self.venue, was.map(|r| &r.venue), false)?;
        put(
            &mut object,
            VENUE_TYPE_KEY,
            &self.venue_type,
            was.map(|r| &r.venue_type),
            self.venue_type.is_none(),
        )?;
        put(
            &mut object,
            IMAGE_KEY,
            &self.image,
            was.map(|r| &r.image),
            self.image.is_none(),
        )?;
        put(
            &mut object,
            FEATURED_KEY,
            &self.featured,
            was.map(|r| &r.featured),
            !self.featured,
        )?;
        put(
            &mut object,
            AUTO_SYNC_KEY,
            &self.auto_sync,
            was.map(|r| &r.auto_sync),
            self.auto_sync.is_none(),
        )?;

        if was.map(|r| &r.links) != Some(&self.links) {
            let source_links = self
                .source
                .as_ref()
                .and_then(|source| source.get(LINKS_KEY))
                .and_then(Value::as_array);
            let links = self
                .links
                .iter()
                .enumerate()
                .map(|(index, link)| {
                    link.to_value_over(source_links.and_then(|links| links.get(index)))
                })
                .collect();
            object.insert(LINKS_KEY.to_string(), Value::Array(links));
        }

        put(
            &mut object,
            CITATIONS_KEY,
            &self.scholar_citations,
            was.map(|r| &r.scholar_citations),
            self.scholar_citations.is_none(),
        )?;
        put(
            &mut object,
            LAST_UPDATED_KEY,
            &self.scholar_last_updated,
            was.map(|r| &r.scholar_last_updated),
            self.scholar_last_updated.is_none(),
        )?;

        overlay_extra(&mut object, &self.extra, &RECORD_KEYS);
        Ok(object)
    }

    /// Builder method to set the venue label and type
    pub fn with_venue(mut self, venue: impl Into<String>, venue_type: VenueType) -> Self {
        self.venue = venue.into();
        self.venue_type = Some(venue_type);
        self
    }

    /// Builder method to set the auto-sync flag
    pub fn with_auto_sync(mut self, auto_sync: bool) -> Self {
        self.auto_sync = Some(auto_sync);
        self
    }

    /// Builder method to append a link
    pub fn with_link(mut self, link: PublicationLink) -> Self {
        self.links.push(link);
        self
    }

    /// Whether a human editor has frozen this record
    pub fn is_protected(&self) -> bool {
        self.auto_sync == Some(false)
    }
}

impl Serialize for PublicationRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_object()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PublicationRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(D::Error::custom)
    }
}

/// Name of a JSON value's kind, for log and error messages
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

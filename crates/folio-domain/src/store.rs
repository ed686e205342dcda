//! Year-bucketed publication store

use indexmap::IndexMap;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::publication::json_kind;
use crate::PublicationRecord;

/// Reserved bucket for survey papers, rendered apart from the year list
pub const SURVEY_BUCKET: &str = "survey";

/// Whether a bucket label is a four-digit year
pub fn is_year_label(label: &str) -> bool {
    label.len() == 4 && label.chars().all(|c| c.is_ascii_digit())
}

/// Position of a record inside a [`PublicationStore`]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordLocation {
    pub bucket: String,
    pub index: usize,
}

/// One bucket of the publications map
#[derive(Clone, Debug, Default, PartialEq)]
struct Bucket {
    records: Vec<PublicationRecord>,
    /// Entries that are not readable records, by position in the loaded list
    unreadable: Vec<(usize, Value)>,
    /// The loaded value, when it was not a list at all
    raw: Option<Value>,
}

impl Bucket {
    fn read(label: &str, value: Value) -> Self {
        let entries = match value {
            Value::Array(entries) => entries,
            other => {
                tracing::warn!(
                    "Publications bucket {:?} is not a list ({}), keeping it as is",
                    label,
                    json_kind(&other)
                );
                return Self {
                    raw: Some(other),
                    ..Self::default()
                };
            }
        };

        let mut bucket = Self::default();
        for (position, entry) in entries.into_iter().enumerate() {
            match PublicationRecord::from_value(&entry) {
                Ok(record) => bucket.records.push(record),
                Err(err) => {
                    tracing::warn!(
                        "Skipping entry {} of publications bucket {:?}: {}",
                        position,
                        label,
                        err
                    );
                    bucket.unreadable.push((position, entry));
                }
            }
        }
        bucket
    }
}

impl Serialize for Bucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let (Some(raw), true) = (&self.raw, self.records.is_empty()) {
            return raw.serialize(serializer);
        }

        // Unreadable entries go back to their loaded positions
        let mut seq = serializer.serialize_seq(Some(self.records.len() + self.unreadable.len()))?;
        let mut records = self.records.iter();
        let mut unreadable = self.unreadable.iter().peekable();
        let mut position = 0;
        loop {
            if let Some((_, entry)) = unreadable.next_if(|(at, _)| *at <= position) {
                seq.serialize_element(entry)?;
            } else if let Some(record) = records.next() {
                seq.serialize_element(record)?;
            } else if let Some((_, entry)) = unreadable.next() {
                seq.serialize_element(entry)?;
            } else {
                break;
            }
            position += 1;
        }
        seq.end()
    }
}

/// Publications keyed by bucket label, in document order.
///
/// Entries that cannot be read as records are kept out of every lookup but
/// written back where they were.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PublicationStore {
    buckets: IndexMap<String, Bucket>,
}

impl PublicationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records across all buckets
    pub fn len(&self) -> usize {
        self.buckets.values().map(|bucket| bucket.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of stored entries that could not be read as records
    pub fn unreadable_count(&self) -> usize {
        self.buckets
            .values()
            .map(|bucket| bucket.unreadable.len() + usize::from(bucket.raw.is_some()))
            .sum()
    }

    /// Bucket labels in document order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// Records of one bucket; a missing bucket is empty
    pub fn bucket(&self, label: &str) -> &[PublicationRecord] {
        self.buckets
            .get(label)
            .map(|bucket| bucket.records.as_slice())
            .unwrap_or(&[])
    }

    /// Every record with its location, bucket by bucket in document order
    pub fn records(&self) -> impl Iterator<Item = (RecordLocation, &PublicationRecord)> {
        self.buckets.iter().flat_map(|(label, bucket)| {
            bucket.records.iter().enumerate().map(move |(index, record)| {
                (
                    RecordLocation {
                        bucket: label.clone(),
                        index,
                    },
                    record,
                )
            })
        })
    }

    pub fn get(&self, location: &RecordLocation) -> Option<&PublicationRecord> {
        self.buckets
            .get(&location.bucket)?
            .records
            .get(location.index)
    }

    pub fn get_mut(&mut self, location: &RecordLocation) -> Option<&mut PublicationRecord> {
        self.buckets
            .get_mut(&location.bucket)?
            .records
            .get_mut(location.index)
    }

    /// Append a record to a bucket, creating the bucket at the end if needed.
    /// A bucket that was not a list becomes one.
    pub fn push(&mut self, label: impl Into<String>, record: PublicationRecord) -> RecordLocation {
        let label = label.into();
        let bucket = self.buckets.entry(label.clone()).or_default();
        if let Some(raw) = bucket.raw.take() {
            tracing::warn!(
                "Replacing non-list publications bucket {:?} ({})",
                label,
                json_kind(&raw)
            );
        }
        bucket.records.push(record);
        RecordLocation {
            index: bucket.records.len() - 1,
            bucket: label,
        }
    }
}

impl Serialize for PublicationStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.buckets.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PublicationStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let buckets = raw
            .into_iter()
            .map(|(label, value)| {
                let bucket = Bucket::read(&label, value);
                (label, bucket)
            })
            .collect();
        Ok(Self { buckets })
    }
}

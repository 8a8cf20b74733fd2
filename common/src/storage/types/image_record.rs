use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_datetime, deserialize_flexible_id, serialize_datetime, StoredObject};

/// A persisted gallery entry. Records are created once and never updated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageRecord {
    #[serde(deserialize_with = "deserialize_flexible_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub author: String,
    /// Generated file name, relative to the image store root.
    pub path: String,
    #[serde(deserialize_with = "deserialize_datetime")]
    pub date: DateTime<Utc>,
}

impl StoredObject for ImageRecord {
    fn table_name() -> &'static str {
        "image"
    }

    fn get_id(&self) -> &str {
        &self.id
    }
}

/// Metadata for a record that has not been inserted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageDraft {
    pub name: String,
    pub description: String,
    pub author: String,
    pub path: String,
}

impl ImageDraft {
    /// Builds a draft from raw form values, trimming each and replacing absent ones with "".
    pub fn from_form(
        name: Option<&str>,
        description: Option<&str>,
        author: Option<&str>,
        path: String,
    ) -> Self {
        let clean = |value: Option<&str>| value.map(str::trim).unwrap_or_default().to_string();

        Self {
            name: clean(name),
            description: clean(description),
            author: clean(author),
            path,
        }
    }
}

/// Row content written to the database; the id lives in the record key.
#[derive(Debug, Serialize)]
pub(crate) struct ImageRow {
    pub name: String,
    pub description: String,
    pub author: String,
    pub path: String,
    #[serde(serialize_with = "serialize_datetime")]
    pub date: DateTime<Utc>,
}

impl ImageRow {
    pub fn stamped(draft: ImageDraft, date: DateTime<Utc>) -> Self {
        Self {
            name: draft.name,
            description: draft.description,
            author: draft.author,
            path: draft.path,
            date,
        }
    }
}

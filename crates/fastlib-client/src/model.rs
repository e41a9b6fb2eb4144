//! Library entities as returned by the FastLibrarian API.
//!
//! Every record here is a transient copy of server state. Ids arrive as
//! either JSON strings or numbers and are stored as `String`. The `series`
//! field of a book is normalized to a list at decode time, so nothing
//! downstream ever branches on its wire shape.

use std::collections::BTreeMap;

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Opaque external-reference map (`{"hardcover_id": 123, ...}`).
pub type ExternalRefs = BTreeMap<String, serde_json::Value>;

/// Acquisition status of one medium of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookStatus {
    Wanted,
    Have,
    Ignored,
    Delete,
}

impl BookStatus {
    pub fn all() -> &'static [BookStatus] {
        &[
            BookStatus::Wanted,
            BookStatus::Have,
            BookStatus::Ignored,
            BookStatus::Delete,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Wanted => "Wanted",
            Self::Have => "Have",
            Self::Ignored => "Ignored",
            Self::Delete => "Delete",
        }
    }
}

/// One of the three independently tracked acquisition channels of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Medium {
    Ebook,
    Audio,
    Physical,
}

impl Medium {
    pub fn all() -> &'static [Medium] {
        &[Medium::Ebook, Medium::Audio, Medium::Physical]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ebook => "Ebook",
            Self::Audio => "Audio",
            Self::Physical => "Physical",
        }
    }

    /// Name of the book field holding this medium's status.
    pub fn field(self) -> &'static str {
        match self {
            Self::Ebook => "status",
            Self::Audio => "a_status",
            Self::Physical => "p_status",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesRef {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de_null_as_empty")]
    pub authors: Vec<AuthorRef>,
    #[serde(default, deserialize_with = "de_series")]
    pub series: Vec<SeriesRef>,
    /// Ebook status.
    #[serde(default)]
    pub status: Option<BookStatus>,
    /// Audiobook status.
    #[serde(default)]
    pub a_status: Option<BookStatus>,
    /// Physical copy status.
    #[serde(default)]
    pub p_status: Option<BookStatus>,
    #[serde(default)]
    pub external_refs: Option<ExternalRefs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editions: Option<Vec<serde_json::Value>>,
}

impl Book {
    pub fn status_for(&self, medium: Medium) -> Option<BookStatus> {
        match medium {
            Medium::Ebook => self.status,
            Medium::Audio => self.a_status,
            Medium::Physical => self.p_status,
        }
    }

    /// Comma-separated author names, or `None` when the book has no authors.
    pub fn author_names(&self) -> Option<String> {
        join_names(self.authors.iter().map(|a| a.name.as_str()))
    }

    pub fn series_names(&self) -> Option<String> {
        join_names(self.series.iter().map(|s| s.name.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub external_refs: Option<ExternalRefs>,
    #[serde(default, deserialize_with = "de_null_as_empty")]
    pub books: Vec<Book>,
}

impl Author {
    pub fn hardcover_id(&self) -> Option<String> {
        self.external_refs
            .as_ref()
            .and_then(|refs| refs.get("hardcover_id"))
            .filter(|v| !v.is_null())
            .map(display_json)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub external_refs: Option<ExternalRefs>,
}

/// An author search hit, from the local database or an external service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundAuthor {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub external_refs: Option<ExternalRefs>,
    #[serde(default)]
    pub in_db: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewBook {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSeries {
    pub name: String,
}

/// Partial book update touching exactly one medium's status field.
///
/// Serializes to a single-key object such as `{"a_status": "Have"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPatch {
    pub medium: Medium,
    pub status: BookStatus,
}

impl Serialize for StatusPatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.medium.field(), &self.status)?;
        map.end()
    }
}

/// Generic `{"message": ...}` acknowledgement from the config endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: String,
}

/// Normalize the `series` field of a book payload into a list.
///
/// The API returns `null`, a single `{id, name}` object, or an array of
/// them depending on the endpoint.
pub fn normalize_series(value: serde_json::Value) -> Result<Vec<SeriesRef>, serde_json::Error> {
    de_series(value)
}

fn de_series<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<SeriesRef>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Shape {
        Many(Vec<SeriesRef>),
        One(SeriesRef),
    }

    Ok(match Option::<Shape>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Shape::Many(list)) => list,
        Some(Shape::One(single)) => vec![single],
    })
}

fn de_null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Number(serde_json::Number),
}

impl From<IdRepr> for String {
    fn from(id: IdRepr) -> Self {
        match id {
            IdRepr::Text(s) => s,
            IdRepr::Number(n) => n.to_string(),
        }
    }
}

fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    IdRepr::deserialize(deserializer).map(String::from)
}

fn de_opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<IdRepr>::deserialize(deserializer)?.map(String::from))
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> Option<String> {
    let joined = names.collect::<Vec<_>>().join(", ");
    if joined.is_empty() { None } else { Some(joined) }
}

/// Render a JSON scalar without quotes around strings.
pub fn display_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

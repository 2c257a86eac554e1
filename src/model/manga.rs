use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A catalog item returned by a provider search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manga {
    /// Identifier of the manga within its provider
    pub id: String,

    /// Display name
    pub name: String,

    /// Absolute URL of the manga page
    pub url: String,

    /// Position within the search results
    pub index: u16,

    /// ID of the provider that produced this manga
    pub source: String,

    #[serde(default)]
    pub metadata: Metadata,
}

/// Optional descriptive data about a manga
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// ISO 639-1 language code (optionally with region, e.g. `pt-BR`)
    pub language_iso: String,

    /// Cover image URL
    pub cover: String,

    pub genres: Vec<String>,

    /// Authors, artists and other credited people
    pub staff: Vec<String>,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,
}

/// Non-owning reference from a chapter back to its manga
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MangaRef {
    pub id: String,
    pub name: String,
    pub url: String,
    pub source: String,
}

impl Manga {
    /// Returns a back-reference to this manga
    pub fn to_ref(&self) -> MangaRef {
        MangaRef {
            id: self.id.clone(),
            name: self.name.clone(),
            url: self.url.clone(),
            source: self.source.clone(),
        }
    }
}

impl fmt::Display for Manga {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

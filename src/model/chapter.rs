use crate::model::{MangaRef, Page};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A chapter of a manga
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub name: String,

    /// Absolute URL of the chapter
    pub url: String,

    /// Identifier of the chapter within its provider
    pub id: String,

    /// Position in final reading order, unique within the manga
    pub index: u16,

    /// Display number, possibly fractional ("12.1") and independent of `index`
    pub number: String,

    pub volume: String,

    /// The manga this chapter was last attached to
    pub manga: MangaRef,

    /// Pages, once listed by the provider
    #[serde(default)]
    pub pages: Vec<Page>,
}

/// Non-owning reference from a page back to its chapter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRef {
    pub id: String,
    pub name: String,
    pub url: String,
    pub index: u16,
}

impl Chapter {
    /// Returns a back-reference to this chapter
    pub fn to_ref(&self) -> ChapterRef {
        ChapterRef {
            id: self.id.clone(),
            name: self.name.clone(),
            url: self.url.clone(),
            index: self.index,
        }
    }

    /// Total downloaded size of the chapter's pages in bytes
    pub fn size(&self) -> u64 {
        self.pages.iter().map(|page| page.size).sum()
    }
}

impl fmt::Display for Chapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

use crate::model::ChapterRef;
use serde::{Deserialize, Serialize};

/// A single page image of a chapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Absolute image URL
    pub url: String,

    /// 0-based position within the chapter
    pub index: u16,

    /// File extension including the dot (e.g. `.jpg`), empty when unknown
    pub extension: String,

    /// The chapter this page was last attached to
    pub chapter: ChapterRef,

    /// Hex-encoded XOR key for encrypted page payloads
    #[serde(default)]
    pub key: Option<String>,

    /// Downloaded size in bytes, 0 until downloaded
    #[serde(default)]
    pub size: u64,
}

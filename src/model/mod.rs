//! Entity model shared by every provider
//!
//! A search yields [`Manga`] items, a manga yields ordered [`Chapter`]s and a chapter
//! yields ordered [`Page`]s. Children point back at their parent through small
//! non-owning reference structs ([`MangaRef`], [`ChapterRef`]) so entity lists can be
//! cached and re-attached to whichever parent requested them.

mod chapter;
mod manga;
mod page;

pub use chapter::{Chapter, ChapterRef};
pub use manga::{Manga, MangaRef, Metadata};
pub use page::Page;

//! Declarative extraction rulesets
//!
//! An [`Extractor`] pairs a CSS selector with a set of per-field functions. Applied to
//! a parsed document it yields one [`Record`] per matching node. Rulesets hold no
//! I/O and are built once per site.

/// Declares a lazily compiled CSS selector static
///
/// The pattern must be a valid selector; it is compiled on first use.
macro_rules! selector {
    ($name:ident, $css:expr) => {
        static $name: std::sync::LazyLock<scraper::Selector> =
            std::sync::LazyLock::new(|| scraper::Selector::parse($css).unwrap());
    };
}

pub(crate) use selector;

mod extractor;
mod select;

pub use extractor::{Extractor, FieldFn, Record};
pub use select::{attr, own_attr, own_text, text};

use std::fmt;
use thiserror::Error;

/// Fields an extractor may populate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    Url,
    Id,
    Number,
    Volume,
    Cover,
    Language,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Url => "url",
            Self::Id => "id",
            Self::Number => "number",
            Self::Volume => "volume",
            Self::Cover => "cover",
            Self::Language => "language",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while building a ruleset
#[derive(Debug, Error)]
pub enum RulesetError {
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

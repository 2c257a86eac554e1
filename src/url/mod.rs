//! URL handling module for Tankobon
//!
//! This module provides cache-key derivation, link resolution and page
//! extension extraction.

mod key;
mod resolve;

// Re-export main functions
pub use key::cache_key;
pub use resolve::{extension_of, resolve_link};

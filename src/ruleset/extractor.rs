use crate::ruleset::{Field, RulesetError};
use scraper::{ElementRef, Html, Selector};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// A field extraction function
///
/// Receives one node matched by the extractor's selector and returns the field value,
/// or an empty string when the node carries no such value.
pub type FieldFn = Arc<dyn Fn(ElementRef<'_>) -> String + Send + Sync>;

/// Selector plus field functions describing how to pull one entity type out of a document
#[derive(Clone)]
pub struct Extractor {
    source: String,
    selector: Selector,
    fields: HashMap<Field, FieldFn>,
}

/// Field values extracted from one matched node
///
/// Fields the extractor has no function for read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    values: BTreeMap<Field, String>,
}

impl Record {
    /// Returns the value of a field, or `""` when it was not extracted
    pub fn get(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Sets a field value, replacing any previous one
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }
}

impl Extractor {
    /// Creates an extractor for the given CSS selector with no fields
    ///
    /// # Arguments
    ///
    /// * `selector` - CSS selector matching one node per entity
    ///
    /// # Returns
    ///
    /// * `Ok(Extractor)` - The selector compiled
    /// * `Err(RulesetError)` - The selector is not valid CSS
    pub fn new(selector: &str) -> Result<Self, RulesetError> {
        let compiled = Selector::parse(selector).map_err(|e| RulesetError::InvalidSelector {
            selector: selector.to_string(),
            message: format!("{:?}", e),
        })?;

        Ok(Self {
            source: selector.to_string(),
            selector: compiled,
            fields: HashMap::new(),
        })
    }

    /// Registers the function for a field, replacing any previous one
    pub fn field<F>(mut self, field: Field, extract: F) -> Self
    where
        F: Fn(ElementRef<'_>) -> String + Send + Sync + 'static,
    {
        self.fields.insert(field, Arc::new(extract));
        self
    }

    /// The selector this extractor was built from
    pub fn selector(&self) -> &str {
        &self.source
    }

    /// Whether a function is registered for `field`
    pub fn has_field(&self, field: Field) -> bool {
        self.fields.contains_key(&field)
    }

    /// Applies the extractor to every node matching its selector, in document order
    ///
    /// A document with no matching nodes yields an empty list.
    pub fn extract(&self, document: &Html) -> Vec<Record> {
        document
            .select(&self.selector)
            .map(|element| self.extract_element(element))
            .collect()
    }

    /// Parses `html` as a document and applies the extractor to it
    pub fn extract_html(&self, html: &str) -> Vec<Record> {
        let document = Html::parse_document(html);
        self.extract(&document)
    }

    fn extract_element(&self, element: ElementRef<'_>) -> Record {
        let mut record = Record::default();
        for (field, extract) in &self.fields {
            record.set(*field, extract(element));
        }
        record
    }
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<&Field> = self.fields.keys().collect();
        fields.sort();
        f.debug_struct("Extractor")
            .field("selector", &self.source)
            .field("fields", &fields)
            .finish()
    }
}

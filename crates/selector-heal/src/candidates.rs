//! Candidate derivation from raw markup snapshots
//!
//! Snapshots are opaque strings captured at authoring time. Extraction is
//! plain pattern matching over that string, never DOM parsing, so any input
//! degrades to fewer candidates instead of an error.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{Candidate, SourceAttribute};

// Attribute names must sit at the start of the snapshot or after
// whitespace/'<' so that e.g. data-name="x" never satisfies name.
static ATTRIBUTE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)(?:^|[\s<])(id|data-test|name|placeholder)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>'"]+))"#,
    )
    .unwrap()
});

#[derive(Default)]
struct ExtractedValues {
    id: Option<String>,
    data_test: Option<String>,
    name: Option<String>,
    placeholder: Option<String>,
}

impl ExtractedValues {
    fn get(&self, attribute: SourceAttribute) -> Option<&String> {
        match attribute {
            SourceAttribute::Id => self.id.as_ref(),
            SourceAttribute::DataTest => self.data_test.as_ref(),
            SourceAttribute::Name => self.name.as_ref(),
            SourceAttribute::Placeholder => self.placeholder.as_ref(),
        }
    }

    fn record_first(&mut self, attribute: SourceAttribute, value: &str) {
        let slot = match attribute {
            SourceAttribute::Id => &mut self.id,
            SourceAttribute::DataTest => &mut self.data_test,
            SourceAttribute::Name => &mut self.name,
            SourceAttribute::Placeholder => &mut self.placeholder,
        };
        if slot.is_none() {
            *slot = Some(value.to_string());
        }
    }
}

/// Derive fallback candidates from a raw markup snapshot.
///
/// Output follows the fixed priority `id > data-test > name > placeholder`,
/// taking the first non-empty occurrence of each attribute and omitting
/// absent ones. Returns an empty list for input that carries none of the
/// attributes; never fails.
pub fn derive_candidates(snapshot: &str) -> Vec<Candidate> {
    let mut found = ExtractedValues::default();

    for caps in ATTRIBUTE_PATTERN.captures_iter(snapshot) {
        let attribute = match caps
            .get(1)
            .and_then(|m| SourceAttribute::from_attribute_name(m.as_str()))
        {
            Some(attribute) => attribute,
            None => continue,
        };
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str())
            .unwrap_or("");
        if value.is_empty() {
            continue;
        }
        found.record_first(attribute, value);
    }

    let mut candidates = Vec::with_capacity(4);
    for attribute in SourceAttribute::priority_order() {
        if let Some(value) = found.get(attribute) {
            candidates.push(Candidate::new(attribute, value));
        }
    }
    candidates
}

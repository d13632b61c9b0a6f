//! Spell-check suggestion decoding.
//!
//! The engine flattens suggestions into one alternating array:
//!
//! ```text
//! ["fishh", {"numFound": 1, "suggestion": ["fish"]}, "collation", "fish"]
//! ```
//!
//! Pairs are read two at a time. A pair whose first element is `collation`
//! carries the collated query; every other pair whose second element is an
//! object carries a term and its corrections.

use serde_json::Value;
use std::collections::BTreeMap;

const COLLATION_KEY: &str = "collation";

/// Decoded spell-check suggestions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Spellcheck {
    collation: Option<String>,
    corrections: BTreeMap<String, String>,
}

impl Spellcheck {
    /// Decode the flattened suggestion array.
    pub fn decode(suggestions: &[Value]) -> Self {
        let mut spellcheck = Self::default();

        for pair in suggestions.chunks_exact(2) {
            let (key, value) = (&pair[0], &pair[1]);
            let Some(key) = key.as_str() else {
                continue;
            };

            if key == COLLATION_KEY {
                spellcheck.collation = collation_text(value);
            } else if let Some(correction) = first_suggestion(value) {
                spellcheck
                    .corrections
                    .insert(key.to_string(), correction.to_string());
            }
        }

        spellcheck
    }

    /// Corrected form of the whole query.
    pub fn collation(&self) -> Option<&str> {
        self.collation.as_deref()
    }

    /// Misspelled term to first correction.
    pub fn corrections(&self) -> &BTreeMap<String, String> {
        &self.corrections
    }
}

// Newer engines send the collation as an object with a `collationQuery`.
fn collation_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map
            .get("collationQuery")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

fn first_suggestion(value: &Value) -> Option<&str> {
    let first = value.get("suggestion")?.as_array()?.first()?;
    match first {
        Value::String(word) => Some(word),
        Value::Object(entry) => entry.get("word").and_then(Value::as_str),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> Spellcheck {
        Spellcheck::decode(value.as_array().unwrap())
    }

    #[test]
    fn test_collation_and_correction() {
        let sc = decode(json!([
            "fishh",
            {"numFound": 1, "startOffset": 0, "endOffset": 4, "suggestion": ["fish"]},
            "collation",
            "fish"
        ]));

        assert_eq!(sc.collation(), Some("fish"));
        assert_eq!(sc.corrections().get("fishh").map(String::as_str), Some("fish"));
    }

    #[test]
    fn test_extended_results() {
        let sc = decode(json!([
            "helo",
            {
                "numFound": 2,
                "suggestion": [{"word": "hello", "freq": 10}, {"word": "help", "freq": 3}]
            }
        ]));

        assert_eq!(sc.collation(), None);
        assert_eq!(sc.corrections()["helo"], "hello");
    }

    #[test]
    fn test_collation_object() {
        let sc = decode(json!(["collation", {"collationQuery": "red fish", "hits": 4}]));
        assert_eq!(sc.collation(), Some("red fish"));
    }

    #[test]
    fn test_odd_trailing_element_ignored() {
        let sc = decode(json!(["a", {"suggestion": ["b"]}, "dangling"]));
        assert_eq!(sc.corrections().len(), 1);
    }

    #[test]
    fn test_empty() {
        let sc = Spellcheck::decode(&[]);
        assert_eq!(sc, Spellcheck::default());
    }
}

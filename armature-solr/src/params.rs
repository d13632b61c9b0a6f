//! Ordered request parameter sequences.

use url::form_urlencoded::byte_serialize;

/// A single request parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// A `key=value` pair. The value is URL-escaped on serialization.
    Pair {
        /// Parameter name.
        key: String,
        /// Unescaped parameter value.
        value: String,
    },
    /// A pre-encoded fragment appended verbatim.
    Raw(String),
}

impl Param {
    /// Create a `key=value` pair.
    pub fn new(key: impl Into<String>, value: impl ToString) -> Self {
        Param::Pair {
            key: key.into(),
            value: value.to_string(),
        }
    }

    /// Parameter name, if this is a pair.
    pub fn key(&self) -> Option<&str> {
        match self {
            Param::Pair { key, .. } => Some(key),
            Param::Raw(_) => None,
        }
    }

    /// Unescaped parameter value, if this is a pair.
    pub fn value(&self) -> Option<&str> {
        match self {
            Param::Pair { value, .. } => Some(value),
            Param::Raw(_) => None,
        }
    }

    fn encode(&self) -> String {
        match self {
            Param::Pair { key, value } => {
                format!("{}={}", key, byte_serialize(value.as_bytes()).collect::<String>())
            }
            Param::Raw(raw) => raw.clone(),
        }
    }
}

/// An ordered sequence of parameters in which keys may repeat.
///
/// The wire protocol repeats keys such as `fq` and `facet.field`, so this is
/// a list of pairs rather than a map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamSequence {
    params: Vec<Param>,
}

impl ParamSequence {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `key=value` pair.
    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) {
        self.params.push(Param::new(key, value));
    }

    /// Append a pre-encoded fragment.
    pub fn push_raw(&mut self, raw: impl Into<String>) {
        self.params.push(Param::Raw(raw.into()));
    }

    /// Append a parameter.
    pub fn push_param(&mut self, param: Param) {
        self.params.push(param);
    }

    /// Append every parameter of another sequence.
    pub fn extend(&mut self, other: ParamSequence) {
        self.params.extend(other.params);
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.key() == Some(key))
            .and_then(Param::value)
    }

    /// Every value for `key`, in order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.params
            .iter()
            .filter(move |p| p.key() == Some(key))
            .filter_map(Param::value)
    }

    /// Iterate over the parameters.
    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.params.iter()
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Serialize as `key=escaped&key=escaped...`, preserving order and duplicates.
    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .map(Param::encode)
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<'a> IntoIterator for &'a ParamSequence {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

impl FromIterator<Param> for ParamSequence {
    fn from_iter<I: IntoIterator<Item = Param>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_preserved() {
        let mut params = ParamSequence::new();
        params.push("fq", "a:1");
        params.push("fq", "b:2");
        params.push("rows", 10);

        assert_eq!(params.len(), 3);
        assert_eq!(params.get_all("fq").collect::<Vec<_>>(), vec!["a:1", "b:2"]);
        assert_eq!(params.get("rows"), Some("10"));
        assert_eq!(params.to_query_string(), "fq=a%3A1&fq=b%3A2&rows=10");
    }

    #[test]
    fn test_get_outlives_key() {
        let mut params = ParamSequence::new();
        params.push("rows", 10);

        let value = {
            let key = String::from("rows");
            params.get(&key)
        };
        assert_eq!(value, Some("10"));
    }

    #[test]
    fn test_values_are_form_escaped() {
        let mut params = ParamSequence::new();
        params.push("q", "good book");
        params.push("facet.query", "{!key=x}city:\"new york\"");
        assert_eq!(
            params.to_query_string(),
            "q=good+book&facet.query=%7B%21key%3Dx%7Dcity%3A%22new+york%22"
        );
    }

    #[test]
    fn test_raw_fragment_verbatim() {
        let mut params = ParamSequence::new();
        params.push("q", "x");
        params.push_raw("facet=true&facet.field=brand");
        assert_eq!(params.to_query_string(), "q=x&facet=true&facet.field=brand");
        assert_eq!(params.get("facet"), None);
    }
}

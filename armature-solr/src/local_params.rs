//! Local parameter blocks (`{!key=value ...}`).

use std::fmt;

/// Local parameters attached to a single query, filter or facet expression.
///
/// Entries keep their insertion order. Setting an existing name replaces its
/// value in place.
///
/// # Example
///
/// ```rust
/// use armature_solr::LocalParams;
///
/// let lp = LocalParams::new().with("key", "seattle").with("ex", "dt");
/// assert_eq!(lp.to_string(), "{!key=seattle ex=dt}");
/// assert_eq!(LocalParams::new().to_string(), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalParams {
    entries: Vec<(String, Option<String>)>,
}

impl LocalParams {
    /// Create an empty set of local params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a `name=value` entry.
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.set(name, value);
        self
    }

    /// Add a raw token, rendered verbatim (for example `tag=dt` or `func`).
    pub fn with_raw(mut self, token: impl Into<String>) -> Self {
        self.entries.push((token.into(), None));
        self
    }

    /// Set a `name=value` entry, replacing an existing value for `name`.
    pub fn set(&mut self, name: impl Into<String>, value: impl ToString) {
        let name = name.into();
        let value = Some(value.to_string());
        match self
            .entries
            .iter_mut()
            .find(|(n, v)| v.is_some() && *n == name)
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Set `name=value` only when `name` has no value yet.
    pub fn set_default(&mut self, name: impl Into<String>, value: impl ToString) {
        let name = name.into();
        if self.get(&name).is_none() {
            self.entries.push((name, Some(value.to_string())));
        }
    }

    /// Look up the value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, v)| v.is_some() && n == name)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Whether no entries are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for LocalParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return Ok(());
        }

        f.write_str("{!")?;
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match value {
                Some(value) => write!(f, "{}={}", name, value)?,
                None => f.write_str(name)?,
            }
        }
        f.write_str("}")
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for LocalParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = LocalParams::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_renders_nothing() {
        assert_eq!(LocalParams::new().to_string(), "");
        assert!(LocalParams::new().is_empty());
    }

    #[test]
    fn test_render_in_insertion_order() {
        let lp = LocalParams::new().with("tag", "dt").with("key", 19596);
        assert_eq!(lp.to_string(), "{!tag=dt key=19596}");
    }

    #[test]
    fn test_raw_token() {
        let lp = LocalParams::new().with_raw("func").with("key", "x");
        assert_eq!(lp.to_string(), "{!func key=x}");
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut lp = LocalParams::new().with("key", "a").with("ex", "b");
        lp.set("key", "c");
        assert_eq!(lp.to_string(), "{!key=c ex=b}");
    }

    #[test]
    fn test_set_default_keeps_existing() {
        let mut lp = LocalParams::new().with("key", "mine");
        lp.set_default("key", "other");
        assert_eq!(lp.get("key"), Some("mine"));

        let mut lp = LocalParams::new();
        lp.set_default("key", "seattle");
        assert_eq!(lp.to_string(), "{!key=seattle}");
    }

    #[test]
    fn test_from_iter() {
        let lp: LocalParams = [("ex", "dt")].into_iter().collect();
        assert_eq!(lp.get("ex"), Some("dt"));
    }
}

//! Query and filter values.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::ops::RangeInclusive;

/// A value that renders into an engine query expression.
///
/// Mappings are kept in a `BTreeMap`, so two values that differ only in the
/// order their fields were inserted render identically. List order is kept.
///
/// # Example
///
/// ```rust
/// use armature_solr::QueryValue;
///
/// let by_brand = QueryValue::fields([("brand", "apple")]);
/// let price = QueryValue::from(10..=20);
/// let words = QueryValue::from(vec!["good", "book"]);
/// # let _ = (by_brand, price, words);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// A scalar, rendered as-is.
    Literal(String),
    /// Terms joined by spaces (implicit AND).
    Many(Vec<QueryValue>),
    /// `field:value` clauses.
    Fields(BTreeMap<String, QueryValue>),
    /// An inclusive range, rendered as `[lo TO hi]` under a field.
    Range(String, String),
}

impl QueryValue {
    /// Create a literal value.
    pub fn literal(value: impl Into<String>) -> Self {
        QueryValue::Literal(value.into())
    }

    /// Create a field mapping.
    pub fn fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<QueryValue>,
    {
        QueryValue::Fields(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Create an inclusive range. Use `*` for an open end.
    pub fn range(lo: impl Display, hi: impl Display) -> Self {
        QueryValue::Range(lo.to_string(), hi.to_string())
    }

    /// Whether the value renders to nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            QueryValue::Literal(s) => s.is_empty(),
            QueryValue::Many(values) => values.iter().all(QueryValue::is_empty),
            QueryValue::Fields(fields) => fields.is_empty(),
            QueryValue::Range(_, _) => false,
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Literal(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::Literal(s)
    }
}

impl From<&String> for QueryValue {
    fn from(s: &String) -> Self {
        QueryValue::Literal(s.clone())
    }
}

macro_rules! literal_from_display {
    ($($t:ty),*) => {
        $(
            impl From<$t> for QueryValue {
                fn from(v: $t) -> Self {
                    QueryValue::Literal(v.to_string())
                }
            }
        )*
    };
}

literal_from_display!(bool, i32, i64, u32, u64, usize, f32, f64);

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(values: Vec<T>) -> Self {
        QueryValue::Many(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<QueryValue>, const N: usize> From<[T; N]> for QueryValue {
    fn from(values: [T; N]) -> Self {
        QueryValue::Many(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Display> From<RangeInclusive<T>> for QueryValue {
    fn from(range: RangeInclusive<T>) -> Self {
        let (lo, hi) = range.into_inner();
        QueryValue::range(lo, hi)
    }
}

impl From<BTreeMap<String, QueryValue>> for QueryValue {
    fn from(fields: BTreeMap<String, QueryValue>) -> Self {
        QueryValue::Fields(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(QueryValue::from(19596), QueryValue::literal("19596"));
        assert_eq!(QueryValue::from(true), QueryValue::literal("true"));
        assert_eq!(QueryValue::from(1.5), QueryValue::literal("1.5"));
    }

    #[test]
    fn test_range_conversion() {
        assert_eq!(
            QueryValue::from(1..=3),
            QueryValue::Range("1".to_string(), "3".to_string())
        );
    }

    #[test]
    fn test_fields_ignore_insertion_order() {
        let a = QueryValue::fields([("city", "seattle"), ("brand", "apple")]);
        let b = QueryValue::fields([("brand", "apple"), ("city", "seattle")]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_is_empty() {
        assert!(QueryValue::literal("").is_empty());
        assert!(QueryValue::Many(vec![]).is_empty());
        assert!(!QueryValue::range("*", 10).is_empty());
        assert!(!QueryValue::from("apple").is_empty());
    }
}

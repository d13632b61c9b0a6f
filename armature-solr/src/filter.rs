//! Filter (`fq`) and boost (`bq`) parameters.

use crate::{
    error::Result,
    expression::render_clause,
    local_params::LocalParams,
    params::ParamSequence,
    value::QueryValue,
};
use std::collections::BTreeMap;

/// A filter specification.
///
/// Every mapping entry becomes its own repeated parameter, so
/// `{instock: true, onsale: true}` and `["instock:true", "onsale:true"]`
/// produce the same two `fq` parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSpec {
    /// A filter expression used verbatim.
    Raw(String),
    /// Several filters, possibly of mixed shapes.
    Many(Vec<FilterSpec>),
    /// `field:value` filters sharing one set of local params.
    Fields {
        /// Local params prefixed to every entry.
        local_params: LocalParams,
        /// Field filters; `None` entries are skipped.
        fields: BTreeMap<String, Option<QueryValue>>,
    },
}

impl FilterSpec {
    /// Create field filters without local params.
    pub fn fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<QueryValue>,
    {
        FilterSpec::Fields {
            local_params: LocalParams::new(),
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        }
    }

    /// Attach local params to a field filter. Other shapes are returned unchanged.
    pub fn with_local_params(self, params: LocalParams) -> Self {
        match self {
            FilterSpec::Fields { fields, .. } => FilterSpec::Fields {
                local_params: params,
                fields,
            },
            other => other,
        }
    }
}

impl From<&str> for FilterSpec {
    fn from(s: &str) -> Self {
        FilterSpec::Raw(s.to_string())
    }
}

impl From<String> for FilterSpec {
    fn from(s: String) -> Self {
        FilterSpec::Raw(s)
    }
}

impl<T: Into<FilterSpec>> From<Vec<T>> for FilterSpec {
    fn from(filters: Vec<T>) -> Self {
        FilterSpec::Many(filters.into_iter().map(Into::into).collect())
    }
}

/// Build one `key` parameter per filter in `spec`.
pub fn build_filters(key: &str, spec: &FilterSpec) -> Result<ParamSequence> {
    let mut params = ParamSequence::new();

    match spec {
        FilterSpec::Raw(filter) => {
            if !filter.is_empty() {
                params.push(key, filter);
            }
        }
        FilterSpec::Many(filters) => {
            for filter in filters {
                params.extend(build_filters(key, filter)?);
            }
        }
        FilterSpec::Fields {
            local_params,
            fields,
        } => {
            let prefix = local_params.to_string();
            for (field, value) in fields {
                let Some(value) = value.as_ref().filter(|v| !v.is_empty()) else {
                    continue;
                };
                params.push(key, format!("{}{}", prefix, render_clause(field, value)?));
            }
        }
    }

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(spec: FilterSpec) -> Vec<String> {
        build_filters("fq", &spec)
            .unwrap()
            .get_all("fq")
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_string_filter() {
        assert_eq!(values("location:seattle".into()), vec!["location:seattle"]);
    }

    #[test]
    fn test_mapping_filter() {
        assert_eq!(
            values(FilterSpec::fields([("location", "seattle")])),
            vec!["location:seattle"]
        );
    }

    #[test]
    fn test_each_entry_is_its_own_param() {
        assert_eq!(
            values(FilterSpec::fields([("instock", true), ("onsale", true)])),
            vec!["instock:true", "onsale:true"]
        );
    }

    #[test]
    fn test_range_filter() {
        assert_eq!(values(FilterSpec::fields([("id", 1..=3)])), vec!["id:[1 TO 3]"]);
    }

    #[test]
    fn test_heterogeneous_list() {
        let spec = FilterSpec::Many(vec![
            "instock:true".into(),
            FilterSpec::fields([("brand", "apple")]),
        ]);
        assert_eq!(values(spec), vec!["instock:true", "brand:apple"]);
    }

    #[test]
    fn test_local_params_prefix_every_entry() {
        let spec = FilterSpec::fields([("brand", "apple"), ("city", "seattle")])
            .with_local_params(LocalParams::new().with("tag", "dt"));
        assert_eq!(
            values(spec),
            vec!["{!tag=dt}brand:apple", "{!tag=dt}city:seattle"]
        );
    }

    #[test]
    fn test_absent_and_empty_values_dropped() {
        let mut fields = BTreeMap::new();
        fields.insert("a".to_string(), None);
        fields.insert("b".to_string(), Some(QueryValue::literal("")));
        fields.insert("c".to_string(), Some(QueryValue::literal("x")));
        let spec = FilterSpec::Fields {
            local_params: LocalParams::new(),
            fields,
        };
        assert_eq!(values(spec), vec!["c:x"]);
        assert!(values(FilterSpec::Raw(String::new())).is_empty());
    }
}

//! Request specification.

use crate::{
    facet::{FacetSpec, Facets},
    filter::FilterSpec,
    value::QueryValue,
};
use std::collections::BTreeMap;
use std::time::Duration;

/// What to ask the engine for.
///
/// Recognized options are typed fields. Anything else goes into
/// [`passthrough`](Self::passthrough) and is sent verbatim, which reaches
/// engine features this crate does not model.
///
/// # Example
///
/// ```rust
/// use armature_solr::{FieldFacet, FilterSpec, QueryValue, RequestSpec};
///
/// let spec = RequestSpec::new(QueryValue::fields([("index_type", "books")]))
///     .filter(FilterSpec::fields([("location", "seattle")]))
///     .facet(FieldFacet::new("brand").limit(15))
///     .limit(20)
///     .param("debugQuery", "true");
/// # let _ = spec;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSpec {
    /// Main query (`q`).
    pub query: Option<QueryValue>,
    /// Filter queries (`fq`).
    pub filters: Option<FilterSpec>,
    /// Facets.
    pub facets: Option<Facets>,
    /// Sort clauses such as `price asc`.
    pub sorts: Vec<String>,
    /// Number of rows to return (`rows`).
    pub limit: Option<u64>,
    /// Offset of the first row (`start`). Negative values are clamped to 0.
    pub offset: Option<i64>,
    /// Field list (`fl`).
    pub fields: Option<String>,
    /// Boost queries (`bq`).
    pub boost: Option<FilterSpec>,
    /// Request highlighting.
    pub highlight: bool,
    /// Spell-check suggestion count (`suggestionCount`).
    pub suggestion_count: Option<u32>,
    /// Only suggest more popular terms (`onlyMorePopular`).
    pub only_more_popular: Option<bool>,
    /// Engine parameters sent verbatim, in key order.
    pub passthrough: BTreeMap<String, Vec<String>>,
    /// Look the response up in, and store it into, the client's cache.
    pub enable_caching: bool,
    /// Cache time-to-live for this request.
    pub ttl: Option<Duration>,
}

impl RequestSpec {
    /// Create a spec for a query.
    pub fn new(query: impl Into<QueryValue>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    /// Add a filter.
    pub fn filter(mut self, filter: impl Into<FilterSpec>) -> Self {
        self.filters = Some(append_filter(self.filters.take(), filter.into()));
        self
    }

    /// Add a boost query.
    pub fn boost(mut self, boost: impl Into<FilterSpec>) -> Self {
        self.boost = Some(append_filter(self.boost.take(), boost.into()));
        self
    }

    /// Add a facet.
    ///
    /// A raw fragment set through [`facets`](Self::facets) is replaced, since
    /// it cannot be merged with structured facets.
    pub fn facet(mut self, facet: impl Into<FacetSpec>) -> Self {
        match &mut self.facets {
            Some(Facets::Specs(specs)) => specs.push(facet.into()),
            _ => self.facets = Some(Facets::Specs(vec![facet.into()])),
        }
        self
    }

    /// Replace the facets.
    pub fn facets(mut self, facets: impl Into<Facets>) -> Self {
        self.facets = Some(facets.into());
        self
    }

    /// Add a sort clause.
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sorts.push(sort.into());
        self
    }

    /// Set the number of rows.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the offset.
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set the field list.
    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    /// Enable or disable highlighting.
    pub fn highlight(mut self, enabled: bool) -> Self {
        self.highlight = enabled;
        self
    }

    /// Set the spell-check suggestion count.
    pub fn suggestion_count(mut self, count: u32) -> Self {
        self.suggestion_count = Some(count);
        self
    }

    /// Only suggest terms more popular than the query terms.
    pub fn only_more_popular(mut self, enabled: bool) -> Self {
        self.only_more_popular = Some(enabled);
        self
    }

    /// Add a passthrough engine parameter. Repeated keys are all sent.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.passthrough
            .entry(key.into())
            .or_default()
            .push(value.to_string());
        self
    }

    /// Enable or disable caching for this request.
    pub fn enable_caching(mut self, enabled: bool) -> Self {
        self.enable_caching = enabled;
        self
    }

    /// Set the cache time-to-live for this request.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

fn append_filter(existing: Option<FilterSpec>, filter: FilterSpec) -> FilterSpec {
    match existing {
        None => filter,
        Some(FilterSpec::Many(mut filters)) => {
            filters.push(filter);
            FilterSpec::Many(filters)
        }
        Some(other) => FilterSpec::Many(vec![other, filter]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facet::FieldFacet;

    #[test]
    fn test_filters_accumulate() {
        let spec = RequestSpec::new("x").filter("a:1").filter("b:2");
        assert_eq!(spec.filters, Some(FilterSpec::Many(vec!["a:1".into(), "b:2".into()])));
    }

    #[test]
    fn test_facets_accumulate() {
        let spec = RequestSpec::new("x")
            .facet(FieldFacet::new("a"))
            .facet(FieldFacet::new("b"));
        match spec.facets {
            Some(Facets::Specs(specs)) => assert_eq!(specs.len(), 2),
            other => panic!("unexpected facets: {:?}", other),
        }
    }

    #[test]
    fn test_facet_replaces_raw_fragment() {
        let spec = RequestSpec::new("x")
            .facets("facet.field=brand")
            .facet(FieldFacet::new("a"));
        match spec.facets {
            Some(Facets::Specs(specs)) => assert_eq!(specs.len(), 1),
            other => panic!("unexpected facets: {:?}", other),
        }
    }

    #[test]
    fn test_passthrough_repeats() {
        let spec = RequestSpec::new("x").param("mm", 2).param("mm", 3);
        assert_eq!(spec.passthrough["mm"], vec!["2", "3"]);
    }
}

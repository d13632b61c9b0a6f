//! Facet parameters and facet naming.

use crate::{
    error::{Result, SolrError},
    expression::build_expression,
    local_params::LocalParams,
    params::ParamSequence,
    value::QueryValue,
};
use std::collections::BTreeMap;

/// Option names that never become `f.<field>.facet.<name>` parameters.
const RESERVED_OPTIONS: [&str; 4] = ["field", "query", "name", "localparams"];

/// Facet over the values of a stored field.
///
/// # Example
///
/// ```rust
/// use armature_solr::FieldFacet;
///
/// let facet = FieldFacet::new("brand").limit(15).mincount(5);
/// # let _ = facet;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFacet {
    /// Field name.
    pub field: String,
    /// Per-field options, emitted as `f.<field>.facet.<option>`.
    pub options: BTreeMap<String, String>,
    /// Local params prefixed to the field name.
    pub local_params: LocalParams,
    /// Alias the engine reports the counts under.
    pub name: Option<String>,
}

impl FieldFacet {
    /// Create a field facet.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            options: BTreeMap::new(),
            local_params: LocalParams::new(),
            name: None,
        }
    }

    /// Set a per-field facet option.
    pub fn option(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.options.insert(name.into(), value.to_string());
        self
    }

    /// Maximum number of values to return.
    pub fn limit(self, limit: i64) -> Self {
        self.option("limit", limit)
    }

    /// Minimum count for a value to be returned.
    pub fn mincount(self, mincount: u64) -> Self {
        self.option("mincount", mincount)
    }

    /// Only return values starting with `prefix`.
    pub fn prefix(self, prefix: impl Into<String>) -> Self {
        self.option("prefix", prefix.into())
    }

    /// Sort order of the returned values (`count` or `index`).
    pub fn sort(self, sort: impl Into<String>) -> Self {
        self.option("sort", sort.into())
    }

    /// Set local params.
    pub fn local_params(mut self, params: LocalParams) -> Self {
        self.local_params = params;
        self
    }

    /// Set the alias.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Facet counting the documents matching a sub-query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFacet {
    /// Sub-query expression.
    pub query: QueryValue,
    /// Local params prefixed to the expression.
    pub local_params: LocalParams,
    /// Friendly name used to look the count up in the response.
    pub name: Option<String>,
}

impl QueryFacet {
    /// Create a query facet.
    pub fn new(query: impl Into<QueryValue>) -> Self {
        Self {
            query: query.into(),
            local_params: LocalParams::new(),
            name: None,
        }
    }

    /// Set local params.
    pub fn local_params(mut self, params: LocalParams) -> Self {
        self.local_params = params;
        self
    }

    /// Set the friendly name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A single facet request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacetSpec {
    /// Field facet.
    Field(FieldFacet),
    /// Query facet.
    Query(QueryFacet),
}

impl From<FieldFacet> for FacetSpec {
    fn from(facet: FieldFacet) -> Self {
        FacetSpec::Field(facet)
    }
}

impl From<QueryFacet> for FacetSpec {
    fn from(facet: QueryFacet) -> Self {
        FacetSpec::Query(facet)
    }
}

/// The facets of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Facets {
    /// Structured facet requests.
    Specs(Vec<FacetSpec>),
    /// Pre-encoded facet parameters appended unchanged.
    Raw(String),
}

impl From<FacetSpec> for Facets {
    fn from(facet: FacetSpec) -> Self {
        Facets::Specs(vec![facet])
    }
}

impl From<FieldFacet> for Facets {
    fn from(facet: FieldFacet) -> Self {
        Facets::Specs(vec![facet.into()])
    }
}

impl From<QueryFacet> for Facets {
    fn from(facet: QueryFacet) -> Self {
        Facets::Specs(vec![facet.into()])
    }
}

impl From<&str> for Facets {
    fn from(raw: &str) -> Self {
        Facets::Raw(raw.to_string())
    }
}

impl From<Vec<FacetSpec>> for Facets {
    fn from(facets: Vec<FacetSpec>) -> Self {
        Facets::Specs(facets)
    }
}

/// How a named query facet was sent to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedFacet {
    /// The `key` local param the engine echoes back.
    pub key: String,
    /// The full `facet.query` value, local params included.
    pub param: String,
    /// The expression without local params.
    pub expression: String,
}

impl NamedFacet {
    /// Keys the engine may have reported this facet under, most specific first.
    pub fn candidates(&self) -> [&str; 3] {
        [self.key.as_str(), self.param.as_str(), self.expression.as_str()]
    }
}

/// Friendly name to expression table for named query facets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetNames {
    names: BTreeMap<String, NamedFacet>,
}

impl FacetNames {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a name.
    pub fn get(&self, name: &str) -> Option<&NamedFacet> {
        self.names.get(name)
    }

    /// Number of recorded names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no names are recorded.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn record(&mut self, name: String, facet: NamedFacet) {
        self.names.insert(name, facet);
    }
}

/// Build the `facet.*` parameters for `facets`, recording named query facets in `names`.
///
/// The caller emits the leading `facet=true`.
pub fn build_facets(facets: &[FacetSpec], names: &mut FacetNames) -> Result<ParamSequence> {
    let mut params = ParamSequence::new();
    for facet in facets {
        match facet {
            FacetSpec::Field(facet) => build_field_facet(facet, &mut params)?,
            FacetSpec::Query(facet) => build_query_facet(facet, &mut params, names)?,
        }
    }
    Ok(params)
}

fn build_field_facet(facet: &FieldFacet, params: &mut ParamSequence) -> Result<()> {
    if facet.field.is_empty() {
        return Err(SolrError::Configuration(
            "field facet requires a field name".to_string(),
        ));
    }

    let local_params = with_alias(&facet.local_params, facet.name.as_deref());
    params.push("facet.field", format!("{}{}", local_params, facet.field));

    for (option, value) in &facet.options {
        if RESERVED_OPTIONS.contains(&option.as_str()) {
            continue;
        }
        params.push(format!("f.{}.facet.{}", facet.field, option), value);
    }

    Ok(())
}

fn build_query_facet(
    facet: &QueryFacet,
    params: &mut ParamSequence,
    names: &mut FacetNames,
) -> Result<()> {
    if facet.query.is_empty() {
        return Err(SolrError::Configuration(
            "query facet requires a query".to_string(),
        ));
    }

    let local_params = with_alias(&facet.local_params, facet.name.as_deref());
    let param = build_expression("facet.query", &facet.query, &local_params)?;

    if let (Some(name), Some(value)) = (
        facet.name.as_deref().filter(|n| !n.is_empty()),
        param.value(),
    ) {
        let expression = build_expression("facet.query", &facet.query, &LocalParams::new())?
            .value()
            .unwrap_or_default()
            .to_string();
        names.record(
            name.to_string(),
            NamedFacet {
                key: local_params.get("key").unwrap_or(name).to_string(),
                param: value.to_string(),
                expression,
            },
        );
    }

    params.push_param(param);
    Ok(())
}

fn with_alias(local_params: &LocalParams, name: Option<&str>) -> LocalParams {
    let mut local_params = local_params.clone();
    if let Some(name) = name.filter(|n| !n.is_empty()) {
        local_params.set_default("key", name);
    }
    local_params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_facets() {
        let facets = vec![
            FieldFacet::new("instock_b").into(),
            FieldFacet::new("on_sale_b").limit(1).into(),
        ];
        let params = build_facets(&facets, &mut FacetNames::new()).unwrap();

        assert_eq!(
            params.get_all("facet.field").collect::<Vec<_>>(),
            vec!["instock_b", "on_sale_b"]
        );
        assert_eq!(params.get("f.on_sale_b.facet.limit"), Some("1"));
    }

    #[test]
    fn test_query_facet_with_name() {
        let mut names = FacetNames::new();
        let facets = vec![
            QueryFacet::new(QueryValue::fields([("city", "seattle")]))
                .name("seattle")
                .into(),
        ];
        let params = build_facets(&facets, &mut names).unwrap();

        let value = params.get("facet.query").unwrap();
        assert!(value.starts_with("{!key=seattle}"));
        assert_eq!(value, "{!key=seattle}city:seattle");

        let named = names.get("seattle").unwrap();
        assert_eq!(named.key, "seattle");
        assert_eq!(named.expression, "city:seattle");
        assert_eq!(named.param, "{!key=seattle}city:seattle");
    }

    #[test]
    fn test_query_facet_without_name() {
        let mut names = FacetNames::new();
        let facets = vec![QueryFacet::new(QueryValue::fields([("city_idm", 19596)])).into()];
        let params = build_facets(&facets, &mut names).unwrap();

        assert_eq!(params.get("facet.query"), Some("city_idm:19596"));
        assert!(names.is_empty());
    }

    #[test]
    fn test_explicit_key_wins_over_name() {
        let mut names = FacetNames::new();
        let facets = vec![
            QueryFacet::new("price:[* TO 10]")
                .local_params(LocalParams::new().with("key", "cheap"))
                .name("budget")
                .into(),
        ];
        let params = build_facets(&facets, &mut names).unwrap();

        assert_eq!(params.get("facet.query"), Some("{!key=cheap}price:[* TO 10]"));
        assert_eq!(names.get("budget").unwrap().key, "cheap");
    }

    #[test]
    fn test_named_field_facet_gets_alias() {
        let facets = vec![FieldFacet::new("brand").name("brands").into()];
        let params = build_facets(&facets, &mut FacetNames::new()).unwrap();
        assert_eq!(params.get("facet.field"), Some("{!key=brands}brand"));
    }

    #[test]
    fn test_reserved_options_not_emitted() {
        let facets = vec![FieldFacet::new("brand").option("name", "x").into()];
        let params = build_facets(&facets, &mut FacetNames::new()).unwrap();
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_empty_field_is_configuration_error() {
        let facets = vec![FieldFacet::new("").into()];
        let err = build_facets(&facets, &mut FacetNames::new()).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_empty_query_is_configuration_error() {
        let facets = vec![QueryFacet::new("").into()];
        let err = build_facets(&facets, &mut FacetNames::new()).unwrap_err();
        assert!(err.is_configuration());
    }
}

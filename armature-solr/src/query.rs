//! Query builder: turns a [`RequestSpec`] into the engine's request string.

use crate::{
    error::{Result, SolrError},
    expression::build_expression,
    facet::{build_facets, FacetNames, Facets},
    filter::{build_filters, FilterSpec},
    local_params::LocalParams,
    params::ParamSequence,
    request::RequestSpec,
    value::QueryValue,
};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Field list requested when the spec names none.
pub const DEFAULT_FIELDS: &str = "id,unique_id,score";

/// Rows requested when the spec names no limit.
pub const DEFAULT_ROWS: u64 = 10;

/// Response writer requested from the engine.
pub const RESPONSE_FORMAT: &str = "json";

/// Path prefix of every request string.
const SELECT_PREFIX: &str = "/select?";

/// Query builder for constructing engine requests.
///
/// Building is deterministic: equal specs produce byte-identical request
/// strings, which is what makes [`SolrQuery::cache_key`] usable.
///
/// # Example
///
/// ```rust
/// use armature_solr::{QueryBuilder, RequestSpec};
///
/// let query = QueryBuilder::new("standard", RequestSpec::new("good book").limit(13).offset(3))
///     .build()?;
///
/// assert_eq!(query.params().get("q"), Some("good book"));
/// assert_eq!(query.params().get("rows"), Some("13"));
/// assert!(query.request_string().starts_with("/select?q=good+book&wt=json&qt=standard"));
/// # Ok::<(), armature_solr::SolrError>(())
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    request_handler: String,
    spec: RequestSpec,
}

impl QueryBuilder {
    /// Create a new query builder.
    pub fn new(request_handler: impl Into<String>, spec: RequestSpec) -> Self {
        Self {
            request_handler: request_handler.into(),
            spec,
        }
    }

    /// Get the request spec.
    pub fn spec(&self) -> &RequestSpec {
        &self.spec
    }

    /// Build the request.
    pub fn build(&self) -> Result<SolrQuery> {
        if self.request_handler.trim().is_empty() {
            return Err(SolrError::Configuration(
                "request handler must be supplied".to_string(),
            ));
        }

        let spec = &self.spec;
        let mut passthrough = spec.passthrough.clone();

        // Generated from the handler and the response writer.
        passthrough.remove("qt");
        passthrough.remove("wt");

        // Engine keys are consumed even when the friendly option wins.
        let direct_q = take(&mut passthrough, "q");
        let direct_rows = take_first(&mut passthrough, "rows");
        let direct_start = take_first(&mut passthrough, "start");
        let direct_fl = take_first(&mut passthrough, "fl");
        let direct_bq = take(&mut passthrough, "bq");
        let direct_suggestion_count = take_first(&mut passthrough, "suggestionCount");
        let direct_only_more_popular = take_first(&mut passthrough, "onlyMorePopular");
        let highlight_fields = take_first(&mut passthrough, "hl.fl");

        let query = match &spec.query {
            Some(query) => Some(query.clone()),
            None => direct_q.map(|values| {
                if values.len() == 1 {
                    QueryValue::Literal(values.into_iter().next().unwrap_or_default())
                } else {
                    values.into()
                }
            }),
        };
        let query = query.ok_or_else(missing_query)?;
        let q = build_expression("q", &query, &LocalParams::new())?;
        if q.value().is_none_or(str::is_empty) {
            return Err(missing_query());
        }

        let rows = match spec.limit {
            Some(limit) => limit.to_string(),
            None => direct_rows.unwrap_or_else(|| DEFAULT_ROWS.to_string()),
        };

        let start = match spec.offset {
            Some(offset) => offset,
            None => direct_start
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(0),
        }
        .max(0);

        let fl = match &spec.fields {
            Some(fields) => fields.clone(),
            None => direct_fl.unwrap_or_else(|| DEFAULT_FIELDS.to_string()),
        };

        let boost = match &spec.boost {
            Some(boost) => Some(boost.clone()),
            None => direct_bq
                .map(|values| FilterSpec::Many(values.into_iter().map(FilterSpec::Raw).collect())),
        };

        let suggestion_count = spec
            .suggestion_count
            .map(|c| c.to_string())
            .or(direct_suggestion_count);
        let only_more_popular = spec
            .only_more_popular
            .map(|b| b.to_string())
            .or(direct_only_more_popular);

        let mut params = ParamSequence::new();
        params.push_param(q);
        params.push("wt", RESPONSE_FORMAT);
        params.push("qt", &self.request_handler);
        params.push("rows", rows);
        params.push("start", start);
        params.push("fl", &fl);

        if let Some(filters) = &spec.filters {
            params.extend(build_filters("fq", filters)?);
        }
        if let Some(boost) = &boost {
            params.extend(build_filters("bq", boost)?);
        }

        let mut facet_names = FacetNames::new();
        match &spec.facets {
            Some(Facets::Specs(facets)) if !facets.is_empty() => {
                params.push("facet", true);
                params.extend(build_facets(facets, &mut facet_names)?);
            }
            Some(Facets::Raw(raw)) if !raw.is_empty() => params.push_raw(raw.as_str()),
            _ => {}
        }

        if spec.highlight {
            params.push("hl", true);
            params.push("hl.fl", highlight_fields.unwrap_or_else(|| fl.clone()));
        } else if let Some(highlight_fields) = highlight_fields {
            params.push("hl.fl", highlight_fields);
        }

        if !spec.sorts.is_empty() {
            params.push("sort", spec.sorts.join(","));
        }
        if let Some(count) = suggestion_count {
            params.push("suggestionCount", count);
        }
        if let Some(only_more_popular) = only_more_popular {
            params.push("onlyMorePopular", only_more_popular);
        }

        for (key, values) in passthrough {
            for value in values {
                params.push(key.as_str(), value);
            }
        }

        Ok(SolrQuery::new(self.request_handler.clone(), params, facet_names))
    }
}

fn missing_query() -> SolrError {
    SolrError::Configuration("query or q must be set".to_string())
}

fn take(passthrough: &mut BTreeMap<String, Vec<String>>, key: &str) -> Option<Vec<String>> {
    passthrough.remove(key).filter(|values| !values.is_empty())
}

fn take_first(passthrough: &mut BTreeMap<String, Vec<String>>, key: &str) -> Option<String> {
    take(passthrough, key).and_then(|values| values.into_iter().next())
}

/// A built request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolrQuery {
    request_handler: String,
    params: ParamSequence,
    facet_names: FacetNames,
    request_string: String,
}

impl SolrQuery {
    fn new(request_handler: String, params: ParamSequence, facet_names: FacetNames) -> Self {
        let request_string = format!("{}{}", SELECT_PREFIX, params.to_query_string());
        Self {
            request_handler,
            params,
            facet_names,
            request_string,
        }
    }

    /// The request handler (`qt`).
    pub fn request_handler(&self) -> &str {
        &self.request_handler
    }

    /// The ordered parameters.
    pub fn params(&self) -> &ParamSequence {
        &self.params
    }

    /// Names recorded for named query facets.
    pub fn facet_names(&self) -> &FacetNames {
        &self.facet_names
    }

    /// `/select?` followed by the encoded parameters.
    pub fn request_string(&self) -> &str {
        &self.request_string
    }

    /// The encoded parameters alone, used as the POST body.
    pub fn query_string(&self) -> &str {
        &self.request_string[SELECT_PREFIX.len()..]
    }

    /// Hex SHA-256 digest of the request string.
    pub fn cache_key(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.request_string.as_bytes());
        hex::encode(hasher.finalize())
    }
}

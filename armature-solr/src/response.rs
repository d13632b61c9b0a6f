//! Response model over the engine's JSON reply.

use crate::{
    config::DEFAULT_SHORTCUTS,
    error::{Result, SolrError},
    facet::FacetNames,
    logger::SolrLogger,
    query::SolrQuery,
    spellcheck::Spellcheck,
};
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

static EMPTY_MAP: Lazy<Map<String, Value>> = Lazy::new(Map::new);

/// Options controlling how a response is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseOptions {
    /// Fields available through [`SolrResponse::projection`].
    pub shortcuts: Vec<String>,
    /// Document field holding the id the highlighting subtree is keyed by.
    pub unique_key: String,
    /// Whether the body came from the cache.
    pub from_cache: bool,
}

impl Default for ResponseOptions {
    fn default() -> Self {
        Self {
            shortcuts: DEFAULT_SHORTCUTS.iter().map(|s| s.to_string()).collect(),
            unique_key: "unique_id".to_string(),
            from_cache: false,
        }
    }
}

impl ResponseOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the projection fields.
    pub fn with_shortcuts<I, S>(mut self, shortcuts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shortcuts = shortcuts.into_iter().map(Into::into).collect();
        self
    }

    /// Set the unique key field.
    pub fn with_unique_key(mut self, field: impl Into<String>) -> Self {
        self.unique_key = field.into();
        self
    }

    /// Mark the body as served from the cache.
    pub fn with_from_cache(mut self, from_cache: bool) -> Self {
        self.from_cache = from_cache;
        self
    }
}

/// A parsed search response.
///
/// The JSON tree is immutable once parsed. Derived views are computed on
/// first access and memoized, so a response can be shared across threads.
///
/// Header and result accessors fail with [`SolrError::MalformedResponse`]
/// when the subtree they read is missing. Facet accessors treat a missing
/// `facet_counts` as "no facets requested".
#[derive(Debug)]
pub struct SolrResponse {
    raw: Value,
    request_url: String,
    facet_names: FacetNames,
    options: ResponseOptions,
    facet_fields_by_hash: OnceCell<BTreeMap<String, BTreeMap<String, i64>>>,
    spellcheck: OnceCell<Spellcheck>,
    projections: Mutex<HashMap<String, Arc<Vec<Value>>>>,
}

impl SolrResponse {
    /// Parse a response body.
    ///
    /// Invalid JSON logs the body and the parse error to `logger` before
    /// returning [`SolrError::Parse`].
    pub fn parse(
        buffer: &str,
        query: &SolrQuery,
        options: ResponseOptions,
        logger: &dyn SolrLogger,
    ) -> Result<Self> {
        Self::parse_slice(buffer.as_bytes(), query, options, logger)
    }

    /// Parse a raw response body.
    ///
    /// Bytes that are not valid UTF-8 are a [`SolrError::Parse`] like any
    /// other invalid JSON. The body is logged lossily.
    pub fn parse_slice(
        buffer: &[u8],
        query: &SolrQuery,
        options: ResponseOptions,
        logger: &dyn SolrLogger,
    ) -> Result<Self> {
        let raw: Value = match serde_json::from_slice(buffer) {
            Ok(raw) => raw,
            Err(e) => {
                logger.error(&String::from_utf8_lossy(buffer));
                logger.error(&e.to_string());
                return Err(e.into());
            }
        };

        Ok(Self {
            raw,
            request_url: query.request_string().to_string(),
            facet_names: query.facet_names().clone(),
            options,
            facet_fields_by_hash: OnceCell::new(),
            spellcheck: OnceCell::new(),
            projections: Mutex::new(HashMap::new()),
        })
    }

    /// The parsed JSON tree.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The request string that produced this response.
    pub fn request_url(&self) -> &str {
        &self.request_url
    }

    /// Whether the body came from the cache.
    pub fn from_cache(&self) -> bool {
        self.options.from_cache
    }

    /// Whether the engine returned a JSON object.
    pub fn success(&self) -> bool {
        self.raw.is_object()
    }

    fn subtree(&self, key: &str) -> Result<&Map<String, Value>> {
        self.raw
            .get(key)
            .and_then(Value::as_object)
            .ok_or_else(|| SolrError::malformed(format!("missing '{}' object", key)))
    }

    fn header(&self) -> Result<&Map<String, Value>> {
        self.subtree("responseHeader")
    }

    fn result(&self) -> Result<&Map<String, Value>> {
        self.subtree("response")
    }

    /// Number of matching documents.
    pub fn total(&self) -> Result<u64> {
        required_u64(self.result()?, "response", "numFound")
    }

    /// Whether nothing matched.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.total()? < 1)
    }

    /// Offset of the first returned document.
    pub fn offset(&self) -> Result<u64> {
        required_u64(self.result()?, "response", "start")
    }

    /// Highest score in the result set, `0.0` when scores were not requested.
    pub fn max_score(&self) -> Result<f64> {
        Ok(self
            .result()?
            .get("maxScore")
            .and_then(Value::as_f64)
            .unwrap_or(0.0))
    }

    /// The returned documents.
    pub fn docs(&self) -> Result<&[Value]> {
        self.result()?
            .get("docs")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .ok_or_else(|| SolrError::malformed("missing 'response.docs' array"))
    }

    /// The returned documents deserialized into `T`.
    pub fn docs_as<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.docs()?
            .iter()
            .map(|doc| T::deserialize(doc).map_err(SolrError::from))
            .collect()
    }

    /// Query time in milliseconds.
    pub fn qtime(&self) -> Result<u64> {
        required_u64(self.header()?, "responseHeader", "QTime")
    }

    /// Engine status code, 0 on success.
    pub fn status(&self) -> Result<i64> {
        self.header()?
            .get("status")
            .and_then(Value::as_i64)
            .ok_or_else(|| SolrError::malformed("missing 'responseHeader.status'"))
    }

    /// Parameters echoed by the engine.
    pub fn params(&self) -> Result<&Map<String, Value>> {
        self.header()?
            .get("params")
            .and_then(Value::as_object)
            .ok_or_else(|| SolrError::malformed("missing 'responseHeader.params' object"))
    }

    fn facet_counts(&self) -> Result<&Map<String, Value>> {
        match self.raw.get("facet_counts") {
            None | Some(Value::Null) => Ok(&*EMPTY_MAP),
            Some(Value::Object(counts)) => Ok(counts),
            Some(_) => Err(SolrError::malformed("'facet_counts' is not an object")),
        }
    }

    fn facet_section(&self, key: &str) -> Result<&Map<String, Value>> {
        match self.facet_counts()?.get(key) {
            None | Some(Value::Null) => Ok(&*EMPTY_MAP),
            Some(Value::Object(section)) => Ok(section),
            Some(_) => Err(SolrError::malformed(format!(
                "'facet_counts.{}' is not an object",
                key
            ))),
        }
    }

    /// Field to flat alternating `[value, count, value, count, ...]` list.
    pub fn facet_fields(&self) -> Result<&Map<String, Value>> {
        self.facet_section("facet_fields")
    }

    /// The alternating value/count list of one field, empty when absent.
    pub fn facet_field(&self, field: &str) -> Result<&[Value]> {
        match self.facet_fields()?.get(field) {
            None => Ok(&[][..]),
            Some(Value::Array(values)) => Ok(values.as_slice()),
            Some(_) => Err(SolrError::malformed(format!(
                "facet field '{}' is not a list",
                field
            ))),
        }
    }

    /// Field to value to count.
    pub fn facet_fields_by_hash(&self) -> Result<&BTreeMap<String, BTreeMap<String, i64>>> {
        self.facet_fields_by_hash.get_or_try_init(|| {
            self.facet_fields()?
                .iter()
                .map(|(field, values)| -> Result<(String, BTreeMap<String, i64>)> {
                    let values = values.as_array().ok_or_else(|| {
                        SolrError::malformed(format!("facet field '{}' is not a list", field))
                    })?;
                    let counts = pairs(field, values)?
                        .into_iter()
                        .map(|(value, count)| (value_key(value), count))
                        .collect();
                    Ok((field.clone(), counts))
                })
                .collect()
        })
    }

    /// Value to count for one field.
    pub fn facet_field_by_hash(&self, field: &str) -> Result<Option<&BTreeMap<String, i64>>> {
        Ok(self.facet_fields_by_hash()?.get(field))
    }

    /// Count of one value of one field.
    pub fn facet_field_count(&self, field: &str, value: impl ToString) -> Result<Option<i64>> {
        Ok(self
            .facet_field_by_hash(field)?
            .and_then(|counts| counts.get(&value.to_string()).copied()))
    }

    /// Values of one field with a non-zero count, in engine order.
    pub fn facet_field_values(&self, field: &str) -> Result<Vec<String>> {
        Ok(pairs(field, self.facet_field(field)?)?
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(value, _)| value_key(value))
            .collect())
    }

    /// Facet query (expression or `key` alias) to count.
    pub fn facet_queries(&self) -> Result<&Map<String, Value>> {
        self.facet_section("facet_queries")
    }

    /// Count of a facet query by the name it was given, its alias or its expression.
    pub fn facet_query_count_by_key(&self, name: impl ToString) -> Option<i64> {
        let name = name.to_string();
        let queries = self.facet_queries().ok()?;

        if let Some(count) = queries.get(&name).and_then(Value::as_i64) {
            return Some(count);
        }

        let named = self.facet_names.get(&name)?;
        named
            .candidates()
            .into_iter()
            .find_map(|key| queries.get(key).and_then(Value::as_i64))
    }

    /// Highlight snippets of one field of one document.
    pub fn highlights_for(&self, id: &str, field: &str) -> Option<&Value> {
        self.raw.get("highlighting")?.get(id)?.get(field)
    }

    /// The highlighted value of `field` when present, else the stored value.
    pub fn display_for<'a>(&'a self, doc: &'a Value, field: &str) -> Option<&'a Value> {
        doc.get(&self.options.unique_key)
            .map(value_key)
            .and_then(|id| self.highlights_for(&id, field))
            .or_else(|| doc.get(field))
    }

    /// The raw flattened spell-check suggestion list.
    pub fn suggestions(&self) -> Option<&[Value]> {
        self.raw
            .get("spellcheck")?
            .get("suggestions")?
            .as_array()
            .map(Vec::as_slice)
    }

    fn spellcheck(&self) -> &Spellcheck {
        self.spellcheck
            .get_or_init(|| Spellcheck::decode(self.suggestions().unwrap_or_default()))
    }

    /// Corrected form of the whole query.
    pub fn collation(&self) -> Option<&str> {
        self.spellcheck().collation()
    }

    /// Misspelled term to first correction.
    pub fn correction(&self) -> &BTreeMap<String, String> {
        self.spellcheck().corrections()
    }

    /// Configured projection fields.
    pub fn shortcuts(&self) -> &[String] {
        &self.options.shortcuts
    }

    /// Whether `field` is a configured projection.
    pub fn has_projection(&self, field: &str) -> bool {
        self.options.shortcuts.iter().any(|s| s == field)
    }

    /// Values of `field` across all documents, `null` where a document lacks it.
    pub fn projection(&self, field: &str) -> Result<Arc<Vec<Value>>> {
        if !self.has_projection(field) {
            return Err(SolrError::UnknownProjection(field.to_string()));
        }

        let mut projections = self.projections.lock();
        if let Some(values) = projections.get(field) {
            return Ok(Arc::clone(values));
        }

        let values = Arc::new(
            self.docs()?
                .iter()
                .map(|doc| doc.get(field).cloned().unwrap_or(Value::Null))
                .collect::<Vec<_>>(),
        );
        projections.insert(field.to_string(), Arc::clone(&values));
        Ok(values)
    }
}

fn required_u64(map: &Map<String, Value>, parent: &str, key: &str) -> Result<u64> {
    map.get(key)
        .and_then(Value::as_u64)
        .ok_or_else(|| SolrError::malformed(format!("missing '{}.{}'", parent, key)))
}

fn pairs<'a>(field: &str, values: &'a [Value]) -> Result<Vec<(&'a Value, i64)>> {
    if values.len() % 2 != 0 {
        return Err(SolrError::malformed(format!(
            "facet field '{}' has an odd number of entries",
            field
        )));
    }

    values
        .chunks_exact(2)
        .map(|pair| {
            let count = pair[1].as_i64().ok_or_else(|| {
                SolrError::malformed(format!("facet field '{}' has a non-integer count", field))
            })?;
            Ok((&pair[0], count))
        })
        .collect()
}

fn value_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

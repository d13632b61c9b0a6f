//! Rendering of query values into engine expressions.

use crate::{
    error::{Result, SolrError},
    local_params::LocalParams,
    params::Param,
    value::QueryValue,
};
use once_cell::sync::Lazy;
use regex::Regex;

static RANGE_SYNTAX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[.+ TO .+\]$").expect("valid range regex"));

/// Render `value` as the expression for parameter `key`, prefixed with `local_params`.
///
/// # Example
///
/// ```rust
/// use armature_solr::{build_expression, LocalParams, QueryValue};
///
/// let value = QueryValue::fields([("brand", "apple")]);
/// let param = build_expression("q", &value, &LocalParams::new())?;
/// assert_eq!(param.value(), Some("brand:apple"));
/// # Ok::<(), armature_solr::SolrError>(())
/// ```
pub fn build_expression(
    key: impl Into<String>,
    value: &QueryValue,
    local_params: &LocalParams,
) -> Result<Param> {
    let body = render(value)?;
    Ok(Param::new(key, format!("{}{}", local_params, body)))
}

/// Render a value without a field context.
pub(crate) fn render(value: &QueryValue) -> Result<String> {
    match value {
        QueryValue::Literal(s) => Ok(s.clone()),
        QueryValue::Many(values) => join(values.iter().map(render)),
        QueryValue::Fields(fields) => join(fields.iter().map(|(f, v)| render_clause(f, v))),
        QueryValue::Range(lo, hi) => Err(SolrError::Configuration(format!(
            "range [{} TO {}] must be attached to a field",
            lo, hi
        ))),
    }
}

/// Render `field:value` clauses for one field.
pub(crate) fn render_clause(field: &str, value: &QueryValue) -> Result<String> {
    match value {
        QueryValue::Literal(s) => Ok(if needs_quotes(s) {
            format!("{}:\"{}\"", field, s)
        } else {
            format!("{}:{}", field, s)
        }),
        QueryValue::Many(values) => join(values.iter().map(|v| render_clause(field, v))),
        QueryValue::Range(lo, hi) => Ok(format!("{}:[{} TO {}]", field, lo, hi)),
        QueryValue::Fields(_) => Err(SolrError::Configuration(format!(
            "field '{}' cannot hold a nested field mapping",
            field
        ))),
    }
}

// A range literal such as "[1 TO 3]" already carries its own syntax.
fn needs_quotes(s: &str) -> bool {
    s.chars().any(char::is_whitespace) && !RANGE_SYNTAX.is_match(s)
}

fn join(parts: impl Iterator<Item = Result<String>>) -> Result<String> {
    let parts = parts.collect::<Result<Vec<_>>>()?;
    Ok(parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(value: QueryValue) -> String {
        build_expression("q", &value, &LocalParams::new())
            .unwrap()
            .value()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_literal_verbatim() {
        assert_eq!(expr("apple".into()), "apple");
        assert_eq!(expr("good book".into()), "good book");
    }

    #[test]
    fn test_list_space_joined() {
        assert_eq!(expr(vec!["instock:true", "onsale:true"].into()), "instock:true onsale:true");
    }

    #[test]
    fn test_mapping() {
        assert_eq!(expr(QueryValue::fields([("brand", "apple")])), "brand:apple");
        assert_eq!(
            expr(QueryValue::fields([("index_type", "books"), ("brand", "apple")])),
            "brand:apple index_type:books"
        );
    }

    #[test]
    fn test_mapping_with_list_value() {
        assert_eq!(
            expr(QueryValue::fields([("tag", vec!["a", "b"])])),
            "tag:a tag:b"
        );
    }

    #[test]
    fn test_mapping_with_range() {
        assert_eq!(expr(QueryValue::fields([("id", 1..=3)])), "id:[1 TO 3]");
    }

    #[test]
    fn test_whitespace_is_quoted() {
        assert_eq!(
            expr(QueryValue::fields([("city", "new york")])),
            "city:\"new york\""
        );
    }

    #[test]
    fn test_range_string_not_quoted() {
        assert_eq!(
            expr(QueryValue::fields([("price", "[10 TO 20]")])),
            "price:[10 TO 20]"
        );
    }

    #[test]
    fn test_local_params_prefix() {
        let lp = LocalParams::new().with("key", "seattle");
        let param = build_expression("facet.query", &QueryValue::fields([("city", "seattle")]), &lp)
            .unwrap();
        assert_eq!(param.key(), Some("facet.query"));
        assert_eq!(param.value(), Some("{!key=seattle}city:seattle"));
    }

    #[test]
    fn test_bare_range_is_configuration_error() {
        let err = build_expression("q", &QueryValue::range(1, 3), &LocalParams::new()).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_nested_mapping_is_configuration_error() {
        let nested = QueryValue::fields([("outer", QueryValue::fields([("inner", "x")]))]);
        let err = build_expression("q", &nested, &LocalParams::new()).unwrap_err();
        assert!(err.is_configuration());
    }
}

//! Solr integration for the Armature framework.
//!
//! This crate provides a client for Solr-compatible search engines with support for:
//! - Deterministic request building from typed query, filter and facet specs
//! - Local params (`{!key=...}`) on filters and facets
//! - Typed access to facet counts, highlighting and spell-check suggestions
//! - Response caching keyed by a digest of the request string
//! - Document updates, deletes, commits and optimizes
//!
//! # Example
//!
//! ```rust,no_run
//! use armature_solr::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let client = SolrClient::new(SolrConfig::new("localhost", 8983))?;
//!
//!     let spec = RequestSpec::new(QueryValue::fields([("index_type", "widget")]))
//!         .filter(FilterSpec::fields([("instock_b", true)]))
//!         .facet(FieldFacet::new("brand").limit(15).mincount(5))
//!         .facet(QueryFacet::new("price:[* TO 10]").name("cheap"))
//!         .limit(20);
//!
//!     let response = client.query("standard", spec).await?;
//!
//!     println!("{} widgets", response.total()?);
//!     println!("brands: {:?}", response.facet_field_values("brand")?);
//!     println!("cheap: {:?}", response.facet_query_count_by_key("cheap"));
//!
//!     client
//!         .update_and_commit(
//!             [Document::new().add_field("id", 1).add_field("name", "mp3 player")],
//!             &UpdateOptions::new(),
//!         )
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod cache;
mod client;
mod config;
mod document;
mod error;
mod expression;
mod facet;
mod filter;
mod local_params;
mod logger;
mod params;
mod query;
mod request;
mod response;
mod spellcheck;
mod transport;
mod update;
mod value;

pub use cache::{InMemoryCache, QueryCache};
pub use client::{SolrClient, FORM_CONTENT_TYPE};
pub use config::{SolrConfig, DEFAULT_SHORTCUTS};
pub use document::{Document, FieldOptions};
pub use error::{Result, SolrError};
pub use expression::build_expression;
pub use facet::{build_facets, FacetNames, FacetSpec, Facets, FieldFacet, NamedFacet, QueryFacet};
pub use filter::{build_filters, FilterSpec};
pub use local_params::LocalParams;
pub use logger::{NoopLogger, SolrLogger, TracingLogger};
pub use params::{Param, ParamSequence};
pub use query::{QueryBuilder, SolrQuery, DEFAULT_FIELDS, DEFAULT_ROWS, RESPONSE_FORMAT};
pub use request::RequestSpec;
pub use response::{ResponseOptions, SolrResponse};
pub use spellcheck::Spellcheck;
pub use transport::{HttpTransport, Transport, TransportResponse};
pub use update::{
    add_xml, delete_by_id_xml, delete_by_query_xml, is_update_success, UpdateOptions, COMMIT_XML,
    OPTIMIZE_XML, UPDATE_CONTENT_TYPE,
};
pub use value::QueryValue;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        Document, FieldFacet, FieldOptions, FilterSpec, InMemoryCache, LocalParams, QueryBuilder,
        QueryFacet, QueryValue, RequestSpec, Result, SolrClient, SolrConfig, SolrError,
        SolrResponse, UpdateOptions,
    };
}

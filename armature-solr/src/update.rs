//! XML bodies for the update handler and their success markers.

use crate::document::{push_attribute, Document};
use quick_xml::escape::escape;
use std::collections::BTreeMap;

/// Content type of every update body.
pub const UPDATE_CONTENT_TYPE: &str = "text/xml;charset=utf-8";

/// Commit pending adds and deletes.
pub const COMMIT_XML: &str = "<commit/>";

/// Optimize the index.
pub const OPTIMIZE_XML: &str = "<optimize/>";

const LEGACY_SUCCESS: &str = r#"<result status="0"></result>"#;
const HEADER_SUCCESS: &str = r#"<lst name="responseHeader"><int name="status">0</int>"#;

/// Attributes of the `<add>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Attributes in name order, such as `overwrite`.
    pub attributes: BTreeMap<String, String>,
}

impl UpdateOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the engine to commit within `ms` milliseconds.
    pub fn commit_within(self, ms: u64) -> Self {
        self.attribute("commitWithin", ms)
    }

    /// Whether documents replace existing ones with the same key.
    pub fn overwrite(self, overwrite: bool) -> Self {
        self.attribute("overwrite", overwrite)
    }

    /// Add an attribute.
    pub fn attribute(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.insert(name.into(), value.to_string());
        self
    }

    fn to_attribute_string(&self) -> String {
        let mut attributes = String::new();
        for (name, value) in &self.attributes {
            push_attribute(&mut attributes, name, value);
        }
        attributes
    }
}

/// `<add{attributes}>\n{docs}\n</add>\n`.
pub fn add_xml(docs: &[Document], options: &UpdateOptions) -> String {
    let mut xml = format!("<add{}>\n", options.to_attribute_string());
    for doc in docs {
        xml.push_str(&doc.to_xml());
    }
    xml.push_str("\n</add>\n");
    xml
}

/// `<delete><id>{id}</id></delete>`.
pub fn delete_by_id_xml(id: &str) -> String {
    format!("<delete><id>{}</id></delete>", escape(id))
}

/// `<delete><query>{query}</query></delete>`.
pub fn delete_by_query_xml(query: &str) -> String {
    format!("<delete><query>{}</query></delete>", escape(query))
}

/// Whether an update response body carries a status-0 marker.
pub fn is_update_success(body: &str) -> bool {
    body.contains(LEGACY_SUCCESS) || body.contains(HEADER_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_xml() {
        let docs = vec![
            Document::new().add_field("id", 1),
            Document::new().add_field("id", 2),
        ];
        assert_eq!(
            add_xml(&docs, &UpdateOptions::new()),
            "<add>\n<doc>\n<field name=\"id\">1</field>\n</doc><doc>\n<field name=\"id\">2</field>\n</doc>\n</add>\n"
        );
    }

    #[test]
    fn test_add_attributes() {
        let xml = add_xml(&[], &UpdateOptions::new().overwrite(false).commit_within(500));
        assert_eq!(xml, "<add commitWithin=\"500\" overwrite=\"false\">\n\n</add>\n");
    }

    #[test]
    fn test_add_skips_invalid_attribute_names() {
        let options = UpdateOptions::new().attribute("x><delete", 1).overwrite(true);
        let xml = add_xml(&[], &options);
        assert_eq!(xml, "<add overwrite=\"true\">\n\n</add>\n");
    }

    #[test]
    fn test_delete_xml() {
        assert_eq!(delete_by_id_xml("1_widget"), "<delete><id>1_widget</id></delete>");
        assert_eq!(
            delete_by_query_xml("price:[* TO 10] && instock:true"),
            "<delete><query>price:[* TO 10] &amp;&amp; instock:true</query></delete>"
        );
    }

    #[test]
    fn test_success_markers() {
        assert!(is_update_success(r#"<response><result status="0"></result></response>"#));
        assert!(is_update_success(
            r#"<?xml version="1.0"?><response><lst name="responseHeader"><int name="status">0</int><int name="QTime">3</int></lst></response>"#
        ));
        assert!(!is_update_success(
            r#"<response><lst name="responseHeader"><int name="status">400</int></lst></response>"#
        ));
        assert!(!is_update_success(""));
    }
}

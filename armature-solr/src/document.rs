//! Documents for the update handler.

use quick_xml::escape::escape;
use std::collections::BTreeMap;
use tracing::warn;

/// Per-field options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOptions {
    /// Wrap the value in a CDATA section instead of escaping it.
    pub cdata: bool,
    /// Extra XML attributes on the `<field>` element, such as `boost` or `update`.
    pub attributes: BTreeMap<String, String>,
}

impl FieldOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap the value in CDATA.
    pub fn cdata(mut self) -> Self {
        self.cdata = true;
        self
    }

    /// Add an XML attribute.
    ///
    /// Names that are not valid XML names are skipped when rendering.
    pub fn attribute(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.insert(name.into(), value.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Field {
    name: String,
    value: String,
    options: FieldOptions,
}

/// An index document: ordered field entries, repeated names allowed.
///
/// # Example
///
/// ```rust
/// use armature_solr::Document;
///
/// let doc = Document::new()
///     .add_field("id", 42)
///     .add_field("tag", "red")
///     .add_field("tag", "blue");
///
/// assert_eq!(
///     doc.to_xml(),
///     "<doc>\n<field name=\"id\">42</field>\n<field name=\"tag\">red</field>\n<field name=\"tag\">blue</field>\n</doc>"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    fields: Vec<Field>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field.
    pub fn add_field(self, name: impl Into<String>, value: impl ToString) -> Self {
        self.add_field_with(name, value, FieldOptions::default())
    }

    /// Add a field with options.
    pub fn add_field_with(
        mut self,
        name: impl Into<String>,
        value: impl ToString,
        options: FieldOptions,
    ) -> Self {
        self.fields.push(Field {
            name: name.into(),
            value: value.to_string(),
            options,
        });
        self
    }

    /// Number of field entries.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render the `<doc>` element.
    pub fn to_xml(&self) -> String {
        let mut xml = String::from("<doc>\n");
        for field in &self.fields {
            xml.push_str("<field name=\"");
            xml.push_str(&escape(field.name.as_str()));
            xml.push('"');
            for (name, value) in &field.options.attributes {
                if name == "name" {
                    continue;
                }
                push_attribute(&mut xml, name, value);
            }
            xml.push('>');
            if field.options.cdata {
                push_cdata(&mut xml, &field.value);
            } else {
                xml.push_str(&escape(field.value.as_str()));
            }
            xml.push_str("</field>\n");
        }
        xml.push_str("</doc>");
        xml
    }
}

/// Whether `name` can be written as an XML attribute name.
fn is_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
}

/// Append ` name="value"`, skipping names that would break the element.
pub(crate) fn push_attribute(xml: &mut String, name: &str, value: &str) {
    if !is_attribute_name(name) {
        warn!(attribute = name, "Skipping invalid XML attribute name");
        return;
    }
    xml.push(' ');
    xml.push_str(name);
    xml.push_str("=\"");
    xml.push_str(&escape(value));
    xml.push('"');
}

// A literal "]]>" would close the section early, so it is split across two.
fn push_cdata(xml: &mut String, value: &str) {
    xml.push_str("<![CDATA[");
    xml.push_str(&value.replace("]]>", "]]]]><![CDATA[>"));
    xml.push_str("]]>");
}

// Vector drawing produced by the renderer: the root <svg> element's
// attributes, in insertion order, plus its serialized children.

use indexmap::IndexMap;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drawing {
    attributes: IndexMap<String, String>,
    body: String,
}

impl Drawing {
    /// Empty `<svg>` with the SVG and XLink namespaces declared
    pub fn new() -> Self {
        let mut attributes = IndexMap::new();
        attributes.insert("xmlns".to_string(), SVG_NS.to_string());
        attributes.insert("xmlns:xlink".to_string(), XLINK_NS.to_string());
        Self {
            attributes,
            body: String::new(),
        }
    }

    /// Set a root attribute, replacing an existing value in place
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Append already-serialized child markup
    pub fn push(&mut self, markup: &str) {
        self.body.push_str(markup);
    }

    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(self.body.len() + 256);
        out.push_str("<svg");
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_xml(value));
            out.push('"');
        }
        out.push('>');
        out.push_str(&self.body);
        out.push_str("</svg>");
        out
    }
}

impl Default for Drawing {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape text for use inside a double-quoted XML attribute
pub fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

//! Parsed document node tree
//!
//! SCML projects arrive as an already-parsed hierarchy of elements with
//! string attributes. Nodes can be deserialized from JSON, where attribute
//! values may be written as strings, numbers or booleans:
//!
//! ```json
//! { "tag": "file", "attributes": { "id": 0, "name": "arm/arm-0.png" }, "children": [] }
//! ```

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// A single element of the parsed document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Element name
    pub tag: String,
    /// Attribute values, stored verbatim
    #[serde(default, deserialize_with = "deserialize_attributes")]
    pub attributes: BTreeMap<String, String>,
    /// Child elements in document order
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    /// Create an element without attributes or children
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Builder: set an attribute
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.insert(name.into(), value.to_string());
        self
    }

    /// Builder: append a child element
    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Deserialize a node tree from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Raw attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// First child with the given tag
    pub fn child(&self, tag: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// All children with the given tag, in document order
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// First child with the given tag, or a `MissingElement` error
    pub fn require_child(&self, tag: &str) -> Result<&Node> {
        self.child(tag)
            .ok_or_else(|| Error::missing_element(self.describe(), tag))
    }

    /// Parse an optional attribute
    pub fn parse_opt<T: FromStr>(&self, name: &str) -> Result<Option<T>> {
        match self.attr(name) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| Error::malformed(self.describe(), name, raw)),
        }
    }

    /// Parse an attribute, falling back to `default` when absent
    pub fn parse_or<T: FromStr>(&self, name: &str, default: T) -> Result<T> {
        Ok(self.parse_opt(name)?.unwrap_or(default))
    }

    /// Parse an attribute that has no default
    pub fn parse_required<T: FromStr>(&self, name: &str) -> Result<T> {
        self.parse_opt(name)?
            .ok_or_else(|| Error::missing_attribute(self.describe(), name))
    }

    /// Short description used in error messages, e.g. `<timeline id="3">`
    pub fn describe(&self) -> String {
        match (self.attr("id"), self.attr("name")) {
            (Some(id), Some(name)) => format!("<{} id=\"{id}\" name=\"{name}\">", self.tag),
            (Some(id), None) => format!("<{} id=\"{id}\">", self.tag),
            (None, Some(name)) => format!("<{} name=\"{name}\">", self.tag),
            (None, None) => format!("<{}>", self.tag),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAttribute {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

fn deserialize_attributes<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, RawAttribute>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(name, value)| {
            let text = match value {
                RawAttribute::Text(s) => s,
                RawAttribute::Number(n) => n.to_string(),
                RawAttribute::Flag(b) => b.to_string(),
            };
            (name, text)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults_and_values() {
        let node = Node::new("bone").with_attr("x", "12.5").with_attr("angle", 90);

        assert_eq!(node.parse_or("x", 0.0f32).unwrap(), 12.5);
        assert_eq!(node.parse_or("angle", 0.0f32).unwrap(), 90.0);
        assert_eq!(node.parse_or("scale_x", 1.0f32).unwrap(), 1.0);
        assert_eq!(node.parse_opt::<f32>("pivot_x").unwrap(), None);
    }

    #[test]
    fn test_malformed_attribute() {
        let node = Node::new("key").with_attr("id", 2).with_attr("time", "soon");
        let err = node.parse_or("time", 0u32).unwrap_err();

        match err {
            Error::MalformedAttribute {
                element,
                attribute,
                value,
            } => {
                assert_eq!(element, "<key id=\"2\">");
                assert_eq!(attribute, "time");
                assert_eq!(value, "soon");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_required_attribute() {
        let node = Node::new("file").with_attr("name", "a.png");
        assert!(matches!(
            node.parse_required::<u32>("width"),
            Err(Error::MissingAttribute { .. })
        ));
    }

    #[test]
    fn test_from_json_accepts_numbers_and_flags() {
        let node = Node::from_json(
            r#"{
                "tag": "animation",
                "attributes": { "name": "idle", "length": 1000, "looping": false },
                "children": [ { "tag": "mainline" } ]
            }"#,
        )
        .unwrap();

        assert_eq!(node.attr("length"), Some("1000"));
        assert_eq!(node.attr("looping"), Some("false"));
        assert!(node.child("mainline").is_some());
        assert!(node.require_child("timeline").is_err());
    }
}

//! Decoded response bodies.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Error, Result};

/// A response body after content-type dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// Structured data (JSON, YAML, MessagePack).
    Data(Value),
    /// Markup parsed into an element tree (XML, HTML).
    Document(Element),
    /// Body passed through unchanged (form and multipart payloads).
    Raw(Bytes),
}

impl Decoded {
    /// Structured data, if any.
    #[must_use]
    pub const fn as_data(&self) -> Option<&Value> {
        match self {
            Self::Data(value) => Some(value),
            _ => None,
        }
    }

    /// Consume into structured data, if any.
    #[must_use]
    pub fn into_data(self) -> Option<Value> {
        match self {
            Self::Data(value) => Some(value),
            _ => None,
        }
    }

    /// Document root, if any.
    #[must_use]
    pub const fn as_document(&self) -> Option<&Element> {
        match self {
            Self::Document(root) => Some(root),
            _ => None,
        }
    }

    /// Consume into the document root, if any.
    #[must_use]
    pub fn into_document(self) -> Option<Element> {
        match self {
            Self::Document(root) => Some(root),
            _ => None,
        }
    }

    /// Pass-through body, if any.
    #[must_use]
    pub const fn as_raw(&self) -> Option<&Bytes> {
        match self {
            Self::Raw(body) => Some(body),
            _ => None,
        }
    }

    /// Deserialize structured data into `T`.
    ///
    /// Errors carry the path of the offending field (e.g. `slideshow.slides`).
    ///
    /// # Example
    ///
    /// ```
    /// use webapi_core::Decoded;
    ///
    /// #[derive(serde::Deserialize)]
    /// struct Counter { a: u32 }
    ///
    /// let decoded = Decoded::Data(serde_json::json!({"a": 1}));
    /// let counter: Counter = decoded.deserialize().expect("deserialize");
    /// assert_eq!(counter.a, 1);
    /// ```
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            Self::Data(value) => serde_path_to_error::deserialize(value).map_err(|e| {
                Error::json_deserialization(e.path().to_string(), e.inner().to_string())
            }),
            Self::Document(root) => Err(Error::json_deserialization(
                "",
                format!("cannot deserialize a <{}> document", root.name()),
            )),
            Self::Raw(_) => Err(Error::json_deserialization(
                "",
                "cannot deserialize a pass-through body",
            )),
        }
    }
}

/// A node in a decoded XML or HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Nested element.
    Element(Element),
    /// Character data.
    Text(String),
}

/// An owned markup element: name, attributes in document order, children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Element without attributes or children.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add an attribute, builder style.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Append a child element.
    pub fn push_element(&mut self, child: Self) {
        self.children.push(Node::Element(child));
    }

    /// Append character data, merging with a preceding text node.
    pub fn push_text(&mut self, text: &str) {
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(Node::Text(text.to_owned()));
        }
    }

    /// Tag name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attributes in document order.
    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// All child nodes.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Direct children with the given tag name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> {
        self.elements().filter(move |element| element.name == name)
    }

    /// First direct child with the given tag name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.elements().find(|element| element.name == name)
    }

    /// First descendant (depth first, this element included) with the given tag name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Self> {
        if self.name == name {
            return Some(self);
        }
        self.elements().find_map(|element| element.find(name))
    }

    /// Concatenated text of all descendants.
    #[must_use]
    pub fn text(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }
}

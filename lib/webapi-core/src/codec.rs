//! Default body decoders.
//!
//! Each function adapts an external codec to the [`Decoder`](crate::Decoder)
//! shape. Codecs behind a disabled cargo feature still exist: they fail with
//! [`Error::MissingOptionalDependency`] naming the feature to enable.
//!
//! Empty bodies decode to [`Value::Null`] for the structured formats.

use bytes::Bytes;
use serde_json::Value;

use crate::{ContentType, Decoded, Error, Result};

/// Hand the body back untouched.
pub fn passthrough(body: &Bytes) -> Result<Decoded> {
    Ok(Decoded::Raw(body.clone()))
}

/// Decode a JSON body.
pub fn json(body: &Bytes) -> Result<Decoded> {
    if body.is_empty() {
        return Ok(Decoded::Data(Value::Null));
    }
    serde_json::from_slice(body)
        .map(Decoded::Data)
        .map_err(|e| Error::decode(ContentType::Json.as_str(), e.to_string()))
}

/// Decode a YAML body.
#[cfg(feature = "yaml")]
pub fn yaml(body: &Bytes) -> Result<Decoded> {
    if body.is_empty() {
        return Ok(Decoded::Data(Value::Null));
    }
    serde_yaml::from_slice(body)
        .map(Decoded::Data)
        .map_err(|e| Error::decode(ContentType::Yaml.as_str(), e.to_string()))
}

/// Decode a YAML body (unavailable: the `yaml` feature is disabled).
#[cfg(not(feature = "yaml"))]
pub fn yaml(_body: &Bytes) -> Result<Decoded> {
    Err(Error::missing_dependency("YAML", "yaml"))
}

/// Decode a MessagePack body.
#[cfg(feature = "msgpack")]
pub fn msgpack(body: &Bytes) -> Result<Decoded> {
    if body.is_empty() {
        return Ok(Decoded::Data(Value::Null));
    }
    rmp_serde::from_slice(body)
        .map(Decoded::Data)
        .map_err(|e| Error::decode(ContentType::MessagePack.as_str(), e.to_string()))
}

/// Decode a MessagePack body (unavailable: the `msgpack` feature is disabled).
#[cfg(not(feature = "msgpack"))]
pub fn msgpack(_body: &Bytes) -> Result<Decoded> {
    Err(Error::missing_dependency("MessagePack", "msgpack"))
}

/// Parse an XML body into an element tree.
#[cfg(feature = "xml")]
pub fn xml(body: &Bytes) -> Result<Decoded> {
    xml_tree::parse(body).map(Decoded::Document)
}

/// Parse an XML body (unavailable: the `xml` feature is disabled).
#[cfg(not(feature = "xml"))]
pub fn xml(_body: &Bytes) -> Result<Decoded> {
    Err(Error::missing_dependency("XML", "xml"))
}

/// Parse an HTML body into an element tree rooted at `<html>`.
#[cfg(feature = "html")]
pub fn html(body: &Bytes) -> Result<Decoded> {
    let text = String::from_utf8_lossy(body);
    let document = scraper::Html::parse_document(&text);
    Ok(Decoded::Document(html_tree::convert(document.root_element())))
}

/// Parse an HTML body (unavailable: the `html` feature is disabled).
#[cfg(not(feature = "html"))]
pub fn html(_body: &Bytes) -> Result<Decoded> {
    Err(Error::missing_dependency("HTML", "html"))
}

#[cfg(feature = "xml")]
mod xml_tree {
    use std::borrow::Cow;

    use quick_xml::events::{BytesStart, Event};
    use quick_xml::reader::Reader;

    use crate::{ContentType, Element, Error, Result};

    fn error(message: impl std::fmt::Display) -> Error {
        Error::decode(ContentType::Xml.as_str(), message.to_string())
    }

    fn utf8(bytes: &[u8]) -> Result<&str> {
        std::str::from_utf8(bytes).map_err(error)
    }

    fn element(start: &BytesStart<'_>) -> Result<Element> {
        let mut element = Element::new(utf8(start.name().as_ref())?);
        for attribute in start.attributes() {
            let attribute = attribute.map_err(error)?;
            let raw = utf8(&attribute.value)?;
            let value = quick_xml::escape::unescape(raw).map_err(error)?;
            element = element.with_attribute(utf8(attribute.key.as_ref())?, value);
        }
        Ok(element)
    }

    fn close(stack: &mut Vec<Element>, root: &mut Option<Element>, element: Element) -> Result<()> {
        match stack.last_mut() {
            Some(parent) => parent.push_element(element),
            None if root.is_none() => *root = Some(element),
            None => return Err(error("multiple root elements")),
        }
        Ok(())
    }

    // Indentation between tags is not kept.
    fn push_text(stack: &mut [Element], text: &str) {
        if text.trim().is_empty() {
            return;
        }
        if let Some(parent) = stack.last_mut() {
            parent.push_text(text);
        }
    }

    pub(super) fn parse(body: &[u8]) -> Result<Element> {
        let mut reader = Reader::from_reader(body);
        let mut stack: Vec<Element> = Vec::new();
        let mut root = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf).map_err(error)? {
                Event::Start(start) => stack.push(element(&start)?),
                Event::Empty(start) => {
                    let leaf = element(&start)?;
                    close(&mut stack, &mut root, leaf)?;
                }
                Event::End(_) => {
                    let done = stack.pop().ok_or_else(|| error("unbalanced end tag"))?;
                    close(&mut stack, &mut root, done)?;
                }
                Event::Text(text) => push_text(&mut stack, utf8(&text)?),
                Event::CData(data) => push_text(&mut stack, utf8(&data)?),
                Event::GeneralRef(reference) => {
                    let resolved = match reference.resolve_char_ref().map_err(error)? {
                        Some(ch) => Cow::Owned(ch.to_string()),
                        None => {
                            let name = utf8(&reference)?;
                            let entity = quick_xml::escape::resolve_predefined_entity(name)
                                .ok_or_else(|| error(format!("unknown entity &{name};")))?;
                            Cow::Borrowed(entity)
                        }
                    };
                    if let Some(parent) = stack.last_mut() {
                        parent.push_text(&resolved);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(error("unexpected end of document"));
        }
        root.ok_or_else(|| error("document has no root element"))
    }
}

#[cfg(feature = "html")]
mod html_tree {
    use scraper::{ElementRef, Node as HtmlNode};

    use crate::Element;

    pub(super) fn convert(source: ElementRef<'_>) -> Element {
        let value = source.value();
        let mut element = value
            .attrs()
            .fold(Element::new(value.name()), |element, (name, attr)| {
                element.with_attribute(name, attr)
            });

        for child in source.children() {
            match child.value() {
                HtmlNode::Text(text) => element.push_text(text),
                HtmlNode::Element(_) => {
                    if let Some(nested) = ElementRef::wrap(child) {
                        element.push_element(convert(nested));
                    }
                }
                _ => {}
            }
        }
        element
    }
}

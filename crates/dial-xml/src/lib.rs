//! Parse widget definition XML into an immutable element tree using quick-xml.
//!
//! Dial definitions are stored as XML fragments (`*.dial.xml`). The consumers
//! in `dial-core` only ever read the tree, so the whole document is
//! materialised once into owned [`Element`] values and every lookup is a pure
//! function over that tree.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("xml: {0}")]
    Xml(String),
    #[error("malformed document: {0}")]
    Malformed(&'static str),
}

/// A single XML element: name, attributes, trimmed text content, and child
/// elements in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Tag name of this element.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of the named attribute, if present and non-empty.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.is_empty())
    }

    /// Concatenated, whitespace-trimmed text content of this element.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// First direct child with the given tag name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All direct children with the given tag name, in document order.
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Text content of the first direct child with the given tag name.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(Element::text)
    }

    /// First element with the given tag name in this subtree (self included),
    /// depth-first in document order.
    pub fn descendant(&self, name: &str) -> Option<&Element> {
        if self.name == name {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.descendant(name))
    }
}

/// Parse an XML document into its root [`Element`].
pub fn parse_document(xml: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(start)) => {
                stack.push(element_from_start(&start)?);
            }
            Ok(Event::Empty(start)) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or(XmlError::Malformed("closing tag without opener"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(text)) => {
                if let Some(parent) = stack.last_mut() {
                    let unescaped = text.unescape().map_err(|err| XmlError::Xml(err.to_string()))?;
                    push_text(&mut parent.text, &unescaped);
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(parent) = stack.last_mut() {
                    let raw = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    push_text(&mut parent.text, &raw);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(XmlError::Xml(err.to_string())),
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(XmlError::Malformed("unclosed element"));
    }
    let root = root.ok_or(XmlError::Malformed("document has no root element"))?;
    debug!(root = %root.name, "parsed document");
    Ok(root)
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, XmlError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|err| XmlError::Xml(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| XmlError::Xml(err.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        text: String::new(),
        children: Vec::new(),
    })
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        Ok(())
    } else if root.is_none() {
        *root = Some(element);
        Ok(())
    } else {
        Err(XmlError::Malformed("multiple root elements"))
    }
}

fn push_text(target: &mut String, segment: &str) {
    let trimmed = segment.trim();
    if trimmed.is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(trimmed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_nested_document() {
        let xml = r#"
            <dial>
                <units>mph</units>
                <intervals>
                    <interval><label>low</label></interval>
                    <interval><label>high</label></interval>
                </intervals>
            </dial>
        "#;
        let root = parse_document(xml).expect("parse");
        assert_eq!(root.name(), "dial");
        assert_eq!(root.child_text("units"), Some("mph"));
        let container = root.child("intervals").expect("intervals");
        let labels: Vec<&str> = container
            .children("interval")
            .map(|node| node.child_text("label").unwrap())
            .collect();
        assert_eq!(labels, ["low", "high"]);
    }

    #[test]
    fn attributes_and_empty_elements() {
        let xml = r#"<dial><chart-background type="gradient"/><plot-background type=""/></dial>"#;
        let root = parse_document(xml).expect("parse");
        let background = root.child("chart-background").expect("background");
        assert_eq!(background.attribute("type"), Some("gradient"));
        assert_eq!(background.attribute("missing"), None);
        // empty attribute values read as absent
        assert_eq!(root.child("plot-background").unwrap().attribute("type"), None);
    }

    #[test]
    fn text_is_trimmed_and_entities_unescaped() {
        let xml = "<dial><units>\n   miles &amp; hours \n</units><empty></empty></dial>";
        let root = parse_document(xml).expect("parse");
        assert_eq!(root.child_text("units"), Some("miles & hours"));
        assert_eq!(root.child_text("empty"), Some(""));
        assert_eq!(root.child_text("absent"), None);
    }

    #[test]
    fn descendant_finds_nested_dial() {
        let xml = "<report><charts><dial><units>%</units></dial></charts></report>";
        let root = parse_document(xml).expect("parse");
        let dial = root.descendant("dial").expect("dial subtree");
        assert_eq!(dial.child_text("units"), Some("%"));
        assert!(root.descendant("gauge").is_none());
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert!(parse_document("<dial><units>mph</dial>").is_err());
        assert!(parse_document("").is_err());
        assert!(parse_document("<a/><b/>").is_err());
    }
}

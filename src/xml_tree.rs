// Owned XML element tree with ElementTree-style path lookups
use quick_xml::escape::{resolve_xml_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use quick_xml::Decoder;
use thiserror::Error;

// Error types for XML parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XmlError {
    #[error("XML syntax error: {0}")]
    Syntax(String),

    #[error("Document has no root element")]
    NoRoot,

    #[error("Unexpected content outside the root element")]
    ContentOutsideRoot,

    #[error("Element <{0}> is never closed")]
    Unclosed(String),

    #[error("Unknown entity reference &{0};")]
    UnknownEntity(String),
}

/// A single parsed element: name, attributes, the character data preceding
/// its first child, and child elements in document order. Text after a
/// child's closing tag is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// Character data of this element with surrounding whitespace removed.
    /// Elements without any non-whitespace text yield `None`.
    pub fn text(&self) -> Option<&str> {
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All elements matching a `/`-separated path relative to this element,
    /// in document order. `*` matches any child and `.` the current element.
    pub fn find_all(&self, path: &str) -> Vec<&XmlElement> {
        if path.is_empty() {
            return Vec::new();
        }

        let mut current = vec![self];
        for step in path.split('/') {
            current = match step {
                "." => current,
                "*" => current.iter().flat_map(|e| e.children.iter()).collect(),
                name => current
                    .iter()
                    .flat_map(|e| e.children.iter())
                    .filter(|child| child.name == name)
                    .collect(),
            };
            if current.is_empty() {
                break;
            }
        }
        current
    }

    /// First element matching `path`, if any.
    pub fn find(&self, path: &str) -> Option<&XmlElement> {
        self.find_all(path).into_iter().next()
    }

    /// Text of the first element matching `path`.
    pub fn find_text(&self, path: &str) -> Option<&str> {
        self.find(path).and_then(XmlElement::text)
    }
}

/// Parse a complete document and return its root element.
pub fn parse(xml: &str) -> Result<XmlElement, XmlError> {
    let mut reader = Reader::from_str(xml);
    let decoder = reader.decoder();

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            XmlError::Syntax(format!("at position {}: {}", reader.error_position(), e))
        })?;

        match event {
            Event::Start(e) => {
                if root.is_some() {
                    return Err(XmlError::ContentOutsideRoot);
                }
                stack.push(element_from(&e, decoder)?);
            }
            Event::Empty(e) => {
                if root.is_some() {
                    return Err(XmlError::ContentOutsideRoot);
                }
                let element = element_from(&e, decoder)?;
                close_element(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| {
                    XmlError::Syntax("closing tag without matching opening tag".to_string())
                })?;
                close_element(&mut stack, &mut root, element);
            }
            Event::Text(e) => {
                let raw = decode(decoder, &e)?;
                let text = unescape(&raw).map_err(|e| XmlError::Syntax(e.to_string()))?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(e) => {
                let text = decode(decoder, &e)?;
                push_text(&mut stack, &text)?;
            }
            Event::GeneralRef(e) => {
                let name = decode(decoder, &e)?;
                let resolved = resolve_reference(&name)?;
                push_text(&mut stack, &resolved)?;
            }
            Event::Eof => {
                if let Some(open) = stack.last() {
                    return Err(XmlError::Unclosed(open.name.clone()));
                }
                break;
            }
            // Declarations, comments, processing instructions and doctypes
            _ => (),
        }
    }

    root.ok_or(XmlError::NoRoot)
}

fn decode(decoder: Decoder, bytes: &[u8]) -> Result<String, XmlError> {
    decoder
        .decode(bytes)
        .map(|s| s.into_owned())
        .map_err(|e| XmlError::Syntax(e.to_string()))
}

fn element_from(start: &BytesStart<'_>, decoder: Decoder) -> Result<XmlElement, XmlError> {
    let name = decode(decoder, start.name().as_ref())?;

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| XmlError::Syntax(e.to_string()))?;
        let key = decode(decoder, attr.key.as_ref())?;
        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(|e| XmlError::Syntax(e.to_string()))?;
        attributes.push((key, value.into_owned()));
    }

    Ok(XmlElement {
        name,
        attributes,
        text: String::new(),
        children: Vec::new(),
    })
}

fn close_element(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn push_text(stack: &mut [XmlElement], text: &str) -> Result<(), XmlError> {
    match stack.last_mut() {
        // Only text ahead of the first child belongs to the element
        Some(current) => {
            if current.children.is_empty() {
                current.text.push_str(text);
            }
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(XmlError::ContentOutsideRoot),
    }
}

fn resolve_reference(name: &str) -> Result<String, XmlError> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => number.parse(),
        };
        return code
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .ok_or_else(|| XmlError::UnknownEntity(name.to_string()));
    }

    resolve_xml_entity(name)
        .map(str::to_string)
        .ok_or_else(|| XmlError::UnknownEntity(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const DOCUMENT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Search:results xmlns:Search="http://example.com/search">
  <message>
    <text>Request successfully processed</text>
    <code>0</code>
  </message>
  <response>
    <result><id>1</id><price currency="USD">100</price></result>
    <result><id>2</id><price currency="EUR">200</price></result>
  </response>
</Search:results>
"#;

    #[test]
    fn test_parse_root_and_children() {
        let root = parse(DOCUMENT).unwrap();

        assert_eq!(root.name(), "Search:results");
        assert_eq!(root.children().len(), 2);
        assert_eq!(root.find_text("message/code"), Some("0"));
        assert_eq!(
            root.find_text("message/text"),
            Some("Request successfully processed")
        );
    }

    #[test]
    fn test_find_returns_first_match() {
        let root = parse(DOCUMENT).unwrap();

        assert_eq!(root.find_text("response/result/id"), Some("1"));
        assert_eq!(root.find_all("response/result").len(), 2);
        assert_eq!(root.find_all("response/*/price").len(), 2);
        assert_eq!(root.find_text("./message/code"), Some("0"));
    }

    #[test]
    fn test_attributes() {
        let root = parse(DOCUMENT).unwrap();
        let price = root.find("response/result/price").unwrap();

        assert_eq!(price.attribute("currency"), Some("USD"));
        assert_eq!(price.attribute("missing"), None);
        assert_eq!(
            root.attribute("xmlns:Search"),
            Some("http://example.com/search")
        );
    }

    #[test_case("response/result/missing"; "missing leaf")]
    #[test_case("nowhere/code"; "missing branch")]
    #[test_case(""; "empty path")]
    fn test_unresolved_paths(path: &str) {
        let root = parse(DOCUMENT).unwrap();
        assert!(root.find(path).is_none());
        assert!(root.find_text(path).is_none());
    }

    #[test]
    fn test_empty_element_has_no_text() {
        let root = parse("<a><b/><c></c><d>  </d></a>").unwrap();

        assert!(root.find("b").is_some());
        assert_eq!(root.find_text("b"), None);
        assert_eq!(root.find_text("c"), None);
        assert_eq!(root.find_text("d"), None);
    }

    #[test]
    fn test_text_stops_at_first_child() {
        let root = parse("<a>x<b>inner</b>y<c/>z</a>").unwrap();

        assert_eq!(root.text(), Some("x"));
        assert_eq!(root.find_text("b"), Some("inner"));

        let nested = parse("<a><b>inner</b>tail</a>").unwrap();
        assert_eq!(nested.text(), None);
    }

    #[test]
    fn test_entities_and_cdata() {
        let root = parse(
            r#"<a note="x &amp; y"><b>Tom &amp; Jerry &#65;&#x42;</b><c><![CDATA[<raw>]]></c></a>"#,
        )
        .unwrap();

        assert_eq!(root.attribute("note"), Some("x & y"));
        assert_eq!(root.find_text("b"), Some("Tom & Jerry AB"));
        assert_eq!(root.find_text("c"), Some("<raw>"));
    }

    #[test_case(""; "empty body")]
    #[test_case("Service Temporarily Unavailable"; "plain text")]
    #[test_case("<a><b></a>"; "mismatched end tag")]
    #[test_case("<a><b>"; "unclosed elements")]
    #[test_case("<a/><b/>"; "two roots")]
    #[test_case("<a>&bogus;</a>"; "unknown entity")]
    fn test_malformed_documents(xml: &str) {
        assert!(parse(xml).is_err(), "expected {:?} to be rejected", xml);
    }

    #[test]
    fn test_unclosed_document_is_rejected() {
        // The reader may flag the missing end tag itself before Eof
        let err = parse("<root><open>").unwrap_err();
        assert!(
            matches!(err, XmlError::Unclosed(ref name) if name == "open")
                || matches!(err, XmlError::Syntax(_)),
            "unexpected error: {:?}",
            err
        );
    }
}

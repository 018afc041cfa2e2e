//! AR2005 document reader.
//!
//! Reading happens in two steps. `quick-xml` events are first folded into an
//! owned [`XmlElement`] tree, then the tree is bound to a schema type through
//! its [`XmlBinding`] implementation, which checks element names,
//! cardinality and vocabularies.
//!
//! # Example
//!
//! ```rust
//! use ar2005::objects::SignatureType;
//! use ar2005::reader::parse_str;
//!
//! let xml = r#"<signatures xmlns="http://www.oscarmcmaster.org/AR2005">
//!   <signature>Dr. A. Smith</signature>
//!   <date>2024-03-01</date>
//! </signatures>"#;
//!
//! let sig: SignatureType = parse_str(xml).unwrap();
//! assert_eq!(sig.signature(), Some("Dr. A. Smith"));
//! assert!(!sig.is_set_signature2());
//! ```

use crate::binding::{parse_boolean, XmlBinding};
use crate::error::{Error, Result};
use crate::objects::{XMLNS_AR2005, XMLNS_XSI};
use quick_xml::events::BytesStart;
use quick_xml::events::Event as XmlEvent;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str;
use tracing::debug;
use url::Url;

/// An owned XML element: the node type the bindings read from.
///
/// Names are stored as local names, with the namespace each one resolved to
/// kept alongside. `xsi:nil` is resolved against the XML Schema instance
/// namespace while reading, whatever prefix the document binds to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XmlElement {
    /// Local element name
    pub name: String,
    /// Namespace URI the element name resolved to, if any
    pub namespace: Option<String>,
    /// Attributes as (qualified key, unescaped value)
    pub attributes: Vec<(String, String)>,
    /// Element carries `xsi:nil="true"`
    pub nil: bool,
    /// Concatenated, trimmed text content
    pub text: String,
    /// Child elements in document order
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Creates an empty element with the given local name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates an element holding only text.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Creates an element marked `xsi:nil="true"`.
    pub fn new_nil(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nil: true,
            ..Self::default()
        }
    }

    /// Appends a child element, returning `self` for chaining.
    pub fn push_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Parses an XML string into an element tree.
    pub fn parse_str(xml: &str) -> Result<Self> {
        Self::from_reader(xml.as_bytes())
    }

    /// Reads a complete element tree from a buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut reader = NsReader::from_reader(reader);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::with_capacity(4096);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            buf.clear();
            match reader.read_event_into(&mut buf)? {
                XmlEvent::Start(ref e) => {
                    stack.push(Self::from_start(&reader, e)?);
                }
                XmlEvent::Empty(ref e) => {
                    let element = Self::from_start(&reader, e)?;
                    Self::attach(&mut stack, &mut root, element)?;
                }
                XmlEvent::End(_) => {
                    let element = stack.pop().ok_or_else(|| {
                        Error::MalformedDocument("closing tag without opening tag".to_string())
                    })?;
                    Self::attach(&mut stack, &mut root, element)?;
                }
                XmlEvent::Text(ref e) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&e.unescape()?);
                    }
                }
                XmlEvent::CData(ref e) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(str::from_utf8(e.as_ref())?);
                    }
                }
                XmlEvent::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(Error::MalformedDocument(format!(
                "document ended inside <{}>",
                open.name
            )));
        }

        root.ok_or(Error::EmptyDocument)
    }

    /// Builds an element (without children) from a start tag, resolving its
    /// namespace and `xsi:nil` against the declarations in scope.
    fn from_start<R>(reader: &NsReader<R>, e: &BytesStart<'_>) -> Result<Self> {
        let (resolved, local_name) = reader.resolve_element(e.name());
        let name = str::from_utf8(local_name.as_ref())?.to_string();
        let namespace = match resolved {
            ResolveResult::Bound(Namespace(uri)) => Some(str::from_utf8(uri)?.to_string()),
            ResolveResult::Unbound => None,
            ResolveResult::Unknown(prefix) => {
                return Err(Error::MalformedDocument(format!(
                    "undeclared namespace prefix {:?} on <{}>",
                    String::from_utf8_lossy(&prefix),
                    name
                )));
            }
        };

        let mut attributes = Vec::new();
        let mut nil = false;
        for attr in e.attributes() {
            let attr = attr?;
            let key = str::from_utf8(attr.key.as_ref())?.to_string();
            let value = attr.unescape_value()?.to_string();
            if let (ResolveResult::Bound(Namespace(uri)), local) = reader.resolve_attribute(attr.key)
            {
                if uri == XMLNS_XSI.as_bytes() && local.as_ref() == b"nil" {
                    nil = parse_boolean(&format!("{}/@{}", name, key), &value)?;
                }
            }
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            namespace,
            attributes,
            nil,
            ..Self::default()
        })
    }

    /// Attaches a finished element to its parent, or makes it the root.
    fn attach(
        stack: &mut [XmlElement],
        root: &mut Option<XmlElement>,
        element: XmlElement,
    ) -> Result<()> {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(element);
        } else if root.is_none() {
            *root = Some(element);
        } else {
            return Err(Error::MalformedDocument(format!(
                "second root element <{}>",
                element.name
            )));
        }
        Ok(())
    }

    /// Returns an attribute value by qualified key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if the element carries `xsi:nil="true"`.
    pub fn is_nil(&self) -> bool {
        self.nil
    }

    /// Returns the first child with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Iterates over all children with the given local name.
    pub fn children_named<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'n
    where
        'a: 'n,
    {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Returns the element's text content.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Rejects any element in the tree bound to a namespace other than AR2005.
fn check_namespaces(element: &XmlElement) -> Result<()> {
    if let Some(ns) = element.namespace.as_deref() {
        if ns != XMLNS_AR2005 {
            return Err(Error::UnexpectedNamespace(format!(
                "{} on <{}>",
                ns, element.name
            )));
        }
    }
    element.children.iter().try_for_each(check_namespaces)
}

/// Binds an already-parsed element tree to a schema type.
///
/// The root's own name is not constrained, but every element in the tree
/// must be in the AR2005 namespace or in no namespace at all.
pub fn parse_element<T: XmlBinding>(root: &XmlElement) -> Result<T> {
    check_namespaces(root)?;
    if root.name != T::ROOT_ELEMENT {
        debug!(
            root = %root.name,
            expected = T::ROOT_ELEMENT,
            "binding document with non-default root element"
        );
    }
    T::from_element(root)
}

/// Parses a document of type `T` from a buffered reader.
pub fn parse<T: XmlBinding, R: BufRead>(reader: R) -> Result<T> {
    let root = XmlElement::from_reader(reader)?;
    debug!(root = %root.name, children = root.children.len(), "parsed element tree");
    parse_element(&root)
}

/// Parses a document of type `T` from a byte stream.
pub fn parse_stream<T: XmlBinding, R: Read>(stream: R) -> Result<T> {
    parse(BufReader::new(stream))
}

/// Parses a document of type `T` from a string.
pub fn parse_str<T: XmlBinding>(xml: &str) -> Result<T> {
    parse(xml.as_bytes())
}

/// Parses a document of type `T` from a file.
pub fn parse_file<T: XmlBinding, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    debug!(path = %path.display(), "opening AR2005 document");
    let file = File::open(path)?;
    parse(BufReader::new(file))
}

/// Parses a document of type `T` from a URL.
///
/// Only `file:` URLs are supported; any other scheme is reported as
/// [`Error::UnsupportedUrl`].
pub fn parse_url<T: XmlBinding>(url: &str) -> Result<T> {
    let url = Url::parse(url)?;
    if url.scheme() != "file" {
        return Err(Error::UnsupportedUrl(url.to_string()));
    }
    let path = url
        .to_file_path()
        .map_err(|()| Error::UnsupportedUrl(url.to_string()))?;
    parse_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::SignatureType;
    use std::io::{Cursor, Write};

    const SIGNATURE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<signatures xmlns="http://www.oscarmcmaster.org/AR2005">
  <signature>Dr. A. Smith</signature>
  <date>2024-03-01</date>
</signatures>"#;

    #[test]
    fn test_element_tree() {
        let root = XmlElement::parse_str(SIGNATURE_XML).unwrap();

        assert_eq!(root.name, "signatures");
        assert_eq!(root.namespace.as_deref(), Some(XMLNS_AR2005));
        assert_eq!(
            root.child("date").unwrap().namespace.as_deref(),
            Some(XMLNS_AR2005)
        );
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.child("signature").unwrap().text(), "Dr. A. Smith");
        assert_eq!(root.child("date").unwrap().text(), "2024-03-01");
        assert!(root.child("date2").is_none());
    }

    #[test]
    fn test_prefixed_names_and_nil() {
        let xml = r#"<ar:visit xmlns:ar="http://www.oscarmcmaster.org/AR2005"
            xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
            <ar:weight xsi:nil="true"/>
            <ar:bp>120/80</ar:bp>
        </ar:visit>"#;
        let root = XmlElement::parse_str(xml).unwrap();

        assert_eq!(root.name, "visit");
        assert_eq!(root.namespace.as_deref(), Some(XMLNS_AR2005));
        assert!(root.child("weight").unwrap().is_nil());
        assert!(!root.child("bp").unwrap().is_nil());
    }

    #[test]
    fn test_escaped_text_and_cdata() {
        let xml = "<c><a>Fish &amp; chips</a><b><![CDATA[<raw>]]></b></c>";
        let root = XmlElement::parse_str(xml).unwrap();

        assert_eq!(root.child("a").unwrap().text(), "Fish & chips");
        assert_eq!(root.child("b").unwrap().text(), "<raw>");
    }

    #[test]
    fn test_empty_document() {
        let err = XmlElement::parse_str("<?xml version=\"1.0\"?>").unwrap_err();
        assert!(matches!(err, Error::EmptyDocument));
    }

    #[test]
    fn test_unclosed_document() {
        let result = XmlElement::parse_str("<signatures><signature>x</signature>");
        assert!(result.is_err());
        assert!(!result.unwrap_err().is_transport());
    }

    #[test]
    fn test_mismatched_tags() {
        let result = XmlElement::parse_str("<a><b></a></b>");
        assert!(result.is_err());
    }

    #[test]
    fn test_foreign_namespace_rejected() {
        let xml = r#"<signatures xmlns="http://example.com/other">
  <signature>x</signature><date>2024-03-01</date>
</signatures>"#;
        let err = parse_str::<SignatureType>(xml).unwrap_err();
        assert!(matches!(err, Error::UnexpectedNamespace(_)));
    }

    #[test]
    fn test_prefixed_foreign_namespace_rejected() {
        let xml = r#"<x:signatures xmlns:x="http://example.com/other">
  <x:signature>a</x:signature><x:date>2024-03-01</x:date>
</x:signatures>"#;
        match parse_str::<SignatureType>(xml) {
            Err(Error::UnexpectedNamespace(detail)) => {
                assert!(detail.contains("http://example.com/other"));
                assert!(detail.contains("<signatures>"));
            }
            other => panic!("expected unexpected namespace, got {:?}", other),
        }
    }

    #[test]
    fn test_foreign_namespace_on_child_rejected() {
        let xml = r#"<signatures xmlns="http://www.oscarmcmaster.org/AR2005">
  <signature xmlns="http://example.com/other">a</signature>
  <date>2024-03-01</date>
</signatures>"#;
        match parse_str::<SignatureType>(xml) {
            Err(Error::UnexpectedNamespace(detail)) => assert!(detail.contains("<signature>")),
            other => panic!("expected unexpected namespace, got {:?}", other),
        }
    }

    #[test]
    fn test_unqualified_document_accepted() {
        let xml = "<signatures><signature>a</signature><date>2024-03-01</date></signatures>";
        let sig: SignatureType = parse_str(xml).unwrap();
        assert_eq!(sig.signature(), Some("a"));
    }

    #[test]
    fn test_undeclared_prefix_rejected() {
        let err = XmlElement::parse_str("<ar:signatures/>").unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));
    }

    #[test]
    fn test_nil_resolved_by_namespace() {
        let xml = r#"<visit xmlns:i="http://www.w3.org/2001/XMLSchema-instance"
            xmlns:foo="http://example.com/other">
            <weight i:nil="true"/>
            <bp foo:nil="true"/>
            <ga i:nil="0"/>
        </visit>"#;
        let root = XmlElement::parse_str(xml).unwrap();

        assert!(root.child("weight").unwrap().is_nil());
        assert!(!root.child("bp").unwrap().is_nil());
        assert!(!root.child("ga").unwrap().is_nil());
        assert_eq!(root.child("bp").unwrap().attribute("foo:nil"), Some("true"));
    }

    #[test]
    fn test_malformed_nil_value() {
        let xml = r#"<visit xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
            <weight xsi:nil="yes"/>
        </visit>"#;
        let err = XmlElement::parse_str(xml).unwrap_err();
        assert!(matches!(err, Error::InvalidValue { .. }));
    }

    #[test]
    fn test_parse_entry_points_agree() {
        let from_str: SignatureType = parse_str(SIGNATURE_XML).unwrap();
        let from_reader: SignatureType = parse(Cursor::new(SIGNATURE_XML)).unwrap();
        let from_stream: SignatureType = parse_stream(SIGNATURE_XML.as_bytes()).unwrap();
        let root = XmlElement::parse_str(SIGNATURE_XML).unwrap();
        let from_node: SignatureType = parse_element(&root).unwrap();

        assert_eq!(from_str, from_reader);
        assert_eq!(from_str, from_stream);
        assert_eq!(from_str, from_node);
    }

    #[test]
    fn test_parse_file_and_url() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SIGNATURE_XML.as_bytes()).unwrap();

        let from_file: SignatureType = parse_file(file.path()).unwrap();
        assert_eq!(from_file.signature(), Some("Dr. A. Smith"));

        let url = Url::from_file_path(file.path()).unwrap();
        let from_url: SignatureType = parse_url(url.as_str()).unwrap();
        assert_eq!(from_file, from_url);
    }

    #[test]
    fn test_transport_errors() {
        let err = parse_file::<SignatureType, _>("/nonexistent/ar2005.xml").unwrap_err();
        assert!(err.is_transport());

        let err = parse_url::<SignatureType>("https://example.com/ar2.xml").unwrap_err();
        assert!(matches!(err, Error::UnsupportedUrl(_)));
        assert!(err.is_transport());

        let err = parse_url::<SignatureType>("not a url").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }
}

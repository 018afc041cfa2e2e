//! Schema binding layer.
//!
//! [`XmlBinding`] is implemented by every AR2005 schema type. It plays the
//! role of a per-type factory: an empty value comes from `Default`, and the
//! provided methods parse a document from any source or serialize it back.
//!
//! [`Fields`] is the read-side helper each implementation uses to pull typed
//! values out of an [`XmlElement`] while enforcing the schema's cardinality
//! rules. Lexical parsing of the XSD simple types lives here too.

use crate::error::{Error, Result};
use crate::objects::Vocabulary;
use crate::reader::{self, XmlElement};
use crate::writer::{self, ElementWriter};
use chrono::{NaiveDate, NaiveDateTime};
use std::io::{BufRead, Read, Write};
use std::path::Path;

/// A value bound to an AR2005 schema type.
pub trait XmlBinding: Sized {
    /// Element name used when the value is written as a document root.
    const ROOT_ELEMENT: &'static str;

    /// Binds an element to this type, validating its content.
    fn from_element(element: &XmlElement) -> Result<Self>;

    /// Writes the element's content (children or text, not the element itself).
    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()>;

    /// Parses a document from a string.
    fn parse_str(xml: &str) -> Result<Self> {
        reader::parse_str(xml)
    }

    /// Parses a document from a buffered reader.
    fn parse_reader<R: BufRead>(reader: R) -> Result<Self> {
        reader::parse(reader)
    }

    /// Parses a document from a byte stream.
    fn parse_stream<R: Read>(stream: R) -> Result<Self> {
        reader::parse_stream(stream)
    }

    /// Parses a document from a file.
    fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        reader::parse_file(path)
    }

    /// Parses a document from a `file:` URL.
    fn parse_url(url: &str) -> Result<Self> {
        reader::parse_url(url)
    }

    /// Serializes the value as an indented document rooted at [`Self::ROOT_ELEMENT`].
    fn to_xml_string(&self) -> Result<String> {
        writer::to_string(self)
    }
}

// ============================================================================
// Simple type lexical forms
// ============================================================================

fn invalid(element: &str, value: &str, expected: &'static str) -> Error {
    Error::InvalidValue {
        element: element.to_string(),
        value: value.to_string(),
        expected,
    }
}

/// Parses an `xs:boolean` (`true`, `false`, `1`, `0`).
pub fn parse_boolean(element: &str, text: &str) -> Result<bool> {
    match text {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(invalid(element, text, "xs:boolean")),
    }
}

/// Parses an `xs:int`.
pub fn parse_int(element: &str, text: &str) -> Result<i32> {
    text.parse().map_err(|_| invalid(element, text, "xs:int"))
}

/// Parses an `xs:float`, including the `INF`, `-INF` and `NaN` literals.
pub fn parse_float(element: &str, text: &str) -> Result<f32> {
    match text {
        "INF" => Ok(f32::INFINITY),
        "-INF" => Ok(f32::NEG_INFINITY),
        "NaN" => Ok(f32::NAN),
        _ if text.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => {
            Err(invalid(element, text, "xs:float"))
        }
        _ => text.parse().map_err(|_| invalid(element, text, "xs:float")),
    }
}

/// Parses an `xs:date`. A trailing `Z` or `+hh:mm`/`-hh:mm` zone is accepted
/// and dropped.
pub fn parse_date(element: &str, text: &str) -> Result<NaiveDate> {
    let (date, zone) = match (text.get(..10), text.get(10..)) {
        (Some(date), Some(zone)) => (date, zone),
        _ => return Err(invalid(element, text, "xs:date")),
    };
    if !(zone.is_empty() || zone == "Z" || is_zone_offset(zone)) {
        return Err(invalid(element, text, "xs:date"));
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| invalid(element, text, "xs:date"))
}

fn is_zone_offset(zone: &str) -> bool {
    let bytes = zone.as_bytes();
    bytes.len() == 6
        && (bytes[0] == b'+' || bytes[0] == b'-')
        && bytes[1].is_ascii_digit()
        && bytes[2].is_ascii_digit()
        && bytes[3] == b':'
        && bytes[4].is_ascii_digit()
        && bytes[5].is_ascii_digit()
}

/// Parses an `xs:dateTime`. Fractional seconds are kept; a trailing zone is
/// accepted and dropped, as for [`parse_date`].
pub fn parse_date_time(element: &str, text: &str) -> Result<NaiveDateTime> {
    let local = if let Some(stripped) = text.strip_suffix('Z') {
        stripped
    } else {
        match text.len().checked_sub(6).and_then(|at| text.get(at..).map(|zone| (at, zone))) {
            Some((at, zone)) if text.len() > 19 && is_zone_offset(zone) => &text[..at],
            _ => text,
        }
    };
    NaiveDateTime::parse_from_str(local, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|_| invalid(element, text, "xs:dateTime"))
}

/// Formats an `xs:float` the way [`parse_float`] reads it.
pub fn format_float(value: f32) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f32::INFINITY {
        "INF".to_string()
    } else if value == f32::NEG_INFINITY {
        "-INF".to_string()
    } else {
        value.to_string()
    }
}

/// Formats an `xs:date` as `YYYY-MM-DD`.
pub fn format_date(value: NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

/// Formats an `xs:dateTime` without a zone, keeping any fractional seconds.
pub fn format_date_time(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

// ============================================================================
// Field access
// ============================================================================

/// Text of a simple-typed element, which must be non-nil and hold no child
/// elements.
pub fn simple_content<'e>(element: &'e XmlElement, path: &str) -> Result<&'e str> {
    if element.is_nil() {
        return Err(invalid(path, "xsi:nil", "non-nillable element"));
    }
    if let Some(child) = element.children.first() {
        return Err(Error::UnexpectedElement(format!("{}/{}", path, child.name)));
    }
    Ok(element.text())
}

/// Typed, cardinality-checked access to an element's children.
///
/// Children must follow `xs:sequence` order: each child's position in the
/// `allowed` list may repeat or advance but never go back.
pub struct Fields<'a> {
    element: &'a XmlElement,
}

impl<'a> Fields<'a> {
    /// Wraps an element, rejecting any child whose name is not in `allowed`,
    /// children out of sequence order, and stray text.
    pub fn new(element: &'a XmlElement, allowed: &[&str]) -> Result<Self> {
        if element.is_nil() {
            return Err(invalid(&element.name, "xsi:nil", "non-nillable element"));
        }
        if !element.text.is_empty() {
            return Err(invalid(&element.name, &element.text, "element-only content"));
        }

        let mut position = 0;
        for child in &element.children {
            let index = allowed
                .iter()
                .position(|name| *name == child.name)
                .ok_or_else(|| {
                    Error::UnexpectedElement(format!("{}/{}", element.name, child.name))
                })?;
            if index < position {
                return Err(Error::UnexpectedElement(format!(
                    "{}/{} (out of sequence, expected after {})",
                    element.name, child.name, allowed[position]
                )));
            }
            position = index;
        }
        Ok(Self { element })
    }

    fn path(&self, name: &str) -> String {
        format!("{}/{}", self.element.name, name)
    }

    /// Returns the single child `name`, if present.
    fn single(&self, name: &str) -> Result<Option<&'a XmlElement>> {
        let mut matches = self.element.children_named(name);
        let first = matches.next();
        if matches.next().is_some() {
            return Err(Error::UnexpectedElement(format!(
                "duplicate {}",
                self.path(name)
            )));
        }
        Ok(first)
    }

    fn required(&self, name: &str) -> Result<&'a XmlElement> {
        self.single(name)?
            .ok_or_else(|| Error::MissingField(self.path(name)))
    }

    fn required_text(&self, name: &str) -> Result<&'a str> {
        simple_content(self.required(name)?, &self.path(name))
    }

    fn optional_text(&self, name: &str) -> Result<Option<&'a str>> {
        self.single(name)?
            .map(|child| simple_content(child, &self.path(name)))
            .transpose()
    }

    /// Text of a required, nillable element; `None` when nil.
    fn nillable_text(&self, name: &str) -> Result<Option<&'a str>> {
        let child = self.required(name)?;
        if !child.is_nil() {
            return simple_content(child, &self.path(name)).map(Some);
        }
        if !child.text.is_empty() || !child.children.is_empty() {
            return Err(invalid(&self.path(name), &child.text, "empty content on nil element"));
        }
        Ok(None)
    }

    /// Required `xs:string` element.
    pub fn string(&self, name: &str) -> Result<String> {
        Ok(self.required_text(name)?.to_string())
    }

    /// Optional (`minOccurs="0"`) `xs:string` element.
    pub fn optional_string(&self, name: &str) -> Result<Option<String>> {
        Ok(self.optional_text(name)?.map(str::to_string))
    }

    /// Required `xs:boolean` element.
    pub fn boolean(&self, name: &str) -> Result<bool> {
        parse_boolean(&self.path(name), self.required_text(name)?)
    }

    /// Optional `xs:boolean` element.
    pub fn optional_boolean(&self, name: &str) -> Result<Option<bool>> {
        self.optional_text(name)?
            .map(|text| parse_boolean(&self.path(name), text))
            .transpose()
    }

    /// Required `xs:int` element.
    pub fn int(&self, name: &str) -> Result<i32> {
        parse_int(&self.path(name), self.required_text(name)?)
    }

    /// Required, nillable `xs:float` element; nil reads as `None`.
    pub fn nillable_float(&self, name: &str) -> Result<Option<f32>> {
        self.nillable_text(name)?
            .map(|text| parse_float(&self.path(name), text))
            .transpose()
    }

    /// Required `xs:date` element.
    pub fn date(&self, name: &str) -> Result<NaiveDate> {
        parse_date(&self.path(name), self.required_text(name)?)
    }

    /// Optional `xs:date` element.
    pub fn optional_date(&self, name: &str) -> Result<Option<NaiveDate>> {
        self.optional_text(name)?
            .map(|text| parse_date(&self.path(name), text))
            .transpose()
    }

    /// Required, nillable `xs:date` element; nil reads as `None`.
    pub fn nillable_date(&self, name: &str) -> Result<Option<NaiveDate>> {
        self.nillable_text(name)?
            .map(|text| parse_date(&self.path(name), text))
            .transpose()
    }

    /// Required `xs:dateTime` element.
    pub fn date_time(&self, name: &str) -> Result<NaiveDateTime> {
        parse_date_time(&self.path(name), self.required_text(name)?)
    }

    /// Required element restricted to a closed vocabulary.
    pub fn code<T: Vocabulary>(&self, name: &str) -> Result<T> {
        let text = self.required_text(name)?;
        T::for_string(text).ok_or_else(|| Error::InvalidEnumeration {
            element: self.path(name),
            value: text.to_string(),
        })
    }

    /// Required complex child.
    pub fn child<T: XmlBinding>(&self, name: &str) -> Result<T> {
        T::from_element(self.required(name)?)
    }

    /// Optional complex child.
    pub fn optional_child<T: XmlBinding>(&self, name: &str) -> Result<Option<T>> {
        self.single(name)?.map(T::from_element).transpose()
    }

    /// Repeated complex child, in document order.
    pub fn repeated<T: XmlBinding>(&self, name: &str) -> Result<Vec<T>> {
        self.element
            .children_named(name)
            .map(T::from_element)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_boolean() {
        assert!(parse_boolean("x", "true").unwrap());
        assert!(parse_boolean("x", "1").unwrap());
        assert!(!parse_boolean("x", "false").unwrap());
        assert!(!parse_boolean("x", "0").unwrap());
        assert!(parse_boolean("x", "TRUE").is_err());
        assert!(parse_boolean("x", "yes").is_err());
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float("x", "62.5").unwrap(), 62.5);
        assert_eq!(parse_float("x", "-1").unwrap(), -1.0);
        assert_eq!(parse_float("x", "1.5E2").unwrap(), 150.0);
        assert_eq!(parse_float("x", "INF").unwrap(), f32::INFINITY);
        assert!(parse_float("x", "NaN").unwrap().is_nan());
        assert!(parse_float("x", "inf").is_err());
        assert!(parse_float("x", "sixty").is_err());
        assert!(parse_float("x", "").is_err());
    }

    #[test]
    fn test_float_format_reads_back() {
        for value in [0.0f32, 62.5, 1.1, -3.25, 1.0e-7, f32::INFINITY, f32::NEG_INFINITY] {
            assert_eq!(parse_float("x", &format_float(value)).unwrap(), value);
        }
    }

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(parse_date("d", "2024-03-01").unwrap(), expected);
        assert_eq!(parse_date("d", "2024-03-01Z").unwrap(), expected);
        assert_eq!(parse_date("d", "2024-03-01-08:00").unwrap(), expected);
        assert_eq!(format_date(expected), "2024-03-01");

        assert!(parse_date("d", "2024-02-30").is_err());
        assert!(parse_date("d", "01/03/2024").is_err());
        assert!(parse_date("d", "2024-03-01T10:00:00").is_err());
        assert!(parse_date("d", "").is_err());
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("x", "3").unwrap(), 3);
        assert_eq!(parse_int("x", "-2").unwrap(), -2);
        assert!(parse_int("x", "3.0").is_err());
    }

    #[test]
    fn test_fields_cardinality() {
        let element = XmlElement::new("customLab")
            .push_child(XmlElement::with_text("label", "TSH"))
            .push_child(XmlElement::with_text("label", "Ferritin"));

        let fields = Fields::new(&element, &["label", "result"]).unwrap();
        assert!(matches!(fields.string("label"), Err(Error::UnexpectedElement(_))));
        match fields.string("result") {
            Err(Error::MissingField(path)) => assert_eq!(path, "customLab/result"),
            other => panic!("expected missing field, got {:?}", other),
        }

        let err = Fields::new(&element, &["result"]).err().unwrap();
        match err {
            Error::UnexpectedElement(path) => assert_eq!(path, "customLab/label"),
            other => panic!("expected unexpected element, got {:?}", other),
        }
    }

    #[test]
    fn test_fields_nil_handling() {
        let mut nil_with_text = XmlElement::new_nil("date");
        nil_with_text.text = "2024-03-01".to_string();

        let element = XmlElement::new("visit")
            .push_child(nil_with_text)
            .push_child(XmlElement::new_nil("weight"))
            .push_child(XmlElement::new_nil("bp"));
        let fields = Fields::new(&element, &["date", "weight", "bp"]).unwrap();

        assert_eq!(fields.nillable_float("weight").unwrap(), None);
        assert!(matches!(
            fields.string("bp"),
            Err(Error::InvalidValue { .. })
        ));
        assert!(matches!(
            fields.nillable_date("date"),
            Err(Error::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_simple_field_rejects_child_elements() {
        let element = XmlElement::new("signatures")
            .push_child(
                XmlElement::new("signature").push_child(XmlElement::with_text("evil", "Dr X")),
            )
            .push_child(XmlElement::with_text("date", "2024-01-01"));
        let fields = Fields::new(&element, &["signature", "date"]).unwrap();

        match fields.string("signature") {
            Err(Error::UnexpectedElement(path)) => assert_eq!(path, "signatures/signature/evil"),
            other => panic!("expected unexpected element, got {:?}", other),
        }
        assert!(fields.date("date").is_ok());
    }

    #[test]
    fn test_complex_element_rejects_text() {
        let element = XmlElement::with_text("signatures", "stray text")
            .push_child(XmlElement::with_text("signature", "a"));

        match Fields::new(&element, &["signature", "date"]) {
            Err(Error::InvalidValue { element, value, .. }) => {
                assert_eq!(element, "signatures");
                assert_eq!(value, "stray text");
            }
            other => panic!("expected invalid value, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_fields_sequence_order() {
        let in_order = XmlElement::new("obstetricalHistory")
            .push_child(XmlElement::new("year"))
            .push_child(XmlElement::new("sex"))
            .push_child(XmlElement::new("sex"))
            .push_child(XmlElement::new("comments"));
        assert!(Fields::new(&in_order, &["year", "sex", "gestAge", "comments"]).is_ok());

        let swapped = XmlElement::new("signatures")
            .push_child(XmlElement::with_text("date", "2024-01-01"))
            .push_child(XmlElement::with_text("signature", "a"));
        match Fields::new(&swapped, &["signature", "date"]) {
            Err(Error::UnexpectedElement(detail)) => {
                assert!(detail.starts_with("signatures/signature"))
            }
            other => panic!("expected unexpected element, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_parse_date_time() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(14, 30, 5)
            .unwrap();
        assert_eq!(parse_date_time("t", "2024-03-01T14:30:05").unwrap(), expected);
        assert_eq!(parse_date_time("t", "2024-03-01T14:30:05Z").unwrap(), expected);
        assert_eq!(
            parse_date_time("t", "2024-03-01T14:30:05-08:00").unwrap(),
            expected
        );
        assert_eq!(format_date_time(expected), "2024-03-01T14:30:05");

        let fractional = parse_date_time("t", "2024-03-01T14:30:05.25").unwrap();
        assert_eq!(parse_date_time("t", &format_date_time(fractional)).unwrap(), fractional);

        assert!(parse_date_time("t", "2024-03-01").is_err());
        assert!(parse_date_time("t", "2024-03-01 14:30:05").is_err());
        assert!(parse_date_time("t", "").is_err());
    }
}

//! AR2005 writer for serializing bound values to XML.
//!
//! The root element is written in the AR2005 namespace with the
//! `xsi` prefix declared, so nillable fields can be emitted as
//! `<weight xsi:nil="true"/>`.
//!
//! # Example
//!
//! ```rust
//! use ar2005::objects::{MedicalHistoryAndPhysicalExam, YesNoNullType};
//! use ar2005::writer::Ar2005Writer;
//!
//! let mut exam = MedicalHistoryAndPhysicalExam::new();
//! exam.add_new_family_history().at_risk = YesNoNullType::no();
//!
//! let writer = Ar2005Writer::new();
//! let xml = writer.write_to_string(&exam).unwrap();
//! assert!(xml.contains("<familyHistory>"));
//! ```

use crate::binding::{format_date, format_date_time, format_float, XmlBinding};
use crate::error::{Error, Result};
use crate::objects::{Vocabulary, XMLNS_AR2005, XMLNS_XSI};
use crate::reader::XmlElement;
use chrono::{NaiveDate, NaiveDateTime};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;
use tracing::debug;

/// Configuration options for the AR2005 writer.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Whether to indent the output for readability
    pub indent: bool,
    /// Byte repeated for each indentation level (default: space)
    pub indent_char: u8,
    /// Number of `indent_char` per level (default: 2)
    pub indent_size: usize,
    /// Whether to include the XML declaration
    pub xml_declaration: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            indent: true,
            indent_char: b' ',
            indent_size: 2,
            xml_declaration: true,
        }
    }
}

impl WriterConfig {
    /// Creates a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a compact configuration (no indentation).
    pub fn compact() -> Self {
        Self {
            indent: false,
            indent_size: 0,
            ..Self::default()
        }
    }

    /// Sets whether to indent the output.
    pub fn with_indent(mut self, indent: bool) -> Self {
        self.indent = indent;
        self
    }

    /// Sets the indentation unit, e.g. `(b'\t', 1)` for one tab per level.
    pub fn with_indent_unit(mut self, indent_char: u8, indent_size: usize) -> Self {
        self.indent_char = indent_char;
        self.indent_size = indent_size;
        self
    }

    /// Sets whether to emit the `<?xml ...?>` declaration.
    pub fn with_xml_declaration(mut self, declaration: bool) -> Self {
        self.xml_declaration = declaration;
        self
    }
}

/// Element-level writer handed to [`XmlBinding::write_content`].
///
/// Start tags are held back until the element's first piece of content, so
/// elements that end up empty are written as `<name/>`.
pub struct ElementWriter<'a, W: Write> {
    writer: &'a mut Writer<W>,
    pending: Option<BytesStart<'static>>,
    path: Vec<String>,
}

impl<'a, W: Write> ElementWriter<'a, W> {
    fn new(writer: &'a mut Writer<W>) -> Self {
        Self {
            writer,
            pending: None,
            path: Vec::new(),
        }
    }

    fn flush_pending(&mut self) -> Result<()> {
        if let Some(start) = self.pending.take() {
            self.writer.write_event(Event::Start(start))?;
        }
        Ok(())
    }

    fn open(&mut self, start: BytesStart<'static>, name: &str) -> Result<()> {
        self.flush_pending()?;
        self.pending = Some(start);
        self.path.push(name.to_string());
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<()> {
        self.path.pop();
        match self.pending.take() {
            Some(start) => self.writer.write_event(Event::Empty(start))?,
            None => self.writer.write_event(Event::End(BytesEnd::new(name)))?,
        }
        Ok(())
    }

    fn field_path(&self, name: &str) -> String {
        let mut path = self.path.join("/");
        path.push('/');
        path.push_str(name);
        path
    }

    /// Writes text content for the current (simple-typed) element.
    pub fn text_content(&mut self, value: &str) -> Result<()> {
        if value.is_empty() {
            return Ok(());
        }
        self.flush_pending()?;
        self.writer.write_event(Event::Text(BytesText::new(value)))?;
        Ok(())
    }

    /// Writes `<name>value</name>`, or `<name/>` for an empty value.
    pub fn string(&mut self, name: &str, value: &str) -> Result<()> {
        self.flush_pending()?;
        if value.is_empty() {
            self.writer.write_event(Event::Empty(BytesStart::new(name)))?;
        } else {
            self.writer.write_event(Event::Start(BytesStart::new(name)))?;
            self.writer.write_event(Event::Text(BytesText::new(value)))?;
            self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        Ok(())
    }

    /// Writes an optional string element; `None` is omitted.
    pub fn optional_string(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        match value {
            Some(v) => self.string(name, v),
            None => Ok(()),
        }
    }

    /// Writes a required string element that has not been populated yet as
    /// [`Error::MissingField`].
    pub fn required_string(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        match value {
            Some(v) => self.string(name, v),
            None => Err(Error::MissingField(self.field_path(name))),
        }
    }

    /// Writes an `xs:boolean` element.
    pub fn boolean(&mut self, name: &str, value: bool) -> Result<()> {
        self.string(name, if value { "true" } else { "false" })
    }

    /// Writes an optional `xs:boolean` element; `None` is omitted.
    pub fn optional_boolean(&mut self, name: &str, value: Option<bool>) -> Result<()> {
        match value {
            Some(v) => self.boolean(name, v),
            None => Ok(()),
        }
    }

    /// Writes an `xs:int` element.
    pub fn int(&mut self, name: &str, value: i32) -> Result<()> {
        self.string(name, &value.to_string())
    }

    /// Writes a nillable `xs:float` element; `None` becomes `xsi:nil`.
    pub fn nillable_float(&mut self, name: &str, value: Option<f32>) -> Result<()> {
        match value {
            Some(v) => self.string(name, &format_float(v)),
            None => self.nil(name),
        }
    }

    /// Writes an `xs:date` element.
    pub fn date(&mut self, name: &str, value: NaiveDate) -> Result<()> {
        self.string(name, &format_date(value))
    }

    /// Writes an optional `xs:date` element; `None` is omitted.
    pub fn optional_date(&mut self, name: &str, value: Option<NaiveDate>) -> Result<()> {
        match value {
            Some(v) => self.date(name, v),
            None => Ok(()),
        }
    }

    /// Writes a nillable `xs:date` element; `None` becomes `xsi:nil`.
    pub fn nillable_date(&mut self, name: &str, value: Option<NaiveDate>) -> Result<()> {
        match value {
            Some(v) => self.date(name, v),
            None => self.nil(name),
        }
    }

    /// Writes a required `xs:date` element that has not been populated yet
    /// as [`Error::MissingField`].
    pub fn required_date(&mut self, name: &str, value: Option<NaiveDate>) -> Result<()> {
        match value {
            Some(v) => self.date(name, v),
            None => Err(Error::MissingField(self.field_path(name))),
        }
    }

    /// Writes an `xs:dateTime` element.
    pub fn date_time(&mut self, name: &str, value: NaiveDateTime) -> Result<()> {
        self.string(name, &format_date_time(value))
    }

    /// Writes a required `xs:dateTime` element that has not been populated
    /// yet as [`Error::MissingField`].
    pub fn required_date_time(&mut self, name: &str, value: Option<NaiveDateTime>) -> Result<()> {
        match value {
            Some(v) => self.date_time(name, v),
            None => Err(Error::MissingField(self.field_path(name))),
        }
    }

    /// Writes a required vocabulary code; `None` is [`Error::MissingField`].
    pub fn code<T: Vocabulary>(&mut self, name: &str, value: Option<T>) -> Result<()> {
        match value {
            Some(v) => self.string(name, v.as_str()),
            None => Err(Error::MissingField(self.field_path(name))),
        }
    }

    /// Writes `<name xsi:nil="true"/>`.
    pub fn nil(&mut self, name: &str) -> Result<()> {
        self.flush_pending()?;
        let mut elem = BytesStart::new(name);
        elem.push_attribute(("xsi:nil", "true"));
        self.writer.write_event(Event::Empty(elem))?;
        Ok(())
    }

    /// Writes a complex child element.
    pub fn child<T: XmlBinding>(&mut self, name: &str, value: &T) -> Result<()> {
        self.open(BytesStart::new(name.to_string()), name)?;
        value.write_content(self)?;
        self.close(name)
    }

    /// Writes an optional complex child; `None` is omitted.
    pub fn optional_child<T: XmlBinding>(&mut self, name: &str, value: Option<&T>) -> Result<()> {
        match value {
            Some(v) => self.child(name, v),
            None => Ok(()),
        }
    }

    /// Writes an unbound element tree as `name`, keeping its text, children
    /// and nil flags. Attributes other than `xsi:nil` are not carried over.
    pub fn element(&mut self, name: &str, value: &XmlElement) -> Result<()> {
        if value.is_nil() {
            return self.nil(name);
        }
        self.open(BytesStart::new(name.to_string()), name)?;
        self.text_content(&value.text)?;
        for child in &value.children {
            self.element(&child.name, child)?;
        }
        self.close(name)
    }

    /// Writes one element per item, in order.
    pub fn repeated<T: XmlBinding>(&mut self, name: &str, values: &[T]) -> Result<()> {
        for value in values {
            self.child(name, value)?;
        }
        Ok(())
    }
}

/// AR2005 XML writer.
pub struct Ar2005Writer {
    config: WriterConfig,
}

impl Ar2005Writer {
    /// Creates a new writer with default configuration.
    pub fn new() -> Self {
        Self {
            config: WriterConfig::default(),
        }
    }

    /// Creates a new writer with the specified configuration.
    pub fn with_config(config: WriterConfig) -> Self {
        Self { config }
    }

    /// Writes a value to a string, rooted at its default element name.
    pub fn write_to_string<T: XmlBinding>(&self, value: &T) -> Result<String> {
        self.write_to_string_as(value, T::ROOT_ELEMENT)
    }

    /// Writes a value to a string under the given root element name.
    pub fn write_to_string_as<T: XmlBinding>(&self, value: &T, root: &str) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_as(value, root, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| Error::Utf8(e.utf8_error()))
    }

    /// Writes a value to any Write implementation.
    pub fn write<T: XmlBinding, W: Write>(&self, value: &T, writer: W) -> Result<()> {
        self.write_as(value, T::ROOT_ELEMENT, writer)
    }

    /// Writes a value to any Write implementation under the given root name.
    pub fn write_as<T: XmlBinding, W: Write>(&self, value: &T, root: &str, writer: W) -> Result<()> {
        let mut xml_writer = if self.config.indent {
            Writer::new_with_indent(writer, self.config.indent_char, self.config.indent_size)
        } else {
            Writer::new(writer)
        };

        if self.config.xml_declaration {
            xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
            if self.config.indent {
                xml_writer.get_mut().write_all(b"\n")?;
            }
        }

        let mut start = BytesStart::new(root.to_string());
        start.push_attribute(("xmlns", XMLNS_AR2005));
        start.push_attribute(("xmlns:xsi", XMLNS_XSI));

        let mut out = ElementWriter::new(&mut xml_writer);
        out.open(start, root)?;
        value.write_content(&mut out)?;
        out.close(root)?;

        debug!(root, "wrote AR2005 document");
        Ok(())
    }
}

impl Default for Ar2005Writer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to write a value to an indented string.
pub fn to_string<T: XmlBinding>(value: &T) -> Result<String> {
    Ar2005Writer::new().write_to_string(value)
}

/// Convenience function to write a value to a string without indentation.
pub fn to_string_compact<T: XmlBinding>(value: &T) -> Result<String> {
    Ar2005Writer::with_config(WriterConfig::compact()).write_to_string(value)
}

/// Convenience function to write a value to a writer.
pub fn write<T: XmlBinding, W: Write>(value: &T, writer: W) -> Result<()> {
    Ar2005Writer::new().write(value, writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{
        CustomLab, EthnicValueType, MedicalHistoryAndPhysicalExam, SignatureType,
        SubsequentVisitItemType, YesNoNullType,
    };

    #[test]
    fn test_write_signature() {
        let mut sig = SignatureType::new();
        sig.set_signature("Dr. A. Smith");
        sig.set_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        let xml = to_string(&sig).unwrap();

        assert!(xml.contains("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<signatures xmlns=\"http://www.oscarmcmaster.org/AR2005\""));
        assert!(xml.contains("<signature>Dr. A. Smith</signature>"));
        assert!(xml.contains("<date>2024-03-01</date>"));
        assert!(!xml.contains("signature2"));
        assert!(xml.contains("</signatures>"));
    }

    #[test]
    fn test_write_escapes_text() {
        let lab = CustomLab::new("Fe & <TIBC>", "low");
        let xml = to_string_compact(&lab).unwrap();

        assert!(xml.contains("<label>Fe &amp; &lt;TIBC&gt;</label>"));
    }

    #[test]
    fn test_write_compact() {
        let mut exam = MedicalHistoryAndPhysicalExam::new();
        exam.add_new_family_history().at_risk = YesNoNullType::yes();

        let xml = to_string_compact(&exam).unwrap();

        let content_start = xml.find("<medicalHistoryAndPhysicalExam").unwrap();
        assert!(!xml[content_start..].contains('\n'));
        assert!(xml.contains("<familyHistory><atRisk><yes>true</yes></atRisk></familyHistory>"));
    }

    #[test]
    fn test_empty_elements_collapse() {
        let exam = MedicalHistoryAndPhysicalExam::new();
        let xml = to_string_compact(&exam).unwrap();

        assert!(xml.ends_with("xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\"/>"));
    }

    #[test]
    fn test_write_nil() {
        let visit = SubsequentVisitItemType::new();
        let xml = to_string_compact(&visit).unwrap();

        assert!(xml.contains("<date xsi:nil=\"true\"/>"));
        assert!(xml.contains("<weight xsi:nil=\"true\"/>"));
        assert!(xml.contains("<ga/>"));
    }

    #[test]
    fn test_missing_required_field() {
        let mut sig = SignatureType::new();
        assert!(matches!(to_string(&sig), Err(Error::MissingField(_))));

        sig.set_signature("Dr. A. Smith");
        match to_string(&sig) {
            Err(Error::MissingField(path)) => assert_eq!(path, "signatures/date"),
            other => panic!("expected missing field, got {:?}", other),
        }
    }

    #[test]
    fn test_write_as_custom_root() {
        let xml = Ar2005Writer::with_config(WriterConfig::compact().with_xml_declaration(false))
            .write_to_string_as(&EthnicValueType::Anc005, "ethnicity")
            .unwrap();

        assert!(xml.starts_with("<ethnicity "));
        assert!(xml.ends_with(">ANC005</ethnicity>"));
    }

    #[test]
    fn test_indent_unit_is_honored() {
        let mut exam = MedicalHistoryAndPhysicalExam::new();
        exam.add_new_family_history().at_risk = YesNoNullType::no();

        let tabs = Ar2005Writer::with_config(WriterConfig::new().with_indent_unit(b'\t', 1))
            .write_to_string(&exam)
            .unwrap();
        assert!(tabs.contains("\n\t<familyHistory>"));
        assert!(tabs.contains("\n\t\t<atRisk>"));

        let wide = Ar2005Writer::with_config(WriterConfig::new().with_indent_unit(b' ', 4))
            .write_to_string(&exam)
            .unwrap();
        assert!(wide.contains("\n    <familyHistory>"));
        assert!(wide.contains("\n        <atRisk>"));
    }

    #[test]
    fn test_write_unbound_element() {
        let opaque = XmlElement::new("ignored")
            .push_child(XmlElement::with_text("lastName", "Smith & Co"))
            .push_child(XmlElement::new_nil("dob"))
            .push_child(XmlElement::new("address").push_child(XmlElement::with_text("city", "Victoria")));

        let mut xml_writer = Writer::new(Vec::new());
        let mut out = ElementWriter::new(&mut xml_writer);
        out.element("patientInformation", &opaque).unwrap();

        let xml = String::from_utf8(xml_writer.into_inner()).unwrap();
        assert_eq!(
            xml,
            "<patientInformation><lastName>Smith &amp; Co</lastName>\
             <dob xsi:nil=\"true\"/><address><city>Victoria</city></address></patientInformation>"
        );
    }
}

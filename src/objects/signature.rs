//! Practitioner sign-off block.

use crate::binding::{Fields, XmlBinding};
use crate::error::Result;
use crate::reader::XmlElement;
use crate::writer::ElementWriter;
use chrono::NaiveDate;
use std::io::Write;

/// Signatures closing an AR2005 form: a primary signature and date, plus an
/// optional second signature and date.
///
/// Every field tracks presence. `signature` and `date` are required by the
/// schema, so writing an instance where either is unset fails with
/// [`Error::MissingField`](crate::Error::MissingField).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignatureType {
    signature: Option<String>,
    date: Option<NaiveDate>,
    signature2: Option<String>,
    date2: Option<NaiveDate>,
}

impl SignatureType {
    /// Creates an empty signature block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Primary signature, if set.
    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    /// Sets the primary signature.
    pub fn set_signature(&mut self, signature: impl Into<String>) {
        self.signature = Some(signature.into());
    }

    /// Date of the primary signature, if set.
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Sets the date of the primary signature.
    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = Some(date);
    }

    /// Second signature, if set.
    pub fn signature2(&self) -> Option<&str> {
        self.signature2.as_deref()
    }

    /// Returns true if a second signature is present.
    pub fn is_set_signature2(&self) -> bool {
        self.signature2.is_some()
    }

    /// Sets the second signature.
    pub fn set_signature2(&mut self, signature: impl Into<String>) {
        self.signature2 = Some(signature.into());
    }

    /// Removes the second signature.
    pub fn unset_signature2(&mut self) {
        self.signature2 = None;
    }

    /// Date of the second signature, if set.
    pub fn date2(&self) -> Option<NaiveDate> {
        self.date2
    }

    /// Returns true if a second signature date is present.
    pub fn is_set_date2(&self) -> bool {
        self.date2.is_some()
    }

    /// Sets the date of the second signature.
    pub fn set_date2(&mut self, date: NaiveDate) {
        self.date2 = Some(date);
    }

    /// Removes the date of the second signature.
    pub fn unset_date2(&mut self) {
        self.date2 = None;
    }
}

impl XmlBinding for SignatureType {
    const ROOT_ELEMENT: &'static str = "signatures";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(element, &["signature", "date", "signature2", "date2"])?;
        Ok(Self {
            signature: Some(f.string("signature")?),
            date: Some(f.date("date")?),
            signature2: f.optional_string("signature2")?,
            date2: f.optional_date("date2")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.required_string("signature", self.signature.as_deref())?;
        out.required_date("date", self.date)?;
        out.optional_string("signature2", self.signature2.as_deref())?;
        out.optional_date("date2", self.date2)
    }
}

//! Common types shared across AR2005 sections.
//!
//! - [`YesNoNullType`] - tri-state answer used by the history checklists
//! - [`NormalAbnormalNullType`] - tri-state finding used by the physical exam
//! - [`CustomLab`] - free-form lab label/result pair

use crate::binding::{Fields, XmlBinding};
use crate::error::Result;
use crate::reader::XmlElement;
use crate::writer::ElementWriter;
use std::io::Write;

// ============================================================================
// AR2005 Namespaces
// ============================================================================

/// AR2005 target namespace
pub const XMLNS_AR2005: &str = "http://www.oscarmcmaster.org/AR2005";

/// XML Schema instance namespace (for `xsi:nil`)
pub const XMLNS_XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";

// ============================================================================
// Tri-state answers
// ============================================================================

/// A checklist answer: `<yes>`, `<no>` and `<null>` flags, each optional.
///
/// Forms normally set exactly one of the three to `true`, but the schema
/// allows any combination, so all three are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct YesNoNullType {
    /// `yes` flag
    pub yes: Option<bool>,
    /// `no` flag
    pub no: Option<bool>,
    /// `null` flag (question not answered)
    pub null: Option<bool>,
}

impl YesNoNullType {
    /// Creates an answer with no flags set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer "yes".
    pub fn yes() -> Self {
        Self {
            yes: Some(true),
            ..Self::default()
        }
    }

    /// Answer "no".
    pub fn no() -> Self {
        Self {
            no: Some(true),
            ..Self::default()
        }
    }

    /// Explicitly unanswered.
    pub fn unknown() -> Self {
        Self {
            null: Some(true),
            ..Self::default()
        }
    }

    /// Collapses the flags to a single answer. `yes` wins over `no`;
    /// anything else is `None`.
    pub fn answer(&self) -> Option<bool> {
        if self.yes == Some(true) {
            Some(true)
        } else if self.no == Some(true) {
            Some(false)
        } else {
            None
        }
    }
}

impl XmlBinding for YesNoNullType {
    const ROOT_ELEMENT: &'static str = "yesNoNull";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(element, &["yes", "no", "null"])?;
        Ok(Self {
            yes: f.optional_boolean("yes")?,
            no: f.optional_boolean("no")?,
            null: f.optional_boolean("null")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.optional_boolean("yes", self.yes)?;
        out.optional_boolean("no", self.no)?;
        out.optional_boolean("null", self.null)
    }
}

/// An exam finding: `<normal>`, `<abnormal>` and `<null>` flags, each optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalAbnormalNullType {
    /// `normal` flag
    pub normal: Option<bool>,
    /// `abnormal` flag
    pub abnormal: Option<bool>,
    /// `null` flag (not examined)
    pub null: Option<bool>,
}

impl NormalAbnormalNullType {
    /// Creates a finding with no flags set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finding "normal".
    pub fn normal() -> Self {
        Self {
            normal: Some(true),
            ..Self::default()
        }
    }

    /// Finding "abnormal".
    pub fn abnormal() -> Self {
        Self {
            abnormal: Some(true),
            ..Self::default()
        }
    }

    /// Returns true if the abnormal flag is set.
    pub fn is_abnormal(&self) -> bool {
        self.abnormal == Some(true)
    }
}

impl XmlBinding for NormalAbnormalNullType {
    const ROOT_ELEMENT: &'static str = "normalAbnormalNull";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(element, &["normal", "abnormal", "null"])?;
        Ok(Self {
            normal: f.optional_boolean("normal")?,
            abnormal: f.optional_boolean("abnormal")?,
            null: f.optional_boolean("null")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.optional_boolean("normal", self.normal)?;
        out.optional_boolean("abnormal", self.abnormal)?;
        out.optional_boolean("null", self.null)
    }
}

// ============================================================================
// Custom lab
// ============================================================================

/// A lab the form has no dedicated field for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CustomLab {
    /// Test name
    pub label: String,
    /// Result as entered
    pub result: String,
}

impl CustomLab {
    /// Creates a lab entry.
    pub fn new(label: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            result: result.into(),
        }
    }

    /// Returns true if neither label nor result has been filled in.
    pub fn is_blank(&self) -> bool {
        self.label.trim().is_empty() && self.result.trim().is_empty()
    }
}

impl XmlBinding for CustomLab {
    const ROOT_ELEMENT: &'static str = "customLab";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(element, &["label", "result"])?;
        Ok(Self {
            label: f.string("label")?,
            result: f.string("result")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.string("label", &self.label)?;
        out.string("result", &self.result)
    }
}

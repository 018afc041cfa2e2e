//! BC Antenatal Record (AR2005) XML bindings for Rust.
//!
//! This crate provides typed representations of the AR2005 schema used by
//! OSCAR-family EMRs to exchange British Columbia antenatal records, along
//! with a reader and writer for the XML wire format.
//!
//! # Features
//!
//! - **Schema Types**: Record sets of AR1 and AR2 forms, medical history and physical exam,
//!   pregnancy and obstetrical history, laboratory investigations and
//!   signatures, each validated against the schema's cardinality rules.
//! - **Closed Vocabularies**: Enumerated codes such as [`EthnicValueType`]
//!   with exact, absent-on-miss lookups by code or integer tag.
//! - **Reader**: Parse from strings, readers, byte streams, files or
//!   `file:` URLs.
//! - **Writer**: Emit namespaced AR2005 XML, with `xsi:nil` for nillable
//!   fields.
//! - **Serde Support**: Optional serialization with the `serde` feature.
//!
//! # Quick Start
//!
//! ```rust
//! use ar2005::{EthnicValueType, SignatureType, XmlBinding};
//! use chrono::NaiveDate;
//!
//! // Vocabulary lookups never fail
//! assert_eq!(EthnicValueType::for_string("ANC005"), Some(EthnicValueType::Anc005));
//! assert_eq!(EthnicValueType::for_int(9), None);
//!
//! // Build, write and read back a signature block
//! let mut sig = SignatureType::new();
//! sig.set_signature("Dr. A. Smith");
//! sig.set_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
//!
//! let xml = sig.to_xml_string().unwrap();
//! let parsed = SignatureType::parse_str(&xml).unwrap();
//! assert_eq!(parsed, sig);
//! assert!(!parsed.is_set_signature2());
//! ```
//!
//! # Validation
//!
//! Parsing is strict: unknown child elements, missing required elements,
//! malformed simple values and codes outside a vocabulary are all rejected
//! with a descriptive [`Error`]. Use [`Error::is_transport`] to tell I/O
//! failures apart from non-conformant documents.
//!
//! # Module Structure
//!
//! - [`objects`] - AR2005 data structures and vocabularies
//! - [`binding`] - The [`XmlBinding`] trait and field helpers
//! - [`reader`] - Element tree and parse entry points
//! - [`writer`] - XML serialization
//! - [`error`] - Error types
//!
//! # Optional Features
//!
//! - `serde` - Enable serde serialization/deserialization support
//! - `cli` - Build the `ar2005` command-line tool

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod binding;
pub mod error;
pub mod objects;
pub mod reader;
pub mod writer;

// Re-export commonly used types at the crate root
pub use binding::XmlBinding;
pub use error::{Error, Result};
pub use objects::{
    ARRecord, ARRecordSet, EthnicValueType, InitialLaboratoryInvestigations,
    MedicalHistoryAndPhysicalExam, ObstetricalHistory, PregnancyHistory, SignatureType,
    Vocabulary, AR1, AR2,
};
pub use reader::{parse, parse_file, parse_str, XmlElement};
pub use writer::{Ar2005Writer, WriterConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

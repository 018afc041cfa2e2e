//! Error types for the AR2005 library.

use thiserror::Error;

/// Errors that can occur when reading or writing AR2005 documents.
#[derive(Error, Debug)]
pub enum Error {
    /// XML parsing error
    #[error("XML parsing error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    /// XML attribute parsing error
    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    /// The document ended early or nested elements did not close
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// The document contained no root element
    #[error("Document has no root element")]
    EmptyDocument,

    /// Root element declares a namespace other than AR2005
    #[error("Unexpected namespace: {0}")]
    UnexpectedNamespace(String),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Unexpected XML element
    #[error("Unexpected XML element: {0}")]
    UnexpectedElement(String),

    /// Element text does not match its declared simple type
    #[error("Invalid value for {element}: {value:?} (expected {expected})")]
    InvalidValue {
        /// Path of the offending element
        element: String,
        /// The text that failed to parse
        value: String,
        /// Description of the expected lexical form
        expected: &'static str,
    },

    /// Code outside a closed vocabulary
    #[error("Invalid enumeration value for {element}: {value:?}")]
    InvalidEnumeration {
        /// Path of the offending element, or the vocabulary name
        element: String,
        /// The unrecognized code
        value: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 conversion error
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// URL scheme other than `file:`
    #[error("Unsupported URL: {0}")]
    UnsupportedUrl(String),
}

impl Error {
    /// Returns true for failures reaching the source (file, URL, stream),
    /// as opposed to failures in the document itself.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Io(_) | Error::InvalidUrl(_) | Error::UnsupportedUrl(_)
        )
    }
}

/// Result type alias for AR2005 operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        let io = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io.is_transport());
        assert!(Error::UnsupportedUrl("http://example.com".to_string()).is_transport());

        assert!(!Error::MissingField("signatures/date".to_string()).is_transport());
        assert!(!Error::EmptyDocument.is_transport());
    }

    #[test]
    fn test_error_messages() {
        let err = Error::InvalidEnumeration {
            element: "ethnic".to_string(),
            value: "ANC003".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid enumeration value for ethnic: \"ANC003\""
        );

        let err = Error::InvalidValue {
            element: "physicalExamination/height".to_string(),
            value: "tall".to_string(),
            expected: "xs:float",
        };
        assert!(err.to_string().contains("physicalExamination/height"));
        assert!(err.to_string().contains("xs:float"));
    }
}

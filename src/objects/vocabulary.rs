//! Closed vocabularies used by AR2005 fields.
//!
//! Each vocabulary is an XSD `xs:enumeration` facet: a fixed set of string
//! codes, each paired with an integer tag numbered from 1 in declaration
//! order. Lookups in either direction are exact and return `None` for
//! anything outside the set; they never fail.

use crate::binding::{simple_content, XmlBinding};
use crate::error::{Error, Result};
use crate::reader::XmlElement;
use crate::writer::ElementWriter;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Common interface over every closed vocabulary.
pub trait Vocabulary: Copy + Eq + fmt::Debug + 'static {
    /// All values in tag order.
    const VALUES: &'static [Self];

    /// Looks up a value by its exact, case-sensitive code.
    fn for_string(code: &str) -> Option<Self>;

    /// Looks up a value by its integer tag.
    fn for_int(tag: i32) -> Option<Self>;

    /// Returns the schema code.
    fn as_str(&self) -> &'static str;

    /// Returns the integer tag.
    fn int_value(&self) -> i32;
}

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal => $tag:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[cfg_attr(feature = "serde", serde(rename = $code))]
                $variant,
            )+
        }

        impl $name {
            /// Looks up a value by its exact schema code; `None` if unrecognized.
            pub fn for_string(code: &str) -> Option<Self> {
                match code {
                    $( $code => Some($name::$variant), )+
                    _ => None,
                }
            }

            /// Looks up a value by its integer tag; `None` if out of range.
            pub fn for_int(tag: i32) -> Option<Self> {
                match tag {
                    $( $tag => Some($name::$variant), )+
                    _ => None,
                }
            }

            /// Returns the schema code.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $code, )+
                }
            }

            /// Returns the integer tag.
            pub fn int_value(&self) -> i32 {
                match self {
                    $( $name::$variant => $tag, )+
                }
            }
        }

        impl Vocabulary for $name {
            const VALUES: &'static [Self] = &[$( $name::$variant, )+];

            fn for_string(code: &str) -> Option<Self> {
                $name::for_string(code)
            }

            fn for_int(tag: i32) -> Option<Self> {
                $name::for_int(tag)
            }

            fn as_str(&self) -> &'static str {
                $name::as_str(self)
            }

            fn int_value(&self) -> i32 {
                $name::int_value(self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                $name::for_string(s).ok_or_else(|| Error::InvalidEnumeration {
                    element: stringify!($name).to_string(),
                    value: s.to_string(),
                })
            }
        }
    };
}

vocabulary! {
    /// Ethnic background code recorded on the patient section.
    EthnicValueType {
        /// `ANC001`
        Anc001 = "ANC001" => 1,
        /// `ANC002`
        Anc002 = "ANC002" => 2,
        /// `ANC005`
        Anc005 = "ANC005" => 3,
        /// `ANC007`
        Anc007 = "ANC007" => 4,
        /// `OTHER`: not covered by the predefined categories
        Other = "OTHER" => 5,
        /// `UN`: unknown or not disclosed
        Un = "UN" => 6,
    }
}

vocabulary! {
    /// Cigarettes smoked per day during the current pregnancy.
    CigsPerDay {
        /// Empty code: not recorded
        Unspecified = "" => 1,
        /// `LESS10`: fewer than ten
        Less10 = "LESS10" => 2,
        /// `UP20`: up to twenty
        Up20 = "UP20" => 3,
        /// `OVER20`: more than twenty
        Over20 = "OVER20" => 4,
    }
}

vocabulary! {
    /// ABO blood group from additional lab investigations.
    BloodGroup {
        /// `A`
        A = "A" => 1,
        /// `B`
        B = "B" => 2,
        /// `AB`
        Ab = "AB" => 3,
        /// `O`
        O = "O" => 4,
        /// `UN`: unknown
        Unknown = "UN" => 5,
        /// `ND`: not done
        NotDone = "ND" => 6,
    }
}

vocabulary! {
    /// Rh factor result.
    RhFactor {
        /// `POS`
        Positive = "POS" => 1,
        /// `WPOS`: weak positive
        WeakPositive = "WPOS" => 2,
        /// `NEG`
        Negative = "NEG" => 3,
        /// `NDONE`: not done
        NotDone = "NDONE" => 4,
        /// `UNK`: unknown
        Unknown = "UNK" => 5,
    }
}

vocabulary! {
    /// Group B streptococcus screening result.
    Gbs {
        /// `NDONE`: not done
        NotDone = "NDONE" => 1,
        /// `POSSWAB`: positive swab
        PositiveSwab = "POSSWAB" => 2,
        /// `POSURINE`: positive urine
        PositiveUrine = "POSURINE" => 3,
        /// `NEGSWAB`: negative swab
        NegativeSwab = "NEGSWAB" => 4,
        /// `DONEUNK`: done, result unknown
        DoneUnknown = "DONEUNK" => 5,
        /// `UNK`: unknown
        Unknown = "UNK" => 6,
    }
}

vocabulary! {
    /// HIV test result.
    HivResult {
        /// `POS`
        Positive = "POS" => 1,
        /// `NEG`
        Negative = "NEG" => 2,
        /// `IND`: indeterminate
        Indeterminate = "IND" => 3,
        /// `NDONE`: not done
        NotDone = "NDONE" => 4,
        /// `UNK`: unknown
        Unknown = "UNK" => 5,
    }
}

vocabulary! {
    /// ABO result from the initial laboratory investigations.
    AboResult {
        /// `A`
        A = "A" => 1,
        /// `B`
        B = "B" => 2,
        /// `AB`
        Ab = "AB" => 3,
        /// `O`
        O = "O" => 4,
        /// `NDONE`: not done
        NotDone = "NDONE" => 5,
        /// `UNK`: unknown
        Unknown = "UNK" => 6,
    }
}

vocabulary! {
    /// Result of a positive/negative screen (GC, HBsAg, VDRL, sickle cell).
    ScreeningResult {
        /// `POS`
        Positive = "POS" => 1,
        /// `NEG`
        Negative = "NEG" => 2,
        /// `NDONE`: not done
        NotDone = "NDONE" => 3,
        /// `UNK`: unknown
        Unknown = "UNK" => 4,
    }
}

vocabulary! {
    /// Sex of a previous child in the obstetrical history.
    Sex {
        /// `M`
        Male = "M" => 1,
        /// `F`
        Female = "F" => 2,
        /// `A`: ambiguous
        Ambiguous = "A" => 3,
        /// `U`: unknown
        Unknown = "U" => 4,
    }
}

vocabulary! {
    /// Delivery type of a previous pregnancy.
    TypeOfDelivery {
        /// `AVAG`: assisted vaginal
        AssistedVaginal = "AVAG" => 1,
        /// `IND`: induced
        Induced = "IND" => 2,
        /// `CS`: caesarean section
        Caesarean = "CS" => 3,
        /// `SVAG`: spontaneous vaginal
        SpontaneousVaginal = "SVAG" => 4,
        /// `VAG`: vaginal
        Vaginal = "VAG" => 5,
        /// `UN`: unknown
        Unknown = "UN" => 6,
    }
}

/// An ethnic code can be read or written as a standalone document, e.g.
/// `<ethnic>ANC001</ethnic>`. Codes outside the vocabulary are rejected.
impl XmlBinding for EthnicValueType {
    const ROOT_ELEMENT: &'static str = "ethnic";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let text = simple_content(element, &element.name)?;
        EthnicValueType::for_string(text).ok_or_else(|| Error::InvalidEnumeration {
            element: element.name.clone(),
            value: text.to_string(),
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.text_content(self.as_str())
    }
}

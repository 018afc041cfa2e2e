//! The AR1 form: identification, partner and practitioner details, and the
//! history and initial lab sections.
//!
//! The patient section has no recovered structure, so [`PatientInformation`]
//! carries its children as unbound elements and writes them back unchanged.

use super::history::MedicalHistoryAndPhysicalExam;
use super::laboratory::InitialLaboratoryInvestigations;
use super::pregnancy::{ObstetricalHistory, PregnancyHistory};
use super::signature::SignatureType;
use crate::binding::{Fields, XmlBinding};
use crate::error::{Error, Result};
use crate::reader::XmlElement;
use crate::writer::ElementWriter;
use chrono::{NaiveDate, NaiveDateTime};
use std::io::Write;

// ============================================================================
// Patient
// ============================================================================

/// Patient demographics, kept as unbound elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatientInformation {
    /// Child elements in document order, without namespace or attribute data
    pub fields: Vec<XmlElement>,
}

impl PatientInformation {
    /// Creates an empty patient section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of the first field called `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.text())
    }
}

/// Copy of `element` with only the parts the writer reproduces.
fn unbound(element: &XmlElement) -> XmlElement {
    XmlElement {
        name: element.name.clone(),
        nil: element.nil,
        text: element.text.clone(),
        children: element.children.iter().map(unbound).collect(),
        ..XmlElement::default()
    }
}

impl XmlBinding for PatientInformation {
    const ROOT_ELEMENT: &'static str = "patientInformation";

    fn from_element(element: &XmlElement) -> Result<Self> {
        if element.is_nil() || !element.text.is_empty() {
            return Err(Error::InvalidValue {
                element: element.name.clone(),
                value: element.text.clone(),
                expected: "element-only content",
            });
        }
        Ok(Self {
            fields: element.children.iter().map(unbound).collect(),
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        for field in &self.fields {
            out.element(&field.name, field)?;
        }
        Ok(())
    }
}

// ============================================================================
// Partner
// ============================================================================

/// Partner's occupation: a coded value plus free text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Occupation {
    /// Occupation code
    pub value: String,
    /// Occupation text when the code is "other"
    pub other: String,
}

impl XmlBinding for Occupation {
    const ROOT_ELEMENT: &'static str = "occupation";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(element, &["value", "other"])?;
        Ok(Self {
            value: f.string("value")?,
            other: f.string("other")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.string("value", &self.value)?;
        out.string("other", &self.other)
    }
}

/// The patient's partner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartnerInformation {
    /// Last name
    pub last_name: String,
    /// First name
    pub first_name: String,
    /// Occupation
    pub occupation: Occupation,
    /// Highest education level, as coded on the form
    pub education_level: String,
    /// Age in years
    pub age: i32,
}

impl PartnerInformation {
    /// Creates an empty partner record.
    pub fn new() -> Self {
        Self::default()
    }

    /// `Last, First`, or whichever half is filled in.
    pub fn display_name(&self) -> String {
        match (self.last_name.is_empty(), self.first_name.is_empty()) {
            (false, false) => format!("{}, {}", self.last_name, self.first_name),
            (false, true) => self.last_name.clone(),
            _ => self.first_name.clone(),
        }
    }
}

impl XmlBinding for PartnerInformation {
    const ROOT_ELEMENT: &'static str = "partnerInformation";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(
            element,
            &["lastName", "firstName", "occupation", "educationLevel", "age"],
        )?;
        Ok(Self {
            last_name: f.string("lastName")?,
            first_name: f.string("firstName")?,
            occupation: f.child("occupation")?,
            education_level: f.string("educationLevel")?,
            age: f.int("age")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.string("lastName", &self.last_name)?;
        out.string("firstName", &self.first_name)?;
        out.child("occupation", &self.occupation)?;
        out.string("educationLevel", &self.education_level)?;
        out.int("age", self.age)
    }
}

// ============================================================================
// Practitioners
// ============================================================================

/// Who is planned to attend the birth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BirthAttendants {
    /// Obstetrician
    pub obs: bool,
    /// Family physician
    pub fp: bool,
    /// Midwife
    pub midwife: bool,
    /// Other attendant, free text
    pub other: String,
}

impl BirthAttendants {
    /// Element names of the attendants ticked, plus the free text if any.
    pub fn selected(&self) -> Vec<&str> {
        let mut selected: Vec<&str> = [("OBS", self.obs), ("FP", self.fp), ("Midwife", self.midwife)]
            .into_iter()
            .filter(|(_, ticked)| *ticked)
            .map(|(name, _)| name)
            .collect();
        if !self.other.is_empty() {
            selected.push(&self.other);
        }
        selected
    }
}

impl XmlBinding for BirthAttendants {
    const ROOT_ELEMENT: &'static str = "birthAttendants";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(element, &["OBS", "FP", "Midwife", "Other"])?;
        Ok(Self {
            obs: f.boolean("OBS")?,
            fp: f.boolean("FP")?,
            midwife: f.boolean("Midwife")?,
            other: f.string("Other")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.boolean("OBS", self.obs)?;
        out.boolean("FP", self.fp)?;
        out.boolean("Midwife", self.midwife)?;
        out.string("Other", &self.other)
    }
}

/// Who will care for the newborn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewbornCare {
    /// Pediatrician
    pub ped: bool,
    /// Family physician
    pub fp: bool,
    /// Midwife
    pub midwife: bool,
    /// Other caregiver, free text
    pub other: String,
}

impl XmlBinding for NewbornCare {
    const ROOT_ELEMENT: &'static str = "newbornCare";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(element, &["Ped", "FP", "Midwife", "Other"])?;
        Ok(Self {
            ped: f.boolean("Ped")?,
            fp: f.boolean("FP")?,
            midwife: f.boolean("Midwife")?,
            other: f.string("Other")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.boolean("Ped", self.ped)?;
        out.boolean("FP", self.fp)?;
        out.boolean("Midwife", self.midwife)?;
        out.string("Other", &self.other)
    }
}

/// Practitioners involved in the pregnancy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PractitionerInformation {
    /// Planned birth attendants
    pub birth_attendants: BirthAttendants,
    /// Planned newborn care
    pub newborn_care: NewbornCare,
    /// Family physician
    pub family_physician: String,
}

impl PractitionerInformation {
    /// Creates an empty practitioner record.
    pub fn new() -> Self {
        Self::default()
    }
}

impl XmlBinding for PractitionerInformation {
    const ROOT_ELEMENT: &'static str = "practitionerInformation";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(
            element,
            &["birthAttendants", "newbornCare", "familyPhysician"],
        )?;
        Ok(Self {
            birth_attendants: f.child("birthAttendants")?,
            newborn_care: f.child("newbornCare")?,
            family_physician: f.string("familyPhysician")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.child("birthAttendants", &self.birth_attendants)?;
        out.child("newbornCare", &self.newborn_care)?;
        out.string("familyPhysician", &self.family_physician)
    }
}

// ============================================================================
// AR1
// ============================================================================

/// The AR1 form.
///
/// `form_created` and `form_edited` are required by the schema; they are
/// `Option` only so an instance can be built incrementally, and writing one
/// that is still `None` fails.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AR1 {
    /// Form id
    pub id: i32,
    /// Form version
    pub version_id: i32,
    /// Pregnancy episode
    pub episode_id: i32,
    /// Patient demographic number
    pub demographic_no: i32,
    /// Provider number of the form's owner
    pub provider_no: String,
    /// Creation date (`xs:date`)
    pub form_created: Option<NaiveDate>,
    /// Last edit (`xs:dateTime`)
    pub form_edited: Option<NaiveDateTime>,
    /// Patient demographics
    pub patient_information: PatientInformation,
    /// Partner
    pub partner_information: PartnerInformation,
    /// Practitioners
    pub practitioner_information: PractitionerInformation,
    /// Menstrual and pregnancy history
    pub pregnancy_history: PregnancyHistory,
    /// Previous pregnancies
    pub obstetrical_history: ObstetricalHistory,
    /// History checklists and initial exam
    pub medical_history_and_physical_exam: MedicalHistoryAndPhysicalExam,
    /// Initial lab panel
    pub initial_laboratory_investigations: InitialLaboratoryInvestigations,
    /// Comments
    pub comments: String,
    /// Overflow comments
    pub extra_comments: String,
    /// Sign-off
    pub signatures: SignatureType,
}

impl AR1 {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }
}

impl XmlBinding for AR1 {
    const ROOT_ELEMENT: &'static str = "AR1";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(
            element,
            &[
                "id",
                "VersionID",
                "episodeId",
                "demographicNo",
                "providerNo",
                "formCreated",
                "formEdited",
                "patientInformation",
                "partnerInformation",
                "practitionerInformation",
                "pregnancyHistory",
                "obstetricalHistory",
                "medicalHistoryAndPhysicalExam",
                "initialLaboratoryInvestigations",
                "comments",
                "extraComments",
                "signatures",
            ],
        )?;
        Ok(Self {
            id: f.int("id")?,
            version_id: f.int("VersionID")?,
            episode_id: f.int("episodeId")?,
            demographic_no: f.int("demographicNo")?,
            provider_no: f.string("providerNo")?,
            form_created: Some(f.date("formCreated")?),
            form_edited: Some(f.date_time("formEdited")?),
            patient_information: f.child("patientInformation")?,
            partner_information: f.child("partnerInformation")?,
            practitioner_information: f.child("practitionerInformation")?,
            pregnancy_history: f.child("pregnancyHistory")?,
            obstetrical_history: f.child("obstetricalHistory")?,
            medical_history_and_physical_exam: f.child("medicalHistoryAndPhysicalExam")?,
            initial_laboratory_investigations: f.child("initialLaboratoryInvestigations")?,
            comments: f.string("comments")?,
            extra_comments: f.string("extraComments")?,
            signatures: f.child("signatures")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.int("id", self.id)?;
        out.int("VersionID", self.version_id)?;
        out.int("episodeId", self.episode_id)?;
        out.int("demographicNo", self.demographic_no)?;
        out.string("providerNo", &self.provider_no)?;
        out.required_date("formCreated", self.form_created)?;
        out.required_date_time("formEdited", self.form_edited)?;
        out.child("patientInformation", &self.patient_information)?;
        out.child("partnerInformation", &self.partner_information)?;
        out.child("practitionerInformation", &self.practitioner_information)?;
        out.child("pregnancyHistory", &self.pregnancy_history)?;
        out.child("obstetricalHistory", &self.obstetrical_history)?;
        out.child(
            "medicalHistoryAndPhysicalExam",
            &self.medical_history_and_physical_exam,
        )?;
        out.child(
            "initialLaboratoryInvestigations",
            &self.initial_laboratory_investigations,
        )?;
        out.string("comments", &self.comments)?;
        out.string("extraComments", &self.extra_comments)?;
        out.child("signatures", &self.signatures)
    }
}

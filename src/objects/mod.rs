//! AR2005 object types.
//!
//! This module contains the data structures bound to the BC Antenatal
//! Record schema:
//!
//! - [`ARRecordSet`] and [`ARRecord`] - Whole records, one AR1 and AR2 each
//! - [`AR1`] - The AR1 form (partner, practitioners, histories, initial labs)
//! - [`AR2`] - The AR2 form (visits, ultrasounds, labs, sign-off)
//! - [`MedicalHistoryAndPhysicalExam`] - History checklists and initial exam
//! - [`PregnancyHistory`] and [`ObstetricalHistory`] - Dating and prior pregnancies
//! - [`InitialLaboratoryInvestigations`] - The initial lab panel
//! - [`SignatureType`] - Practitioner sign-off
//!
//! Also provides the closed vocabularies ([`EthnicValueType`], [`RhFactor`],
//! ...) through the [`Vocabulary`] trait, and the tri-state answer types
//! shared by the checklists.

mod ar1;
mod ar2;
mod common;
mod history;
mod laboratory;
mod pregnancy;
mod record;
mod signature;
mod vocabulary;

// Re-export common types
pub use common::{CustomLab, NormalAbnormalNullType, YesNoNullType, XMLNS_AR2005, XMLNS_XSI};

// Re-export vocabularies
pub use vocabulary::{
    AboResult, BloodGroup, CigsPerDay, EthnicValueType, Gbs, HivResult, RhFactor,
    ScreeningResult, Sex, TypeOfDelivery, Vocabulary,
};

// Re-export form sections
pub use ar1::{
    BirthAttendants, NewbornCare, Occupation, PartnerInformation, PatientInformation,
    PractitionerInformation, AR1,
};
pub use ar2::{
    DiscussionTopicsType, RecommendedImmunoprophylaxisType, RiskFactorItemType,
    SubsequentVisitItemType, UltrasoundType, AR2,
};
pub use history::{
    CurrentPregnancyType, FamilyHistoryType, GenericHistoryType, InfectiousDiseaseType,
    MedicalHistoryAndPhysicalExam, MedicalHistoryType, PhysicalExaminationType, PsychosocialType,
};
pub use laboratory::{
    AdditionalLabInvestigationsType, InitialLaboratoryInvestigations,
    PrenatalGeneticScreeningType,
};
pub use pregnancy::{DatingMethods, ObstetricalHistory, ObstetricalHistoryItemList, PregnancyHistory};
pub use record::{ARRecord, ARRecordSet};
pub use signature::SignatureType;

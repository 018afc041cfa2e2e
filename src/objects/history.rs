//! Medical history and physical examination section.
//!
//! [`MedicalHistoryAndPhysicalExam`] groups seven checklists. Each one is
//! optional on the Rust side so a form can be built up piece by piece with
//! the `add_new_*` methods.

use super::common::{NormalAbnormalNullType, YesNoNullType};
use super::vocabulary::CigsPerDay;
use crate::binding::{Fields, XmlBinding};
use crate::error::Result;
use crate::reader::XmlElement;
use crate::writer::ElementWriter;
use std::io::Write;

// ============================================================================
// Current pregnancy
// ============================================================================

/// Findings for the current pregnancy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurrentPregnancyType {
    /// Bleeding
    pub bleeding: YesNoNullType,
    /// Nausea
    pub nausea: YesNoNullType,
    /// Smoking
    pub smoking: YesNoNullType,
    /// Cigarettes per day; required when written
    pub cigs_per_day: Option<CigsPerDay>,
    /// Alcohol or drug use
    pub alcohol_drugs: YesNoNullType,
    /// Occupational or environmental risks
    pub occ_env_risks: YesNoNullType,
    /// Dietary restrictions
    pub dietary_res: YesNoNullType,
    /// Calcium intake adequate
    pub calcium_adequate: YesNoNullType,
    /// Folate supplementation
    pub folate: YesNoNullType,
}

impl CurrentPregnancyType {
    /// Creates an empty checklist.
    pub fn new() -> Self {
        Self::default()
    }
}

impl XmlBinding for CurrentPregnancyType {
    const ROOT_ELEMENT: &'static str = "currentPregnancy";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(
            element,
            &[
                "bleeding",
                "nausea",
                "smoking",
                "cigsPerDay",
                "alcoholDrugs",
                "occEnvRisks",
                "dietaryRes",
                "calciumAdequate",
                "folate",
            ],
        )?;
        Ok(Self {
            bleeding: f.child("bleeding")?,
            nausea: f.child("nausea")?,
            smoking: f.child("smoking")?,
            cigs_per_day: Some(f.code("cigsPerDay")?),
            alcohol_drugs: f.child("alcoholDrugs")?,
            occ_env_risks: f.child("occEnvRisks")?,
            dietary_res: f.child("dietaryRes")?,
            calcium_adequate: f.child("calciumAdequate")?,
            folate: f.child("folate")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.child("bleeding", &self.bleeding)?;
        out.child("nausea", &self.nausea)?;
        out.child("smoking", &self.smoking)?;
        out.code("cigsPerDay", self.cigs_per_day)?;
        out.child("alcoholDrugs", &self.alcohol_drugs)?;
        out.child("occEnvRisks", &self.occ_env_risks)?;
        out.child("dietaryRes", &self.dietary_res)?;
        out.child("calciumAdequate", &self.calcium_adequate)?;
        out.child("folate", &self.folate)
    }
}

// ============================================================================
// Medical history
// ============================================================================

/// Past medical history checklist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MedicalHistoryType {
    /// Hypertension
    pub hypertension: YesNoNullType,
    /// Endocrine disorders (`endorince` on the wire)
    pub endorince: YesNoNullType,
    /// Urinary tract
    pub urinary_tract: YesNoNullType,
    /// Cardiac
    pub cardiac: YesNoNullType,
    /// Liver
    pub liver: YesNoNullType,
    /// Gynaecology
    pub gynaecology: YesNoNullType,
    /// Hematology
    pub hem: YesNoNullType,
    /// Surgeries
    pub surgeries: YesNoNullType,
    /// Blood transfusion
    pub blood_transfusion: YesNoNullType,
    /// Anesthetics
    pub anesthetics: YesNoNullType,
    /// Psychiatry
    pub psychiatry: YesNoNullType,
    /// Epilepsy
    pub epilepsy: YesNoNullType,
    /// Description for `other`
    pub other_descr: String,
    /// Other
    pub other: YesNoNullType,
}

impl MedicalHistoryType {
    /// Creates an empty checklist.
    pub fn new() -> Self {
        Self::default()
    }
}

impl XmlBinding for MedicalHistoryType {
    const ROOT_ELEMENT: &'static str = "medicalHistory";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(
            element,
            &[
                "hypertension",
                "endorince",
                "urinaryTract",
                "cardiac",
                "liver",
                "gynaecology",
                "hem",
                "surgeries",
                "bloodTransfusion",
                "anesthetics",
                "psychiatry",
                "epilepsy",
                "otherDescr",
                "other",
            ],
        )?;
        Ok(Self {
            hypertension: f.child("hypertension")?,
            endorince: f.child("endorince")?,
            urinary_tract: f.child("urinaryTract")?,
            cardiac: f.child("cardiac")?,
            liver: f.child("liver")?,
            gynaecology: f.child("gynaecology")?,
            hem: f.child("hem")?,
            surgeries: f.child("surgeries")?,
            blood_transfusion: f.child("bloodTransfusion")?,
            anesthetics: f.child("anesthetics")?,
            psychiatry: f.child("psychiatry")?,
            epilepsy: f.child("epilepsy")?,
            other_descr: f.string("otherDescr")?,
            other: f.child("other")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.child("hypertension", &self.hypertension)?;
        out.child("endorince", &self.endorince)?;
        out.child("urinaryTract", &self.urinary_tract)?;
        out.child("cardiac", &self.cardiac)?;
        out.child("liver", &self.liver)?;
        out.child("gynaecology", &self.gynaecology)?;
        out.child("hem", &self.hem)?;
        out.child("surgeries", &self.surgeries)?;
        out.child("bloodTransfusion", &self.blood_transfusion)?;
        out.child("anesthetics", &self.anesthetics)?;
        out.child("psychiatry", &self.psychiatry)?;
        out.child("epilepsy", &self.epilepsy)?;
        out.string("otherDescr", &self.other_descr)?;
        out.child("other", &self.other)
    }
}

// ============================================================================
// Genetic history
// ============================================================================

/// Genetic history checklist (`genericHistory` on the wire).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenericHistoryType {
    /// Patient or partner at risk
    pub at_risk: YesNoNullType,
    /// Developmental delay
    pub developmental_delay: YesNoNullType,
    /// Congenital anomalies
    pub congenital_anomolies: YesNoNullType,
    /// Chromosomal disorders
    pub chromosomal_disorders: YesNoNullType,
    /// Genetic disorders
    pub genetic_disorders: YesNoNullType,
}

impl GenericHistoryType {
    /// Creates an empty checklist.
    pub fn new() -> Self {
        Self::default()
    }
}

impl XmlBinding for GenericHistoryType {
    const ROOT_ELEMENT: &'static str = "genericHistory";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(
            element,
            &[
                "atRisk",
                "developmentalDelay",
                "congenitalAnomolies",
                "chromosomalDisorders",
                "geneticDisorders",
            ],
        )?;
        Ok(Self {
            at_risk: f.child("atRisk")?,
            developmental_delay: f.child("developmentalDelay")?,
            congenital_anomolies: f.child("congenitalAnomolies")?,
            chromosomal_disorders: f.child("chromosomalDisorders")?,
            genetic_disorders: f.child("geneticDisorders")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.child("atRisk", &self.at_risk)?;
        out.child("developmentalDelay", &self.developmental_delay)?;
        out.child("congenitalAnomolies", &self.congenital_anomolies)?;
        out.child("chromosomalDisorders", &self.chromosomal_disorders)?;
        out.child("geneticDisorders", &self.genetic_disorders)
    }
}

// ============================================================================
// Infectious disease
// ============================================================================

/// Infectious disease checklist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InfectiousDiseaseType {
    /// Varicella
    pub varicella: YesNoNullType,
    /// Sexually transmitted infections
    pub std: YesNoNullType,
    /// Tuberculosis
    pub tuberculosis: YesNoNullType,
    /// Description for `other`
    pub other_descr: String,
    /// Other
    pub other: YesNoNullType,
}

impl InfectiousDiseaseType {
    /// Creates an empty checklist.
    pub fn new() -> Self {
        Self::default()
    }
}

impl XmlBinding for InfectiousDiseaseType {
    const ROOT_ELEMENT: &'static str = "infectiousDisease";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(
            element,
            &["varicella", "std", "tuberculosis", "otherDescr", "other"],
        )?;
        Ok(Self {
            varicella: f.child("varicella")?,
            std: f.child("std")?,
            tuberculosis: f.child("tuberculosis")?,
            other_descr: f.string("otherDescr")?,
            other: f.child("other")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.child("varicella", &self.varicella)?;
        out.child("std", &self.std)?;
        out.child("tuberculosis", &self.tuberculosis)?;
        out.string("otherDescr", &self.other_descr)?;
        out.child("other", &self.other)
    }
}

// ============================================================================
// Psychosocial
// ============================================================================

/// Psychosocial checklist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PsychosocialType {
    /// Poor social support (`poortSocialSupport` on the wire)
    pub poort_social_support: YesNoNullType,
    /// Relationship problems
    pub relationship_problems: YesNoNullType,
    /// Emotional problems or depression
    pub emotional_depression: YesNoNullType,
    /// Substance abuse
    pub substance_abuse: YesNoNullType,
    /// Family violence
    pub family_violence: YesNoNullType,
    /// Parenting concerns
    pub parenting_concerns: YesNoNullType,
    /// Religious or cultural considerations
    pub religious_cultural: YesNoNullType,
}

impl PsychosocialType {
    /// Creates an empty checklist.
    pub fn new() -> Self {
        Self::default()
    }
}

impl XmlBinding for PsychosocialType {
    const ROOT_ELEMENT: &'static str = "psychosocial";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(
            element,
            &[
                "poortSocialSupport",
                "relationshipProblems",
                "emotionalDepression",
                "substanceAbuse",
                "familyViolence",
                "parentingConcerns",
                "religiousCultural",
            ],
        )?;
        Ok(Self {
            poort_social_support: f.child("poortSocialSupport")?,
            relationship_problems: f.child("relationshipProblems")?,
            emotional_depression: f.child("emotionalDepression")?,
            substance_abuse: f.child("substanceAbuse")?,
            family_violence: f.child("familyViolence")?,
            parenting_concerns: f.child("parentingConcerns")?,
            religious_cultural: f.child("religiousCultural")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.child("poortSocialSupport", &self.poort_social_support)?;
        out.child("relationshipProblems", &self.relationship_problems)?;
        out.child("emotionalDepression", &self.emotional_depression)?;
        out.child("substanceAbuse", &self.substance_abuse)?;
        out.child("familyViolence", &self.family_violence)?;
        out.child("parentingConcerns", &self.parenting_concerns)?;
        out.child("religiousCultural", &self.religious_cultural)
    }
}

// ============================================================================
// Family history
// ============================================================================

/// Family history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FamilyHistoryType {
    /// Family history places the pregnancy at risk
    pub at_risk: YesNoNullType,
}

impl FamilyHistoryType {
    /// Creates an empty family history.
    pub fn new() -> Self {
        Self::default()
    }
}

impl XmlBinding for FamilyHistoryType {
    const ROOT_ELEMENT: &'static str = "familyHistory";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(element, &["atRisk"])?;
        Ok(Self {
            at_risk: f.child("atRisk")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.child("atRisk", &self.at_risk)
    }
}

// ============================================================================
// Physical examination
// ============================================================================

/// Initial physical examination.
///
/// `height`, `weight` and `bmi` are nillable: `None` is written as
/// `xsi:nil="true"` rather than omitted.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhysicalExaminationType {
    /// Height (cm)
    pub height: Option<f32>,
    /// Weight (kg)
    pub weight: Option<f32>,
    /// Body mass index
    pub bmi: Option<f32>,
    /// Blood pressure as entered, e.g. `120/80`
    pub bp: String,
    /// Thyroid
    pub thyroid: NormalAbnormalNullType,
    /// Chest
    pub chest: NormalAbnormalNullType,
    /// Breasts
    pub breasts: NormalAbnormalNullType,
    /// Cardiovascular
    pub cardiovascular: NormalAbnormalNullType,
    /// Abdomen
    pub abdomen: NormalAbnormalNullType,
    /// Varicosities
    pub varicosities: NormalAbnormalNullType,
    /// External genitals (`exernalGenitals` on the wire)
    pub exernal_genitals: NormalAbnormalNullType,
    /// Cervix and vagina
    pub cervix_vagina: NormalAbnormalNullType,
    /// Uterus
    pub uterus: NormalAbnormalNullType,
    /// Uterus size as entered
    pub uterus_size: String,
    /// Adnexa
    pub adnexa: NormalAbnormalNullType,
    /// Description for `other`
    pub other_descr: String,
    /// Other
    pub other: NormalAbnormalNullType,
}

impl PhysicalExaminationType {
    /// Creates an empty examination.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the named findings that are flagged abnormal, in form order.
    pub fn abnormal_findings(&self) -> Vec<&'static str> {
        [
            ("thyroid", &self.thyroid),
            ("chest", &self.chest),
            ("breasts", &self.breasts),
            ("cardiovascular", &self.cardiovascular),
            ("abdomen", &self.abdomen),
            ("varicosities", &self.varicosities),
            ("exernalGenitals", &self.exernal_genitals),
            ("cervixVagina", &self.cervix_vagina),
            ("uterus", &self.uterus),
            ("adnexa", &self.adnexa),
            ("other", &self.other),
        ]
        .into_iter()
        .filter(|(_, finding)| finding.is_abnormal())
        .map(|(name, _)| name)
        .collect()
    }
}

impl XmlBinding for PhysicalExaminationType {
    const ROOT_ELEMENT: &'static str = "physicalExamination";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(
            element,
            &[
                "height",
                "weight",
                "bmi",
                "bp",
                "thyroid",
                "chest",
                "breasts",
                "cardiovascular",
                "abdomen",
                "varicosities",
                "exernalGenitals",
                "cervixVagina",
                "uterus",
                "uterusSize",
                "adnexa",
                "otherDescr",
                "other",
            ],
        )?;
        Ok(Self {
            height: f.nillable_float("height")?,
            weight: f.nillable_float("weight")?,
            bmi: f.nillable_float("bmi")?,
            bp: f.string("bp")?,
            thyroid: f.child("thyroid")?,
            chest: f.child("chest")?,
            breasts: f.child("breasts")?,
            cardiovascular: f.child("cardiovascular")?,
            abdomen: f.child("abdomen")?,
            varicosities: f.child("varicosities")?,
            exernal_genitals: f.child("exernalGenitals")?,
            cervix_vagina: f.child("cervixVagina")?,
            uterus: f.child("uterus")?,
            uterus_size: f.string("uterusSize")?,
            adnexa: f.child("adnexa")?,
            other_descr: f.string("otherDescr")?,
            other: f.child("other")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.nillable_float("height", self.height)?;
        out.nillable_float("weight", self.weight)?;
        out.nillable_float("bmi", self.bmi)?;
        out.string("bp", &self.bp)?;
        out.child("thyroid", &self.thyroid)?;
        out.child("chest", &self.chest)?;
        out.child("breasts", &self.breasts)?;
        out.child("cardiovascular", &self.cardiovascular)?;
        out.child("abdomen", &self.abdomen)?;
        out.child("varicosities", &self.varicosities)?;
        out.child("exernalGenitals", &self.exernal_genitals)?;
        out.child("cervixVagina", &self.cervix_vagina)?;
        out.child("uterus", &self.uterus)?;
        out.string("uterusSize", &self.uterus_size)?;
        out.child("adnexa", &self.adnexa)?;
        out.string("otherDescr", &self.other_descr)?;
        out.child("other", &self.other)
    }
}

// ============================================================================
// Section container
// ============================================================================

/// The medical history and physical exam section of the antenatal record.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MedicalHistoryAndPhysicalExam {
    /// Current pregnancy
    pub current_pregnancy: Option<CurrentPregnancyType>,
    /// Medical history
    pub medical_history: Option<MedicalHistoryType>,
    /// Genetic history
    pub generic_history: Option<GenericHistoryType>,
    /// Infectious disease
    pub infectious_disease: Option<InfectiousDiseaseType>,
    /// Psychosocial
    pub psychosocial: Option<PsychosocialType>,
    /// Family history
    pub family_history: Option<FamilyHistoryType>,
    /// Physical examination
    pub physical_examination: Option<PhysicalExaminationType>,
}

macro_rules! substructure_accessors {
    ($field:ident, $ty:ty, $add:ident, $set:ident, $clear:ident, $label:literal) => {
        #[doc = concat!("Attaches an empty ", $label, " section, replacing any existing one, and returns it.")]
        pub fn $add(&mut self) -> &mut $ty {
            self.$field.insert(<$ty>::default())
        }

        #[doc = concat!("Sets the ", $label, " section.")]
        pub fn $set(&mut self, value: $ty) {
            self.$field = Some(value);
        }

        #[doc = concat!("Removes the ", $label, " section.")]
        pub fn $clear(&mut self) {
            self.$field = None;
        }
    };
}

impl MedicalHistoryAndPhysicalExam {
    /// Creates a section with no substructures attached.
    pub fn new() -> Self {
        Self::default()
    }

    substructure_accessors!(
        current_pregnancy,
        CurrentPregnancyType,
        add_new_current_pregnancy,
        set_current_pregnancy,
        clear_current_pregnancy,
        "current pregnancy"
    );
    substructure_accessors!(
        medical_history,
        MedicalHistoryType,
        add_new_medical_history,
        set_medical_history,
        clear_medical_history,
        "medical history"
    );
    substructure_accessors!(
        generic_history,
        GenericHistoryType,
        add_new_generic_history,
        set_generic_history,
        clear_generic_history,
        "genetic history"
    );
    substructure_accessors!(
        infectious_disease,
        InfectiousDiseaseType,
        add_new_infectious_disease,
        set_infectious_disease,
        clear_infectious_disease,
        "infectious disease"
    );
    substructure_accessors!(
        psychosocial,
        PsychosocialType,
        add_new_psychosocial,
        set_psychosocial,
        clear_psychosocial,
        "psychosocial"
    );
    substructure_accessors!(
        family_history,
        FamilyHistoryType,
        add_new_family_history,
        set_family_history,
        clear_family_history,
        "family history"
    );
    substructure_accessors!(
        physical_examination,
        PhysicalExaminationType,
        add_new_physical_examination,
        set_physical_examination,
        clear_physical_examination,
        "physical examination"
    );
}

impl XmlBinding for MedicalHistoryAndPhysicalExam {
    const ROOT_ELEMENT: &'static str = "medicalHistoryAndPhysicalExam";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(
            element,
            &[
                "currentPregnancy",
                "medicalHistory",
                "genericHistory",
                "infectiousDisease",
                "psychosocial",
                "familyHistory",
                "physicalExamination",
            ],
        )?;
        Ok(Self {
            current_pregnancy: f.optional_child("currentPregnancy")?,
            medical_history: f.optional_child("medicalHistory")?,
            generic_history: f.optional_child("genericHistory")?,
            infectious_disease: f.optional_child("infectiousDisease")?,
            psychosocial: f.optional_child("psychosocial")?,
            family_history: f.optional_child("familyHistory")?,
            physical_examination: f.optional_child("physicalExamination")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.optional_child("currentPregnancy", self.current_pregnancy.as_ref())?;
        out.optional_child("medicalHistory", self.medical_history.as_ref())?;
        out.optional_child("genericHistory", self.generic_history.as_ref())?;
        out.optional_child("infectiousDisease", self.infectious_disease.as_ref())?;
        out.optional_child("psychosocial", self.psychosocial.as_ref())?;
        out.optional_child("familyHistory", self.family_history.as_ref())?;
        out.optional_child("physicalExamination", self.physical_examination.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn sample_current_pregnancy() -> CurrentPregnancyType {
        CurrentPregnancyType {
            nausea: YesNoNullType::yes(),
            smoking: YesNoNullType::yes(),
            cigs_per_day: Some(CigsPerDay::Less10),
            folate: YesNoNullType::no(),
            ..CurrentPregnancyType::default()
        }
    }

    fn sample_medical_history() -> MedicalHistoryType {
        MedicalHistoryType {
            hypertension: YesNoNullType::no(),
            surgeries: YesNoNullType::yes(),
            other_descr: "appendectomy 2015".to_string(),
            other: YesNoNullType::yes(),
            ..MedicalHistoryType::default()
        }
    }

    fn sample_physical_examination() -> PhysicalExaminationType {
        PhysicalExaminationType {
            height: Some(165.5),
            weight: Some(62.25),
            bmi: None,
            bp: "118/76".to_string(),
            thyroid: NormalAbnormalNullType::normal(),
            varicosities: NormalAbnormalNullType::abnormal(),
            uterus_size: "12 wk".to_string(),
            ..PhysicalExaminationType::default()
        }
    }

    fn exam_with(mask: u32) -> MedicalHistoryAndPhysicalExam {
        let mut exam = MedicalHistoryAndPhysicalExam::new();
        if mask & 1 != 0 {
            exam.set_current_pregnancy(sample_current_pregnancy());
        }
        if mask & 2 != 0 {
            exam.set_medical_history(sample_medical_history());
        }
        if mask & 4 != 0 {
            exam.add_new_generic_history().genetic_disorders = YesNoNullType::unknown();
        }
        if mask & 8 != 0 {
            let infectious = exam.add_new_infectious_disease();
            infectious.varicella = YesNoNullType::yes();
            infectious.other_descr = "GBS in prior pregnancy".to_string();
        }
        if mask & 16 != 0 {
            exam.add_new_psychosocial().parenting_concerns = YesNoNullType::no();
        }
        if mask & 32 != 0 {
            exam.add_new_family_history().at_risk = YesNoNullType::yes();
        }
        if mask & 64 != 0 {
            exam.set_physical_examination(sample_physical_examination());
        }
        exam
    }

    #[test]
    fn test_round_trip_every_presence_combination() {
        for mask in 0..128 {
            let exam = exam_with(mask);
            let xml = exam.to_xml_string().unwrap();
            let parsed = MedicalHistoryAndPhysicalExam::parse_str(&xml).unwrap();
            assert_eq!(parsed, exam, "mask {:#09b}", mask);
        }
    }

    #[test]
    fn test_add_set_clear() {
        let mut exam = MedicalHistoryAndPhysicalExam::new();
        assert!(exam.psychosocial.is_none());

        exam.add_new_psychosocial().substance_abuse = YesNoNullType::no();
        assert_eq!(
            exam.psychosocial.as_ref().unwrap().substance_abuse,
            YesNoNullType::no()
        );

        exam.add_new_psychosocial();
        assert_eq!(exam.psychosocial, Some(PsychosocialType::new()));

        exam.clear_psychosocial();
        assert!(exam.psychosocial.is_none());
        assert_eq!(exam, MedicalHistoryAndPhysicalExam::new());
    }

    #[test]
    fn test_empty_substructures_written_in_schema_order() {
        let mut exam = MedicalHistoryAndPhysicalExam::new();
        exam.add_new_physical_examination();
        exam.add_new_family_history();

        let xml = exam.to_xml_string().unwrap();
        let family = xml.find("<familyHistory>").unwrap();
        let physical = xml.find("<physicalExamination>").unwrap();
        assert!(family < physical);
        assert!(xml.contains("<height xsi:nil=\"true\"/>"));
        assert!(xml.contains("<atRisk/>"));
    }

    #[test]
    fn test_current_pregnancy_requires_cigs_code() {
        let mut exam = MedicalHistoryAndPhysicalExam::new();
        exam.add_new_current_pregnancy();

        match exam.to_xml_string() {
            Err(Error::MissingField(path)) => {
                assert_eq!(path, "medicalHistoryAndPhysicalExam/currentPregnancy/cigsPerDay")
            }
            other => panic!("expected missing field, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_cigs_code() {
        let mut pregnancy = sample_current_pregnancy();
        pregnancy.cigs_per_day = Some(CigsPerDay::Over20);
        let xml = pregnancy
            .to_xml_string()
            .unwrap()
            .replace(">OVER20<", ">MANY<");

        match CurrentPregnancyType::parse_str(&xml) {
            Err(Error::InvalidEnumeration { element, value }) => {
                assert_eq!(element, "currentPregnancy/cigsPerDay");
                assert_eq!(value, "MANY");
            }
            other => panic!("expected invalid enumeration, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_cigs_code_round_trips() {
        let mut pregnancy = sample_current_pregnancy();
        pregnancy.cigs_per_day = Some(CigsPerDay::Unspecified);

        let xml = pregnancy.to_xml_string().unwrap();
        assert!(xml.contains("<cigsPerDay/>"));
        assert_eq!(CurrentPregnancyType::parse_str(&xml).unwrap(), pregnancy);
    }

    #[test]
    fn test_nil_weight_round_trips() {
        let mut exam = sample_physical_examination();
        exam.weight = None;

        let xml = exam.to_xml_string().unwrap();
        assert!(xml.contains("<weight xsi:nil=\"true\"/>"));
        let parsed = PhysicalExaminationType::parse_str(&xml).unwrap();
        assert_eq!(parsed.weight, None);
        assert_eq!(parsed.height, Some(165.5));
    }

    #[test]
    fn test_abnormal_findings() {
        let exam = sample_physical_examination();
        assert_eq!(exam.abnormal_findings(), vec!["varicosities"]);
        assert!(PhysicalExaminationType::new().abnormal_findings().is_empty());
    }

    #[test]
    fn test_parse_rejects_unknown_section() {
        let xml = r#"<medicalHistoryAndPhysicalExam xmlns="http://www.oscarmcmaster.org/AR2005">
  <surgicalHistory/>
</medicalHistoryAndPhysicalExam>"#;
        let err = MedicalHistoryAndPhysicalExam::parse_str(xml).unwrap_err();
        match err {
            Error::UnexpectedElement(path) => {
                assert_eq!(path, "medicalHistoryAndPhysicalExam/surgicalHistory")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_requires_checklist_entries() {
        let xml = "<familyHistory/>";
        let err = FamilyHistoryType::parse_str(xml).unwrap_err();
        assert!(matches!(err, Error::MissingField(ref p) if p == "familyHistory/atRisk"));
    }
}

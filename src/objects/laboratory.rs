//! Laboratory investigations: the initial panel and the additional labs
//! recorded on the AR2 form.

use super::common::CustomLab;
use super::vocabulary::{AboResult, BloodGroup, Gbs, HivResult, RhFactor, ScreeningResult};
use crate::binding::{Fields, XmlBinding};
use crate::error::Result;
use crate::reader::XmlElement;
use crate::writer::ElementWriter;
use chrono::NaiveDate;
use std::io::Write;

/// Prenatal genetic screening (`prenatalGenericScreening` on the wire).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrenatalGeneticScreeningType {
    /// MSS / IPS / FTS result
    pub mss_ips_fts: String,
    /// EDB / CVS result
    pub edb_cvs: String,
    /// MSAFP result
    pub msafp: String,
    /// Additional screen
    pub custom_lab1: CustomLab,
    /// Screening declined
    pub declined: bool,
}

impl PrenatalGeneticScreeningType {
    /// Creates an empty screening record.
    pub fn new() -> Self {
        Self::default()
    }
}

impl XmlBinding for PrenatalGeneticScreeningType {
    const ROOT_ELEMENT: &'static str = "prenatalGenericScreening";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(
            element,
            &["MSS_IPS_FTS", "EDB_CVS", "MSAFP", "customLab1", "declined"],
        )?;
        Ok(Self {
            mss_ips_fts: f.string("MSS_IPS_FTS")?,
            edb_cvs: f.string("EDB_CVS")?,
            msafp: f.string("MSAFP")?,
            custom_lab1: f.child("customLab1")?,
            declined: f.boolean("declined")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.string("MSS_IPS_FTS", &self.mss_ips_fts)?;
        out.string("EDB_CVS", &self.edb_cvs)?;
        out.string("MSAFP", &self.msafp)?;
        out.child("customLab1", &self.custom_lab1)?;
        out.boolean("declined", self.declined)
    }
}

/// Initial laboratory investigations.
///
/// Coded results (`hivResult`, `aboResult`, `rhResult` and the screens) are
/// required by the schema; they are `Option` here only so an instance can be
/// built incrementally, and writing one that is still `None` fails.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InitialLaboratoryInvestigations {
    /// Hemoglobin
    pub hb_result: String,
    /// HIV
    pub hiv_result: Option<HivResult>,
    /// HIV counselling given
    pub hiv_counsel: bool,
    /// Last Pap date; nillable
    pub last_pap_date: Option<NaiveDate>,
    /// Pap result
    pub pap_result: String,
    /// Mean corpuscular volume; nillable
    pub mcv_result: Option<f32>,
    /// ABO group
    pub abo_result: Option<AboResult>,
    /// Rh factor
    pub rh_result: Option<RhFactor>,
    /// Antibody screen
    pub antibody_result: String,
    /// Gonorrhea
    pub gc_result_gonorrhea: Option<ScreeningResult>,
    /// Chlamydia
    pub gc_result_chlamydia: Option<ScreeningResult>,
    /// Rubella immunity
    pub rubella_result: String,
    /// Urine culture
    pub urine_result: String,
    /// Hepatitis B surface antigen
    pub hbs_ag_result: Option<ScreeningResult>,
    /// Syphilis (VDRL)
    pub vdrl_result: Option<ScreeningResult>,
    /// Sickle cell
    pub sickle_cell_result: Option<ScreeningResult>,
    /// Prenatal genetic screening
    pub prenatal_generic_screening: PrenatalGeneticScreeningType,
    /// Custom lab 1
    pub custom_lab1: CustomLab,
    /// Custom lab 2
    pub custom_lab2: CustomLab,
}

impl InitialLaboratoryInvestigations {
    /// Creates an empty panel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Screens reported positive, by element name.
    pub fn positive_screens(&self) -> Vec<&'static str> {
        [
            ("gcResultGonorrhea", self.gc_result_gonorrhea),
            ("gcResultChlamydia", self.gc_result_chlamydia),
            ("hbsAgResult", self.hbs_ag_result),
            ("vdrlResult", self.vdrl_result),
            ("sickleCellResult", self.sickle_cell_result),
        ]
        .into_iter()
        .filter(|(_, result)| *result == Some(ScreeningResult::Positive))
        .map(|(name, _)| name)
        .collect()
    }
}

impl XmlBinding for InitialLaboratoryInvestigations {
    const ROOT_ELEMENT: &'static str = "initialLaboratoryInvestigations";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(
            element,
            &[
                "hbResult",
                "hivResult",
                "hivCounsel",
                "lastPapDate",
                "papResult",
                "mcvResult",
                "aboResult",
                "rhResult",
                "antibodyResult",
                "gcResultGonorrhea",
                "gcResultChlamydia",
                "rubellaResult",
                "urineResult",
                "hbsAgResult",
                "vdrlResult",
                "sickleCellResult",
                "prenatalGenericScreening",
                "customLab1",
                "customLab2",
            ],
        )?;
        Ok(Self {
            hb_result: f.string("hbResult")?,
            hiv_result: Some(f.code("hivResult")?),
            hiv_counsel: f.boolean("hivCounsel")?,
            last_pap_date: f.nillable_date("lastPapDate")?,
            pap_result: f.string("papResult")?,
            mcv_result: f.nillable_float("mcvResult")?,
            abo_result: Some(f.code("aboResult")?),
            rh_result: Some(f.code("rhResult")?),
            antibody_result: f.string("antibodyResult")?,
            gc_result_gonorrhea: Some(f.code("gcResultGonorrhea")?),
            gc_result_chlamydia: Some(f.code("gcResultChlamydia")?),
            rubella_result: f.string("rubellaResult")?,
            urine_result: f.string("urineResult")?,
            hbs_ag_result: Some(f.code("hbsAgResult")?),
            vdrl_result: Some(f.code("vdrlResult")?),
            sickle_cell_result: Some(f.code("sickleCellResult")?),
            prenatal_generic_screening: f.child("prenatalGenericScreening")?,
            custom_lab1: f.child("customLab1")?,
            custom_lab2: f.child("customLab2")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.string("hbResult", &self.hb_result)?;
        out.code("hivResult", self.hiv_result)?;
        out.boolean("hivCounsel", self.hiv_counsel)?;
        out.nillable_date("lastPapDate", self.last_pap_date)?;
        out.string("papResult", &self.pap_result)?;
        out.nillable_float("mcvResult", self.mcv_result)?;
        out.code("aboResult", self.abo_result)?;
        out.code("rhResult", self.rh_result)?;
        out.string("antibodyResult", &self.antibody_result)?;
        out.code("gcResultGonorrhea", self.gc_result_gonorrhea)?;
        out.code("gcResultChlamydia", self.gc_result_chlamydia)?;
        out.string("rubellaResult", &self.rubella_result)?;
        out.string("urineResult", &self.urine_result)?;
        out.code("hbsAgResult", self.hbs_ag_result)?;
        out.code("vdrlResult", self.vdrl_result)?;
        out.code("sickleCellResult", self.sickle_cell_result)?;
        out.child("prenatalGenericScreening", &self.prenatal_generic_screening)?;
        out.child("customLab1", &self.custom_lab1)?;
        out.child("customLab2", &self.custom_lab2)
    }
}

/// Additional lab investigations recorded during follow-up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdditionalLabInvestigationsType {
    /// Hemoglobin
    pub hb: String,
    /// Blood group; required when written
    pub blood_group: Option<BloodGroup>,
    /// Rh factor; required when written
    pub rh: Option<RhFactor>,
    /// Repeat antibody screen
    pub repeat_abs: String,
    /// Glucose challenge test
    pub gct: String,
    /// Glucose tolerance test
    pub gtt: String,
    /// Group B strep; required when written
    pub gbs: Option<Gbs>,
    /// Custom lab 1
    pub custom_lab1: CustomLab,
    /// Custom lab 2
    pub custom_lab2: CustomLab,
    /// Custom lab 3
    pub custom_lab3: CustomLab,
    /// Custom lab 4
    pub custom_lab4: CustomLab,
}

impl AdditionalLabInvestigationsType {
    /// Creates an empty set of additional labs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Custom labs that have a label or result filled in.
    pub fn custom_labs(&self) -> impl Iterator<Item = &CustomLab> {
        [
            &self.custom_lab1,
            &self.custom_lab2,
            &self.custom_lab3,
            &self.custom_lab4,
        ]
        .into_iter()
        .filter(|lab| !lab.is_blank())
    }
}

impl XmlBinding for AdditionalLabInvestigationsType {
    const ROOT_ELEMENT: &'static str = "additionalLabInvestigations";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(
            element,
            &[
                "hb",
                "bloodGroup",
                "rh",
                "repeatABS",
                "GCT",
                "GTT",
                "GBS",
                "customLab1",
                "customLab2",
                "customLab3",
                "customLab4",
            ],
        )?;
        Ok(Self {
            hb: f.string("hb")?,
            blood_group: Some(f.code("bloodGroup")?),
            rh: Some(f.code("rh")?),
            repeat_abs: f.string("repeatABS")?,
            gct: f.string("GCT")?,
            gtt: f.string("GTT")?,
            gbs: Some(f.code("GBS")?),
            custom_lab1: f.child("customLab1")?,
            custom_lab2: f.child("customLab2")?,
            custom_lab3: f.child("customLab3")?,
            custom_lab4: f.child("customLab4")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.string("hb", &self.hb)?;
        out.code("bloodGroup", self.blood_group)?;
        out.code("rh", self.rh)?;
        out.string("repeatABS", &self.repeat_abs)?;
        out.string("GCT", &self.gct)?;
        out.string("GTT", &self.gtt)?;
        out.code("GBS", self.gbs)?;
        out.child("customLab1", &self.custom_lab1)?;
        out.child("customLab2", &self.custom_lab2)?;
        out.child("customLab3", &self.custom_lab3)?;
        out.child("customLab4", &self.custom_lab4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn sample_initial() -> InitialLaboratoryInvestigations {
        InitialLaboratoryInvestigations {
            hb_result: "128".to_string(),
            hiv_result: Some(HivResult::Negative),
            hiv_counsel: true,
            last_pap_date: NaiveDate::from_ymd_opt(2023, 6, 14),
            pap_result: "normal".to_string(),
            mcv_result: None,
            abo_result: Some(AboResult::O),
            rh_result: Some(RhFactor::Negative),
            antibody_result: "neg".to_string(),
            gc_result_gonorrhea: Some(ScreeningResult::Negative),
            gc_result_chlamydia: Some(ScreeningResult::Positive),
            rubella_result: "immune".to_string(),
            urine_result: "no growth".to_string(),
            hbs_ag_result: Some(ScreeningResult::Negative),
            vdrl_result: Some(ScreeningResult::NotDone),
            sickle_cell_result: Some(ScreeningResult::Unknown),
            prenatal_generic_screening: PrenatalGeneticScreeningType {
                declined: true,
                ..PrenatalGeneticScreeningType::default()
            },
            custom_lab1: CustomLab::new("TSH", "2.1"),
            custom_lab2: CustomLab::default(),
        }
    }

    #[test]
    fn test_initial_labs_round_trip() {
        let labs = sample_initial();
        let xml = labs.to_xml_string().unwrap();

        assert!(xml.contains("<hivResult>NEG</hivResult>"));
        assert!(xml.contains("<rhResult>NEG</rhResult>"));
        assert!(xml.contains("<mcvResult xsi:nil=\"true\"/>"));
        assert!(xml.contains("<declined>true</declined>"));
        assert_eq!(InitialLaboratoryInvestigations::parse_str(&xml).unwrap(), labs);
    }

    #[test]
    fn test_initial_labs_reject_unknown_code() {
        let xml = sample_initial()
            .to_xml_string()
            .unwrap()
            .replace("<aboResult>O</aboResult>", "<aboResult>UN</aboResult>");
        match InitialLaboratoryInvestigations::parse_str(&xml) {
            Err(Error::InvalidEnumeration { element, value }) => {
                assert_eq!(element, "initialLaboratoryInvestigations/aboResult");
                assert_eq!(value, "UN");
            }
            other => panic!("expected invalid enumeration, got {:?}", other),
        }
    }

    #[test]
    fn test_initial_labs_missing_code_on_write() {
        let mut labs = sample_initial();
        labs.hbs_ag_result = None;
        match labs.to_xml_string() {
            Err(Error::MissingField(path)) => {
                assert_eq!(path, "initialLaboratoryInvestigations/hbsAgResult")
            }
            other => panic!("expected missing field, got {:?}", other),
        }
    }

    #[test]
    fn test_positive_screens() {
        assert_eq!(sample_initial().positive_screens(), vec!["gcResultChlamydia"]);
    }

    #[test]
    fn test_additional_labs_round_trip() {
        let labs = AdditionalLabInvestigationsType {
            hb: "115".to_string(),
            blood_group: Some(BloodGroup::Ab),
            rh: Some(RhFactor::WeakPositive),
            gct: "7.2".to_string(),
            gbs: Some(Gbs::NegativeSwab),
            custom_lab3: CustomLab::new("Ferritin", "9"),
            ..AdditionalLabInvestigationsType::default()
        };

        let xml = labs.to_xml_string().unwrap();
        assert!(xml.contains("<GBS>NEGSWAB</GBS>"));
        assert!(xml.contains("<repeatABS/>"));

        let parsed = AdditionalLabInvestigationsType::parse_str(&xml).unwrap();
        assert_eq!(parsed, labs);

        let filled: Vec<_> = parsed.custom_labs().map(|lab| lab.label.as_str()).collect();
        assert_eq!(filled, vec!["Ferritin"]);
    }

    #[test]
    fn test_blood_group_codes_differ_from_abo_result() {
        let labs = AdditionalLabInvestigationsType {
            blood_group: Some(BloodGroup::NotDone),
            rh: Some(RhFactor::NotDone),
            gbs: Some(Gbs::NotDone),
            ..AdditionalLabInvestigationsType::default()
        };
        let xml = labs.to_xml_string().unwrap();
        assert!(xml.contains("<bloodGroup>ND</bloodGroup>"));

        let bad = xml.replace("<bloodGroup>ND</bloodGroup>", "<bloodGroup>NDONE</bloodGroup>");
        assert!(matches!(
            AdditionalLabInvestigationsType::parse_str(&bad),
            Err(Error::InvalidEnumeration { .. })
        ));
    }
}

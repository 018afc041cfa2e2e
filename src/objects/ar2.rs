//! The AR2 form: risk factors, follow-up visits, ultrasounds, additional
//! labs, discussion topics and sign-off.

use super::laboratory::AdditionalLabInvestigationsType;
use super::signature::SignatureType;
use crate::binding::{Fields, XmlBinding};
use crate::error::Result;
use crate::reader::XmlElement;
use crate::writer::ElementWriter;
use chrono::NaiveDate;
use std::io::Write;

/// An identified risk factor and its management plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiskFactorItemType {
    /// Risk factor
    pub risk_factor: String,
    /// Plan of management
    pub plan_of_management: String,
}

impl RiskFactorItemType {
    /// Creates a risk factor entry.
    pub fn new(risk_factor: impl Into<String>, plan_of_management: impl Into<String>) -> Self {
        Self {
            risk_factor: risk_factor.into(),
            plan_of_management: plan_of_management.into(),
        }
    }
}

impl XmlBinding for RiskFactorItemType {
    const ROOT_ELEMENT: &'static str = "riskFactorList";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(element, &["riskFactor", "planOfManagement"])?;
        Ok(Self {
            risk_factor: f.string("riskFactor")?,
            plan_of_management: f.string("planOfManagement")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.string("riskFactor", &self.risk_factor)?;
        out.string("planOfManagement", &self.plan_of_management)
    }
}

/// Recommended immunoprophylaxis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecommendedImmunoprophylaxisType {
    /// Mother is Rh negative
    pub rh_negative: bool,
    /// Date Rh immune globulin was given; nillable
    pub rh_ig_given: Option<NaiveDate>,
    /// Rubella vaccine recommended postpartum
    pub rubella: bool,
    /// Newborn hepatitis B immune globulin
    pub newborn_hep_ig: bool,
    /// Hepatitis B vaccine
    pub hep_b_vaccine: bool,
}

impl RecommendedImmunoprophylaxisType {
    /// Creates an empty recommendation.
    pub fn new() -> Self {
        Self::default()
    }
}

impl XmlBinding for RecommendedImmunoprophylaxisType {
    const ROOT_ELEMENT: &'static str = "recommendedImmunoprophylaxis";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(
            element,
            &["rhNegative", "rhIgGiven", "rubella", "newbornHepIG", "hepBVaccine"],
        )?;
        Ok(Self {
            rh_negative: f.boolean("rhNegative")?,
            rh_ig_given: f.nillable_date("rhIgGiven")?,
            rubella: f.boolean("rubella")?,
            newborn_hep_ig: f.boolean("newbornHepIG")?,
            hep_b_vaccine: f.boolean("hepBVaccine")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.boolean("rhNegative", self.rh_negative)?;
        out.nillable_date("rhIgGiven", self.rh_ig_given)?;
        out.boolean("rubella", self.rubella)?;
        out.boolean("newbornHepIG", self.newborn_hep_ig)?;
        out.boolean("hepBVaccine", self.hep_b_vaccine)
    }
}

/// One follow-up visit row.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubsequentVisitItemType {
    /// Visit date; nillable
    pub date: Option<NaiveDate>,
    /// Gestational age as entered
    pub ga: String,
    /// Weight (kg); nillable
    pub weight: Option<f32>,
    /// Blood pressure
    pub bp: String,
    /// Urine protein
    pub urine_pr: String,
    /// Urine glucose
    pub urine_gi: String,
    /// Symphysis-fundal height
    pub sfh: String,
    /// Presentation and position
    pub presentation_position: String,
    /// Fetal heart rate and movement
    pub fhr_fm: String,
    /// Comments
    pub comments: String,
}

impl SubsequentVisitItemType {
    /// Creates an empty visit row.
    pub fn new() -> Self {
        Self::default()
    }
}

impl XmlBinding for SubsequentVisitItemType {
    const ROOT_ELEMENT: &'static str = "subsequentVisitList";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(
            element,
            &[
                "date",
                "ga",
                "weight",
                "bp",
                "urinePR",
                "urineGI",
                "SFH",
                "presentation_position",
                "FHR_fm",
                "comments",
            ],
        )?;
        Ok(Self {
            date: f.nillable_date("date")?,
            ga: f.string("ga")?,
            weight: f.nillable_float("weight")?,
            bp: f.string("bp")?,
            urine_pr: f.string("urinePR")?,
            urine_gi: f.string("urineGI")?,
            sfh: f.string("SFH")?,
            presentation_position: f.string("presentation_position")?,
            fhr_fm: f.string("FHR_fm")?,
            comments: f.string("comments")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.nillable_date("date", self.date)?;
        out.string("ga", &self.ga)?;
        out.nillable_float("weight", self.weight)?;
        out.string("bp", &self.bp)?;
        out.string("urinePR", &self.urine_pr)?;
        out.string("urineGI", &self.urine_gi)?;
        out.string("SFH", &self.sfh)?;
        out.string("presentation_position", &self.presentation_position)?;
        out.string("FHR_fm", &self.fhr_fm)?;
        out.string("comments", &self.comments)
    }
}

/// An ultrasound result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UltrasoundType {
    /// Scan date; required when written
    pub date: Option<NaiveDate>,
    /// Gestational age at scan
    pub ga: String,
    /// Findings
    pub results: String,
}

impl UltrasoundType {
    /// Creates an empty ultrasound entry.
    pub fn new() -> Self {
        Self::default()
    }
}

impl XmlBinding for UltrasoundType {
    const ROOT_ELEMENT: &'static str = "ultrasound";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(element, &["date", "ga", "results"])?;
        Ok(Self {
            date: Some(f.date("date")?),
            ga: f.string("ga")?,
            results: f.string("results")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.required_date("date", self.date)?;
        out.string("ga", &self.ga)?;
        out.string("results", &self.results)
    }
}

/// Topics discussed with the patient during prenatal care.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscussionTopicsType {
    /// Exercise
    pub exercise: bool,
    /// Work plan
    pub work_plan: bool,
    /// Intercourse
    pub intercourse: bool,
    /// Travel
    pub travel: bool,
    /// Prenatal classes
    pub prenatal_classes: bool,
    /// Birth plan
    pub birth_plan: bool,
    /// On-call providers
    pub on_call_providers: bool,
    /// Signs of preterm labour
    pub preterm_labour: bool,
    /// Premature rupture of membranes
    pub prom: bool,
    /// Antepartum hemorrhage
    pub aph: bool,
    /// Fetal movement
    pub fetal_movement: bool,
    /// When to come to hospital
    pub admission_timing: bool,
    /// Pain management
    pub pain_management: bool,
    /// Labour support
    pub labour_support: bool,
    /// Breast feeding
    pub breast_feeding: bool,
    /// Circumcision
    pub circumcision: bool,
    /// Discharge planning
    pub discharge_planning: bool,
    /// Car seat safety
    pub car_seat_safety: bool,
    /// Postpartum depression
    pub depression: bool,
    /// Contraception
    pub contraception: bool,
    /// Postpartum care
    pub postpartum_care: bool,
}

const DISCUSSION_TOPICS: [&str; 21] = [
    "exercise",
    "workPlan",
    "intercourse",
    "travel",
    "prenatalClasses",
    "birthPlan",
    "onCallProviders",
    "pretermLabour",
    "PROM",
    "APH",
    "fetalMovement",
    "admissionTiming",
    "painManagement",
    "labourSupport",
    "breastFeeding",
    "circumcision",
    "dischargePlanning",
    "carSeatSafety",
    "depression",
    "contraception",
    "postpartumCare",
];

impl DiscussionTopicsType {
    /// Every topic as `(element name, discussed)`, in form order.
    pub fn topics(&self) -> [(&'static str, bool); 21] {
        let values = [
            self.exercise,
            self.work_plan,
            self.intercourse,
            self.travel,
            self.prenatal_classes,
            self.birth_plan,
            self.on_call_providers,
            self.preterm_labour,
            self.prom,
            self.aph,
            self.fetal_movement,
            self.admission_timing,
            self.pain_management,
            self.labour_support,
            self.breast_feeding,
            self.circumcision,
            self.discharge_planning,
            self.car_seat_safety,
            self.depression,
            self.contraception,
            self.postpartum_care,
        ];
        let mut topics = [("", false); 21];
        for (slot, (name, value)) in topics
            .iter_mut()
            .zip(DISCUSSION_TOPICS.iter().zip(values))
        {
            *slot = (*name, value);
        }
        topics
    }

    /// Element names of the topics not yet discussed.
    pub fn outstanding(&self) -> Vec<&'static str> {
        self.topics()
            .into_iter()
            .filter(|(_, discussed)| !discussed)
            .map(|(name, _)| name)
            .collect()
    }
}

impl XmlBinding for DiscussionTopicsType {
    const ROOT_ELEMENT: &'static str = "discussionTopics";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(element, &DISCUSSION_TOPICS)?;
        Ok(Self {
            exercise: f.boolean("exercise")?,
            work_plan: f.boolean("workPlan")?,
            intercourse: f.boolean("intercourse")?,
            travel: f.boolean("travel")?,
            prenatal_classes: f.boolean("prenatalClasses")?,
            birth_plan: f.boolean("birthPlan")?,
            on_call_providers: f.boolean("onCallProviders")?,
            preterm_labour: f.boolean("pretermLabour")?,
            prom: f.boolean("PROM")?,
            aph: f.boolean("APH")?,
            fetal_movement: f.boolean("fetalMovement")?,
            admission_timing: f.boolean("admissionTiming")?,
            pain_management: f.boolean("painManagement")?,
            labour_support: f.boolean("labourSupport")?,
            breast_feeding: f.boolean("breastFeeding")?,
            circumcision: f.boolean("circumcision")?,
            discharge_planning: f.boolean("dischargePlanning")?,
            car_seat_safety: f.boolean("carSeatSafety")?,
            depression: f.boolean("depression")?,
            contraception: f.boolean("contraception")?,
            postpartum_care: f.boolean("postpartumCare")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        for (name, discussed) in self.topics() {
            out.boolean(name, discussed)?;
        }
        Ok(())
    }
}

/// The AR2 form.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AR2 {
    /// Risk factors, one `<riskFactorList>` each
    pub risk_factor_list: Vec<RiskFactorItemType>,
    /// Recommended immunoprophylaxis
    pub recommended_immunoprophylaxis: RecommendedImmunoprophylaxisType,
    /// Follow-up visits, one `<subsequentVisitList>` each
    pub subsequent_visit_list: Vec<SubsequentVisitItemType>,
    /// Ultrasounds
    pub ultrasound: Vec<UltrasoundType>,
    /// Additional lab investigations
    pub additional_lab_investigations: AdditionalLabInvestigationsType,
    /// Discussion topics
    pub discussion_topics: DiscussionTopicsType,
    /// Sign-off
    pub signatures: SignatureType,
}

impl AR2 {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an empty visit row and returns it.
    pub fn add_new_subsequent_visit(&mut self) -> &mut SubsequentVisitItemType {
        self.subsequent_visit_list.push(SubsequentVisitItemType::new());
        let last = self.subsequent_visit_list.len() - 1;
        &mut self.subsequent_visit_list[last]
    }

    /// Most recent dated visit.
    pub fn latest_visit(&self) -> Option<&SubsequentVisitItemType> {
        self.subsequent_visit_list
            .iter()
            .filter(|visit| visit.date.is_some())
            .max_by_key(|visit| visit.date)
    }
}

impl XmlBinding for AR2 {
    const ROOT_ELEMENT: &'static str = "AR2";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(
            element,
            &[
                "riskFactorList",
                "recommendedImmunoprophylaxis",
                "subsequentVisitList",
                "ultrasound",
                "additionalLabInvestigations",
                "discussionTopics",
                "signatures",
            ],
        )?;
        Ok(Self {
            risk_factor_list: f.repeated("riskFactorList")?,
            recommended_immunoprophylaxis: f.child("recommendedImmunoprophylaxis")?,
            subsequent_visit_list: f.repeated("subsequentVisitList")?,
            ultrasound: f.repeated("ultrasound")?,
            additional_lab_investigations: f.child("additionalLabInvestigations")?,
            discussion_topics: f.child("discussionTopics")?,
            signatures: f.child("signatures")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.repeated("riskFactorList", &self.risk_factor_list)?;
        out.child(
            "recommendedImmunoprophylaxis",
            &self.recommended_immunoprophylaxis,
        )?;
        out.repeated("subsequentVisitList", &self.subsequent_visit_list)?;
        out.repeated("ultrasound", &self.ultrasound)?;
        out.child(
            "additionalLabInvestigations",
            &self.additional_lab_investigations,
        )?;
        out.child("discussionTopics", &self.discussion_topics)?;
        out.child("signatures", &self.signatures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::objects::{BloodGroup, CustomLab, Gbs, RhFactor};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn sample_ar2() -> AR2 {
        let mut ar2 = AR2::new();
        ar2.risk_factor_list
            .push(RiskFactorItemType::new("Rh negative", "WinRho at 28 wk"));
        ar2.risk_factor_list
            .push(RiskFactorItemType::new("Previous CS", "Discuss VBAC"));

        ar2.recommended_immunoprophylaxis = RecommendedImmunoprophylaxisType {
            rh_negative: true,
            rh_ig_given: Some(date(7, 20)),
            ..RecommendedImmunoprophylaxisType::default()
        };

        let visit = ar2.add_new_subsequent_visit();
        visit.date = Some(date(5, 2));
        visit.ga = "16+1".to_string();
        visit.weight = Some(64.5);
        visit.bp = "110/70".to_string();

        let visit = ar2.add_new_subsequent_visit();
        visit.date = Some(date(6, 3));
        visit.ga = "20+3".to_string();
        visit.fhr_fm = "145".to_string();

        ar2.add_new_subsequent_visit().comments = "phone follow-up".to_string();

        ar2.ultrasound.push(UltrasoundType {
            date: Some(date(5, 30)),
            ga: "19+6".to_string(),
            results: "anatomy normal, placenta posterior".to_string(),
        });

        ar2.additional_lab_investigations = AdditionalLabInvestigationsType {
            blood_group: Some(BloodGroup::O),
            rh: Some(RhFactor::Negative),
            gbs: Some(Gbs::NotDone),
            custom_lab1: CustomLab::new("Ferritin", "22"),
            ..AdditionalLabInvestigationsType::default()
        };

        ar2.discussion_topics.exercise = true;
        ar2.discussion_topics.prom = true;
        ar2.discussion_topics.postpartum_care = true;

        ar2.signatures.set_signature("Dr. A. Smith");
        ar2.signatures.set_date(date(6, 3));
        ar2
    }

    #[test]
    fn test_ar2_round_trip() {
        let ar2 = sample_ar2();
        let xml = ar2.to_xml_string().unwrap();

        assert!(xml.contains("<AR2 xmlns=\"http://www.oscarmcmaster.org/AR2005\""));
        assert_eq!(xml.matches("<riskFactorList>").count(), 2);
        assert_eq!(xml.matches("<subsequentVisitList>").count(), 3);
        assert!(xml.contains("<PROM>true</PROM>"));
        assert!(xml.contains("<APH>false</APH>"));

        let parsed = AR2::parse_str(&xml).unwrap();
        assert_eq!(parsed, ar2);
    }

    #[test]
    fn test_ar2_compact_round_trip() {
        let ar2 = sample_ar2();
        let xml = crate::writer::to_string_compact(&ar2).unwrap();
        assert_eq!(AR2::parse_str(&xml).unwrap(), ar2);
    }

    #[test]
    fn test_nil_visit_fields_round_trip() {
        let ar2 = sample_ar2();
        let xml = ar2.to_xml_string().unwrap();
        assert!(xml.contains("<date xsi:nil=\"true\"/>"));

        let parsed = AR2::parse_str(&xml).unwrap();
        assert_eq!(parsed.subsequent_visit_list[1].weight, None);
        assert_eq!(parsed.subsequent_visit_list[2].date, None);
    }

    #[test]
    fn test_latest_visit() {
        let ar2 = sample_ar2();
        assert_eq!(ar2.latest_visit().unwrap().ga, "20+3");
        assert!(AR2::new().latest_visit().is_none());
    }

    #[test]
    fn test_outstanding_topics() {
        let topics = sample_ar2().discussion_topics;
        let outstanding = topics.outstanding();

        assert_eq!(outstanding.len(), 18);
        assert!(!outstanding.contains(&"PROM"));
        assert!(outstanding.contains(&"APH"));
        assert_eq!(topics.topics()[8], ("PROM", true));
    }

    #[test]
    fn test_ar2_requires_signatures() {
        let xml = sample_ar2().to_xml_string().unwrap();
        let start = xml.find("<signatures>").unwrap();
        let end = xml.find("</signatures>").unwrap() + "</signatures>".len();
        let without = format!("{}{}", &xml[..start], &xml[end..]);

        match AR2::parse_str(&without) {
            Err(Error::MissingField(path)) => assert_eq!(path, "AR2/signatures"),
            other => panic!("expected missing field, got {:?}", other),
        }
    }

    #[test]
    fn test_ultrasound_requires_date_on_write() {
        let mut ar2 = sample_ar2();
        ar2.ultrasound.push(UltrasoundType::default());
        match ar2.to_xml_string() {
            Err(Error::MissingField(path)) => assert_eq!(path, "AR2/ultrasound/date"),
            other => panic!("expected missing field, got {:?}", other),
        }
    }

    #[test]
    fn test_unsigned_ar2_is_not_writable() {
        let mut ar2 = sample_ar2();
        ar2.signatures = SignatureType::new();
        assert!(matches!(
            ar2.to_xml_string(),
            Err(Error::MissingField(ref p)) if p == "AR2/signatures/signature"
        ));
    }
}

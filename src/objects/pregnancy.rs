//! Pregnancy and obstetrical history.

use super::common::YesNoNullType;
use super::vocabulary::{Sex, TypeOfDelivery};
use crate::binding::{Fields, XmlBinding};
use crate::error::Result;
use crate::reader::XmlElement;
use crate::writer::ElementWriter;
use chrono::NaiveDate;
use std::io::Write;

/// Methods used to establish the estimated date of birth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DatingMethods {
    /// Dating by menstrual dates
    pub dates: bool,
    /// First-trimester ultrasound
    pub t1_us: bool,
    /// Second-trimester ultrasound
    pub t2_us: bool,
    /// Assisted reproductive technology
    pub art: bool,
}

impl DatingMethods {
    /// Creates dating methods with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }
}

impl XmlBinding for DatingMethods {
    const ROOT_ELEMENT: &'static str = "datingMethods";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(element, &["dates", "t1US", "t2US", "art"])?;
        Ok(Self {
            dates: f.boolean("dates")?,
            t1_us: f.boolean("t1US")?,
            t2_us: f.boolean("t2US")?,
            art: f.boolean("art")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.boolean("dates", self.dates)?;
        out.boolean("t1US", self.t1_us)?;
        out.boolean("t2US", self.t2_us)?;
        out.boolean("art", self.art)
    }
}

/// Menstrual and pregnancy history, including the dating of this pregnancy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PregnancyHistory {
    /// Last menstrual period; nillable
    pub lmp: Option<NaiveDate>,
    /// LMP certain
    pub lmp_certain: YesNoNullType,
    /// Menstrual cycle length as entered
    pub men_cycle: String,
    /// Cycle regular
    pub men_cycle_regular: YesNoNullType,
    /// Contraceptive type, omitted when not recorded
    pub contraceptive_type: Option<String>,
    /// Contraceptive last used; nillable
    pub contraceptive_last_used: Option<NaiveDate>,
    /// EDB by menstrual dates; nillable
    pub menstrual_edb: Option<NaiveDate>,
    /// Final estimated date of birth; required when written
    pub final_edb: Option<NaiveDate>,
    /// How the final EDB was established
    pub dating_methods: DatingMethods,
    /// Gravida
    pub gravida: i32,
    /// Term births
    pub term: i32,
    /// Premature births
    pub premature: i32,
    /// Abortuses
    pub abortuses: i32,
    /// Living children
    pub living: i32,
}

impl PregnancyHistory {
    /// Creates an empty pregnancy history.
    pub fn new() -> Self {
        Self::default()
    }

    /// GTPAL summary, e.g. `G3 T1 P0 A1 L1`.
    pub fn gtpal(&self) -> String {
        format!(
            "G{} T{} P{} A{} L{}",
            self.gravida, self.term, self.premature, self.abortuses, self.living
        )
    }
}

impl XmlBinding for PregnancyHistory {
    const ROOT_ELEMENT: &'static str = "pregnancyHistory";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(
            element,
            &[
                "LMP",
                "LMPCertain",
                "menCycle",
                "menCycleRegular",
                "contraceptiveType",
                "contraceptiveLastUsed",
                "menstrualEDB",
                "finalEDB",
                "datingMethods",
                "gravida",
                "term",
                "premature",
                "abortuses",
                "living",
            ],
        )?;
        Ok(Self {
            lmp: f.nillable_date("LMP")?,
            lmp_certain: f.child("LMPCertain")?,
            men_cycle: f.string("menCycle")?,
            men_cycle_regular: f.child("menCycleRegular")?,
            contraceptive_type: f.optional_string("contraceptiveType")?,
            contraceptive_last_used: f.nillable_date("contraceptiveLastUsed")?,
            menstrual_edb: f.nillable_date("menstrualEDB")?,
            final_edb: Some(f.date("finalEDB")?),
            dating_methods: f.child("datingMethods")?,
            gravida: f.int("gravida")?,
            term: f.int("term")?,
            premature: f.int("premature")?,
            abortuses: f.int("abortuses")?,
            living: f.int("living")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.nillable_date("LMP", self.lmp)?;
        out.child("LMPCertain", &self.lmp_certain)?;
        out.string("menCycle", &self.men_cycle)?;
        out.child("menCycleRegular", &self.men_cycle_regular)?;
        out.optional_string("contraceptiveType", self.contraceptive_type.as_deref())?;
        out.nillable_date("contraceptiveLastUsed", self.contraceptive_last_used)?;
        out.nillable_date("menstrualEDB", self.menstrual_edb)?;
        out.required_date("finalEDB", self.final_edb)?;
        out.child("datingMethods", &self.dating_methods)?;
        out.int("gravida", self.gravida)?;
        out.int("term", self.term)?;
        out.int("premature", self.premature)?;
        out.int("abortuses", self.abortuses)?;
        out.int("living", self.living)
    }
}

/// One previous pregnancy.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObstetricalHistoryItemList {
    /// Year of delivery
    pub year: i32,
    /// Sex of the child; required when written
    pub sex: Option<Sex>,
    /// Gestational age in weeks
    pub gest_age: i32,
    /// Birth weight as entered
    pub birth_weight: String,
    /// Length of labour in hours; nillable
    pub length_of_labour: Option<f32>,
    /// Place of birth
    pub place_of_birth: String,
    /// Type of delivery; required when written
    pub type_of_delivery: Option<TypeOfDelivery>,
    /// Comments
    pub comments: String,
}

impl ObstetricalHistoryItemList {
    /// Creates an empty entry.
    pub fn new() -> Self {
        Self::default()
    }
}

impl XmlBinding for ObstetricalHistoryItemList {
    const ROOT_ELEMENT: &'static str = "obsList";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(
            element,
            &[
                "year",
                "sex",
                "gestAge",
                "birthWeight",
                "lengthOfLabour",
                "placeOfBirth",
                "typeOfDelivery",
                "comments",
            ],
        )?;
        Ok(Self {
            year: f.int("year")?,
            sex: Some(f.code("sex")?),
            gest_age: f.int("gestAge")?,
            birth_weight: f.string("birthWeight")?,
            length_of_labour: f.nillable_float("lengthOfLabour")?,
            place_of_birth: f.string("placeOfBirth")?,
            type_of_delivery: Some(f.code("typeOfDelivery")?),
            comments: f.string("comments")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.int("year", self.year)?;
        out.code("sex", self.sex)?;
        out.int("gestAge", self.gest_age)?;
        out.string("birthWeight", &self.birth_weight)?;
        out.nillable_float("lengthOfLabour", self.length_of_labour)?;
        out.string("placeOfBirth", &self.place_of_birth)?;
        out.code("typeOfDelivery", self.type_of_delivery)?;
        out.string("comments", &self.comments)
    }
}

/// Previous pregnancies, in the order entered on the form.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObstetricalHistory {
    /// Entries, one `<obsList>` element each
    pub obs_list: Vec<ObstetricalHistoryItemList>,
}

impl ObstetricalHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an empty entry and returns it.
    pub fn add_new_obs_list(&mut self) -> &mut ObstetricalHistoryItemList {
        self.obs_list.push(ObstetricalHistoryItemList::new());
        let last = self.obs_list.len() - 1;
        &mut self.obs_list[last]
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.obs_list.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.obs_list.is_empty()
    }
}

impl XmlBinding for ObstetricalHistory {
    const ROOT_ELEMENT: &'static str = "obstetricalHistory";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(element, &["obsList"])?;
        Ok(Self {
            obs_list: f.repeated("obsList")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.repeated("obsList", &self.obs_list)
    }
}

//! Complete antenatal records: one AR1 plus one AR2 per pregnancy, and the
//! record set that is exchanged as a whole document.

use super::ar1::AR1;
use super::ar2::AR2;
use crate::binding::{Fields, XmlBinding};
use crate::error::Result;
use crate::reader::XmlElement;
use crate::writer::ElementWriter;
use std::io::Write;

/// One patient's AR1 and AR2 forms.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ARRecord {
    /// Initial assessment form
    pub ar1: AR1,
    /// Follow-up form
    pub ar2: AR2,
}

impl ARRecord {
    /// Creates a record with two empty forms.
    pub fn new() -> Self {
        Self::default()
    }
}

impl XmlBinding for ARRecord {
    const ROOT_ELEMENT: &'static str = "ARRecord";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(element, &["AR1", "AR2"])?;
        Ok(Self {
            ar1: f.child("AR1")?,
            ar2: f.child("AR2")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.child("AR1", &self.ar1)?;
        out.child("AR2", &self.ar2)
    }
}

/// A set of antenatal records. This is the usual top-level document.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ARRecordSet {
    /// Records in document order
    pub records: Vec<ARRecord>,
}

impl ARRecordSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an empty record and returns it.
    pub fn add_new_record(&mut self) -> &mut ARRecord {
        self.records.push(ARRecord::default());
        let last = self.records.len() - 1;
        &mut self.records[last]
    }

    /// Inserts an empty record at `index`, shifting later records up.
    ///
    /// Returns `None` when `index` is past the end.
    pub fn insert_new_record(&mut self, index: usize) -> Option<&mut ARRecord> {
        if index > self.records.len() {
            return None;
        }
        self.records.insert(index, ARRecord::default());
        self.records.get_mut(index)
    }

    /// Removes and returns the record at `index`, if there is one.
    pub fn remove_record(&mut self, index: usize) -> Option<ARRecord> {
        if index < self.records.len() {
            Some(self.records.remove(index))
        } else {
            None
        }
    }

    /// Record at `index`.
    pub fn record(&self, index: usize) -> Option<&ARRecord> {
        self.records.get(index)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the set holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records.
    pub fn iter(&self) -> impl Iterator<Item = &ARRecord> {
        self.records.iter()
    }
}

impl XmlBinding for ARRecordSet {
    const ROOT_ELEMENT: &'static str = "ARRecordSet";

    fn from_element(element: &XmlElement) -> Result<Self> {
        let f = Fields::new(element, &["ARRecord"])?;
        Ok(Self {
            records: f.repeated("ARRecord")?,
        })
    }

    fn write_content<W: Write>(&self, out: &mut ElementWriter<'_, W>) -> Result<()> {
        out.repeated("ARRecord", &self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use chrono::NaiveDate;

    fn stamped(demographic_no: i32) -> ARRecord {
        let mut record = ARRecord::new();
        record.ar1.demographic_no = demographic_no;
        record.ar1.form_created = NaiveDate::from_ymd_opt(2024, 2, 1);
        record.ar1.form_edited = NaiveDate::from_ymd_opt(2024, 2, 1).and_then(|d| d.and_hms_opt(9, 0, 0));
        record
    }

    #[test]
    fn test_insert_and_remove() {
        let mut set = ARRecordSet::new();
        assert!(set.is_empty());

        set.add_new_record().ar1.demographic_no = 1;
        set.add_new_record().ar1.demographic_no = 3;
        set.insert_new_record(1).unwrap().ar1.demographic_no = 2;
        assert!(set.insert_new_record(9).is_none());

        let order: Vec<i32> = set.iter().map(|r| r.ar1.demographic_no).collect();
        assert_eq!(order, vec![1, 2, 3]);

        let removed = set.remove_record(0).unwrap();
        assert_eq!(removed.ar1.demographic_no, 1);
        assert!(set.remove_record(5).is_none());
        assert_eq!(set.len(), 2);
        assert_eq!(set.record(0).map(|r| r.ar1.demographic_no), Some(2));
    }

    #[test]
    fn test_empty_set_round_trip() {
        let xml = ARRecordSet::new().to_xml_string().unwrap();
        assert!(xml.contains("<ARRecordSet xmlns=\"http://www.oscarmcmaster.org/AR2005\""));
        assert_eq!(ARRecordSet::parse_str(&xml).unwrap(), ARRecordSet::new());
    }

    #[test]
    fn test_write_reports_incomplete_record() {
        let mut set = ARRecordSet::new();
        set.add_new_record();
        match set.to_xml_string() {
            Err(Error::MissingField(path)) => assert_eq!(path, "ARRecordSet/ARRecord/AR1/formCreated"),
            other => panic!("expected missing field, got {:?}", other),
        }

        set.records[0] = stamped(1);
        match set.to_xml_string() {
            Err(Error::MissingField(path)) => assert_eq!(path, "ARRecordSet/ARRecord/AR1/pregnancyHistory/finalEDB"),
            other => panic!("expected missing field, got {:?}", other),
        }
    }

    #[test]
    fn test_record_requires_both_forms() {
        let xml = r#"<ARRecordSet xmlns="http://www.oscarmcmaster.org/AR2005">
            <ARRecord><AR2/></ARRecord>
        </ARRecordSet>"#;
        match ARRecordSet::parse_str(xml) {
            Err(Error::MissingField(path)) => assert_eq!(path, "ARRecord/AR1"),
            other => panic!("expected missing field, got {:?}", other),
        }
    }

    #[test]
    fn test_set_rejects_other_children() {
        let xml = r#"<ARRecordSet xmlns="http://www.oscarmcmaster.org/AR2005"><AR1/></ARRecordSet>"#;
        match ARRecordSet::parse_str(xml) {
            Err(Error::UnexpectedElement(path)) => assert_eq!(path, "ARRecordSet/AR1"),
            other => panic!("expected unexpected element, got {:?}", other),
        }
    }
}

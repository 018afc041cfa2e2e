//! demo_history_flags - List the positive findings in a medical history section.
//!
//! This demo reads a `medicalHistoryAndPhysicalExam` document and prints
//! every checklist item answered "yes", grouped by section, followed by the
//! abnormal physical exam findings.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example demo_history_flags <history.xml>
//! ```

use std::env;

use ar2005::objects::{MedicalHistoryAndPhysicalExam, YesNoNullType};
use ar2005::XmlBinding;

/// Names of the items answered "yes".
fn flagged<'a>(items: &[(&'a str, &YesNoNullType)]) -> Vec<&'a str> {
    items
        .iter()
        .filter(|(_, answer)| answer.answer() == Some(true))
        .map(|(name, _)| *name)
        .collect()
}

/// Positive answers per section, in form order. Sections that are absent or
/// have nothing flagged are skipped.
fn history_flags(exam: &MedicalHistoryAndPhysicalExam) -> Vec<(&'static str, Vec<&'static str>)> {
    let mut sections = Vec::new();

    if let Some(p) = &exam.current_pregnancy {
        sections.push((
            "Current pregnancy",
            flagged(&[
                ("bleeding", &p.bleeding),
                ("nausea", &p.nausea),
                ("smoking", &p.smoking),
                ("alcohol/drugs", &p.alcohol_drugs),
                ("occupational/environmental risks", &p.occ_env_risks),
                ("dietary restrictions", &p.dietary_res),
                ("calcium adequate", &p.calcium_adequate),
                ("folate", &p.folate),
            ]),
        ));
    }
    if let Some(h) = &exam.medical_history {
        sections.push((
            "Medical history",
            flagged(&[
                ("hypertension", &h.hypertension),
                ("endocrine", &h.endorince),
                ("urinary tract", &h.urinary_tract),
                ("cardiac", &h.cardiac),
                ("liver", &h.liver),
                ("gynaecology", &h.gynaecology),
                ("hematology", &h.hem),
                ("surgeries", &h.surgeries),
                ("blood transfusion", &h.blood_transfusion),
                ("anesthetics", &h.anesthetics),
                ("psychiatry", &h.psychiatry),
                ("epilepsy", &h.epilepsy),
                ("other", &h.other),
            ]),
        ));
    }
    if let Some(g) = &exam.generic_history {
        sections.push((
            "Genetic history",
            flagged(&[
                ("at risk", &g.at_risk),
                ("developmental delay", &g.developmental_delay),
                ("congenital anomalies", &g.congenital_anomolies),
                ("chromosomal disorders", &g.chromosomal_disorders),
                ("genetic disorders", &g.genetic_disorders),
            ]),
        ));
    }
    if let Some(i) = &exam.infectious_disease {
        sections.push((
            "Infectious disease",
            flagged(&[
                ("varicella", &i.varicella),
                ("STI", &i.std),
                ("tuberculosis", &i.tuberculosis),
                ("other", &i.other),
            ]),
        ));
    }
    if let Some(p) = &exam.psychosocial {
        sections.push((
            "Psychosocial",
            flagged(&[
                ("poor social support", &p.poort_social_support),
                ("relationship problems", &p.relationship_problems),
                ("emotional/depression", &p.emotional_depression),
                ("substance abuse", &p.substance_abuse),
                ("family violence", &p.family_violence),
                ("parenting concerns", &p.parenting_concerns),
                ("religious/cultural", &p.religious_cultural),
            ]),
        ));
    }
    if let Some(f) = &exam.family_history {
        sections.push(("Family history", flagged(&[("at risk", &f.at_risk)])));
    }

    sections.retain(|(_, items)| !items.is_empty());
    sections
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <history.xml>", args[0]);
        std::process::exit(1);
    }

    let exam = match MedicalHistoryAndPhysicalExam::parse_file(&args[1]) {
        Ok(exam) => exam,
        Err(e) => {
            eprintln!("Error parsing medical history: {}", e);
            return Err(e.into());
        }
    };

    let sections = history_flags(&exam);
    if sections.is_empty() {
        println!("No history items flagged.");
    }
    for (section, items) in sections {
        println!("{}:", section);
        for item in items {
            println!("  - {}", item);
        }
    }

    if let Some(physical) = &exam.physical_examination {
        let abnormal = physical.abnormal_findings();
        if !abnormal.is_empty() {
            println!("Abnormal exam findings: {}", abnormal.join(", "));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flagged() {
        let yes = YesNoNullType::yes();
        let no = YesNoNullType::no();
        let blank = YesNoNullType::new();
        assert_eq!(
            flagged(&[("a", &yes), ("b", &no), ("c", &blank), ("d", &yes)]),
            vec!["a", "d"]
        );
    }

    #[test]
    fn test_history_flags_skips_quiet_sections() {
        let mut exam = MedicalHistoryAndPhysicalExam::new();
        exam.add_new_family_history().at_risk = YesNoNullType::no();
        exam.add_new_psychosocial().family_violence = YesNoNullType::yes();

        let sections = history_flags(&exam);
        assert_eq!(sections, vec![("Psychosocial", vec!["family violence"])]);
    }

    #[test]
    fn test_history_flags_empty_exam() {
        assert!(history_flags(&MedicalHistoryAndPhysicalExam::new()).is_empty());
    }
}

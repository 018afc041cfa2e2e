//! demo_visit_summary - Summarize the follow-up visits on an AR2 form.
//!
//! This demo reads an AR2 document and prints one line per subsequent visit,
//! followed by weight statistics across the dated visits and the discussion
//! topics that have not been covered yet.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example demo_visit_summary <ar2.xml>
//! ```

use std::env;

use ar2005::objects::{SubsequentVisitItemType, AR2};
use ar2005::XmlBinding;

/// Weight statistics over the visits that recorded a weight.
#[derive(Debug, Default, PartialEq)]
struct WeightStats {
    count: usize,
    first: Option<f32>,
    last: Option<f32>,
    min: Option<f32>,
    max: Option<f32>,
}

impl WeightStats {
    fn add(&mut self, weight: f32) {
        self.count += 1;
        if self.first.is_none() {
            self.first = Some(weight);
        }
        self.last = Some(weight);
        self.min = Some(self.min.map_or(weight, |m| m.min(weight)));
        self.max = Some(self.max.map_or(weight, |m| m.max(weight)));
    }

    fn gain(&self) -> Option<f32> {
        match (self.first, self.last) {
            (Some(first), Some(last)) => Some(last - first),
            _ => None,
        }
    }
}

/// Visits in date order; undated visits are dropped.
fn dated_visits(ar2: &AR2) -> Vec<&SubsequentVisitItemType> {
    let mut visits: Vec<_> = ar2
        .subsequent_visit_list
        .iter()
        .filter(|v| v.date.is_some())
        .collect();
    visits.sort_by_key(|v| v.date);
    visits
}

fn weight_stats(visits: &[&SubsequentVisitItemType]) -> WeightStats {
    let mut stats = WeightStats::default();
    for weight in visits.iter().filter_map(|v| v.weight) {
        stats.add(weight);
    }
    stats
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <ar2.xml>", args[0]);
        std::process::exit(1);
    }

    let ar2 = match AR2::parse_file(&args[1]) {
        Ok(ar2) => ar2,
        Err(e) => {
            eprintln!("Error parsing AR2: {}", e);
            return Err(e.into());
        }
    };

    println!(
        "{:>10}  {:>6}  {:>7}  {:>8}  {:>6}",
        "Date", "GA", "Weight", "BP", "SFH"
    );

    let visits = dated_visits(&ar2);
    for visit in &visits {
        let date = visit
            .date
            .map(|d| d.to_string())
            .unwrap_or_default();
        let weight = visit
            .weight
            .map(|w| format!("{:.1}", w))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>10}  {:>6}  {:>7}  {:>8}  {:>6}",
            date, visit.ga, weight, visit.bp, visit.sfh
        );
    }

    let undated = ar2.subsequent_visit_list.len() - visits.len();
    if undated > 0 {
        println!("({} undated visit(s) not shown)", undated);
    }

    let stats = weight_stats(&visits);
    if let (Some(min), Some(max), Some(gain)) = (stats.min, stats.max, stats.gain()) {
        println!();
        println!(
            "Weight over {} visit(s): min {:.1}, max {:.1}, gain {:+.1}",
            stats.count, min, max, gain
        );
    }

    let outstanding = ar2.discussion_topics.outstanding();
    if !outstanding.is_empty() {
        println!();
        println!("Topics not yet discussed: {}", outstanding.join(", "));
    }

    Ok(())
}

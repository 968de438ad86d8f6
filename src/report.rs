// 📊 Report Generator - standings → text / CSV / JSON
//
// Every listing follows first-appearance order. The text form is the
// canonical one: it is what the CLI prints and what the fingerprint hashes.

use crate::pipeline::IngestStats;
use crate::scoring::{GradedPerson, Standings, Tier};
use crate::weekday::DAYS_PER_WEEK;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::io::{self, Write};
use uuid::Uuid;

pub const REMOVED_HEADER: &str = "Removed player";
pub const REMOVED_SEPARATOR: &str = "==============";

// ============================================================================
// REPORT ENTRY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub name: String,
    /// Final points, bonuses included
    pub points: u32,
    pub base_points: u32,
    pub bonus_points: u32,
    pub grade: Tier,
    pub daily_counts: [u32; DAYS_PER_WEEK],
    pub wednesday: u32,
    pub weekend: u32,
    pub bonuses: Vec<String>,
    pub removal_eligible: bool,
}

impl From<&GradedPerson> for ReportEntry {
    fn from(person: &GradedPerson) -> Self {
        ReportEntry {
            name: person.name().to_string(),
            points: person.points,
            base_points: person.base_points(),
            bonus_points: person.bonus_points,
            grade: person.tier,
            daily_counts: *person.record.daily_counts(),
            wednesday: person.record.wednesday_count(),
            weekend: person.record.weekend_count(),
            bonuses: person.bonuses.clone(),
            removal_eligible: person.is_removal_eligible(),
        }
    }
}

/// Flat row for CSV export
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    name: &'a str,
    points: u32,
    grade: &'static str,
    wednesday: u32,
    weekend: u32,
    removal_eligible: bool,
}

// ============================================================================
// REPORT
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub people: Vec<ReportEntry>,
    pub stats: IngestStats,
}

/// Metadata wrapped around the JSON export
#[derive(Debug, Serialize)]
struct RunSummary {
    run_id: Uuid,
    generated_at: DateTime<Utc>,
    fingerprint: String,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    run: RunSummary,
    stats: &'a IngestStats,
    people: &'a [ReportEntry],
    removed: Vec<&'a str>,
}

impl Report {
    pub fn from_standings(standings: &Standings, stats: IngestStats) -> Self {
        Report {
            people: standings.iter().map(ReportEntry::from).collect(),
            stats,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ReportEntry> {
        self.people.iter().find(|e| e.name == name)
    }

    /// Removal-eligible entries, in listing order
    pub fn removed(&self) -> impl Iterator<Item = &ReportEntry> {
        self.people.iter().filter(|e| e.removal_eligible)
    }

    /// Text report. Empty when nobody was ingested.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        if self.people.is_empty() {
            return out;
        }

        for entry in &self.people {
            // Writing into a String cannot fail
            let _ = writeln!(
                out,
                "NAME : {}, POINT : {}, GRADE : {}",
                entry.name, entry.points, entry.grade
            );
        }

        out.push('\n');
        out.push_str(REMOVED_HEADER);
        out.push('\n');
        out.push_str(REMOVED_SEPARATOR);
        out.push('\n');
        for entry in self.removed() {
            out.push_str(&entry.name);
            out.push('\n');
        }
        out
    }

    pub fn write_text<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(self.render_text().as_bytes())?;
        writer.flush()
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for entry in &self.people {
            wtr.serialize(CsvRow {
                name: &entry.name,
                points: entry.points,
                grade: entry.grade.label(),
                wednesday: entry.wednesday,
                weekend: entry.weekend,
                removal_eligible: entry.removal_eligible,
            })
            .with_context(|| format!("Failed to write CSV row for {}", entry.name))?;
        }
        wtr.flush().context("Failed to flush CSV output")?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        let payload = JsonReport {
            run: RunSummary {
                run_id: Uuid::new_v4(),
                generated_at: Utc::now(),
                fingerprint: self.fingerprint(),
            },
            stats: &self.stats,
            people: &self.people,
            removed: self.removed().map(|e| e.name.as_str()).collect(),
        };
        serde_json::to_string_pretty(&payload).context("Failed to serialize report")
    }

    /// Hex SHA-256 of the text rendering
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.render_text().as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;
    use crate::scoring::ScoringPolicy;

    fn report_for(check_ins: &[(&str, &str)]) -> Report {
        let mut ledger = Ledger::new();
        for (name, day) in check_ins {
            ledger.record(name, day).unwrap();
        }
        let standings = ledger.finalize(&ScoringPolicy::default());
        Report::from_standings(&standings, IngestStats::default())
    }

    fn mixed_report() -> Report {
        let mut check_ins = vec![
            ("user1", "monday"),
            ("user2", "wednesday"),
            ("user3", "saturday"),
        ];
        check_ins.extend(std::iter::repeat(("user4", "monday")).take(20));
        check_ins.extend(std::iter::repeat(("user5", "monday")).take(30));
        check_ins.extend(std::iter::repeat(("user6", "monday")).take(50));
        report_for(&check_ins)
    }

    #[test]
    fn test_text_lines() {
        let text = mixed_report().render_text();

        assert!(text.contains("NAME : user1, POINT : 1, GRADE : NORMAL\n"));
        assert!(text.contains("NAME : user2, POINT : 3, GRADE : NORMAL\n"));
        assert!(text.contains("NAME : user3, POINT : 2, GRADE : NORMAL\n"));
        assert!(text.contains("NAME : user4, POINT : 20, GRADE : NORMAL\n"));
        assert!(text.contains("NAME : user5, POINT : 30, GRADE : SILVER\n"));
        assert!(text.contains("NAME : user6, POINT : 50, GRADE : GOLD\n"));
    }

    #[test]
    fn test_text_removal_section() {
        let text = mixed_report().render_text();
        let (_, removed) = text.split_once("\nRemoved player\n==============\n").unwrap();

        assert_eq!(removed, "user1\nuser4\n");
    }

    #[test]
    fn test_exact_layout() {
        let report = report_for(&[("alice", "monday"), ("bob", "sunday")]);
        assert_eq!(
            report.render_text(),
            "NAME : alice, POINT : 1, GRADE : NORMAL\n\
             NAME : bob, POINT : 2, GRADE : NORMAL\n\
             \n\
             Removed player\n\
             ==============\n\
             alice\n"
        );
    }

    #[test]
    fn test_header_present_without_candidates() {
        let report = report_for(&[("bob", "wednesday")]);
        let text = report.render_text();

        assert!(text.ends_with("\nRemoved player\n==============\n"));
        assert_eq!(report.removed().count(), 0);
    }

    #[test]
    fn test_empty_report_renders_nothing() {
        let report = Report::default();
        assert!(report.is_empty());
        assert_eq!(report.render_text(), "");
    }

    #[test]
    fn test_order_is_first_appearance() {
        let report = report_for(&[("zed", "monday"), ("amy", "wednesday"), ("zed", "friday")]);
        let names: Vec<&str> = report.people.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["zed", "amy"]);
    }

    #[test]
    fn test_write_text_matches_render() {
        let report = mixed_report();
        let mut buf = Vec::new();
        report.write_text(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), report.render_text());
    }

    #[test]
    fn test_csv_export() {
        let report = report_for(&[("alice", "monday"), ("bob", "wednesday")]);
        let mut buf = Vec::new();
        report.write_csv(&mut buf).unwrap();
        let csv = String::from_utf8(buf).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "name,points,grade,wednesday,weekend,removal_eligible");
        assert_eq!(lines[1], "alice,1,NORMAL,0,0,true");
        assert_eq!(lines[2], "bob,3,NORMAL,1,0,false");
    }

    #[test]
    fn test_json_export() {
        let report = mixed_report();
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["people"].as_array().unwrap().len(), 6);
        assert_eq!(value["people"][5]["grade"], "GOLD");
        assert_eq!(value["removed"], serde_json::json!(["user1", "user4"]));
        assert_eq!(value["run"]["fingerprint"], report.fingerprint());
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = mixed_report();
        let b = mixed_report();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);

        let c = report_for(&[("alice", "tuesday")]);
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_entry_carries_breakdown() {
        let mut check_ins = vec![("dave", "monday")];
        check_ins.extend(std::iter::repeat(("dave", "wednesday")).take(10));
        let report = report_for(&check_ins);
        let dave = report.get("dave").unwrap();

        assert_eq!(dave.base_points, 31);
        assert_eq!(dave.bonus_points, 10);
        assert_eq!(dave.points, 41);
        assert_eq!(dave.daily_counts, [1, 0, 10, 0, 0, 0, 0]);
        assert_eq!(dave.bonuses, vec!["wednesday".to_string()]);
    }
}

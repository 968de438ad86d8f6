// 🔁 Pipeline - parser → ledger → bonus/tier pass → report
//
// Single-threaded fold over the input in source order. Unknown day labels
// are skipped with a warning and counted; they never abort a run.

use crate::error::PipelineError;
use crate::ledger::Ledger;
use crate::parser::{CheckIn, CheckInReader, CheckInSource, ParseStats};
use crate::report::Report;
use crate::scoring::ScoringPolicy;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead};
use std::path::Path;

// ============================================================================
// OPTIONS & STATS
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Cap on input lines consumed; `None` reads everything
    pub max_records: Option<usize>,
    pub policy: ScoringPolicy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    pub lines_read: usize,
    /// Check-ins applied to the ledger
    pub accepted: usize,
    pub malformed: usize,
    /// Well-formed lines whose day label did not resolve
    pub unrecognized_day: usize,
    pub truncated: bool,
}

impl IngestStats {
    fn with_parse_stats(mut self, parse: ParseStats) -> Self {
        self.lines_read = parse.lines_read;
        self.malformed = parse.malformed;
        self.truncated = parse.truncated;
        self
    }
}

// ============================================================================
// INGESTION
// ============================================================================

/// Fold check-ins into the ledger, skipping unknown days.
pub fn ingest<I>(ledger: &mut Ledger, check_ins: I) -> io::Result<IngestStats>
where
    I: IntoIterator<Item = io::Result<CheckIn>>,
{
    let mut stats = IngestStats::default();
    for check_in in check_ins {
        let check_in = check_in?;
        match ledger.record(&check_in.name, &check_in.day_label) {
            Ok(()) => stats.accepted += 1,
            Err(err) => {
                tracing::warn!(
                    line = check_in.line_number,
                    name = %check_in.name,
                    "skipping check-in: {}",
                    err
                );
                stats.unrecognized_day += 1;
            }
        }
    }
    Ok(stats)
}

fn finish(ledger: Ledger, stats: IngestStats, options: &RunOptions) -> Report {
    tracing::info!(
        lines = stats.lines_read,
        accepted = stats.accepted,
        malformed = stats.malformed,
        unrecognized_day = stats.unrecognized_day,
        truncated = stats.truncated,
        "ingestion complete"
    );
    if stats.truncated {
        tracing::warn!(
            max_records = ?options.max_records,
            "input truncated at the configured record limit"
        );
    }

    let standings = ledger.finalize(&options.policy);
    Report::from_standings(&standings, stats)
}

/// Run the whole pipeline over any buffered reader.
pub fn run_reader<R: BufRead>(reader: R, options: &RunOptions) -> io::Result<Report> {
    let mut check_ins = CheckInReader::new(reader).with_max_records(options.max_records);
    let mut ledger = Ledger::new();
    let stats = ingest(&mut ledger, check_ins.by_ref())?.with_parse_stats(check_ins.stats());
    Ok(finish(ledger, stats, options))
}

/// Run the whole pipeline over a file.
///
/// A missing file yields `PipelineError::SourceNotFound`; callers show the
/// fixed message and print no report.
pub fn run_file<P: AsRef<Path>>(path: P, options: &RunOptions) -> Result<Report, PipelineError> {
    let path = path.as_ref();
    let source = CheckInSource::new(path).with_max_records(options.max_records);
    let mut check_ins = source.open()?;

    tracing::debug!(path = ?path, "reading check-ins");
    let mut ledger = Ledger::new();
    let stats = ingest(&mut ledger, check_ins.by_ref())
        .map_err(|e| PipelineError::from_io(path, e))?
        .with_parse_stats(check_ins.stats());
    Ok(finish(ledger, stats, options))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Tier;
    use std::io::Cursor;

    fn run(input: &str) -> Report {
        run_reader(Cursor::new(input.to_string()), &RunOptions::default()).unwrap()
    }

    #[test]
    fn test_original_sample() {
        let input = "
            user1 monday
            user1 wednesday
            user2 saturday
            user3 monday extra  # len>2, skipped
            ";
        let report = run(input);
        let text = report.render_text();

        assert!(text.contains("NAME : user1, POINT : 4, GRADE : NORMAL"));
        assert!(text.contains("NAME : user2, POINT : 2, GRADE : NORMAL"));
        assert!(report.get("user3").is_none());
        assert!(text.contains("\nRemoved player\n==============\n"));
        assert_eq!(report.removed().count(), 0);
    }

    #[test]
    fn test_malformed_line_contributes_nothing() {
        let report = run("carol monday\ncarol monday extra\ncarol monday\n");
        let carol = report.get("carol").unwrap();

        assert_eq!(carol.points, 2);
        assert_eq!(report.stats.accepted, 2);
        assert_eq!(report.stats.malformed, 1);
    }

    #[test]
    fn test_unrecognized_day_is_skipped_and_counted() {
        let report = run("alice monday\nalice funday\nghost someday\nalice friday\n");

        assert_eq!(report.people.len(), 1);
        assert_eq!(report.get("alice").unwrap().points, 2);
        assert!(report.get("ghost").is_none());
        assert_eq!(report.stats.unrecognized_day, 2);
        assert_eq!(report.stats.accepted, 2);
        assert_eq!(report.stats.lines_read, 4);
    }

    #[test]
    fn test_scenarios() {
        let mut input = String::from("alice monday\n");
        input.push_str(&"bob wednesday\n".repeat(10));
        input.push_str(&"carol saturday\ncarol sunday\n".repeat(5));
        input.push_str(&"dave wednesday\n".repeat(20));
        let report = run(&input);

        let grades: Vec<(&str, u32, Tier)> = report
            .people
            .iter()
            .map(|e| (e.name.as_str(), e.points, e.grade))
            .collect();
        assert_eq!(
            grades,
            vec![
                ("alice", 1, Tier::Normal),
                ("bob", 40, Tier::Silver),
                ("carol", 30, Tier::Silver),
                ("dave", 70, Tier::Gold),
            ]
        );
        let removed: Vec<&str> = report.removed().map(|e| e.name.as_str()).collect();
        assert_eq!(removed, vec!["alice"]);
    }

    #[test]
    fn test_max_records_option() {
        let input = "a monday\nb monday\nc monday\n";
        let options = RunOptions {
            max_records: Some(2),
            ..RunOptions::default()
        };
        let report = run_reader(Cursor::new(input), &options).unwrap();

        assert_eq!(report.people.len(), 2);
        assert!(report.stats.truncated);
    }

    #[test]
    fn test_custom_policy_is_used() {
        let options = RunOptions {
            policy: ScoringPolicy::from_json(r#"{ "tiers": { "gold": 3, "silver": 2 } }"#).unwrap(),
            ..RunOptions::default()
        };
        let report = run_reader(Cursor::new("x wednesday\ny sunday\n"), &options).unwrap();

        assert_eq!(report.get("x").unwrap().grade, Tier::Gold);
        assert_eq!(report.get("y").unwrap().grade, Tier::Silver);
    }

    #[test]
    fn test_rerun_is_identical() {
        let input = "b sunday\na monday\nb wednesday\nc tuesday\na monday\n";
        let first = run(input);
        let second = run(input);

        assert_eq!(first, second);
        assert_eq!(first.render_text(), second.render_text());
    }

    #[test]
    fn test_empty_input() {
        let report = run("");
        assert!(report.is_empty());
        assert_eq!(report.render_text(), "");
    }

    #[test]
    fn test_missing_file() {
        let err = run_file("./FileDoNotExist.txt", &RunOptions::default()).unwrap_err();
        assert!(err.is_source_not_found());
        assert_eq!(err.to_string(), "파일을 찾을 수 없습니다.");
    }

    #[test]
    fn test_non_utf8_line_does_not_abort_run() {
        let input: &[u8] = b"alice monday\nbob \xff\xfe\ncarol monday\n";
        let report = run_reader(Cursor::new(input), &RunOptions::default()).unwrap();

        let names: Vec<&str> = report.people.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["alice", "carol"]);
        assert_eq!(report.stats.malformed, 1);
        assert_eq!(report.stats.accepted, 2);
    }

    #[test]
    fn test_ingest_propagates_read_errors() {
        let mut ledger = Ledger::new();
        let items = vec![
            Ok(CheckIn {
                name: "a".to_string(),
                day_label: "monday".to_string(),
                line_number: 1,
            }),
            Err(io::Error::new(io::ErrorKind::Other, "device gone")),
        ];
        assert!(ingest(&mut ledger, items).is_err());
        assert_eq!(ledger.len(), 1);
    }
}

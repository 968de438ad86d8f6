// Attendance Tiers - Core Library
// Exposes all modules for use in the CLI, the API server, and tests

pub mod weekday;    // Day Policy - fixed weekday table
pub mod parser;     // Record Parser - lines → check-ins
pub mod ledger;     // Attendance Ledger - per-person running state
pub mod scoring;    // Bonus & Tier Engine - rules as data
pub mod report;     // Report Generator - text / CSV / JSON
pub mod pipeline;   // Parser → Ledger → Scoring → Report
pub mod config;
pub mod error;

#[cfg(feature = "tui")]
pub mod ui;

#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use weekday::{DayEntry, Weekday, DAY_TABLE, DAYS_PER_WEEK};
pub use parser::{parse_line, CheckIn, CheckInReader, CheckInSource, ParseStats};
pub use ledger::{Ledger, PersonRecord};
pub use scoring::{
    BonusRule, GradedPerson, ScoringPolicy, Standings, Tier, TierThresholds, VisitCounter,
};
pub use report::{Report, ReportEntry, REMOVED_HEADER, REMOVED_SEPARATOR};
pub use pipeline::{ingest, run_file, run_reader, IngestStats, RunOptions};
pub use config::{AppConfig, OutputFormat, DEFAULT_INPUT};
pub use error::{PipelineError, UnrecognizedDay, SOURCE_NOT_FOUND_MESSAGE};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 📅 Day Policy - fixed weekday table
// Each canonical weekday label maps to a slot in the visit vector and a point weight.

use crate::error::UnrecognizedDay;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of slots in a person's per-weekday visit vector.
pub const DAYS_PER_WEEK: usize = 7;

// ============================================================================
// WEEKDAY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// One row of the day table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayEntry {
    pub day: Weekday,
    /// Canonical (lowercase) label used for lookup
    pub label: &'static str,
    /// Zero-based position in the visit vector (Monday = 0)
    pub slot: usize,
    /// Points awarded per check-in on this day
    pub weight: u32,
}

/// The day table. Ordered by slot, so `DAY_TABLE[i].slot == i`.
pub const DAY_TABLE: [DayEntry; DAYS_PER_WEEK] = [
    DayEntry { day: Weekday::Monday, label: "monday", slot: 0, weight: 1 },
    DayEntry { day: Weekday::Tuesday, label: "tuesday", slot: 1, weight: 1 },
    DayEntry { day: Weekday::Wednesday, label: "wednesday", slot: 2, weight: 3 },
    DayEntry { day: Weekday::Thursday, label: "thursday", slot: 3, weight: 1 },
    DayEntry { day: Weekday::Friday, label: "friday", slot: 4, weight: 1 },
    DayEntry { day: Weekday::Saturday, label: "saturday", slot: 5, weight: 2 },
    DayEntry { day: Weekday::Sunday, label: "sunday", slot: 6, weight: 2 },
];

impl Weekday {
    pub const ALL: [Weekday; DAYS_PER_WEEK] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn entry(self) -> &'static DayEntry {
        &DAY_TABLE[self as usize]
    }

    pub fn slot(self) -> usize {
        self.entry().slot
    }

    pub fn weight(self) -> u32 {
        self.entry().weight
    }

    pub fn label(self) -> &'static str {
        self.entry().label
    }

    pub fn is_weekend(self) -> bool {
        matches!(self, Weekday::Saturday | Weekday::Sunday)
    }

    /// Resolve a label, ignoring case. Returns the whole table row.
    pub fn lookup(label: &str) -> Result<&'static DayEntry, UnrecognizedDay> {
        let wanted = label.trim().to_lowercase();
        DAY_TABLE
            .iter()
            .find(|entry| entry.label == wanted)
            .ok_or_else(|| UnrecognizedDay(label.to_string()))
    }

    /// Short header used by tabular views ("Mon", "Tue", ...)
    pub fn short_name(self) -> &'static str {
        &self.label()[..3]
    }
}

impl FromStr for Weekday {
    type Err = UnrecognizedDay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::lookup(s).map(|entry| entry.day)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_slots_are_positional() {
        for (i, entry) in DAY_TABLE.iter().enumerate() {
            assert_eq!(entry.slot, i);
            assert_eq!(entry.day.slot(), i);
            assert_eq!(Weekday::ALL[i], entry.day);
        }
    }

    #[test]
    fn test_weights() {
        assert_eq!(Weekday::Monday.weight(), 1);
        assert_eq!(Weekday::Tuesday.weight(), 1);
        assert_eq!(Weekday::Wednesday.weight(), 3);
        assert_eq!(Weekday::Thursday.weight(), 1);
        assert_eq!(Weekday::Friday.weight(), 1);
        assert_eq!(Weekday::Saturday.weight(), 2);
        assert_eq!(Weekday::Sunday.weight(), 2);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!("monday".parse::<Weekday>(), Ok(Weekday::Monday));
        assert_eq!("WEDNESDAY".parse::<Weekday>(), Ok(Weekday::Wednesday));
        assert_eq!("Sunday".parse::<Weekday>(), Ok(Weekday::Sunday));
    }

    #[test]
    fn test_unknown_label() {
        let err = "invalid_day".parse::<Weekday>().unwrap_err();
        assert_eq!(err, UnrecognizedDay("invalid_day".to_string()));
        assert!(Weekday::lookup("mon").is_err());
        assert!(Weekday::lookup("").is_err());
    }

    #[test]
    fn test_weekend_flags() {
        let weekend: Vec<Weekday> = Weekday::ALL.into_iter().filter(|d| d.is_weekend()).collect();
        assert_eq!(weekend, vec![Weekday::Saturday, Weekday::Sunday]);
    }

    #[test]
    fn test_short_name_and_display() {
        assert_eq!(Weekday::Thursday.short_name(), "thu");
        assert_eq!(Weekday::Friday.to_string(), "friday");
    }
}

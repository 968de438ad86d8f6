// 📒 Attendance Ledger - per-person running state
//
// Person records are created on first sight and kept in first-appearance
// order. `finalize` consumes the ledger, so nothing can be recorded once the
// bonus pass has run.

use crate::error::UnrecognizedDay;
use crate::scoring::{ScoringPolicy, Standings};
use crate::weekday::{Weekday, DAYS_PER_WEEK};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// PERSON RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    name: String,
    /// Zero-based first-appearance position
    order: usize,
    daily_counts: [u32; DAYS_PER_WEEK],
    /// Sum of day weights, before bonuses
    points: u32,
    wednesday_count: u32,
    weekend_count: u32,
}

impl PersonRecord {
    fn new(name: &str, order: usize) -> Self {
        PersonRecord {
            name: name.to_string(),
            order,
            daily_counts: [0; DAYS_PER_WEEK],
            points: 0,
            wednesday_count: 0,
            weekend_count: 0,
        }
    }

    fn add(&mut self, day: Weekday) {
        self.daily_counts[day.slot()] += 1;
        self.points += day.weight();
        if day == Weekday::Wednesday {
            self.wednesday_count += 1;
        }
        if day.is_weekend() {
            self.weekend_count += 1;
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn daily_counts(&self) -> &[u32; DAYS_PER_WEEK] {
        &self.daily_counts
    }

    pub fn visits_on(&self, day: Weekday) -> u32 {
        self.daily_counts[day.slot()]
    }

    pub fn total_visits(&self) -> u32 {
        self.daily_counts.iter().sum()
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn wednesday_count(&self) -> u32 {
        self.wednesday_count
    }

    pub fn weekend_count(&self) -> u32 {
        self.weekend_count
    }
}

// ============================================================================
// LEDGER
// ============================================================================

#[derive(Debug, Default)]
pub struct Ledger {
    people: Vec<PersonRecord>,
    index: HashMap<String, usize>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one check-in by day label.
    ///
    /// An unknown label leaves the ledger untouched; no record is created for it.
    pub fn record(&mut self, name: &str, day_label: &str) -> Result<(), UnrecognizedDay> {
        let day: Weekday = day_label.parse()?;
        self.record_day(name, day);
        Ok(())
    }

    /// Record one check-in for an already-resolved day.
    pub fn record_day(&mut self, name: &str, day: Weekday) {
        let slot = match self.index.get(name) {
            Some(&slot) => slot,
            None => {
                let slot = self.people.len();
                self.people.push(PersonRecord::new(name, slot));
                self.index.insert(name.to_string(), slot);
                slot
            }
        };
        self.people[slot].add(day);
    }

    pub fn get(&self, name: &str) -> Option<&PersonRecord> {
        self.index.get(name).map(|&slot| &self.people[slot])
    }

    /// Records in first-appearance order
    pub fn people(&self) -> &[PersonRecord] {
        &self.people
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Run the bonus and tier pass. Consumes the ledger.
    pub fn finalize(self, policy: &ScoringPolicy) -> Standings {
        let people: Vec<_> = self
            .people
            .into_iter()
            .map(|record| policy.grade(record))
            .collect();

        let standings = Standings::new(people);
        tracing::info!(
            people = standings.len(),
            removal_candidates = standings.removal_candidates().count(),
            "ledger finalized"
        );
        standings
    }
}

// ============================================================================
// TESTS
// ============================================================================

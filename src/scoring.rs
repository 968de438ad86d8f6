// 🏅 Bonus & Tier Engine - Rules as Data
// Bonus rules and tier thresholds applied once to every finalized person record

use crate::ledger::PersonRecord;
use anyhow::{bail, Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

// ============================================================================
// TIER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Gold,
    Silver,
    Normal,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Gold => "GOLD",
            Tier::Silver => "SILVER",
            Tier::Normal => "NORMAL",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// RULE DEFINITIONS
// ============================================================================

/// Which visit counter a bonus rule looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitCounter {
    Wednesday,
    Weekend,
}

impl VisitCounter {
    pub fn count(&self, record: &PersonRecord) -> u32 {
        match self {
            VisitCounter::Wednesday => record.wednesday_count(),
            VisitCounter::Weekend => record.weekend_count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusRule {
    /// Rule ID for tracking
    pub id: String,

    /// Counter compared against `min_visits`
    pub counter: VisitCounter,

    /// Inclusive lower bound on the counter
    pub min_visits: u32,

    /// Points added when the rule fires
    pub points: u32,

    /// Description/notes about this rule
    #[serde(default)]
    pub description: Option<String>,
}

impl BonusRule {
    /// Check against visit counts, never against points
    pub fn applies_to(&self, record: &PersonRecord) -> bool {
        self.counter.count(record) >= self.min_visits
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThresholds {
    #[serde(default = "default_gold")]
    pub gold: u32,
    #[serde(default = "default_silver")]
    pub silver: u32,
}

fn default_gold() -> u32 {
    50
}

fn default_silver() -> u32 {
    30
}

impl Default for TierThresholds {
    fn default() -> Self {
        TierThresholds {
            gold: default_gold(),
            silver: default_silver(),
        }
    }
}

impl TierThresholds {
    /// Inclusive lower bounds, GOLD checked first
    pub fn classify(&self, points: u32) -> Tier {
        if points >= self.gold {
            Tier::Gold
        } else if points >= self.silver {
            Tier::Silver
        } else {
            Tier::Normal
        }
    }
}

fn default_bonuses() -> Vec<BonusRule> {
    vec![
        BonusRule {
            id: "wednesday".to_string(),
            counter: VisitCounter::Wednesday,
            min_visits: 10,
            points: 10,
            description: Some("Ten or more Wednesday check-ins".to_string()),
        },
        BonusRule {
            id: "weekend".to_string(),
            counter: VisitCounter::Weekend,
            min_visits: 10,
            points: 10,
            description: Some("Ten or more Saturday/Sunday check-ins".to_string()),
        },
    ]
}

// ============================================================================
// SCORING POLICY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    #[serde(default = "default_bonuses")]
    pub bonuses: Vec<BonusRule>,

    #[serde(default)]
    pub tiers: TierThresholds,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        ScoringPolicy {
            bonuses: default_bonuses(),
            tiers: TierThresholds::default(),
        }
    }
}

impl ScoringPolicy {
    /// Load a policy from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read policy file: {:?}", path.as_ref()))?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let policy: ScoringPolicy =
            serde_json::from_str(content).context("Failed to parse policy JSON")?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tiers.silver > self.tiers.gold {
            bail!(
                "silver threshold ({}) must not exceed gold threshold ({})",
                self.tiers.silver,
                self.tiers.gold
            );
        }
        if let Some(rule) = self.bonuses.iter().find(|r| r.min_visits == 0) {
            bail!("bonus rule {:?} must require at least one visit", rule.id);
        }
        Ok(())
    }

    /// Rules that fire for this record, in policy order
    pub fn matching_bonuses<'a>(
        &'a self,
        record: &'a PersonRecord,
    ) -> impl Iterator<Item = &'a BonusRule> + 'a {
        self.bonuses.iter().filter(move |rule| rule.applies_to(record))
    }

    /// Apply bonuses and classify one person. Consumes the ledger entry so
    /// the bonus pass cannot run twice on it.
    pub fn grade(&self, record: PersonRecord) -> GradedPerson {
        let mut bonus_points: u32 = 0;
        let mut bonuses = Vec::new();
        for rule in self.matching_bonuses(&record) {
            bonus_points = bonus_points.saturating_add(rule.points);
            bonuses.push(rule.id.clone());
        }

        let points = record.points().saturating_add(bonus_points);
        GradedPerson {
            tier: self.tiers.classify(points),
            points,
            bonus_points,
            bonuses,
            record,
        }
    }
}

// ============================================================================
// GRADED RESULTS
// ============================================================================

/// A person record after the bonus pass; read-only from here on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradedPerson {
    pub record: PersonRecord,
    /// Final points (base + bonus)
    pub points: u32,
    pub bonus_points: u32,
    /// IDs of the bonus rules that fired
    pub bonuses: Vec<String>,
    pub tier: Tier,
}

impl GradedPerson {
    pub fn name(&self) -> &str {
        self.record.name()
    }

    pub fn base_points(&self) -> u32 {
        self.record.points()
    }

    /// NORMAL tier with no Wednesday and no weekend visits. A reporting label only.
    pub fn is_removal_eligible(&self) -> bool {
        self.tier == Tier::Normal
            && self.record.wednesday_count() == 0
            && self.record.weekend_count() == 0
    }
}

/// All graded people in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Standings {
    people: Vec<GradedPerson>,
}

impl Standings {
    pub(crate) fn new(people: Vec<GradedPerson>) -> Self {
        Standings { people }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GradedPerson> {
        self.people.iter()
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&GradedPerson> {
        self.people.iter().find(|p| p.name() == name)
    }

    pub fn removal_candidates(&self) -> impl Iterator<Item = &GradedPerson> {
        self.people.iter().filter(|p| p.is_removal_eligible())
    }

    pub fn count_by_tier(&self, tier: Tier) -> usize {
        self.people.iter().filter(|p| p.tier == tier).count()
    }
}

impl<'a> IntoIterator for &'a Standings {
    type Item = &'a GradedPerson;
    type IntoIter = std::slice::Iter<'a, GradedPerson>;

    fn into_iter(self) -> Self::IntoIter {
        self.people.iter()
    }
}

// ============================================================================
// TESTS
// ============================================================================

//! Per-level coverage and coverage thresholds.

use super::Resolver;
use super::chains::TraceDirection;
use crate::domain::{ArtifactKind, MAX_LEVEL, MIN_LEVEL};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Coverage between one level and the level below it.
///
/// The population is the lower level (`upper + 1`): an artifact there counts
/// as covered when at least one hierarchical link takes it up to an artifact
/// on `upper`. An empty population is vacuously covered and flagged
/// `degenerate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCoverage {
    /// Higher level of the pair (1-5)
    pub upper: u8,

    /// Lower level of the pair (`upper + 1`)
    pub lower: u8,

    /// Artifacts on `lower` linked up to `upper`
    pub covered: usize,

    /// Artifacts on `lower`
    pub total: usize,

    /// `covered / total` as a whole percentage, rounded half up
    pub percent: u8,

    /// Whether `total` was zero
    pub degenerate: bool,
}

impl LevelCoverage {
    /// Build a coverage entry, applying the rounding and empty-level rules.
    pub fn new(upper: u8, covered: usize, total: usize) -> Self {
        let covered = covered.min(total);
        let (percent, degenerate) = if total == 0 {
            (100, true)
        } else {
            (rounded_percent(covered, total), false)
        };

        Self {
            upper,
            lower: upper + 1,
            covered,
            total,
            percent,
            degenerate,
        }
    }

    /// Label like `3→4`.
    pub fn label(&self) -> String {
        format!("{}→{}", self.upper, self.lower)
    }
}

/// Round `100 * covered / total` to the nearest integer, halves rounding up.
fn rounded_percent(covered: usize, total: usize) -> u8 {
    let scaled = (covered as u128 * 200 + total as u128) / (total as u128 * 2);
    u8::try_from(scaled).unwrap_or(100)
}

/// Minimum coverage required per level pair.
///
/// `min-percent` applies to every pair; `overrides` replaces it for single
/// pairs, keyed by the pair's upper level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CoverageThresholds {
    /// Minimum percent for every pair (0 disables the gate)
    #[serde(default)]
    pub min_percent: u8,

    /// Per-pair minimums keyed by upper level
    #[serde(default)]
    pub overrides: BTreeMap<u8, u8>,
}

impl CoverageThresholds {
    /// Apply one minimum to every pair
    pub fn uniform(min_percent: u8) -> Self {
        Self {
            min_percent,
            overrides: BTreeMap::new(),
        }
    }

    /// Minimum percent for the pair starting at `upper`
    pub fn min_for(&self, upper: u8) -> u8 {
        self.overrides
            .get(&upper)
            .copied()
            .unwrap_or(self.min_percent)
    }
}

/// A level pair that fell below its threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageFailure {
    /// The offending pair
    pub coverage: LevelCoverage,

    /// Minimum percent that was required
    pub required: u8,
}

impl Resolver<'_> {
    /// Coverage for every adjacent level pair, top to bottom.
    pub fn coverage(&self) -> Vec<LevelCoverage> {
        (MIN_LEVEL..MAX_LEVEL)
            .map(|upper| self.coverage_for(upper))
            .collect()
    }

    fn coverage_for(&self, upper: u8) -> LevelCoverage {
        let Some(lower_kind) = ArtifactKind::from_level(upper + 1) else {
            return LevelCoverage::new(upper, 0, 0);
        };

        let population = self.snapshot.artifacts().all_of_kind(lower_kind);
        let total = population.clone().count();
        let covered = population
            .filter(|artifact| {
                self.hierarchical_neighbors(&artifact.id, TraceDirection::Backward)
                    .iter()
                    .any(|target| target.level() == upper)
            })
            .count();

        LevelCoverage::new(upper, covered, total)
    }
}

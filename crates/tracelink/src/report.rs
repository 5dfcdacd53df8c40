//! Table rows derived from a resolution.
//!
//! [`format_report`] is a pure mapping: it neither re-derives nor validates
//! anything, it only lays the resolver's output out as rows. Rendering those
//! rows to a terminal or JSON is the job of [`crate::output`].

use crate::domain::{ArtifactId, ArtifactKind, LinkType, MAX_LEVEL, MIN_LEVEL};
use crate::resolver::{
    Chain, ChainStatus, CoverageFailure, CoverageThresholds, DanglingLink, LevelCoverage,
    MissingSide, Orphan, RelatedPair, Resolution, Summary,
};
use serde::Serialize;

/// One row of the forward or backward traceability matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixRow {
    /// Level 1 cell
    pub business_need: Option<ArtifactId>,
    /// Level 2 cell
    pub stakeholder_requirement: Option<ArtifactId>,
    /// Level 3 cell
    pub system_requirement: Option<ArtifactId>,
    /// Level 4 cell
    pub design_element: Option<ArtifactId>,
    /// Level 5 cell
    pub code_unit: Option<ArtifactId>,
    /// Level 6 cell
    pub test_case: Option<ArtifactId>,
    /// `Complete` or `BrokenAtLevel-N`
    pub chain_status: ChainStatus,
}

impl MatrixRow {
    /// Cells in level order (1-6).
    pub fn cells(&self) -> [Option<&ArtifactId>; 6] {
        [
            self.business_need.as_ref(),
            self.stakeholder_requirement.as_ref(),
            self.system_requirement.as_ref(),
            self.design_element.as_ref(),
            self.code_unit.as_ref(),
            self.test_case.as_ref(),
        ]
    }
}

impl From<&Chain> for MatrixRow {
    fn from(chain: &Chain) -> Self {
        let cell = |level: u8| chain.at_level(level).cloned();
        Self {
            business_need: cell(1),
            stakeholder_requirement: cell(2),
            system_requirement: cell(3),
            design_element: cell(4),
            code_unit: cell(5),
            test_case: cell(6),
            chain_status: chain.status,
        }
    }
}

/// One row of the coverage table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageRow {
    /// Upper level of the pair
    pub upper: u8,
    /// Pair label such as `3→4`
    pub level_pair: String,
    /// Rounded percentage
    pub coverage_percent: u8,
    /// Whether the lower level had no artifacts
    pub is_degenerate: bool,
    /// Covered artifacts on the lower level
    pub covered: usize,
    /// All artifacts on the lower level
    pub total: usize,
}

impl From<&LevelCoverage> for CoverageRow {
    fn from(cov: &LevelCoverage) -> Self {
        Self {
            upper: cov.upper,
            level_pair: cov.label(),
            coverage_percent: cov.percent,
            is_degenerate: cov.degenerate,
            covered: cov.covered,
            total: cov.total,
        }
    }
}

/// One row of the orphan list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanRow {
    /// Orphaned artifact
    pub artifact_id: ArtifactId,
    /// Its kind
    pub kind: ArtifactKind,
}

impl From<&Orphan> for OrphanRow {
    fn from(orphan: &Orphan) -> Self {
        Self {
            artifact_id: orphan.id.clone(),
            kind: orphan.kind,
        }
    }
}

/// One row of the dangling-link list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingRow {
    /// Declared source
    pub source: ArtifactId,
    /// Declared target
    pub target: ArtifactId,
    /// Declared type
    #[serde(rename = "type")]
    pub link_type: LinkType,
    /// Missing end
    pub missing_side: MissingSide,
}

impl From<&DanglingLink> for DanglingRow {
    fn from(link: &DanglingLink) -> Self {
        Self {
            source: link.source.clone(),
            target: link.target.clone(),
            link_type: link.link_type,
            missing_side: link.missing,
        }
    }
}

/// One row of the conflicts/duplicates list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedRow {
    /// First artifact
    pub first: ArtifactId,
    /// Second artifact
    pub second: ArtifactId,
    /// `conflicts` or `duplicates`
    #[serde(rename = "type")]
    pub link_type: LinkType,
}

impl From<&RelatedPair> for RelatedRow {
    fn from(pair: &RelatedPair) -> Self {
        Self {
            first: pair.first.clone(),
            second: pair.second.clone(),
            link_type: pair.link_type,
        }
    }
}

/// A level pair below its required minimum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRow {
    /// Pair label such as `4→5`
    pub level_pair: String,
    /// Measured percentage
    pub coverage_percent: u8,
    /// Required percentage
    pub required_percent: u8,
}

impl From<&CoverageFailure> for FailureRow {
    fn from(failure: &CoverageFailure) -> Self {
        Self {
            level_pair: failure.coverage.label(),
            coverage_percent: failure.coverage.percent,
            required_percent: failure.required,
        }
    }
}

/// Outcome of the coverage gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// True when no pair failed
    pub passed: bool,
    /// Thresholds that were applied
    pub thresholds: CoverageThresholds,
    /// Every pair, for context
    pub coverage: Vec<CoverageRow>,
    /// Pairs below their minimum
    pub failures: Vec<FailureRow>,
}

/// All report sections, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Snapshot fingerprint
    pub fingerprint: String,
    /// Headline counts
    pub summary: Summary,
    /// Forward matrix
    pub forward: Vec<MatrixRow>,
    /// Backward matrix
    pub backward: Vec<MatrixRow>,
    /// Coverage table
    pub coverage: Vec<CoverageRow>,
    /// Orphan list
    pub orphans: Vec<OrphanRow>,
    /// Dangling-link list
    pub dangling: Vec<DanglingRow>,
    /// Conflicts/duplicates list
    pub related: Vec<RelatedRow>,
}

/// Lay a resolution out as report rows.
pub fn format_report(resolution: &Resolution) -> Report {
    Report {
        fingerprint: resolution.fingerprint.clone(),
        summary: resolution.summary(),
        forward: resolution.forward.iter().map(MatrixRow::from).collect(),
        backward: resolution.backward.iter().map(MatrixRow::from).collect(),
        coverage: resolution.coverage.iter().map(CoverageRow::from).collect(),
        orphans: resolution.orphans.iter().map(OrphanRow::from).collect(),
        dangling: resolution.dangling.iter().map(DanglingRow::from).collect(),
        related: resolution.related.iter().map(RelatedRow::from).collect(),
    }
}

/// Evaluate the coverage gate.
pub fn format_check(resolution: &Resolution, thresholds: &CoverageThresholds) -> CheckReport {
    let failures: Vec<FailureRow> = resolution
        .coverage_failures(thresholds)
        .iter()
        .map(FailureRow::from)
        .collect();
    CheckReport {
        passed: failures.is_empty(),
        thresholds: thresholds.clone(),
        coverage: resolution.coverage.iter().map(CoverageRow::from).collect(),
        failures,
    }
}

/// Column headers for matrix rows, in level order.
pub fn matrix_headers() -> Vec<&'static str> {
    (MIN_LEVEL..=MAX_LEVEL)
        .filter_map(ArtifactKind::from_level)
        .map(ArtifactKind::abbreviation)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::TraceDirection;

    #[test]
    fn backward_chain_fills_cells_by_level() {
        let chain = Chain {
            direction: TraceDirection::Backward,
            artifacts: vec!["TEST-1".into(), "CODE-1".into(), "DES-1".into()],
            status: ChainStatus::BrokenAtLevel(3),
        };

        let row = MatrixRow::from(&chain);

        assert_eq!(row.test_case, Some("TEST-1".into()));
        assert_eq!(row.code_unit, Some("CODE-1".into()));
        assert_eq!(row.design_element, Some("DES-1".into()));
        assert_eq!(row.system_requirement, None);
        assert_eq!(row.business_need, None);
        assert_eq!(row.chain_status, ChainStatus::BrokenAtLevel(3));
    }

    #[test]
    fn headers_follow_levels() {
        assert_eq!(
            matrix_headers(),
            vec!["BN", "StR", "REQ", "DES", "CODE", "TEST"]
        );
    }

    #[test]
    fn check_lists_pairs_below_threshold() {
        let resolution = Resolution {
            fingerprint: String::new(),
            artifact_count: 0,
            link_count: 0,
            forward: vec![],
            backward: vec![],
            coverage: vec![LevelCoverage::new(1, 1, 2), LevelCoverage::new(2, 0, 0)],
            orphans: vec![],
            dangling: vec![],
            related: vec![],
        };

        let check = format_check(&resolution, &CoverageThresholds::uniform(80));

        assert!(!check.passed);
        assert_eq!(
            check.failures,
            vec![FailureRow {
                level_pair: "1→2".to_string(),
                coverage_percent: 50,
                required_percent: 80,
            }]
        );
        assert_eq!(check.coverage.len(), 2);
    }

    #[test]
    fn coverage_row_copies_flags() {
        let row = CoverageRow::from(&LevelCoverage::new(3, 0, 0));
        assert_eq!(row.upper, 3);
        assert_eq!(row.level_pair, "3→4");
        assert_eq!(row.coverage_percent, 100);
        assert!(row.is_degenerate);
    }
}

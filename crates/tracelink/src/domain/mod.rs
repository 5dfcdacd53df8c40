//! Domain types for traceability analysis.
//!
//! Artifacts live on one of six fixed levels, from business needs at the
//! top down to test cases at the bottom. Links connect artifacts; the
//! hierarchical link types always point from the lower-level artifact
//! (`source`) up to the higher-level one (`target`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest (most abstract) artifact level.
pub const MIN_LEVEL: u8 = 1;

/// Highest (most concrete) artifact level.
pub const MAX_LEVEL: u8 = 6;

/// Unique identifier for an artifact, e.g. `REQ-F-001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(pub String);

impl ArtifactId {
    /// Create a new artifact ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ArtifactId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ArtifactId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ArtifactId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Kind of artifact. Each kind sits on exactly one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Level 1: business need or goal
    BusinessNeed,

    /// Level 2: stakeholder requirement
    StakeholderRequirement,

    /// Level 3: system requirement
    SystemRequirement,

    /// Level 4: architecture or design element
    DesignElement,

    /// Level 5: unit of source code
    CodeUnit,

    /// Level 6: test case
    TestCase,
}

impl ArtifactKind {
    /// All kinds, in level order.
    pub const ALL: [ArtifactKind; 6] = [
        ArtifactKind::BusinessNeed,
        ArtifactKind::StakeholderRequirement,
        ArtifactKind::SystemRequirement,
        ArtifactKind::DesignElement,
        ArtifactKind::CodeUnit,
        ArtifactKind::TestCase,
    ];

    /// The fixed level (1-6) of this kind.
    pub fn level(self) -> u8 {
        match self {
            Self::BusinessNeed => 1,
            Self::StakeholderRequirement => 2,
            Self::SystemRequirement => 3,
            Self::DesignElement => 4,
            Self::CodeUnit => 5,
            Self::TestCase => 6,
        }
    }

    /// The kind living on `level`, if the level is in range.
    pub fn from_level(level: u8) -> Option<Self> {
        level
            .checked_sub(MIN_LEVEL)
            .and_then(|idx| Self::ALL.get(usize::from(idx)).copied())
    }

    /// Short column label used in matrix headers.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::BusinessNeed => "BN",
            Self::StakeholderRequirement => "StR",
            Self::SystemRequirement => "REQ",
            Self::DesignElement => "DES",
            Self::CodeUnit => "CODE",
            Self::TestCase => "TEST",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BusinessNeed => "business_need",
            Self::StakeholderRequirement => "stakeholder_requirement",
            Self::SystemRequirement => "system_requirement",
            Self::DesignElement => "design_element",
            Self::CodeUnit => "code_unit",
            Self::TestCase => "test_case",
        };
        write!(f, "{name}")
    }
}

/// A typed artifact in the store.
///
/// The level is derived from the kind and cannot drift from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Unique identifier
    pub id: ArtifactId,

    /// Artifact kind
    pub kind: ArtifactKind,
}

impl Artifact {
    /// Create a new artifact
    pub fn new(id: impl Into<ArtifactId>, kind: ArtifactKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    /// Level of this artifact (1-6)
    pub fn level(&self) -> u8 {
        self.kind.level()
    }
}

/// Type of link between two artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    /// Lower-level artifact satisfies a higher-level one
    Satisfies,

    /// Lower-level artifact is derived from a higher-level one
    Derives,

    /// Informational dependency, not part of the hierarchy
    Depends,

    /// The two artifacts contradict each other (symmetric)
    Conflicts,

    /// The two artifacts state the same thing (symmetric)
    Duplicates,

    /// Test case verifies a higher-level artifact
    Verifies,

    /// Code or design implements a higher-level artifact
    Implements,
}

impl LinkType {
    /// All link types, in declaration order.
    pub const ALL: [LinkType; 7] = [
        LinkType::Satisfies,
        LinkType::Derives,
        LinkType::Depends,
        LinkType::Conflicts,
        LinkType::Duplicates,
        LinkType::Verifies,
        LinkType::Implements,
    ];

    /// Whether this link type takes part in chains, coverage and orphan detection.
    pub fn is_hierarchical(self) -> bool {
        matches!(
            self,
            Self::Satisfies | Self::Derives | Self::Implements | Self::Verifies
        )
    }

    /// Whether `(a, b)` and `(b, a)` denote the same link.
    pub fn is_symmetric(self) -> bool {
        matches!(self, Self::Conflicts | Self::Duplicates)
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Satisfies => "satisfies",
            Self::Derives => "derives",
            Self::Depends => "depends",
            Self::Conflicts => "conflicts",
            Self::Duplicates => "duplicates",
            Self::Verifies => "verifies",
            Self::Implements => "implements",
        };
        write!(f, "{name}")
    }
}

/// A directed, typed link between two artifacts.
///
/// Edge direction follows the hierarchy: for hierarchical types `source` is
/// the lower-level artifact and `target` the higher-level one. A test case
/// verifying a system requirement is `TEST-1 -> REQ-1` with type `Verifies`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    /// Lower-level end for hierarchical links
    pub source: ArtifactId,

    /// Higher-level end for hierarchical links
    pub target: ArtifactId,

    /// Link type
    #[serde(rename = "type")]
    pub link_type: LinkType,
}

impl Link {
    /// Create a new link
    pub fn new(
        source: impl Into<ArtifactId>,
        target: impl Into<ArtifactId>,
        link_type: LinkType,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            link_type,
        }
    }

    /// Whether `other` denotes the same link, taking symmetry into account.
    pub fn same_as(&self, other: &Link) -> bool {
        if self.link_type != other.link_type {
            return false;
        }
        let direct = self.source == other.source && self.target == other.target;
        let reversed = self.source == other.target && self.target == other.source;
        direct || (self.link_type.is_symmetric() && reversed)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.source, self.target, self.link_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn levels_follow_kind_order() {
        for (idx, kind) in ArtifactKind::ALL.iter().enumerate() {
            let expected = u8::try_from(idx).unwrap() + 1;
            assert_eq!(kind.level(), expected);
            assert_eq!(ArtifactKind::from_level(expected), Some(*kind));
        }
    }

    #[rstest]
    #[case::zero(0)]
    #[case::seven(7)]
    #[case::max(u8::MAX)]
    fn from_level_rejects_out_of_range(#[case] level: u8) {
        assert_eq!(ArtifactKind::from_level(level), None);
    }

    #[rstest]
    #[case::satisfies(LinkType::Satisfies, true, false)]
    #[case::derives(LinkType::Derives, true, false)]
    #[case::implements(LinkType::Implements, true, false)]
    #[case::verifies(LinkType::Verifies, true, false)]
    #[case::depends(LinkType::Depends, false, false)]
    #[case::conflicts(LinkType::Conflicts, false, true)]
    #[case::duplicates(LinkType::Duplicates, false, true)]
    fn link_type_classification(
        #[case] link_type: LinkType,
        #[case] hierarchical: bool,
        #[case] symmetric: bool,
    ) {
        assert_eq!(link_type.is_hierarchical(), hierarchical);
        assert_eq!(link_type.is_symmetric(), symmetric);
    }

    #[test]
    fn symmetric_links_match_reversed() {
        let a = Link::new("REQ-2", "REQ-3", LinkType::Conflicts);
        let b = Link::new("REQ-3", "REQ-2", LinkType::Conflicts);
        assert!(a.same_as(&b));

        let c = Link::new("REQ-1", "STR-1", LinkType::Satisfies);
        let d = Link::new("STR-1", "REQ-1", LinkType::Satisfies);
        assert!(!c.same_as(&d));
    }

    #[test]
    fn serde_uses_snake_case_names() {
        let json = serde_json::to_string(&Link::new("A-1", "B-1", LinkType::Verifies)).unwrap();
        assert_eq!(json, r#"{"source":"A-1","target":"B-1","type":"verifies"}"#);

        let kind: ArtifactKind = serde_json::from_str("\"stakeholder_requirement\"").unwrap();
        assert_eq!(kind, ArtifactKind::StakeholderRequirement);
    }
}

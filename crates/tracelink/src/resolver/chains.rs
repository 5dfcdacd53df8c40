//! Forward and backward chain enumeration.

use super::Resolver;
use crate::domain::{Artifact, ArtifactId, ArtifactKind, MAX_LEVEL, MIN_LEVEL};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which end of the hierarchy a chain starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceDirection {
    /// Business need (level 1) down to test case (level 6)
    Forward,

    /// Test case (level 6) up to business need (level 1)
    Backward,
}

impl TraceDirection {
    /// Level a chain in this direction starts on.
    pub fn seed_level(self) -> u8 {
        match self {
            Self::Forward => MIN_LEVEL,
            Self::Backward => MAX_LEVEL,
        }
    }

    /// The level after `level`, or `None` past the terminal level.
    pub fn step(self, level: u8) -> Option<u8> {
        let next = match self {
            Self::Forward => level.checked_add(1)?,
            Self::Backward => level.checked_sub(1)?,
        };
        (MIN_LEVEL..=MAX_LEVEL).contains(&next).then_some(next)
    }
}

/// Outcome of following one chain.
///
/// Serialized as its display form, `Complete` or `BrokenAtLevel-N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ChainStatus {
    /// Every adjacent level is connected
    Complete,

    /// No link reaches this level from the previous one
    BrokenAtLevel(u8),
}

impl ChainStatus {
    /// Whether the chain is complete
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl fmt::Display for ChainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete => write!(f, "Complete"),
            Self::BrokenAtLevel(level) => write!(f, "BrokenAtLevel-{level}"),
        }
    }
}

impl From<ChainStatus> for String {
    fn from(status: ChainStatus) -> Self {
        status.to_string()
    }
}

impl TryFrom<String> for ChainStatus {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s == "Complete" {
            return Ok(Self::Complete);
        }
        s.strip_prefix("BrokenAtLevel-")
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (MIN_LEVEL..=MAX_LEVEL).contains(n))
            .map(Self::BrokenAtLevel)
            .ok_or_else(|| format!("invalid chain status: {s}"))
    }
}

/// One path through the hierarchy.
///
/// `artifacts` is in traversal order: level 1 first for forward chains,
/// level 6 first for backward chains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    /// Direction the chain was traced in
    pub direction: TraceDirection,

    /// Artifacts on the path, one per level reached
    pub artifacts: Vec<ArtifactId>,

    /// Whether the path reached the far end
    pub status: ChainStatus,
}

impl Chain {
    /// The artifact this chain holds on `level`, if it reached that level.
    pub fn at_level(&self, level: u8) -> Option<&ArtifactId> {
        let seed = self.direction.seed_level();
        let offset = match self.direction {
            TraceDirection::Forward => level.checked_sub(seed)?,
            TraceDirection::Backward => seed.checked_sub(level)?,
        };
        self.artifacts.get(usize::from(offset))
    }
}

impl Resolver<'_> {
    /// Enumerate every simple path starting from the seed level of `direction`.
    ///
    /// Seeds and next hops are visited in store order. Only links between adjacent
    /// levels extend a chain, so a link that skips a level never completes one.
    pub fn chains(&self, direction: TraceDirection) -> Vec<Chain> {
        let Some(seed_kind) = ArtifactKind::from_level(direction.seed_level()) else {
            return Vec::new();
        };

        let mut chains = Vec::new();
        for seed in self.snapshot.artifacts().all_of_kind(seed_kind) {
            let mut path = vec![seed.id.clone()];
            self.walk(direction, seed, &mut path, &mut chains);
        }

        tracing::debug!(
            ?direction,
            count = chains.len(),
            complete = chains.iter().filter(|c| c.status.is_complete()).count(),
            "Enumerated chains"
        );
        chains
    }

    fn walk(
        &self,
        direction: TraceDirection,
        current: &Artifact,
        path: &mut Vec<ArtifactId>,
        out: &mut Vec<Chain>,
    ) {
        let Some(next_level) = direction.step(current.level()) else {
            out.push(Chain {
                direction,
                artifacts: path.clone(),
                status: ChainStatus::Complete,
            });
            return;
        };

        let next: Vec<&Artifact> = self
            .hierarchical_neighbors(&current.id, direction)
            .into_iter()
            .filter(|a| a.level() == next_level)
            .collect();

        if next.is_empty() {
            out.push(Chain {
                direction,
                artifacts: path.clone(),
                status: ChainStatus::BrokenAtLevel(next_level),
            });
            return;
        }

        for artifact in next {
            path.push(artifact.id.clone());
            self.walk(direction, artifact, path, out);
            path.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_stays_within_levels() {
        assert_eq!(TraceDirection::Forward.step(1), Some(2));
        assert_eq!(TraceDirection::Forward.step(6), None);
        assert_eq!(TraceDirection::Backward.step(6), Some(5));
        assert_eq!(TraceDirection::Backward.step(1), None);
    }

    #[test]
    fn status_display() {
        assert_eq!(ChainStatus::Complete.to_string(), "Complete");
        assert_eq!(ChainStatus::BrokenAtLevel(4).to_string(), "BrokenAtLevel-4");
    }

    #[test]
    fn status_serializes_as_display_form() {
        let json = serde_json::to_string(&ChainStatus::BrokenAtLevel(4)).unwrap();
        assert_eq!(json, "\"BrokenAtLevel-4\"");

        let parsed: ChainStatus = serde_json::from_str("\"Complete\"").unwrap();
        assert_eq!(parsed, ChainStatus::Complete);

        assert!(serde_json::from_str::<ChainStatus>("\"BrokenAtLevel-9\"").is_err());
    }

    #[test]
    fn at_level_maps_both_directions() {
        let forward = Chain {
            direction: TraceDirection::Forward,
            artifacts: vec!["BN-1".into(), "STR-1".into()],
            status: ChainStatus::BrokenAtLevel(3),
        };
        assert_eq!(forward.at_level(2).map(ArtifactId::as_str), Some("STR-1"));
        assert_eq!(forward.at_level(3), None);

        let backward = Chain {
            direction: TraceDirection::Backward,
            artifacts: vec!["TEST-1".into(), "CODE-1".into()],
            status: ChainStatus::BrokenAtLevel(4),
        };
        assert_eq!(backward.at_level(5).map(ArtifactId::as_str), Some("CODE-1"));
        assert_eq!(backward.at_level(1), None);
    }
}

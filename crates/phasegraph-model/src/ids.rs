//! Node and end-marker identifiers
//!
//! Provides [`PhaseId`] for phases and sub-phases, [`EndId`] for the fixed
//! terminal markers, and the monotonic [`IdGenerator`] that hands out phase ids.

use crate::error::IdError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

const PHASE_ID_PREFIX: &str = "phase-";

/// Identifier of a phase or sub-phase
///
/// Rendered as `phase-N`. Phases and sub-phases draw from the same counter,
/// so an id names exactly one node for the lifetime of a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhaseId(u64);

impl PhaseId {
    /// Create id from its sequence number
    #[inline]
    #[must_use]
    pub const fn new(seq: u64) -> Self {
        Self(seq)
    }
}

impl Display for PhaseId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{PHASE_ID_PREFIX}{}", self.0)
    }
}

impl FromStr for PhaseId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(PHASE_ID_PREFIX)
            .and_then(|n| n.parse::<u64>().ok())
            .filter(|n| *n > 0)
            .map(Self)
            .ok_or_else(|| IdError::MalformedPhaseId(s.to_string()))
    }
}

impl Serialize for PhaseId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PhaseId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Identifier of one of the fixed end markers (1..=3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EndId(u8);

impl EndId {
    /// Smallest valid end id
    pub const MIN: u8 = 1;
    /// Largest valid end id
    pub const MAX: u8 = 3;

    /// Create end id
    ///
    /// # Errors
    /// Returns error if `id` is outside `1..=3`
    #[inline]
    pub fn new(id: u8) -> Result<Self, IdError> {
        if id < Self::MIN || id > Self::MAX {
            return Err(IdError::EndOutOfRange(id));
        }
        Ok(Self(id))
    }

    /// Raw marker number
    #[inline]
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    pub(crate) const fn new_unchecked(id: u8) -> Self {
        Self(id)
    }
}

impl Display for EndId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "end-{}", self.0)
    }
}

impl FromStr for EndId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("end-").unwrap_or(s);
        let raw = digits
            .parse::<u8>()
            .map_err(|_| IdError::MalformedTarget(s.to_string()))?;
        Self::new(raw)
    }
}

impl Serialize for EndId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for EndId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u8::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Monotonic phase id source
///
/// Never rewinds: ids stay unique after deletions and after the default
/// phase is re-created.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    /// Create generator whose first id is `phase-1`
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unused id
    #[inline]
    pub fn next_id(&mut self) -> PhaseId {
        self.last += 1;
        PhaseId(self.last)
    }

    /// Number of ids handed out so far
    #[inline]
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.last
    }
}

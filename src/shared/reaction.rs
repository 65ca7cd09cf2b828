//! Reaction kinds, targets and tallies
//!
//! The reaction set is closed and process-wide: each kind has a display label
//! (which is also the key used in tallies and in the backend's responses) and
//! a small integer id understood by `POST /reactions`.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One of the fixed reaction kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReactionKind {
    Like,
    Love,
    Celebrate,
    Insightful,
    Agree,
    Funny,
}

impl ReactionKind {
    /// Every kind, in the order the backend numbers them
    pub const ALL: [ReactionKind; 6] = [
        ReactionKind::Like,
        ReactionKind::Love,
        ReactionKind::Celebrate,
        ReactionKind::Insightful,
        ReactionKind::Agree,
        ReactionKind::Funny,
    ];

    /// Label as stored by the backend
    pub fn label(self) -> &'static str {
        match self {
            ReactionKind::Like => "Me gusta",
            ReactionKind::Love => "Me encanta",
            ReactionKind::Celebrate => "Celebrar",
            ReactionKind::Insightful => "Interesante",
            ReactionKind::Agree => "De acuerdo",
            ReactionKind::Funny => "Hacer gracias",
        }
    }

    /// Numeric id sent as `reactionTypeId`
    pub fn type_id(self) -> u8 {
        match self {
            ReactionKind::Like => 1,
            ReactionKind::Love => 2,
            ReactionKind::Celebrate => 3,
            ReactionKind::Insightful => 4,
            ReactionKind::Agree => 5,
            ReactionKind::Funny => 6,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            ReactionKind::Like => "👍",
            ReactionKind::Love => "❤️",
            ReactionKind::Celebrate => "🎉",
            ReactionKind::Insightful => "💡",
            ReactionKind::Agree => "🤝",
            ReactionKind::Funny => "😄",
        }
    }

    /// Look a kind up by its backend label
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|k| k.label() == label)
    }

    /// Look a kind up by its numeric id
    pub fn from_type_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.type_id() == id)
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ReactionKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ReactionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        ReactionKind::from_label(&label)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown reaction kind '{}'", label)))
    }
}

/// Deserialize an optional reaction label, mapping unknown or empty labels to `None`
pub(crate) fn lenient_reaction<'de, D>(deserializer: D) -> Result<Option<ReactionKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let label: Option<String> = Option::deserialize(deserializer)?;
    Ok(label.as_deref().and_then(ReactionKind::from_label))
}

/// What a reaction or comment is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TargetType {
    Post,
    Comment,
}

impl TargetType {
    /// Query-string form used by the REST API
    pub fn as_str(self) -> &'static str {
        match self {
            TargetType::Post => "POST",
            TargetType::Comment => "COMMENT",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping from reaction label to count.
///
/// Keys are labels rather than [`ReactionKind`] so that a label the client
/// does not know about is still carried through. Counts are never negative:
/// negative wire values are clamped to zero on the way in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReactionTally(BTreeMap<String, u64>);

impl ReactionTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for a label; absent labels count zero
    pub fn count(&self, label: &str) -> u64 {
        self.0.get(label).copied().unwrap_or(0)
    }

    /// Count for a known kind
    pub fn count_of(&self, kind: ReactionKind) -> u64 {
        self.count(kind.label())
    }

    /// Sum of every count
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|c| *c == 0)
    }

    /// Builder-style setter, mostly for fixtures
    pub fn with(mut self, label: impl Into<String>, count: u64) -> Self {
        self.0.insert(label.into(), count);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, u64)> for ReactionTally {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for ReactionTally {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<BTreeMap<String, i64>> = Option::deserialize(deserializer)?;
        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .map(|(label, count)| (label, count.max(0) as u64))
            .collect())
    }
}

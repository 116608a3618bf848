use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of matches kept per player.
pub const HISTORY_CAPACITY: usize = 10;

/// A single finished match as stored on the player record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchEntry {
    pub hero: String,
    pub win: bool,
    pub prestige: i64,
    pub kills: i64,
    pub damage: i64,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub recorded_at: DateTime<Utc>,
}

/// Bounded match log, newest entry first.
///
/// Serializes as a plain array so the stored document shape matches
/// the wire shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchHistory {
    entries: VecDeque<MatchEntry>,
}

impl MatchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends an entry, evicting the oldest once past capacity.
    pub fn record(&mut self, entry: MatchEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

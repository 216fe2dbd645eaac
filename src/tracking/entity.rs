use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary safety classification of a tracked tourist
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyStatus {
    Safe,
    Distress,
}

impl SafetyStatus {
    /// The other status (SAFE <-> DISTRESS)
    pub fn flipped(self) -> Self {
        match self {
            SafetyStatus::Safe => SafetyStatus::Distress,
            SafetyStatus::Distress => SafetyStatus::Safe,
        }
    }

    pub fn is_distress(self) -> bool {
        matches!(self, SafetyStatus::Distress)
    }
}

impl fmt::Display for SafetyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SafetyStatus::Safe => write!(f, "SAFE"),
            SafetyStatus::Distress => write!(f, "DISTRESS"),
        }
    }
}

/// How a "time ago" label is worded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelStyle {
    /// "7 min ago" (map popups)
    Short,
    /// "1 minute ago" / "7 minutes ago" (list rows)
    Long,
}

/// Human-relative "last seen" label.
///
/// The minute count is drawn at random each tick; it is not an elapsed-time
/// measurement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct TimeAgo {
    pub minutes: u32,
    pub style: LabelStyle,
}

impl TimeAgo {
    pub fn short(minutes: u32) -> Self {
        Self {
            minutes,
            style: LabelStyle::Short,
        }
    }

    pub fn long(minutes: u32) -> Self {
        Self {
            minutes,
            style: LabelStyle::Long,
        }
    }
}

impl fmt::Display for TimeAgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style {
            LabelStyle::Short => write!(f, "{} min ago", self.minutes),
            LabelStyle::Long if self.minutes == 1 => write!(f, "1 minute ago"),
            LabelStyle::Long => write!(f, "{} minutes ago", self.minutes),
        }
    }
}

impl From<TimeAgo> for String {
    fn from(label: TimeAgo) -> Self {
        label.to_string()
    }
}

/// Latitude/longitude pair in decimal degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

/// Map-surface entity: a tourist pinned at a moving position
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLocation {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub position: Position,
    pub status: SafetyStatus,
    pub last_update: TimeAgo,
}

/// List-surface entity: a registered tourist with static contact details
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TouristRecord {
    pub id: String,
    pub full_name: String,
    pub passport_number: String,
    pub last_seen: TimeAgo,
    pub status: SafetyStatus,
    pub location: String,
    pub emergency_contact: String,
}

/// Anything carrying a safety status, so counts work over both surfaces
pub trait Tracked {
    fn status(&self) -> SafetyStatus;
}

impl Tracked for MapLocation {
    fn status(&self) -> SafetyStatus {
        self.status
    }
}

impl Tracked for TouristRecord {
    fn status(&self) -> SafetyStatus {
        self.status
    }
}

/// Safe/distress tallies over a snapshot
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub safe: usize,
    pub distress: usize,
}

impl StatusCounts {
    pub fn tally<T: Tracked>(entities: &[T]) -> Self {
        entities
            .iter()
            .fold(StatusCounts::default(), |mut counts, entity| {
                match entity.status() {
                    SafetyStatus::Safe => counts.safe += 1,
                    SafetyStatus::Distress => counts.distress += 1,
                }
                counts
            })
    }
}

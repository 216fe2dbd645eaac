use super::feed::Feed;
use rand::Rng;
use serde::Serialize;

/// Safe zone count is fixed; the other counters are drawn per tick.
pub const SAFE_ZONES: u32 = 12;

/// Summary counters shown on the stat cards.
///
/// These are an independent mock stream and are NOT derived from the map or
/// list snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsCounters {
    pub total_tourists: u32,
    pub active_tourists: u32,
    pub emergency_alerts: u32,
    pub safe_zones: u32,
}

impl StatsCounters {
    /// Draw a fresh set of counters: total in [150, 200), active in [45, 75),
    /// alerts in [0, 3), zones fixed.
    pub fn draw<R: Rng>(rng: &mut R) -> Self {
        Self {
            total_tourists: rng.gen_range(150..200),
            active_tourists: rng.gen_range(45..75),
            emergency_alerts: rng.gen_range(0..3),
            safe_zones: SAFE_ZONES,
        }
    }

    /// Card layout in display order
    pub fn cards(&self) -> Vec<StatCard> {
        vec![
            StatCard::new(StatKind::TotalTourists, self.total_tourists),
            StatCard::new(StatKind::ActiveNow, self.active_tourists),
            StatCard::new(StatKind::EmergencyAlerts, self.emergency_alerts),
            StatCard::new(StatKind::SafeZones, self.safe_zones),
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    TotalTourists,
    ActiveNow,
    EmergencyAlerts,
    SafeZones,
}

impl StatKind {
    pub fn title(self) -> &'static str {
        match self {
            StatKind::TotalTourists => "Total Tourists",
            StatKind::ActiveNow => "Active Now",
            StatKind::EmergencyAlerts => "Emergency Alerts",
            StatKind::SafeZones => "Safe Zones",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub kind: StatKind,
    pub title: &'static str,
    pub value: u32,
}

impl StatCard {
    fn new(kind: StatKind, value: u32) -> Self {
        Self {
            kind,
            title: kind.title(),
            value,
        }
    }
}

/// Stats feed: ignores the previous counters and redraws all four
#[derive(Clone, Debug, Default)]
pub struct StatsFeed;

impl Feed for StatsFeed {
    type State = StatsCounters;
    const NAME: &'static str = "stats";

    fn advance<R: Rng>(&self, _previous: &StatsCounters, rng: &mut R) -> StatsCounters {
        StatsCounters::draw(rng)
    }
}

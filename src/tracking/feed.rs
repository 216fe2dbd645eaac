use super::entity::{MapLocation, Position, TimeAgo, TouristRecord};
use rand::Rng;

/// A mock data stream: derives the next snapshot payload from the previous one.
///
/// Implementations are total. A tick never fails and never reaches outside
/// the process.
pub trait Feed: Send + 'static {
    /// Payload held by the snapshot store this feed writes to
    type State: Send + Sync + 'static;

    /// Short name used in logs and on the wire
    const NAME: &'static str;

    fn advance<R: Rng>(&self, previous: &Self::State, rng: &mut R) -> Self::State;
}

/// Map surface feed: status flips, position jitter, fresh "min ago" labels
#[derive(Clone, Debug)]
pub struct MapFeed {
    pub flip_probability: f64,
    /// Half-width of the uniform jitter applied to each coordinate
    pub jitter: f64,
    pub max_minutes: u32,
}

impl Default for MapFeed {
    fn default() -> Self {
        Self {
            flip_probability: 0.1,
            jitter: 0.0005,
            max_minutes: 20,
        }
    }
}

impl Feed for MapFeed {
    type State = Vec<MapLocation>;
    const NAME: &'static str = "map";

    fn advance<R: Rng>(&self, previous: &Vec<MapLocation>, rng: &mut R) -> Vec<MapLocation> {
        previous
            .iter()
            .map(|location| {
                let status = if rng.gen_bool(self.flip_probability) {
                    location.status.flipped()
                } else {
                    location.status
                };

                MapLocation {
                    position: Position {
                        lat: location.position.lat + rng.gen_range(-self.jitter..self.jitter),
                        lng: location.position.lng + rng.gen_range(-self.jitter..self.jitter),
                    },
                    status,
                    last_update: TimeAgo::short(rng.gen_range(1..=self.max_minutes)),
                    ..location.clone()
                }
            })
            .collect()
    }
}

/// List surface feed: status flips and fresh "minutes ago" labels only
#[derive(Clone, Debug)]
pub struct ListFeed {
    pub flip_probability: f64,
    pub max_minutes: u32,
}

impl Default for ListFeed {
    fn default() -> Self {
        Self {
            flip_probability: 0.05,
            max_minutes: 30,
        }
    }
}

impl Feed for ListFeed {
    type State = Vec<TouristRecord>;
    const NAME: &'static str = "tourists";

    fn advance<R: Rng>(&self, previous: &Vec<TouristRecord>, rng: &mut R) -> Vec<TouristRecord> {
        previous
            .iter()
            .map(|tourist| {
                // Label is drawn before the flip, matching the list refresh order
                let last_seen = TimeAgo::long(rng.gen_range(1..=self.max_minutes));
                let status = if rng.gen_bool(self.flip_probability) {
                    tourist.status.flipped()
                } else {
                    tourist.status
                };

                TouristRecord {
                    last_seen,
                    status,
                    ..tourist.clone()
                }
            })
            .collect()
    }
}

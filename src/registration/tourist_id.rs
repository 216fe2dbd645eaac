use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use std::fmt;

const SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Digital tourist ID issued by the registration flow.
///
/// Format: `{prefix}-{unix millis}-{9 base36 chars}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TouristId(String);

impl TouristId {
    pub fn generate<R: Rng>(prefix: &str, now: DateTime<Utc>, rng: &mut R) -> Self {
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();

        Self(format!("{}-{}-{}", prefix, now.timestamp_millis(), suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TouristId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TouristId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

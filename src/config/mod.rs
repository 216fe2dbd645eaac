use crate::tracking::{ListFeed, MapFeed};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Env var naming the TOML config file
pub const CONFIG_PATH_ENV: &str = "SURAKSHA_CONFIG";

/// Env var overriding `[server] bind_addr`
pub const BIND_ADDR_ENV: &str = "SURAKSHA_BIND_ADDR";

/// Longest accepted feed period (one day)
pub const MAX_INTERVAL_MS: u64 = 86_400_000;

/// Largest accepted per-axis map jitter, in degrees
pub const MAX_JITTER: f64 = 1.0;

/// Complete service configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SurakshaConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub feeds: FeedsConfig,
    #[serde(default)]
    pub registration: RegistrationConfig,
    #[serde(default)]
    pub qr: QrConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

/// Mock feed timers, one section per surface
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedsConfig {
    #[serde(default)]
    pub map: MapFeedConfig,
    #[serde(default)]
    pub list: ListFeedConfig,
    #[serde(default)]
    pub stats: StatsFeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapFeedConfig {
    #[serde(default = "default_map_interval")]
    pub interval_ms: u64,
    #[serde(default = "default_map_flip_probability")]
    pub flip_probability: f64,
    /// Max absolute shift per coordinate per tick (degrees)
    #[serde(default = "default_map_jitter")]
    pub jitter: f64,
    #[serde(default = "default_map_max_minutes")]
    pub max_minutes: u32,
}

fn default_map_interval() -> u64 {
    3000
}

fn default_map_flip_probability() -> f64 {
    0.1
}

fn default_map_jitter() -> f64 {
    0.0005
}

fn default_map_max_minutes() -> u32 {
    20
}

impl Default for MapFeedConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_map_interval(),
            flip_probability: default_map_flip_probability(),
            jitter: default_map_jitter(),
            max_minutes: default_map_max_minutes(),
        }
    }
}

impl MapFeedConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn feed(&self) -> MapFeed {
        MapFeed {
            flip_probability: self.flip_probability,
            jitter: self.jitter,
            max_minutes: self.max_minutes,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListFeedConfig {
    #[serde(default = "default_list_interval")]
    pub interval_ms: u64,
    #[serde(default = "default_list_flip_probability")]
    pub flip_probability: f64,
    #[serde(default = "default_list_max_minutes")]
    pub max_minutes: u32,
}

fn default_list_interval() -> u64 {
    8000
}

fn default_list_flip_probability() -> f64 {
    0.05
}

fn default_list_max_minutes() -> u32 {
    30
}

impl Default for ListFeedConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_list_interval(),
            flip_probability: default_list_flip_probability(),
            max_minutes: default_list_max_minutes(),
        }
    }
}

impl ListFeedConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn feed(&self) -> ListFeed {
        ListFeed {
            flip_probability: self.flip_probability,
            max_minutes: self.max_minutes,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatsFeedConfig {
    #[serde(default = "default_stats_interval")]
    pub interval_ms: u64,
}

fn default_stats_interval() -> u64 {
    5000
}

impl Default for StatsFeedConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_stats_interval(),
        }
    }
}

impl StatsFeedConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Registration flow configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationConfig {
    /// Artificial processing delay before the ID is issued
    #[serde(default = "default_registration_delay")]
    pub delay_ms: u64,
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,
}

fn default_registration_delay() -> u64 {
    1500
}

fn default_id_prefix() -> String {
    "TST".to_string()
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_registration_delay(),
            id_prefix: default_id_prefix(),
        }
    }
}

impl RegistrationConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// External QR image endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct QrConfig {
    #[serde(default = "default_qr_endpoint")]
    pub endpoint: String,
    /// Square edge length in pixels
    #[serde(default = "default_qr_size")]
    pub size: u32,
    /// Error-correction level: L, M, Q or H
    #[serde(default = "default_qr_ecc")]
    pub error_correction: String,
    /// Verification URL; the tourist ID is appended
    #[serde(default = "default_verify_url_base")]
    pub verify_url_base: String,
    #[serde(default = "default_qr_timeout")]
    pub fetch_timeout_seconds: u64,
}

fn default_qr_endpoint() -> String {
    "https://api.qrserver.com/v1/create-qr-code/".to_string()
}

fn default_qr_size() -> u32 {
    300
}

fn default_qr_ecc() -> String {
    "M".to_string()
}

fn default_verify_url_base() -> String {
    "https://suraksha-setu.gov.in/verify/".to_string()
}

fn default_qr_timeout() -> u64 {
    10
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            endpoint: default_qr_endpoint(),
            size: default_qr_size(),
            error_correction: default_qr_ecc(),
            verify_url_base: default_verify_url_base(),
            fetch_timeout_seconds: default_qr_timeout(),
        }
    }
}

/// Configuration rejected by [`SurakshaConfig::validate`]
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ZeroInterval(&'static str),
    IntervalTooLong(&'static str, u64),
    ProbabilityOutOfRange(&'static str, f64),
    JitterOutOfRange(f64),
    ZeroMaxMinutes(&'static str),
    EmptyIdPrefix,
    InvalidErrorCorrection(String),
    ZeroQrSize,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroInterval(feed) => {
                write!(f, "feeds.{}.interval_ms must be greater than zero", feed)
            }
            ConfigError::IntervalTooLong(feed, ms) => write!(
                f,
                "feeds.{}.interval_ms must be at most {}, got {}",
                feed, MAX_INTERVAL_MS, ms
            ),
            ConfigError::ProbabilityOutOfRange(feed, p) => {
                write!(f, "feeds.{}.flip_probability must be within [0, 1], got {}", feed, p)
            }
            ConfigError::JitterOutOfRange(j) => write!(
                f,
                "feeds.map.jitter must be within (0, {}], got {}",
                MAX_JITTER, j
            ),
            ConfigError::ZeroMaxMinutes(feed) => {
                write!(f, "feeds.{}.max_minutes must be at least 1", feed)
            }
            ConfigError::EmptyIdPrefix => write!(f, "registration.id_prefix must not be empty"),
            ConfigError::InvalidErrorCorrection(level) => {
                write!(f, "qr.error_correction must be one of L, M, Q, H, got '{}'", level)
            }
            ConfigError::ZeroQrSize => write!(f, "qr.size must be greater than zero"),
        }
    }
}

impl std::error::Error for ConfigError {}

fn check_interval(feed: &'static str, ms: u64) -> Result<(), ConfigError> {
    match ms {
        0 => Err(ConfigError::ZeroInterval(feed)),
        ms if ms > MAX_INTERVAL_MS => Err(ConfigError::IntervalTooLong(feed, ms)),
        _ => Ok(()),
    }
}

fn check_probability(feed: &'static str, p: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange(feed, p))
    }
}

impl SurakshaConfig {
    /// Reject values the feeds and registration flow cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let feeds = &self.feeds;

        check_interval("map", feeds.map.interval_ms)?;
        check_interval("list", feeds.list.interval_ms)?;
        check_interval("stats", feeds.stats.interval_ms)?;

        check_probability("map", feeds.map.flip_probability)?;
        check_probability("list", feeds.list.flip_probability)?;

        // gen_range(-j..j) needs a finite, non-empty range
        let jitter = feeds.map.jitter;
        if !(jitter.is_finite() && jitter > 0.0 && jitter <= MAX_JITTER) {
            return Err(ConfigError::JitterOutOfRange(jitter));
        }
        if feeds.map.max_minutes == 0 {
            return Err(ConfigError::ZeroMaxMinutes("map"));
        }
        if feeds.list.max_minutes == 0 {
            return Err(ConfigError::ZeroMaxMinutes("list"));
        }

        if self.registration.id_prefix.is_empty() {
            return Err(ConfigError::EmptyIdPrefix);
        }

        if !matches!(self.qr.error_correction.as_str(), "L" | "M" | "Q" | "H") {
            return Err(ConfigError::InvalidErrorCorrection(
                self.qr.error_correction.clone(),
            ));
        }
        if self.qr.size == 0 {
            return Err(ConfigError::ZeroQrSize);
        }

        Ok(())
    }

    /// Apply env var overrides on top of file/default values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(addr) = std::env::var(BIND_ADDR_ENV) {
            if !addr.trim().is_empty() {
                self.server.bind_addr = addr;
            }
        }
    }

    /// Load from `$SURAKSHA_CONFIG` if set (defaults otherwise), apply env
    /// overrides and validate.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => load_config(&path)?,
            Err(_) => SurakshaConfig::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<SurakshaConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path))?;
    let config: SurakshaConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path))?;
    Ok(config)
}

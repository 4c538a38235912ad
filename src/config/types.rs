//! Configuration type definitions.

use serde::Deserialize;

/// Default scan window (messages inspected per team channel).
pub const DEFAULT_SCAN_WINDOW: usize = 200;

/// Default refresh interval in minutes.
pub const DEFAULT_REFRESH_MINUTES: u64 = 30;

/// Default event fetch timeout in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub discord: DiscordConfig,
    pub roster: RosterConfig,
    pub outputs: OutputsConfig,
}

/// Discord bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    pub token: String,
}

/// Roster aggregation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterConfig {
    /// Teams in configuration order.
    pub teams: Vec<TeamConfig>,
    /// Target composition shared by all teams.
    pub targets: TargetsConfig,
    /// Healer specs counted as melee for the display sub-split.
    pub melee_healer_specs: Option<Vec<String>>,
    /// Messages inspected per team channel when looking for an event link.
    pub scan_window: Option<usize>,
    /// Minutes between scheduled refreshes.
    pub refresh_minutes: Option<u64>,
    /// Timeout for a single event fetch, in seconds.
    pub fetch_timeout_secs: Option<u64>,
}

/// A single raid team.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamConfig {
    /// Stable identifier used in logs.
    pub key: String,
    /// Name shown in rendered output.
    pub display_name: String,
    /// Discord channel scanned for the team's signup link.
    pub channel: u64,
    /// Total roster slots; 0 means the roster has no DPS ceiling.
    pub roster_size: u32,
    /// Leader handle shown on the recruitment card.
    pub leader: Option<String>,
    /// Raid time window shown on the recruitment card.
    pub time_window: Option<String>,
    /// Free-form note shown on the recruitment card.
    pub notes: Option<String>,
}

/// Desired tank/healer counts; the DPS target derives from roster size.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TargetsConfig {
    pub tanks: u32,
    pub healers: u32,
}

/// The two fixed output destinations.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputsConfig {
    pub dashboard: OutputConfig,
    pub recruitment: OutputConfig,
}

/// One output destination: a channel and, once known, the pinned message.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub channel: u64,
    /// Last known id of the bot-authored message edited in place.
    pub message_id: Option<u64>,
}

impl RosterConfig {
    pub fn scan_window(&self) -> usize {
        self.scan_window.unwrap_or(DEFAULT_SCAN_WINDOW)
    }

    pub fn refresh_minutes(&self) -> u64 {
        self.refresh_minutes.unwrap_or(DEFAULT_REFRESH_MINUTES)
    }

    pub fn fetch_timeout_secs(&self) -> u64 {
        self.fetch_timeout_secs.unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS)
    }

    pub fn melee_healer_specs(&self) -> &[String] {
        self.melee_healer_specs.as_deref().unwrap_or(&[])
    }
}

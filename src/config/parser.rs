//! Configuration file parsing (HOCON format).

use std::path::Path;

use crate::common::error::ConfigError;
use crate::config::types::Config;
use hocon::HoconLoader;

/// Load configuration from a HOCON file.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();

    HoconLoader::new()
        .load_file(path)
        .map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
        })?
        .resolve()
        .map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
}

/// Load configuration from a HOCON string.
pub fn load_config_str(content: &str) -> Result<Config, ConfigError> {
    HoconLoader::new()
        .load_str(content)
        .map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?
        .resolve()
        .map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        discord { token = "abc" }
        roster {
            teams = [
                { key = "alpha", display_name = "Team Alpha", channel = 111, roster_size = 20 }
                { key = "bravo", display_name = "Team Bravo", channel = 112, roster_size = 25, leader = "@lead" }
            ]
            targets { tanks = 2, healers = 4 }
            melee_healer_specs = ["Mistweaver"]
            scan_window = 150
        }
        outputs {
            dashboard { channel = 211, message_id = 900 }
            recruitment { channel = 212 }
        }
    "#;

    #[test]
    fn test_parse_sample_config() {
        let config = load_config_str(SAMPLE).unwrap();

        assert_eq!(config.discord.token, "abc");
        assert_eq!(config.roster.teams.len(), 2);
        assert_eq!(config.roster.teams[0].key, "alpha");
        assert_eq!(config.roster.teams[1].leader.as_deref(), Some("@lead"));
        assert_eq!(config.roster.targets.tanks, 2);
        assert_eq!(config.roster.scan_window(), 150);
        assert_eq!(config.outputs.dashboard.message_id, Some(900));
        assert_eq!(config.outputs.recruitment.message_id, None);
    }

    #[test]
    fn test_defaults_applied_when_absent() {
        let config = load_config_str(SAMPLE).unwrap();

        assert_eq!(config.roster.refresh_minutes(), 30);
        assert_eq!(config.roster.fetch_timeout_secs(), 10);
        assert!(config.roster.teams[0].notes.is_none());
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(load_config_str("{{{").is_err());
    }
}

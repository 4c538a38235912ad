//! Configuration validation.
//!
//! Validates configuration values and provides helpful error messages.

use std::collections::HashSet;

use crate::common::error::ConfigError;
use crate::config::types::Config;

/// Validate a configuration and return detailed errors.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    // Validate Discord config
    if config.discord.token.is_empty() {
        errors.push("discord.token is required".to_string());
    }
    if config.discord.token == "YOUR_DISCORD_TOKEN_HERE" {
        errors.push("discord.token has not been configured (still using placeholder)".to_string());
    }

    // Validate teams
    if config.roster.teams.is_empty() {
        errors.push("roster.teams is empty - nothing to aggregate".to_string());
    }
    let mut keys = HashSet::new();
    for (i, team) in config.roster.teams.iter().enumerate() {
        if team.key.is_empty() {
            errors.push(format!("roster.teams[{}].key is required", i));
        }
        if !keys.insert(team.key.as_str()) {
            errors.push(format!("roster.teams[{}].key '{}' is duplicated", i, team.key));
        }
        if team.display_name.is_empty() {
            errors.push(format!("roster.teams[{}].display_name is required", i));
        }
        if team.channel == 0 {
            errors.push(format!("roster.teams[{}].channel must be non-zero", i));
        }
        let target_floor = config.roster.targets.tanks + config.roster.targets.healers;
        if team.roster_size > 0 && team.roster_size < target_floor {
            errors.push(format!(
                "roster.teams[{}].roster_size {} is smaller than targets.tanks + targets.healers ({})",
                i, team.roster_size, target_floor
            ));
        }
    }

    // Validate aggregation settings
    if let Some(window) = config.roster.scan_window {
        if window == 0 {
            errors.push("roster.scan_window must be at least 1".to_string());
        }
    }
    if let Some(minutes) = config.roster.refresh_minutes {
        if minutes == 0 {
            errors.push("roster.refresh_minutes must be at least 1".to_string());
        }
    }

    // Validate output destinations
    if config.outputs.dashboard.channel == 0 {
        errors.push("outputs.dashboard.channel must be non-zero".to_string());
    }
    if config.outputs.recruitment.channel == 0 {
        errors.push("outputs.recruitment.channel must be non-zero".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            message: errors.join("; "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parser::load_config_str;

    fn valid_config() -> Config {
        load_config_str(
            r#"
            discord { token = "abc" }
            roster {
                teams = [
                    { key = "alpha", display_name = "Team Alpha", channel = 111, roster_size = 20 }
                ]
                targets { tanks = 2, healers = 4 }
            }
            outputs {
                dashboard { channel = 211 }
                recruitment { channel = 212 }
            }
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let mut config = valid_config();
        config.discord.token = "YOUR_DISCORD_TOKEN_HERE".to_string();

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("placeholder"));
    }

    #[test]
    fn test_duplicate_team_keys_rejected() {
        let mut config = valid_config();
        let dup = config.roster.teams[0].clone();
        config.roster.teams.push(dup);

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("duplicated"));
    }

    #[test]
    fn test_roster_smaller_than_targets_rejected() {
        let mut config = valid_config();
        config.roster.teams[0].roster_size = 5;

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("roster_size"));
    }

    #[test]
    fn test_zero_roster_size_means_uncapped_and_passes() {
        let mut config = valid_config();
        config.roster.teams[0].roster_size = 0;

        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_zero_output_channel_rejected() {
        let mut config = valid_config();
        config.outputs.recruitment.channel = 0;

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("outputs.recruitment.channel"));
    }
}

//! Environment variable overrides for configuration.
//!
//! Supports overriding config values with environment variables:
//! - `QUARTERMASTER_CONFIG` - Path to the config file
//! - `QUARTERMASTER_DISCORD_TOKEN` - Discord bot token
//! - `QUARTERMASTER_DASHBOARD_MESSAGE_ID` - Pinned dashboard message id
//! - `QUARTERMASTER_RECRUITMENT_MESSAGE_ID` - Pinned recruitment message id

use std::env;

use tracing::warn;

use crate::config::types::Config;

/// Environment variable prefix for all config overrides.
const ENV_PREFIX: &str = "QUARTERMASTER";

/// Default config file path.
const DEFAULT_CONFIG_PATH: &str = "quartermaster.conf";

/// Resolve the config file path from the environment.
pub fn get_config_path() -> String {
    env::var(format!("{}_CONFIG", ENV_PREFIX)).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

/// Apply environment variable overrides to a config.
///
/// This allows the token to be provided via the environment instead of the
/// config file, and lets an operator seed the pinned message ids after the
/// bot created them on a previous run.
pub fn apply_env_overrides(config: Config) -> Config {
    apply_overrides(config, |name| env::var(name).ok())
}

/// Override application against any variable lookup; environment access is
/// injected so the precedence rules stay testable.
fn apply_overrides(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(token) = lookup(&format!("{}_DISCORD_TOKEN", ENV_PREFIX)) {
        config.discord.token = token;
    }

    let message_id = |var: String, current: Option<u64>| match lookup(&var) {
        Some(raw) => match raw.parse() {
            Ok(id) => Some(id),
            // A typo here must not make the bot abandon its pinned message.
            Err(_) => {
                warn!("Ignoring {}: '{}' is not a valid message id", var, raw);
                current
            }
        },
        None => current,
    };

    config.outputs.dashboard.message_id = message_id(
        format!("{}_DASHBOARD_MESSAGE_ID", ENV_PREFIX),
        config.outputs.dashboard.message_id,
    );
    config.outputs.recruitment.message_id = message_id(
        format!("{}_RECRUITMENT_MESSAGE_ID", ENV_PREFIX),
        config.outputs.recruitment.message_id,
    );

    config
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::config::parser::load_config_str;

    fn make_test_config() -> Config {
        load_config_str(
            r#"
            discord { token = "original_token" }
            roster {
                teams = [
                    { key = "alpha", display_name = "Alpha", channel = 11, roster_size = 20 }
                ]
                targets { tanks = 2, healers = 4 }
            }
            outputs {
                dashboard { channel = 21, message_id = 500 }
                recruitment { channel = 22 }
            }
            "#,
        )
        .unwrap()
    }

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn apply(config: Config, pairs: &[(&str, &str)]) -> Config {
        let vars = vars(pairs);
        apply_overrides(config, |name| vars.get(name).cloned())
    }

    #[test]
    fn test_env_prefix() {
        assert_eq!(ENV_PREFIX, "QUARTERMASTER");
    }

    #[test]
    fn test_no_vars_leaves_config_unchanged() {
        let result = apply(make_test_config(), &[]);

        assert_eq!(result.discord.token, "original_token");
        assert_eq!(result.outputs.dashboard.message_id, Some(500));
        assert_eq!(result.outputs.recruitment.message_id, None);
    }

    #[test]
    fn test_env_values_take_precedence_over_file() {
        let result = apply(
            make_test_config(),
            &[
                ("QUARTERMASTER_DISCORD_TOKEN", "env_token"),
                ("QUARTERMASTER_DASHBOARD_MESSAGE_ID", "900"),
                ("QUARTERMASTER_RECRUITMENT_MESSAGE_ID", "901"),
            ],
        );

        assert_eq!(result.discord.token, "env_token");
        assert_eq!(result.outputs.dashboard.message_id, Some(900));
        assert_eq!(result.outputs.recruitment.message_id, Some(901));
    }

    #[test]
    fn test_unparseable_message_id_keeps_file_value() {
        let result = apply(
            make_test_config(),
            &[
                ("QUARTERMASTER_DASHBOARD_MESSAGE_ID", "9OO"),
                ("QUARTERMASTER_RECRUITMENT_MESSAGE_ID", "not-an-id"),
            ],
        );

        // The typo is ignored, the pinned id from the file survives.
        assert_eq!(result.outputs.dashboard.message_id, Some(500));
        assert_eq!(result.outputs.recruitment.message_id, None);
    }
}

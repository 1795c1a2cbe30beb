use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::handler::HandlerSettings;

const DEFAULT_COMMAND_PREFIX: &str = "!";
const DEFAULT_TAGS_PATH: &str = "tags.json";

#[derive(Debug, Clone)]
pub struct Settings {
    pub token: String,
    pub command_prefix: String,
    pub tags_path: PathBuf,
    // Channels where tag commands are allowed. Empty means everywhere.
    pub bot_commands_channels: Vec<u64>,
    // Roles that may use restricted commands in any channel.
    pub staff_roles: Vec<u64>,
    pub handler: HandlerSettings,
}

impl Settings {
    // Reads the settings from environment variables, after a `.env` file in
    // the working directory when present. Fails on a missing DISCORD_TOKEN or
    // an id that isn't a number.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let token = env::var("DISCORD_TOKEN")
            .map_err(|_| Error::Config("Expected a DISCORD_TOKEN in the environment".to_string()))?;

        let handler = HandlerSettings {
            verification_channel: optional_var("VERIFICATION_CHANNEL_ID")?,
            suggestion_icon_url: env::var("SUGGESTION_ICON_URL").ok(),
            ..Default::default()
        };

        Ok(Settings {
            token,
            command_prefix: env::var("COMMAND_PREFIX")
                .unwrap_or_else(|_| DEFAULT_COMMAND_PREFIX.to_string()),
            tags_path: env::var("TAGS_PATH")
                .map_or_else(|_| PathBuf::from(DEFAULT_TAGS_PATH), PathBuf::from),
            bot_commands_channels: list_var("BOT_COMMANDS_CHANNEL_IDS")?,
            staff_roles: list_var("STAFF_ROLE_IDS")?,
            handler,
        })
    }
}

fn optional_var<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => parse_value(name, &value).map(Some),
        _ => Ok(None),
    }
}

fn list_var<T: FromStr>(name: &str) -> Result<Vec<T>> {
    match env::var(name) {
        Ok(value) => parse_list(name, &value),
        Err(_) => Ok(Vec::new()),
    }
}

fn parse_list<T: FromStr>(name: &str, value: &str) -> Result<Vec<T>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| parse_value(name, item))
        .collect()
}

fn parse_value<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| Error::Config(format!("Invalid value of {}: '{}'", name, value)))
}

#[cfg(test)]
mod tests {
    use crate::config::{parse_list, parse_value};
    use crate::error::Error;

    #[test]
    fn test_parse_list_of_ids() {
        let ids = parse_list::<u64>("STAFF_ROLE_IDS", "1, 2,,3 ").unwrap();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_empty_list() {
        let ids = parse_list::<u64>("STAFF_ROLE_IDS", "").unwrap();
        assert_eq!(ids.len(), 0);
    }

    #[test]
    fn test_invalid_id_names_the_variable() {
        let result = parse_value::<u64>("VERIFICATION_CHANNEL_ID", "general");
        match result {
            Err(Error::Config(message)) => assert_eq!(
                message,
                "Invalid value of VERIFICATION_CHANNEL_ID: 'general'"
            ),
            other => panic!("Expected a config error, got {:?}", other),
        }
    }
}

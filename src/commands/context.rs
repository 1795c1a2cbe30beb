use std::sync::Arc;

use poise::Context as PoiseContext;

use crate::config::Settings;
use crate::storage::TagStore;

// User data, which is stored and accessible in all command invocations
pub struct UserData {
    pub settings: Settings,
    pub tags: Arc<TagStore>,
}

// Generic context available across Poise commands
pub type Context<'a> = PoiseContext<'a, UserData, crate::error::Error>;

// Alias for commands registered in the framework
pub type Command = poise::Command<UserData, crate::error::Error>;

pub mod bot;
pub mod commands;
pub mod config;
pub mod error;
pub mod handler;
pub mod models;
pub mod storage;

use std::sync::Arc;

use poise::serenity_prelude::GatewayIntents;
use serenity::async_trait;
use serenity::client::{Client, Context, EventHandler};
use serenity::model::gateway::Ready;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::commands::UserData;
use crate::config::Settings;
use crate::error::Error;
use crate::storage::TagStore;

pub struct Handler;

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(why) => {
            error!("Invalid configuration: {}", why);
            return;
        }
    };

    let tags = match TagStore::load(&settings.tags_path) {
        Ok(tags) => Arc::new(tags),
        Err(why) => {
            error!("Can't load tags: {}", why);
            return;
        }
    };

    let token = settings.token.clone();
    let prefix = settings.command_prefix.clone();

    let framework = poise::Framework::<UserData, Error>::builder()
        .options(poise::FrameworkOptions {
            commands: commands::commands(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(prefix),
                ..Default::default()
            },
            on_error: |error| Box::pin(bot::on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(UserData { settings, tags })
            })
        })
        .build();

    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;
    let mut client = match Client::builder(&token, intents)
        .event_handler(Handler)
        .framework(framework)
        .await
    {
        Ok(client) => client,
        Err(why) => {
            error!("Cannot create a Discord client: {:?}", why);
            return;
        }
    };

    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }
}

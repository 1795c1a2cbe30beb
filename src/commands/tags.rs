use poise::CreateReply;
use serenity::builder::CreateEmbed;

use crate::commands::checks::{ChannelRestricted, in_channel};
use crate::commands::context::Context;
use crate::error::{Error, Result};
use crate::handler::failure::CommandError;
use crate::models::Tag;

/// Show tags: short answers to frequently asked questions
#[poise::command(
    prefix_command,
    slash_command,
    subcommands("get", "list"),
    subcommand_required,
    aliases("tag", "t"),
    check = "in_channel",
    custom_data = "ChannelRestricted",
    category = "Information"
)]
pub async fn tags(_ctx: Context<'_>) -> Result<()> {
    Ok(())
}

/// Show a tag by its name
#[poise::command(
    prefix_command,
    slash_command,
    aliases("show"),
    check = "in_channel",
    custom_data = "ChannelRestricted"
)]
pub async fn get(
    ctx: Context<'_>,
    #[description = "Name of the tag"] name: String,
) -> Result<()> {
    let tag = match ctx.data().tags.get(&name) {
        Some(tag) => tag,
        None => {
            let message = format!("No tag called \"{}\" found.", name);
            return Err(Error::Command(CommandError::BadArgument(message)));
        }
    };

    ctx.send(CreateReply::default().embed(tag_embed(&tag))).await?;
    Ok(())
}

/// List names of all tags
#[poise::command(
    prefix_command,
    slash_command,
    aliases("all"),
    check = "in_channel",
    custom_data = "ChannelRestricted"
)]
pub async fn list(ctx: Context<'_>) -> Result<()> {
    let names = ctx.data().tags.names();
    let content = match names.len() {
        0 => "There are no tags yet.".to_string(),
        _ => format!("Available tags: {}", names.join(", ")),
    };

    ctx.say(content).await?;
    Ok(())
}

pub fn tag_embed(tag: &Tag) -> CreateEmbed {
    CreateEmbed::new().title(&tag.title).description(&tag.body)
}

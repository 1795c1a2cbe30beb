use std::collections::HashSet;
use std::sync::Arc;

use poise::FrameworkError;
use serenity::async_trait;
use serenity::builder::{CreateEmbed, CreateEmbedAuthor, CreateMessage};
use serenity::http::Http;
use serenity::model::id::{ChannelId, UserId};
use serenity::model::permissions::Permissions;
use tracing::{error, trace, warn};

use crate::commands::checks::{ChannelRestricted, check_channel};
use crate::commands::help::render_help;
use crate::commands::tags::tag_embed;
use crate::commands::{Command, Context, UserData};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::handler::context::{CommandInfo, InvocationContext};
use crate::handler::failure::{CommandError, Failure, InvokeError, UnexpectedError};
use crate::handler::help::HelpInvocation;
use crate::handler::services::{CommandRegistry, Messenger, Reply, TagService};
use crate::handler::ErrorHandler;
use crate::storage::TagStore;

// A flat view of the framework commands, subcommands included.
#[derive(Debug, Clone, Default)]
pub struct CommandCatalog {
    commands: Vec<CommandInfo>,
}

impl CommandCatalog {
    pub fn from_commands(commands: &[Command]) -> Self {
        let mut catalog = CommandCatalog::default();
        catalog.walk(commands, None);
        catalog
    }

    fn walk(&mut self, commands: &[Command], parent: Option<&str>) {
        for command in commands {
            let info = command_info(command, parent);
            let qualified_name = info.qualified_name();
            self.commands.push(info);
            self.walk(&command.subcommands, Some(&qualified_name));
        }
    }

    pub fn commands(&self) -> &[CommandInfo] {
        &self.commands
    }

    // Resolves a qualified name, each part may be an alias: `tag show`.
    pub fn resolve(&self, name: &str) -> Option<CommandInfo> {
        let mut parent: Option<String> = None;
        let mut found = None;

        for part in name.split_whitespace() {
            let command = self.commands.iter().find(|command| {
                command.parent == parent
                    && (command.name == part || command.aliases.iter().any(|alias| alias == part))
            })?;
            parent = Some(command.qualified_name());
            found = Some(command.clone());
        }

        found
    }

    // Evaluates the declarative checks of the command.
    pub fn can_run(
        &self,
        command: &CommandInfo,
        ctx: &InvocationContext,
        owners: &HashSet<UserId>,
        settings: &Settings,
    ) -> std::result::Result<bool, CommandError> {
        if command.guild_only && !ctx.in_guild {
            return Err(CommandError::NoPrivateMessage);
        }

        if command.owners_only && !owners.iter().any(|owner| owner.get() == ctx.author_id) {
            return Ok(false);
        }

        if command.channel_restricted {
            check_channel(
                ctx.channel_id,
                &ctx.author_roles,
                &settings.bot_commands_channels,
                &settings.staff_roles,
            )?;
        }

        Ok(true)
    }
}

pub fn command_info(command: &Command, parent: Option<&str>) -> CommandInfo {
    CommandInfo {
        name: command.name.clone(),
        aliases: command.aliases.clone(),
        hidden: command.hide_in_help,
        parent: parent.map(String::from),
        guild_only: command.guild_only,
        owners_only: command.owners_only,
        channel_restricted: command.custom_data.downcast_ref::<ChannelRestricted>().is_some(),
    }
}

// Connects the error handler to Discord for a single failed invocation.
pub struct DiscordBridge<'a> {
    http: Arc<Http>,
    channel_id: ChannelId,
    commands: &'a [Command],
    catalog: CommandCatalog,
    owners: &'a HashSet<UserId>,
    data: &'a UserData,
}

impl<'a> DiscordBridge<'a> {
    pub fn new(
        http: Arc<Http>,
        channel_id: ChannelId,
        commands: &'a [Command],
        owners: &'a HashSet<UserId>,
        data: &'a UserData,
    ) -> Self {
        DiscordBridge {
            http,
            channel_id,
            commands,
            catalog: CommandCatalog::from_commands(commands),
            owners,
            data,
        }
    }

    fn tags(&self) -> &TagStore {
        &self.data.tags
    }

    async fn send_embed(&self, embed: CreateEmbed) -> Result<()> {
        self.channel_id
            .send_message(&*self.http, CreateMessage::new().embed(embed))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CommandRegistry for DiscordBridge<'_> {
    fn get_command(&self, name: &str) -> Option<CommandInfo> {
        self.catalog.resolve(name)
    }

    fn walk_commands(&self) -> Vec<CommandInfo> {
        self.catalog.commands().to_vec()
    }

    async fn can_run(
        &self,
        command: &CommandInfo,
        ctx: &InvocationContext,
    ) -> std::result::Result<bool, CommandError> {
        self.catalog
            .can_run(command, ctx, self.owners, &self.data.settings)
    }

    async fn invoke_help(&self, ctx: &InvocationContext, help: &HelpInvocation) -> Result<()> {
        let content = render_help(self.commands, &help.args, &self.data.settings.command_prefix);
        self.send(ctx, Reply::Text(content)).await
    }
}

#[async_trait]
impl TagService for DiscordBridge<'_> {
    async fn display_tag(&self, _ctx: &InvocationContext, name: &str) -> Result<bool> {
        match self.tags().get(name) {
            Some(tag) => {
                self.send_embed(tag_embed(&tag)).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl Messenger for DiscordBridge<'_> {
    async fn send(&self, _ctx: &InvocationContext, reply: Reply) -> Result<()> {
        match reply {
            Reply::Text(content) => {
                self.channel_id.say(&*self.http, content).await?;
            }
            Reply::Suggestion {
                title,
                icon_url,
                description,
                delete_after,
            } => {
                let mut author = CreateEmbedAuthor::new(title);
                if let Some(icon_url) = icon_url {
                    author = author.icon_url(icon_url);
                }
                let embed = CreateEmbed::new().author(author).description(description);
                let message = self
                    .channel_id
                    .send_message(&*self.http, CreateMessage::new().embed(embed))
                    .await?;

                let http = self.http.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delete_after).await;
                    if let Err(err) = message.delete(&*http).await {
                        warn!("Can't delete the command suggestion: {}", err);
                    }
                });
            }
        }

        Ok(())
    }
}

// Converts an error returned by a command body.
pub fn command_error_from(err: Error) -> CommandError {
    match err {
        Error::Command(err) => err,
        Error::Api(response) => CommandError::from(response),
        Error::Unexpected(err) => CommandError::CommandInvoke(InvokeError::Unexpected(err)),
        err => CommandError::CommandInvoke(InvokeError::Unexpected(UnexpectedError::new(
            err.kind(),
            &err.to_string(),
        ))),
    }
}

fn permission_names(permissions: Permissions) -> Vec<String> {
    permissions
        .get_permission_names()
        .into_iter()
        .map(String::from)
        .collect()
}

// Errors the framework raises on its own, reported as unexpected.
pub fn framework_error(kind: &str, description: &str) -> CommandError {
    CommandError::CommandInvoke(InvokeError::Unexpected(UnexpectedError::new(kind, description)))
}

// Converts framework errors raised for a known command.
fn failure_from(error: FrameworkError<'_, UserData, Error>) -> Failure {
    let command_error = match error {
        FrameworkError::Command { error, .. } => command_error_from(error),
        FrameworkError::CommandPanic { payload, .. } => {
            let message = payload.unwrap_or_else(|| "The command panicked.".to_string());
            CommandError::CommandInvoke(InvokeError::Unexpected(UnexpectedError::new(
                "Panic", &message,
            )))
        }
        FrameworkError::ArgumentParse { error, input, .. } => {
            let message = match input {
                Some(input) => format!("Converting \"{}\" failed: {}", input, error),
                None => error.to_string(),
            };
            CommandError::BadArgument(message)
        }
        FrameworkError::SubcommandRequired { ctx, .. } => CommandError::UserInput(format!(
            "A subcommand of `{}` is required.",
            ctx.command().qualified_name
        )),
        FrameworkError::CooldownHit {
            remaining_cooldown, ..
        } => CommandError::CommandOnCooldown(remaining_cooldown),
        FrameworkError::MissingBotPermissions {
            missing_permissions,
            ..
        } => CommandError::BotMissingPermissions(permission_names(missing_permissions)),
        FrameworkError::MissingUserPermissions {
            missing_permissions,
            ..
        } => CommandError::MissingPermissions(
            missing_permissions.map(permission_names).unwrap_or_default(),
        ),
        FrameworkError::GuildOnly { .. } => CommandError::NoPrivateMessage,
        FrameworkError::NotAnOwner { ctx, .. } => CommandError::CheckFailure(format!(
            "Command {} may only be used by the bot owners.",
            ctx.command().qualified_name
        )),
        FrameworkError::DmOnly { ctx, .. } | FrameworkError::NsfwOnly { ctx, .. } => {
            CommandError::CheckFailure(format!(
                "The check functions for command {} failed.",
                ctx.command().qualified_name
            ))
        }
        FrameworkError::CommandCheckFailed { error, ctx, .. } => match error {
            Some(error) => command_error_from(error),
            None => CommandError::CheckFailure(format!(
                "The check functions for command {} failed.",
                ctx.command().qualified_name
            )),
        },
        FrameworkError::CommandStructureMismatch { description, .. } => {
            framework_error("CommandStructureMismatch", description)
        }
        other => framework_error("FrameworkError", &other.to_string()),
    };

    Failure::new(command_error)
}

async fn invocation_from(ctx: Context<'_>) -> InvocationContext {
    let command = ctx.command();
    let parent = command
        .qualified_name
        .rsplit_once(' ')
        .map(|(parent, _)| parent.to_string());
    let roles = match ctx.author_member().await {
        Some(member) => member.roles.iter().map(|role| role.get()).collect(),
        None => Vec::new(),
    };

    InvocationContext::new(
        ctx.author().id.get(),
        &ctx.author().name,
        ctx.channel_id().get(),
        &ctx.invocation_string(),
    )
    .with_invoked_with(ctx.invoked_command_name())
    .with_command(Some(command_info(command, parent.as_deref())))
    .with_roles(roles)
    .in_guild(ctx.guild_id().is_some())
}

async fn dispatch(bridge: &DiscordBridge<'_>, mut invocation: InvocationContext, failure: Failure) {
    let settings = &bridge.data.settings.handler;
    let handler = ErrorHandler::new(bridge, Some(bridge), bridge, settings);

    let result = handler.handle(&mut invocation, failure).await;
    match result {
        Ok(disposition) => trace!("Command error handled: {:?}", disposition),
        Err(err) => error!(
            "Command {} invoked by {} failed: {}",
            invocation.command_name(),
            invocation.author,
            err
        ),
    }
}

// The `on_error` hook of the framework.
pub async fn on_error(error: FrameworkError<'_, UserData, Error>) {
    if let FrameworkError::UnknownCommand {
        ctx,
        msg,
        prefix,
        msg_content,
        framework,
        ..
    } = error
    {
        let invoked_with = msg_content.split_whitespace().next().unwrap_or_default();
        trace!("Unknown command '{}' with prefix '{}'", invoked_with, prefix);

        let roles = match &msg.member {
            Some(member) => member.roles.iter().map(|role| role.get()).collect(),
            None => Vec::new(),
        };
        let invocation = InvocationContext::new(
            msg.author.id.get(),
            &msg.author.name,
            msg.channel_id.get(),
            &msg.content,
        )
        .with_invoked_with(invoked_with)
        .with_roles(roles)
        .in_guild(msg.guild_id.is_some());

        let options = framework.options();
        let bridge = DiscordBridge::new(
            ctx.http.clone(),
            msg.channel_id,
            &options.commands,
            &options.owners,
            framework.user_data,
        );
        let failure = Failure::new(CommandError::CommandNotFound(invoked_with.to_string()));
        dispatch(&bridge, invocation, failure).await;
        return;
    }

    let ctx = match error.ctx() {
        Some(ctx) => ctx,
        None => {
            if let Err(err) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", err);
            }
            return;
        }
    };

    let failure = failure_from(error);

    let invocation = invocation_from(ctx).await;
    let options = ctx.framework().options();
    let bridge = DiscordBridge::new(
        ctx.serenity_context().http.clone(),
        ctx.channel_id(),
        &options.commands,
        &options.owners,
        ctx.data(),
    );
    dispatch(&bridge, invocation, failure).await;
}

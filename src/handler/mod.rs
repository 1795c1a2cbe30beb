pub mod context;
pub mod failure;
pub mod fallback;
pub mod help;
pub mod services;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{Level, debug, error, trace, warn};

use crate::error::{Error, Result};
use crate::handler::context::{CommandInfo, InvocationContext};
use crate::handler::failure::{
    CommandError, Failure, InvokeError, ResponseCodeError, UnexpectedError,
};
use crate::handler::fallback::{closest_match, collect_candidates, suggest_content};
use crate::handler::help::HelpInvocation;
use crate::handler::services::{CommandRegistry, Messenger, Reply, TagService};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

const TAG_FALLBACK_CANCELLED: &str = "Cancelling attempt to fall back to a tag due to failed checks.";
const SUGGESTION_CANCELLED: &str = "Cancelling attempt to suggest a command due to failed checks.";

pub const SUGGESTION_TITLE: &str = "Did you mean:";
pub const SUGGESTION_DELETE_AFTER: Duration = Duration::from_secs(7);
pub const NO_PRIVATE_MESSAGE: &str = "Sorry, this command can't be used in a private message!";
pub const BOT_MISSING_PERMISSIONS: &str =
    "Sorry, it looks like I don't have the permissions I need to do that.";
pub const USER_INPUT_ERROR: &str = "Something about your input seems off. Check the arguments:";
pub const API_NOT_FOUND: &str = "There does not seem to be anything matching your query.";
pub const API_BAD_REQUEST: &str = "According to the API, your request is malformed.";
pub const API_INTERNAL_ERROR: &str = "Sorry, there seems to be an internal issue with the API.";

// Tunables of the error handler.
#[derive(Debug, Clone)]
pub struct HandlerSettings {
    pub help_command: String,
    // Qualified name of the command used for showing tags.
    pub tags_get_command: String,
    // Unknown commands in this channel never fall back to tags.
    pub verification_channel: Option<u64>,
    pub suggestion_icon_url: Option<String>,
    pub suggestion_delete_after: Duration,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        HandlerSettings {
            help_command: "help".to_string(),
            tags_get_command: "tags get".to_string(),
            verification_channel: None,
            suggestion_icon_url: None,
            suggestion_delete_after: SUGGESTION_DELETE_AFTER,
        }
    }
}

// What the error handler did with a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    // A local error handler has already replied.
    AlreadyHandled,
    TagDisplayed,
    // A similar command was suggested to the user.
    Suggested(String),
    // An error raised during the tag fallback was handled from scratch.
    Redispatched(Box<Disposition>),
    Replied,
    Logged(Level),
    RepliedAndLogged(Level),
}

enum Fallback {
    Done(Disposition),
    Redispatch(CommandError),
}

pub struct ErrorHandler<'a> {
    registry: &'a dyn CommandRegistry,
    tags: Option<&'a dyn TagService>,
    messenger: &'a dyn Messenger,
    settings: &'a HandlerSettings,
}

impl<'a> ErrorHandler<'a> {
    pub fn new(
        registry: &'a dyn CommandRegistry,
        tags: Option<&'a dyn TagService>,
        messenger: &'a dyn Messenger,
        settings: &'a HandlerSettings,
    ) -> Self {
        ErrorHandler {
            registry,
            tags,
            messenger,
            settings,
        }
    }

    // Handles an error raised by a command. At most one response is produced
    // per failure. Unknown commands fall back to a tag, then to a similar
    // command; input errors get the help of the command; checks and API
    // errors get canned replies or log lines; anything else goes to
    // `handle_unexpected_error`.
    //
    // Returns `Err` when a reply can't be delivered or the error was
    // unexpected and has to be raised again.
    pub fn handle<'b>(
        &'b self,
        ctx: &'b mut InvocationContext,
        failure: Failure,
    ) -> BoxFuture<'b, Result<Disposition>> {
        Box::pin(async move {
            if failure.is_handled() {
                trace!(
                    "Command {} had its error already handled locally; ignoring.",
                    ctx.command_name()
                );
                return Ok(Disposition::AlreadyHandled);
            }

            let help = HelpInvocation::for_command(&self.settings.help_command, ctx.command.as_ref());

            match failure.into_error() {
                CommandError::CommandNotFound(_) if !ctx.is_invoked_from_error_handler() => {
                    if self.is_verification_channel(ctx) {
                        debug!(
                            "Ignoring unknown command '{}' in the verification channel.",
                            ctx.invoked_with
                        );
                        return Ok(Disposition::Logged(Level::DEBUG));
                    }

                    match self.try_fallback(ctx).await? {
                        Fallback::Done(disposition) => Ok(disposition),
                        Fallback::Redispatch(err) => {
                            let disposition = self.handle(ctx, Failure::new(err)).await?;
                            Ok(Disposition::Redispatched(Box::new(disposition)))
                        }
                    }
                }
                CommandError::BadArgument(message) => {
                    self.send_text(ctx, &format!("Bad argument: {}\n", message))
                        .await?;
                    self.registry.invoke_help(ctx, &help).await?;
                    Ok(Disposition::Replied)
                }
                err @ CommandError::UserInput(_) => {
                    self.send_text(ctx, USER_INPUT_ERROR).await?;
                    self.registry.invoke_help(ctx, &help).await?;
                    debug!(
                        "Command {} invoked by {} with error {}: {}",
                        ctx.command_name(),
                        ctx.author,
                        err.kind(),
                        err
                    );
                    Ok(Disposition::RepliedAndLogged(Level::DEBUG))
                }
                CommandError::NoPrivateMessage => {
                    self.send_text(ctx, NO_PRIVATE_MESSAGE).await?;
                    Ok(Disposition::Replied)
                }
                CommandError::BotMissingPermissions(missing) => {
                    self.send_text(ctx, BOT_MISSING_PERMISSIONS).await?;
                    warn!(
                        "The bot is missing permissions to execute command {}: {:?}",
                        ctx.command_name(),
                        missing
                    );
                    Ok(Disposition::RepliedAndLogged(Level::WARN))
                }
                CommandError::MissingPermissions(missing) => {
                    debug!(
                        "{} is missing permissions to invoke command {}: {:?}",
                        ctx.author,
                        ctx.command_name(),
                        missing
                    );
                    Ok(Disposition::Logged(Level::DEBUG))
                }
                CommandError::InChannelCheckFailure(message) => {
                    self.send_text(ctx, &message).await?;
                    Ok(Disposition::Replied)
                }
                err @ (CommandError::CheckFailure(_)
                | CommandError::CommandOnCooldown(_)
                | CommandError::DisabledCommand(_)) => {
                    debug!(
                        "Command {} invoked by {} with error {}: {}",
                        ctx.command_name(),
                        ctx.author,
                        err.kind(),
                        err
                    );
                    Ok(Disposition::Logged(Level::DEBUG))
                }
                CommandError::CommandInvoke(InvokeError::Api(response)) => {
                    self.handle_api_error(ctx, &response).await
                }
                CommandError::CommandInvoke(InvokeError::Unexpected(original)) => {
                    self.handle_unexpected_error(ctx, original).await
                }
                err => self.handle_unexpected_error(ctx, err.to_unexpected()).await,
            }
        })
    }

    // Reports the error to the user and the logs, then raises it again.
    pub async fn handle_unexpected_error(
        &self,
        ctx: &InvocationContext,
        err: UnexpectedError,
    ) -> Result<Disposition> {
        let content = format!(
            "Sorry, an unexpected error occurred. Please let us know!\n\n```{}: {}```",
            err.kind(),
            err.message()
        );
        if let Err(send_err) = self.send_text(ctx, &content).await {
            error!("Can't report the unexpected error to the channel: {}", send_err);
        }

        error!(
            "Error executing command invoked by {}: {}",
            ctx.author, ctx.content
        );
        Err(Error::Unexpected(err))
    }

    async fn handle_api_error(
        &self,
        ctx: &InvocationContext,
        response: &ResponseCodeError,
    ) -> Result<Disposition> {
        let command = ctx.command_name();

        match response.status() {
            404 => {
                self.send_text(ctx, API_NOT_FOUND).await?;
                Ok(Disposition::Replied)
            }
            400 => {
                debug!(
                    "API responded with 400 for command {}: {}.",
                    command,
                    response.json()
                );
                self.send_text(ctx, API_BAD_REQUEST).await?;
                Ok(Disposition::RepliedAndLogged(Level::DEBUG))
            }
            status @ 500..=599 => {
                self.send_text(ctx, API_INTERNAL_ERROR).await?;
                warn!("API responded with {} for command {}", status, command);
                Ok(Disposition::RepliedAndLogged(Level::WARN))
            }
            status => {
                let content = format!(
                    "Got an unexpected status code from the API (`{}`).",
                    status
                );
                self.send_text(ctx, &content).await?;
                warn!("Unexpected API response for command {}: {}", command, status);
                Ok(Disposition::RepliedAndLogged(Level::WARN))
            }
        }
    }

    // Shows a tag named like the unknown command, or suggests a similar
    // command when there is no such tag.
    async fn try_fallback(&self, ctx: &mut InvocationContext) -> Result<Fallback> {
        let tags_get_command = self.registry.get_command(&self.settings.tags_get_command);
        let (tags, tags_get_command) = match (self.tags, tags_get_command) {
            (Some(tags), Some(command)) => (tags, command),
            _ => {
                debug!(
                    "Tags are unavailable; no fallback for unknown command '{}'.",
                    ctx.invoked_with
                );
                return Ok(Fallback::Done(Disposition::Logged(Level::DEBUG)));
            }
        };

        ctx.mark_invoked_from_error_handler();
        let command_name = ctx.invoked_with.clone();

        if let Some(fallback) = self
            .check_fallback_command(&tags_get_command, ctx, TAG_FALLBACK_CANCELLED)
            .await
        {
            return Ok(fallback);
        }

        if tags.display_tag(ctx, &command_name).await? {
            return Ok(Fallback::Done(Disposition::TagDisplayed));
        }

        let candidates = collect_candidates(&self.registry.walk_commands());
        let similar_command = closest_match(&command_name, &candidates)
            .and_then(|name| self.registry.get_command(&name).map(|command| (name, command)));
        let (similar_name, similar_command) = match similar_command {
            Some(found) => found,
            None => {
                debug!("No command similar to '{}' was found.", command_name);
                return Ok(Fallback::Done(Disposition::Logged(Level::DEBUG)));
            }
        };

        if let Some(fallback) = self
            .check_fallback_command(&similar_command, ctx, SUGGESTION_CANCELLED)
            .await
        {
            return Ok(fallback);
        }

        let reply = Reply::Suggestion {
            title: SUGGESTION_TITLE.to_string(),
            icon_url: self.settings.suggestion_icon_url.clone(),
            description: suggest_content(&ctx.content, &command_name, &similar_name),
            delete_after: self.settings.suggestion_delete_after,
        };
        self.messenger.send(ctx, reply).await?;
        Ok(Fallback::Done(Disposition::Suggested(similar_name)))
    }

    // Returns None when the fallback may use the command.
    async fn check_fallback_command(
        &self,
        command: &CommandInfo,
        ctx: &InvocationContext,
        log_msg: &str,
    ) -> Option<Fallback> {
        match self.registry.can_run(command, ctx).await {
            Ok(true) => None,
            Ok(false) => {
                debug!("{}", log_msg);
                Some(Fallback::Done(Disposition::Logged(Level::DEBUG)))
            }
            Err(err) => {
                debug!("{}", log_msg);
                Some(Fallback::Redispatch(err))
            }
        }
    }

    fn is_verification_channel(&self, ctx: &InvocationContext) -> bool {
        self.settings.verification_channel == Some(ctx.channel_id)
    }

    async fn send_text(&self, ctx: &InvocationContext, content: &str) -> Result<()> {
        self.messenger.send(ctx, Reply::Text(content.to_string())).await
    }
}

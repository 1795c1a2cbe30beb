use std::time::Duration;

use serenity::async_trait;

use crate::error::Result;
use crate::handler::context::{CommandInfo, InvocationContext};
use crate::handler::failure::CommandError;
use crate::handler::help::HelpInvocation;

// A message that the error handler sends back to the invocation channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    // An embed with a suggested command, removed after `delete_after`.
    Suggestion {
        title: String,
        icon_url: Option<String>,
        description: String,
        delete_after: Duration,
    },
}

#[async_trait]
pub trait CommandRegistry: Send + Sync {
    // Returns a command by its qualified name or one of its aliases.
    fn get_command(&self, name: &str) -> Option<CommandInfo>;

    // Returns every registered command, subcommands included.
    fn walk_commands(&self) -> Vec<CommandInfo>;

    // Runs the checks of the command against the invocation. A failed check
    // may be reported either as `Ok(false)` or as the raised command error.
    async fn can_run(
        &self,
        command: &CommandInfo,
        ctx: &InvocationContext,
    ) -> std::result::Result<bool, CommandError>;

    // Invokes the help command with the given arguments.
    async fn invoke_help(&self, ctx: &InvocationContext, help: &HelpInvocation) -> Result<()>;
}

#[async_trait]
pub trait TagService: Send + Sync {
    // Sends the tag with the given name. Returns false if nothing was sent.
    async fn display_tag(&self, ctx: &InvocationContext, name: &str) -> Result<bool>;
}

#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, ctx: &InvocationContext, reply: Reply) -> Result<()>;
}

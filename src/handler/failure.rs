use std::fmt;
use std::time::Duration;

use thiserror::Error as ThisError;

// An error returned by the HTTP API together with the response it came with.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseCodeError {
    status: u16,
    body: String,
}

impl ResponseCodeError {
    pub fn new(status: u16, body: &str) -> Self {
        ResponseCodeError {
            status,
            body: body.to_string(),
        }
    }

    // Returns the HTTP status code of the response.
    pub fn status(&self) -> u16 {
        self.status
    }

    // Returns the raw response body.
    pub fn body(&self) -> &str {
        &self.body
    }

    // Parses the response body as JSON. Bodies that aren't valid JSON are
    // returned as a plain JSON string, so they still can be logged.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|_| serde_json::Value::String(self.body.clone()))
    }
}

impl fmt::Display for ResponseCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Status: {} Response: {}", self.status, self.body)
    }
}

impl std::error::Error for ResponseCodeError {}

// Any error that has no dedicated handling. Keeps the name of the error type,
// because it's shown to users and written into logs.
#[derive(Debug, Clone, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct UnexpectedError {
    kind: String,
    message: String,
}

impl UnexpectedError {
    pub fn new(kind: &str, message: &str) -> Self {
        UnexpectedError {
            kind: kind.to_string(),
            message: message.to_string(),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

// The original error raised by a command body.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum InvokeError {
    #[error("{0}")]
    Api(ResponseCodeError),
    #[error("{0}")]
    Unexpected(UnexpectedError),
}

#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum CommandError {
    #[error("Command \"{0}\" is not found")]
    CommandNotFound(String),
    #[error("{0}")]
    BadArgument(String),
    #[error("{0}")]
    UserInput(String),
    #[error("This command cannot be used in private messages.")]
    NoPrivateMessage,
    #[error("Bot requires {} permission(s) to run this command.", .0.join(", "))]
    BotMissingPermissions(Vec<String>),
    #[error("You are missing {} permission(s) to run this command.", .0.join(", "))]
    MissingPermissions(Vec<String>),
    #[error("{0}")]
    InChannelCheckFailure(String),
    #[error("{0}")]
    CheckFailure(String),
    #[error("You are on cooldown. Try again in {:.2}s", .0.as_secs_f64())]
    CommandOnCooldown(Duration),
    #[error("{0} command is disabled.")]
    DisabledCommand(String),
    #[error("Command raised an exception: {0}")]
    CommandInvoke(InvokeError),
    #[error("{0}")]
    Other(UnexpectedError),
}

impl CommandError {
    // Returns the name of the error type, as it's shown in messages and logs.
    pub fn kind(&self) -> &str {
        match self {
            CommandError::CommandNotFound(_) => "CommandNotFound",
            CommandError::BadArgument(_) => "BadArgument",
            CommandError::UserInput(_) => "UserInputError",
            CommandError::NoPrivateMessage => "NoPrivateMessage",
            CommandError::BotMissingPermissions(_) => "BotMissingPermissions",
            CommandError::MissingPermissions(_) => "MissingPermissions",
            CommandError::InChannelCheckFailure(_) => "InChannelCheckFailure",
            CommandError::CheckFailure(_) => "CheckFailure",
            CommandError::CommandOnCooldown(_) => "CommandOnCooldown",
            CommandError::DisabledCommand(_) => "DisabledCommand",
            CommandError::CommandInvoke(_) => "CommandInvokeError",
            CommandError::Other(err) => err.kind(),
        }
    }

    // Converts the error into the shape used by the unexpected error responder.
    pub fn to_unexpected(&self) -> UnexpectedError {
        match self {
            CommandError::Other(err) => err.clone(),
            CommandError::CommandInvoke(InvokeError::Unexpected(err)) => err.clone(),
            _ => UnexpectedError::new(self.kind(), &self.to_string()),
        }
    }
}

impl From<ResponseCodeError> for CommandError {
    fn from(err: ResponseCodeError) -> CommandError {
        CommandError::CommandInvoke(InvokeError::Api(err))
    }
}

impl From<UnexpectedError> for CommandError {
    fn from(err: UnexpectedError) -> CommandError {
        CommandError::Other(err)
    }
}

// A command error as it arrives at the error handler. The `handled` flag is
// set by a local error handler that has already replied to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    error: CommandError,
    handled: bool,
}

impl Failure {
    pub fn new(error: CommandError) -> Self {
        Failure {
            error,
            handled: false,
        }
    }

    pub fn mark_handled(mut self) -> Self {
        self.handled = true;
        self
    }

    pub fn error(&self) -> &CommandError {
        &self.error
    }

    pub fn into_error(self) -> CommandError {
        self.error
    }

    pub fn is_handled(&self) -> bool {
        self.handled
    }
}

impl From<CommandError> for Failure {
    fn from(error: CommandError) -> Self {
        Failure::new(error)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::handler::failure::{
        CommandError, Failure, InvokeError, ResponseCodeError, UnexpectedError,
    };

    #[test]
    fn test_kind_names() {
        assert_eq!(CommandError::UserInput("x".to_string()).kind(), "UserInputError");
        assert_eq!(
            CommandError::CommandInvoke(InvokeError::Api(ResponseCodeError::new(404, ""))).kind(),
            "CommandInvokeError"
        );
        assert_eq!(
            CommandError::Other(UnexpectedError::new("ZeroDivisionError", "oops")).kind(),
            "ZeroDivisionError"
        );
    }

    #[test]
    fn test_display_of_permission_errors() {
        let error = CommandError::BotMissingPermissions(vec![
            "Manage Messages".to_string(),
            "Embed Links".to_string(),
        ]);
        assert_eq!(
            error.to_string(),
            "Bot requires Manage Messages, Embed Links permission(s) to run this command."
        );
    }

    #[test]
    fn test_display_of_cooldown() {
        let error = CommandError::CommandOnCooldown(Duration::from_millis(1500));
        assert_eq!(error.to_string(), "You are on cooldown. Try again in 1.50s");
    }

    #[test]
    fn test_response_json_body() {
        let error = ResponseCodeError::new(400, r#"{"name": ["This field is required."]}"#);
        assert_eq!(error.json()["name"][0], "This field is required.");

        let error = ResponseCodeError::new(400, "Bad Request");
        assert_eq!(error.json(), serde_json::Value::String("Bad Request".to_string()));
    }

    #[test]
    fn test_unexpected_keeps_original_kind() {
        let inner = UnexpectedError::new("KeyError", "'name'");
        let error = CommandError::CommandInvoke(InvokeError::Unexpected(inner.clone()));
        assert_eq!(error.to_unexpected(), inner);

        let error = CommandError::CommandNotFound("hlep".to_string());
        let unexpected = error.to_unexpected();
        assert_eq!(unexpected.kind(), "CommandNotFound");
        assert_eq!(unexpected.message(), "Command \"hlep\" is not found");
    }

    #[test]
    fn test_failure_is_not_handled_by_default() {
        let failure = Failure::from(CommandError::NoPrivateMessage);
        assert_eq!(failure.is_handled(), false);
        assert_eq!(failure.mark_handled().is_handled(), true);
    }
}

use std::io;
use std::result;

use serenity::prelude::SerenityError;
use thiserror::Error as ThisError;

use crate::handler::failure::{CommandError, ResponseCodeError, UnexpectedError};

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("{0}")]
    SerenityError(String),
    #[error("{0}")]
    Config(String),
    #[error("{0}")]
    Storage(String),
    // A command failed in an expected way, e.g. a failed check.
    #[error("{0}")]
    Command(CommandError),
    #[error("{0}")]
    Api(ResponseCodeError),
    // Raised again by the error handler after reporting an unexpected error.
    #[error("{}: {}", .0.kind(), .0.message())]
    Unexpected(UnexpectedError),
}

impl Error {
    // Returns the name of the error type, as it's shown to users.
    pub fn kind(&self) -> &str {
        match self {
            Error::SerenityError(_) => "SerenityError",
            Error::Config(_) => "ConfigError",
            Error::Storage(_) => "StorageError",
            Error::Command(err) => err.kind(),
            Error::Api(_) => "ResponseCodeError",
            Error::Unexpected(err) => err.kind(),
        }
    }
}

impl From<SerenityError> for Error {
    fn from(err: SerenityError) -> Error {
        let description = err.to_string();
        Error::SerenityError(description)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Storage(format!("Can't parse the tags file: {}", err))
    }
}

impl From<CommandError> for Error {
    fn from(err: CommandError) -> Error {
        Error::Command(err)
    }
}

impl From<ResponseCodeError> for Error {
    fn from(err: ResponseCodeError) -> Error {
        Error::Api(err)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::handler::failure::{CommandError, UnexpectedError};

    #[test]
    fn test_unexpected_error_output() {
        let error = Error::Unexpected(UnexpectedError::new("KeyError", "'name'"));
        assert_eq!(error.to_string(), "KeyError: 'name'");
        assert_eq!(error.kind(), "KeyError");
    }

    #[test]
    fn test_command_error_keeps_kind() {
        let error = Error::from(CommandError::InChannelCheckFailure("nope".to_string()));
        assert_eq!(error.kind(), "InChannelCheckFailure");
        assert_eq!(error.to_string(), "nope");
    }
}

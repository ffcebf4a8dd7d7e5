use std::io;

use thiserror::Error;

use crate::exit_codes;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("You do not have the required permissions to create an issue in this project")]
    InvalidCredentials,
    #[error("Shortcut responded with Bad Request Error. Response message: {0}")]
    BadRequest(String),
    #[error("Shortcut responded with Resource does not exist Error. Response message: {0}")]
    NotFound(String),
    #[error("Shortcut responded with Unprocessable Error. Response message: {0}")]
    Unprocessable(String),
    #[error(
        "an Unknown HTTP Status {status} and response occurred when attempting your request: {body}"
    )]
    UnknownStatus { status: u16, body: String },
    #[error("failed to reach Shortcut: {0}")]
    Transport(String),
    #[error("unexpected response from Shortcut: {0}")]
    MalformedResponse(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AppError {
    /// Process exit status consumed by the calling pipeline.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::InvalidCredentials => exit_codes::INVALID_CREDENTIALS,
            AppError::BadRequest(_) => exit_codes::BAD_REQUEST,
            AppError::NotFound(_) => exit_codes::RESOURCE_NOT_FOUND,
            AppError::Unprocessable(_) => exit_codes::UNPROCESSABLE_ENTITY,
            AppError::UnknownStatus { .. } => exit_codes::UNKNOWN_ERROR,
            AppError::Configuration(_)
            | AppError::InvalidInput(_)
            | AppError::Transport(_)
            | AppError::MalformedResponse(_)
            | AppError::Io(_) => exit_codes::GENERAL_FAILURE,
        }
    }

    /// True for failures reported by the Shortcut API itself.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            AppError::InvalidCredentials
                | AppError::BadRequest(_)
                | AppError::NotFound(_)
                | AppError::Unprocessable(_)
                | AppError::UnknownStatus { .. }
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_http_failures_to_distinct_exit_codes() {
        let codes = [
            AppError::InvalidCredentials.exit_code(),
            AppError::BadRequest(String::new()).exit_code(),
            AppError::NotFound(String::new()).exit_code(),
            AppError::Unprocessable(String::new()).exit_code(),
            AppError::UnknownStatus {
                status: 500,
                body: String::new(),
            }
            .exit_code(),
        ];
        for (index, code) in codes.iter().enumerate() {
            assert!(!codes[index + 1..].contains(code));
            assert_ne!(*code, exit_codes::SUCCESS);
        }
    }

    #[test]
    fn local_failures_use_general_exit_code() {
        let error = AppError::InvalidInput("bad date".to_string());
        assert_eq!(error.exit_code(), exit_codes::GENERAL_FAILURE);
        assert!(!error.is_remote());
    }

    #[test]
    fn messages_include_response_body() {
        let error = AppError::Unprocessable("{\"message\":\"nope\"}".to_string());
        assert!(error.to_string().contains("nope"));

        let error = AppError::UnknownStatus {
            status: 503,
            body: "down".to_string(),
        };
        assert!(error.to_string().contains("503"));
        assert!(error.to_string().contains("down"));
    }
}

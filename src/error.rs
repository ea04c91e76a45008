//! Error types for teamboard.
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (unknown board, bad field value, missing record)
//! - 4: Operation failed (I/O, serialization, terminal)

use std::path::PathBuf;

use thiserror::Error;

/// Exit codes for the `tb` binary.
pub mod exit_codes {
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Board not found: '{0}'. Please select a valid board (see `tb boards`).")]
    BoardNotFound(String),

    #[error("Task {0} not found on this board")]
    TaskNotFound(u64),

    #[error("Defect {0} not found")]
    DefectNotFound(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("{assignee} is not a member of the {board} team")]
    NotOnRoster { assignee: String, board: String },

    #[error("Invalid date '{0}': expected YYYY-MM-DD, today, tomorrow, yesterday or 'in Nd'")]
    InvalidDate(String),

    #[error("Invalid configuration in {path}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    // Operation failures (exit code 4)
    #[error("No {0} id left: the stored ids already reach the maximum")]
    IdsExhausted(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::BoardNotFound(_)
            | Error::TaskNotFound(_)
            | Error::DefectNotFound(_)
            | Error::MissingField(_)
            | Error::NotOnRoster { .. }
            | Error::InvalidDate(_)
            | Error::InvalidConfig { .. } => exit_codes::USER_ERROR,

            Error::IdsExhausted(_) | Error::Io(_) | Error::Json(_) | Error::TomlParse(_) => {
                exit_codes::OPERATION_FAILED
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_map_to_exit_code_two() {
        assert_eq!(Error::BoardNotFound("nope".into()).exit_code(), exit_codes::USER_ERROR);
        assert_eq!(Error::MissingField("story").exit_code(), exit_codes::USER_ERROR);
        assert_eq!(
            Error::NotOnRoster { assignee: "Ravi".into(), board: "Mav-CDS".into() }.exit_code(),
            exit_codes::USER_ERROR
        );
    }

    #[test]
    fn io_errors_map_to_operation_failed() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::Other, "disk").into();
        assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);
    }

    #[test]
    fn board_not_found_message_names_the_board() {
        let msg = Error::BoardNotFound("xyz".into()).to_string();
        assert!(msg.starts_with("Board not found"));
        assert!(msg.contains("xyz"));
    }
}

//! Error types for the lanscout CLI.

use lanscout_core::DiscoveryError;
use thiserror::Error;

/// Exit codes for the CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NETWORK_ERROR: i32 = 2;
    pub const INVALID_ARGS: i32 = 4;
}

/// Main error type for the CLI
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No services found")]
    NoServicesFound,
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Discovery(_) => exit_codes::NETWORK_ERROR,
            CliError::InvalidArgument(_) => exit_codes::INVALID_ARGS,
            CliError::NoServicesFound => exit_codes::GENERAL_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_exit_code() {
        let err = CliError::InvalidArgument("bad interface".to_string());
        assert_eq!(err.exit_code(), exit_codes::INVALID_ARGS);
    }

    #[test]
    fn test_no_services_exit_code() {
        assert_eq!(
            CliError::NoServicesFound.exit_code(),
            exit_codes::GENERAL_ERROR
        );
    }

    #[test]
    fn test_error_display() {
        let err = CliError::InvalidArgument("timeout must be positive".to_string());
        assert_eq!(
            format!("{}", err),
            "Invalid argument: timeout must be positive"
        );
    }
}

//! Exit code standardization for costctl
//!
//! ## Exit Code Convention
//!
//! - `0` = Success (including "no results found")
//! - `1` = User error (incomplete workload, invalid input, submission in progress)
//! - `2` = System error (optimization service failure, network error, I/O)
//! - `3` = Configuration error (invalid or unreadable config)

use crate::error::CostctlError;

/// Standard exit codes for costctl
pub mod codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// User error (invalid input, validation failure)
    pub const USER_ERROR: i32 = 1;
    /// System error (remote service failure, network error)
    pub const SYSTEM_ERROR: i32 = 2;
    /// Configuration error
    pub const CONFIG_ERROR: i32 = 3;
}

/// Map a CostctlError to an appropriate exit code
pub fn exit_code_for_error(error: &CostctlError) -> i32 {
    use CostctlError::*;
    match error {
        Config(_) => codes::CONFIG_ERROR,

        Validation { .. } => codes::USER_ERROR,
        SubmissionInProgress => codes::USER_ERROR,

        Transport { .. } => codes::SYSTEM_ERROR,
        Io(_) => codes::SYSTEM_ERROR,
        Json(_) => codes::SYSTEM_ERROR,
    }
}

/// Exit code for a top-level `anyhow` error.
///
/// Errors that did not originate as `CostctlError` (e.g. config file context
/// chains) are treated as configuration errors when they mention the config,
/// otherwise as system errors.
pub fn exit_code_for_anyhow(error: &anyhow::Error) -> i32 {
    if let Some(err) = error.downcast_ref::<CostctlError>() {
        return exit_code_for_error(err);
    }
    if error.to_string().contains("config") {
        codes::CONFIG_ERROR
    } else {
        codes::SYSTEM_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_validation_is_user_error() {
        let err = CostctlError::Validation {
            field: "components".to_string(),
            reason: "x".to_string(),
        };
        assert_eq!(exit_code_for_error(&err), codes::USER_ERROR);
    }

    #[test]
    fn test_transport_is_system_error() {
        let err = CostctlError::Transport {
            endpoint: "/getAzurePrices".to_string(),
            status: None,
            message: "connection refused".to_string(),
            source: None,
        };
        assert_eq!(exit_code_for_error(&err), codes::SYSTEM_ERROR);
    }

    #[test]
    fn test_anyhow_downcast() {
        let err: anyhow::Error = CostctlError::Config(ConfigError::ParseError("bad".into())).into();
        assert_eq!(exit_code_for_anyhow(&err), codes::CONFIG_ERROR);

        let err: anyhow::Error = CostctlError::SubmissionInProgress.into();
        assert_eq!(exit_code_for_anyhow(&err), codes::USER_ERROR);

        let err = anyhow::anyhow!("Failed to read config: /tmp/x.toml");
        assert_eq!(exit_code_for_anyhow(&err), codes::CONFIG_ERROR);
    }
}

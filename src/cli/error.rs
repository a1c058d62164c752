use std::fmt;
use std::path::PathBuf;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ApiError: the one error kind every backend call fails with
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Failure of a backend call.
///
/// `status` is the HTTP status code received, or `0` when no response
/// arrived at all (connection refused, timeout, unreadable body).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl ApiError {
    pub const NETWORK: u16 = 0;

    pub fn http(status: reqwest::StatusCode) -> Self {
        Self {
            status: status.as_u16(),
            message: format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status")
            ),
        }
    }

    pub fn network(detail: impl fmt::Display) -> Self {
        Self {
            status: Self::NETWORK,
            message: format!("Network error: {detail}"),
        }
    }

    pub fn is_network(&self) -> bool {
        self.status == Self::NETWORK
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CliError: unified error hierarchy for all terminal commands
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug)]
pub enum CliError {
    // Backend errors
    Api(ApiError),

    // Config errors
    ConfigLoad(config::ConfigError),

    // Input errors
    NoAcceptedFiles { rejected: Vec<PathBuf> },
    UnknownRoute { path: String },
    InvalidArgument(String),

    // Runtime errors
    RuntimeInit(std::io::Error),
    Io(std::io::Error),
    Encode(serde_json::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(err) => write!(f, "{err}"),
            Self::ConfigLoad(err) => write!(f, "Failed to load configuration: {err}"),
            Self::NoAcceptedFiles { rejected } => {
                if rejected.is_empty() {
                    write!(f, "No files to upload")
                } else {
                    let names: Vec<String> =
                        rejected.iter().map(|p| p.display().to_string()).collect();
                    write!(
                        f,
                        "No PDF or DOCX files to upload (skipped: {})",
                        names.join(", ")
                    )
                }
            }
            Self::UnknownRoute { path } => {
                write!(f, "Unknown route '{path}'. Run: legalmem routes")
            }
            Self::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            Self::RuntimeInit(err) => write!(f, "Failed to create async runtime: {err}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Encode(err) => write!(f, "Failed to encode output: {err}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigLoad(err)
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encode(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_carries_code_and_reason() {
        let err = ApiError::http(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.status, 500);
        assert_eq!(err.message, "HTTP 500: Internal Server Error");
        assert!(!err.is_network());
    }

    #[test]
    fn test_network_error_has_status_zero() {
        let err = ApiError::network("connection refused");
        assert_eq!(err.status, 0);
        assert!(err.is_network());
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_cli_error_display_wraps_api_message() {
        let err = CliError::from(ApiError::http(reqwest::StatusCode::NOT_FOUND));
        assert_eq!(format!("{err}"), "HTTP 404: Not Found");
    }

    #[test]
    fn test_cli_error_display_no_accepted_files() {
        let err = CliError::NoAcceptedFiles {
            rejected: vec![PathBuf::from("notes.txt")],
        };
        let msg = format!("{err}");
        assert!(msg.contains("PDF or DOCX"), "Expected file types in: {msg}");
        assert!(msg.contains("notes.txt"), "Expected file name in: {msg}");
    }

    #[test]
    fn test_cli_error_display_unknown_route() {
        let err = CliError::UnknownRoute {
            path: "/settings".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("/settings"), "Expected path in: {msg}");
        assert!(msg.contains("legalmem routes"), "Expected hint in: {msg}");
    }

    #[test]
    fn test_cli_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        assert!(matches!(CliError::from(io_err), CliError::Io(_)));
    }

    #[test]
    fn test_cli_error_from_encode_error() {
        let encode_err = serde_json::from_str::<u8>("\"x\"").unwrap_err();
        let err = CliError::from(encode_err);
        assert!(matches!(err, CliError::Encode(_)));
        assert!(err.to_string().starts_with("Failed to encode output"));
    }
}

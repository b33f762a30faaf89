use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Failure taxonomy shared by the REST gateway and the streaming import
/// path. Every variant is fatal to the call that produced it; malformed
/// individual frames are not represented here because they are skipped at
/// the parse site and never surface.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status}: {message}")]
    UnexpectedStatus {
        status: StatusCode,
        message: String,
    },

    /// The server sent an explicit error frame mid-stream.
    #[error("import stream reported an error: {message}")]
    Stream { message: String },

    /// The stream closed cleanly but never delivered a terminal record.
    /// Distinct from a transport failure: the connection was fine, the
    /// protocol was not.
    #[error("stream ended without a completion event")]
    IncompleteStream,

    #[error("no data received for {}s", .elapsed.as_secs())]
    IdleTimeout { elapsed: Duration },

    /// The envelope came back with a non-success `errorCode`.
    #[error("backend rejected the request (code {code}): {message}")]
    Api { code: i64, message: String },

    #[error("operation cancelled")]
    Cancelled,

    #[error("no files supplied for import")]
    EmptyImport,

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    /// Fixed user-facing wording for every failure kind, so REST and
    /// streaming problems read the same to an operator regardless of which
    /// path raised them.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Transport(_) => {
                "Network error, please check the connection".to_string()
            }
            ClientError::UnexpectedStatus { status, message } => match status.as_u16() {
                401 => "Session expired, please sign in again".to_string(),
                403 => "You do not have permission for this operation".to_string(),
                404 => "The requested resource does not exist".to_string(),
                500 => "Server error, please try again later".to_string(),
                _ if !message.is_empty() => message.clone(),
                code => format!("Request failed with status {code}"),
            },
            ClientError::Stream { message } => message.clone(),
            ClientError::IncompleteStream => {
                "The import ended before the server reported completion".to_string()
            }
            ClientError::IdleTimeout { elapsed } => {
                format!("No progress received for {}s, giving up", elapsed.as_secs())
            }
            ClientError::Api { message, .. } if !message.is_empty() => message.clone(),
            ClientError::Api { code, .. } => format!("Request failed (code {code})"),
            ClientError::Cancelled => "Operation cancelled".to_string(),
            ClientError::EmptyImport => "Select at least one file to import".to_string(),
            ClientError::InvalidUrl(_) => {
                "The configured server address is not a valid URL".to_string()
            }
        }
    }

    /// True when the server rejected our credential; any stored token
    /// should be discarded before the next attempt.
    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self,
            ClientError::UnexpectedStatus { status, .. } if *status == StatusCode::UNAUTHORIZED
        )
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("invalid tool request: {0}")]
    InvalidRequest(String),

    #[error("upstream error: {0}")]
    UpstreamError(String),

    #[error("tool call failed: {message} (code {code})")]
    ProtocolError { code: i32, message: String },

    #[error("session not established: {0}")]
    SessionError(String),

    #[error("no data received from tool server")]
    EmptyResult,

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;

use backoffice_core::{ActionKind, BulkOutcome, Resource};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("http status {status}")]
    Status {
        status: u16,
        message: Option<String>,
    },
    #[error("timeout")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("undecodable response: {0}")]
    Decode(String),
    #[error("{action} is not available for {resource}")]
    Unsupported {
        resource: Resource,
        action: ActionKind,
    },
}

impl ApiError {
    /// Sentence suitable for the page's error banner.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Status {
                status: 401 | 403, ..
            } => "You are not allowed to do this".to_string(),
            ApiError::Status { status: 404, .. } => "The item no longer exists".to_string(),
            ApiError::Status { status, .. } => format!("The server answered with status {status}"),
            ApiError::Timeout => "The server took too long to answer".to_string(),
            ApiError::Network(_) => "Could not reach the server".to_string(),
            ApiError::InvalidUrl(_) => "The API address is invalid".to_string(),
            ApiError::Decode(_) => "The server sent an unreadable response".to_string(),
            ApiError::Unsupported { .. } => self.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ListFetched {
        resource: Resource,
        generation: u64,
        result: Result<Vec<Value>, ApiError>,
    },
    RowActionDone {
        ticket: u64,
        id: String,
        action: ActionKind,
        result: Result<(), ApiError>,
    },
    BulkSettled {
        ticket: u64,
        action: ActionKind,
        outcome: BulkOutcome,
    },
}

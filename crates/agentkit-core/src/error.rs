use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentkitError {
    #[error("not initialized: run 'agentkit init'")]
    NotInitialized,

    #[error("malformed capability in {origin}: {reason}")]
    MalformedCapability { origin: String, reason: String },

    #[error("duplicate capability '{id}': defined in {first} and {second}")]
    DuplicateCapability {
        id: String,
        first: String,
        second: String,
    },

    #[error("unknown capability: {}", .0.join(", "))]
    UnknownCapability(Vec<String>),

    #[error("invalid capability kind: {0}")]
    InvalidKind(String),

    #[error("invalid capability status: {0}")]
    InvalidStatus(String),

    #[error("failed to parse {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("agent not found: {0}")]
    AgentNotFound(String),

    #[error("agent already exists: {0}")]
    AgentExists(String),

    #[error("invalid slug '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AgentkitError>;

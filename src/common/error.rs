use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Mission not found: {id}")]
    MissionNotFound { id: String },

    #[error("Agent not found: {name}")]
    AgentNotFound { name: String },

    #[error("Invalid command: {reason}")]
    InvalidCommand { reason: String },

    #[error("Invalid status transition for mission {mission_id}: {from} -> {to}")]
    InvalidStatusTransition {
        mission_id: String,
        from: String,
        to: String,
    },

    #[error("Missing collaborator: {what}")]
    MissingCollaborator { what: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
}

/// Failure to turn a transport payload back into a record. Never carries a partial record.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("{kind} payload is empty")]
    Empty { kind: &'static str },

    #[error("{kind} payload is malformed: {source}")]
    Malformed {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;

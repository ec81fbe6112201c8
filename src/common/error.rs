use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid coordinate: {reason}")]
    InvalidCoordinate { reason: String },

    #[error("No buildings with an exit door are available")]
    NoBuildingsAvailable,

    #[error("Cannot spawn {requested} people in one request, the limit is {limit}")]
    SpawnLimitExceeded { requested: usize, limit: usize },

    #[error("Unknown person: {id}")]
    UnknownPerson { id: usize },

    #[error("Map decode failure: {0}")]
    DecodeFailure(String),
}

impl DomainError {
    pub fn invalid_coordinate(reason: impl Into<String>) -> Self {
        DomainError::InvalidCoordinate { reason: reason.into() }
    }
}

/// A way tagged as a building that could not be turned into a footprint.
/// Reported and dropped during extraction, never propagated.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Building way {way_id} is not a usable polygon: {reason}")]
pub struct MalformedBuildingWay {
    pub way_id: i64,
    pub node_refs: Vec<i64>,
    pub reason: String,
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;

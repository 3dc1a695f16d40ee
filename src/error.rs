use crate::schema::Resource;

/// Failures surfaced to query-layer callers
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("{resource} {id} not found")]
    NotFound { resource: Resource, id: i64 },

    #[error("Invalid resource type: {0}")]
    InvalidResourceType(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

//! Declaration framework error types

use thiserror::Error;

/// Errors raised while building or resolving a declaration graph
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Duplicate resource urn: {0}")]
    DuplicateUrn(String),

    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    #[error("Reference to undeclared resource: {0}")]
    UnknownDependency(String),

    #[error("Dependency cycle through {0}")]
    DependencyCycle(String),

    #[error("Output is already resolved")]
    OutputAlreadyResolved,

    #[error("Resource outputs already resolved: {0}")]
    ResourceAlreadyResolved(String),

    #[error("Missing attribute '{attribute}' for {urn}")]
    MissingAttribute { urn: String, attribute: String },

    #[error("Unsupported resource type: {0}")]
    UnsupportedResourceType(String),

    #[error("Invalid declaration: {0}")]
    InvalidDeclaration(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;

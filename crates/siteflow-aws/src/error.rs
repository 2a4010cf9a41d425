//! AWS declaration error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("custom-domain is set but acm-certificate-arn is missing")]
    MissingCertificateArn,

    #[error("acm-certificate-arn is set but custom-domain is missing")]
    MissingCustomDomain,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Graph(#[from] siteflow_graph::GraphError),
}

pub type Result<T> = std::result::Result<T, AwsError>;

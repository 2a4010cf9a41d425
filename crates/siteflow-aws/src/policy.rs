//! Bucket access policy generation
//!
//! The policy grants object reads to the content-delivery service principal
//! and nothing else, conditioned on the requesting distribution's ARN. It is
//! generated from two deferred inputs, so the document re-derives whenever
//! either the bucket or the distribution is re-declared.

use serde::{Deserialize, Serialize};
use siteflow_graph::Output;

pub const POLICY_VERSION: &str = "2012-10-17";
const CLOUDFRONT_SERVICE: &str = "cloudfront.amazonaws.com";

/// Typed view of the generated document, mainly for consumers that want to
/// inspect or validate a policy rather than ship it as an opaque string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Statement")]
    pub statement: Vec<PolicyStatement>,
}

impl PolicyDocument {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyStatement {
    #[serde(rename = "Sid")]
    pub sid: String,
    #[serde(rename = "Effect")]
    pub effect: String,
    #[serde(rename = "Principal")]
    pub principal: Principal,
    #[serde(rename = "Action")]
    pub action: String,
    #[serde(rename = "Resource")]
    pub resource: String,
    #[serde(rename = "Condition")]
    pub condition: Condition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    #[serde(rename = "Service")]
    pub service: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "StringEquals")]
    pub string_equals: SourceArnCondition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceArnCondition {
    #[serde(rename = "AWS:SourceArn")]
    pub aws_source_arn: String,
}

/// JSON policy allowing `s3:GetObject` on the bucket's objects for requests
/// originating from the given distribution.
pub fn cloudfront_read_policy(bucket_id: &str, distribution_arn: &str) -> String {
    serde_json::json!({
        "Version": POLICY_VERSION,
        "Statement": [{
            "Sid": "AllowCloudFrontServicePrincipal",
            "Effect": "Allow",
            "Principal": {
                "Service": CLOUDFRONT_SERVICE,
            },
            "Action": "s3:GetObject",
            "Resource": format!("arn:aws:s3:::{bucket_id}/*"),
            "Condition": {
                "StringEquals": {
                    "AWS:SourceArn": distribution_arn,
                },
            },
        }],
    })
    .to_string()
}

/// Deferred form: the document exists once both the bucket id and the
/// distribution ARN are known, and is computed exactly once.
pub fn cloudfront_read_policy_output(
    bucket_id: &Output<String>,
    distribution_arn: &Output<String>,
) -> Output<String> {
    Output::join2(bucket_id, distribution_arn, |bucket, arn| {
        cloudfront_read_policy(&bucket, &arn)
    })
}

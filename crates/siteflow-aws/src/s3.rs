//! S3 resource declarations: bucket, public-access block, bucket policy

use crate::error::Result;
use serde::Serialize;
use serde_json::{Map, Value};
use siteflow_graph::{
    AttributeResolver, Output, ResourceDeclaration, Scope, Urn, require_string_attribute,
};
use std::collections::BTreeMap;

pub const BUCKET: &str = "aws:s3:bucket";
pub const BUCKET_PUBLIC_ACCESS_BLOCK: &str = "aws:s3:bucket-public-access-block";
pub const BUCKET_POLICY: &str = "aws:s3:bucket-policy";

/// Static-website hosting configuration for a bucket.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketWebsite {
    pub index_document: String,
}

impl BucketWebsite {
    pub fn index(document: impl Into<String>) -> Self {
        Self {
            index_document: document.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<BucketWebsite>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

/// A declared S3 bucket.
#[derive(Debug, Clone)]
pub struct Bucket {
    urn: Urn,
    pub id: Output<String>,
    pub arn: Output<String>,
    pub bucket: Output<String>,
    pub bucket_regional_domain_name: Output<String>,
    pub website_endpoint: Output<String>,
}

impl Bucket {
    pub fn new(scope: &Scope, name: &str, args: BucketArgs) -> Result<Self> {
        let urn = scope.urn(BUCKET, name);
        let id = Output::pending_for(&urn);
        let arn = Output::pending_for(&urn);
        let bucket = Output::pending_for(&urn);
        let bucket_regional_domain_name = Output::pending_for(&urn);
        let website_endpoint = Output::pending_for(&urn);

        let declaration = ResourceDeclaration::new(urn.clone(), BUCKET, name)
            .with_attributes(serde_json::to_value(&args)?);

        let resolver: AttributeResolver = {
            let id = id.clone();
            let arn = arn.clone();
            let bucket = bucket.clone();
            let regional = bucket_regional_domain_name.clone();
            let website = website_endpoint.clone();
            let urn = urn.clone();
            Box::new(move |attributes: &Map<String, Value>| {
                id.resolve(require_string_attribute(attributes, &urn, "id")?)?;
                arn.resolve(require_string_attribute(attributes, &urn, "arn")?)?;
                bucket.resolve(require_string_attribute(attributes, &urn, "bucket")?)?;
                regional.resolve(require_string_attribute(
                    attributes,
                    &urn,
                    "bucketRegionalDomainName",
                )?)?;
                website.resolve(require_string_attribute(
                    attributes,
                    &urn,
                    "websiteEndpoint",
                )?)?;
                Ok(())
            })
        };
        scope.register(declaration, resolver)?;

        Ok(Self {
            urn,
            id,
            arn,
            bucket,
            bucket_regional_domain_name,
            website_endpoint,
        })
    }

    pub fn urn(&self) -> &Urn {
        &self.urn
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketPublicAccessBlockArgs {
    pub bucket: Output<String>,
    pub block_public_acls: bool,
    pub ignore_public_acls: bool,
    pub block_public_policy: bool,
    pub restrict_public_buckets: bool,
}

impl BucketPublicAccessBlockArgs {
    /// All four flags on: nothing about the bucket is publicly addressable.
    pub fn locked_down(bucket: Output<String>) -> Self {
        Self {
            bucket,
            block_public_acls: true,
            ignore_public_acls: true,
            block_public_policy: true,
            restrict_public_buckets: true,
        }
    }
}

/// A declared public-access block. Referencing the bucket's id is what
/// forces the bucket to exist first.
#[derive(Debug, Clone)]
pub struct BucketPublicAccessBlock {
    urn: Urn,
    pub id: Output<String>,
}

impl BucketPublicAccessBlock {
    pub fn new(scope: &Scope, name: &str, args: BucketPublicAccessBlockArgs) -> Result<Self> {
        let urn = scope.urn(BUCKET_PUBLIC_ACCESS_BLOCK, name);
        let id = Output::pending_for(&urn);

        let declaration = ResourceDeclaration::new(urn.clone(), BUCKET_PUBLIC_ACCESS_BLOCK, name)
            .with_attributes(serde_json::to_value(&args)?)
            .with_dependencies(args.bucket.dependencies().to_vec());

        let resolver: AttributeResolver = {
            let id = id.clone();
            let urn = urn.clone();
            Box::new(move |attributes: &Map<String, Value>| {
                id.resolve(require_string_attribute(attributes, &urn, "id")?)?;
                Ok(())
            })
        };
        scope.register(declaration, resolver)?;

        Ok(Self { urn, id })
    }

    pub fn urn(&self) -> &Urn {
        &self.urn
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketPolicyArgs {
    pub bucket: Output<String>,
    /// JSON policy document; usually a deferred value joined over the
    /// bucket id and whatever principal the policy grants to.
    pub policy: Output<String>,
}

/// A declared bucket policy.
#[derive(Debug, Clone)]
pub struct BucketPolicy {
    urn: Urn,
    pub id: Output<String>,
    /// The document as declared, still deferred until its inputs resolve.
    pub policy: Output<String>,
}

impl BucketPolicy {
    pub fn new(scope: &Scope, name: &str, args: BucketPolicyArgs) -> Result<Self> {
        let urn = scope.urn(BUCKET_POLICY, name);
        let id = Output::pending_for(&urn);
        let policy = args.policy.clone();

        let mut dependencies = args.bucket.dependencies().to_vec();
        dependencies.extend(args.policy.dependencies().iter().cloned());

        let declaration = ResourceDeclaration::new(urn.clone(), BUCKET_POLICY, name)
            .with_attributes(serde_json::to_value(&args)?)
            .with_dependencies(dependencies);

        let resolver: AttributeResolver = {
            let id = id.clone();
            let urn = urn.clone();
            Box::new(move |attributes: &Map<String, Value>| {
                id.resolve(require_string_attribute(attributes, &urn, "id")?)?;
                Ok(())
            })
        };
        scope.register(declaration, resolver)?;

        Ok(Self { urn, id, policy })
    }

    pub fn urn(&self) -> &Urn {
        &self.urn
    }
}

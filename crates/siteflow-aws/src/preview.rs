//! Network-free preview engine
//!
//! Walks the declaration graph in creation order and resolves every resource
//! with deterministic placeholder attributes, so outputs (and everything
//! derived from them, like the bucket policy document) can be inspected
//! without a cloud provider. Identical declarations always produce identical
//! placeholder values.

use crate::cloudfront::{DISTRIBUTION, ORIGIN_ACCESS_CONTROL};
use crate::s3::{BUCKET, BUCKET_POLICY, BUCKET_PUBLIC_ACCESS_BLOCK};
use crate::website::STATIC_WEBSITE;
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use siteflow_graph::{
    DependencyGraph, Engine, GraphError, Plan, PlannedResource, ResourceDeclaration, Stack, Urn,
};
use std::collections::HashMap;

const DEFAULT_REGION: &str = "us-east-1";
/// Account id placeholder used in preview ARNs.
const PREVIEW_ACCOUNT: &str = "000000000000";

pub struct PreviewEngine {
    region: String,
}

impl PreviewEngine {
    pub fn new() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
        }
    }

    pub fn with_region(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }

    fn placeholder_attributes(
        &self,
        declaration: &ResourceDeclaration,
    ) -> siteflow_graph::Result<Map<String, Value>> {
        let suffix = urn_suffix(&declaration.urn);
        let attributes = match declaration.resource_type.as_str() {
            BUCKET => {
                let id = format!("{}-{suffix}", declaration.name);
                json!({
                    "id": id,
                    "arn": format!("arn:aws:s3:::{id}"),
                    "bucket": id,
                    "bucketRegionalDomainName":
                        format!("{id}.s3.{}.amazonaws.com", self.region),
                    "websiteEndpoint":
                        format!("{id}.s3-website-{}.amazonaws.com", self.region),
                })
            }
            BUCKET_PUBLIC_ACCESS_BLOCK | BUCKET_POLICY => {
                json!({ "id": format!("{}-{suffix}", declaration.name) })
            }
            ORIGIN_ACCESS_CONTROL => {
                json!({ "id": format!("OAC{}", suffix.to_uppercase()) })
            }
            DISTRIBUTION => {
                let id = format!("E{}", suffix.to_uppercase());
                json!({
                    "id": id,
                    "arn": format!("arn:aws:cloudfront::{PREVIEW_ACCOUNT}:distribution/{id}"),
                    "domainName": format!("{suffix}.cloudfront.net"),
                })
            }
            STATIC_WEBSITE => json!({}),
            other => return Err(GraphError::UnsupportedResourceType(other.to_string())),
        };
        match attributes {
            Value::Object(map) => Ok(map),
            // json! above only builds objects
            _ => Ok(Map::new()),
        }
    }
}

impl Default for PreviewEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for PreviewEngine {
    fn name(&self) -> &str {
        "preview"
    }

    async fn preview(&self, stack: &Stack) -> siteflow_graph::Result<Plan> {
        let declarations = stack.declarations();
        let graph = DependencyGraph::build(&declarations)?;
        let order = graph.creation_order()?;

        let by_urn: HashMap<&Urn, &ResourceDeclaration> =
            declarations.iter().map(|d| (&d.urn, d)).collect();

        let mut planned = Vec::with_capacity(order.len());
        for urn in &order {
            let declaration = by_urn
                .get(urn)
                .ok_or_else(|| GraphError::UnknownResource(urn.to_string()))?;
            let attributes = self.placeholder_attributes(declaration)?;
            stack.resolve_resource(urn, &attributes)?;
            planned.push(PlannedResource::from_declaration(
                declaration,
                declaration.resource_type == STATIC_WEBSITE,
            ));
        }

        tracing::debug!("Preview resolved {} resources", planned.len());
        Ok(Plan::new(planned))
    }
}

/// Deterministic per-urn suffix (FNV-1a over the urn text).
fn urn_suffix(urn: &Urn) -> String {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = FNV_OFFSET;
    for byte in urn.as_str().bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    let hex = format!("{hash:016x}");
    hex[..7].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyDocument;
    use crate::website::{StaticWebsite, StaticWebsiteArgs};
    use siteflow_graph::{AttributeResolver, Scope};
    use std::sync::Arc;

    fn program() -> (Arc<Stack>, StaticWebsite) {
        let stack = Arc::new(Stack::new("my-website", "dev"));
        let scope = Scope::root(Arc::clone(&stack));
        let website =
            StaticWebsite::new(&scope, "my-website", StaticWebsiteArgs::default()).unwrap();
        (stack, website)
    }

    #[tokio::test]
    async fn test_preview_resolves_component_outputs() {
        let (stack, website) = program();
        let plan = PreviewEngine::new().preview(&stack).await.unwrap();

        assert_eq!(plan.resources.len(), 6);
        assert_eq!(plan.summary().create, 5);
        assert_eq!(plan.summary().components, 1);

        let bucket_name = website.bucket_name.try_get().unwrap();
        assert!(bucket_name.starts_with("my-website-"));

        let cdn_url = website.cdn_url.try_get().unwrap();
        assert!(cdn_url.ends_with(".cloudfront.net"));

        let cdn_id = website.cdn_id.try_get().unwrap();
        assert!(cdn_id.starts_with('E'));
    }

    #[tokio::test]
    async fn test_preview_resolves_policy_document() {
        let (stack, website) = program();
        PreviewEngine::new().preview(&stack).await.unwrap();

        let bucket_id = website.bucket.id.try_get().unwrap();
        let distribution_arn = website.cdn.arn.try_get().unwrap();

        let json = website.bucket_policy.policy.try_get().unwrap();
        let document = PolicyDocument::from_json(&json).unwrap();
        assert_eq!(document.statement.len(), 1);
        assert_eq!(
            document.statement[0].resource,
            format!("arn:aws:s3:::{bucket_id}/*")
        );
        assert_eq!(
            document.statement[0].condition.string_equals.aws_source_arn,
            distribution_arn
        );
    }

    #[tokio::test]
    async fn test_preview_is_deterministic() {
        let run = || async {
            let (stack, website) = program();
            PreviewEngine::new().preview(&stack).await.unwrap();
            (
                website.bucket_name.try_get().unwrap(),
                website.cdn_id.try_get().unwrap(),
                website.cdn_url.try_get().unwrap(),
            )
        };
        assert_eq!(run().await, run().await);
    }

    #[tokio::test]
    async fn test_preview_uses_configured_region() {
        let (stack, website) = program();
        PreviewEngine::with_region("ap-northeast-1")
            .preview(&stack)
            .await
            .unwrap();

        let domain = website.bucket.bucket_regional_domain_name.try_get().unwrap();
        assert!(domain.ends_with(".s3.ap-northeast-1.amazonaws.com"));
    }

    #[tokio::test]
    async fn test_unknown_resource_kind_is_rejected() {
        let stack = Arc::new(Stack::new("site", "dev"));
        let scope = Scope::root(Arc::clone(&stack));
        let urn = scope.urn("aws:dynamodb:table", "t");
        let resolver: AttributeResolver =
            Box::new(|_attributes: &Map<String, Value>| Ok(()));
        scope
            .register(
                siteflow_graph::ResourceDeclaration::new(urn, "aws:dynamodb:table", "t"),
                resolver,
            )
            .unwrap();

        let result = PreviewEngine::new().preview(&stack).await;
        assert!(matches!(
            result,
            Err(GraphError::UnsupportedResourceType(_))
        ));
    }
}

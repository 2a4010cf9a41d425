//! CloudFront resource declarations: origin access control, distribution

use crate::error::Result;
use serde::Serialize;
use serde_json::{Map, Value};
use siteflow_graph::{
    AttributeResolver, Output, ResourceDeclaration, Scope, Urn, require_string_attribute,
};
use std::collections::BTreeMap;

pub const ORIGIN_ACCESS_CONTROL: &str = "aws:cloudfront:origin-access-control";
pub const DISTRIBUTION: &str = "aws:cloudfront:distribution";

/// Managed "CachingOptimized" cache policy.
pub const CACHING_OPTIMIZED_POLICY_ID: &str = "658327ea-f89d-4fab-a63d-7e88639e58f6";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginAccessControlArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub origin_access_control_origin_type: String,
    pub signing_behavior: String,
    pub signing_protocol: String,
}

impl Default for OriginAccessControlArgs {
    fn default() -> Self {
        Self {
            description: None,
            origin_access_control_origin_type: "s3".to_string(),
            signing_behavior: "always".to_string(),
            signing_protocol: "sigv4".to_string(),
        }
    }
}

/// A declared origin access control identity.
#[derive(Debug, Clone)]
pub struct OriginAccessControl {
    urn: Urn,
    pub id: Output<String>,
}

impl OriginAccessControl {
    pub fn new(scope: &Scope, name: &str, args: OriginAccessControlArgs) -> Result<Self> {
        let urn = scope.urn(ORIGIN_ACCESS_CONTROL, name);
        let id = Output::pending_for(&urn);

        let declaration = ResourceDeclaration::new(urn.clone(), ORIGIN_ACCESS_CONTROL, name)
            .with_attributes(serde_json::to_value(&args)?);

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

/// One origin of a distribution. The origin id used here must match the
/// cache behavior's target origin id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Origin {
    pub origin_id: Output<String>,
    pub domain_name: Output<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_access_control_id: Option<Output<String>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheBehavior {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_policy_id: Option<String>,
    pub compress: bool,
    pub target_origin_id: Output<String>,
    pub viewer_protocol_policy: String,
    pub allowed_methods: Vec<String>,
    pub cached_methods: Vec<String>,
    pub min_ttl: i64,
    pub default_ttl: i64,
    pub max_ttl: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoRestriction {
    pub restriction_type: String,
}

impl GeoRestriction {
    pub fn none() -> Self {
        Self {
            restriction_type: "none".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Restrictions {
    pub geo_restriction: GeoRestriction,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerCertificate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acm_certificate_arn: Option<String>,
    pub cloudfront_default_certificate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_support_method: Option<String>,
}

impl ViewerCertificate {
    /// TLS terminated with the provider's shared certificate.
    pub fn default_certificate() -> Self {
        Self {
            acm_certificate_arn: None,
            cloudfront_default_certificate: true,
            ssl_support_method: None,
        }
    }

    /// TLS terminated with a custom ACM certificate over SNI.
    pub fn acm(certificate_arn: impl Into<String>) -> Self {
        Self {
            acm_certificate_arn: Some(certificate_arn.into()),
            cloudfront_default_certificate: false,
            ssl_support_method: Some("sni-only".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionArgs {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_root_object: Option<String>,
    pub origins: Vec<Origin>,
    pub default_cache_behavior: CacheBehavior,
    pub restrictions: Restrictions,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    pub viewer_certificate: ViewerCertificate,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

/// A declared content-delivery distribution.
#[derive(Debug, Clone)]
pub struct Distribution {
    urn: Urn,
    pub id: Output<String>,
    pub arn: Output<String>,
    pub domain_name: Output<String>,
}

impl Distribution {
    pub fn new(scope: &Scope, name: &str, args: DistributionArgs) -> Result<Self> {
        let urn = scope.urn(DISTRIBUTION, name);
        let id = Output::pending_for(&urn);
        let arn = Output::pending_for(&urn);
        let domain_name = Output::pending_for(&urn);

        let mut dependencies = Vec::new();
        for origin in &args.origins {
            dependencies.extend(origin.origin_id.dependencies().iter().cloned());
            dependencies.extend(origin.domain_name.dependencies().iter().cloned());
            if let Some(oac) = &origin.origin_access_control_id {
                dependencies.extend(oac.dependencies().iter().cloned());
            }
        }
        dependencies.extend(
            args.default_cache_behavior
                .target_origin_id
                .dependencies()
                .iter()
                .cloned(),
        );

        let declaration = ResourceDeclaration::new(urn.clone(), DISTRIBUTION, name)
            .with_attributes(serde_json::to_value(&args)?)
            .with_dependencies(dependencies);

        let resolver: AttributeResolver = {
            let id = id.clone();
            let arn = arn.clone();
            let domain_name = domain_name.clone();
            let urn = urn.clone();
            Box::new(move |attributes: &Map<String, Value>| {
                id.resolve(require_string_attribute(attributes, &urn, "id")?)?;
                arn.resolve(require_string_attribute(attributes, &urn, "arn")?)?;
                domain_name.resolve(require_string_attribute(attributes, &urn, "domainName")?)?;
                Ok(())
            })
        };
        scope.register(declaration, resolver)?;

        Ok(Self {
            urn,
            id,
            arn,
            domain_name,
        })
    }

    pub fn urn(&self) -> &Urn {
        &self.urn
    }
}

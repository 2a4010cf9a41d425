//! Parsed site configuration

use std::collections::BTreeMap;

/// Contents of a `site.kdl` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Project name; doubles as the component name.
    pub project: String,

    /// Stack name (dev, stg, prod, ...).
    pub stack: String,

    /// Region used for region-qualified placeholder values.
    pub region: String,

    pub website: WebsiteConfig,
}

/// The `website` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebsiteConfig {
    /// Serve under this domain (requires `acm-certificate-arn`).
    pub custom_domain: Option<String>,

    /// Certificate for the custom domain (requires `custom-domain`).
    pub acm_certificate_arn: Option<String>,

    /// Index document name; defaults to `index.html` downstream.
    pub index_document: Option<String>,

    /// Tags applied to taggable resources.
    pub tags: BTreeMap<String, String>,
}

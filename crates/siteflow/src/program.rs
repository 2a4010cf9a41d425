//! The stack program: configuration in, declared resource graph out

use anyhow::Context;
use siteflow_aws::{StaticWebsite, StaticWebsiteArgs};
use siteflow_config::SiteConfig;
use siteflow_graph::{Scope, Stack};
use std::path::PathBuf;
use std::sync::Arc;

pub struct Program {
    pub config: SiteConfig,
    pub stack: Arc<Stack>,
    pub website: StaticWebsite,
}

pub fn load_config(path: Option<PathBuf>) -> anyhow::Result<SiteConfig> {
    let path = match path {
        Some(path) => path,
        None => siteflow_config::find_site_file()?,
    };
    tracing::debug!("Loading site config from {}", path.display());
    siteflow_config::load(&path).with_context(|| format!("Failed to load {}", path.display()))
}

/// Declare the whole stack: one static-website component built from config,
/// with the classic outputs exported at stack level.
pub fn build(config: SiteConfig) -> anyhow::Result<Program> {
    let stack = Arc::new(Stack::new(config.project.clone(), config.stack.clone()));
    let scope = Scope::root(Arc::clone(&stack));

    let website = StaticWebsite::new(
        &scope,
        &config.project,
        StaticWebsiteArgs {
            tags: config.website.tags.clone(),
            custom_domain: config.website.custom_domain.clone(),
            acm_certificate_arn: config.website.acm_certificate_arn.clone(),
            index_document: config.website.index_document.clone(),
        },
    )?;

    stack.export("bucketName", website.bucket_name.clone());
    stack.export("bucketWebsiteUrl", website.bucket.website_endpoint.clone());
    stack.export("cdnId", website.cdn_id.clone());
    stack.export("cdnUrl", website.cdn_url.clone());

    Ok(Program {
        config,
        stack,
        website,
    })
}

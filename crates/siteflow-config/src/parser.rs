//! KDL parsing for site.kdl

use crate::error::{ConfigError, Result};
use crate::model::{SiteConfig, WebsiteConfig};
use crate::{DEFAULT_REGION, DEFAULT_STACK};
use kdl::{KdlDocument, KdlNode};

/// Parse a full site.kdl document. Exactly one `site` node is expected.
pub fn parse_site(document: &KdlDocument) -> Result<SiteConfig> {
    let site_node = document
        .nodes()
        .iter()
        .find(|node| node.name().value() == "site")
        .ok_or_else(|| ConfigError::MissingValue("site".to_string()))?;
    parse_site_node(site_node)
}

fn parse_site_node(node: &KdlNode) -> Result<SiteConfig> {
    let project = node
        .entries()
        .first()
        .and_then(|entry| entry.value().as_string())
        .ok_or_else(|| ConfigError::MissingValue("site requires a project name".to_string()))?
        .to_string();

    let mut config = SiteConfig {
        project,
        stack: DEFAULT_STACK.to_string(),
        region: DEFAULT_REGION.to_string(),
        website: WebsiteConfig::default(),
    };

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "stack" => {
                    if let Some(value) = first_string(child) {
                        config.stack = value;
                    }
                }
                "region" => {
                    if let Some(value) = first_string(child) {
                        config.region = value;
                    }
                }
                "website" => {
                    config.website = parse_website(child);
                }
                _ => {}
            }
        }
    }

    Ok(config)
}

fn parse_website(node: &KdlNode) -> WebsiteConfig {
    let mut website = WebsiteConfig::default();

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "custom_domain" | "custom-domain" => {
                    website.custom_domain = first_string(child);
                }
                "acm_certificate_arn" | "acm-certificate-arn" => {
                    website.acm_certificate_arn = first_string(child);
                }
                "index_document" | "index-document" => {
                    website.index_document = first_string(child);
                }
                "tags" => {
                    if let Some(tag_children) = child.children() {
                        for tag in tag_children.nodes() {
                            if let Some(value) = first_string(tag) {
                                website.tags.insert(tag.name().value().to_string(), value);
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }

    website
}

fn first_string(node: &KdlNode) -> Option<String> {
    node.entries()
        .first()
        .and_then(|entry| entry.value().as_string())
        .map(|value| value.to_string())
}

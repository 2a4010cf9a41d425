//! Plan types for previewing a declaration set

use crate::resource::{ResourceDeclaration, Urn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A resource as the provisioning engine would create it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedResource {
    pub urn: Urn,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parent: Option<Urn>,
    pub attributes: serde_json::Value,
    /// Grouping resources are listed but carry nothing to create.
    #[serde(default)]
    pub component: bool,
}

impl PlannedResource {
    pub fn from_declaration(declaration: &ResourceDeclaration, component: bool) -> Self {
        Self {
            urn: declaration.urn.clone(),
            resource_type: declaration.resource_type.clone(),
            name: declaration.name.clone(),
            parent: declaration.parent.clone(),
            attributes: declaration.attributes.clone(),
            component,
        }
    }
}

/// Creation preview in dependency order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub resources: Vec<PlannedResource>,
}

impl Plan {
    pub fn new(resources: Vec<PlannedResource>) -> Self {
        Self { resources }
    }

    pub fn empty() -> Self {
        Self {
            resources: Vec::new(),
        }
    }

    pub fn has_changes(&self) -> bool {
        self.resources.iter().any(|resource| !resource.component)
    }

    pub fn summary(&self) -> PlanSummary {
        let components = self
            .resources
            .iter()
            .filter(|resource| resource.component)
            .count();
        PlanSummary {
            create: self.resources.len() - components,
            components,
        }
    }
}

/// Summary of a creation preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSummary {
    pub create: usize,
    pub components: usize,
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} resources to create, {} components",
            self.create, self.components
        )
    }
}

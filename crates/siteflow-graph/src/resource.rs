//! Resource identity and declarations

use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Stable logical identifier for a declared resource.
///
/// Format: `urn:<stack>::<project>::<type>::<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Urn(String);

impl Urn {
    pub fn new(stack: &str, project: &str, resource_type: &str, name: &str) -> Self {
        Self(format!("urn:{stack}::{project}::{resource_type}::{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single declared resource: what kind it is, who owns it, what it
/// references, and a snapshot of its declared attributes.
///
/// Attribute keys use the provider API's camelCase naming. Attributes that
/// come from still-pending outputs serialize as the `"<computed>"` sentinel,
/// so identical inputs always produce identical snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDeclaration {
    pub urn: Urn,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    /// Owner of this resource, if it was declared inside a component scope.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parent: Option<Urn>,
    /// Resources whose outputs this declaration consumes.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub depends_on: Vec<Urn>,
    pub attributes: Value,
}

impl ResourceDeclaration {
    pub fn new(urn: Urn, resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            urn,
            resource_type: resource_type.into(),
            name: name.into(),
            parent: None,
            depends_on: Vec::new(),
            attributes: Value::Object(Map::new()),
        }
    }

    pub fn with_parent(mut self, parent: Option<Urn>) -> Self {
        self.parent = parent;
        self
    }

    pub fn with_attributes(mut self, attributes: Value) -> Self {
        self.attributes = attributes;
        self
    }

    /// Record reference edges, deduplicated, self-references ignored.
    pub fn with_dependencies(mut self, dependencies: Vec<Urn>) -> Self {
        for dependency in dependencies {
            self.add_dependency(dependency);
        }
        self
    }

    pub fn add_dependency(&mut self, dependency: Urn) {
        if dependency != self.urn && !self.depends_on.contains(&dependency) {
            self.depends_on.push(dependency);
        }
    }
}

/// Read a required string attribute out of a resolved attribute map.
pub fn require_string_attribute(
    attributes: &Map<String, Value>,
    urn: &Urn,
    key: &str,
) -> Result<String> {
    attributes
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| GraphError::MissingAttribute {
            urn: urn.to_string(),
            attribute: key.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urn_format() {
        let urn = Urn::new("prod", "my-website", "aws:s3:bucket", "my-website");
        assert_eq!(
            urn.as_str(),
            "urn:prod::my-website::aws:s3:bucket::my-website"
        );
    }

    #[test]
    fn test_dependencies_dedup_and_skip_self() {
        let urn = Urn::new("dev", "site", "aws:s3:bucket-policy", "p");
        let bucket = Urn::new("dev", "site", "aws:s3:bucket", "b");

        let declaration = ResourceDeclaration::new(urn.clone(), "aws:s3:bucket-policy", "p")
            .with_dependencies(vec![bucket.clone(), bucket.clone(), urn]);

        assert_eq!(declaration.depends_on, vec![bucket]);
    }

    #[test]
    fn test_serialization_shape() {
        let urn = Urn::new("dev", "site", "aws:s3:bucket", "b");
        let declaration = ResourceDeclaration::new(urn, "aws:s3:bucket", "b")
            .with_attributes(serde_json::json!({ "bucket": "b" }));

        let value = serde_json::to_value(&declaration).unwrap();
        assert_eq!(value["type"], "aws:s3:bucket");
        assert_eq!(value["attributes"]["bucket"], "b");
        // empty optional fields stay out of the snapshot
        assert!(value.get("parent").is_none());
        assert!(value.get("dependsOn").is_none());
    }

    #[test]
    fn test_require_string_attribute() {
        let urn = Urn::new("dev", "site", "aws:s3:bucket", "b");
        let mut attributes = Map::new();
        attributes.insert("id".to_string(), Value::String("b-1234567".to_string()));

        assert_eq!(
            require_string_attribute(&attributes, &urn, "id").unwrap(),
            "b-1234567"
        );
        assert!(matches!(
            require_string_attribute(&attributes, &urn, "arn"),
            Err(GraphError::MissingAttribute { .. })
        ));
    }
}

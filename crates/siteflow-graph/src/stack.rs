//! Stack registration context
//!
//! A `Stack` is the in-memory registry every declaration goes through. It
//! rejects duplicate urns, keeps registration order (which makes snapshots
//! deterministic), and holds one single-shot resolver per resource so that
//! whatever consumes the declaration set — an external provisioning engine
//! or the built-in preview — can resolve the typed outputs exactly once.

use crate::error::{GraphError, Result};
use crate::output::Output;
use crate::resource::{ResourceDeclaration, Urn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// Resolver invoked once a resource's real (or placeholder) attributes are
/// known. Consumed on first use.
pub type AttributeResolver = Box<dyn FnOnce(&Map<String, Value>) -> Result<()> + Send>;

#[derive(Default)]
struct StackInner {
    resources: Vec<ResourceDeclaration>,
    urns: HashSet<Urn>,
    resolvers: HashMap<Urn, AttributeResolver>,
    exports: BTreeMap<String, Output<String>>,
    component_outputs: BTreeMap<Urn, BTreeMap<String, Output<String>>>,
}

/// Registration context for one deployment of one project.
pub struct Stack {
    project: String,
    name: String,
    inner: Mutex<StackInner>,
}

impl Stack {
    pub fn new(project: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            name: name.into(),
            inner: Mutex::new(StackInner::default()),
        }
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The urn a resource of this type and name gets in this stack.
    pub fn urn(&self, resource_type: &str, name: &str) -> Urn {
        Urn::new(&self.name, &self.project, resource_type, name)
    }

    /// Register a declaration together with its output resolver.
    ///
    /// Every urn the declaration references (parent or dependency) must
    /// already be registered; value references can only point backwards.
    pub fn register(
        &self,
        declaration: ResourceDeclaration,
        resolver: AttributeResolver,
    ) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.urns.contains(&declaration.urn) {
            return Err(GraphError::DuplicateUrn(declaration.urn.to_string()));
        }
        if let Some(parent) = &declaration.parent {
            if !inner.urns.contains(parent) {
                return Err(GraphError::UnknownDependency(parent.to_string()));
            }
        }
        for dependency in &declaration.depends_on {
            if !inner.urns.contains(dependency) {
                return Err(GraphError::UnknownDependency(dependency.to_string()));
            }
        }

        tracing::debug!(
            "Registered {} ({})",
            declaration.urn,
            declaration.resource_type
        );
        inner.urns.insert(declaration.urn.clone());
        inner.resolvers.insert(declaration.urn.clone(), resolver);
        inner.resources.push(declaration);
        Ok(())
    }

    /// Hand a resource its attributes, resolving its declared outputs.
    /// At most once per resource.
    pub fn resolve_resource(&self, urn: &Urn, attributes: &Map<String, Value>) -> Result<()> {
        let resolver = {
            let mut inner = self.inner.lock();
            if !inner.urns.contains(urn) {
                return Err(GraphError::UnknownResource(urn.to_string()));
            }
            inner
                .resolvers
                .remove(urn)
                .ok_or_else(|| GraphError::ResourceAlreadyResolved(urn.to_string()))?
        };
        // run outside the lock: resolving outputs fires derived callbacks
        resolver(attributes)
    }

    /// Export a stack-level output under a stable name.
    pub fn export(&self, name: impl Into<String>, output: Output<String>) {
        let name = name.into();
        tracing::debug!("Exported stack output '{}'", name);
        self.inner.lock().exports.insert(name, output);
    }

    /// Stack-level outputs in name order.
    pub fn exports(&self) -> Vec<(String, Output<String>)> {
        self.inner
            .lock()
            .exports
            .iter()
            .map(|(name, output)| (name.clone(), output.clone()))
            .collect()
    }

    pub(crate) fn set_component_outputs(
        &self,
        urn: &Urn,
        outputs: BTreeMap<String, Output<String>>,
    ) {
        self.inner
            .lock()
            .component_outputs
            .insert(urn.clone(), outputs);
    }

    /// Outputs a component registered for itself, if any.
    pub fn component_outputs(&self, urn: &Urn) -> Option<BTreeMap<String, Output<String>>> {
        self.inner.lock().component_outputs.get(urn).cloned()
    }

    /// Declarations in registration order.
    pub fn declarations(&self) -> Vec<ResourceDeclaration> {
        self.inner.lock().resources.clone()
    }

    /// The exportable form of this stack.
    pub fn snapshot(&self) -> DeclarationSet {
        DeclarationSet {
            project: self.project.clone(),
            stack: self.name.clone(),
            resources: self.declarations(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("project", &self.project)
            .field("name", &self.name)
            .field("resources", &self.len())
            .finish()
    }
}

/// The serialized artifact a provisioning engine consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclarationSet {
    pub project: String,
    pub stack: String,
    pub resources: Vec<ResourceDeclaration>,
}

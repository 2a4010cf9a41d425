//! Component resources
//!
//! A component is a resource that exists to own other resources: it carries
//! no provider attributes of its own, but every child declared through its
//! scope records the component's urn as parent. The owner id is an explicit
//! field threaded through each declaration, which keeps lifecycle grouping
//! visible in the exported set instead of hidden in an inheritance chain.

use crate::error::Result;
use crate::output::Output;
use crate::resource::{ResourceDeclaration, Urn};
use crate::stack::{AttributeResolver, Stack};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Where a declaration lands: which stack, and which resource owns it.
#[derive(Clone)]
pub struct Scope {
    stack: Arc<Stack>,
    parent: Option<Urn>,
}

impl Scope {
    /// The top-level scope: declarations have no owner.
    pub fn root(stack: Arc<Stack>) -> Self {
        Self {
            stack,
            parent: None,
        }
    }

    pub fn stack(&self) -> &Arc<Stack> {
        &self.stack
    }

    pub fn parent(&self) -> Option<&Urn> {
        self.parent.as_ref()
    }

    pub fn urn(&self, resource_type: &str, name: &str) -> Urn {
        self.stack.urn(resource_type, name)
    }

    /// Register a declaration in this scope, attaching the owner urn.
    pub fn register(
        &self,
        declaration: ResourceDeclaration,
        resolver: AttributeResolver,
    ) -> Result<()> {
        self.stack
            .register(declaration.with_parent(self.parent.clone()), resolver)
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("stack", &self.stack.name())
            .field("parent", &self.parent)
            .finish()
    }
}

/// A grouping resource; children are declared through [`Component::scope`].
pub struct Component {
    urn: Urn,
    scope: Scope,
}

impl Component {
    pub fn new(scope: &Scope, resource_type: &str, name: &str) -> Result<Self> {
        let urn = scope.urn(resource_type, name);
        let resolver: AttributeResolver = Box::new(|_attributes: &Map<String, Value>| Ok(()));
        scope.register(
            ResourceDeclaration::new(urn.clone(), resource_type, name),
            resolver,
        )?;

        Ok(Self {
            scope: Scope {
                stack: Arc::clone(scope.stack()),
                parent: Some(urn.clone()),
            },
            urn,
        })
    }

    pub fn urn(&self) -> &Urn {
        &self.urn
    }

    /// The scope children of this component declare into.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Record the component's derived outputs on the stack.
    pub fn register_outputs(&self, outputs: BTreeMap<String, Output<String>>) {
        self.scope.stack().set_component_outputs(&self.urn, outputs);
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component").field("urn", &self.urn).finish()
    }
}

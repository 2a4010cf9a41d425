//! Dependency graph over declared resources
//!
//! Edges come from value references (`depends_on`) and ownership (`parent`).
//! The graph exists so a consumer can order creation: every referenced
//! resource comes before its dependents.

use crate::error::{GraphError, Result};
use crate::resource::{ResourceDeclaration, Urn};
use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

pub struct DependencyGraph {
    graph: DiGraph<Urn, ()>,
    indices: HashMap<Urn, NodeIndex>,
}

impl DependencyGraph {
    pub fn build(declarations: &[ResourceDeclaration]) -> Result<Self> {
        let mut graph = DiGraph::new();
        let mut indices = HashMap::new();

        for declaration in declarations {
            let index = graph.add_node(declaration.urn.clone());
            if indices.insert(declaration.urn.clone(), index).is_some() {
                return Err(GraphError::DuplicateUrn(declaration.urn.to_string()));
            }
        }

        for declaration in declarations {
            let to = indices[&declaration.urn];
            for reference in declaration.depends_on.iter().chain(declaration.parent.iter()) {
                let from = *indices
                    .get(reference)
                    .ok_or_else(|| GraphError::UnknownDependency(reference.to_string()))?;
                graph.add_edge(from, to, ());
            }
        }

        Ok(Self { graph, indices })
    }

    /// A deterministic order in which every resource comes after everything
    /// it references.
    pub fn creation_order(&self) -> Result<Vec<Urn>> {
        toposort(&self.graph, None)
            .map(|order| order.into_iter().map(|index| self.graph[index].clone()).collect())
            .map_err(|cycle| GraphError::DependencyCycle(self.graph[cycle.node_id()].to_string()))
    }

    /// Direct dependencies of a resource (references plus owner).
    pub fn dependencies_of(&self, urn: &Urn) -> Vec<Urn> {
        match self.indices.get(urn) {
            Some(index) => self
                .graph
                .neighbors_directed(*index, Direction::Incoming)
                .map(|neighbor| self.graph[neighbor].clone())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}

//! Siteflow declaration framework
//!
//! This crate is the engine-agnostic half of siteflow: typed resource
//! declarations, deferred outputs, and the dependency graph connecting them.
//! It performs no provisioning itself — a declaration set is data handed to
//! an engine.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │                 siteflow CLI                   │
//! │          (preview / export / validate)         │
//! └───────────────────┬────────────────────────────┘
//!                     │
//! ┌───────────────────▼────────────────────────────┐
//! │               siteflow-graph                   │
//! │  ┌──────────────┐  ┌─────────────────────────┐ │
//! │  │ Stack/Scope  │  │ Output<T> (deferred,    │ │
//! │  │ registration │  │ map / join2, resolve-   │ │
//! │  │ + components │  │ once)                   │ │
//! │  └──────────────┘  └─────────────────────────┘ │
//! │  ┌──────────────┐  ┌─────────────────────────┐ │
//! │  │ Dependency   │  │ trait Engine { ... }    │ │
//! │  │ graph (topo) │  │                         │ │
//! │  └──────────────┘  └─────────────────────────┘ │
//! └───────┬────────────────────────────────────────┘
//!         │
//! ┌───────▼───────┐
//! │  siteflow-aws │  resource kinds + preview engine
//! └───────────────┘
//! ```

pub mod component;
pub mod engine;
pub mod error;
pub mod graph;
pub mod output;
pub mod plan;
pub mod resource;
pub mod stack;

// Re-exports
pub use component::{Component, Scope};
pub use engine::Engine;
pub use error::{GraphError, Result};
pub use graph::DependencyGraph;
pub use output::{COMPUTED, Output};
pub use plan::{Plan, PlanSummary, PlannedResource};
pub use resource::{ResourceDeclaration, Urn, require_string_attribute};
pub use stack::{AttributeResolver, DeclarationSet, Stack};

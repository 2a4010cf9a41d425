//! The seam between declarations and whatever provisions them

use crate::error::Result;
use crate::plan::Plan;
use crate::stack::Stack;
use async_trait::async_trait;

/// A consumer of declaration sets.
///
/// Real provisioning engines (diffing, API orchestration, retries) live
/// outside this repository; the only implementation shipped here is the
/// network-free preview engine.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Engine name (e.g. "preview")
    fn name(&self) -> &str;

    /// Resolve the stack's outputs and produce a creation plan without
    /// touching real infrastructure.
    async fn preview(&self, stack: &Stack) -> Result<Plan>;
}

//! Provider wrappers exposing the edit engine to a tool dispatcher
//!
//! Built-in implementations speak JSON over a uniform async trait so an
//! outer dispatcher can invoke them interchangeably with external
//! providers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::edit::{ApplyDiffInput, EditEngine, SearchReplaceInput};
use crate::error::ToolError;
use crate::source::FileSource;

/// Uniform async boundary for tool implementations
#[async_trait]
pub trait Provider: Send + Sync {
    async fn execute(&self, input: &str) -> Result<String, ToolError>;
}

/// Built-in provider for bounded search-and-replace edits
pub struct SearchReplaceProvider<S> {
    engine: Arc<EditEngine<S>>,
}

impl<S> SearchReplaceProvider<S> {
    pub fn new(engine: Arc<EditEngine<S>>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl<S: FileSource + 'static> Provider for SearchReplaceProvider<S> {
    async fn execute(&self, input: &str) -> Result<String, ToolError> {
        debug!("Executing search/replace with built-in provider");
        let request: SearchReplaceInput = serde_json::from_str(input)?;
        let outcome = self.engine.search_replace(&request)?;
        Ok(serde_json::to_string(&outcome)?)
    }
}

/// Built-in provider for SEARCH/REPLACE block application
pub struct ApplyDiffProvider<S> {
    engine: Arc<EditEngine<S>>,
}

impl<S> ApplyDiffProvider<S> {
    pub fn new(engine: Arc<EditEngine<S>>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl<S: FileSource + 'static> Provider for ApplyDiffProvider<S> {
    async fn execute(&self, input: &str) -> Result<String, ToolError> {
        debug!("Executing diff application with built-in provider");
        let request: ApplyDiffInput = serde_json::from_str(input)?;
        let outcome = self.engine.apply_diff(&request)?;
        Ok(serde_json::to_string(&outcome)?)
    }
}

/// Run a provider with a wall-clock timeout.
pub async fn execute_with_timeout(
    provider: &dyn Provider,
    input: &str,
    timeout: Duration,
) -> Result<String, ToolError> {
    tokio::time::timeout(timeout, provider.execute(input))
        .await
        .map_err(|_| ToolError::Timeout(timeout))?
}

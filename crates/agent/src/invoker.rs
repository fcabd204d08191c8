//! Tool invocation — registry lookup, execution, and flattening to text.

use std::sync::Arc;
use std::time::Instant;

use stepwise_core::error::ToolError;
use stepwise_core::reply::Observation;
use stepwise_core::session::SessionContext;
use stepwise_core::tool::{ToolDefinition, ToolRegistry};
use tracing::{debug, warn};

/// Runs tool calls requested by the model.
///
/// `invoke` never fails: unknown tools, invalid input and execution
/// errors all come back as observation text the model can react to.
pub struct ToolInvoker {
    registry: Arc<ToolRegistry>,
}

impl ToolInvoker {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registry.get(name).is_some()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.registry.definitions()
    }

    pub async fn invoke(
        &self,
        name: &str,
        input: serde_json::Value,
        session: &mut SessionContext,
    ) -> Observation {
        let Some(tool) = self.registry.get(name) else {
            warn!(tool = %name, "Model requested an unknown tool");
            return Observation::new(ToolError::NotFound(name.to_string()).to_string());
        };

        let start = Instant::now();
        let result = tool.execute(input, session).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(result) => {
                debug!(
                    tool = %name,
                    success = result.success,
                    duration_ms,
                    "Tool executed"
                );
                Observation::new(result.output)
            }
            Err(e) => {
                warn!(tool = %name, error = %e, duration_ms, "Tool execution failed");
                Observation::new(format!("Error: {e}"))
            }
        }
    }
}

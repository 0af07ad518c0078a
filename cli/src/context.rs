use report_view_core::{ContractConfig, MemoryDom, ViewToggleController};
use std::sync::Arc;
use tokio::sync::RwLock;

pub type Controller = ViewToggleController<MemoryDom>;

/// Holds all shared state for the CLI application.
/// This is a lightweight container - logic lives in the controller.
#[derive(Clone, Default)]
pub struct CliContext {
    pub config: Arc<RwLock<ContractConfig>>,
    /// The bound report. None until a layout is loaded.
    controller: Arc<RwLock<Option<Controller>>>,
}

impl CliContext {
    pub fn new(config: ContractConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            controller: Arc::new(RwLock::new(None)),
        }
    }

    /// Replace the bound report
    pub async fn set_controller(&self, controller: Controller) {
        *self.controller.write().await = Some(controller);
    }

    /// Run `f` against the bound report, or fail if none is loaded
    pub async fn with_controller<T>(
        &self,
        f: impl FnOnce(&mut Controller) -> Result<T, String>,
    ) -> Result<T, String> {
        let mut guard = self.controller.write().await;
        let controller = guard.as_mut().ok_or("error: no report loaded (use `load`)")?;
        f(controller)
    }

    pub async fn is_loaded(&self) -> bool {
        self.controller.read().await.is_some()
    }
}

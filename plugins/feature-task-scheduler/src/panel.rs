use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use persona_core::service::Store;
use persona_core::shell::{Panel, PanelContext, PanelError, PanelWrapper, Utility};

use crate::actions::TaskScheduler;
use crate::state::{TaskState, reduce};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

fn page_index(params: &Value) -> u32 {
    params
        .get("pageIndex")
        .and_then(Value::as_u64)
        .and_then(|index| u32::try_from(index).ok())
        .unwrap_or(0)
}

/// Shows the scheduler status and the configured items. Init fetches both;
/// every later activation refreshes the status page named in `params`.
pub struct TaskSchedulerPanel {
    scheduler: TaskScheduler,
}

impl TaskSchedulerPanel {
    pub fn new(context: PanelContext) -> Self {
        let store = Arc::new(Store::new(TaskState::default(), reduce));
        Self {
            scheduler: TaskScheduler::new(context.utility.sf().clone(), store),
        }
    }

    pub fn scheduler(&self) -> &TaskScheduler {
        &self.scheduler
    }

    pub fn state(&self) -> TaskState {
        self.scheduler.store().state()
    }
}

#[async_trait]
impl Panel for TaskSchedulerPanel {
    async fn init(&self, wrapper: &PanelWrapper, _utility: &Utility, params: &Value) -> Result<(), PanelError> {
        let init_failed = |e: persona_core::service::ServiceError| PanelError::InitFailed {
            identifier: wrapper.identifier.clone(),
            message: e.to_string(),
        };
        self.scheduler
            .status(page_index(params), DEFAULT_PAGE_SIZE)
            .await
            .map_err(init_failed)?;
        self.scheduler.items(None).await.map_err(init_failed)?;
        log::debug!(
            "{} initialized with {} schedule item(s)",
            wrapper.identifier,
            self.state().schedule_items.len()
        );
        Ok(())
    }

    async fn load(&self, params: &Value) -> Result<(), PanelError> {
        self.scheduler
            .status(page_index(params), DEFAULT_PAGE_SIZE)
            .await
            .map_err(|e| PanelError::LoadFailed {
                identifier: crate::IDENTIFIER.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}

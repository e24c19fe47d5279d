//! Action creators: each issues one TaskScheduler service call and folds
//! the response into the panel store.
use std::sync::Arc;

use serde_json::{Value, json};

use persona_core::service::{ApiResponse, FormValidator, ServiceCall, ServiceClient, ServiceError, Store};
use persona_core::service::{dispatch_call, dispatch_call_or};

use crate::forms;
use crate::state::{ScheduleItem, SchedulerSettings, TaskAction, TaskState};

pub const SERVICE_CONTROLLER: &str = "TaskScheduler";

pub type TaskStore = Store<TaskState, TaskAction>;

fn list(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Null => Vec::new(),
        other => vec![other.clone()],
    }
}

/// Modes arrive either as strings or as enum ordinals
fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn total(response: &ApiResponse, fallback: usize) -> u64 {
    response.total_results.unwrap_or(fallback as u64)
}

fn status_action(response: &ApiResponse) -> TaskAction {
    let processing = list(response.field("ScheduleProcessing"));
    let queue = list(response.field("ScheduleQueue"));
    TaskAction::RetrievedStatus {
        scheduling_enabled: response.field("SchedulingEnabled").as_bool().unwrap_or(false),
        status: response.field("Status").as_str().unwrap_or_default().to_string(),
        free_threads: response.field("FreeThreadCount").as_i64().unwrap_or(0),
        active_threads: response.field("ActiveThreadCount").as_i64().unwrap_or(0),
        max_threads: response.field("MaxThreadCount").as_i64().unwrap_or(0),
        total_count: total(response, queue.len()),
        processing,
        queue,
    }
}

fn items_action(response: &ApiResponse) -> TaskAction {
    match response.results_as::<Vec<ScheduleItem>>() {
        Ok(items) => TaskAction::RetrievedItems {
            total_count: total(response, items.len()),
            items,
        },
        Err(e) => TaskAction::Failed(e.to_string()),
    }
}

fn failed(error: &ServiceError) -> TaskAction {
    TaskAction::Failed(error.to_string())
}

/// Scheduler operations bound to one store
#[derive(Debug, Clone)]
pub struct TaskScheduler {
    client: ServiceClient,
    store: Arc<TaskStore>,
}

impl TaskScheduler {
    pub fn new(client: ServiceClient, store: Arc<TaskStore>) -> Self {
        Self { client, store }
    }

    pub fn store(&self) -> &Arc<TaskStore> {
        &self.store
    }

    fn get(&self, action: &str) -> ServiceCall {
        self.client.get(SERVICE_CONTROLLER, action)
    }

    fn post(&self, action: &str) -> ServiceCall {
        self.client.post(SERVICE_CONTROLLER, action)
    }

    /// Validate and submit a write; the outcome always reaches the store
    async fn write(
        &self,
        call: ServiceCall,
        validator: &FormValidator,
        to_action: impl FnOnce(&ApiResponse) -> TaskAction,
    ) -> Result<ApiResponse, ServiceError> {
        match self.client.submit(call, validator).await {
            Ok(response) => {
                self.store.dispatch(to_action(&response));
                Ok(response)
            }
            Err(e) => {
                self.store.dispatch(failed(&e));
                Err(e)
            }
        }
    }

    pub async fn status(&self, page_index: u32, page_size: u32) -> Result<ApiResponse, ServiceError> {
        let call = self
            .get("GetScheduleStatus")
            .param("pageIndex", page_index)
            .param("pageSize", page_size);
        dispatch_call_or(&self.client, &self.store, call, status_action, failed).await
    }

    pub async fn start_schedule(&self) -> Result<ApiResponse, ServiceError> {
        dispatch_call(&self.client, &self.store, self.post("StartSchedule"), |_| {
            TaskAction::StartedSchedule
        })
        .await
    }

    pub async fn stop_schedule(&self) -> Result<ApiResponse, ServiceError> {
        dispatch_call(&self.client, &self.store, self.post("StopSchedule"), |_| {
            TaskAction::StoppedSchedule
        })
        .await
    }

    pub async fn settings(&self) -> Result<ApiResponse, ServiceError> {
        dispatch_call(&self.client, &self.store, self.get("GetSchedulerSettings"), |response| {
            TaskAction::RetrievedSettings {
                mode_options: list(response.field("SchedulerModeOptions")),
                settings: SchedulerSettings {
                    scheduler_mode: text(response.field("SchedulerMode")),
                    scheduler_delay: response
                        .field("SchedulerdelayAtAppStart")
                        .as_i64()
                        .unwrap_or_default() as i32,
                },
            }
        })
        .await
    }

    /// The store keeps the submitted values; the server echoes nothing back
    pub async fn update_settings(&self, settings: &SchedulerSettings) -> Result<ApiResponse, ServiceError> {
        let call = self.post("UpdateSchedulerSettings").with_payload(settings)?;
        let submitted = settings.clone();
        self.write(call, &forms::settings_validator(), move |_| {
            TaskAction::UpdatedSettings(submitted)
        })
        .await
    }

    pub async fn history(&self, schedule_id: i32, page_index: u32, page_size: u32) -> Result<ApiResponse, ServiceError> {
        let call = self
            .get("GetScheduleItemHistory")
            .param("scheduleId", schedule_id)
            .param("pageIndex", page_index)
            .param("pageSize", page_size);
        dispatch_call(&self.client, &self.store, call, |response| {
            let entries = list(&response.results);
            TaskAction::RetrievedHistory {
                total_count: total(response, entries.len()),
                entries,
            }
        })
        .await
    }

    pub async fn items(&self, server_name: Option<&str>) -> Result<ApiResponse, ServiceError> {
        let mut call = self.get("GetScheduleItems");
        if let Some(server_name) = server_name {
            call = call.param("serverName", server_name);
        }
        dispatch_call_or(&self.client, &self.store, call, items_action, failed).await
    }

    pub async fn servers(&self) -> Result<ApiResponse, ServiceError> {
        dispatch_call(&self.client, &self.store, self.get("GetServers"), |response| {
            TaskAction::RetrievedServers(list(&response.results))
        })
        .await
    }

    pub async fn item(&self, schedule_id: i32) -> Result<ApiResponse, ServiceError> {
        let call = self.get("GetScheduleItem").param("scheduleId", schedule_id);
        dispatch_call_or(
            &self.client,
            &self.store,
            call,
            |response| match response.results_as::<ScheduleItem>() {
                Ok(item) => TaskAction::RetrievedItem(item),
                Err(e) => TaskAction::Failed(e.to_string()),
            },
            failed,
        )
        .await
    }

    /// Delete an item; the store drops it from the current list
    pub async fn delete_item(&self, schedule_id: i32) -> Result<ApiResponse, ServiceError> {
        let call = self.post("DeleteSchedule").param("ScheduleID", schedule_id);
        let remaining: Vec<ScheduleItem> = self
            .store
            .state()
            .schedule_items
            .into_iter()
            .filter(|item| item.schedule_id != schedule_id)
            .collect();
        dispatch_call(&self.client, &self.store, call, move |_| TaskAction::DeletedItem(remaining)).await
    }

    pub async fn create_item(&self, item: &ScheduleItem) -> Result<ApiResponse, ServiceError> {
        let call = self.post("CreateScheduleItem").with_payload(item)?;
        self.write(call, &forms::schedule_item_validator(), |response| TaskAction::CreatedItem {
            success: response.success,
        })
        .await
    }

    pub async fn update_item(&self, item: &ScheduleItem) -> Result<ApiResponse, ServiceError> {
        let call = self.post("UpdateScheduleItem").with_payload(item)?;
        self.write(call, &forms::schedule_item_validator(), |response| TaskAction::UpdatedItem {
            success: response.success,
        })
        .await
    }

    pub async fn run_item(&self, schedule_id: i32) -> Result<ApiResponse, ServiceError> {
        let call = self
            .post("RunSchedule")
            .with_payload(&json!({ "ScheduleID": schedule_id }))?;
        dispatch_call_or(
            &self.client,
            &self.store,
            call,
            |response| TaskAction::ExecutedItem {
                success: response.success,
            },
            failed,
        )
        .await
    }
}

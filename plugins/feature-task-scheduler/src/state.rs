use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A scheduled task as the TaskScheduler controller exchanges it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ScheduleItem {
    #[serde(rename = "ScheduleID")]
    pub schedule_id: i32,
    pub friendly_name: String,
    pub type_full_name: String,
    pub enabled: bool,
    pub time_lapse: i32,
    pub time_lapse_measurement: String,
    pub retry_time_lapse: i32,
    pub retry_time_lapse_measurement: String,
    pub retain_history_num: i32,
    pub attach_to_event: String,
    pub catch_up_enabled: bool,
    pub object_dependencies: String,
    pub servers: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_start_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SchedulerSettings {
    pub scheduler_mode: String,
    #[serde(rename = "SchedulerdelayAtAppStart")]
    pub scheduler_delay: i32,
}

/// Everything the scheduler panel renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskState {
    pub scheduling_enabled: bool,
    pub status: String,
    pub free_threads: i64,
    pub active_threads: i64,
    pub max_threads: i64,
    pub task_processing_list: Vec<Value>,
    pub task_status_list: Vec<Value>,
    pub total_count: u64,
    pub scheduler_mode_options: Vec<Value>,
    pub settings: SchedulerSettings,
    pub history: Vec<Value>,
    pub history_count: u64,
    pub schedule_items: Vec<ScheduleItem>,
    pub servers: Vec<Value>,
    pub schedule_item: Option<ScheduleItem>,
    /// Last create/update/run outcome
    pub last_write_succeeded: Option<bool>,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskAction {
    RetrievedStatus {
        scheduling_enabled: bool,
        status: String,
        free_threads: i64,
        active_threads: i64,
        max_threads: i64,
        processing: Vec<Value>,
        queue: Vec<Value>,
        total_count: u64,
    },
    StartedSchedule,
    StoppedSchedule,
    RetrievedSettings {
        mode_options: Vec<Value>,
        settings: SchedulerSettings,
    },
    UpdatedSettings(SchedulerSettings),
    RetrievedHistory {
        entries: Vec<Value>,
        total_count: u64,
    },
    RetrievedItems {
        items: Vec<ScheduleItem>,
        total_count: u64,
    },
    RetrievedServers(Vec<Value>),
    RetrievedItem(ScheduleItem),
    /// The remaining list after a delete
    DeletedItem(Vec<ScheduleItem>),
    CreatedItem { success: bool },
    UpdatedItem { success: bool },
    ExecutedItem { success: bool },
    Failed(String),
}

pub fn reduce(state: &TaskState, action: &TaskAction) -> TaskState {
    let mut next = state.clone();
    match action {
        TaskAction::RetrievedStatus {
            scheduling_enabled,
            status,
            free_threads,
            active_threads,
            max_threads,
            processing,
            queue,
            total_count,
        } => {
            next.scheduling_enabled = *scheduling_enabled;
            next.status = status.clone();
            next.free_threads = *free_threads;
            next.active_threads = *active_threads;
            next.max_threads = *max_threads;
            next.task_processing_list = processing.clone();
            next.task_status_list = queue.clone();
            next.total_count = *total_count;
            next.last_error = None;
        }
        TaskAction::StartedSchedule => next.scheduling_enabled = true,
        TaskAction::StoppedSchedule => next.scheduling_enabled = false,
        TaskAction::RetrievedSettings { mode_options, settings } => {
            next.scheduler_mode_options = mode_options.clone();
            next.settings = settings.clone();
        }
        TaskAction::UpdatedSettings(settings) => next.settings = settings.clone(),
        TaskAction::RetrievedHistory { entries, total_count } => {
            next.history = entries.clone();
            next.history_count = *total_count;
        }
        TaskAction::RetrievedItems { items, total_count } => {
            next.schedule_items = items.clone();
            next.total_count = *total_count;
        }
        TaskAction::RetrievedServers(servers) => next.servers = servers.clone(),
        TaskAction::RetrievedItem(item) => next.schedule_item = Some(item.clone()),
        TaskAction::DeletedItem(remaining) => {
            next.schedule_items = remaining.clone();
            next.total_count = remaining.len() as u64;
            next.schedule_item = None;
        }
        TaskAction::CreatedItem { success }
        | TaskAction::UpdatedItem { success }
        | TaskAction::ExecutedItem { success } => next.last_write_succeeded = Some(*success),
        TaskAction::Failed(message) => {
            next.last_write_succeeded = Some(false);
            next.last_error = Some(message.clone());
        }
    }
    next
}

use serde_json::json;

use crate::state::{ScheduleItem, SchedulerSettings, TaskAction, TaskState, reduce};

fn item(id: i32, name: &str) -> ScheduleItem {
    ScheduleItem {
        schedule_id: id,
        friendly_name: name.to_string(),
        ..ScheduleItem::default()
    }
}

#[test]
fn test_start_and_stop_toggle_scheduling() {
    let started = reduce(&TaskState::default(), &TaskAction::StartedSchedule);
    assert!(started.scheduling_enabled);
    let stopped = reduce(&started, &TaskAction::StoppedSchedule);
    assert!(!stopped.scheduling_enabled);
}

#[test]
fn test_delete_replaces_list_and_count() {
    let state = reduce(
        &TaskState::default(),
        &TaskAction::RetrievedItems {
            items: vec![item(1, "Purge Cache"), item(2, "Search Crawler")],
            total_count: 2,
        },
    );
    let state = reduce(&state, &TaskAction::RetrievedItem(item(2, "Search Crawler")));
    let state = reduce(&state, &TaskAction::DeletedItem(vec![item(1, "Purge Cache")]));

    assert_eq!(state.total_count, 1);
    assert_eq!(state.schedule_items, vec![item(1, "Purge Cache")]);
    assert!(state.schedule_item.is_none());
}

#[test]
fn test_failure_marks_last_write() {
    let state = reduce(&TaskState::default(), &TaskAction::CreatedItem { success: true });
    assert_eq!(state.last_write_succeeded, Some(true));

    let state = reduce(&state, &TaskAction::Failed("Friendly Name is required".to_string()));
    assert_eq!(state.last_write_succeeded, Some(false));
    assert_eq!(state.last_error.as_deref(), Some("Friendly Name is required"));
}

#[test]
fn test_settings_keep_mode_options() {
    let state = reduce(
        &TaskState::default(),
        &TaskAction::RetrievedSettings {
            mode_options: vec![json!({"Key": "Disabled", "Value": "0"})],
            settings: SchedulerSettings {
                scheduler_mode: "1".to_string(),
                scheduler_delay: 1,
            },
        },
    );
    let state = reduce(
        &state,
        &TaskAction::UpdatedSettings(SchedulerSettings {
            scheduler_mode: "2".to_string(),
            scheduler_delay: 5,
        }),
    );
    assert_eq!(state.scheduler_mode_options.len(), 1);
    assert_eq!(state.settings.scheduler_mode, "2");
    assert_eq!(state.settings.scheduler_delay, 5);
}

#[test]
fn test_schedule_item_wire_names() {
    let parsed: ScheduleItem = serde_json::from_value(json!({
        "ScheduleID": 7,
        "FriendlyName": "Purge Log Buffer",
        "TypeFullName": "DotNetNuke.Services.Log.EventLog.PurgeLogBuffer, DOTNETNUKE",
        "Enabled": true,
        "TimeLapse": 1,
        "TimeLapseMeasurement": "m"
    }))
    .unwrap();
    assert_eq!(parsed.schedule_id, 7);
    assert!(parsed.enabled);
    assert_eq!(parsed.retain_history_num, 0);

    let written = serde_json::to_value(&parsed).unwrap();
    assert_eq!(written["ScheduleID"], json!(7));
    assert!(written.get("ScheduleStartDate").is_none());
}

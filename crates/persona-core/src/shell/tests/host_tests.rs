use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Value, json};

use super::{PanelSpy, harness};
use crate::event::dispatcher::sync_event_handler;
use crate::event::{EventResult, PanelStateKind, SharedEventDispatcher};
use crate::menu::model::UserInfo;
use crate::shell::error::PanelError;
use crate::shell::state::{PanelAction, PanelMode, SelectOutcome};

fn admin() -> UserInfo {
    UserInfo::new(2, "admin").with_role(0, "Administrators")
}

#[tokio::test]
async fn test_double_select_fetches_once_and_inits_once() {
    let h = harness(false).await;

    let first = h.shell.select("Dnn.A", &admin(), Value::Null).await.unwrap();
    let second = h.shell.select("Dnn.A", &admin(), Value::Null).await.unwrap();

    assert_eq!(first.action, PanelAction::Init);
    assert_eq!(second.action, PanelAction::Load);
    assert_eq!(h.source.fetches.load(Ordering::SeqCst), 1);
    assert_eq!(h.shell.fetch_count(), 1);
    assert_eq!(PanelSpy::count(&h.a.created), 1);
    assert_eq!(PanelSpy::count(&h.a.init), 1);
    assert_eq!(PanelSpy::count(&h.a.load), 1);
}

#[tokio::test]
async fn test_switching_back_loads_instead_of_init() {
    let h = harness(false).await;
    let user = admin();

    h.shell.select("Dnn.A", &user, Value::Null).await.unwrap();
    h.shell.select("Dnn.B", &user, Value::Null).await.unwrap();
    assert_eq!(h.shell.status("Dnn.A").await.unwrap().state, PanelStateKind::Hidden);
    assert_eq!(h.shell.active_panel().as_deref(), Some("Dnn.B"));

    let back = h.shell.select("Dnn.A", &user, json!({"tab": 2})).await.unwrap();

    assert_eq!(back.action, PanelAction::Load);
    assert_eq!(back.state, PanelStateKind::Active);
    assert_eq!(PanelSpy::count(&h.a.init), 1);
    assert_eq!(PanelSpy::count(&h.a.load), 1);
    assert_eq!(h.shell.status("Dnn.B").await.unwrap().state, PanelStateKind::Hidden);
}

#[tokio::test]
async fn test_ready_callback_fires_once_per_select() {
    let h = harness(false).await;
    let calls = Arc::new(Mutex::new(Vec::new()));

    for _ in 0..2 {
        let sink = calls.clone();
        h.shell
            .select_with(
                "Dnn.A",
                &admin(),
                Value::Null,
                Some(Box::new(move |outcome: &SelectOutcome| sink.lock().unwrap().push(outcome.action))),
            )
            .await
            .unwrap();
    }
    let sink = calls.clone();
    let missing = h
        .shell
        .select_with(
            "Dnn.Missing",
            &admin(),
            Value::Null,
            Some(Box::new(move |outcome: &SelectOutcome| sink.lock().unwrap().push(outcome.action))),
        )
        .await;

    assert!(missing.is_err());
    assert_eq!(
        *calls.lock().unwrap(),
        vec![PanelAction::Init, PanelAction::Load, PanelAction::None]
    );
}

#[tokio::test]
async fn test_fetch_failure_is_retried_with_fresh_fetch() {
    let h = harness(false).await;
    h.source.fail_next.store(1, Ordering::SeqCst);

    let err = h.shell.select("Dnn.A", &admin(), Value::Null).await.unwrap_err();
    assert!(matches!(err, PanelError::FetchFailed { .. }));
    let status = h.shell.status("Dnn.A").await.unwrap();
    assert_eq!(status.state, PanelStateKind::Failed);
    assert_eq!(status.last_error, Some(err));
    assert_eq!(h.ui.buffered_messages().len(), 1);

    let retry = h.shell.select("Dnn.A", &admin(), Value::Null).await.unwrap();
    assert_eq!(retry.action, PanelAction::Init);
    assert_eq!(h.source.fetches.load(Ordering::SeqCst), 2);
    assert_eq!(h.shell.status("Dnn.A").await.unwrap().last_error, None);
}

#[tokio::test]
async fn test_init_failure_retries_init_without_refetch() {
    let h = harness(false).await;
    h.a.fail_inits.store(1, Ordering::SeqCst);

    let err = h.shell.select("Dnn.A", &admin(), Value::Null).await.unwrap_err();
    assert!(matches!(err, PanelError::InitFailed { .. }));

    let retry = h.shell.select("Dnn.A", &admin(), Value::Null).await.unwrap();
    assert_eq!(retry.action, PanelAction::Init);
    assert_eq!(h.source.fetches.load(Ordering::SeqCst), 1);
    assert_eq!(PanelSpy::count(&h.a.created), 1);
    assert_eq!(PanelSpy::count(&h.a.init), 2);
    assert_eq!(h.shell.status("Dnn.A").await.unwrap().init_calls, 2);
}

#[tokio::test]
async fn test_panic_in_init_leaves_shell_usable() {
    let h = harness(false).await;
    h.a.panic_init.store(true, Ordering::SeqCst);

    let err = h.shell.select("Dnn.A", &admin(), Value::Null).await.unwrap_err();
    assert_eq!(
        err,
        PanelError::Panicked {
            identifier: "Dnn.A".to_string(),
            message: "init exploded".to_string(),
        }
    );
    assert_eq!(h.shell.status("Dnn.A").await.unwrap().state, PanelStateKind::Failed);

    let other = h.shell.select("Dnn.B", &admin(), Value::Null).await.unwrap();
    assert_eq!(other.state, PanelStateKind::Active);
    assert_eq!(h.shell.status("Dnn.A").await.unwrap().state, PanelStateKind::Failed);
}

#[tokio::test]
async fn test_mobile_mode_is_locked_at_first_init() {
    let h = harness(true).await;

    h.shell.select("Dnn.A", &admin(), Value::Null).await.unwrap();
    h.shell.set_mobile(false);
    h.shell.select("Dnn.A", &admin(), Value::Null).await.unwrap();
    h.shell.select("Dnn.B", &admin(), Value::Null).await.unwrap();

    assert_eq!(PanelSpy::count(&h.a.init_mobile), 1);
    assert_eq!(PanelSpy::count(&h.a.load_mobile), 1);
    assert_eq!(PanelSpy::count(&h.a.init), 0);
    assert_eq!(PanelSpy::count(&h.a.load), 0);
    assert!(h.a.wrappers.lock().unwrap()[0].mobile);
    assert_eq!(h.shell.status("Dnn.A").await.unwrap().mode, Some(PanelMode::Mobile));

    assert_eq!(PanelSpy::count(&h.b.init), 1);
    assert_eq!(h.shell.status("Dnn.B").await.unwrap().mode, Some(PanelMode::Desktop));
}

#[tokio::test]
async fn test_calls_for_one_panel_never_overlap() {
    let h = harness(false).await;
    h.a.delay_ms.store(20, Ordering::SeqCst);
    h.source.delay_ms.store(10, Ordering::SeqCst);
    let user = admin();

    let (first, second) = futures::join!(
        h.shell.select("Dnn.A", &user, Value::Null),
        h.shell.select("Dnn.A", &user, Value::Null)
    );

    assert!(first.is_ok() && second.is_ok());
    assert!(!h.a.overlapped.load(Ordering::SeqCst));
    assert_eq!(h.source.fetches.load(Ordering::SeqCst), 1);
    assert_eq!(PanelSpy::count(&h.a.init), 1);
    assert_eq!(PanelSpy::count(&h.a.load), 1);
}

#[tokio::test]
async fn test_late_completion_ends_hidden() {
    let h = harness(false).await;
    h.a.delay_ms.store(60, Ordering::SeqCst);
    let user = admin();

    let (slow, fast) = futures::join!(h.shell.select("Dnn.A", &user, Value::Null), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        h.shell.select("Dnn.B", &user, Value::Null).await
    });

    let slow = slow.unwrap();
    assert!(!slow.active);
    assert_eq!(slow.state, PanelStateKind::Hidden);
    assert!(fast.unwrap().active);
    assert_eq!(h.shell.active_panel().as_deref(), Some("Dnn.B"));
    assert_eq!(h.shell.status("Dnn.B").await.unwrap().state, PanelStateKind::Active);
}

#[tokio::test]
async fn test_hidden_or_unknown_panels_are_unavailable() {
    let h = harness(false).await;

    let err = h.shell.select("Dnn.Host", &admin(), Value::Null).await.unwrap_err();
    assert!(matches!(err, PanelError::Unavailable { .. }));
    assert!(h.shell.status("Dnn.Host").await.is_none());
    assert_eq!(h.shell.fetch_count(), 0);

    let host = UserInfo::host(1, "host");
    let err = h.shell.select("Dnn.Host", &host, Value::Null).await.unwrap_err();
    assert!(matches!(err, PanelError::BundleNotFound(_)));
}

#[tokio::test]
async fn test_state_changes_are_published() {
    let h = harness(false).await;
    let events = SharedEventDispatcher::new();
    let states = Arc::new(AtomicUsize::new(0));
    let counter = states.clone();
    events
        .register_handler(
            "panel.state",
            sync_event_handler(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                EventResult::Continue
            }),
        )
        .await;
    let shell = h.shell.with_events(events);

    shell.select("Dnn.A", &admin(), Value::Null).await.unwrap();

    // Loading, Initialized, Active
    assert_eq!(states.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_deselect_hides_active_panel() {
    let h = harness(false).await;
    h.shell.select("Dnn.A", &admin(), Value::Null).await.unwrap();
    h.shell.deselect().await;
    assert_eq!(h.shell.active_panel(), None);
    assert_eq!(h.shell.status("Dnn.A").await.unwrap().state, PanelStateKind::Hidden);
}

#[tokio::test]
async fn test_hide_is_not_lost_while_gate_is_busy() {
    let h = harness(false).await;
    let user = admin();
    h.shell.select("Dnn.A", &user, Value::Null).await.unwrap();

    // Hold A's gate across the switch so the hide cannot take it
    let gate = h.shell.existing_gate("Dnn.A").unwrap();
    let held = gate.lock().await;
    let outcome = h.shell.select("Dnn.B", &user, Value::Null).await.unwrap();
    assert!(outcome.active);
    drop(held);

    assert_eq!(h.shell.status("Dnn.A").await.unwrap().state, PanelStateKind::Hidden);
    assert_eq!(h.shell.status("Dnn.B").await.unwrap().state, PanelStateKind::Active);
    assert_eq!(h.shell.active_panel().as_deref(), Some("Dnn.B"));
}

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use crate::event::manager::{DefaultEventManager, EventManager};
use crate::event::types::TestEvent;
use crate::event::{Event, EventResult, SystemEvent};
use crate::kernel::component::KernelComponent;

#[tokio::test]
async fn test_component_name() {
    let manager = DefaultEventManager::new();
    assert_eq!(manager.name(), "DefaultEventManager");
}

#[tokio::test]
async fn test_start_and_stop_publish_lifecycle_events() {
    let manager = DefaultEventManager::new();
    let seen = Arc::new(StdMutex::new(Vec::new()));

    let seen_clone = Arc::clone(&seen);
    manager
        .register_sync_type_handler::<SystemEvent, _>(move |event| {
            seen_clone.lock().unwrap().push(event.name());
            EventResult::Continue
        })
        .await;

    manager.start().await.unwrap();
    manager.stop().await.unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec!["application.start", "application.shutdown"]
    );
}

#[tokio::test]
async fn test_stop_drains_queue() {
    let manager = DefaultEventManager::new();
    let counter = Arc::new(AtomicU32::new(0));
    let counter_clone = Arc::clone(&counter);
    manager
        .register_sync_handler("test.event", move |_event: &dyn Event| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
            EventResult::Continue
        })
        .await;

    manager.queue_event(Box::new(TestEvent::new("queued"))).await;
    assert_eq!(counter.load(Ordering::SeqCst), 0);

    manager.stop().await.unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_shared_dispatcher_handle_reaches_manager_handlers() {
    let manager = DefaultEventManager::new();
    let counter = Arc::new(AtomicU32::new(0));
    let counter_clone = Arc::clone(&counter);
    manager
        .register_sync_handler("feature.installed", move |_event: &dyn Event| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
            EventResult::Continue
        })
        .await;

    let handle = manager.dispatcher().clone();
    handle
        .dispatch(&SystemEvent::FeatureInstalled { feature: "admin-logs".to_string() })
        .await;

    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

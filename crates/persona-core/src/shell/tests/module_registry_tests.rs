use std::sync::Arc;
use std::sync::atomic::Ordering;

use super::{CountingSource, PanelSpy, spy_factory};
use crate::shell::module_registry::ModuleRegistry;

fn source() -> Arc<CountingSource> {
    let source = Arc::new(CountingSource::default());
    source.catalog.register("a/bundle", spy_factory(Arc::new(PanelSpy::default()))).unwrap();
    source
}

#[tokio::test]
async fn test_success_is_cached() {
    let source = source();
    let registry = ModuleRegistry::new(source.clone());

    registry.load("a/bundle").await.unwrap();
    registry.load("a/bundle").await.unwrap();

    assert!(registry.is_loaded("a/bundle"));
    assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    assert_eq!(registry.fetch_count(), 1);
}

#[tokio::test]
async fn test_outstanding_fetch_is_shared() {
    let source = source();
    source.delay_ms.store(20, Ordering::SeqCst);
    let registry = ModuleRegistry::new(source.clone());

    let (first, second) = futures::join!(registry.load("a/bundle"), registry.load("a/bundle"));

    assert!(first.is_ok());
    assert!(second.is_ok());
    assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_fetch_is_forgotten() {
    let source = source();
    source.fail_next.store(1, Ordering::SeqCst);
    let registry = ModuleRegistry::new(source.clone());

    assert!(registry.load("a/bundle").await.is_err());
    assert!(!registry.is_loaded("a/bundle"));

    registry.load("a/bundle").await.unwrap();
    assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_unknown_path_is_not_cached() {
    let source = source();
    let registry = ModuleRegistry::new(source.clone());
    assert!(registry.load("nope").await.is_err());
    assert!(registry.load("nope").await.is_err());
    assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
}

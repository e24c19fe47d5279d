use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::TestFeature;
use crate::data::{DataService, InMemoryDataService};
use crate::event::dispatcher::sync_event_handler;
use crate::event::{EventResult, SharedEventDispatcher};
use crate::feature::error::FeatureSystemError;
use crate::feature::manager::{DefaultFeatureManager, FeatureManager};
use crate::feature::manifest::{FeatureManifest, ManifestExtension, ManifestMenuItem, ManifestPermission};
use crate::kernel::component::KernelComponent;
use crate::kernel::error::Error;
use crate::menu::manager::MenuManager;
use crate::menu::model::UserInfo;
use crate::shell::bundle::BundleCatalog;

struct Fixture {
    data: Arc<dyn DataService>,
    menu: Arc<MenuManager>,
    bundles: Arc<BundleCatalog>,
    manager: DefaultFeatureManager,
}

fn fixture() -> Fixture {
    let data: Arc<dyn DataService> = Arc::new(InMemoryDataService::new());
    let menu = Arc::new(MenuManager::new(data.clone(), 0));
    let bundles = Arc::new(BundleCatalog::default());
    let manager = DefaultFeatureManager::new(menu.clone(), bundles.clone()).unwrap();
    Fixture {
        data,
        menu,
        bundles,
        manager,
    }
}

fn child(identifier: &str, parent: &str) -> ManifestMenuItem {
    let mut item = ManifestMenuItem::new(identifier, identifier.trim_start_matches("Dnn."));
    item.parent = Some(parent.to_string());
    item
}

fn scheduler_manifest() -> FeatureManifest {
    let mut scheduler = child("Dnn.TaskScheduler", "Dnn.Settings");
    scheduler.default_roles = vec!["Administrators".to_string(), " administrators ".to_string()];
    // Child listed before its parent on purpose
    FeatureManifest::new("task-scheduler", "1.0.0")
        .with_menu_item(scheduler)
        .with_menu_item(ManifestMenuItem::new("Dnn.Settings", "Settings"))
        .with_extension(ManifestExtension {
            identifier: "Dnn.TaskScheduler.History".to_string(),
            menu: "Dnn.TaskScheduler".to_string(),
            controller: String::new(),
            container: "Tabs".to_string(),
            path: String::new(),
            order: 0,
            enabled: true,
        })
        .with_permission(ManifestPermission {
            menu: "Dnn.Settings".to_string(),
            portal_id: Some(0),
            role_id: Some(0),
            user_id: None,
            allow_access: true,
        })
}

fn admin() -> UserInfo {
    UserInfo::new(2, "admin").with_role(0, "Administrators")
}

#[tokio::test]
async fn test_activate_registers_contributions() {
    let f = fixture();
    let mut feature = TestFeature::new("admin-logs");
    feature.controllers = vec!["AdminLogsController"];
    feature.bundles = vec!["AdminLogs/scripts/AdminLogs"];

    f.manager.activate(Arc::new(feature)).await.unwrap();

    assert!(f.manager.is_active("admin-logs").await);
    assert_eq!(f.menu.controller_names(), vec!["AdminLogsController"]);
    assert!(f.bundles.contains("AdminLogs/scripts/AdminLogs"));
    let infos = f.manager.features().await;
    assert_eq!(infos.len(), 1);
    assert_eq!(infos[0].name, "admin-logs");
    assert!(!infos[0].is_core);
}

#[tokio::test]
async fn test_failed_activation_rolls_back() {
    let f = fixture();
    let mut feature = TestFeature::new("broken");
    feature.controllers = vec!["BrokenController"];
    feature.bundles = vec!["broken/bundle"];
    feature.fail_bundles = true;

    assert!(f.manager.activate(Arc::new(feature)).await.is_err());

    assert!(!f.manager.is_active("broken").await);
    assert!(f.menu.controller_names().is_empty());
    assert!(f.bundles.is_empty());
}

#[tokio::test]
async fn test_controller_clash_keeps_existing_registration() {
    let f = fixture();
    let mut first = TestFeature::new("first");
    first.controllers = vec!["Shared"];
    f.manager.activate(Arc::new(first)).await.unwrap();

    let mut second = TestFeature::new("second");
    second.controllers = vec!["Own", "Shared"];
    let err = f.manager.activate(Arc::new(second)).await.unwrap_err();

    assert!(matches!(err, Error::Menu(_)));
    assert_eq!(f.menu.controller_names(), vec!["Shared"]);
}

#[tokio::test]
async fn test_duplicate_and_incompatible_features() {
    let f = fixture();
    f.manager.activate(Arc::new(TestFeature::new("home"))).await.unwrap();

    let err = f.manager.activate(Arc::new(TestFeature::new("home"))).await.unwrap_err();
    assert!(matches!(err, Error::FeatureSystem(FeatureSystemError::DuplicateFeature(_))));

    let mut future = TestFeature::new("future");
    future.api = "^3";
    future.controllers = vec!["FutureController"];
    let err = f.manager.activate(Arc::new(future)).await.unwrap_err();
    assert!(matches!(
        err,
        Error::FeatureSystem(FeatureSystemError::IncompatibleApiVersion { .. })
    ));
    assert!(f.menu.controller_names().is_empty());
}

#[tokio::test]
async fn test_install_writes_registry_records() {
    let f = fixture();
    let mut feature = TestFeature::new("task-scheduler");
    feature.manifest = scheduler_manifest();
    f.manager.activate(Arc::new(feature)).await.unwrap();

    let report = f.manager.install("task-scheduler").await.unwrap();

    assert_eq!(report.menu_items.len(), 2);
    assert_eq!(report.extensions.len(), 1);
    assert_eq!(report.permissions, 1);

    let items = f.data.get_menu_items().await.unwrap();
    let settings = items.iter().find(|i| i.identifier == "Dnn.Settings").unwrap();
    let scheduler = items.iter().find(|i| i.identifier == "Dnn.TaskScheduler").unwrap();
    assert_eq!(scheduler.parent_id, Some(settings.menu_id));
    assert_eq!(scheduler.last_modified_by, crate::kernel::constants::SYSTEM_USER_ID);
    assert_eq!(
        f.data.get_menu_default_roles(scheduler.menu_id).await.unwrap(),
        vec!["Administrators"]
    );
    let extensions = f.data.get_extensions().await.unwrap();
    assert_eq!(extensions[0].menu_id, scheduler.menu_id);

    let visible = f.menu.visible_menu(&admin()).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].children[0].item.identifier, "Dnn.TaskScheduler");
}

#[tokio::test]
async fn test_reinstall_keeps_ids_and_permissions() {
    let f = fixture();
    let manifest = scheduler_manifest();

    let first = f.manager.install_manifest(&manifest).await.unwrap();
    let second = f.manager.install_manifest(&manifest).await.unwrap();

    assert_eq!(first.menu_items.len(), second.menu_items.len());
    for entry in &first.menu_items {
        assert!(second.menu_items.contains(entry));
    }
    assert_eq!(first.extensions, second.extensions);
    assert_eq!(f.data.get_menu_items().await.unwrap().len(), 2);
    assert_eq!(f.data.get_permissions_by_portal(0).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_install_resolves_parents_already_in_registry() {
    let f = fixture();
    f.manager
        .install_manifest(&FeatureManifest::new("settings", "1.0.0").with_menu_item(ManifestMenuItem::new("Dnn.Settings", "Settings")))
        .await
        .unwrap();

    let report = f
        .manager
        .install_manifest(&FeatureManifest::new("servers", "1.0.0").with_menu_item(child("Dnn.Servers", "Dnn.Settings")))
        .await
        .unwrap();

    assert_eq!(report.menu_items.len(), 1);
    let tree = f.menu.tree().await.unwrap();
    assert_eq!(tree.children("Dnn.Settings").to_vec(), vec!["Dnn.Servers".to_string()]);
}

#[tokio::test]
async fn test_removing_a_parent_leaves_no_orphans() {
    let f = fixture();
    f.manager
        .install_manifest(&FeatureManifest::new("settings", "1.0.0").with_menu_item(ManifestMenuItem::new("Dnn.Settings", "Settings")))
        .await
        .unwrap();
    f.manager
        .install_manifest(&FeatureManifest::new("servers", "1.0.0").with_menu_item(child("Dnn.Servers", "Dnn.Settings")))
        .await
        .unwrap();

    f.manager
        .uninstall_identifiers(&["Dnn.Settings".to_string()])
        .await
        .unwrap();

    assert!(f.data.get_menu_items().await.unwrap().is_empty());
    let tree = f.menu.tree().await.unwrap();
    assert!(tree.is_empty());
    assert!(tree.orphans().is_empty());
}

#[tokio::test]
async fn test_missing_parent_and_menu_are_rejected() {
    let f = fixture();

    let orphan = FeatureManifest::new("orphan", "1.0.0").with_menu_item(child("Dnn.Lost", "Dnn.Nowhere"));
    let err = f.manager.install_manifest(&orphan).await.unwrap_err();
    assert!(matches!(
        err,
        Error::FeatureSystem(FeatureSystemError::MissingParent { ref parent, .. }) if parent == "Dnn.Nowhere"
    ));

    let dangling = FeatureManifest::new("dangling", "1.0.0").with_extension(ManifestExtension {
        identifier: "Dnn.Ghost.Tab".to_string(),
        menu: "Dnn.Ghost".to_string(),
        controller: String::new(),
        container: String::new(),
        path: String::new(),
        order: 0,
        enabled: true,
    });
    let err = f.manager.install_manifest(&dangling).await.unwrap_err();
    assert!(matches!(err, Error::FeatureSystem(FeatureSystemError::MissingMenu { .. })));
}

#[tokio::test]
async fn test_manifest_api_range_is_checked() {
    let f = fixture();
    let mut manifest = FeatureManifest::new("future", "1.0.0");
    manifest.api_versions = vec!["^5".to_string()];

    let err = f.manager.install_manifest(&manifest).await.unwrap_err();

    assert!(matches!(
        err,
        Error::FeatureSystem(FeatureSystemError::IncompatibleApiVersion { .. })
    ));
}

#[tokio::test]
async fn test_uninstall_removes_records() {
    let f = fixture();
    let mut feature = TestFeature::new("task-scheduler");
    feature.manifest = scheduler_manifest();
    f.manager.activate(Arc::new(feature)).await.unwrap();
    f.manager.install("task-scheduler").await.unwrap();

    f.manager.uninstall("task-scheduler").await.unwrap();

    assert!(f.data.get_menu_items().await.unwrap().is_empty());
    assert!(f.data.get_extensions().await.unwrap().is_empty());
    assert!(f.data.get_permissions_by_portal(0).await.unwrap().is_empty());
    assert!(f.menu.visible_menu(&admin()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_uninstall_identifiers() {
    let f = fixture();
    f.manager.install_manifest(&scheduler_manifest()).await.unwrap();

    f.manager
        .uninstall_identifiers(&["Dnn.TaskScheduler".to_string(), "Dnn.Unknown".to_string()])
        .await
        .unwrap();

    let items = f.data.get_menu_items().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].identifier, "Dnn.Settings");
    assert!(f.data.get_extensions().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_install_and_uninstall_are_published() {
    let data: Arc<dyn DataService> = Arc::new(InMemoryDataService::new());
    let menu = Arc::new(MenuManager::new(data, 0));
    let events = SharedEventDispatcher::new();
    let seen = Arc::new(AtomicUsize::new(0));
    for name in ["feature.installed", "feature.uninstalled"] {
        let counter = seen.clone();
        events
            .register_handler(
                name,
                sync_event_handler(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    EventResult::Continue
                }),
            )
            .await;
    }
    let manager = DefaultFeatureManager::new(menu, Arc::new(BundleCatalog::default()))
        .unwrap()
        .with_events(events);
    let mut feature = TestFeature::new("task-scheduler");
    feature.manifest = scheduler_manifest();
    manager.activate(Arc::new(feature)).await.unwrap();

    manager.install("task-scheduler").await.unwrap();
    manager.uninstall("task-scheduler").await.unwrap();

    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_deactivate_drops_contributions() {
    let f = fixture();
    let mut feature = TestFeature::new("admin-logs");
    feature.controllers = vec!["AdminLogsController"];
    feature.bundles = vec!["AdminLogs/scripts/AdminLogs"];
    let shutdowns = feature.shutdowns.clone();
    f.manager.activate(Arc::new(feature)).await.unwrap();

    f.manager.deactivate("admin-logs").await.unwrap();

    assert!(!f.manager.is_active("admin-logs").await);
    assert!(f.menu.controller_names().is_empty());
    assert!(f.bundles.is_empty());
    assert_eq!(*shutdowns.lock().unwrap(), vec!["admin-logs"]);
    assert!(f.manager.deactivate("admin-logs").await.is_err());
}

#[tokio::test]
async fn test_stop_shuts_down_in_reverse_order() {
    let f = fixture();
    let shutdowns = Arc::new(Mutex::new(Vec::new()));
    for name in ["core", "home", "logs"] {
        let mut feature = TestFeature::new(name);
        feature.shutdowns = shutdowns.clone();
        feature.fail_shutdown = name == "home";
        f.manager.activate(Arc::new(feature)).await.unwrap();
    }

    let err = f.manager.stop().await.unwrap_err();

    assert_eq!(*shutdowns.lock().unwrap(), vec!["logs", "home", "core"]);
    assert!(err.to_string().contains("home: "));
}

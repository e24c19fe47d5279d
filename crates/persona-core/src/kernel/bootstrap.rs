use std::any::TypeId;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::data::{DataService, FileDataService};
use crate::event::{DefaultEventManager, SharedEventDispatcher, SystemEvent};
use crate::feature::manager::{DefaultFeatureManager, FeatureManager, InstallReport};
use crate::feature::manifest::FeatureManifest;
use crate::feature::traits::Feature;
use crate::feature::error::FeatureSystemError;
use crate::kernel::component::{DependencyRegistry, KernelComponent};
use crate::kernel::constants;
use crate::kernel::error::{Error, KernelLifecyclePhase, Result};
use crate::menu::manager::MenuManager;
use crate::service::{HttpTransport, ServiceClient};
use crate::shell::bundle::BundleCatalog;
use crate::shell::host::HostShell;
use crate::shell::utility::Utility;
use crate::shell::BarSkinListener;
use crate::skin::{SkinEventListener, SkinManager};
use crate::storage::{DefaultStorageManager, PersonaBarSettings};
use crate::ui_bridge::UnifiedUiManager;

/// Main application struct coordinating components via dependency injection
pub struct Application {
    initialized: bool,
    dependencies: Arc<Mutex<DependencyRegistry>>,
    // Concrete TypeIds in initialization order
    component_init_order: Vec<TypeId>,
    settings: Arc<PersonaBarSettings>,
    storage: Arc<DefaultStorageManager>,
    events: SharedEventDispatcher,
    ui: Arc<UnifiedUiManager>,
    menu: Arc<MenuManager>,
    bundles: Arc<BundleCatalog>,
    service: ServiceClient,
    shell: Arc<HostShell>,
    skin: Arc<SkinManager>,
    features: Arc<DefaultFeatureManager>,
    bar: Arc<BarSkinListener>,
    // Listeners added by features during init, subscribed once activation finishes
    pending_listeners: Vec<Arc<dyn SkinEventListener>>,
}

impl Application {
    /// Application rooted at `$PERSONABAR_HOME` or `./.personabar`
    pub fn new() -> Result<Self> {
        Self::with_storage(DefaultStorageManager::default())
    }

    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_storage(DefaultStorageManager::new(base_path.into()))
    }

    pub fn with_storage(storage: DefaultStorageManager) -> Result<Self> {
        log::info!("Initializing {} v{}", constants::APP_NAME, constants::APP_VERSION);

        let storage = Arc::new(storage);
        storage.ensure_directories()?;
        let settings = Arc::new(storage.settings()?);
        log::info!("Using storage root: {}", storage.base_path().display());

        let event_manager = Arc::new(DefaultEventManager::new());
        let events = event_manager.dispatcher().clone();

        let ui = Arc::new(UnifiedUiManager::with_log_interface());

        let registry_path = storage.registry_file_path(&settings);
        let data: Arc<dyn DataService> = Arc::new(FileDataService::open(storage.provider().clone(), registry_path)?);
        let menu = Arc::new(MenuManager::new(data, settings.portal_id).with_events(events.clone()));

        let transport = HttpTransport::from_settings(&settings)?;
        let service = ServiceClient::new(Arc::new(transport), settings.service_module_root.clone())
            .with_notifier(ui.clone());

        let bundles = Arc::new(BundleCatalog::default());
        let utility = Utility::new(service.clone(), ui.clone(), settings.as_ref().clone());
        let shell = Arc::new(HostShell::new(menu.clone(), bundles.clone(), utility).with_events(events.clone()));

        let skin = Arc::new(SkinManager::new().with_events(events.clone()));
        let bar = Arc::new(BarSkinListener::new(menu.clone()));

        let features = Arc::new(
            DefaultFeatureManager::new(menu.clone(), bundles.clone())?.with_events(events.clone()),
        );

        let mut registry = DependencyRegistry::new();
        let mut init_order = Vec::new();

        registry.register_instance(storage.clone());
        init_order.push(TypeId::of::<DefaultStorageManager>());

        registry.register_instance(event_manager);
        init_order.push(TypeId::of::<DefaultEventManager>());

        registry.register_instance(ui.clone());
        init_order.push(TypeId::of::<UnifiedUiManager>());

        registry.register_instance(menu.clone());
        init_order.push(TypeId::of::<MenuManager>());

        registry.register_instance(features.clone());
        init_order.push(TypeId::of::<DefaultFeatureManager>());

        registry.register_instance(shell.clone());
        init_order.push(TypeId::of::<HostShell>());

        registry.register_instance(skin.clone());
        init_order.push(TypeId::of::<SkinManager>());

        Ok(Application {
            initialized: false,
            dependencies: Arc::new(Mutex::new(registry)),
            component_init_order: init_order,
            settings,
            storage,
            events,
            ui,
            menu,
            bundles,
            service,
            shell,
            skin,
            features,
            bar,
            pending_listeners: Vec::new(),
        })
    }

    /// Gets a specific component instance by its concrete type T.
    pub async fn get_component<T: KernelComponent + 'static>(&self) -> Option<Arc<T>> {
        let registry = self.dependencies.lock().await;
        registry.get_concrete::<T>()
    }

    pub async fn component_names(&self) -> Vec<&'static str> {
        self.dependencies.lock().await.component_names()
    }

    /// Activate features, core features first, then run each one's `init`.
    pub async fn activate_features(&mut self, features: Vec<Arc<dyn Feature>>) -> Result<()> {
        let mut ordered = features;
        ordered.sort_by_key(|feature| !feature.is_core());

        let manager = self.features.clone();
        for feature in &ordered {
            manager.activate(feature.clone()).await?;
        }
        for feature in &ordered {
            log::debug!("Initializing feature {}", feature.name());
            feature.init(self).map_err(|e| FeatureSystemError::InitializationError {
                feature: feature.name().to_string(),
                message: e.to_string(),
            })?;
        }

        for listener in std::mem::take(&mut self.pending_listeners) {
            self.skin.subscribe(listener).await;
        }
        Ok(())
    }

    /// Write the registry records of every active feature
    pub async fn install_features(&self) -> Result<Vec<InstallReport>> {
        let mut reports = Vec::new();
        for info in self.features.features().await {
            reports.push(self.features.install(&info.name).await?);
        }
        Ok(reports)
    }

    /// Install every manifest found in the storage `features/` directory
    pub async fn install_stored_manifests(&self) -> Result<Vec<InstallReport>> {
        let dir = self.storage.feature_manifest_path();
        let mut reports = Vec::new();
        for (path, manifest) in FeatureManifest::load_dir(self.storage.as_ref(), &dir)? {
            log::info!("Installing manifest {}", path.display());
            reports.push(self.features.install_manifest(&manifest).await?);
        }
        Ok(reports)
    }

    /// Queue a skin listener; it is subscribed when feature activation completes
    pub fn add_skin_listener(&mut self, listener: Arc<dyn SkinEventListener>) {
        self.pending_listeners.push(listener);
    }

    /// Initialize and start every component in order
    pub async fn start(&mut self) -> Result<()> {
        if self.initialized {
            return Err(Error::KernelLifecycleError {
                phase: KernelLifecyclePhase::RunPreCheck,
                component_name: None,
                type_id_str: None,
                message: "Application already initialized".to_string(),
                source: None,
            });
        }

        self.initialize().await?;
        self.start_components().await?;
        self.skin.subscribe(self.bar.clone()).await;

        self.initialized = true;
        self.events.dispatch(&SystemEvent::ApplicationStart).await;
        log::info!("Application initialized and started successfully.");
        Ok(())
    }

    async fn initialize(&mut self) -> Result<()> {
        log::info!("Initializing components...");
        let registry = self.dependencies.lock().await;

        for type_id in &self.component_init_order {
            if let Some(component_arc) = registry.get_component_by_id(type_id) {
                log::debug!("Initializing component: {}", component_arc.name());
                component_arc.initialize().await.map_err(|e| Error::KernelLifecycleError {
                    phase: KernelLifecyclePhase::Initialize,
                    component_name: Some(component_arc.name().to_string()),
                    type_id_str: Some(format!("{:?}", type_id)),
                    message: "Component failed to initialize".to_string(),
                    source: Some(Box::new(e)),
                })?;
            } else {
                log::error!(
                    "Component instance not found in registry for TypeId {:?} during initialization.",
                    type_id
                );
                return Err(Error::KernelLifecycleError {
                    phase: KernelLifecyclePhase::Initialize,
                    component_name: None,
                    type_id_str: Some(format!("{:?}", type_id)),
                    message: "Instance missing from registry".to_string(),
                    source: None,
                });
            }
        }
        Ok(())
    }

    async fn start_components(&mut self) -> Result<()> {
        log::info!("Starting components...");
        let registry = self.dependencies.lock().await;

        for type_id in &self.component_init_order {
            if let Some(component_arc) = registry.get_component_by_id(type_id) {
                log::debug!("Starting component: {}", component_arc.name());
                component_arc.start().await.map_err(|e| Error::KernelLifecycleError {
                    phase: KernelLifecyclePhase::Start,
                    component_name: Some(component_arc.name().to_string()),
                    type_id_str: Some(format!("{:?}", type_id)),
                    message: "Component failed to start".to_string(),
                    source: Some(Box::new(e)),
                })?;
            } else {
                log::error!("Component instance not found in registry for TypeId {:?} during start.", type_id);
                return Err(Error::KernelLifecycleError {
                    phase: KernelLifecyclePhase::Start,
                    component_name: None,
                    type_id_str: Some(format!("{:?}", type_id)),
                    message: "Instance missing from registry".to_string(),
                    source: None,
                });
            }
        }
        Ok(())
    }

    /// Stop every component in reverse initialization order. All components
    /// are stopped; the first failure is returned.
    pub async fn shutdown(&mut self) -> Result<()> {
        log::info!("Shutting down components...");
        self.events.dispatch(&SystemEvent::ApplicationShutdown).await;
        let registry = self.dependencies.lock().await;

        let mut first_error = None;
        for type_id in self.component_init_order.iter().rev() {
            let Some(component_arc) = registry.get_component_by_id(type_id) else {
                log::warn!("Component instance not found in registry for TypeId {:?} during stop.", type_id);
                continue;
            };
            log::debug!("Stopping component: {}", component_arc.name());
            if let Err(e) = component_arc.stop().await {
                log::error!("Error stopping component {}: {}", component_arc.name(), e);
                if first_error.is_none() {
                    first_error = Some(Error::KernelLifecycleError {
                        phase: KernelLifecyclePhase::Shutdown,
                        component_name: Some(component_arc.name().to_string()),
                        type_id_str: Some(format!("{:?}", type_id)),
                        message: "Component failed to stop".to_string(),
                        source: Some(Box::new(e)),
                    });
                }
            }
        }
        self.initialized = false;
        log::info!("Component shutdown complete.");
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn settings(&self) -> &Arc<PersonaBarSettings> {
        &self.settings
    }

    pub fn storage_manager(&self) -> &Arc<DefaultStorageManager> {
        &self.storage
    }

    pub fn events(&self) -> &SharedEventDispatcher {
        &self.events
    }

    pub fn ui_manager(&self) -> &Arc<UnifiedUiManager> {
        &self.ui
    }

    pub fn menu_manager(&self) -> &Arc<MenuManager> {
        &self.menu
    }

    pub fn bundle_catalog(&self) -> &Arc<BundleCatalog> {
        &self.bundles
    }

    pub fn service_client(&self) -> &ServiceClient {
        &self.service
    }

    pub fn host_shell(&self) -> &Arc<HostShell> {
        &self.shell
    }

    pub fn skin_manager(&self) -> &Arc<SkinManager> {
        &self.skin
    }

    pub fn bar_listener(&self) -> &Arc<BarSkinListener> {
        &self.bar
    }

    pub fn feature_manager(&self) -> &Arc<DefaultFeatureManager> {
        &self.features
    }
}

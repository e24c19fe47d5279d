mod host_tests;
mod module_registry_tests;

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::data::{DataService, InMemoryDataService};
use crate::menu::manager::MenuManager;
use crate::menu::model::MenuItem;
use crate::service::{ServiceCall, ServiceClient, ServiceError, ServiceTransport};
use crate::shell::bundle::{BundleCatalog, BundleSource};
use crate::shell::error::PanelError;
use crate::shell::host::HostShell;
use crate::shell::panel::{Panel, PanelContext, PanelFactory, PanelWrapper};
use crate::shell::utility::Utility;
use crate::storage::PersonaBarSettings;
use crate::ui_bridge::UnifiedUiManager;

#[derive(Debug)]
struct NullTransport;

#[async_trait]
impl ServiceTransport for NullTransport {
    async fn send(&self, _call: &ServiceCall) -> Result<Value, ServiceError> {
        Ok(Value::Null)
    }
}

pub(super) fn utility(ui: Arc<UnifiedUiManager>, mobile: bool) -> Utility {
    let settings = PersonaBarSettings {
        mobile,
        ..PersonaBarSettings::default()
    };
    Utility::new(ServiceClient::new(Arc::new(NullTransport), "PersonaBar"), ui, settings)
}

/// Counters and knobs shared between a test and the panels it creates
#[derive(Debug, Default)]
pub(super) struct PanelSpy {
    pub created: AtomicUsize,
    pub init: AtomicUsize,
    pub load: AtomicUsize,
    pub init_mobile: AtomicUsize,
    pub load_mobile: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub overlapped: AtomicBool,
    pub fail_inits: AtomicUsize,
    pub panic_init: AtomicBool,
    pub delay_ms: AtomicU64,
    pub wrappers: Mutex<Vec<PanelWrapper>>,
}

impl PanelSpy {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    async fn enter(&self) {
        if self.in_flight.fetch_add(1, Ordering::SeqCst) > 0 {
            self.overlapped.store(true, Ordering::SeqCst);
        }
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    fn init_result(&self, identifier: &str) -> Result<(), PanelError> {
        if self.panic_init.load(Ordering::SeqCst) {
            panic!("init exploded");
        }
        let remaining = self.fail_inits.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_inits.store(remaining - 1, Ordering::SeqCst);
            return Err(PanelError::InitFailed {
                identifier: identifier.to_string(),
                message: "not ready".to_string(),
            });
        }
        Ok(())
    }
}

struct SpyPanel(Arc<PanelSpy>);

#[async_trait]
impl Panel for SpyPanel {
    async fn init(&self, wrapper: &PanelWrapper, _utility: &Utility, _params: &Value) -> Result<(), PanelError> {
        self.0.enter().await;
        self.0.init.fetch_add(1, Ordering::SeqCst);
        self.0.wrappers.lock().unwrap().push(wrapper.clone());
        let result = self.0.init_result(&wrapper.identifier);
        self.0.leave();
        result
    }

    async fn load(&self, _params: &Value) -> Result<(), PanelError> {
        self.0.enter().await;
        self.0.load.fetch_add(1, Ordering::SeqCst);
        self.0.leave();
        Ok(())
    }

    async fn init_mobile(&self, wrapper: &PanelWrapper, _utility: &Utility, _params: &Value) -> Result<(), PanelError> {
        self.0.enter().await;
        self.0.init_mobile.fetch_add(1, Ordering::SeqCst);
        self.0.wrappers.lock().unwrap().push(wrapper.clone());
        self.0.leave();
        Ok(())
    }

    async fn load_mobile(&self, _params: &Value) -> Result<(), PanelError> {
        self.0.enter().await;
        self.0.load_mobile.fetch_add(1, Ordering::SeqCst);
        self.0.leave();
        Ok(())
    }
}

pub(super) fn spy_factory(spy: Arc<PanelSpy>) -> Arc<dyn PanelFactory> {
    Arc::new(move |_context: PanelContext| -> Result<Arc<dyn Panel>, PanelError> {
        spy.created.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(SpyPanel(spy.clone())))
    })
}

/// Bundle source that counts fetches and can fail or stall them
#[derive(Debug, Default)]
pub(super) struct CountingSource {
    pub catalog: BundleCatalog,
    pub fetches: AtomicUsize,
    pub fail_next: AtomicUsize,
    pub delay_ms: AtomicU64,
}

#[async_trait]
impl BundleSource for CountingSource {
    async fn fetch(&self, path: &str) -> Result<Arc<dyn PanelFactory>, PanelError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        let remaining = self.fail_next.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_next.store(remaining - 1, Ordering::SeqCst);
            return Err(PanelError::FetchFailed {
                path: path.to_string(),
                message: "404".to_string(),
            });
        }
        self.catalog.fetch(path).await
    }
}

pub(super) struct Harness {
    pub shell: HostShell,
    pub source: Arc<CountingSource>,
    pub ui: Arc<UnifiedUiManager>,
    pub a: Arc<PanelSpy>,
    pub b: Arc<PanelSpy>,
}

pub(super) async fn harness(mobile: bool) -> Harness {
    let data: Arc<dyn DataService> = Arc::new(InMemoryDataService::new());
    data.save_menu_item(&MenuItem::new("Dnn.A", "PanelA").with_path("a/bundle").with_order(1), 1)
        .await
        .unwrap();
    data.save_menu_item(&MenuItem::new("Dnn.B", "PanelB").with_path("b/bundle").with_order(2), 1)
        .await
        .unwrap();
    data.save_menu_item(&MenuItem::new("Dnn.Host", "HostOnly").with_path("h/bundle").host_only(), 1)
        .await
        .unwrap();
    let menu = Arc::new(MenuManager::new(data, 0));

    let a = Arc::new(PanelSpy::default());
    let b = Arc::new(PanelSpy::default());
    let source = Arc::new(CountingSource::default());
    source.catalog.register("a/bundle", spy_factory(a.clone())).unwrap();
    source.catalog.register("b/bundle", spy_factory(b.clone())).unwrap();

    let ui = Arc::new(UnifiedUiManager::new());
    let shell = HostShell::new(menu, source.clone(), utility(ui.clone(), mobile));
    Harness { shell, source, ui, a, b }
}

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

use crate::shell::bundle::BundleSource;
use crate::shell::error::PanelError;
use crate::shell::panel::PanelFactory;

type FetchResult = Result<Arc<dyn PanelFactory>, PanelError>;
type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

enum Slot {
    Pending { generation: u64, fetch: SharedFetch },
    Loaded(Arc<dyn PanelFactory>),
}

/// Loaded panel factories keyed by bundle path.
///
/// A path is fetched at most once while a fetch is outstanding or after it
/// succeeded; concurrent loaders share the same fetch. A failed fetch is
/// forgotten so the next load tries again.
pub struct ModuleRegistry {
    source: Arc<dyn BundleSource>,
    slots: Mutex<HashMap<String, Slot>>,
    generation: AtomicU64,
    fetches: AtomicUsize,
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("source", &self.source)
            .field("fetches", &self.fetch_count())
            .finish()
    }
}

impl ModuleRegistry {
    pub fn new(source: Arc<dyn BundleSource>) -> Self {
        Self {
            source,
            slots: Mutex::new(HashMap::new()),
            generation: AtomicU64::new(0),
            fetches: AtomicUsize::new(0),
        }
    }

    pub async fn load(&self, path: &str) -> FetchResult {
        let (generation, fetch) = {
            let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
            match slots.get(path) {
                Some(Slot::Loaded(factory)) => return Ok(factory.clone()),
                Some(Slot::Pending { generation, fetch }) => (*generation, fetch.clone()),
                None => {
                    let generation = self.generation.fetch_add(1, Ordering::SeqCst);
                    let source = self.source.clone();
                    let owned = path.to_string();
                    let fetch = async move { source.fetch(&owned).await }.boxed().shared();
                    self.fetches.fetch_add(1, Ordering::SeqCst);
                    log::debug!("Fetching panel bundle {}", path);
                    slots.insert(
                        path.to_string(),
                        Slot::Pending {
                            generation,
                            fetch: fetch.clone(),
                        },
                    );
                    (generation, fetch)
                }
            }
        };

        let result = fetch.await;

        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        let current = matches!(
            slots.get(path),
            Some(Slot::Pending { generation: g, .. }) if *g == generation
        );
        if current {
            match &result {
                Ok(factory) => {
                    slots.insert(path.to_string(), Slot::Loaded(factory.clone()));
                }
                Err(e) => {
                    log::warn!("Fetching panel bundle {} failed: {}", path, e);
                    slots.remove(path);
                }
            }
        }
        result
    }

    pub fn is_loaded(&self, path: &str) -> bool {
        matches!(
            self.slots.lock().unwrap_or_else(|e| e.into_inner()).get(path),
            Some(Slot::Loaded(_))
        )
    }

    /// Bundle fetches issued so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::event::{SharedEventDispatcher, SystemEvent};
use crate::kernel::component::KernelComponent;
use crate::kernel::error::Result;
use crate::skin::error::SkinError;
use crate::skin::lifecycle::{PageLifecycle, SkinEventArgs, SkinPhase};
use crate::skin::listener::SkinEventListener;

/// What happened during one page render
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderReport {
    pub page_id: i32,
    pub phases: Vec<SkinPhase>,
    /// Listener failures; they do not stop the render
    pub failures: Vec<SkinError>,
}

/// Fans the page lifecycle out to every subscribed listener.
pub struct SkinManager {
    name: &'static str,
    listeners: RwLock<Vec<Arc<dyn SkinEventListener>>>,
    events: Option<SharedEventDispatcher>,
}

impl fmt::Debug for SkinManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkinManager").field("name", &self.name).finish_non_exhaustive()
    }
}

impl Default for SkinManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SkinManager {
    pub fn new() -> Self {
        Self {
            name: "SkinManager",
            listeners: RwLock::new(Vec::new()),
            events: None,
        }
    }

    pub fn with_events(mut self, events: SharedEventDispatcher) -> Self {
        self.events = Some(events);
        self
    }

    pub async fn subscribe(&self, listener: Arc<dyn SkinEventListener>) {
        log::debug!("Skin listener {} subscribed", listener.name());
        self.listeners.write().await.push(listener);
    }

    pub async fn listener_count(&self) -> usize {
        self.listeners.read().await.len()
    }

    /// Run all four phases for a page, in order
    pub async fn render_page(&self, args: &SkinEventArgs) -> std::result::Result<RenderReport, SkinError> {
        let mut lifecycle = PageLifecycle::new(args.page_id);
        let mut report = RenderReport {
            page_id: args.page_id,
            ..RenderReport::default()
        };
        for phase in SkinPhase::ALL {
            let failures = self.fire(&mut lifecycle, phase, args).await?;
            report.phases.push(phase);
            report.failures.extend(failures);
        }
        Ok(report)
    }

    /// Deliver one phase for a page the host drives step by step.
    /// Out-of-order or repeated phases are rejected before any listener runs.
    pub async fn fire(
        &self,
        lifecycle: &mut PageLifecycle,
        phase: SkinPhase,
        args: &SkinEventArgs,
    ) -> std::result::Result<Vec<SkinError>, SkinError> {
        lifecycle.advance(phase)?;

        let listeners = self.listeners.read().await.clone();
        let mut failures = Vec::new();
        for listener in listeners {
            let result = match phase {
                SkinPhase::Init => listener.init(args).await,
                SkinPhase::Load => listener.load(args).await,
                SkinPhase::PreRender => listener.pre_render(args).await,
                SkinPhase::Unload => listener.unload(args).await,
            };
            if let Err(e) = result {
                log::warn!("Skin listener {} failed during {}: {}", listener.name(), phase, e);
                failures.push(SkinError::ListenerFailed {
                    listener: listener.name().to_string(),
                    phase: phase.to_string(),
                    message: e.to_string(),
                });
            }
        }

        if let Some(events) = &self.events {
            events
                .dispatch(&SystemEvent::SkinPhase {
                    page_id: args.page_id,
                    phase: phase.to_string(),
                })
                .await;
        }
        Ok(failures)
    }
}

#[async_trait]
impl KernelComponent for SkinManager {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn start(&self) -> Result<()> {
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.listeners.write().await.clear();
        Ok(())
    }
}


use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::kernel::error::{Error, Result};
use crate::skin::{SkinEventArgs, SkinEventListener, SkinPhase};

/// Listener that records every phase it sees, optionally failing one
pub(super) struct RecordingListener {
    pub label: &'static str,
    pub log: Arc<Mutex<Vec<String>>>,
    pub fail_on: Option<SkinPhase>,
}

impl RecordingListener {
    pub fn new(label: &'static str, log: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            label,
            log,
            fail_on: None,
        }
    }

    fn record(&self, phase: SkinPhase, args: &SkinEventArgs) -> Result<()> {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{}:{}", self.label, phase, args.page_id));
        if self.fail_on == Some(phase) {
            return Err(Error::from(format!("{} refused {}", self.label, phase)));
        }
        Ok(())
    }
}

#[async_trait]
impl SkinEventListener for RecordingListener {
    fn name(&self) -> &str {
        self.label
    }

    async fn init(&self, args: &SkinEventArgs) -> Result<()> {
        self.record(SkinPhase::Init, args)
    }

    async fn load(&self, args: &SkinEventArgs) -> Result<()> {
        self.record(SkinPhase::Load, args)
    }

    async fn pre_render(&self, args: &SkinEventArgs) -> Result<()> {
        self.record(SkinPhase::PreRender, args)
    }

    async fn unload(&self, args: &SkinEventArgs) -> Result<()> {
        self.record(SkinPhase::Unload, args)
    }
}

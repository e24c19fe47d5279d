use std::sync::Arc;

use crate::service::ServiceClient;
use crate::storage::PersonaBarSettings;
use crate::ui_bridge::{MessageSeverity, UnifiedUiManager, messages};

/// Services the host hands to every panel
#[derive(Debug, Clone)]
pub struct Utility {
    sf: ServiceClient,
    notifier: Arc<UnifiedUiManager>,
    settings: Arc<PersonaBarSettings>,
}

impl Utility {
    pub fn new(sf: ServiceClient, notifier: Arc<UnifiedUiManager>, settings: PersonaBarSettings) -> Self {
        Self {
            sf,
            notifier,
            settings: Arc::new(settings),
        }
    }

    /// The service facade
    pub fn sf(&self) -> &ServiceClient {
        &self.sf
    }

    pub fn settings(&self) -> &PersonaBarSettings {
        &self.settings
    }

    pub fn is_mobile(&self) -> bool {
        self.settings.mobile
    }

    pub fn sku(&self) -> &str {
        &self.settings.sku
    }

    pub fn notifier(&self) -> &Arc<UnifiedUiManager> {
        &self.notifier
    }

    pub fn notify(&self, source: &str, text: &str) {
        self.notifier.notify(messages::toast(source, text, MessageSeverity::Info));
    }

    pub fn notify_error(&self, source: &str, text: &str) {
        self.notifier.notify(messages::toast(source, text, MessageSeverity::Error));
    }
}

use std::fmt::Debug;

use crate::ui_bridge::UiMessage;
use crate::ui_bridge::error::UiBridgeError;

/// A frontend that displays kernel notifications.
///
/// Implementors are registered with the
/// [`UnifiedUiManager`](crate::ui_bridge::UnifiedUiManager), which calls
/// `initialize` once, `handle_message` for every broadcast and `finalize`
/// on shutdown.
pub trait UnifiedUiInterface: Send + Sync + Debug {
    /// Unique name, e.g. "log" or "console"
    fn name(&self) -> &str;

    fn initialize(&mut self) -> Result<(), UiBridgeError>;

    fn handle_message(&mut self, message: &UiMessage) -> Result<(), UiBridgeError>;

    fn finalize(&mut self) -> Result<(), UiBridgeError>;
}

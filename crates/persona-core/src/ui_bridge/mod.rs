//! # PersonaBar UI Bridge
//!
//! User-visible notifications. Errors are handled at the boundary closest
//! to where they happen and turned into a [`UiMessage`] (usually a toast)
//! that the [`UnifiedUiManager`] broadcasts to every registered
//! [`UnifiedUiInterface`].
pub mod error;
pub mod messages;
pub mod unified_interface;

use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;
use std::time::SystemTime;

use async_trait::async_trait;

use crate::kernel::component::KernelComponent;
use crate::kernel::error::Result as KernelResult;

pub use error::UiBridgeError;
pub use unified_interface::UnifiedUiInterface;

/// Messages kept for late-registered interfaces and inspection
pub const MESSAGE_BUFFER_LIMIT: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageSeverity {
    Debug,
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for MessageSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MessageSeverity::Debug => "debug",
            MessageSeverity::Info => "info",
            MessageSeverity::Success => "success",
            MessageSeverity::Warning => "warning",
            MessageSeverity::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiUpdateType {
    Toast(String, MessageSeverity),
    Status(String),
    Log(String, MessageSeverity),
}

impl UiUpdateType {
    pub fn kind(&self) -> &'static str {
        match self {
            UiUpdateType::Toast(..) => "toast",
            UiUpdateType::Status(_) => "status",
            UiUpdateType::Log(..) => "log",
        }
    }

    pub fn text(&self) -> &str {
        match self {
            UiUpdateType::Toast(text, _) | UiUpdateType::Status(text) | UiUpdateType::Log(text, _) => text,
        }
    }

    pub fn severity(&self) -> MessageSeverity {
        match self {
            UiUpdateType::Toast(_, severity) | UiUpdateType::Log(_, severity) => *severity,
            UiUpdateType::Status(_) => MessageSeverity::Info,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiMessage {
    pub update_type: UiUpdateType,
    /// Component or panel that raised the message
    pub source: String,
    pub timestamp: SystemTime,
}

/// Interface that forwards notifications to the `log` facade
#[derive(Debug, Default)]
pub struct LogUiInterface;

impl UnifiedUiInterface for LogUiInterface {
    fn name(&self) -> &str {
        "log"
    }

    fn initialize(&mut self) -> Result<(), UiBridgeError> {
        Ok(())
    }

    fn handle_message(&mut self, message: &UiMessage) -> Result<(), UiBridgeError> {
        let text = message.update_type.text();
        match message.update_type.severity() {
            MessageSeverity::Debug => log::debug!("[{}] {}", message.source, text),
            MessageSeverity::Info | MessageSeverity::Success => log::info!("[{}] {}", message.source, text),
            MessageSeverity::Warning => log::warn!("[{}] {}", message.source, text),
            MessageSeverity::Error => log::error!("[{}] {}", message.source, text),
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), UiBridgeError> {
        Ok(())
    }
}

/// Broadcasts notifications to every registered interface.
pub struct UnifiedUiManager {
    name: &'static str,
    interfaces: Mutex<Vec<Box<dyn UnifiedUiInterface>>>,
    message_buffer: Mutex<VecDeque<UiMessage>>,
}

impl fmt::Debug for UnifiedUiManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnifiedUiManager")
            .field("interfaces", &self.interface_names())
            .finish()
    }
}

fn lock_error(entity: &str, operation: &str) -> UiBridgeError {
    UiBridgeError::LockError {
        entity: entity.to_string(),
        operation: operation.to_string(),
    }
}

impl UnifiedUiManager {
    /// Manager with no interfaces
    pub fn new() -> Self {
        Self {
            name: "UnifiedUiManager",
            interfaces: Mutex::new(Vec::new()),
            message_buffer: Mutex::new(VecDeque::new()),
        }
    }

    /// Manager with the [`LogUiInterface`] registered
    pub fn with_log_interface() -> Self {
        let manager = Self::new();
        if let Ok(mut interfaces) = manager.interfaces.lock() {
            interfaces.push(Box::new(LogUiInterface));
        }
        manager
    }

    pub fn register_interface(&self, interface: Box<dyn UnifiedUiInterface>) -> Result<(), UiBridgeError> {
        let mut interfaces = self
            .interfaces
            .lock()
            .map_err(|_| lock_error("interfaces", "register_interface"))?;
        if interfaces.iter().any(|existing| existing.name() == interface.name()) {
            return Err(UiBridgeError::RegistrationFailed(format!(
                "an interface named '{}' is already registered",
                interface.name()
            )));
        }
        log::debug!("Registered UI interface {}", interface.name());
        interfaces.push(interface);
        Ok(())
    }

    pub fn unregister_interface(&self, name: &str) -> Result<(), UiBridgeError> {
        let mut interfaces = self
            .interfaces
            .lock()
            .map_err(|_| lock_error("interfaces", "unregister_interface"))?;
        let before = interfaces.len();
        interfaces.retain(|interface| interface.name() != name);
        if interfaces.len() == before {
            return Err(UiBridgeError::InterfaceNotFound(name.to_string()));
        }
        Ok(())
    }

    pub fn interface_names(&self) -> Vec<String> {
        self.interfaces
            .lock()
            .map(|interfaces| interfaces.iter().map(|i| i.name().to_string()).collect())
            .unwrap_or_default()
    }

    /// Buffer the message and hand it to every interface. One failing
    /// interface does not stop delivery to the others.
    pub fn broadcast(&self, message: UiMessage) -> Result<(), UiBridgeError> {
        {
            let mut buffer = self
                .message_buffer
                .lock()
                .map_err(|_| lock_error("message_buffer", "broadcast"))?;
            if buffer.len() == MESSAGE_BUFFER_LIMIT {
                buffer.pop_front();
            }
            buffer.push_back(message.clone());
        }

        let mut interfaces = self
            .interfaces
            .lock()
            .map_err(|_| lock_error("interfaces", "broadcast"))?;
        let mut failures = Vec::new();
        for interface in interfaces.iter_mut() {
            if let Err(e) = interface.handle_message(&message) {
                failures.push(UiBridgeError::InterfaceHandlingFailed {
                    interface_name: interface.name().to_string(),
                    message_type: message.update_type.kind().to_string(),
                    message: e.to_string(),
                });
            }
        }
        collect_failures(failures)
    }

    /// Broadcast and log delivery failures instead of returning them
    pub fn notify(&self, message: UiMessage) {
        if let Err(e) = self.broadcast(message) {
            log::warn!("Failed to deliver notification: {}", e);
        }
    }

    pub fn buffered_messages(&self) -> Vec<UiMessage> {
        self.message_buffer
            .lock()
            .map(|buffer| buffer.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn clear_buffer(&self) {
        if let Ok(mut buffer) = self.message_buffer.lock() {
            buffer.clear();
        }
    }

    pub fn initialize_interfaces(&self) -> Result<(), UiBridgeError> {
        self.each_interface("initialize", |interface| interface.initialize())
    }

    pub fn finalize_interfaces(&self) -> Result<(), UiBridgeError> {
        self.each_interface("finalize", |interface| interface.finalize())
    }

    fn each_interface(
        &self,
        method: &str,
        mut f: impl FnMut(&mut Box<dyn UnifiedUiInterface>) -> Result<(), UiBridgeError>,
    ) -> Result<(), UiBridgeError> {
        let mut interfaces = self.interfaces.lock().map_err(|_| lock_error("interfaces", method))?;
        let mut failures = Vec::new();
        for interface in interfaces.iter_mut() {
            if let Err(e) = f(interface) {
                failures.push(UiBridgeError::LifecycleMethodFailed {
                    interface_name: interface.name().to_string(),
                    method: method.to_string(),
                    message: e.to_string(),
                });
            }
        }
        collect_failures(failures)
    }
}

fn collect_failures(mut failures: Vec<UiBridgeError>) -> Result<(), UiBridgeError> {
    match failures.len() {
        0 => Ok(()),
        1 => Err(failures.remove(0)),
        _ => Err(UiBridgeError::MultipleInterfaceFailures(failures)),
    }
}

impl Default for UnifiedUiManager {
    fn default() -> Self {
        Self::with_log_interface()
    }
}

#[async_trait]
impl KernelComponent for UnifiedUiManager {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn initialize(&self) -> KernelResult<()> {
        self.initialize_interfaces()?;
        Ok(())
    }

    async fn start(&self) -> KernelResult<()> {
        Ok(())
    }

    async fn stop(&self) -> KernelResult<()> {
        self.finalize_interfaces()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;

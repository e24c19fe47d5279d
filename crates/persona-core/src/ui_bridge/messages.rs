//! Constructors for the notifications the kernel raises.
use std::fmt::Display;
use std::time::SystemTime;

use crate::ui_bridge::{MessageSeverity, UiMessage, UiUpdateType};

fn message(source: &str, update_type: UiUpdateType) -> UiMessage {
    UiMessage {
        update_type,
        source: source.to_string(),
        timestamp: SystemTime::now(),
    }
}

pub fn info(source: &str, text: &str) -> UiMessage {
    message(source, UiUpdateType::Log(text.to_string(), MessageSeverity::Info))
}

pub fn warning(source: &str, text: &str) -> UiMessage {
    message(source, UiUpdateType::Log(text.to_string(), MessageSeverity::Warning))
}

pub fn error(source: &str, text: &str) -> UiMessage {
    message(source, UiUpdateType::Log(text.to_string(), MessageSeverity::Error))
}

pub fn status(source: &str, text: &str) -> UiMessage {
    message(source, UiUpdateType::Status(text.to_string()))
}

/// A transient popup shown to the user
pub fn toast(source: &str, text: &str, severity: MessageSeverity) -> UiMessage {
    message(source, UiUpdateType::Toast(text.to_string(), severity))
}

/// Error toast for a panel that could not be shown
pub fn panel_failed(identifier: &str, reason: impl Display) -> UiMessage {
    toast(
        identifier,
        &format!("Panel '{}' could not be loaded: {}", identifier, reason),
        MessageSeverity::Error,
    )
}

/// Error toast for a failed server call
pub fn service_failed(route: &str, reason: impl Display) -> UiMessage {
    toast(
        route,
        &format!("Request to {} failed: {}", route, reason),
        MessageSeverity::Error,
    )
}

/// Inline validation messages; these never leave the panel
pub fn validation_failed(source: &str, errors: &[String]) -> UiMessage {
    toast(source, &errors.join("; "), MessageSeverity::Warning)
}

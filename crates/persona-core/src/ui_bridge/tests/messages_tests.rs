use crate::ui_bridge::messages;
use crate::ui_bridge::{MessageSeverity, UiUpdateType};

#[test]
fn test_log_helpers_set_severity() {
    let cases = [
        (messages::info("menu", "loaded"), MessageSeverity::Info),
        (messages::warning("menu", "loaded"), MessageSeverity::Warning),
        (messages::error("menu", "loaded"), MessageSeverity::Error),
    ];
    for (message, severity) in cases {
        assert_eq!(message.source, "menu");
        assert_eq!(message.update_type, UiUpdateType::Log("loaded".to_string(), severity));
    }
}

#[test]
fn test_status_defaults_to_info() {
    let message = messages::status("shell", "ready");
    assert_eq!(message.update_type.kind(), "status");
    assert_eq!(message.update_type.severity(), MessageSeverity::Info);
    assert_eq!(message.update_type.text(), "ready");
}

#[test]
fn test_panel_failed_is_error_toast() {
    let message = messages::panel_failed("Dnn.AdminLogs", "bundle missing");
    assert_eq!(message.source, "Dnn.AdminLogs");
    match message.update_type {
        UiUpdateType::Toast(text, MessageSeverity::Error) => {
            assert!(text.contains("Dnn.AdminLogs"));
            assert!(text.contains("bundle missing"));
        }
        other => panic!("Expected error toast, got {:?}", other),
    }
}

#[test]
fn test_validation_failed_joins_errors() {
    let errors = vec!["Name is required".to_string(), "Frequency must be at least 1".to_string()];
    let message = messages::validation_failed("scheduler", &errors);
    assert_eq!(message.update_type.severity(), MessageSeverity::Warning);
    assert_eq!(message.update_type.text(), "Name is required; Frequency must be at least 1");
}

#[test]
fn test_severity_display() {
    assert_eq!(MessageSeverity::Success.to_string(), "success");
    assert!(MessageSeverity::Error > MessageSeverity::Warning);
}

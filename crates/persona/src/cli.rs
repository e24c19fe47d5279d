use persona_core::ui_bridge::{MessageSeverity, UiBridgeError, UiMessage, UnifiedUiInterface};

/// Prints notifications to stderr so command output on stdout stays clean.
#[derive(Debug, Default)]
pub struct CliInterface {
    verbose: bool,
}

impl CliInterface {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl UnifiedUiInterface for CliInterface {
    fn name(&self) -> &str {
        "cli"
    }

    fn initialize(&mut self) -> Result<(), UiBridgeError> {
        Ok(())
    }

    fn handle_message(&mut self, message: &UiMessage) -> Result<(), UiBridgeError> {
        let severity = message.update_type.severity();
        if severity == MessageSeverity::Debug && !self.verbose {
            return Ok(());
        }
        eprintln!("[{}] {}: {}", severity, message.source, message.update_type.text());
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), UiBridgeError> {
        Ok(())
    }
}

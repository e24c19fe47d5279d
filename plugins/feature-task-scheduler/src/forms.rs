use persona_core::service::FormValidator;

/// Create/update form for a schedule item
pub fn schedule_item_validator() -> FormValidator {
    FormValidator::new()
        .required("FriendlyName", "Friendly Name")
        .max_length("FriendlyName", "Friendly Name", 200)
        .required("TypeFullName", "Full Class Name and Assembly")
        .range("TimeLapse", "Frequency", Some(0.0), None)
        .range("RetryTimeLapse", "Retry Time Lapse", Some(0.0), None)
        .range("RetainHistoryNum", "Retain Schedule History", Some(0.0), None)
}

pub fn settings_validator() -> FormValidator {
    FormValidator::new()
        .required("SchedulerMode", "Scheduler Mode")
        .range("SchedulerdelayAtAppStart", "Schedule Delay", Some(0.0), Some(1440.0))
}

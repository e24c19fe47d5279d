use serde_json::{Map, Value};

use crate::service::error::FieldError;

#[derive(Debug, Clone, PartialEq)]
enum Rule {
    Required,
    Range { min: Option<f64>, max: Option<f64> },
    MaxLength(usize),
}

#[derive(Debug, Clone, PartialEq)]
struct FieldRule {
    field: String,
    label: String,
    rule: Rule,
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Client-side form checks run before a write is submitted.
///
/// Optional rules skip absent or blank fields; pair them with `required`
/// when the field must be present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValidator {
    rules: Vec<FieldRule>,
}

impl FormValidator {
    pub fn new() -> Self {
        Self::default()
    }

    fn rule(mut self, field: &str, label: &str, rule: Rule) -> Self {
        self.rules.push(FieldRule {
            field: field.to_string(),
            label: label.to_string(),
            rule,
        });
        self
    }

    pub fn required(self, field: &str, label: &str) -> Self {
        self.rule(field, label, Rule::Required)
    }

    pub fn range(self, field: &str, label: &str, min: Option<f64>, max: Option<f64>) -> Self {
        self.rule(field, label, Rule::Range { min, max })
    }

    pub fn max_length(self, field: &str, label: &str, max: usize) -> Self {
        self.rule(field, label, Rule::MaxLength(max))
    }

    /// All failures, in rule order
    pub fn validate(&self, form: &Map<String, Value>) -> Result<(), Vec<FieldError>> {
        let errors: Vec<FieldError> = self
            .rules
            .iter()
            .filter_map(|rule| check(rule, form.get(&rule.field)))
            .collect();
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn check(rule: &FieldRule, value: Option<&Value>) -> Option<FieldError> {
    let fail = |message: String| {
        Some(FieldError {
            field: rule.field.clone(),
            message,
        })
    };
    let present = value.filter(|v| !is_blank(v));

    match (&rule.rule, present) {
        (Rule::Required, None) => fail(format!("{} is required", rule.label)),
        (Rule::Required, Some(_)) | (_, None) => None,
        (Rule::Range { min, max }, Some(value)) => match as_number(value) {
            None => fail(format!("{} must be a number", rule.label)),
            Some(n) if min.is_some_and(|min| n < min) => {
                fail(format!("{} must be at least {}", rule.label, min.unwrap_or_default()))
            }
            Some(n) if max.is_some_and(|max| n > max) => {
                fail(format!("{} must be at most {}", rule.label, max.unwrap_or_default()))
            }
            Some(_) => None,
        },
        (Rule::MaxLength(max), Some(value)) => {
            let length = value.as_str().map(|s| s.chars().count()).unwrap_or(0);
            if length > *max {
                fail(format!("{} must be at most {} characters", rule.label, max))
            } else {
                None
            }
        }
    }
}

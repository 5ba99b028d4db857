//! Table-driven form validation.
//!
//! A form exposes its string fields by name through [`FormFields`]; a static
//! table of [`FieldRule`]s lists the constraints for each field and
//! [`validate`] evaluates every rule the same way. Errors are collected per
//! field so the caller can redisplay the form with messages next to inputs.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::constants::DATE_TIME_ERROR;
use crate::utils::datetime::parse_event_time;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Present and not blank.
    Required,
    /// Inclusive bounds, counted in characters.
    Length { min: usize, max: usize },
    /// Parses against the event date format.
    DateTime,
    /// A whole number, as sent by a select box.
    Integer,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub constraints: &'static [Constraint],
}

pub trait FormFields {
    fn field(&self, name: &str) -> Option<&str>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Constraint {
    fn check(&self, field: &str, value: &str) -> Option<String> {
        match *self {
            Constraint::Required => {
                if value.trim().is_empty() {
                    Some(format!("The {} field is required.", field))
                } else {
                    None
                }
            }
            Constraint::Length { min, max } => {
                let len = value.chars().count();
                if len < min || len > max {
                    Some(format!(
                        "The field {} must be between {} and {} characters long.",
                        field, min, max
                    ))
                } else {
                    None
                }
            }
            Constraint::DateTime => {
                if parse_event_time(value).is_none() {
                    Some(DATE_TIME_ERROR.to_string())
                } else {
                    None
                }
            }
            Constraint::Integer => match value.trim().parse::<i32>() {
                Ok(_) => None,
                Err(_) => Some(format!("The field {} must be a number.", field)),
            },
        }
    }
}

/// Evaluates `rules` against `form`. A field stops at its first failing
/// constraint, so a blank value reports "required" only.
pub fn validate<F: FormFields>(form: &F, rules: &[FieldRule]) -> FieldErrors {
    let mut errors = FieldErrors::new();

    for rule in rules {
        let value = form.field(rule.field).unwrap_or_default();
        let failure = rule
            .constraints
            .iter()
            .find_map(|constraint| constraint.check(rule.field, value));

        if let Some(message) = failure {
            errors.add(rule.field, message);
        }
    }

    errors
}

//! Field-level validation for password items.
//!
//! Problems are collected rather than short-circuited so that a caller (a form,
//! the CLI) can surface every message at once.

use std::fmt;

use serde::Serialize;

use super::item::{ItemDraft, PasswordItem};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Ordered set of per-field messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: &'static str) {
        self.0.push(FieldError { field, message });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// First message reported for `field`.
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<_> = self
            .0
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect();
        f.write_str(&messages.join("; "))
    }
}

fn check_name(name: &str, errors: &mut FieldErrors) {
    if name.is_empty() {
        errors.push("name", "Name is required");
    }
}

fn check_password(password: &str, errors: &mut FieldErrors) {
    if password.is_empty() {
        errors.push("password", "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push("password", "Password must be at least 8 characters long");
    }
}

fn check_uri(uri: Option<&str>, errors: &mut FieldErrors) {
    match uri {
        None | Some("") => {}
        Some(uri) if uri.starts_with("http://") || uri.starts_with("https://") => {}
        Some(_) => errors.push("uri", "URI must start with http:// or https://"),
    }
}

pub fn validate_draft(draft: &ItemDraft) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_name(&draft.name, &mut errors);
    check_password(&draft.password, &mut errors);
    check_uri(draft.uri.as_deref(), &mut errors);
    if draft.folder.is_none() {
        errors.push("folder", "Must select a folder");
    }
    errors.into_result()
}

/// Validate a complete record, e.g. the result of applying a diff.
pub fn validate_item(item: &PasswordItem) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_name(&item.name, &mut errors);
    check_password(&item.password, &mut errors);
    check_uri(item.uri.as_deref(), &mut errors);
    errors.into_result()
}

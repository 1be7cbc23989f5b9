//! # Field validation for account forms
//!
//! Everything here runs before a request is built: a draft that fails
//! validation never reaches the network. Errors are collected per field so
//! the form can highlight every problem at once.
//!
//! | Field | Rule |
//! |-------|------|
//! | name | non-blank |
//! | email | non-blank, `local@domain.tld` shape, no whitespace |
//! | phone | non-blank, optional `+`, 7–15 digits, first digit 1–9; spaces, dashes, dots and parentheses are ignored |
//! | password | required on create; when present, at least [`MIN_PASSWORD_LEN`] characters with an uppercase letter, a lowercase letter and a digit |
//!
//! A blank password on update is not an error: it is dropped from the
//! request so the server keeps the stored one.

use std::fmt;

use api::UserDraft;

pub const MIN_PASSWORD_LEN: usize = 8;

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

/// A form field that can fail validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Phone,
    Password,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Password => "password",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field and what is wrong with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub reason: String,
}

/// All field problems found in one submission, in form order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: Field, reason: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            reason: reason.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether `field` failed.
    pub fn has(&self, field: Field) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// The first reason recorded for `field`.
    pub fn reason(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.reason.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{} {}", error.field, error.reason)?;
        }
        Ok(())
    }
}

/// Which operation a draft is submitted for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DraftKind {
    Create,
    Update,
}

/// Validate an account draft.
pub fn validate_draft(draft: &UserDraft, kind: DraftKind) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if draft.name.trim().is_empty() {
        errors.push(Field::Name, "is required");
    }

    let email = draft.email.trim();
    if email.is_empty() {
        errors.push(Field::Email, "is required");
    } else if !is_valid_email(email) {
        errors.push(Field::Email, "is not a valid email address");
    }

    let phone = draft.phone.trim();
    if phone.is_empty() {
        errors.push(Field::Phone, "is required");
    } else if !is_valid_phone(phone) {
        errors.push(Field::Phone, "is not a valid phone number");
    }

    let password = draft.password.as_deref().unwrap_or("");
    if password.trim().is_empty() {
        if kind == DraftKind::Create {
            errors.push(Field::Password, "is required");
        }
    } else if let Some(reason) = password_problem(password) {
        errors.push(Field::Password, reason);
    }

    errors.into_result()
}

/// Validate the login form. Only presence is checked: the server decides
/// whether the credentials are right.
pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if email.trim().is_empty() {
        errors.push(Field::Email, "is required");
    }
    if password.is_empty() {
        errors.push(Field::Password, "is required");
    }
    errors.into_result()
}

/// Trim text fields and drop a blank password.
pub fn normalize_draft(draft: &UserDraft) -> UserDraft {
    UserDraft {
        name: draft.name.trim().to_string(),
        email: draft.email.trim().to_string(),
        phone: draft.phone.trim().to_string(),
        password: draft
            .password
            .as_ref()
            .filter(|p| !p.trim().is_empty())
            .cloned(),
        role: draft.role,
    }
}

/// Basic `local@domain.tld` shape check.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    })
}

/// Basic international phone number shape check.
pub fn is_valid_phone(phone: &str) -> bool {
    let compact: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();
    let digits = compact.strip_prefix('+').unwrap_or(&compact);
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len()) {
        return false;
    }
    !digits.starts_with('0')
}

/// Describe what a password is missing, or `None` when it is strong enough.
pub fn password_problem(password: &str) -> Option<String> {
    let mut missing = Vec::new();
    if !password.chars().any(|c| c.is_uppercase()) {
        missing.push("an uppercase letter");
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        missing.push("a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        missing.push("a digit");
    }
    let too_short = password.chars().count() < MIN_PASSWORD_LEN;

    match (too_short, missing.is_empty()) {
        (false, true) => None,
        (true, true) => Some(format!("must be at least {MIN_PASSWORD_LEN} characters")),
        (false, false) => Some(format!("must include {}", missing.join(" and "))),
        (true, false) => Some(format!(
            "must be at least {MIN_PASSWORD_LEN} characters and include {}",
            missing.join(" and ")
        )),
    }
}

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::api::{
    LoginRequest, MigrateShardRequest, NewBlog, RegisterRequest, UpdateBlogRequest,
    UpdateUserRequest,
};
use crate::constants::{MIN_PASSWORD_LEN, MIN_USERNAME_LEN};
use crate::session::Session;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every problem found in a form, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// First message for `field`, if it was rejected
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| {
                if e.field.is_empty() {
                    e.message.clone()
                } else {
                    format!("{}: {}", e.field, e.message)
                }
            })
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

fn required(errors: &mut ValidationErrors, field: &'static str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, "Required");
        false
    } else {
        true
    }
}

fn min_len(errors: &mut ValidationErrors, field: &'static str, value: &str, min: usize, message: &str) {
    if value.chars().count() < min {
        errors.add(field, message);
    }
}

fn email(errors: &mut ValidationErrors, value: &str) {
    if !EMAIL_RE.is_match(value) {
        errors.add("email", "Invalid email");
    }
}

pub fn validate_register(form: &RegisterRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    required(&mut errors, "name", &form.name);
    min_len(&mut errors, "username", &form.username, MIN_USERNAME_LEN, "Min 3 chars");
    email(&mut errors, &form.email);
    min_len(&mut errors, "password", &form.password, MIN_PASSWORD_LEN, "At least 6 characters");
    errors.into_result()
}

pub fn validate_login(form: &LoginRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    required(&mut errors, "username_email", &form.username_email);
    min_len(&mut errors, "password", &form.password, MIN_PASSWORD_LEN, "At least 6 characters");
    errors.into_result()
}

fn require_login(errors: &mut ValidationErrors, session: &Session) {
    if !session.is_authenticated() {
        errors.add("", "You must be logged in.");
    }
}

pub fn validate_new_blog(form: &NewBlog, session: &Session) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    require_login(&mut errors, session);
    required(&mut errors, "title", &form.title);
    required(&mut errors, "body", &form.body);
    errors.into_result()
}

/// Edits send only what changed, but whatever is sent must not be blank
pub fn validate_blog_update(form: &UpdateBlogRequest, session: &Session) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    require_login(&mut errors, session);
    if form.title.is_none() && form.body.is_none() {
        errors.add("", "Nothing to update");
    }
    if let Some(title) = &form.title {
        required(&mut errors, "title", title);
    }
    if let Some(body) = &form.body {
        required(&mut errors, "body", body);
    }
    errors.into_result()
}

/// Drop blank fields (an empty password means "keep the current one")
pub fn normalize_user_update(mut form: UpdateUserRequest) -> UpdateUserRequest {
    fn keep(value: Option<String>) -> Option<String> {
        value.filter(|v| !v.trim().is_empty())
    }
    form.username = keep(form.username);
    form.email = keep(form.email);
    form.name = keep(form.name);
    form.password = keep(form.password);
    form
}

pub fn validate_user_update(form: &UpdateUserRequest, session: &Session) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    require_login(&mut errors, session);
    if form.is_empty() {
        errors.add("", "Nothing to update");
    }
    if let Some(username) = &form.username {
        min_len(&mut errors, "username", username, MIN_USERNAME_LEN, "Min 3 chars");
    }
    if let Some(value) = &form.email {
        email(&mut errors, value);
    }
    if let Some(password) = &form.password {
        min_len(&mut errors, "password", password, MIN_PASSWORD_LEN, "At least 6 characters");
    }
    errors.into_result()
}

pub fn validate_delete_account(password: &str, session: &Session) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    require_login(&mut errors, session);
    required(&mut errors, "password", password);
    errors.into_result()
}

pub fn validate_blog_delete(session: &Session) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    require_login(&mut errors, session);
    errors.into_result()
}

/// The shard dashboard is only reachable with a session; roles are the backend's call
pub fn validate_admin_access(session: &Session) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    require_login(&mut errors, session);
    errors.into_result()
}

pub fn validate_migration(form: &MigrateShardRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if form.id <= 0 {
        errors.add("id", "Must be a positive id");
    }
    required(&mut errors, "target", &form.target);
    errors.into_result()
}

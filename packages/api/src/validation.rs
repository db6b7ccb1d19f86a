//! Request payload validation.
//!
//! Payloads are deserialised with every field optional, then checked field by field in
//! declaration order. The first violation wins and is reported as a [`ValidationError`]
//! naming that field. Validation never touches storage.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use store::{NoteDraft, NotePatch};
use thiserror::Error;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

const MIN_NAME_LEN: usize = 2;
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Error, PartialEq)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    value.ok_or_else(|| ValidationError::new(field, format!("{field} is required")))
}

fn min_len(field: &'static str, value: &str, min: usize) -> Result<(), ValidationError> {
    if value.chars().count() < min {
        let unit = if min == 1 { "character" } else { "characters" };
        return Err(ValidationError::new(
            field,
            format!("{field} must contain at least {min} {unit}"),
        ));
    }
    Ok(())
}

fn email(value: Option<String>) -> Result<String, ValidationError> {
    let value = required("email", value)?.trim().to_lowercase();
    if !EMAIL.is_match(&value) {
        return Err(ValidationError::new("email", "Invalid email"));
    }
    Ok(value)
}

fn password(value: Option<String>) -> Result<String, ValidationError> {
    let value = required("password", value)?;
    min_len("password", &value, MIN_PASSWORD_LEN)?;
    Ok(value)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signup {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl SignupPayload {
    pub fn validate(self) -> Result<Signup, ValidationError> {
        let full_name = required("fullName", self.full_name)?;
        min_len("fullName", &full_name, MIN_NAME_LEN)?;
        Ok(Signup {
            full_name,
            email: email(self.email)?,
            password: password(self.password)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Login {
    pub email: String,
    pub password: String,
}

impl LoginPayload {
    pub fn validate(self) -> Result<Login, ValidationError> {
        Ok(Login {
            email: email(self.email)?,
            password: password(self.password)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateNotePayload {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl CreateNotePayload {
    pub fn validate(self) -> Result<NoteDraft, ValidationError> {
        let content = required("content", self.content)?;
        min_len("content", &content, 1)?;
        Ok(NoteDraft {
            title: self.title.unwrap_or_default(),
            content,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateNotePayload {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl UpdateNotePayload {
    /// Both fields are optional; a present `content` must be non-empty.
    pub fn validate(self) -> Result<NotePatch, ValidationError> {
        if let Some(content) = &self.content {
            min_len("content", content, 1)?;
        }
        Ok(NotePatch {
            title: self.title,
            content: self.content,
        })
    }
}

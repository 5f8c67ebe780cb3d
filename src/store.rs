//! Record stores backing the CRUD surface.
//!
//! Each store wraps a borrowed SeaORM connection (a pool or an open
//! transaction) and enforces the field constraints before touching the
//! database. Multi-step writes run inside a transaction of their own.

pub mod accounts;
pub mod users;

pub use accounts::{AccountChanges, AccountForm, AccountStore, SaveOutcome};
pub use users::{UserChanges, UserForm, UserStore};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use model::USER_NAME_MAX_LENGTH;
use sea_orm::DbErr;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::{error, warn};
use validator::{ValidationError, ValidationErrors};

use crate::schemas::ErrorResponse;

/// Key under which errors that are not tied to a single field are reported.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Validation messages keyed by field name (camelCase, as sent by clients).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::default();
        for (field, errs) in errors.field_errors() {
            let key = camel_case(&field);
            for err in errs {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", key));
                fields.add(key.clone(), message);
            }
        }
        fields
    }
}

/// Errors surfaced by the stores.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The referenced record does not exist
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// A field constraint was violated
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl StoreError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::Validation(FieldErrors::single(field, message))
    }

    fn code(&self) -> &'static str {
        match self {
            StoreError::NotFound { .. } => "NOT_FOUND",
            StoreError::Validation(_) => "VALIDATION_ERROR",
            StoreError::Database(_) => "DATABASE_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::Validation(_) => StatusCode::BAD_REQUEST,
            StoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for StoreError {
    fn from(errors: ValidationErrors) -> Self {
        StoreError::Validation(errors.into())
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code().to_string();
        let body = match self {
            StoreError::NotFound { .. } => {
                warn!("{}", self);
                ErrorResponse {
                    error: self.to_string(),
                    code,
                    success: false,
                    fields: None,
                }
            }
            StoreError::Validation(fields) => {
                warn!("Rejected invalid input: {}", fields);
                ErrorResponse {
                    error: "Please correct the errors below.".to_string(),
                    code,
                    success: false,
                    fields: Some(fields.into_map()),
                }
            }
            StoreError::Database(db_error) => {
                error!("Database error: {:?}", db_error);
                ErrorResponse {
                    error: "A database error occurred".to_string(),
                    code,
                    success: false,
                    fields: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Custom validator for `userName`: required and at most `USER_NAME_MAX_LENGTH`
/// characters once surrounding whitespace is stripped.
pub(crate) fn validate_user_name(value: &str) -> std::result::Result<(), ValidationError> {
    let value = value.trim();
    let length = value.chars().count();
    if value.is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some(Cow::from("This field is required."));
        return Err(err);
    }
    if length > USER_NAME_MAX_LENGTH {
        let mut err = ValidationError::new("max_length");
        err.message = Some(Cow::from(format!(
            "Ensure this value has at most {} characters (it has {}).",
            USER_NAME_MAX_LENGTH, length
        )));
        err.add_param(Cow::from("max"), &USER_NAME_MAX_LENGTH);
        err.add_param(Cow::from("value"), &length);
        return Err(err);
    }
    Ok(())
}

/// Names are stored without surrounding whitespace, as Django's `CharField` cleans them.
pub(crate) fn clean_user_name(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

/// Validator reports Rust field names; clients speak camelCase.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

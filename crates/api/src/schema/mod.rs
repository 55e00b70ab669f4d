//! Request validation.
//!
//! Each entity has an explicit schema that turns a JSON request body into a
//! validated field set (`UserInput`, `ProductInput`, ...). A schema checks
//! every field before giving up, so one 400 response reports all problems:
//!
//! ```json
//! {"email": ["Missing data for required field."], "name": ["Not a valid string."]}
//! ```
//!
//! Responses go the other way through the serde `Serialize` impls on
//! [`crate::models`].

pub mod order;
pub mod product;
pub mod user;

use std::collections::BTreeMap;
use std::fmt;

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{HeaderMap, header};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::{Map, Value};

use shopfront_core::{Email, EmailError, Price, PriceError};

use crate::error::AppError;

pub use order::{OrderSchema, RemoveProductSchema};
pub use product::ProductSchema;
pub use user::UserSchema;

pub const MISSING: &str = "Missing data for required field.";
pub const NULL: &str = "Field may not be null.";
pub const UNKNOWN: &str = "Unknown field.";
pub const INVALID_INPUT: &str = "Invalid input type.";
pub const NOT_STRING: &str = "Not a valid string.";
pub const NOT_INTEGER: &str = "Not a valid integer.";
pub const NOT_NUMBER: &str = "Not a valid number.";
pub const NOT_DATETIME: &str = "Not a valid datetime.";
pub const NOT_EMAIL: &str = "Not a valid email address.";
pub const NEGATIVE: &str = "Must be greater than or equal to 0.";

/// Key used for errors that concern the body as a whole.
pub const SCHEMA_KEY: &str = "_schema";

/// Field-level validation messages, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// An empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An error about the body itself rather than a field.
    #[must_use]
    pub fn schema(message: &str) -> Self {
        let mut errors = Self::new();
        errors.add(SCHEMA_KEY, message);
        errors
    }

    /// Record a message against a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for one field.
    #[must_use]
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }
}

impl fmt::Display for ValidationErrors {
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

impl std::error::Error for ValidationErrors {}

/// A schema that loads a validated field set from a JSON body.
pub trait Schema {
    /// The validated field set.
    type Output;

    /// Validate `body` and build the field set.
    ///
    /// # Errors
    ///
    /// Returns every field-level problem found in `body`.
    fn load(body: &Value) -> Result<Self::Output, ValidationErrors>;
}

/// Cursor over a JSON object body that records errors as fields are read.
///
/// Every accessor that returns `None` has recorded an error, so
/// [`Fields::finish`] only succeeds when all accessors succeeded.
pub struct Fields<'a> {
    object: &'a Map<String, Value>,
    errors: ValidationErrors,
}

impl<'a> Fields<'a> {
    /// Start reading `body`, rejecting non-objects and keys outside `known`.
    ///
    /// # Errors
    ///
    /// Returns a `_schema` error if `body` is not a JSON object.
    pub fn new(body: &'a Value, known: &[&str]) -> Result<Self, ValidationErrors> {
        let Value::Object(object) = body else {
            return Err(ValidationErrors::schema(INVALID_INPUT));
        };

        let mut errors = ValidationErrors::new();
        for key in object.keys() {
            if !known.contains(&key.as_str()) {
                errors.add(key, UNKNOWN);
            }
        }

        Ok(Self { object, errors })
    }

    /// Look up a key, recording missing/null problems for required fields.
    fn present(&mut self, key: &str, required: bool, nullable: bool) -> Option<Option<&'a Value>> {
        let object = self.object;
        match object.get(key) {
            None if required => {
                self.errors.add(key, MISSING);
                None
            }
            None => Some(None),
            Some(Value::Null) if nullable => Some(None),
            Some(Value::Null) => {
                self.errors.add(key, NULL);
                None
            }
            Some(value) => Some(Some(value)),
        }
    }

    /// A required string of at most `max_len` characters.
    pub fn required_string(&mut self, key: &str, max_len: usize) -> Option<String> {
        let value = self.present(key, true, false)??;
        self.string(key, value, max_len)
    }

    /// An optional, nullable string of at most `max_len` characters.
    pub fn optional_string(&mut self, key: &str, max_len: usize) -> Option<Option<String>> {
        match self.present(key, false, true)? {
            Some(value) => self.string(key, value, max_len).map(Some),
            None => Some(None),
        }
    }

    fn string(&mut self, key: &str, value: &Value, max_len: usize) -> Option<String> {
        let Value::String(s) = value else {
            self.errors.add(key, NOT_STRING);
            return None;
        };
        if s.chars().count() > max_len {
            self.errors
                .add(key, format!("Longer than maximum length {max_len}."));
            return None;
        }
        Some(s.clone())
    }

    /// A required email address.
    pub fn required_email(&mut self, key: &str) -> Option<Email> {
        let value = self.present(key, true, false)??;
        let Value::String(s) = value else {
            self.errors.add(key, NOT_STRING);
            return None;
        };
        match Email::parse(s) {
            Ok(email) => Some(email),
            Err(EmailError::TooLong { max }) => {
                self.errors
                    .add(key, format!("Longer than maximum length {max}."));
                None
            }
            Err(_) => {
                self.errors.add(key, NOT_EMAIL);
                None
            }
        }
    }

    /// A required, non-negative price given as a JSON number or numeric string.
    pub fn required_price(&mut self, key: &str) -> Option<Price> {
        let value = self.present(key, true, false)??;
        let parsed = match value {
            Value::Number(n) => n.as_f64().map_or(Err(PriceError::NotANumber), Price::from_f64),
            Value::String(s) => Price::parse(s),
            _ => Err(PriceError::NotANumber),
        };
        match parsed {
            Ok(price) => Some(price),
            Err(PriceError::Negative) => {
                self.errors.add(key, NEGATIVE);
                None
            }
            Err(PriceError::NotANumber) => {
                self.errors.add(key, NOT_NUMBER);
                None
            }
        }
    }

    /// A required integer ID.
    pub fn required_id<T: From<i32>>(&mut self, key: &str) -> Option<T> {
        let value = self.present(key, true, false)??;
        self.integer(key, value).map(T::from)
    }

    /// An optional integer; read for validation only.
    pub fn optional_integer(&mut self, key: &str) -> Option<Option<i32>> {
        match self.present(key, false, true)? {
            Some(value) => self.integer(key, value).map(Some),
            None => Some(None),
        }
    }

    fn integer(&mut self, key: &str, value: &Value) -> Option<i32> {
        let parsed = match value {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() <= f64::from(i32::MAX))
                    .map(|f| f as i64)
            }),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        match parsed.and_then(|n| i32::try_from(n).ok()) {
            Some(n) => Some(n),
            None => {
                self.errors.add(key, NOT_INTEGER);
                None
            }
        }
    }

    /// An optional, non-null timestamp. Offsets are converted to UTC.
    pub fn optional_datetime(&mut self, key: &str) -> Option<Option<NaiveDateTime>> {
        let Some(value) = self.present(key, false, false)? else {
            return Some(None);
        };
        match value.as_str().and_then(parse_datetime) {
            Some(dt) => Some(Some(dt)),
            None => {
                self.errors.add(key, NOT_DATETIME);
                None
            }
        }
    }

    /// Finish reading and build the field set.
    ///
    /// # Errors
    ///
    /// Returns all recorded errors if any accessor failed or a key was unknown.
    pub fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, ValidationErrors> {
        match build() {
            Some(value) if self.errors.is_empty() => Ok(value),
            _ => Err(self.errors),
        }
    }
}

/// Parse an ISO 8601 timestamp (`T` or space separated, optional fraction,
/// optional offset) or a bare date (midnight).
fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    let s = s.trim();
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc()))
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// A request body that is parsed as JSON only when a schema loads it.
///
/// Extraction reads the raw bytes and never fails on syntax, so handlers
/// decide when a malformed body is reported (for example after confirming
/// the target row exists).
#[derive(Debug, Clone)]
pub struct JsonBody {
    bytes: Bytes,
    is_json: bool,
}

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = has_json_content_type(req.headers());
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(error = %rejection, "Failed to read request body");
            AppError::Validation(ValidationErrors::schema(INVALID_INPUT))
        })?;
        Ok(Self { bytes, is_json })
    }
}

impl JsonBody {
    /// Wrap a raw body, as extraction would.
    #[must_use]
    pub fn new(bytes: impl Into<Bytes>, is_json: bool) -> Self {
        Self {
            bytes: bytes.into(),
            is_json,
        }
    }

    /// Parse the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns a `_schema` error if the content type is not JSON or the
    /// bytes are not valid JSON.
    pub fn value(&self) -> Result<Value, ValidationErrors> {
        if !self.is_json {
            return Err(ValidationErrors::schema(INVALID_INPUT));
        }
        serde_json::from_slice(&self.bytes).map_err(|e| {
            tracing::debug!(error = %e, "Rejected request body");
            ValidationErrors::schema(INVALID_INPUT)
        })
    }

    /// Parse and validate the body with schema `S`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` with every field-level problem.
    pub fn load<S: Schema>(&self) -> Result<S::Output, AppError> {
        let value = self.value()?;
        S::load(&value).map_err(AppError::Validation)
    }
}

/// `application/json` or any `application/*+json` type.
fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

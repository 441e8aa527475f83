//! User entity and related types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use super::validation::{
    clean_name, validate_email, validate_user_id, EmailPolicy, UserValidationError,
};

/// User identifier - strictly positive integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Create a new UserId after validation
    pub fn new(id: i64) -> Result<Self, UserValidationError> {
        validate_user_id(id)?;
        Ok(Self(id))
    }

    /// Get the inner integer value
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User entity
///
/// Every field is validated once in the constructor and never changes
/// afterwards, so a `User` value is always well formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
}

impl User {
    /// Create a new user, trimming the name and checking every field
    pub fn new(
        id: i64,
        name: impl AsRef<str>,
        email: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let email = email.into();

        let result = Self::validated(id, name.as_ref(), email);
        match &result {
            Ok(user) => debug!(
                user_id = %user.id,
                name = %user.name,
                email = %user.email,
                "User created"
            ),
            Err(e) => error!(user_id = id, error = %e, "User validation failed"),
        }

        result
    }

    /// Create a new user and additionally run the email through `policy`
    pub fn with_policy(
        id: i64,
        name: impl AsRef<str>,
        email: impl Into<String>,
        policy: &dyn EmailPolicy,
    ) -> Result<Self, UserValidationError> {
        let user = Self::new(id, name, email)?;

        policy.check(&user.email).inspect_err(|e| {
            error!(user_id = %user.id, error = %e, "User email rejected by policy");
        })?;

        Ok(user)
    }

    /// Create a user from untyped JSON values
    ///
    /// Fails with a type error when `id` is not an integer or `name`/`email`
    /// are not strings, before any value checks run.
    pub fn from_values(id: &Value, name: &Value, email: &Value) -> Result<Self, UserValidationError> {
        let id = user_id_from_value(id)?;

        let name = name.as_str().ok_or(UserValidationError::NameNotString {
            found: json_type_name(name),
        })?;

        let email = email.as_str().ok_or(UserValidationError::EmailNotString {
            found: json_type_name(email),
        })?;

        Self::new(id, name, email)
    }

    fn validated(id: i64, name: &str, email: String) -> Result<Self, UserValidationError> {
        let id = UserId::new(id)?;
        let name = clean_name(name)?;
        validate_email(&email)?;

        Ok(Self { id, name, email })
    }

    // Getters

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - ID: {}, Email: {}", self.name, self.id, self.email)
    }
}

/// Read a user id from an untyped JSON value
///
/// Only integers are accepted; integers beyond `i64` are out of range.
pub(crate) fn user_id_from_value(value: &Value) -> Result<i64, UserValidationError> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(id) => Ok(id),
            None if n.is_u64() => Err(UserValidationError::IdOutOfRange(n.to_string())),
            None => Err(UserValidationError::IdNotInteger { found: "float" }),
        },
        other => Err(UserValidationError::IdNotInteger {
            found: json_type_name(other),
        }),
    }
}

/// Short name of a JSON value's type for error messages
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

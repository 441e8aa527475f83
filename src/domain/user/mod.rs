//! User domain
//!
//! This module provides the user entity together with the validation rules
//! applied when a user is constructed.

mod entity;
mod validation;

pub(crate) use entity::{json_type_name, user_id_from_value};
pub use entity::{User, UserId};
pub use validation::{
    clean_name, validate_email, validate_user_id, EmailPolicy, EmailPolicyKind,
    PermissiveEmailPolicy, StrictEmailPolicy, UserValidationError, MAX_NAME_LENGTH,
    MIN_NAME_LENGTH,
};

//! Field rules for the sign-in form.

use super::types::Credentials;
use regex::Regex;
use std::fmt;

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const INVALID_EMAIL: &str = "Invalid email";
pub const PASSWORD_REQUIRED: &str = "Password is required";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Email,
    Password,
}

impl Field {
    pub const ALL: [Self; 2] = [Self::Email, Self::Password];

    /// Form field name, matching the JSON key sent to the API.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-field validation result; `None` means the field is valid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    email: Option<&'static str>,
    password: Option<&'static str>,
}

impl FieldErrors {
    #[must_use]
    pub const fn get(&self, field: Field) -> Option<&'static str> {
        match field {
            Field::Email => self.email,
            Field::Password => self.password,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }

    /// Fields that currently have an error, in form order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        Field::ALL
            .into_iter()
            .filter_map(move |field| self.get(field).map(|message| (field, message)))
    }
}

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Validates both fields. The required check takes precedence over the email
/// syntax check; values are not trimmed.
#[must_use]
pub fn validate(credentials: &Credentials) -> FieldErrors {
    let email = if credentials.email.is_empty() {
        Some(EMAIL_REQUIRED)
    } else if valid_email(&credentials.email) {
        None
    } else {
        Some(INVALID_EMAIL)
    };

    let password = credentials.password.is_empty().then_some(PASSWORD_REQUIRED);

    FieldErrors { email, password }
}

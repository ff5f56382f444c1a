//! Request and response payloads for the auth API. Credentials carry the raw
//! password and the login response carries the access token, so neither may be
//! logged; their `Debug` output is redacted.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Form values posted to the login endpoint as `{ "email", "password" }`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Body of a 2xx login response, kept as raw JSON.
///
/// The token is read lazily from `data.entity.token.accessToken`, so a body that
/// decodes but lacks the path is still a response; the controller decides what a
/// missing token means.
#[derive(Clone)]
pub struct LoginApiResponse(Value);

impl LoginApiResponse {
    #[must_use]
    pub fn new(body: Value) -> Self {
        Self(body)
    }

    /// Returns the access token at `data.entity.token.accessToken`, if present.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.0
            .get("data")?
            .get("entity")?
            .get("token")?
            .get("accessToken")?
            .as_str()
    }

    #[must_use]
    pub fn body(&self) -> &Value {
        &self.0
    }
}

impl fmt::Debug for LoginApiResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginApiResponse")
            .field("has_access_token", &self.access_token().is_some())
            .finish_non_exhaustive()
    }
}

/// Application-defined error returned by the API on a non-2xx response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiErrorResponse {
    pub status: u16,
    pub message: String,
}

impl fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Wire shape of [`ApiErrorResponse`]; only `message` is consumed.
#[derive(Deserialize)]
pub(crate) struct ApiErrorBody {
    pub(crate) message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn credentials_serialize_as_login_payload() {
        let credentials = Credentials::new("ana@gymbook.io", "hunter2");
        let payload = serde_json::to_value(&credentials).expect("Failed to serialize");
        assert_eq!(
            payload,
            json!({ "email": "ana@gymbook.io", "password": "hunter2" })
        );
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let credentials = Credentials::new("ana@gymbook.io", "hunter2");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("ana@gymbook.io"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn access_token_reads_nested_path() {
        let response = LoginApiResponse::new(json!({
            "data": { "entity": { "token": { "accessToken": "T1", "refreshToken": "R1" } } }
        }));
        assert_eq!(response.access_token(), Some("T1"));
        assert!(!format!("{response:?}").contains("T1"));
    }

    #[test]
    fn access_token_is_none_when_path_is_incomplete() {
        for body in [
            json!({}),
            json!({ "data": {} }),
            json!({ "data": { "entity": { "token": {} } } }),
            json!({ "data": { "entity": { "token": { "accessToken": 42 } } } }),
            json!("<html>ok</html>"),
        ] {
            assert_eq!(LoginApiResponse::new(body).access_token(), None);
        }
    }
}

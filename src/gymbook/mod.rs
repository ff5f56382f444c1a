//! Sign-in flow: the login form controller and the capabilities it is wired to.
//!
//! A submission validates the two fields, posts the credentials to the auth API,
//! stores the returned access token under a single well-known key, resets the
//! form and navigates to the member area. Failures stay inside the controller.

pub mod client;
pub mod errors;
pub mod form;
pub mod navigator;
pub mod screen;
pub mod storage;
pub mod types;
pub mod validation;

pub use self::client::{AuthApi, HttpAuthClient};
pub use self::errors::{FormError, LoginError};
pub use self::form::{LoginForm, SubmitOutcome, SubmitPolicy};
pub use self::navigator::{HistoryNavigator, Navigator};
pub use self::storage::{FileStore, KeyValueStore, MemoryStore, StorageKey};
pub use self::types::{ApiErrorResponse, Credentials, LoginApiResponse};
pub use self::validation::{validate, Field, FieldErrors};

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_API_URL: &str = "http://localhost:7575";
pub const LOGIN_PATH: &str = "/api/v1/auth/login";

/// Client-side routes.
pub mod routes {
    pub const SIGN_IN: &str = "/";
    pub const SIGN_UP: &str = "/signup";
    pub const MEMBER: &str = "/Member";
}

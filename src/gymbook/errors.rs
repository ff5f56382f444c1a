use super::types::ApiErrorResponse;
use thiserror::Error;

/// Failures of a single login request.
#[derive(Debug, Error)]
pub enum LoginError {
    /// Non-2xx response carrying the application error shape.
    #[error("{0}")]
    Api(ApiErrorResponse),
    /// Non-2xx response with a body that is not the application error shape.
    #[error("Request failed ({status})")]
    Http { status: u16 },
    /// Connection failure, timeout, or an unreadable body.
    #[error("Unable to reach the server: {0}")]
    Transport(#[source] reqwest::Error),
}

impl LoginError {
    /// Returns the API error when this failure has the recognized shape.
    #[must_use]
    pub fn as_api(&self) -> Option<&ApiErrorResponse> {
        match self {
            Self::Api(response) => Some(response),
            _ => None,
        }
    }
}

/// Errors that escape the login form's submit handler.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Login response is missing data.entity.token.accessToken")]
    ResponseShape,
    #[error("Failed to persist access token: {0:#}")]
    Storage(anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_message_only() {
        let error = LoginError::Api(ApiErrorResponse {
            status: 401,
            message: "bad credentials".to_string(),
        });
        assert_eq!(error.to_string(), "bad credentials");
        assert_eq!(error.as_api().map(|api| api.status), Some(401));
    }

    #[test]
    fn http_error_is_not_an_api_error() {
        let error = LoginError::Http { status: 502 };
        assert_eq!(error.to_string(), "Request failed (502)");
        assert!(error.as_api().is_none());
    }

    #[test]
    fn storage_error_includes_context_chain() {
        let source = anyhow::anyhow!("disk full").context("writing storage.json");
        let error = FormError::Storage(source);
        assert_eq!(
            error.to_string(),
            "Failed to persist access token: writing storage.json: disk full"
        );
    }
}

//! Client for the GymBook auth API. The login request carries the raw password
//! and the response carries the access token, so neither is logged here.

use super::{
    errors::LoginError,
    types::{ApiErrorBody, ApiErrorResponse, Credentials, LoginApiResponse},
    APP_USER_AGENT, LOGIN_PATH,
};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Default request timeout applied to auth calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Posts the credentials to the login endpoint.
    async fn login(&self, credentials: &Credentials) -> Result<LoginApiResponse, LoginError>;
}

#[derive(Clone, Debug)]
pub struct HttpAuthClient {
    client: Client,
    login_url: Url,
}

impl HttpAuthClient {
    /// Builds a client for the API rooted at `base_url`.
    ///
    /// # Errors
    /// Returns an error if the URL is not an absolute http(s) URL or the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let login_url = endpoint_url(base_url, LOGIN_PATH)?;

        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, login_url })
    }

    #[must_use]
    pub fn login_url(&self) -> &Url {
        &self.login_url
    }
}

#[async_trait]
impl AuthApi for HttpAuthClient {
    #[instrument(skip(self, credentials), fields(url = %self.login_url))]
    async fn login(&self, credentials: &Credentials) -> Result<LoginApiResponse, LoginError> {
        let response = self
            .client
            .post(self.login_url.clone())
            .json(credentials)
            .send()
            .await
            .map_err(LoginError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(LoginError::Transport)?;

        debug!("login response status: {}", status);

        if status.is_success() {
            // A body that is not JSON is kept as a string and fails the token lookup later.
            let value = serde_json::from_str::<Value>(&body).unwrap_or_else(|_| Value::String(body));
            return Ok(LoginApiResponse::new(value));
        }

        Err(error_from_body(status.as_u16(), &body))
    }
}

/// Joins the API base URL and an endpoint path, keeping any base path prefix.
///
/// # Errors
/// Returns an error if the result is not an absolute http(s) URL.
pub fn endpoint_url(base_url: &str, path: &str) -> Result<Url> {
    let base = base_url.trim().trim_end_matches('/');
    let url = Url::parse(&format!("{}/{}", base, path.trim().trim_start_matches('/')))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(anyhow!("Error parsing URL: unsupported scheme {}", scheme)),
    }

    if url.host().is_none() {
        return Err(anyhow!("Error parsing URL: no host specified"));
    }

    Ok(url)
}

fn error_from_body(status: u16, body: &str) -> LoginError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(error) => LoginError::Api(ApiErrorResponse {
            status,
            message: error.message,
        }),
        Err(_) => LoginError::Http { status },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("http://localhost:7575", LOGIN_PATH).unwrap().as_str(),
            "http://localhost:7575/api/v1/auth/login"
        );
        assert_eq!(
            endpoint_url(" https://api.gymbook.io/gym/ ", LOGIN_PATH)
                .unwrap()
                .as_str(),
            "https://api.gymbook.io/gym/api/v1/auth/login"
        );
    }

    #[test]
    fn test_endpoint_url_rejects_non_http() {
        let err = endpoint_url("ftp://localhost:7575", LOGIN_PATH).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme ftp"));
        assert!(endpoint_url("localhost:7575", LOGIN_PATH).is_err());
    }

    #[test]
    fn test_error_from_body() {
        let error = error_from_body(401, r#"{"message":"bad credentials","statusCode":401}"#);
        assert_eq!(
            error.as_api(),
            Some(&ApiErrorResponse {
                status: 401,
                message: "bad credentials".to_string()
            })
        );

        assert!(matches!(
            error_from_body(500, "Internal Server Error"),
            LoginError::Http { status: 500 }
        ));
        assert!(matches!(
            error_from_body(400, r#"{"error":"nope"}"#),
            LoginError::Http { status: 400 }
        ));
    }

    #[tokio::test]
    async fn login_posts_credentials_and_returns_body() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "email": "ana@gymbook.io", "password": "hunter2" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "entity": { "token": { "accessToken": "T1" } } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpAuthClient::new(&server.uri(), DEFAULT_TIMEOUT)?;
        let response = client
            .login(&Credentials::new("ana@gymbook.io", "hunter2"))
            .await?;
        assert_eq!(response.access_token(), Some("T1"));
        Ok(())
    }

    #[tokio::test]
    async fn login_keeps_non_json_success_body() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string("welcome"))
            .mount(&server)
            .await;

        let client = HttpAuthClient::new(&server.uri(), DEFAULT_TIMEOUT)?;
        let response = client.login(&Credentials::default()).await?;
        assert_eq!(response.body(), &Value::String("welcome".to_string()));
        assert_eq!(response.access_token(), None);
        Ok(())
    }

    #[tokio::test]
    async fn login_maps_api_error_shape() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "bad credentials"
            })))
            .mount(&server)
            .await;

        let client = HttpAuthClient::new(&server.uri(), DEFAULT_TIMEOUT)?;
        let result = client
            .login(&Credentials::new("ana@gymbook.io", "wrong"))
            .await;
        assert!(matches!(
            result,
            Err(LoginError::Api(ApiErrorResponse { status: 401, ref message })) if message == "bad credentials"
        ));
        Ok(())
    }

    #[tokio::test]
    async fn login_times_out() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let client = HttpAuthClient::new(&server.uri(), Duration::from_millis(100))?;
        let result = client.login(&Credentials::default()).await;
        assert!(matches!(result, Err(LoginError::Transport(err)) if err.is_timeout()));
        Ok(())
    }
}

//! # HTTP Transport
//!
//! The outbound HTTP collaborator used by gateway clients. Gateways only need
//! form-encoded POSTs; one of them hands back the checkout URL as its first
//! redirect hop, so the transport can record redirect history.

use crate::error::{PaymentError, PaymentResult};
use async_trait::async_trait;
use reqwest::{header::LOCATION, redirect::Policy, Client, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_REDIRECTS: usize = 10;

/// What came back from a form POST
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportResponse {
    /// Status of the final response
    pub status: u16,

    /// Headers of the final response
    pub headers: Vec<(String, String)>,

    /// Body of the final response
    pub body: String,

    /// Every URL redirected to, in the order the hops happened
    pub redirect_history: Vec<String>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
            redirect_history: Vec::new(),
        }
    }

    pub fn with_redirect_history<I, S>(mut self, history: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.redirect_history = history.into_iter().map(Into::into).collect();
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Form-POST transport used by the gateway clients
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST `fields` form-encoded to `url`.
    ///
    /// With `follow_redirects` the transport follows 3xx responses and
    /// records each target URL in [`TransportResponse::redirect_history`].
    async fn post_form(
        &self,
        url: &str,
        fields: &[(String, String)],
        follow_redirects: bool,
    ) -> PaymentResult<TransportResponse>;
}

/// Shared handle to a transport
pub type SharedTransport = Arc<dyn HttpTransport>;

/// [`HttpTransport`] over `reqwest`.
///
/// Automatic redirects are disabled on the client; hops are followed here so
/// that each one can be recorded.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    max_redirects: usize,
}

impl ReqwestTransport {
    /// Create a transport with the default 30s timeout
    pub fn new() -> PaymentResult<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a transport with an explicit request timeout
    pub fn with_timeout(timeout: Duration) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        })
    }

    /// Builder: cap the number of hops followed
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Shareable handle for gateway clients
    pub fn shared(self) -> SharedTransport {
        Arc::new(self)
    }

    async fn into_transport_response(
        response: Response,
        redirect_history: Vec<String>,
    ) -> PaymentResult<TransportResponse> {
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    v.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();

        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::RequestError(e.to_string()))?;

        Ok(TransportResponse {
            status,
            headers,
            body,
            redirect_history,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, fields), fields(field_count = fields.len()))]
    async fn post_form(
        &self,
        url: &str,
        fields: &[(String, String)],
        follow_redirects: bool,
    ) -> PaymentResult<TransportResponse> {
        let mut response = self
            .client
            .post(url)
            .form(fields)
            .send()
            .await
            .map_err(|e| PaymentError::RequestError(e.to_string()))?;

        let mut history = Vec::new();

        while follow_redirects && response.status().is_redirection() {
            let Some(location) = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
            else {
                break;
            };

            if history.len() >= self.max_redirects {
                return Err(PaymentError::RequestError(format!(
                    "Will not follow more than {} redirects",
                    self.max_redirects
                )));
            }

            let next = response.url().join(location).map_err(|e| {
                PaymentError::RequestError(format!("Invalid redirect location {}: {}", location, e))
            })?;

            debug!("Following redirect: status={}, to={}", response.status(), next);
            history.push(next.to_string());

            // 307/308 keep the method and body, the rest continue with GET
            let keep_method = matches!(
                response.status(),
                StatusCode::TEMPORARY_REDIRECT | StatusCode::PERMANENT_REDIRECT
            );
            let request = if keep_method {
                self.client.post(next).form(fields)
            } else {
                self.client.get(next)
            };

            response = request
                .send()
                .await
                .map_err(|e| PaymentError::RequestError(e.to_string()))?;
        }

        Self::into_transport_response(response, history).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn form(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_header_lookup() {
        let mut response = TransportResponse::new(200, "ok");
        response
            .headers
            .push(("Content-Type".to_string(), "text/html".to_string()));

        assert_eq!(response.header("content-type"), Some("text/html"));
        assert_eq!(response.header("location"), None);
        assert!(response.is_ok());
    }

    #[tokio::test]
    async fn test_post_form_without_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pay"))
            .and(body_string_contains("amount=10"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"url":"x"}"#))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new().unwrap();
        let response = transport
            .post_form(
                &format!("{}/pay", server.uri()),
                &form(&[("amount", "10")]),
                false,
            )
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, r#"{"url":"x"}"#);
        assert!(response.redirect_history.is_empty());
    }

    #[tokio::test]
    async fn test_redirect_not_followed_when_disabled() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/start"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/next"))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new().unwrap();
        let response = transport
            .post_form(&format!("{}/start", server.uri()), &[], false)
            .await
            .unwrap();

        assert_eq!(response.status, 302);
        assert_eq!(response.header("location"), Some("/next"));
        assert!(response.redirect_history.is_empty());
    }

    #[tokio::test]
    async fn test_redirect_history_is_recorded_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/start"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/hop1"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/hop1"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", format!("{}/final", server.uri()).as_str()),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/final"))
            .respond_with(ResponseTemplate::new(200).set_body_string("checkout"))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new().unwrap();
        let response = transport
            .post_form(&format!("{}/start", server.uri()), &form(&[("a", "1")]), true)
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, "checkout");
        assert_eq!(
            response.redirect_history,
            vec![
                format!("{}/hop1", server.uri()),
                format!("{}/final", server.uri())
            ]
        );
    }

    #[tokio::test]
    async fn test_temporary_redirect_reposts_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/start"))
            .respond_with(ResponseTemplate::new(307).insert_header("Location", "/again"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/again"))
            .and(body_string_contains("a=1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new().unwrap();
        let response = transport
            .post_form(&format!("{}/start", server.uri()), &form(&[("a", "1")]), true)
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.redirect_history.len(), 1);
    }

    #[tokio::test]
    async fn test_redirect_loop_is_cut_off() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/loop"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/loop"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/loop"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/loop"))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new().unwrap().with_max_redirects(3);
        let result = transport
            .post_form(&format!("{}/loop", server.uri()), &[], true)
            .await;

        assert!(matches!(result, Err(PaymentError::RequestError(_))));
    }
}

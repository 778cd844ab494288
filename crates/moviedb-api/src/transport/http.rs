//! `HttpTransport` - reqwest implementation of `Transport` for TMDB API v3.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use super::api::Transport;
use super::request::ApiRequest;
use crate::error::ServiceError;
use crate::settings::ImageUrlReader;

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Image CDN used until a configuration fetch provides one.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// Listing endpoint backing `ApiRequest::MovieListing`.
const LISTING_PATH: &str = "movie/upcoming";

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
struct TmdbErrorResponse {
    /// TMDB error code.
    status_code: u32,
    /// Error message.
    status_message: String,
}

/// HTTP transport for the TMDB API and its image CDN.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct HttpTransport {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Bearer API token.
    api_token: String,
    /// Response language sent with every API request.
    language: String,
    /// Live image base URL, written by the configuration client.
    image_base: Option<ImageUrlReader>,
    /// Size segment for posters (e.g. `w500`).
    poster_size: String,
    /// Size segment for backdrops (e.g. `w780`).
    backdrop_size: String,
}

/// Builder for `HttpTransport`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct HttpTransportBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
    language: Option<String>,
    image_base: Option<ImageUrlReader>,
    poster_size: Option<String>,
    backdrop_size: Option<String>,
    timeout: Option<Duration>,
}

impl HttpTransportBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            user_agent: None,
            language: None,
            image_base: None,
            poster_size: None,
            backdrop_size: None,
            timeout: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the response language (default: `en-US`).
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Reads image base URLs from the given cell.
    #[must_use]
    pub fn image_base(mut self, reader: ImageUrlReader) -> Self {
        self.image_base = Some(reader);
        self
    }

    /// Sets the poster size segment (default: `w500`).
    #[must_use]
    pub fn poster_size(mut self, size: impl Into<String>) -> Self {
        self.poster_size = Some(size.into());
        self
    }

    /// Sets the backdrop size segment (default: `w780`).
    #[must_use]
    pub fn backdrop_size(mut self, size: impl Into<String>) -> Self {
        self.backdrop_size = Some(size.into());
        self
    }

    /// Sets a per-request timeout. No timeout by default.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the transport.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<HttpTransport> {
        let api_token = self.api_token.context("api_token is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let mut builder = Client::builder().user_agent(&user_agent).gzip(true);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().context("failed to build HTTP client")?;

        Ok(HttpTransport {
            http_client,
            base_url,
            api_token,
            language: self.language.unwrap_or_else(|| String::from("en-US")),
            image_base: self.image_base,
            poster_size: self.poster_size.unwrap_or_else(|| String::from("w500")),
            backdrop_size: self.backdrop_size.unwrap_or_else(|| String::from("w780")),
        })
    }
}

impl HttpTransport {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::new()
    }

    /// Resolves a request descriptor to its URL and query parameters.
    pub(crate) fn resolve(
        &self,
        request: &ApiRequest,
    ) -> Result<(Url, Vec<(&'static str, String)>), ServiceError> {
        match request {
            ApiRequest::PosterImage { path } => Ok((self.image_url(&self.poster_size, path)?, vec![])),
            ApiRequest::BackdropImage { path } => {
                Ok((self.image_url(&self.backdrop_size, path)?, vec![]))
            }
            ApiRequest::Configuration => Ok((self.api_url("configuration")?, vec![])),
            ApiRequest::GenreList => Ok((self.api_url("genre/movie/list")?, self.language_query())),
            ApiRequest::MovieListing { page } => {
                let mut query = self.language_query();
                query.push(("page", page.to_string()));
                Ok((self.api_url(LISTING_PATH)?, query))
            }
            ApiRequest::MovieDetail { id } => {
                Ok((self.api_url(&format!("movie/{id}"))?, self.language_query()))
            }
            ApiRequest::Search { query: text, page } => {
                let mut query = self.language_query();
                query.push(("query", text.clone()));
                query.push(("page", page.to_string()));
                query.push(("include_adult", String::from("false")));
                Ok((self.api_url("search/movie")?, query))
            }
        }
    }

    fn language_query(&self) -> Vec<(&'static str, String)> {
        vec![("language", self.language.clone())]
    }

    fn api_url(&self, path: &str) -> Result<Url, ServiceError> {
        self.base_url.join(path).map_err(|e| {
            ServiceError::InvalidParameters(format!("failed to join URL path {path}: {e}"))
        })
    }

    /// Builds `{image_base}{size}{path}`.
    fn image_url(&self, size: &str, path: &str) -> Result<Url, ServiceError> {
        let base = self
            .image_base
            .as_ref()
            .and_then(ImageUrlReader::get)
            .unwrap_or_else(|| String::from(DEFAULT_IMAGE_BASE_URL));
        let base = base.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{size}/{path}")).map_err(|e| {
            ServiceError::InvalidParameters(format!("invalid image URL for {path}: {e}"))
        })
    }
}

impl Transport for HttpTransport {
    #[instrument(skip_all, fields(request = request.label()))]
    async fn execute(&self, request: &ApiRequest) -> Result<Vec<u8>, ServiceError> {
        let (url, query) = self.resolve(request)?;

        let mut builder = self.http_client.get(url).query(&query);
        if !request.is_image() {
            builder = builder.bearer_auth(&self.api_token);
        }
        let http_request = builder.build()?;

        tracing::debug!(url = %http_request.url(), "TMDB request");

        let response = self.http_client.execute(http_request).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                return Err(ServiceError::TransportFailure(format!(
                    "TMDB API error (HTTP {}): code={}, message={}",
                    status, error_response.status_code, error_response.status_message,
                )));
            }
            return Err(ServiceError::TransportFailure(format!(
                "TMDB API error (HTTP {status}): {body}"
            )));
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::settings::ImageBaseUrl;

    fn transport_for(base_url: &str) -> HttpTransport {
        HttpTransport::builder()
            .base_url(base_url.parse().unwrap())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_api_token() {
        // Arrange & Act
        let result = HttpTransport::builder().user_agent("test/0.0.0").build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("api_token is required")
        );
    }

    #[test]
    fn test_builder_requires_user_agent() {
        // Arrange & Act
        let result = HttpTransport::builder().api_token("test-token").build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("user_agent is required")
        );
    }

    #[test]
    fn test_builder_defaults() {
        // Arrange & Act
        let transport = HttpTransport::builder()
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(transport.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(transport.language, "en-US");
        assert_eq!(transport.poster_size, "w500");
        assert_eq!(transport.backdrop_size, "w780");
    }

    #[test]
    fn test_resolve_search_request() {
        // Arrange
        let transport = transport_for("http://localhost:8080/3/");
        let request = ApiRequest::Search {
            query: String::from("matrix"),
            page: 2,
        };

        // Act
        let (url, query) = transport.resolve(&request).unwrap();

        // Assert
        assert_eq!(url.as_str(), "http://localhost:8080/3/search/movie");
        assert!(query.contains(&("query", String::from("matrix"))));
        assert!(query.contains(&("page", String::from("2"))));
        assert!(query.contains(&("language", String::from("en-US"))));
    }

    #[test]
    fn test_resolve_poster_uses_default_image_base() {
        // Arrange
        let transport = transport_for("http://localhost:8080/3/");
        let request = ApiRequest::PosterImage {
            path: String::from("/poster.jpg"),
        };

        // Act
        let (url, query) = transport.resolve(&request).unwrap();

        // Assert
        assert_eq!(url.as_str(), "https://image.tmdb.org/t/p/w500/poster.jpg");
        assert!(query.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_backdrop_follows_image_cell() {
        // Arrange
        let (writer, reader) = ImageBaseUrl::new(None);
        let transport = HttpTransport::builder()
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .image_base(reader)
            .backdrop_size("original")
            .build()
            .unwrap();
        let request = ApiRequest::BackdropImage {
            path: String::from("/backdrop.jpg"),
        };

        // Act
        writer.set("https://cdn.example/t/p/").await;
        let (url, _) = transport.resolve(&request).unwrap();

        // Assert
        assert_eq!(url.as_str(), "https://cdn.example/t/p/original/backdrop.jpg");
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/genre/movie/list"))
            .and(wiremock::matchers::header(
                "Authorization",
                "Bearer my-secret-token",
            ))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(r#"{"genres":[]}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::builder()
            .base_url(format!("{}/3/", mock_server.uri()).parse().unwrap())
            .api_token("my-secret-token")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Act
        let body = transport.execute(&ApiRequest::GenreList).await.unwrap();

        // Assert
        assert_eq!(body, br#"{"genres":[]}"#);
    }

    #[tokio::test]
    async fn test_http_error_returns_transport_failure() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let error_body = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(401).set_body_string(error_body))
            .mount(&mock_server)
            .await;

        let transport = transport_for(&format!("{}/3/", mock_server.uri()));

        // Act
        let result = transport.execute(&ApiRequest::Configuration).await;

        // Assert
        let err = result.unwrap_err();
        assert!(matches!(err, ServiceError::TransportFailure(_)));
        assert!(err.to_string().contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_http_429_is_not_retried() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(429).set_body_string("slow down"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = transport_for(&format!("{}/3/", mock_server.uri()));

        // Act
        let result = transport
            .execute(&ApiRequest::MovieListing { page: 1 })
            .await;

        // Assert
        assert!(matches!(result, Err(ServiceError::TransportFailure(_))));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_failure() {
        // Arrange: nothing listens on port 9 (discard) in the test environment
        let transport = transport_for("http://127.0.0.1:9/3/");

        // Act
        let result = transport.execute(&ApiRequest::GenreList).await;

        // Assert
        assert!(matches!(result, Err(ServiceError::TransportFailure(_))));
    }
}

//! `CatalogClient` - catalog operations over a `Transport`.

use serde::de::DeserializeOwned;
use tracing::instrument;

use super::api::CatalogApi;
use super::types::{Genre, GenreListResponse, Movie, MoviesPage};
use crate::error::ServiceError;
use crate::transport::{ApiRequest, Transport};

/// Movie catalog client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogClient<T> {
    /// Underlying transport.
    transport: T,
}

impl<T> CatalogClient<T> {
    /// Creates a client on top of `transport`.
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }
}

impl<T: Transport + Sync> CatalogClient<T> {
    /// Executes `request` and decodes the JSON body.
    async fn get_json<R: DeserializeOwned>(&self, request: &ApiRequest) -> Result<R, ServiceError> {
        let body = self.transport.execute(request).await?;
        serde_json::from_slice(&body).map_err(|e| {
            ServiceError::InvalidFormat(format!(
                "failed to decode {} response: {e}",
                request.label()
            ))
        })
    }
}

/// Rejects page 0.
fn ensure_page(page: u32) -> Result<(), ServiceError> {
    if page == 0 {
        return Err(ServiceError::InvalidParameters(String::from(
            "page must be a positive integer",
        )));
    }
    Ok(())
}

impl<T: Transport + Sync> CatalogApi for CatalogClient<T> {
    #[instrument(skip_all, fields(page = page))]
    async fn fetch_listing(&self, page: u32) -> Result<MoviesPage, ServiceError> {
        ensure_page(page)?;
        self.get_json(&ApiRequest::MovieListing { page }).await
    }

    #[instrument(skip_all)]
    async fn fetch_genres(&self) -> Result<Vec<Genre>, ServiceError> {
        let response: GenreListResponse = self.get_json(&ApiRequest::GenreList).await?;
        Ok(response.genres)
    }

    #[instrument(skip_all, fields(id = id))]
    async fn fetch_detail(&self, id: &str) -> Result<Movie, ServiceError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ServiceError::InvalidParameters(String::from(
                "movie id must not be empty",
            )));
        }
        self.get_json(&ApiRequest::MovieDetail {
            id: String::from(id),
        })
        .await
    }

    #[instrument(skip_all, fields(page = page))]
    async fn search(&self, query: &str, page: u32) -> Result<MoviesPage, ServiceError> {
        ensure_page(page)?;
        if query.trim().is_empty() {
            return Err(ServiceError::InvalidParameters(String::from(
                "search query must not be empty",
            )));
        }
        self.get_json(&ApiRequest::Search {
            query: String::from(query),
            page,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::sync::Mutex;

    use super::*;
    use crate::transport::HttpTransport;

    /// Transport that answers every request with a fixed body and records requests.
    struct StaticTransport {
        body: &'static str,
        seen: Mutex<Vec<ApiRequest>>,
    }

    impl StaticTransport {
        fn new(body: &'static str) -> Self {
            Self {
                body,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for StaticTransport {
        async fn execute(&self, request: &ApiRequest) -> Result<Vec<u8>, ServiceError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.body.as_bytes().to_vec())
        }
    }

    fn http_client(mock_server: &wiremock::MockServer) -> CatalogClient<HttpTransport> {
        let transport = HttpTransport::builder()
            .base_url(format!("{}/3/", mock_server.uri()).parse().unwrap())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();
        CatalogClient::new(transport)
    }

    #[test]
    fn test_parse_listing_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/movie_upcoming_page1.json");

        // Act
        let page: MoviesPage = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 5);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].id, 345_940);
        assert_eq!(page.results[0].genre_ids.as_deref(), Some(&[28, 53, 9648][..]));
        assert_eq!(page.results[1].overview, None);
        assert_eq!(page.results[1].backdrop_path, None);
    }

    #[test]
    fn test_parse_detail_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/movie_detail_550.json");

        // Act
        let movie: Movie = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(movie.id, 550);
        assert_eq!(movie.title.as_deref(), Some("Fight Club"));
        assert_eq!(movie.genre_ids, None);
        assert_eq!(movie.genres.as_ref().unwrap().len(), 2);
        assert_eq!(movie.revenue, Some(100_853_753));
        assert_eq!(movie.runtime, Some(139));
        assert_eq!(movie.spoken_languages.as_ref().unwrap()[0].name, "English");
    }

    #[tokio::test]
    async fn test_page_zero_is_rejected_without_request() {
        // Arrange
        let transport = StaticTransport::new("{}");
        let client = CatalogClient::new(transport);

        // Act
        let listing = client.fetch_listing(0).await;
        let search = client.search("matrix", 0).await;

        // Assert
        assert!(matches!(listing, Err(ServiceError::InvalidParameters(_))));
        assert!(matches!(search, Err(ServiceError::InvalidParameters(_))));
        assert!(client.transport.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_id_and_query_are_rejected() {
        // Arrange
        let client = CatalogClient::new(StaticTransport::new("{}"));

        // Act
        let detail = client.fetch_detail("  ").await;
        let search = client.search("", 1).await;

        // Assert
        assert!(matches!(detail, Err(ServiceError::InvalidParameters(_))));
        assert!(matches!(search, Err(ServiceError::InvalidParameters(_))));
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_invalid_format() {
        // Arrange
        let client = CatalogClient::new(StaticTransport::new(r#"{"status":"ok"}"#));

        // Act
        let result = client.fetch_genres().await;

        // Assert
        let err = result.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidFormat(_)));
        assert!(err.to_string().contains("genre list"));
    }

    #[tokio::test]
    async fn test_requests_carry_descriptor() {
        // Arrange
        let body = include_str!("../../../../fixtures/tmdb/search_movie_matrix.json");
        let client = CatalogClient::new(StaticTransport::new(body));

        // Act
        let page = client.search("matrix", 3).await.unwrap();

        // Assert
        assert_eq!(page.results.len(), 1);
        assert_eq!(
            client.transport.seen.lock().unwrap().as_slice(),
            [ApiRequest::Search {
                query: String::from("matrix"),
                page: 3
            }]
        );
    }

    #[tokio::test]
    async fn test_fetch_listing_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/movie_upcoming_page1.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/movie/upcoming"))
            .and(wiremock::matchers::query_param("page", "1"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = http_client(&mock_server);

        // Act
        let page = client.fetch_listing(1).await.unwrap();

        // Assert
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].title.as_deref(), Some("The Meg"));
    }

    #[tokio::test]
    async fn test_fetch_genres_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/genre_movie_list.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/genre/movie/list"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = http_client(&mock_server);

        // Act
        let genres = client.fetch_genres().await.unwrap();

        // Assert
        assert_eq!(genres.len(), 5);
        assert_eq!(genres[0], Genre::new(28, "Action"));
    }

    #[tokio::test]
    async fn test_fetch_detail_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/movie_detail_550.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/movie/550"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = http_client(&mock_server);

        // Act
        let movie = client.fetch_detail("550").await.unwrap();

        // Assert
        assert_eq!(movie.id, 550);
        assert_eq!(movie.homepage.as_deref(), Some("http://www.foxmovies.com/movies/fight-club"));
    }

    #[tokio::test]
    async fn test_search_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_movie_matrix.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/search/movie"))
            .and(wiremock::matchers::query_param("query", "The Matrix"))
            .and(wiremock::matchers::query_param("page", "1"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = http_client(&mock_server);

        // Act
        let page = client.search("The Matrix", 1).await.unwrap();

        // Assert
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.results[0].id, 603);
    }

    #[tokio::test]
    async fn test_server_error_is_transport_failure() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&mock_server)
            .await;

        let client = http_client(&mock_server);

        // Act
        let result = client.fetch_listing(2).await;

        // Assert
        assert!(matches!(result, Err(ServiceError::TransportFailure(_))));
    }
}

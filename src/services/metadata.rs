use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult},
    models::{CreditsResponse, MovieDetails, PersonDetails, SearchResponse},
};

/// Movie metadata source abstraction
///
/// The production implementation talks to the backend's TMDB pass-through
/// proxy, so no API credential is held client-side. Tests substitute a mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Search for movies by free-text title
    async fn search(&self, query: &str) -> AppResult<SearchResponse>;

    /// Fetch full metadata for a movie id
    async fn movie_details(&self, movie_id: u64) -> AppResult<MovieDetails>;

    /// Fetch cast credits for a movie id
    async fn movie_credits(&self, movie_id: u64) -> AppResult<CreditsResponse>;

    /// Fetch biographical detail for a person id
    async fn person_details(&self, person_id: u64) -> AppResult<PersonDetails>;
}

/// Metadata client backed by the backend's proxy endpoints
#[derive(Clone)]
pub struct ProxyMetadataClient {
    http_client: HttpClient,
    base_url: String,
}

impl ProxyMetadataClient {
    pub fn new(http_client: HttpClient, base_url: String) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<(&str, &str)>,
    ) -> AppResult<T> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self.http_client.get(&url);
        if let Some(pair) = query {
            request = request.query(&[pair]);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                path = %path,
                status = %status,
                body = %body,
                "Metadata proxy request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "Metadata proxy returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for ProxyMetadataClient {
    async fn search(&self, query: &str) -> AppResult<SearchResponse> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let response: SearchResponse = self
            .get_json("/api/tmdb/search", Some(("query", query)))
            .await?;

        tracing::debug!(
            query = %query,
            results = response.results.len(),
            "Title search completed"
        );

        Ok(response)
    }

    async fn movie_details(&self, movie_id: u64) -> AppResult<MovieDetails> {
        self.get_json(&format!("/api/tmdb/movie/{}", movie_id), None)
            .await
    }

    async fn movie_credits(&self, movie_id: u64) -> AppResult<CreditsResponse> {
        self.get_json(&format!("/api/tmdb/movie/{}/credits", movie_id), None)
            .await
    }

    async fn person_details(&self, person_id: u64) -> AppResult<PersonDetails> {
        self.get_json(&format!("/api/tmdb/person/{}", person_id), None)
            .await
    }
}

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::RenderSubmission,
};

/// Exact reply the backend sends for a title outside its dataset
pub const NOT_FOUND_SENTINEL: &str = "Sorry! The movie you requested is not in our database. Please check the spelling or try with some other movies";

/// Separator the similarity endpoint joins recommended titles with.
/// A title containing this substring would corrupt the split; the backend
/// owns the wire format, so the risk is documented rather than handled.
pub const TITLE_DELIMITER: &str = "---";

/// Parsed reply from the similarity endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum SimilarityReply {
    /// The backend does not know the title
    NotFound,
    /// Recommended titles in backend relevance order
    Titles(Vec<String>),
}

/// Splits a raw similarity reply, keeping backend order
pub fn parse_similarity_reply(body: &str) -> SimilarityReply {
    if body == NOT_FOUND_SENTINEL {
        SimilarityReply::NotFound
    } else {
        SimilarityReply::Titles(body.split(TITLE_DELIMITER).map(str::to_owned).collect())
    }
}

/// Recommendation backend abstraction: similarity lookup plus HTML rendering
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationBackend: Send + Sync {
    /// Request similar titles for a canonical movie title
    async fn similar_titles(&self, title: &str) -> AppResult<SimilarityReply>;

    /// Submit the aggregated record and receive the rendered HTML fragment
    async fn render(&self, submission: &RenderSubmission) -> AppResult<String>;
}

/// Client for the backend's similarity and render endpoints
#[derive(Clone)]
pub struct BackendClient {
    http_client: HttpClient,
    base_url: String,
}

impl BackendClient {
    pub fn new(http_client: HttpClient, base_url: String) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post_form<T: serde::Serialize + Sync>(&self, path: &str, form: &T) -> AppResult<String> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.http_client.post(&url).form(form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                path = %path,
                status = %status,
                body = %body,
                "Backend request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "Backend returned status {}: {}",
                status, body
            )));
        }

        Ok(response.text().await?)
    }
}

#[async_trait::async_trait]
impl RecommendationBackend for BackendClient {
    async fn similar_titles(&self, title: &str) -> AppResult<SimilarityReply> {
        let body = self.post_form("/similarity", &[("name", title)]).await?;

        let reply = parse_similarity_reply(&body);
        if let SimilarityReply::Titles(titles) = &reply {
            tracing::info!(title = %title, count = titles.len(), "Recommendations received");
        }

        Ok(reply)
    }

    async fn render(&self, submission: &RenderSubmission) -> AppResult<String> {
        self.post_form("/recommend", submission).await
    }
}

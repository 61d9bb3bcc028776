use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::POSTER_PLACEHOLDER,
    services::MetadataProvider,
};

/// Resolves one poster URL per recommended title
pub struct PosterResolver {
    provider: Arc<dyn MetadataProvider>,
    image_base: String,
}

impl PosterResolver {
    pub fn new(provider: Arc<dyn MetadataProvider>, image_base: String) -> Self {
        Self {
            provider,
            image_base,
        }
    }

    /// Looks up a poster for every title in parallel, collecting in spawn
    /// order. Empty results, a missing poster path, or a transport error all
    /// yield the placeholder, so the output length always equals the input
    /// length and stays index-aligned with it.
    pub async fn resolve_all(&self, titles: &[String]) -> AppResult<Vec<String>> {
        let mut tasks = Vec::with_capacity(titles.len());

        for title in titles {
            let provider = Arc::clone(&self.provider);
            let image_base = self.image_base.clone();
            let title = title.clone();
            tasks.push(tokio::spawn(async move {
                match provider.search(&title).await {
                    Ok(response) => response
                        .results
                        .first()
                        .and_then(|hit| hit.poster_path.as_deref())
                        .map(|path| format!("{}{}", image_base, path))
                        .unwrap_or_else(|| POSTER_PLACEHOLDER.to_string()),
                    Err(e) => {
                        tracing::warn!(title = %title, error = %e, "Poster lookup failed");
                        POSTER_PLACEHOLDER.to_string()
                    }
                }
            }));
        }

        let mut posters = Vec::with_capacity(tasks.len());
        for task in tasks {
            posters.push(task.await.map_err(|e| AppError::Internal(e.to_string()))?);
        }

        tracing::debug!(count = posters.len(), "Posters resolved");

        Ok(posters)
    }
}

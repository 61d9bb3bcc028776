use std::sync::Arc;

use crate::{
    error::AppResult,
    models::RenderSubmission,
    services::{DetailAggregator, MetadataProvider, PosterResolver, RecommendationBackend, SimilarityReply},
    ui::SessionView,
};

/// A successfully rendered interaction, kept for recommendation re-entry
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Canonical title the pipeline ran for
    pub title: String,
    /// Recommended titles in backend relevance order
    pub recommendations: Vec<String>,
    /// HTML fragment returned by the render endpoint
    pub html: String,
}

/// Terminal state of one search interaction
#[derive(Debug)]
pub enum SessionOutcome {
    /// The backend rendered a result fragment
    Rendered(RenderedPage),
    /// Zero search results or the backend sentinel
    NotFound,
    /// A pipeline stage failed
    Failed(crate::error::AppError),
}

/// Drives one search through the whole pipeline: resolve, recommend,
/// aggregate, resolve posters, render.
///
/// Stages run as a sequential await chain; aggregation and poster
/// resolution, which only depend on earlier stages, run side by side. The
/// view's loading state is released exactly once on every terminal path.
pub struct Session {
    metadata: Arc<dyn MetadataProvider>,
    backend: Arc<dyn RecommendationBackend>,
    view: Arc<dyn SessionView>,
    aggregator: DetailAggregator,
    posters: PosterResolver,
    image_base: String,
}

impl Session {
    pub fn new(
        metadata: Arc<dyn MetadataProvider>,
        backend: Arc<dyn RecommendationBackend>,
        view: Arc<dyn SessionView>,
        image_base: String,
    ) -> Self {
        let aggregator = DetailAggregator::new(Arc::clone(&metadata), image_base.clone());
        let posters = PosterResolver::new(Arc::clone(&metadata), image_base.clone());
        Self {
            metadata,
            backend,
            view,
            aggregator,
            posters,
            image_base,
        }
    }

    /// Runs one search interaction and maps its result onto the view
    pub async fn run(&self, raw_input: &str) -> SessionOutcome {
        let title = raw_input.trim();
        if title.is_empty() {
            // Gate-level defense: nothing is fetched for empty input
            self.view.show_not_found();
            return SessionOutcome::NotFound;
        }

        self.view.loading_started();
        let result = self.execute(title).await;
        self.view.loading_finished();

        match result {
            Ok(Some(page)) => {
                self.view.show_results(&page.html);
                SessionOutcome::Rendered(page)
            }
            Ok(None) => {
                self.view.show_not_found();
                SessionOutcome::NotFound
            }
            Err(e) => {
                tracing::error!(error = %e, "Session failed");
                self.view.show_error(&e);
                SessionOutcome::Failed(e)
            }
        }
    }

    /// The pipeline proper; `None` is the recoverable not-found outcome
    async fn execute(&self, title: &str) -> AppResult<Option<RenderedPage>> {
        let search = self.metadata.search(title).await?;
        let Some(hit) = search.results.first() else {
            tracing::info!(query = %title, "No search results");
            return Ok(None);
        };

        let movie_id = hit.id;
        let canonical_title = hit.original_title.clone();
        tracing::info!(movie_id, title = %canonical_title, "Canonical title resolved");

        let recommendations = match self.backend.similar_titles(&canonical_title).await? {
            SimilarityReply::NotFound => {
                tracing::info!(title = %canonical_title, "Backend does not know the title");
                return Ok(None);
            }
            SimilarityReply::Titles(titles) => titles,
        };

        let (bundle, posters) = tokio::join!(
            self.aggregator.aggregate(movie_id),
            self.posters.resolve_all(&recommendations),
        );
        let (bundle, posters) = (bundle?, posters?);

        let submission = RenderSubmission::assemble(
            &canonical_title,
            &bundle,
            &recommendations,
            &posters,
            &self.image_base,
        )?;
        let html = self.backend.render(&submission).await?;

        Ok(Some(RenderedPage {
            title: canonical_title,
            recommendations,
            html,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::AppError;
    use crate::models::{CreditsResponse, MovieDetails, PersonDetails, SearchHit, SearchResponse};
    use crate::services::metadata::MockMetadataProvider;
    use crate::services::similarity::{MockRecommendationBackend, NOT_FOUND_SENTINEL};

    #[derive(Debug, Clone, PartialEq)]
    enum ViewEvent {
        LoadingStarted,
        LoadingFinished,
        Results,
        NotFound,
        Error,
    }

    #[derive(Default)]
    struct RecordingView {
        events: Mutex<Vec<ViewEvent>>,
    }

    impl RecordingView {
        fn events(&self) -> Vec<ViewEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl SessionView for RecordingView {
        fn loading_started(&self) {
            self.events.lock().unwrap().push(ViewEvent::LoadingStarted);
        }
        fn loading_finished(&self) {
            self.events.lock().unwrap().push(ViewEvent::LoadingFinished);
        }
        fn show_results(&self, _html: &str) {
            self.events.lock().unwrap().push(ViewEvent::Results);
        }
        fn show_not_found(&self) {
            self.events.lock().unwrap().push(ViewEvent::NotFound);
        }
        fn show_error(&self, _error: &AppError) {
            self.events.lock().unwrap().push(ViewEvent::Error);
        }
    }

    fn session_with(
        metadata: MockMetadataProvider,
        backend: MockRecommendationBackend,
    ) -> (Session, Arc<RecordingView>) {
        let view = Arc::new(RecordingView::default());
        let session = Session::new(
            Arc::new(metadata),
            Arc::new(backend),
            Arc::clone(&view) as Arc<dyn SessionView>,
            "https://img.test".to_string(),
        );
        (session, view)
    }

    fn single_hit(id: u64, title: &str) -> SearchResponse {
        SearchResponse {
            results: vec![SearchHit {
                id,
                original_title: title.to_string(),
                poster_path: Some("/p.jpg".to_string()),
            }],
        }
    }

    #[tokio::test]
    async fn test_empty_input_issues_no_requests() {
        let mut metadata = MockMetadataProvider::new();
        metadata.expect_search().never();
        let mut backend = MockRecommendationBackend::new();
        backend.expect_similar_titles().never();

        let (session, view) = session_with(metadata, backend);
        let outcome = session.run("   ").await;

        assert!(matches!(outcome, SessionOutcome::NotFound));
        assert_eq!(view.events(), vec![ViewEvent::NotFound]);
    }

    #[tokio::test]
    async fn test_zero_search_results_is_not_found() {
        let mut metadata = MockMetadataProvider::new();
        metadata
            .expect_search()
            .returning(|_| Ok(SearchResponse { results: vec![] }));
        let mut backend = MockRecommendationBackend::new();
        backend.expect_similar_titles().never();

        let (session, view) = session_with(metadata, backend);
        let outcome = session.run("zzzzz").await;

        assert!(matches!(outcome, SessionOutcome::NotFound));
        assert_eq!(
            view.events(),
            vec![
                ViewEvent::LoadingStarted,
                ViewEvent::LoadingFinished,
                ViewEvent::NotFound
            ]
        );
    }

    #[tokio::test]
    async fn test_sentinel_reply_is_not_found() {
        let mut metadata = MockMetadataProvider::new();
        metadata
            .expect_search()
            .returning(|_| Ok(single_hit(27205, "Inception")));
        metadata.expect_movie_details().never();
        let mut backend = MockRecommendationBackend::new();
        backend.expect_similar_titles().returning(|_| {
            Ok(crate::services::similarity::parse_similarity_reply(
                NOT_FOUND_SENTINEL,
            ))
        });
        backend.expect_render().never();

        let (session, view) = session_with(metadata, backend);
        let outcome = session.run("Inception").await;

        assert!(matches!(outcome, SessionOutcome::NotFound));
        assert_eq!(
            view.events(),
            vec![
                ViewEvent::LoadingStarted,
                ViewEvent::LoadingFinished,
                ViewEvent::NotFound
            ]
        );
    }

    #[tokio::test]
    async fn test_search_failure_releases_loading_once() {
        let mut metadata = MockMetadataProvider::new();
        metadata
            .expect_search()
            .returning(|_| Err(AppError::ExternalApi("proxy down".to_string())));
        let backend = MockRecommendationBackend::new();

        let (session, view) = session_with(metadata, backend);
        let outcome = session.run("Inception").await;

        assert!(matches!(outcome, SessionOutcome::Failed(_)));
        assert_eq!(
            view.events(),
            vec![
                ViewEvent::LoadingStarted,
                ViewEvent::LoadingFinished,
                ViewEvent::Error
            ]
        );
    }

    #[tokio::test]
    async fn test_render_failure_surfaces_as_error() {
        let mut metadata = MockMetadataProvider::new();
        metadata
            .expect_search()
            .returning(|query| match query {
                "Inception" => Ok(single_hit(27205, "Inception")),
                _ => Ok(SearchResponse { results: vec![] }),
            });
        metadata
            .expect_movie_details()
            .returning(|_| Ok(MovieDetails::default()));
        metadata
            .expect_movie_credits()
            .returning(|_| Ok(CreditsResponse { cast: vec![] }));
        let mut backend = MockRecommendationBackend::new();
        backend.expect_similar_titles().returning(|_| {
            Ok(SimilarityReply::Titles(vec!["Interstellar".to_string()]))
        });
        backend
            .expect_render()
            .returning(|_| Err(AppError::ExternalApi("render failed".to_string())));

        let (session, view) = session_with(metadata, backend);
        let outcome = session.run("Inception").await;

        assert!(matches!(outcome, SessionOutcome::Failed(_)));
        assert_eq!(
            view.events(),
            vec![
                ViewEvent::LoadingStarted,
                ViewEvent::LoadingFinished,
                ViewEvent::Error
            ]
        );
    }

    #[tokio::test]
    async fn test_full_pipeline_renders() {
        let mut metadata = MockMetadataProvider::new();
        metadata.expect_search().returning(|query| match query {
            "Inception" => Ok(single_hit(27205, "Inception")),
            "Interstellar" => Ok(single_hit(157336, "Interstellar")),
            _ => Ok(SearchResponse { results: vec![] }),
        });
        metadata
            .expect_movie_details()
            .returning(|_| Ok(MovieDetails::default()));
        metadata.expect_movie_credits().returning(|_| {
            Ok(CreditsResponse {
                cast: vec![crate::models::CastCredit {
                    id: 1,
                    name: "Actor 1".to_string(),
                    character: "Role 1".to_string(),
                    profile_path: None,
                }],
            })
        });
        metadata
            .expect_person_details()
            .returning(|_| Ok(PersonDetails::default()));

        let mut backend = MockRecommendationBackend::new();
        backend.expect_similar_titles().returning(|_| {
            Ok(SimilarityReply::Titles(vec![
                "Interstellar".to_string(),
                "The Prestige".to_string(),
            ]))
        });
        backend
            .expect_render()
            .withf(|submission| {
                submission.title == "Inception"
                    && submission.rec_movies == r#"["Interstellar","The Prestige"]"#
            })
            .returning(|_| Ok("<div>rendered</div>".to_string()));

        let (session, view) = session_with(metadata, backend);
        let outcome = session.run("Inception").await;

        match outcome {
            SessionOutcome::Rendered(page) => {
                assert_eq!(page.title, "Inception");
                assert_eq!(page.html, "<div>rendered</div>");
                assert_eq!(
                    page.recommendations,
                    vec!["Interstellar".to_string(), "The Prestige".to_string()]
                );
            }
            other => panic!("expected Rendered, got {:?}", other),
        }
        assert_eq!(
            view.events(),
            vec![
                ViewEvent::LoadingStarted,
                ViewEvent::LoadingFinished,
                ViewEvent::Results
            ]
        );
    }
}

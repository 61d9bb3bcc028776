use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{CastCredit, CastMember, MovieBundle},
    services::MetadataProvider,
};

/// Roster sizes: top 10 when the billing is deep enough, else top 5
const FULL_ROSTER: usize = 10;
const SHORT_ROSTER: usize = 5;

/// Selects the top-billed slice of the cast, never exceeding availability
pub fn select_roster(cast: &[CastCredit]) -> &[CastCredit] {
    let cap = if cast.len() >= FULL_ROSTER {
        FULL_ROSTER
    } else {
        SHORT_ROSTER
    };
    &cast[..cap.min(cast.len())]
}

/// Enriches a resolved movie with full metadata and a biography-enriched
/// cast roster
pub struct DetailAggregator {
    provider: Arc<dyn MetadataProvider>,
    image_base: String,
}

impl DetailAggregator {
    pub fn new(provider: Arc<dyn MetadataProvider>, image_base: String) -> Self {
        Self {
            provider,
            image_base,
        }
    }

    /// Fetches metadata, credits and per-person biographies for a movie id.
    ///
    /// Metadata and credits failures terminate the pipeline; a failed
    /// biography lookup degrades that member to placeholder fields so the
    /// roster keeps its order and length.
    pub async fn aggregate(&self, movie_id: u64) -> AppResult<MovieBundle> {
        let details = self.provider.movie_details(movie_id).await?;
        let credits = self.provider.movie_credits(movie_id).await?;

        let roster = select_roster(&credits.cast);
        tracing::info!(
            movie_id,
            cast_total = credits.cast.len(),
            roster = roster.len(),
            "Cast roster selected"
        );

        let cast = self.enrich_roster(roster).await?;

        Ok(MovieBundle { details, cast })
    }

    /// Fetches biographies for the roster in parallel, collecting in spawn
    /// order so the result stays index-aligned with the billing order.
    async fn enrich_roster(&self, roster: &[CastCredit]) -> AppResult<Vec<CastMember>> {
        let mut tasks = Vec::with_capacity(roster.len());

        for credit in roster {
            let provider = Arc::clone(&self.provider);
            let image_base = self.image_base.clone();
            let credit = credit.clone();
            tasks.push(tokio::spawn(async move {
                match provider.person_details(credit.id).await {
                    Ok(person) => CastMember::from_parts(&credit, &image_base, Some(person)),
                    Err(e) => {
                        tracing::warn!(
                            person_id = credit.id,
                            error = %e,
                            "Person lookup failed, using placeholder biography"
                        );
                        CastMember::from_parts(&credit, &image_base, None)
                    }
                }
            }));
        }

        let mut cast = Vec::with_capacity(tasks.len());
        for task in tasks {
            cast.push(task.await.map_err(|e| AppError::Internal(e.to_string()))?);
        }

        Ok(cast)
    }
}

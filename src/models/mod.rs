use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Fallback image shown when a cast member has no profile photo
pub const PROFILE_PLACEHOLDER: &str = "https://via.placeholder.com/240x360?text=No+Image";

/// Fallback image shown when no poster could be resolved for a title
pub const POSTER_PLACEHOLDER: &str = "https://via.placeholder.com/240x360?text=No+Poster";

/// Fallback for absent birthday / place-of-birth / release-date fields
pub const UNKNOWN: &str = "Unknown";

/// Fallback for an absent or empty biography
pub const NO_BIOGRAPHY: &str = "No biography available";

// ============================================================================
// Metadata proxy wire types
// ============================================================================

/// Envelope returned by the search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

/// A single search result; the first hit is treated as canonical
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub id: u64,
    pub original_title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Full movie metadata from the proxy
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieDetails {
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub name: String,
}

/// Envelope returned by the credits endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct CreditsResponse {
    #[serde(default)]
    pub cast: Vec<CastCredit>,
}

/// One cast entry as billed in the credits
#[derive(Debug, Clone, Deserialize)]
pub struct CastCredit {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Biographical detail for one person
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonDetails {
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub place_of_birth: Option<String>,
}

// ============================================================================
// Aggregated domain types
// ============================================================================

/// One fully enriched roster entry, keyed by cast id
///
/// Roster identity and biography live in a single record so that a failed
/// person lookup can never misalign names against biographies.
#[derive(Debug, Clone, PartialEq)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: String,
    pub profile_url: String,
    pub birthday: String,
    pub biography: String,
    pub place_of_birth: String,
}

impl CastMember {
    /// Builds a roster entry from a credit and an optional person lookup.
    ///
    /// `person` is `None` when the lookup failed; the entry then carries the
    /// fixed fallbacks, preserving roster order and length.
    pub fn from_parts(credit: &CastCredit, image_base: &str, person: Option<PersonDetails>) -> Self {
        let profile_url = credit
            .profile_path
            .as_deref()
            .map(|path| format!("{}{}", image_base, path))
            .unwrap_or_else(|| PROFILE_PLACEHOLDER.to_string());

        let person = person.unwrap_or_default();

        Self {
            id: credit.id,
            name: credit.name.clone(),
            character: credit.character.clone(),
            profile_url,
            birthday: person
                .birthday
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(display_date)
                .unwrap_or_else(|| UNKNOWN.to_string()),
            biography: person
                .biography
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| NO_BIOGRAPHY.to_string()),
            place_of_birth: person
                .place_of_birth
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }
}

/// Resolved movie plus its biography-enriched roster
#[derive(Debug, Clone)]
pub struct MovieBundle {
    pub details: MovieDetails,
    pub cast: Vec<CastMember>,
}

// ============================================================================
// Display transforms
// ============================================================================

/// Formats a runtime in minutes as "H hour(s) M min(s)", dropping the
/// minutes suffix when the runtime divides evenly into hours.
pub fn format_runtime(minutes: u32) -> String {
    if minutes % 60 == 0 {
        format!("{} hour(s)", minutes / 60)
    } else {
        format!("{} hour(s) {} min(s)", minutes / 60, minutes % 60)
    }
}

/// Formats an ISO date ("2010-07-16") as "Jul 16 2010"; unparseable input
/// degrades to the fixed fallback.
pub fn display_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.format("%b %d %Y").to_string())
        .unwrap_or_else(|_| UNKNOWN.to_string())
}

/// Groups digits in threes: 12345 -> "12,345"
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

impl MovieDetails {
    pub fn runtime_display(&self) -> String {
        self.runtime
            .map(format_runtime)
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    pub fn genres_display(&self) -> String {
        self.genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn vote_count_display(&self) -> String {
        group_thousands(self.vote_count)
    }

    pub fn release_date_display(&self) -> String {
        self.release_date
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(display_date)
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    pub fn poster_url(&self, image_base: &str) -> String {
        self.poster_path
            .as_deref()
            .map(|path| format!("{}{}", image_base, path))
            .unwrap_or_else(|| POSTER_PLACEHOLDER.to_string())
    }
}

// ============================================================================
// Render submission
// ============================================================================

/// The flat record posted to the render endpoint
///
/// List-valued fields are serialized as JSON-array strings inside the form,
/// which is the shape the backend expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSubmission {
    pub title: String,
    pub cast_ids: String,
    pub cast_names: String,
    pub cast_chars: String,
    pub cast_profiles: String,
    pub cast_bdays: String,
    pub cast_bios: String,
    pub cast_places: String,
    pub imdb_id: String,
    pub poster: String,
    pub genres: String,
    pub overview: String,
    pub rating: String,
    pub vote_count: String,
    pub release_date: String,
    pub runtime: String,
    pub status: String,
    pub rec_movies: String,
    pub rec_posters: String,
}

fn json_list<T: Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string(value)
        .map_err(|e| AppError::Internal(format!("Submission serialization error: {}", e)))
}

impl RenderSubmission {
    /// Flattens everything the pipeline gathered into one submission
    pub fn assemble(
        title: &str,
        bundle: &MovieBundle,
        recommendations: &[String],
        posters: &[String],
        image_base: &str,
    ) -> AppResult<Self> {
        let cast = &bundle.cast;
        let details = &bundle.details;

        Ok(Self {
            title: title.to_string(),
            cast_ids: json_list(&cast.iter().map(|m| m.id).collect::<Vec<_>>())?,
            cast_names: json_list(&cast.iter().map(|m| m.name.as_str()).collect::<Vec<_>>())?,
            cast_chars: json_list(&cast.iter().map(|m| m.character.as_str()).collect::<Vec<_>>())?,
            cast_profiles: json_list(
                &cast.iter().map(|m| m.profile_url.as_str()).collect::<Vec<_>>(),
            )?,
            cast_bdays: json_list(&cast.iter().map(|m| m.birthday.as_str()).collect::<Vec<_>>())?,
            cast_bios: json_list(&cast.iter().map(|m| m.biography.as_str()).collect::<Vec<_>>())?,
            cast_places: json_list(
                &cast
                    .iter()
                    .map(|m| m.place_of_birth.as_str())
                    .collect::<Vec<_>>(),
            )?,
            imdb_id: details.imdb_id.clone().unwrap_or_default(),
            poster: details.poster_url(image_base),
            genres: details.genres_display(),
            overview: details.overview.clone(),
            rating: details.vote_average.to_string(),
            vote_count: details.vote_count_display(),
            release_date: details.release_date_display(),
            runtime: details.runtime_display(),
            status: details.status.clone(),
            rec_movies: json_list(&recommendations)?,
            rec_posters: json_list(&posters)?,
        })
    }
}

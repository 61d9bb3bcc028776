/// Application-level errors
///
/// One taxonomy for every pipeline stage: transport failures from the HTTP
/// client, non-2xx replies from the backend, and invalid caller input.
/// "Not found" (zero search results, recommendation sentinel) is a view
/// state, not an error, and never appears here.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The initial channel page could not be fetched. Nothing useful
    /// can be produced, so this one reaches the caller.
    #[error("channel page request failed: {0}")]
    PageFetch(#[source] reqwest::Error),

    /// A continuation exchange failed at the transport level.
    /// Ends the walk; posts collected so far are still returned.
    #[error("continuation request failed: {0}")]
    ContinuationFetch(#[source] reqwest::Error),

    /// A continuation exchange returned a body that is not valid JSON.
    #[error("malformed continuation response: {0}")]
    Decode(#[from] serde_json::Error),
}

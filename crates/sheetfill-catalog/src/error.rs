use reqwest::StatusCode;
use thiserror::Error;

/// Failures raised while talking to the catalog API or decoding its payloads.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned http status {status}")]
    Status { url: String, status: StatusCode },

    #[error("could not decode catalog payload: {0}")]
    Decode(#[from] serde_json::Error),
}

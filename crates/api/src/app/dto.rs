use serde::Deserialize;

// -------------------------
// Request DTOs
// -------------------------

/// Query string of `GET /search`. A missing `q` searches for "".
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

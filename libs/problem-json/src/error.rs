//! Codec error taxonomy.

/// Everything that can go wrong in this crate.
///
/// Construction errors surface when a module is configured; wire errors are
/// propagated untouched from the JSON parser. Unknown `type` discriminators
/// and unknown status codes are not errors — they resolve to the catch-all
/// problem and to [`crate::UnknownStatus`] respectively.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two status sources supplied the same status code.
    #[error("duplicate status code {0}")]
    DuplicateStatusCode(u16),

    /// Malformed JSON, or a wire value of the wrong shape.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

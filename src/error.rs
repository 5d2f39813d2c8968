use thiserror::Error;

use crate::{ExtractionFailure, UnknownMethod};

/// Errors that escape the crate's public entry points.
///
/// Returned by [`Inferrer::describe()`](crate::Inferrer::describe) in strict
/// mode; in the default mode extraction failures are folded into the
/// descriptor instead.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("cannot infer request input for {route}: {source}")]
    Extraction {
        route: String,
        #[source]
        source: ExtractionFailure,
    },

    #[error(transparent)]
    Method(#[from] UnknownMethod),
}

use crate::workout::error::DateWindowError;
use crate::workout::error::WorkoutError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ServiceError {
    #[error("WorkoutError: {0}")]
    WorkoutError(#[from] WorkoutError),

    #[error("DateWindowError: {0}")]
    DateWindowError(#[from] DateWindowError),
}

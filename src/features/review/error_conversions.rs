use validator::ValidationErrors;

use crate::data::models::ReviewError;

impl From<ValidationErrors> for ReviewError {
    fn from(err: ValidationErrors) -> Self {
        ReviewError::Validation(err.to_string())
    }
}

impl From<r2d2::Error> for ReviewError {
    fn from(err: r2d2::Error) -> Self {
        ReviewError::PoolError(err.to_string())
    }
}

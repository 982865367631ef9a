pub mod companies;

use axum::Json;

use crate::error::ApiError;

pub type ApiResult<T> = Result<Json<T>, ApiError>;

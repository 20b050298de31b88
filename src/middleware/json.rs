use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON body extractor that reports rejections as `ApiError`.
///
/// Missing or mistyped fields never reach the handler; the client gets the
/// same `{"detail", "code"}` body as every other failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidJson(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

fn rejection_to_error(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(e) => ApiError::validation_error(e.body_text()),
        JsonRejection::JsonSyntaxError(e) => ApiError::invalid_json(e.body_text()),
        JsonRejection::MissingJsonContentType(e) => ApiError::invalid_json(e.body_text()),
        other => ApiError::invalid_json(other.body_text()),
    }
}

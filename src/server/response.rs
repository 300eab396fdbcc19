//! The `{status, message?, data?}` envelope and the translation of service
//! errors into HTTP responses.

use super::metrics::record_error;
use crate::errors::ServiceError;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

pub const SERVER_ERROR_MESSAGE: &str = "Maaf, terjadi kegagalan pada server kami.";

#[derive(Serialize)]
struct Envelope<'a> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

pub type HandlerResult = Result<Response, ServiceError>;

fn envelope(
    code: StatusCode,
    status: &'static str,
    message: Option<&str>,
    data: Option<Value>,
) -> Response {
    (
        code,
        Json(Envelope {
            status,
            message,
            data,
        }),
    )
        .into_response()
}

pub fn success_data(code: StatusCode, data: Value) -> Response {
    envelope(code, "success", None, Some(data))
}

pub fn success_message(code: StatusCode, message: &str) -> Response {
    envelope(code, "success", Some(message), None)
}

pub fn success_message_data(code: StatusCode, message: &str, data: Value) -> Response {
    envelope(code, "success", Some(message), Some(data))
}

pub fn fail(code: StatusCode, message: &str) -> Response {
    envelope(code, "fail", Some(message), None)
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        record_error(self.kind());
        let code = match &self {
            ServiceError::Invariant(_) => StatusCode::BAD_REQUEST,
            ServiceError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Authorization(_) => StatusCode::FORBIDDEN,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ServiceError::Internal(err) => {
                error!("Unexpected error: {:?}", err);
                return envelope(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "error",
                    Some(SERVER_ERROR_MESSAGE),
                    None,
                );
            }
        };
        debug!("Request failed with {}: {}", code, self);
        fail(code, &self.to_string())
    }
}

/// A JSON body that has not been validated yet. Malformed bodies fail with
/// the same envelope as validation errors.
pub struct Payload(pub Value);

impl<S: Send + Sync> FromRequest<S> for Payload {
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Payload(value)),
            Err(rejection) => Err(ServiceError::invariant(rejection_message(&rejection))),
        }
    }
}

fn rejection_message(rejection: &JsonRejection) -> &'static str {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => "Payload harus berupa JSON",
        _ => "Payload JSON tidak valid",
    }
}

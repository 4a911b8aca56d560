//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into the `{ success: false, ... }`
//! envelope with a consistent status code.

use actix_web::dev::ServiceResponse;
use actix_web::error::JsonPayloadError;
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};
use crate::inbound::http::state::HttpState;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest | ErrorCode::Conflict | ErrorCode::PreconditionFailed => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        match self.code() {
            ErrorCode::InternalError => {
                error!(trace_id = ?self.trace_id(), details = ?self.details(), "{}", self.message());
            }
            ErrorCode::ServiceUnavailable => {
                warn!(trace_id = ?self.trace_id(), "{}", self.message());
            }
            _ => {}
        }

        render(self, &redact_if_internal(self))
    }
}

fn render(error: &Error, body: &Error) -> HttpResponse {
    let mut builder = HttpResponse::build(error.status_code());
    if let Some(id) = error.trace_id() {
        builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
    }
    builder.json(body)
}

/// Re-render a redacted internal error with its message and details when
/// [`HttpState::expose_internal_details`] is set.
fn restore_internal_details<B>(
    res: ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let expose = res
        .request()
        .app_data::<web::Data<HttpState>>()
        .is_some_and(|state| state.expose_internal_details);
    let original = res
        .response()
        .error()
        .and_then(|err| err.as_error::<Error>())
        .filter(|err| expose && err.code() == ErrorCode::InternalError)
        .cloned();

    let Some(original) = original else {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    };
    let (req, _) = res.into_parts();
    let detailed = ServiceResponse::new(req, render(&original, &original));
    Ok(ErrorHandlerResponse::Response(detailed.map_into_right_body()))
}

/// Error-handler middleware restoring internal error detail outside
/// production. Production state keeps the redacted envelope.
pub fn internal_error_details<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().handler(StatusCode::INTERNAL_SERVER_ERROR, restore_internal_details)
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

/// Render body-parsing failures through the standard envelope.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "Expected a JSON request body".to_owned(),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "Request body is too large".to_owned()
        }
        other => format!("Invalid JSON body: {other}"),
    };
    Error::invalid_request(message).into()
}

/// Fallback for paths no handler claims.
pub async fn route_not_found(req: HttpRequest) -> ApiResult<HttpResponse> {
    Err(Error::not_found(format!(
        "Route not found - {}",
        req.path()
    )))
}

#[cfg(test)]
mod tests;

//! Rejections from the JSON, query and path extractors, reported with the
//! same `{"error": ...}` body as [`HandlerError`](crate::error::HandlerError).

use actix_web::error::{InternalError, JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use std::fmt::{Debug, Display};
use tracing::warn;

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| match err {
        JsonPayloadError::Deserialize(deserialize_err) => rejection(
            req,
            StatusCode::BAD_REQUEST,
            "Unable to parse JSON payload",
            deserialize_err,
        ),
        _ => {
            warn!(req_path = req.path(), %err, "Rejected JSON payload");
            err.into()
        }
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, req| {
        rejection(
            req,
            StatusCode::BAD_REQUEST,
            "Invalid query parameters",
            err,
        )
    })
}

/// Path segments that do not parse, like a non-numeric user id, name no
/// existing resource.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, req| {
        rejection(req, StatusCode::NOT_FOUND, "Invalid path", err)
    })
}

fn rejection<E>(
    req: &HttpRequest,
    status: StatusCode,
    message: &str,
    cause: E,
) -> actix_web::Error
where
    E: Debug + Display + 'static,
{
    warn!(req_path = req.path(), %cause, "{}", message);
    let error_body = serde_json::json!({
        "error": message,
        "detail": cause.to_string(),
    });
    InternalError::from_response(cause, HttpResponse::build(status).json(error_body)).into()
}

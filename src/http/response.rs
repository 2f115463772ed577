// JSON envelope shared by every API route

use crate::errors::AppError;
use crate::http::middleware::RequestContext;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::error;

#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub timestamp: String,
    pub processing_time_ms: u64,
    pub request_id: String,
}

impl Metadata {
    pub fn from_context(context: &RequestContext) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            processing_time_ms: context.elapsed_ms(),
            request_id: context.request_id.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SuccessBody<T> {
    success: bool,
    data: T,
    metadata: Metadata,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    metadata: Metadata,
}

pub fn success<T: Serialize>(context: &RequestContext, data: T) -> Response {
    Json(SuccessBody {
        success: true,
        data,
        metadata: Metadata::from_context(context),
    })
    .into_response()
}

pub fn failure(context: &RequestContext, err: AppError) -> Response {
    if let AppError::Internal(cause) = &err {
        error!(request_id = %context.request_id, error = %format!("{:#}", cause), "request.error");
    }

    let body = ErrorBody {
        success: false,
        error: err.public_message(),
        metadata: Metadata::from_context(context),
    };
    (err.status(), Json(body)).into_response()
}

pub fn respond<T: Serialize>(context: &RequestContext, result: Result<T, AppError>) -> Response {
    match result {
        Ok(data) => success(context, data),
        Err(err) => failure(context, err),
    }
}

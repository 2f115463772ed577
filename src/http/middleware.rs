use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const PROCESSING_TIME_HEADER: &str = "x-processing-time-ms";

/// Per-request identity and clock, stored in request extensions
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub started: Instant,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            started: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

fn incoming_request_id(request: &Request) -> Option<String> {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

pub async fn request_context_middleware(mut request: Request, next: Next) -> Response {
    let request_id = incoming_request_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());
    let context = RequestContext::new(request_id);

    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    info!(
        request_id = %context.request_id,
        method = %method,
        path = %path,
        "request.start"
    );

    request.extensions_mut().insert(context.clone());
    let mut response = next.run(request).await;

    let duration_ms = context.elapsed_ms();
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&context.request_id) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
    headers.insert(PROCESSING_TIME_HEADER, HeaderValue::from(duration_ms));

    info!(
        request_id = %context.request_id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms,
        "request.end"
    );
    response
}

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id for one upload. Callers may supply their own via the
/// `x-request-id` header; otherwise one is minted here. Handlers read it
/// back out of the request extensions to stamp error bodies.
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Wraps downstream processing in a span carrying the request id, so the
/// decode-strategy warnings and inference errors of one upload share a
/// grep-able key, and echoes the id back on the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let supplied = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let minted = supplied.is_none();
    let request_id = supplied.unwrap_or_else(|| Uuid::new_v4().to_string());

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let span = tracing::info_span!(
        "upload_request",
        request_id = %request_id,
        minted,
        method = %request.method(),
        uri = %request.uri().path()
    );

    let mut response = next.run(request).instrument(span).await;

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER, header_value);
    }

    response
}

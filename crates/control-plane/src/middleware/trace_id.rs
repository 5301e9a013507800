//! Stamps every request with a short trace id before any handler logic
//! runs, attaches it to the tracing span for correlation, and — on a
//! non-2xx response — rewrites the JSON error envelope's `traceId` field
//! in place (§7).

use axum::body::{to_bytes, Body};
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

pub async fn trace_id_middleware(req: Request, next: Next) -> Response {
    let trace_id = short_trace_id();
    let span = tracing::info_span!("request", trace_id = %trace_id, method = %req.method(), path = %req.uri().path());
    let _enter = span.enter();

    let resp = next.run(req).await;
    stamp_trace_id(resp, &trace_id).await
}

fn short_trace_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

async fn stamp_trace_id(resp: Response, trace_id: &str) -> Response {
    if resp.status().is_success() {
        return resp;
    }
    let (mut parts, body) = resp.into_parts();
    let Ok(bytes) = to_bytes(body, 1_usize << 20).await else {
        return Response::from_parts(parts, Body::empty());
    };
    let mut value: serde_json::Value = serde_json::from_slice(&bytes).unwrap_or(serde_json::json!({}));
    if let Some(error) = value.get_mut("error") {
        error["traceId"] = serde_json::json!(trace_id);
    }
    let rewritten = serde_json::to_vec(&value).unwrap_or(bytes.to_vec());
    parts.headers.insert("x-trace-id", trace_id.parse().unwrap());
    Response::from_parts(parts, Body::from(rewritten))
}

//! # 响应信封中间件
//!
//! 对每个请求：分发前记录方法、URL 与请求体；分发后补上 CORS 头，
//! 并在 JSON 对象响应缺少 `success` 字段时注入 `success: true`。
//! Handler 自己设置的 `success` 优先，不会被覆盖。

use std::any::Any;

use axum::body::{Body, Bytes};
use axum::extract::Request;
use axum::http::{HeaderValue, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http_body_util::BodyExt;
use serde_json::Value;

use crate::error::ApiError;

const CORS_HEADERS: [&str; 3] = [
    "access-control-allow-origin",
    "access-control-allow-headers",
    "access-control-allow-methods",
];

/// 信封中间件入口
pub async fn envelope_middleware(req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            return with_cors_headers(
                ApiError::BadRequest(format!("Failed to read request body: {}", e))
                    .into_response(),
            );
        }
    };

    if bytes.is_empty() {
        tracing::debug!("<-- {} {}", parts.method, parts.uri);
    } else {
        tracing::debug!(
            "<-- {} {} with body:\n{}",
            parts.method,
            parts.uri,
            String::from_utf8_lossy(&bytes)
        );
    }

    let response = next.run(Request::from_parts(parts, Body::from(bytes))).await;
    with_cors_headers(inject_success(response).await)
}

/// # Summary
/// 在 JSON 对象响应中补上 `success` 字段。
///
/// # Logic
/// 1. 非 JSON 响应原样返回。
/// 2. 解析为对象且不含 `success` 时插入 `true`，重新序列化并去掉旧的 Content-Length。
async fn inject_success(response: Response) -> Response {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if !is_json {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            return ApiError::Internal(format!("Failed to read response body: {}", e))
                .into_response();
        }
    };

    let bytes = match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(mut map)) if !map.contains_key("success") => {
            map.insert("success".to_string(), Value::Bool(true));
            match serde_json::to_vec(&Value::Object(map)) {
                Ok(encoded) => {
                    parts.headers.remove(header::CONTENT_LENGTH);
                    Bytes::from(encoded)
                }
                Err(_) => bytes,
            }
        }
        _ => bytes,
    };

    tracing::debug!("--> {} {}", parts.status, String::from_utf8_lossy(&bytes));
    Response::from_parts(parts, Body::from(bytes))
}

fn with_cors_headers(mut response: Response) -> Response {
    for name in CORS_HEADERS {
        response
            .headers_mut()
            .insert(name, HeaderValue::from_static("*"));
    }
    response
}

/// # Summary
/// `CatchPanicLayer` 的回调，把 handler 中的 panic 渲染为错误信封。
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };

    tracing::error!("Handler panicked: {}", detail);
    ApiError::Internal(detail).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use serde_json::json;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_success_is_injected_when_absent() {
        let response = Json(json!({"projects": []})).into_response();
        let value = body_json(inject_success(response).await).await;
        assert_eq!(value, json!({"projects": [], "success": true}));
    }

    #[tokio::test]
    async fn test_handler_success_is_kept() {
        let response = Json(json!({"success": false, "errors": ["x"]})).into_response();
        let value = body_json(inject_success(response).await).await;
        assert_eq!(value["success"], json!(false));
    }

    #[tokio::test]
    async fn test_panic_becomes_error_envelope() {
        let response = handle_panic(Box::new("boom"));
        let response = with_cors_headers(response);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
        let value = body_json(response).await;
        assert_eq!(value, json!({"errors": ["boom"], "success": false}));
    }
}

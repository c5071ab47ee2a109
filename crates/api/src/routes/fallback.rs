//! 未匹配请求的兜底处理，保证未知路径与错误动词同样返回错误信封。

use axum::http::{Method, Uri};

use crate::error::ApiError;

/// 未注册的路径
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("Unknown endpoint '{}'", uri.path()))
}

/// 路径存在但动词不受支持，如 `GET /account/read`
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed(format!(
        "Method {} is not allowed for '{}'",
        method,
        uri.path()
    ))
}

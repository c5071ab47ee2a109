//! # API 统一错误处理
//!
//! 将下层各 crate 的错误类型统一映射为错误信封 `{errors: [message], success: false}`。
//! HTTP 状态码仅供参考，客户端只依赖响应体。

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quantdesk_core::project::error::ProjectError;
use thiserror::Error;

use crate::types::ApiErrorResponse;

/// API 层统一错误枚举
#[derive(Error, Debug)]
pub enum ApiError {
    /// 请求参数错误 (400)
    #[error("{0}")]
    BadRequest(String),

    /// 资源未找到 (404)
    #[error("{0}")]
    NotFound(String),

    /// 接口存在但不接受该动词 (405)
    #[error("{0}")]
    MethodNotAllowed(String),

    /// 目标已存在 (409)
    #[error("{0}")]
    Conflict(String),

    /// 下层业务错误 (500)
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// 将 `ApiError` 转换为 axum 的 HTTP 响应
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // 完整细节只进调试日志，响应体只携带可读消息
        tracing::debug!("Request failed: {:?}", self);

        let status = self.status();
        let body = Json(ApiErrorResponse::from_msg(self.to_string()));
        (status, body).into_response()
    }
}

/// 从 `ProjectError` 转换
impl From<ProjectError> for ApiError {
    fn from(err: ProjectError) -> Self {
        match err {
            ProjectError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ProjectError::Conflict(msg) => ApiError::Conflict(msg),
            ProjectError::InvalidState(_) | ProjectError::Config(_) | ProjectError::Io(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_error_mapping() {
        let err: ApiError = ProjectError::NotFound(7).into();
        assert!(matches!(err, ApiError::NotFound(ref msg) if msg == "Project with id 7 not found"));

        let err: ApiError = ProjectError::Conflict("taken".to_string()).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "taken");

        let err = ApiError::MethodNotAllowed("Method GET is not allowed".to_string());
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);

        let err: ApiError = ProjectError::InvalidState("bad language".to_string()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

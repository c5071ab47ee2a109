//! # 账户路由控制器
//!
//! 实现 `/account/read`，返回虚构组织的占位账户。

use axum::Json;
use quantdesk_core::account::entity::Account;

use crate::error::ApiError;
use crate::extract::RequestInput;
use crate::types::{AccountReadRequest, AccountResponse, ApiErrorResponse};

/// 读取组织账户
///
/// 未提供 `organizationId` 时使用虚构组织 ID，余额固定。
#[utoipa::path(
    post,
    path = "/account/read",
    tag = "账户 (Account)",
    request_body = AccountReadRequest,
    responses(
        (status = 200, description = "占位账户", body = AccountResponse),
        (status = 400, description = "请求体无法解析", body = ApiErrorResponse)
    )
)]
pub async fn read_account(input: RequestInput) -> Result<Json<AccountResponse>, ApiError> {
    let organization_id = input.get("organizationId").map(str::to_string);
    Ok(Json(Account::placeholder(organization_id).into()))
}

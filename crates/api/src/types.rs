//! # DTO (Data Transfer Object) 层
//!
//! 将内部领域模型转化为与云端 API 同形的 JSON 结构体。
//! 所有 DTO 必须派生 `utoipa::ToSchema` 以自动进入 Swagger 文档。

use chrono::{DateTime, Utc};
use quantdesk_core::account::entity::Account;
use quantdesk_core::common::{
    FAKE_MEMBER_ID, FAKE_MEMBER_NAME, FAKE_ORGANIZATION_ID, FAKE_PROFILE_IMAGE,
};
use quantdesk_core::project::entity::{CreatedProject, Language, Project};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================
//  通用信封
// ============================================================

/// 错误信封
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 可读错误消息，至少一条
    #[schema(example = json!(["Project with id 7 not found"]))]
    pub errors: Vec<String>,
    /// 固定为 false
    pub success: bool,
}

impl ApiErrorResponse {
    /// 从错误信息构建
    pub fn from_msg(msg: impl Into<String>) -> Self {
        Self {
            errors: vec![msg.into()],
            success: false,
        }
    }
}

/// 无载荷的成功响应，中间件会补上 `success: true`
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct EmptyResponse {}

// ============================================================
//  账户相关 DTO
// ============================================================

/// `account/read` 请求体
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountReadRequest {
    /// 组织 ID，缺省时使用虚构组织
    pub organization_id: Option<String>,
}

/// 组织账户 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    #[schema(example = "fake-organization-id")]
    pub organization_id: String,
    #[schema(example = 1000)]
    pub credit_balance: i64,
}

// ============================================================
//  项目相关 DTO
// ============================================================

/// 仅携带项目 ID 的请求 (`projects/read` 与 `projects/delete`)
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIdRequest {
    #[schema(example = 123456789)]
    pub project_id: Option<i64>,
}

/// `projects/update` 请求体，各字段独立生效
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdateRequest {
    pub project_id: i64,
    pub description: Option<String>,
    /// 空数组表示清空全部参数
    pub parameters: Option<Vec<ParameterResponse>>,
    /// 新的相对路径，开头的 `/` 会被去掉
    pub name: Option<String>,
}

/// `projects/create` 请求体
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProjectCreateRequest {
    #[schema(example = "Momentum")]
    pub name: String,
    /// `Py` 表示 Python，其余取值表示 C#
    #[schema(example = "Py")]
    pub language: String,
}

/// 项目参数键值对
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ParameterResponse {
    #[schema(example = "ema-period")]
    pub key: String,
    #[schema(example = "20")]
    pub value: String,
}

/// 项目协作者，本地模式下只有虚构的所有者一人
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CollaboratorResponse {
    pub id: i64,
    pub uid: i64,
    pub blivecontrol: bool,
    pub epermission: String,
    pub profileimage: String,
    pub name: String,
    pub owner: bool,
}

impl CollaboratorResponse {
    fn local_owner() -> Self {
        Self {
            id: 0,
            uid: FAKE_MEMBER_ID,
            blivecontrol: true,
            epermission: "write".to_string(),
            profileimage: FAKE_PROFILE_IMAGE.to_string(),
            name: FAKE_MEMBER_NAME.to_string(),
            owner: true,
        }
    }
}

/// 实盘状态，本地项目永远未部署
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LiveResultsResponse {
    #[serde(rename = "eStatus")]
    #[schema(example = "Undefined")]
    pub e_status: String,
}

/// 完整项目记录 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    #[schema(example = 123456789)]
    pub project_id: i64,
    pub organization_id: String,
    /// 相对工作区根目录的路径
    #[schema(example = "team/Momentum")]
    pub name: String,
    pub description: String,
    pub modified: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub language: Language,
    pub collaborators: Vec<CollaboratorResponse>,
    pub lean_version_id: i64,
    pub lean_pinned_to_master: bool,
    pub parameters: Vec<ParameterResponse>,
    pub live_results: LiveResultsResponse,
    #[schema(value_type = Vec<Object>)]
    pub libraries: Vec<serde_json::Value>,
}

/// 新建项目记录 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedProjectResponse {
    pub project_id: i64,
    pub name: String,
    pub modified: DateTime<Utc>,
    pub created: DateTime<Utc>,
}

/// `projects/read` 响应
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectResponse>,
}

/// `projects/create` 响应
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatedProjectListResponse {
    pub projects: Vec<CreatedProjectResponse>,
}

// ============================================================
//  领域模型 → DTO 惯用转换 (impl From<T>)
// ============================================================

impl From<Account> for AccountResponse {
    fn from(a: Account) -> Self {
        Self {
            organization_id: a.organization_id,
            credit_balance: a.credit_balance,
        }
    }
}

impl From<Project> for ProjectResponse {
    fn from(p: Project) -> Self {
        Self {
            project_id: p.id,
            organization_id: FAKE_ORGANIZATION_ID.to_string(),
            name: p.name,
            description: p.description,
            modified: p.modified,
            created: p.created,
            language: p.language,
            collaborators: vec![CollaboratorResponse::local_owner()],
            lean_version_id: -1,
            lean_pinned_to_master: true,
            parameters: p
                .parameters
                .into_iter()
                .map(|(key, value)| ParameterResponse { key, value })
                .collect(),
            live_results: LiveResultsResponse {
                e_status: "Undefined".to_string(),
            },
            libraries: Vec::new(),
        }
    }
}

impl From<CreatedProject> for CreatedProjectResponse {
    fn from(c: CreatedProject) -> Self {
        Self {
            project_id: c.id,
            name: c.name,
            modified: c.modified,
            created: c.created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use quantdesk_core::project::entity::ParameterSet;

    #[test]
    fn test_project_response_has_cloud_shape() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let parameters: ParameterSet = [("b", "2"), ("a", "1")].into_iter().collect();

        let project = Project {
            id: 123456789,
            name: "team/Alpha".to_string(),
            language: Language::CSharp,
            description: String::new(),
            parameters,
            created: ts,
            modified: ts,
        };

        let value = serde_json::to_value(ProjectResponse::from(project)).unwrap();
        assert_eq!(value["projectId"], json!(123456789));
        assert_eq!(value["organizationId"], json!(FAKE_ORGANIZATION_ID));
        assert_eq!(value["language"], json!("C#"));
        assert_eq!(value["leanVersionId"], json!(-1));
        assert_eq!(value["leanPinnedToMaster"], json!(true));
        assert_eq!(
            value["parameters"],
            json!([{"key": "b", "value": "2"}, {"key": "a", "value": "1"}])
        );
        assert_eq!(value["liveResults"], json!({"eStatus": "Undefined"}));
        assert_eq!(value["libraries"], json!([]));
        assert_eq!(value["collaborators"][0]["owner"], json!(true));
        assert_eq!(value["collaborators"][0]["epermission"], json!("write"));
    }

    #[test]
    fn test_empty_response_is_empty_object() {
        assert_eq!(serde_json::to_value(EmptyResponse::default()).unwrap(), json!({}));
    }

    #[test]
    fn test_error_envelope() {
        let value = serde_json::to_value(ApiErrorResponse::from_msg("boom")).unwrap();
        assert_eq!(value, json!({"errors": ["boom"], "success": false}));
    }
}

//! # 项目路由控制器
//!
//! 实现 `/projects/{read,update,create,delete}`，四个接口都同时接受 GET 与 POST。

use axum::Json;
use axum::extract::State;
use quantdesk_core::project::entity::Language;

use crate::error::ApiError;
use crate::extract::RequestInput;
use crate::server::AppState;
use crate::types::{
    ApiErrorResponse, CreatedProjectListResponse, CreatedProjectResponse, EmptyResponse,
    ProjectCreateRequest, ProjectIdRequest, ProjectListResponse, ProjectResponse,
    ProjectUpdateRequest,
};

/// 读取项目
///
/// 带 `projectId` 时只返回该项目，否则返回工作区内的全部项目。
#[utoipa::path(
    method(get, post),
    path = "/projects/read",
    tag = "项目 (Project)",
    params(("projectId" = Option<i64>, Query, description = "GET 请求时从查询串读取")),
    request_body = ProjectIdRequest,
    responses(
        (status = 200, description = "项目列表", body = ProjectListResponse),
        (status = 404, description = "项目不存在", body = ApiErrorResponse)
    )
)]
pub async fn read_projects(
    State(state): State<AppState>,
    input: RequestInput,
) -> Result<Json<ProjectListResponse>, ApiError> {
    let project_id = input.optional_i64("projectId")?;
    let projects = state.project_service.read(project_id)?;

    Ok(Json(ProjectListResponse {
        projects: projects.into_iter().map(ProjectResponse::from).collect(),
    }))
}

/// 局部更新项目
///
/// 依次应用描述、参数与重命名，仅处理请求中出现的字段。
#[utoipa::path(
    method(get, post),
    path = "/projects/update",
    tag = "项目 (Project)",
    request_body = ProjectUpdateRequest,
    responses(
        (status = 200, description = "更新成功", body = EmptyResponse),
        (status = 404, description = "项目不存在", body = ApiErrorResponse),
        (status = 409, description = "重命名目标已存在", body = ApiErrorResponse)
    )
)]
pub async fn update_project(
    State(state): State<AppState>,
    input: RequestInput,
) -> Result<Json<EmptyResponse>, ApiError> {
    let project_id = input.require_i64("projectId")?;
    let update = input.project_update()?;
    state.project_service.update(project_id, update)?;
    Ok(Json(EmptyResponse::default()))
}

/// 新建项目
///
/// `language` 为 `Py` 时创建 Python 项目，其余取值创建 C# 项目。
#[utoipa::path(
    method(get, post),
    path = "/projects/create",
    tag = "项目 (Project)",
    request_body = ProjectCreateRequest,
    responses(
        (status = 200, description = "新建的项目", body = CreatedProjectListResponse),
        (status = 409, description = "同名目录已存在", body = ApiErrorResponse)
    )
)]
pub async fn create_project(
    State(state): State<AppState>,
    input: RequestInput,
) -> Result<Json<CreatedProjectListResponse>, ApiError> {
    let name = input.require("name")?;
    let language = Language::from_selector(input.require("language")?);
    let created = state.project_service.create(name, language)?;

    Ok(Json(CreatedProjectListResponse {
        projects: vec![CreatedProjectResponse::from(created)],
    }))
}

/// 删除项目目录及其全部内容
#[utoipa::path(
    method(get, post),
    path = "/projects/delete",
    tag = "项目 (Project)",
    request_body = ProjectIdRequest,
    responses(
        (status = 200, description = "删除成功", body = EmptyResponse),
        (status = 404, description = "项目不存在", body = ApiErrorResponse)
    )
)]
pub async fn delete_project(
    State(state): State<AppState>,
    input: RequestInput,
) -> Result<Json<EmptyResponse>, ApiError> {
    let project_id = input.require_i64("projectId")?;
    state.project_service.delete(project_id)?;
    Ok(Json(EmptyResponse::default()))
}

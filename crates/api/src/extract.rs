//! # 请求入参提取器
//!
//! 每个动词只认一个入参来源：GET 读取查询串，POST 读取请求体
//! (JSON 对象或 `application/x-www-form-urlencoded`)。
//! JSON 请求体会被展平成与表单相同的键空间，参数列表展开为
//! `parameters[i][key]` / `parameters[i][value]`。

use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::extract::{FromRequest, Query, Request};
use axum::http::{Method, header};
use axum::Form;
use quantdesk_core::project::entity::{ParameterSet, ParameterUpdate, ProjectUpdate};
use serde_json::Value;

use crate::error::ApiError;

/// 参数集合的键名，单独出现时表示清空
const PARAMETERS_KEY: &str = "parameters";

/// # Summary
/// 展平后的请求入参。
///
/// # Invariants
/// - 所有取值都是字符串，JSON 中的数字与布尔值以其文本形式保存。
/// - JSON 中值为 `null` 的字段视为不存在 (`parameters` 除外)。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInput {
    fields: BTreeMap<String, String>,
}

impl<S> FromRequest<S> for RequestInput
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if req.method() == Method::GET {
            let Query(pairs): Query<Vec<(String, String)>> = Query::try_from_uri(req.uri())
                .map_err(|e| ApiError::BadRequest(format!("Invalid query string: {}", e)))?;
            return Ok(Self::from_pairs(pairs));
        }

        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(pairs): Form<Vec<(String, String)>> = Form::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(format!("Invalid form body: {}", e)))?;
            return Ok(Self::from_pairs(pairs));
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read request body: {}", e)))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))?;
        Self::from_json(value)
    }
}

impl RequestInput {
    /// 从查询串或表单键值对构建，重复的键以最后一次出现为准
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            fields: pairs.into_iter().collect(),
        }
    }

    /// # Summary
    /// 把 JSON 请求体展平为表单键空间。
    ///
    /// # Logic
    /// 1. 顶层必须是对象。
    /// 2. `parameters` 为非空数组 (`[{key, value}]`) 或非空对象时逐项展开为带下标的键。
    /// 3. `parameters` 为空数组、空对象、`null` 或空字符串时保留裸键，作为清空信号。
    /// 4. 其余字段：`null` 跳过，字符串原样保存，其它取值保存其 JSON 文本。
    pub fn from_json(value: Value) -> Result<Self, ApiError> {
        let Value::Object(map) = value else {
            return Err(ApiError::BadRequest(
                "Request body must be a JSON object".to_string(),
            ));
        };

        let mut fields = BTreeMap::new();
        for (key, value) in map {
            if key == PARAMETERS_KEY {
                flatten_parameters(value, &mut fields)?;
            } else if let Some(text) = scalar_text(value) {
                fields.insert(key, text);
            }
        }

        Ok(Self { fields })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// 读取必填字段，缺失时返回 BadRequest
    pub fn require(&self, key: &str) -> Result<&str, ApiError> {
        self.get(key)
            .ok_or_else(|| ApiError::BadRequest(format!("Missing required field '{}'", key)))
    }

    /// 读取可选的整数字段
    pub fn optional_i64(&self, key: &str) -> Result<Option<i64>, ApiError> {
        self.get(key).map(|raw| parse_i64(key, raw)).transpose()
    }

    /// 读取必填的整数字段
    pub fn require_i64(&self, key: &str) -> Result<i64, ApiError> {
        parse_i64(key, self.require(key)?)
    }

    /// # Summary
    /// 解析参数集合的更新方式。
    ///
    /// # Logic
    /// 1. 出现裸键 `parameters` 时清空。
    /// 2. 否则从下标 0 开始读取 `parameters[i][key]`，直到下标不连续为止，保持下标顺序。
    /// 3. 两者都没有时返回 `None`，表示不修改参数。
    pub fn parameter_update(&self) -> Result<Option<ParameterUpdate>, ApiError> {
        if self.contains(PARAMETERS_KEY) {
            return Ok(Some(ParameterUpdate::Clear));
        }

        let mut parameters = ParameterSet::new();
        let mut index = 0usize;
        while let Some(key) = self.get(&parameter_field(index, "key")) {
            let value = self.require(&parameter_field(index, "value"))?;
            parameters.insert(key, value);
            index += 1;
        }

        if index == 0 {
            Ok(None)
        } else {
            Ok(Some(ParameterUpdate::Replace(parameters)))
        }
    }

    /// 组装 `projects/update` 的局部更新
    pub fn project_update(&self) -> Result<ProjectUpdate, ApiError> {
        Ok(ProjectUpdate {
            description: self.get("description").map(str::to_string),
            parameters: self.parameter_update()?,
            name: self.get("name").map(str::to_string),
        })
    }
}

fn parse_i64(key: &str, raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Field '{}' must be an integer, got '{}'", key, raw)))
}

fn parameter_field(index: usize, field: &str) -> String {
    format!("{}[{}][{}]", PARAMETERS_KEY, index, field)
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn flatten_parameters(
    value: Value,
    fields: &mut BTreeMap<String, String>,
) -> Result<(), ApiError> {
    match value {
        Value::Array(items) if !items.is_empty() => {
            for (index, item) in items.into_iter().enumerate() {
                let Value::Object(mut entry) = item else {
                    return Err(ApiError::BadRequest(format!(
                        "Parameter at index {} must be an object with 'key' and 'value'",
                        index
                    )));
                };
                for field in ["key", "value"] {
                    if let Some(text) = entry.remove(field).and_then(scalar_text) {
                        fields.insert(parameter_field(index, field), text);
                    }
                }
            }
        }
        Value::Object(map) if !map.is_empty() => {
            for (index, (key, value)) in map.into_iter().enumerate() {
                fields.insert(parameter_field(index, "key"), key);
                fields.insert(
                    parameter_field(index, "value"),
                    scalar_text(value).unwrap_or_default(),
                );
            }
        }
        Value::Array(_) | Value::Object(_) | Value::Null => {
            fields.insert(PARAMETERS_KEY.to_string(), String::new());
        }
        Value::String(s) if s.is_empty() => {
            fields.insert(PARAMETERS_KEY.to_string(), String::new());
        }
        other => {
            return Err(ApiError::BadRequest(format!(
                "Field 'parameters' must be a list of key/value pairs, got {}",
                other
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs(items: &[(&str, &str)]) -> RequestInput {
        RequestInput::from_pairs(items.iter().map(|(k, v)| (k.to_string(), v.to_string())))
    }

    #[test]
    fn test_json_scalars_become_text() {
        let input = RequestInput::from_json(json!({
            "projectId": 123456789,
            "description": "hello",
            "flag": true,
            "name": null
        }))
        .unwrap();

        assert_eq!(input.require_i64("projectId").unwrap(), 123456789);
        assert_eq!(input.get("description"), Some("hello"));
        assert_eq!(input.get("flag"), Some("true"));
        assert!(!input.contains("name"));
    }

    #[test]
    fn test_json_parameter_list_is_flattened() {
        let input = RequestInput::from_json(json!({
            "parameters": [{"key": "z", "value": "1"}, {"key": "a", "value": 2}]
        }))
        .unwrap();

        assert_eq!(input.get("parameters[0][key]"), Some("z"));
        assert_eq!(input.get("parameters[1][value]"), Some("2"));

        let expected: ParameterSet = [("z", "1"), ("a", "2")].into_iter().collect();
        assert_eq!(
            input.parameter_update().unwrap(),
            Some(ParameterUpdate::Replace(expected))
        );
    }

    #[test]
    fn test_empty_parameters_mean_clear() {
        for empty in [json!([]), json!({}), json!(null), json!("")] {
            let input = RequestInput::from_json(json!({ "parameters": empty })).unwrap();
            assert_eq!(input.parameter_update().unwrap(), Some(ParameterUpdate::Clear));
        }

        let input = pairs(&[("parameters", "")]);
        assert_eq!(input.parameter_update().unwrap(), Some(ParameterUpdate::Clear));
    }

    #[test]
    fn test_form_parameters_stop_at_first_gap() {
        let input = pairs(&[
            ("parameters[0][key]", "a"),
            ("parameters[0][value]", "1"),
            ("parameters[2][key]", "c"),
            ("parameters[2][value]", "3"),
        ]);

        let expected: ParameterSet = [("a", "1")].into_iter().collect();
        assert_eq!(
            input.parameter_update().unwrap(),
            Some(ParameterUpdate::Replace(expected))
        );
    }

    #[test]
    fn test_missing_parameters_leave_them_untouched() {
        let input = pairs(&[("description", "x")]);
        let update = input.project_update().unwrap();
        assert_eq!(update.parameters, None);
        assert_eq!(update.description.as_deref(), Some("x"));
        assert_eq!(update.name, None);
    }

    #[test]
    fn test_parameter_without_value_is_rejected() {
        let input = pairs(&[("parameters[0][key]", "a")]);
        assert!(matches!(input.parameter_update(), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_required_fields() {
        let input = pairs(&[("projectId", "abc")]);
        assert!(matches!(input.require("name"), Err(ApiError::BadRequest(_))));
        assert!(matches!(input.require_i64("projectId"), Err(ApiError::BadRequest(_))));
        assert_eq!(input.optional_i64("missing").unwrap(), None);
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        assert!(matches!(
            RequestInput::from_json(json!([1, 2])),
            Err(ApiError::BadRequest(_))
        ));
    }
}

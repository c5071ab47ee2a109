use crate::common::FAKE_ORGANIZATION_ID;
use serde::{Deserialize, Serialize};

/// 本地模式下固定返回的信用余额
pub const PLACEHOLDER_CREDIT_BALANCE: i64 = 1000;

/// # Summary
/// 组织账户实体，本地模式下为虚构数据。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub organization_id: String,
    pub credit_balance: i64,
}

impl Account {
    /// # Summary
    /// 构造占位账户。
    ///
    /// # Logic
    /// 1. 未提供组织 ID 时使用虚构组织 ID。
    /// 2. 余额固定为 `PLACEHOLDER_CREDIT_BALANCE`。
    pub fn placeholder(organization_id: Option<String>) -> Self {
        Self {
            organization_id: organization_id.unwrap_or_else(|| FAKE_ORGANIZATION_ID.to_string()),
            credit_balance: PLACEHOLDER_CREDIT_BALANCE,
        }
    }
}

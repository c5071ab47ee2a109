pub mod time;

/// # Summary
/// 本地模式下虚构的组织身份。
///
/// # Invariants
/// - 本地 API 不做鉴权，所有记录都挂在这个固定组织下。
pub const FAKE_ORGANIZATION_ID: &str = "fake-organization-id";

/// 虚构组织唯一成员的用户 ID
pub const FAKE_MEMBER_ID: i64 = 0;

/// 虚构组织唯一成员的显示名
pub const FAKE_MEMBER_NAME: &str = "You";

/// 协作者头像占位图
pub const FAKE_PROFILE_IMAGE: &str = "https://cdn.quantconnect.com/i/tu/qc-logo.svg";

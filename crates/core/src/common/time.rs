use chrono::{DateTime, TimeDelta, Utc};
use std::sync::RwLock;

/// # Summary
/// 时钟接口。新建项目记录的 created / modified 取自这里。
pub trait TimeProvider: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 系统时钟
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// # Summary
/// 停在固定时刻的时钟，只在调用 `advance` 时前进。
///
/// # Invariants
/// - 时间只增不减；溢出时保持原值。
pub struct FixedClock {
    instant: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: RwLock::new(instant),
        }
    }

    /// 向前拨动时钟，负的步长被忽略
    pub fn advance(&self, step: TimeDelta) {
        if step <= TimeDelta::zero() {
            return;
        }
        let mut instant = self
            .instant
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(next) = instant.checked_add_signed(step) {
            *instant = next;
        }
    }
}

impl TimeProvider for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self
            .instant
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

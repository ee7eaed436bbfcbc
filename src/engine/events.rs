// ==========================================
// 图书借阅系统 - 借阅事件发布
// ==========================================
// 职责: 定义借阅事件发布 trait，供外部观察者接入（审计、统计等）
// 说明: 发布者由 LendingService 持有, 不进入 Library 快照
// 红线: 发布失败只记录日志, 不影响借还操作
// ==========================================

use crate::domain::types::{Classification, Day, RequestId, UserId, WorkId};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Arc;

// ==========================================
// 借阅事件
// ==========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LendingEvent {
    /// 借出成功
    LoanCreated {
        request_id: RequestId,
        user_id: UserId,
        work_id: WorkId,
        deadline: Day,
    },
    /// 归还（fine > 0 表示逾期）
    WorkReturned {
        request_id: RequestId,
        user_id: UserId,
        work_id: WorkId,
        fine: i32,
    },
    /// 罚金结清
    FineSettled { user_id: UserId, amount: i32 },
    /// 分级变化
    ClassificationChanged {
        user_id: UserId,
        from: Classification,
        to: Classification,
    },
    /// 作品下架
    WorkDecommissioned {
        work_id: WorkId,
        detached_requests: usize,
        removed_creators: Vec<String>,
    },
}

impl LendingEvent {
    /// 转换为字符串标识
    pub fn as_str(&self) -> &str {
        match self {
            LendingEvent::LoanCreated { .. } => "LoanCreated",
            LendingEvent::WorkReturned { .. } => "WorkReturned",
            LendingEvent::FineSettled { .. } => "FineSettled",
            LendingEvent::ClassificationChanged { .. } => "ClassificationChanged",
            LendingEvent::WorkDecommissioned { .. } => "WorkDecommissioned",
        }
    }
}

// ==========================================
// 事件发布 Trait
// ==========================================

/// 借阅事件发布者
pub trait LendingEventPublisher: Send + Sync {
    /// 发布借阅事件
    fn publish(&self, event: &LendingEvent) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// 空操作事件发布者
///
/// 用于不需要事件发布的场景（如单元测试）
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

impl LendingEventPublisher for NoOpEventPublisher {
    fn publish(&self, event: &LendingEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        tracing::debug!("NoOpEventPublisher: 跳过事件发布 - event_type={}", event.as_str());
        Ok(())
    }
}

/// 可选的事件发布者包装
///
/// 简化 Option<Arc<dyn LendingEventPublisher>> 的使用
#[derive(Clone, Default)]
pub struct OptionalEventPublisher {
    inner: Option<Arc<dyn LendingEventPublisher>>,
}

impl OptionalEventPublisher {
    /// 创建带发布者的实例
    pub fn with_publisher(publisher: Arc<dyn LendingEventPublisher>) -> Self {
        Self {
            inner: Some(publisher),
        }
    }

    /// 创建空实例（不发布事件）
    pub fn none() -> Self {
        Self { inner: None }
    }

    /// 发布事件（如果有发布者）; 失败只记录告警
    pub fn publish(&self, event: LendingEvent) {
        let Some(publisher) = &self.inner else {
            return;
        };
        if let Err(e) = publisher.publish(&event) {
            tracing::warn!("借阅事件发布失败: event_type={}, error={}", event.as_str(), e);
        }
    }

    /// 检查是否配置了发布者
    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}

impl std::fmt::Debug for OptionalEventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionalEventPublisher")
            .field("configured", &self.is_configured())
            .finish()
    }
}

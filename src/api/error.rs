// ==========================================
// 图书借阅系统 - API层错误类型
// ==========================================
// 职责: 借还操作的统一错误类型; 所有错误均可恢复, 失败时不留部分修改
// ==========================================

use crate::domain::error::{InvalidField, InventoryUnderflow};
use crate::domain::types::{Day, UserId, WorkId};
use crate::engine::ledger::LedgerError;
use crate::engine::rule_chain::RuleViolation;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LendingError {
    // ==========================================
    // 资源未找到
    // ==========================================
    #[error("读者不存在: user_id={0}")]
    UserNotFound(UserId),

    #[error("作品不存在: work_id={0}")]
    WorkNotFound(WorkId),

    #[error("创作者不存在: {0}")]
    CreatorNotFound(String),

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error(transparent)]
    RuleFailed(#[from] RuleViolation),

    #[error("无效参数: {0}")]
    InvalidArgument(#[from] InvalidField),

    #[error(transparent)]
    InventoryUnderflow(#[from] InventoryUnderflow),

    // ==========================================
    // 数值越界（日期或罚金超出 i32 范围）
    // ==========================================
    #[error("日期超出可表示范围: today={today}, days={days}")]
    DayOverflow { today: Day, days: i32 },

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    // ==========================================
    // 状态不一致（调用方误用）
    // ==========================================
    #[error("作品未被该读者借阅: work_id={work_id}, user_id={user_id}")]
    WorkNotBorrowed { user_id: UserId, work_id: WorkId },

    #[error("读者处于正常状态, 无罚金可缴: user_id={0}")]
    UserNotSuspended(UserId),

    #[error("读者因逾期未还被暂停, 但无待缴罚金: user_id={0}")]
    NoOutstandingFine(UserId),
}

impl LendingError {
    /// 失败的借阅规则编号（非规则错误时为 None）
    pub fn rule_id(&self) -> Option<u8> {
        match self {
            LendingError::RuleFailed(violation) => Some(violation.rule_id()),
            _ => None,
        }
    }
}

pub type LendingResult<T> = Result<T, LendingError>;

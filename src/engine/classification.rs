// ==========================================
// 图书借阅系统 - 读者分级迁移引擎
// ==========================================
// 职责: 由借阅历史（最近的在前）推导读者下一分级
// 红线: 无状态、无副作用; 一次求值可连跳两级
// ==========================================
// 迁移规则:
// - Normal:    最近 3 次借阅均逾期归还 → Faltoso
//              否则最近 5 次均按时归还 → Cumpridor
// - Faltoso:   最近 3 次均按时归还 → 按 Normal 规则重新判定
// - Cumpridor: 最近 5 次中有逾期归还 → 按 Normal 规则重新判定
// ==========================================

use crate::domain::library::RequestBook;
use crate::domain::request::Request;
use crate::domain::types::Classification;
use crate::domain::user::User;

/// Normal → Faltoso: 最近 N 次全部逾期
pub const LATE_WINDOW: usize = 3;
/// Normal → Cumpridor: 连续 N 次按时
pub const PROMOTION_STREAK: usize = 5;
/// Faltoso 恢复: 连续 N 次按时
pub const RECOVERY_STREAK: usize = 3;
/// Cumpridor 降级: 最近 N 次中出现逾期
pub const DEMOTION_WINDOW: usize = 5;

// ==========================================
// ReturnHistory - 借阅历史视图
// ==========================================
/// 按发起时间倒序排列的借阅记录
#[derive(Debug, Clone)]
pub struct ReturnHistory<'a> {
    requests: Vec<&'a Request>,
}

impl<'a> ReturnHistory<'a> {
    /// 读者的完整借阅历史
    pub fn of(user: &User, requests: &'a RequestBook) -> Self {
        Self {
            requests: user
                .history()
                .iter()
                .filter_map(|id| requests.get(id))
                .collect(),
        }
    }

    pub fn from_requests(requests: Vec<&'a Request>) -> Self {
        Self { requests }
    }

    /// 从最近一次起连续按时归还的次数（最多 limit）
    ///
    /// 未归还的借阅（无论是否已逾期）中断连续计数
    pub fn consecutive_on_time(&self, limit: usize) -> usize {
        self.requests
            .iter()
            .take(limit)
            .take_while(|r| r.was_returned_on_time())
            .count()
    }

    /// 最近 window 次借阅中逾期归还的次数
    pub fn recent_late(&self, window: usize) -> usize {
        self.requests
            .iter()
            .take(window)
            .filter(|r| r.was_returned_late())
            .count()
    }
}

// ==========================================
// ClassificationEngine - 纯函数
// ==========================================
pub struct ClassificationEngine;

impl ClassificationEngine {
    /// 求下一分级
    pub fn next(current: Classification, history: &ReturnHistory<'_>) -> Classification {
        match current {
            Classification::Normal => Self::from_normal(history),
            Classification::Faltoso => {
                if history.consecutive_on_time(RECOVERY_STREAK) == RECOVERY_STREAK {
                    Self::from_normal(history)
                } else {
                    Classification::Faltoso
                }
            }
            Classification::Cumpridor => {
                if history.recent_late(DEMOTION_WINDOW) > 0 {
                    Self::from_normal(history)
                } else {
                    Classification::Cumpridor
                }
            }
        }
    }

    fn from_normal(history: &ReturnHistory<'_>) -> Classification {
        if history.recent_late(LATE_WINDOW) == LATE_WINDOW {
            Classification::Faltoso
        } else if history.consecutive_on_time(PROMOTION_STREAK) == PROMOTION_STREAK {
            Classification::Cumpridor
        } else {
            Classification::Normal
        }
    }
}

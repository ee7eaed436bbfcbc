// ==========================================
// 图书借阅系统 - 读者账本引擎
// ==========================================
// 职责: 归还记账、罚金累计与结清、active 标记与分级重算
// 红线: active == false 当且仅当 罚金 > 0 或 存在逾期未还的借阅
// ==========================================

use crate::domain::library::RequestBook;
use crate::domain::types::{Classification, Day, RequestId, UserId, WorkId};
use crate::domain::user::User;
use crate::engine::classification::{ClassificationEngine, ReturnHistory};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 账本记账失败; 失败时读者与借阅均未被修改
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("借阅记录不存在: request_id={0}")]
    RequestNotFound(RequestId),

    #[error("罚金超出可表示范围: user_id={user_id}, request_id={request_id}")]
    FineOverflow { user_id: UserId, request_id: RequestId },
}

/// 分级变化
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationChange {
    pub user_id: UserId,
    pub from: Classification,
    pub to: Classification,
}

/// 归还结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnOutcome {
    pub request_id: RequestId,
    /// 本次产生的罚金（按时归还为 0）
    pub fine: i32,
    /// 借阅是否已关闭（无罚金时立即关闭）
    pub closed: bool,
    pub classification_change: Option<ClassificationChange>,
}

/// 罚金结清结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub user_id: UserId,
    /// 结清金额
    pub amount: i32,
    /// 被结清并关闭的借阅
    pub settled: Vec<RequestId>,
    pub reactivated: bool,
}

pub struct UserLedger;

impl UserLedger {
    /// 无罚金且无逾期未还的借阅
    pub fn has_no_suspension_flags(user: &User, requests: &RequestBook, today: Day) -> bool {
        user.total_fines == 0
            && !user
                .active_requests
                .iter()
                .filter_map(|id| requests.get(id))
                .any(|r| r.is_overdue(today))
    }

    /// 重算 active 标记与分级
    pub fn update_state(
        user: &mut User,
        requests: &RequestBook,
        today: Day,
    ) -> Option<ClassificationChange> {
        user.active = Self::has_no_suspension_flags(user, requests, today);

        let from = user.classification;
        let to = ClassificationEngine::next(from, &ReturnHistory::of(user, requests));
        user.classification = to;

        if from == to {
            return None;
        }
        tracing::info!(user_id = user.id, %from, %to, "读者分级变化");
        Some(ClassificationChange {
            user_id: user.id,
            from,
            to,
        })
    }

    /// 查找该读者对指定作品未归还的借阅
    pub fn find_unreturned(user: &User, requests: &RequestBook, work_id: WorkId) -> Option<RequestId> {
        user.active_requests.iter().copied().find(|id| {
            requests
                .get(id)
                .map_or(false, |r| r.work_id == work_id && !r.has_been_returned())
        })
    }

    /// 归还记账
    ///
    /// 逾期归还: 罚金计入余额并暂停读者, 借阅保留在在借集合直至结清;
    /// 按时归还: 借阅立即关闭
    pub fn return_request(
        user: &mut User,
        requests: &mut RequestBook,
        request_id: RequestId,
        today: Day,
        fine_per_day: i32,
    ) -> Result<ReturnOutcome, LedgerError> {
        let overflow = LedgerError::FineOverflow {
            user_id: user.id,
            request_id,
        };
        let request = requests
            .get_mut(&request_id)
            .ok_or(LedgerError::RequestNotFound(request_id))?;

        // 先算出罚金与新余额, 溢出时不做任何修改
        let fine = request
            .fine_on(today, fine_per_day)
            .ok_or_else(|| overflow.clone())?;
        let total_fines = user.total_fines.checked_add(fine).ok_or(overflow)?;

        request.mark_returned(today);
        let late = request.was_returned_late();

        if late {
            user.total_fines = total_fines;
            user.active = false;
            tracing::info!(user_id = user.id, request_id, fine, "逾期归还, 产生罚金");
        } else {
            user.close_request(request_id);
        }

        let classification_change = Self::update_state(user, requests, today);

        Ok(ReturnOutcome {
            request_id,
            fine,
            closed: !late,
            classification_change,
        })
    }

    /// 结清全部已归还未结清的罚金, 罚金余额归零
    pub fn settle_fines(user: &mut User, requests: &mut RequestBook, today: Day) -> Settlement {
        let settled: Vec<RequestId> = user
            .active_requests
            .iter()
            .copied()
            .filter(|id| requests.get(id).map_or(false, |r| r.has_been_returned()))
            .collect();

        for id in &settled {
            if let Some(request) = requests.get_mut(id) {
                request.settle_fine();
            }
            user.close_request(*id);
        }

        let amount = user.total_fines;
        user.total_fines = 0;
        user.active = Self::has_no_suspension_flags(user, requests, today);

        tracing::info!(
            user_id = user.id,
            amount,
            settled = settled.len(),
            reactivated = user.active,
            "罚金已结清"
        );

        Settlement {
            user_id: user.id,
            amount,
            settled,
            reactivated: user.active,
        }
    }
}

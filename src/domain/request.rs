// ==========================================
// 图书借阅系统 - 借阅记录实体
// ==========================================
// 职责: 单次借还过程（借出 → 归还 → 罚金结清）的记录与罚金计算
// 红线: 借期在借出时确定, 之后分级变化不追溯
// ==========================================

use crate::domain::types::{Day, RequestId, UserId, WorkId};
use serde::{Deserialize, Serialize};

/// 借阅记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,
    pub user_id: UserId,
    pub work_id: WorkId,
    /// 应还日（绝对天数）
    pub deadline: Day,
    /// 实际归还日（None = 尚未归还）
    pub returned_on: Option<Day>,
    /// 罚金是否已结清
    pub fine_settled: bool,
}

impl Request {
    pub fn new(id: RequestId, user_id: UserId, work_id: WorkId, deadline: Day) -> Self {
        Self {
            id,
            user_id,
            work_id,
            deadline,
            returned_on: None,
            fine_settled: false,
        }
    }

    pub fn has_been_returned(&self) -> bool {
        self.returned_on.is_some()
    }

    /// 在指定日标记归还
    pub fn mark_returned(&mut self, day: Day) {
        self.returned_on = Some(day);
    }

    pub fn settle_fine(&mut self) {
        self.fine_settled = true;
    }

    /// 未归还且已过应还日
    pub fn is_overdue(&self, today: Day) -> bool {
        self.returned_on.is_none() && today > self.deadline
    }

    /// 已归还且归还日晚于应还日
    pub fn was_returned_late(&self) -> bool {
        self.returned_on.map_or(false, |day| day > self.deadline)
    }

    /// 按时归还: 已归还, 且归还日不晚于应还日
    pub fn was_returned_on_time(&self) -> bool {
        self.returned_on.map_or(false, |day| day <= self.deadline)
    }

    /// 罚金待缴: 已归还、逾期、未结清
    pub fn has_payable_fine(&self) -> bool {
        self.was_returned_late() && !self.fine_settled
    }

    /// 逾期天数（未归还或按时归还时为 0）
    pub fn days_late(&self) -> Day {
        self.returned_on.map_or(0, |day| self.days_late_on(day))
    }

    /// 若在指定日归还的逾期天数
    pub fn days_late_on(&self, day: Day) -> Day {
        (day - self.deadline).max(0)
    }

    /// 计算罚金 = 日罚金 × 逾期天数; 超出 i32 范围时为 None
    pub fn fine(&self, fine_per_day: i32) -> Option<i32> {
        self.days_late().checked_mul(fine_per_day)
    }

    /// 若在指定日归还应计的罚金
    pub fn fine_on(&self, day: Day, fine_per_day: i32) -> Option<i32> {
        self.days_late_on(day).checked_mul(fine_per_day)
    }

    /// 是否仍占用读者的在借名额
    ///
    /// 未归还, 或归还后仍有未结清罚金
    pub fn is_open(&self) -> bool {
        !self.has_been_returned() || self.has_payable_fine()
    }
}

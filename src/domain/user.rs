// ==========================================
// 图书借阅系统 - 读者实体
// ==========================================
// 职责: 借阅历史、在借集合、罚金余额、订阅与通知队列
// 红线: 分级与 active 标记只由 engine::ledger 重算
// ==========================================

use crate::domain::error::InvalidField;
use crate::domain::notification::Notification;
use crate::domain::types::{Classification, NotificationKind, RequestId, UserId, WorkId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub(crate) active: bool,
    pub(crate) classification: Classification,
    /// 全部借阅记录, 最近的在前
    pub(crate) history: Vec<RequestId>,
    /// 在借（未归还或罚金未结清）的借阅记录
    pub(crate) active_requests: Vec<RequestId>,
    pub(crate) total_fines: i32,
    subscriptions: BTreeSet<(WorkId, NotificationKind)>,
    notifications: Vec<Notification>,
}

impl User {
    /// 校验并创建读者（初始为 Normal 且处于正常状态）
    pub fn new(id: UserId, name: &str, email: &str) -> Result<Self, InvalidField> {
        if id < 1 {
            return Err(InvalidField::Id(i64::from(id)));
        }
        if name.trim().is_empty() {
            return Err(InvalidField::Name);
        }
        if email.trim().is_empty() {
            return Err(InvalidField::Email);
        }

        Ok(Self {
            id,
            name: name.to_string(),
            email: email.to_string(),
            active: true,
            classification: Classification::Normal,
            history: Vec::new(),
            active_requests: Vec::new(),
            total_fines: 0,
            subscriptions: BTreeSet::new(),
            notifications: Vec::new(),
        })
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    pub fn total_fines(&self) -> i32 {
        self.total_fines
    }

    pub fn history(&self) -> &[RequestId] {
        &self.history
    }

    pub fn active_requests(&self) -> &[RequestId] {
        &self.active_requests
    }

    /// 登记新借阅（进入在借集合, 并置于历史最前）
    pub fn record_request(&mut self, request_id: RequestId) {
        self.active_requests.push(request_id);
        self.history.insert(0, request_id);
    }

    /// 关闭借阅（仅移出在借集合, 历史保留）
    pub fn close_request(&mut self, request_id: RequestId) {
        self.active_requests.retain(|id| *id != request_id);
    }

    /// 彻底移除借阅（作品下架时）
    pub fn detach_request(&mut self, request_id: RequestId) {
        self.active_requests.retain(|id| *id != request_id);
        self.history.retain(|id| *id != request_id);
    }

    // ==========================================
    // 订阅与通知
    // ==========================================

    pub fn subscribe(&mut self, work_id: WorkId, kind: NotificationKind) {
        self.subscriptions.insert((work_id, kind));
    }

    pub fn unsubscribe(&mut self, work_id: WorkId, kind: NotificationKind) {
        self.subscriptions.remove(&(work_id, kind));
    }

    pub fn is_subscribed(&self, work_id: WorkId, kind: NotificationKind) -> bool {
        self.subscriptions.contains(&(work_id, kind))
    }

    /// 移除某作品的全部订阅
    pub fn drop_subscriptions_for(&mut self, work_id: WorkId) {
        self.subscriptions.retain(|(id, _)| *id != work_id);
    }

    /// 投递通知（仅当订阅了该作品的该类通知）
    pub fn deliver(&mut self, notification: &Notification) -> bool {
        if !self.is_subscribed(notification.work_id, notification.kind) {
            return false;
        }
        self.notifications.push(notification.clone());
        true
    }

    /// 读取并清空通知队列
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn pending_notifications(&self) -> usize {
        self.notifications.len()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.active {
            write!(
                f,
                "{} - {} - {} - {} - ACTIVO",
                self.id, self.name, self.email, self.classification
            )
        } else {
            write!(
                f,
                "{} - {} - {} - {} - SUSPENSO - EUR {}",
                self.id, self.name, self.email, self.classification, self.total_fines
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_validation() {
        assert_eq!(User::new(1, " ", "a@b").unwrap_err(), InvalidField::Name);
        assert_eq!(User::new(1, "Ana", "").unwrap_err(), InvalidField::Email);
        assert_eq!(User::new(0, "Ana", "a@b").unwrap_err(), InvalidField::Id(0));

        let user = User::new(1, "Ana", "ana@example.pt").unwrap();
        assert!(user.is_active());
        assert_eq!(user.classification(), Classification::Normal);
        assert_eq!(user.to_string(), "1 - Ana - ana@example.pt - NORMAL - ACTIVO");
    }

    #[test]
    fn test_history_is_most_recent_first() {
        let mut user = User::new(1, "Ana", "a@b").unwrap();
        user.record_request(1);
        user.record_request(2);
        user.record_request(3);
        assert_eq!(user.history(), &[3, 2, 1]);
        assert_eq!(user.active_requests(), &[1, 2, 3]);

        user.close_request(2);
        assert_eq!(user.active_requests(), &[1, 3]);
        assert_eq!(user.history(), &[3, 2, 1]);

        user.detach_request(3);
        assert_eq!(user.history(), &[2, 1]);
        assert_eq!(user.active_requests(), &[1]);
    }

    #[test]
    fn test_notifications_are_consumed_once() {
        let mut user = User::new(1, "Ana", "a@b").unwrap();
        let notification = Notification::new(NotificationKind::Available, 4, "4 - ...");

        // 未订阅不投递
        assert!(!user.deliver(&notification));

        user.subscribe(4, NotificationKind::Available);
        assert!(user.deliver(&notification));
        assert_eq!(user.pending_notifications(), 1);

        let read = user.take_notifications();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].message, "DISPONIBILIDADE: 4 - ...");
        assert!(user.take_notifications().is_empty());
    }
}

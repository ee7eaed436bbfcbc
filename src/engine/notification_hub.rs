// ==========================================
// 图书借阅系统 - 作品通知分发
// ==========================================
// 职责: 作品库存变化时, 把通知投递给订阅了 (作品, 通知类型) 的读者
// 说明: 订阅关系由作品持有, 投递 = 查表 + 推入读者通知队列
// ==========================================

use crate::domain::notification::Notification;
use crate::domain::types::{NotificationKind, UserId, WorkId};
use crate::domain::user::User;
use crate::domain::work::Work;
use std::collections::BTreeMap;

pub struct NotificationHub;

impl NotificationHub {
    /// 投递通知, 返回实际收到的读者数
    pub fn dispatch(
        users: &mut BTreeMap<UserId, User>,
        work: &Work,
        notification: &Notification,
    ) -> usize {
        let mut delivered = 0;
        for user_id in work.subscribers_of(notification.kind) {
            if let Some(user) = users.get_mut(&user_id) {
                if user.deliver(notification) {
                    delivered += 1;
                }
            }
        }

        tracing::debug!(
            work_id = work.id,
            kind = %notification.kind,
            delivered,
            "作品通知已分发"
        );
        delivered
    }

    /// 建立订阅（读者与作品两侧同步登记）
    pub fn subscribe(user: &mut User, work: &mut Work, kind: NotificationKind) {
        user.subscribe(work.id, kind);
        work.subscribe(user.id, kind);
    }

    /// 取消订阅（两侧同步移除）
    pub fn unsubscribe(user: &mut User, work: &mut Work, kind: NotificationKind) {
        user.unsubscribe(work.id, kind);
        work.unsubscribe(user.id, kind);
    }

    /// 作品下架时清理全部订阅
    pub fn clear_work(users: &mut BTreeMap<UserId, User>, work: &mut Work) {
        let work_id: WorkId = work.id;
        for user in users.values_mut() {
            user.drop_subscriptions_for(work_id);
        }
        work.clear_subscribers();
    }
}

// ==========================================
// 图书借阅系统 - 借阅服务（编排层）
// ==========================================
// 职责: 组合规则链、账本、库存与通知, 实现借出/归还/推进日期/缴罚金/调整馆藏
// 红线: 唯一修改共享状态的入口; 每个操作要么全部生效, 要么不留任何修改
// ==========================================

use crate::api::error::{LendingError, LendingResult};
use crate::config::LendingConfig;
use crate::domain::creator::Creator;
use crate::domain::library::Library;
use crate::domain::notification::Notification;
use crate::domain::request::Request;
use crate::domain::types::{Day, NotificationKind, UserId, WorkId};
use crate::domain::user::User;
use crate::domain::work::{NewWork, Work};
use crate::engine::decommission::{DecommissionPlanner, DecommissionReport};
use crate::engine::events::{LendingEvent, LendingEventPublisher, OptionalEventPublisher};
use crate::engine::ledger::{ClassificationChange, LedgerError, ReturnOutcome, Settlement, UserLedger};
use crate::engine::notification_hub::NotificationHub;
use crate::engine::rule_chain::RequestRuleChain;
use std::sync::Arc;

// ==========================================
// LendingService
// ==========================================
#[derive(Debug)]
pub struct LendingService {
    library: Library,
    rules: RequestRuleChain,
    config: LendingConfig,
    events: OptionalEventPublisher,
}

impl LendingService {
    /// 以空馆藏创建服务
    pub fn new(config: LendingConfig) -> Self {
        Self::from_library(Library::new(config.initial_day), config)
    }

    /// 以已恢复的馆藏快照创建服务
    pub fn from_library(library: Library, config: LendingConfig) -> Self {
        Self {
            library,
            rules: RequestRuleChain::standard(),
            config,
            events: OptionalEventPublisher::none(),
        }
    }

    /// 接入事件发布者
    pub fn with_event_publisher(mut self, publisher: Arc<dyn LendingEventPublisher>) -> Self {
        self.events = OptionalEventPublisher::with_publisher(publisher);
        self
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    /// 供快照仓储保存后清除修改标记
    pub fn library_mut(&mut self) -> &mut Library {
        &mut self.library
    }

    pub fn into_library(self) -> Library {
        self.library
    }

    pub fn config(&self) -> &LendingConfig {
        &self.config
    }

    pub fn current_day(&self) -> Day {
        self.library.current_day
    }

    // ==========================================
    // 登记
    // ==========================================

    /// 登记读者, 返回新读者 ID
    pub fn register_user(&mut self, name: &str, email: &str) -> LendingResult<UserId> {
        let user = User::new(self.library.next_user_id, name, email)?;
        let id = self.library.allocate_user_id();
        self.library.users.insert(id, user);
        self.library.mark_modified();

        tracing::info!(user_id = id, "读者已登记");
        Ok(id)
    }

    /// 登记作品（同时登记其创作者）, 返回新作品 ID
    pub fn register_work(&mut self, draft: NewWork) -> LendingResult<WorkId> {
        let work = Work::new(self.library.next_work_id, draft)?;
        let id = self.library.allocate_work_id();

        for name in work.format.creator_names() {
            self.library
                .creators
                .entry(name.to_string())
                .or_insert_with(|| Creator::new(name))
                .add_work(id);
        }
        self.library.works.insert(id, work);
        self.library.mark_modified();

        tracing::info!(work_id = id, "作品已登记");
        Ok(id)
    }

    // ==========================================
    // 日期
    // ==========================================

    /// 推进日期; days <= 0 时不做任何事
    ///
    /// 推进后重算所有有在借记录的读者的状态; 日期溢出时返回 DayOverflow 且不做修改
    pub fn advance_date(&mut self, days: i32) -> LendingResult<Vec<ClassificationChange>> {
        if days <= 0 {
            return Ok(Vec::new());
        }

        let Library {
            current_day,
            users,
            requests,
            ..
        } = &mut self.library;
        let from = *current_day;
        let today = from.checked_add(days).ok_or_else(|| {
            tracing::warn!(today = from, days, "日期推进被拒绝: 超出可表示范围");
            LendingError::DayOverflow { today: from, days }
        })?;
        *current_day = today;

        let mut changes = Vec::new();
        for user in users.values_mut().filter(|u| !u.active_requests().is_empty()) {
            if let Some(change) = UserLedger::update_state(user, requests, today) {
                changes.push(change);
            }
        }
        self.library.mark_modified();

        tracing::info!(today, days, reclassified = changes.len(), "日期已推进");
        for change in &changes {
            self.publish_classification_change(change);
        }
        Ok(changes)
    }

    // ==========================================
    // 借出
    // ==========================================

    /// 借出作品, 返回应还日
    ///
    /// 规则链任一规则失败时返回该规则编号, 不做任何修改
    pub fn request_work(&mut self, user_id: UserId, work_id: WorkId) -> LendingResult<Day> {
        let today = self.library.current_day;
        let Library {
            users,
            works,
            requests,
            next_request_id,
            ..
        } = &mut self.library;

        let user = users.get(&user_id).ok_or(LendingError::UserNotFound(user_id))?;
        let work = works.get(&work_id).ok_or(LendingError::WorkNotFound(work_id))?;

        if let Err(violation) = self.rules.evaluate(user, work, requests) {
            tracing::warn!(user_id, work_id, rule_id = violation.rule_id(), "借阅被拒绝");
            return Err(violation.into());
        }

        // 借期按借出时的分级确定
        let duration = user.classification().loan_duration(work.total_copies());
        let deadline = today.checked_add(duration).ok_or_else(|| {
            tracing::warn!(user_id, work_id, today, duration, "借阅被拒绝: 应还日超出可表示范围");
            LendingError::DayOverflow {
                today,
                days: duration,
            }
        })?;
        let request_id = *next_request_id;

        let work = works.get_mut(&work_id).ok_or(LendingError::WorkNotFound(work_id))?;
        let notification = work.lend(request_id)?;
        // 借到后不再需要到货通知
        work.unsubscribe(user_id, NotificationKind::Available);

        *next_request_id += 1;
        requests.insert(request_id, Request::new(request_id, user_id, work_id, deadline));
        if let Some(user) = users.get_mut(&user_id) {
            user.record_request(request_id);
            user.unsubscribe(work_id, NotificationKind::Available);
        }
        NotificationHub::dispatch(users, work, &notification);
        self.library.mark_modified();

        tracing::info!(user_id, work_id, request_id, deadline, "借出成功");
        self.events.publish(LendingEvent::LoanCreated {
            request_id,
            user_id,
            work_id,
            deadline,
        });
        Ok(deadline)
    }

    // ==========================================
    // 归还
    // ==========================================

    /// 归还作品
    ///
    /// 逾期归还时计罚金并暂停读者; 之后重算读者分级
    pub fn return_work(&mut self, user_id: UserId, work_id: WorkId) -> LendingResult<ReturnOutcome> {
        let today = self.library.current_day;
        let fine_per_day = self.config.fine_per_day;
        let Library {
            users,
            works,
            requests,
            ..
        } = &mut self.library;

        let user = users.get(&user_id).ok_or(LendingError::UserNotFound(user_id))?;
        if !works.contains_key(&work_id) {
            return Err(LendingError::WorkNotFound(work_id));
        }
        let Some(request_id) = UserLedger::find_unreturned(user, requests, work_id) else {
            tracing::warn!(user_id, work_id, "归还被拒绝: 读者未借阅该作品");
            return Err(LendingError::WorkNotBorrowed { user_id, work_id });
        };

        let user = users.get_mut(&user_id).ok_or(LendingError::UserNotFound(user_id))?;
        let outcome = UserLedger::return_request(user, requests, request_id, today, fine_per_day)
            .map_err(|e| {
                tracing::warn!(user_id, work_id, request_id, error = %e, "归还被拒绝");
                match e {
                    LedgerError::RequestNotFound(_) => LendingError::WorkNotBorrowed { user_id, work_id },
                    other => other.into(),
                }
            })?;

        if let Some(work) = works.get_mut(&work_id) {
            if outcome.closed {
                work.release_request(request_id);
            }
            if let Some(notification) = work.take_back() {
                NotificationHub::dispatch(users, work, &notification);
            }
        }
        self.library.mark_modified();

        tracing::info!(user_id, work_id, request_id, fine = outcome.fine, "归还成功");
        self.events.publish(LendingEvent::WorkReturned {
            request_id,
            user_id,
            work_id,
            fine: outcome.fine,
        });
        if let Some(change) = &outcome.classification_change {
            self.publish_classification_change(change);
        }
        Ok(outcome)
    }

    // ==========================================
    // 罚金
    // ==========================================

    /// 缴清罚金
    ///
    /// 读者处于正常状态时失败（无可结清项）
    pub fn pay_fine(&mut self, user_id: UserId) -> LendingResult<Settlement> {
        let today = self.library.current_day;
        let Library {
            users,
            works,
            requests,
            ..
        } = &mut self.library;

        let user = users.get_mut(&user_id).ok_or(LendingError::UserNotFound(user_id))?;
        if user.is_active() {
            tracing::warn!(user_id, "缴罚金被拒绝: 读者处于正常状态");
            return Err(LendingError::UserNotSuspended(user_id));
        }
        if user.total_fines() == 0 {
            tracing::warn!(user_id, "缴罚金被拒绝: 无待缴罚金");
            return Err(LendingError::NoOutstandingFine(user_id));
        }

        let settlement = UserLedger::settle_fines(user, requests, today);
        for request_id in &settlement.settled {
            let work_id = requests.get(request_id).map(|r| r.work_id);
            if let Some(work) = work_id.and_then(|id| works.get_mut(&id)) {
                work.release_request(*request_id);
            }
        }
        self.library.mark_modified();

        self.events.publish(LendingEvent::FineSettled {
            user_id,
            amount: settlement.amount,
        });
        Ok(settlement)
    }

    // ==========================================
    // 馆藏调整
    // ==========================================

    /// 调整作品副本数（可正可负）
    ///
    /// 可借副本将为负时返回 InventoryUnderflow 且不做修改;
    /// 总副本数降为 0 时同步执行下架并返回下架报告
    pub fn change_work_inventory(
        &mut self,
        work_id: WorkId,
        amount: i32,
    ) -> LendingResult<Option<DecommissionReport>> {
        let Library { users, works, .. } = &mut self.library;
        let work = works.get_mut(&work_id).ok_or(LendingError::WorkNotFound(work_id))?;

        let notification = work.change_inventory(amount).map_err(|e| {
            tracing::warn!(work_id, amount, available = e.available, "馆藏调整被拒绝: 库存不足");
            e
        })?;
        if let Some(notification) = notification {
            NotificationHub::dispatch(users, work, &notification);
        }
        self.library.mark_modified();
        tracing::info!(work_id, amount, "馆藏已调整");

        let Some(plan) = DecommissionPlanner::plan(&self.library, work_id) else {
            return Ok(None);
        };
        let report = DecommissionPlanner::apply(&mut self.library, plan);

        self.events.publish(LendingEvent::WorkDecommissioned {
            work_id,
            detached_requests: report.plan.requests.len(),
            removed_creators: report.plan.creators.clone(),
        });
        for change in &report.classification_changes {
            self.publish_classification_change(change);
        }
        Ok(Some(report))
    }

    // ==========================================
    // 订阅与通知
    // ==========================================

    /// 订阅作品通知
    pub fn subscribe(&mut self, user_id: UserId, work_id: WorkId, kind: NotificationKind) -> LendingResult<()> {
        let Library { users, works, .. } = &mut self.library;
        let user = users.get_mut(&user_id).ok_or(LendingError::UserNotFound(user_id))?;
        let work = works.get_mut(&work_id).ok_or(LendingError::WorkNotFound(work_id))?;
        NotificationHub::subscribe(user, work, kind);
        self.library.mark_modified();
        Ok(())
    }

    /// 取消订阅
    pub fn unsubscribe(&mut self, user_id: UserId, work_id: WorkId, kind: NotificationKind) -> LendingResult<()> {
        let Library { users, works, .. } = &mut self.library;
        let user = users.get_mut(&user_id).ok_or(LendingError::UserNotFound(user_id))?;
        let work = works.get_mut(&work_id).ok_or(LendingError::WorkNotFound(work_id))?;
        NotificationHub::unsubscribe(user, work, kind);
        self.library.mark_modified();
        Ok(())
    }

    /// 读取并清空读者的通知
    pub fn take_notifications(&mut self, user_id: UserId) -> LendingResult<Vec<Notification>> {
        let user = self
            .library
            .users
            .get_mut(&user_id)
            .ok_or(LendingError::UserNotFound(user_id))?;
        let notifications = user.take_notifications();
        if !notifications.is_empty() {
            self.library.mark_modified();
        }
        Ok(notifications)
    }

    fn publish_classification_change(&self, change: &ClassificationChange) {
        self.events.publish(LendingEvent::ClassificationChanged {
            user_id: change.user_id,
            from: change.from,
            to: change.to,
        });
    }
}

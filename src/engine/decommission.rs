// ==========================================
// 图书借阅系统 - 作品下架
// ==========================================
// 职责: 作品总副本数降为 0 时, 生成并执行级联清理计划
// 步骤:
// 1. plan(): 纯计算, 得出需移除的借阅（及其读者）与创作者
// 2. apply(): 一次性执行, 不会中途失败
// ==========================================

use crate::domain::library::Library;
use crate::domain::types::{RequestId, UserId, WorkId};
use crate::engine::ledger::{ClassificationChange, UserLedger};
use crate::engine::notification_hub::NotificationHub;
use serde::{Deserialize, Serialize};

/// 需随作品移除的借阅
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetachedRequest {
    pub request_id: RequestId,
    pub user_id: UserId,
}

/// 下架计划
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecommissionPlan {
    pub work_id: WorkId,
    pub requests: Vec<DetachedRequest>,
    /// 移除该作品后名下无作品的创作者
    pub creators: Vec<String>,
}

/// 下架执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecommissionReport {
    pub plan: DecommissionPlan,
    pub affected_users: Vec<UserId>,
    pub classification_changes: Vec<ClassificationChange>,
}

pub struct DecommissionPlanner;

impl DecommissionPlanner {
    /// 生成下架计划（作品不存在或仍有副本时返回 None）
    pub fn plan(library: &Library, work_id: WorkId) -> Option<DecommissionPlan> {
        let work = library.works.get(&work_id)?;
        if !work.should_be_decommissioned() {
            return None;
        }

        let requests = work
            .outstanding_requests()
            .iter()
            .filter_map(|id| library.requests.get(id))
            .map(|r| DetachedRequest {
                request_id: r.id,
                user_id: r.user_id,
            })
            .collect();

        let creators = work
            .format
            .creator_names()
            .into_iter()
            .filter(|name| {
                library
                    .creators
                    .get(*name)
                    .map_or(false, |c| c.works().iter().all(|id| *id == work_id))
            })
            .map(str::to_string)
            .collect();

        Some(DecommissionPlan {
            work_id,
            requests,
            creators,
        })
    }

    /// 执行下架计划
    pub fn apply(library: &mut Library, plan: DecommissionPlan) -> DecommissionReport {
        let mut affected_users: Vec<UserId> = Vec::new();

        for detached in &plan.requests {
            if let Some(user) = library.users.get_mut(&detached.user_id) {
                user.detach_request(detached.request_id);
            }
            library.requests.remove(&detached.request_id);
            if !affected_users.contains(&detached.user_id) {
                affected_users.push(detached.user_id);
            }
        }

        if let Some(mut work) = library.works.remove(&plan.work_id) {
            NotificationHub::clear_work(&mut library.users, &mut work);
            for name in work.format.creator_names() {
                if let Some(creator) = library.creators.get_mut(name) {
                    creator.remove_work(plan.work_id);
                }
            }
        }

        for name in &plan.creators {
            library.creators.remove(name);
        }

        // 移除借阅后重算相关读者的状态
        let today = library.current_day;
        let mut classification_changes = Vec::new();
        for user_id in &affected_users {
            if let Some(user) = library.users.get_mut(user_id) {
                if let Some(change) = UserLedger::update_state(user, &library.requests, today) {
                    classification_changes.push(change);
                }
            }
        }

        tracing::info!(
            work_id = plan.work_id,
            requests = plan.requests.len(),
            creators = plan.creators.len(),
            "作品已下架"
        );

        DecommissionReport {
            plan,
            affected_users,
            classification_changes,
        }
    }
}

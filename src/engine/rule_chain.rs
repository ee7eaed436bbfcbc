// ==========================================
// 图书借阅系统 - 借阅规则链
// ==========================================
// 职责: 按固定顺序逐条检查借阅资格, 返回第一条失败的规则
// 红线: 每条规则是 (读者, 作品) 上的纯谓词; 短路求值
// ==========================================
// 顺序:
// 1. 无重复借阅
// 2. 读者处于正常状态
// 3. 作品有可借副本
// 4. 同时在借数量未达上限
// 5. 作品类别可外借（非参考书）
// 6. 作品价格不超过分级上限
// ==========================================

use crate::domain::library::RequestBook;
use crate::domain::types::{UserId, WorkId};
use crate::domain::user::User;
use crate::domain::work::Work;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==========================================
// RequestRule - 单条规则
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestRule {
    NoDuplicateRequest,
    UserIsActive,
    WorkHasAvailableCopy,
    SimultaneousRequestsLimit,
    CategoryIsLoanable,
    PriceCeiling,
}

impl RequestRule {
    /// 规则编号（稳定, 供调用方按编号分支）
    pub const fn id(self) -> u8 {
        match self {
            RequestRule::NoDuplicateRequest => 1,
            RequestRule::UserIsActive => 2,
            RequestRule::WorkHasAvailableCopy => 3,
            RequestRule::SimultaneousRequestsLimit => 4,
            RequestRule::CategoryIsLoanable => 5,
            RequestRule::PriceCeiling => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequestRule::NoDuplicateRequest => "NO_DUPLICATE_REQUEST",
            RequestRule::UserIsActive => "USER_IS_ACTIVE",
            RequestRule::WorkHasAvailableCopy => "WORK_HAS_AVAILABLE_COPY",
            RequestRule::SimultaneousRequestsLimit => "SIMULTANEOUS_REQUESTS_LIMIT",
            RequestRule::CategoryIsLoanable => "CATEGORY_IS_LOANABLE",
            RequestRule::PriceCeiling => "PRICE_CEILING",
        }
    }

    /// 检查规则是否通过
    pub fn passes(self, user: &User, work: &Work, requests: &RequestBook) -> bool {
        match self {
            // 规则 1: 该读者对该作品没有未归还的借阅
            RequestRule::NoDuplicateRequest => !user.active_requests().iter().any(|id| {
                requests
                    .get(id)
                    .map_or(false, |r| r.work_id == work.id && !r.has_been_returned())
            }),
            // 规则 2: 读者未被暂停
            RequestRule::UserIsActive => user.is_active(),
            // 规则 3: 有可借副本
            RequestRule::WorkHasAvailableCopy => work.available_copies() > 0,
            // 规则 4: 在借数量 < 分级上限
            RequestRule::SimultaneousRequestsLimit => {
                user.active_requests().len() < user.classification().max_simultaneous_requests()
            }
            // 规则 5: 参考书不外借
            RequestRule::CategoryIsLoanable => work.category.is_loanable(),
            // 规则 6: 价格上限
            RequestRule::PriceCeiling => user.classification().allows_price(work.price),
        }
    }
}

/// 规则检查失败（携带失败规则）
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("借阅规则 {} ({}) 未通过: user_id={user_id}, work_id={work_id}", .rule.id(), .rule.as_str())]
pub struct RuleViolation {
    pub rule: RequestRule,
    pub user_id: UserId,
    pub work_id: WorkId,
}

impl RuleViolation {
    pub fn rule_id(&self) -> u8 {
        self.rule.id()
    }

    /// 是否因无可借副本失败（调用方可据此提供到货通知订阅）
    pub fn is_no_copy_available(&self) -> bool {
        self.rule == RequestRule::WorkHasAvailableCopy
    }
}

// ==========================================
// RequestRuleChain - 规则链
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRuleChain {
    rules: Vec<RequestRule>,
}

impl RequestRuleChain {
    /// 标准规则链（1 → 6）
    pub fn standard() -> Self {
        Self {
            rules: vec![
                RequestRule::NoDuplicateRequest,
                RequestRule::UserIsActive,
                RequestRule::WorkHasAvailableCopy,
                RequestRule::SimultaneousRequestsLimit,
                RequestRule::CategoryIsLoanable,
                RequestRule::PriceCeiling,
            ],
        }
    }

    pub fn rules(&self) -> &[RequestRule] {
        &self.rules
    }

    /// 依次检查, 返回第一条失败的规则; 之后的规则不再检查
    pub fn evaluate(
        &self,
        user: &User,
        work: &Work,
        requests: &RequestBook,
    ) -> Result<(), RuleViolation> {
        match self.rules.iter().find(|rule| !rule.passes(user, work, requests)) {
            Some(rule) => {
                tracing::debug!(
                    user_id = user.id,
                    work_id = work.id,
                    rule_id = rule.id(),
                    "借阅规则未通过: {}",
                    rule.as_str()
                );
                Err(RuleViolation {
                    rule: *rule,
                    user_id: user.id,
                    work_id: work.id,
                })
            }
            None => Ok(()),
        }
    }
}

impl Default for RequestRuleChain {
    fn default() -> Self {
        Self::standard()
    }
}

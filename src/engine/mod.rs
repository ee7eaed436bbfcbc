// ==========================================
// 图书借阅系统 - 引擎层
// ==========================================
// 职责: 借阅规则链、读者分级迁移、账本记账、通知分发、作品下架
// 红线: 引擎不做 I/O, 所有规则失败必须给出规则编号
// ==========================================

pub mod classification;
pub mod decommission;
pub mod events;
pub mod ledger;
pub mod notification_hub;
pub mod rule_chain;

// 重导出核心引擎
pub use classification::{ClassificationEngine, ReturnHistory};
pub use decommission::{DecommissionPlan, DecommissionPlanner, DecommissionReport, DetachedRequest};
pub use events::{LendingEvent, LendingEventPublisher, NoOpEventPublisher, OptionalEventPublisher};
pub use ledger::{ClassificationChange, LedgerError, ReturnOutcome, Settlement, UserLedger};
pub use notification_hub::NotificationHub;
pub use rule_chain::{RequestRule, RequestRuleChain, RuleViolation};

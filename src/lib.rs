// ==========================================
// 图书借阅系统 - 核心库
// ==========================================
// 职责: 读者借还生命周期引擎（借出规则链、罚金、分级、通知、作品下架）
// 技术栈: Rust + SQLite（整库快照）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// API 层 - 借阅服务与查询
pub mod api;

// 导入层 - 条目文件
pub mod importer;

// 数据仓储层 - 整库快照
pub mod repository;

// 配置层 - 借阅配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    Classification, Day, NotificationKind, RequestId, UserId, WorkCategory, WorkId, WorkType,
};

// 领域实体
pub use domain::{Creator, Library, NewWork, Notification, Request, User, Work, WorkFormat};

// 引擎
pub use engine::{
    ClassificationEngine, DecommissionPlanner, LendingEvent, LendingEventPublisher,
    NotificationHub, RequestRule, RequestRuleChain, RuleViolation, UserLedger,
};

// API
pub use api::{LendingError, LendingResult, LendingService, QueryApi};

// 配置
pub use config::LendingConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "图书借阅系统";

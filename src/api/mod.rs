// ==========================================
// 图书借阅系统 - API 层
// ==========================================
// 职责: 借阅服务（唯一写入口）与只读查询
// ==========================================

pub mod error;
pub mod lending_service;
pub mod query_api;

// 重导出核心类型
pub use error::{LendingError, LendingResult};
pub use lending_service::LendingService;
pub use query_api::QueryApi;

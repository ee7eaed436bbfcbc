// ==========================================
// 图书借阅系统 - 仓储层
// ==========================================
// 职责: 馆藏整库快照的持久化
// 红线: Repository 不含业务逻辑
// ==========================================

pub mod error;
pub mod snapshot_repo;

// 重导出核心类型
pub use error::{RepositoryError, RepositoryResult};
pub use snapshot_repo::LibrarySnapshotRepository;

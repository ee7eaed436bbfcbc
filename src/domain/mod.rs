// ==========================================
// 图书借阅系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、值类型
// 红线: 不含引擎逻辑（规则链、分级迁移、罚金结算在 engine 层）
// ==========================================

pub mod creator;
pub mod error;
pub mod library;
pub mod notification;
pub mod request;
pub mod types;
pub mod user;
pub mod work;

// 重导出核心类型
pub use creator::Creator;
pub use error::{InvalidField, InventoryUnderflow};
pub use library::{Library, RequestBook};
pub use notification::Notification;
pub use request::Request;
pub use types::{
    Classification, Day, NotificationKind, RequestId, UserId, WorkCategory, WorkId, WorkType,
};
pub use user::User;
pub use work::{NewWork, Subscription, Work, WorkFormat};

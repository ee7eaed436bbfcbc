// ==========================================
// 图书借阅系统 - 领域层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::types::WorkId;
use thiserror::Error;

/// 实体构造校验失败（指明是哪个字段不合法）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidField {
    #[error("ID 必须大于 0: {0}")]
    Id(i64),

    #[error("姓名不能为空")]
    Name,

    #[error("邮箱不能为空")]
    Email,

    #[error("标题不能为空")]
    Title,

    #[error("价格必须为正数: {0}")]
    Price(i32),

    #[error("副本数必须为正数: {0}")]
    TotalCopies(i32),

    #[error("ISBN 不能为空")]
    Isbn,

    #[error("作者列表不能为空或包含空白姓名")]
    Authors,

    #[error("IGAC 编号不能为空")]
    Igac,

    #[error("导演不能为空")]
    Director,
}

/// 库存不足（调整后可借副本数将为负）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("作品库存不足: work_id={work_id}, requested={requested}, available={available}")]
pub struct InventoryUnderflow {
    pub work_id: WorkId,
    pub requested: i32,
    pub available: u32,
}

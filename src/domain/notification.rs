// ==========================================
// 图书借阅系统 - 通知
// ==========================================

use crate::domain::types::{NotificationKind, WorkId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 作品状态通知（不可变; 读者读取后即被清除）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub work_id: WorkId,
    /// 渲染后的消息文本（生成时的作品快照）
    pub message: String,
}

impl Notification {
    /// 以作品描述行渲染通知: "<类型>: <作品描述>"
    pub fn new(kind: NotificationKind, work_id: WorkId, work_description: &str) -> Self {
        Self {
            kind,
            work_id,
            message: format!("{}: {}", kind, work_description),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

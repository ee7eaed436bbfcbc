// ==========================================
// 图书借阅系统 - 创作者（作者/导演）
// ==========================================

use crate::domain::types::WorkId;
use serde::{Deserialize, Serialize};

/// 创作者: 以姓名为键, 记录其名下作品
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub name: String,
    works: Vec<WorkId>,
}

impl Creator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            works: Vec::new(),
        }
    }

    pub fn works(&self) -> &[WorkId] {
        &self.works
    }

    /// 添加作品（已存在则忽略）
    pub fn add_work(&mut self, work_id: WorkId) {
        if !self.works.contains(&work_id) {
            self.works.push(work_id);
        }
    }

    pub fn remove_work(&mut self, work_id: WorkId) {
        self.works.retain(|id| *id != work_id);
    }

    /// 名下已无作品
    pub fn has_no_works(&self) -> bool {
        self.works.is_empty()
    }
}

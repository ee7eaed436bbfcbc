// ==========================================
// 图书借阅系统 - 馆藏根对象
// ==========================================
// 职责: 整个借阅图谱的唯一根（读者/作品/创作者/借阅/当前日/ID 计数器）
// 红线: 仅含可序列化数据, 不持有文件句柄或线程
// ==========================================

use crate::domain::creator::Creator;
use crate::domain::request::Request;
use crate::domain::types::{Day, RequestId, UserId, WorkId};
use crate::domain::user::User;
use crate::domain::work::Work;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 全局借阅记录索引
pub type RequestBook = BTreeMap<RequestId, Request>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub(crate) current_day: Day,
    pub(crate) next_user_id: UserId,
    pub(crate) next_work_id: WorkId,
    pub(crate) next_request_id: RequestId,
    pub(crate) users: BTreeMap<UserId, User>,
    pub(crate) works: BTreeMap<WorkId, Work>,
    pub(crate) creators: BTreeMap<String, Creator>,
    pub(crate) requests: RequestBook,
    /// 自上次保存后是否被修改（不序列化）
    #[serde(skip)]
    pub(crate) modified: bool,
}

impl Library {
    /// 创建空馆藏
    pub fn new(initial_day: Day) -> Self {
        Self {
            current_day: initial_day,
            next_user_id: 1,
            next_work_id: 1,
            next_request_id: 1,
            users: BTreeMap::new(),
            works: BTreeMap::new(),
            creators: BTreeMap::new(),
            requests: BTreeMap::new(),
            modified: false,
        }
    }

    pub fn current_day(&self) -> Day {
        self.current_day
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn work(&self, id: WorkId) -> Option<&Work> {
        self.works.get(&id)
    }

    pub fn creator(&self, name: &str) -> Option<&Creator> {
        self.creators.get(name)
    }

    pub fn request(&self, id: RequestId) -> Option<&Request> {
        self.requests.get(&id)
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    /// 作品按 ID（即登记顺序）
    pub fn works(&self) -> impl Iterator<Item = &Work> {
        self.works.values()
    }

    pub fn creators(&self) -> impl Iterator<Item = &Creator> {
        self.creators.values()
    }

    pub fn requests(&self) -> &RequestBook {
        &self.requests
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_modified(&mut self) {
        self.modified = true;
    }

    /// 保存成功后由快照仓储调用
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    pub(crate) fn allocate_user_id(&mut self) -> UserId {
        let id = self.next_user_id;
        self.next_user_id += 1;
        id
    }

    pub(crate) fn allocate_work_id(&mut self) -> WorkId {
        let id = self.next_work_id;
        self.next_work_id += 1;
        id
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new(1)
    }
}

// ==========================================
// 图书借阅系统 - 查询 API
// ==========================================
// 职责: 只读查询（读者/作品/创作者/检索）
// 红线: 不修改馆藏; 通知的消费式读取在 LendingService::take_notifications
// ==========================================

use crate::api::error::{LendingError, LendingResult};
use crate::domain::library::Library;
use crate::domain::types::{Day, UserId, WorkId};
use crate::domain::user::User;
use crate::domain::work::Work;

pub struct QueryApi<'a> {
    library: &'a Library,
}

impl<'a> QueryApi<'a> {
    pub fn new(library: &'a Library) -> Self {
        Self { library }
    }

    pub fn current_day(&self) -> Day {
        self.library.current_day()
    }

    pub fn user(&self, user_id: UserId) -> LendingResult<&'a User> {
        self.library
            .user(user_id)
            .ok_or(LendingError::UserNotFound(user_id))
    }

    /// 全部读者, 按姓名排序（同名按 ID）
    pub fn users(&self) -> Vec<&'a User> {
        let mut users: Vec<&User> = self.library.users().collect();
        users.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        users
    }

    pub fn work(&self, work_id: WorkId) -> LendingResult<&'a Work> {
        self.library
            .work(work_id)
            .ok_or(LendingError::WorkNotFound(work_id))
    }

    /// 全部作品, 按 ID
    pub fn works(&self) -> Vec<&'a Work> {
        self.library.works().collect()
    }

    /// 创作者名下作品, 按标题（不区分大小写）排序
    pub fn works_by_creator(&self, name: &str) -> LendingResult<Vec<&'a Work>> {
        let creator = self
            .library
            .creator(name)
            .ok_or_else(|| LendingError::CreatorNotFound(name.to_string()))?;

        let mut works: Vec<&Work> = creator
            .works()
            .iter()
            .filter_map(|id| self.library.work(*id))
            .collect();
        works.sort_by_cached_key(|w| (w.title.to_lowercase(), w.id));
        Ok(works)
    }

    /// 按标题或创作者名检索（不区分大小写）, 结果按 ID
    pub fn search_works(&self, term: &str) -> Vec<&'a Work> {
        let term = term.to_lowercase();
        self.library
            .works()
            .filter(|w| w.matches_term(&term))
            .collect()
    }
}

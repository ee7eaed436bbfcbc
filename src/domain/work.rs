// ==========================================
// 图书借阅系统 - 作品实体（书籍 / DVD）
// ==========================================
// 职责: 副本库存、未结借阅、通知订阅者
// 红线: 0 <= available_copies <= total_copies
// ==========================================

use crate::domain::error::{InvalidField, InventoryUnderflow};
use crate::domain::notification::Notification;
use crate::domain::types::{NotificationKind, RequestId, UserId, WorkCategory, WorkId, WorkType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ==========================================
// 作品载体信息
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkFormat {
    Book { isbn: String, authors: Vec<String> },
    Dvd { igac: String, director: String },
}

impl WorkFormat {
    pub fn work_type(&self) -> WorkType {
        match self {
            WorkFormat::Book { .. } => WorkType::Book,
            WorkFormat::Dvd { .. } => WorkType::Dvd,
        }
    }

    /// 创作者姓名（书籍为作者列表, DVD 为导演）
    pub fn creator_names(&self) -> Vec<&str> {
        match self {
            WorkFormat::Book { authors, .. } => authors.iter().map(String::as_str).collect(),
            WorkFormat::Dvd { director, .. } => vec![director.as_str()],
        }
    }

    /// ISBN 或 IGAC 编号
    pub fn code(&self) -> &str {
        match self {
            WorkFormat::Book { isbn, .. } => isbn,
            WorkFormat::Dvd { igac, .. } => igac,
        }
    }
}

/// 新作品登记参数（一次性整体校验）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWork {
    pub title: String,
    pub price: i32,
    pub category: WorkCategory,
    pub total_copies: i32,
    pub format: WorkFormat,
}

/// 订阅关系: 某读者订阅某类通知
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Subscription {
    pub kind: NotificationKind,
    pub user_id: UserId,
}

// ==========================================
// Work - 作品
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Work {
    pub id: WorkId,
    pub title: String,
    pub price: i32,
    pub category: WorkCategory,
    pub format: WorkFormat,
    total_copies: u32,
    available_copies: u32,
    /// 未结借阅（仍占用某读者在借名额的借阅记录）
    outstanding: Vec<RequestId>,
    subscribers: BTreeSet<Subscription>,
}

impl Work {
    /// 校验并创建作品, 可借副本数 = 总副本数
    pub fn new(id: WorkId, draft: NewWork) -> Result<Self, InvalidField> {
        if id < 1 {
            return Err(InvalidField::Id(i64::from(id)));
        }
        if draft.title.trim().is_empty() {
            return Err(InvalidField::Title);
        }
        if draft.price <= 0 {
            return Err(InvalidField::Price(draft.price));
        }
        let total_copies = u32::try_from(draft.total_copies)
            .ok()
            .filter(|copies| *copies > 0)
            .ok_or(InvalidField::TotalCopies(draft.total_copies))?;

        let format = match draft.format {
            WorkFormat::Book { isbn, authors } => {
                if isbn.trim().is_empty() {
                    return Err(InvalidField::Isbn);
                }
                if authors.is_empty() || authors.iter().any(|a| a.trim().is_empty()) {
                    return Err(InvalidField::Authors);
                }
                // 去重, 保留首次出现顺序
                let mut unique: Vec<String> = Vec::with_capacity(authors.len());
                for author in authors {
                    let name = author.trim().to_string();
                    if !unique.contains(&name) {
                        unique.push(name);
                    }
                }
                WorkFormat::Book { isbn, authors: unique }
            }
            WorkFormat::Dvd { igac, director } => {
                if igac.trim().is_empty() {
                    return Err(InvalidField::Igac);
                }
                if director.trim().is_empty() {
                    return Err(InvalidField::Director);
                }
                WorkFormat::Dvd {
                    igac,
                    director: director.trim().to_string(),
                }
            }
        };

        Ok(Self {
            id,
            title: draft.title,
            price: draft.price,
            category: draft.category,
            format,
            total_copies,
            available_copies: total_copies,
            outstanding: Vec::new(),
            subscribers: BTreeSet::new(),
        })
    }

    pub fn total_copies(&self) -> u32 {
        self.total_copies
    }

    pub fn available_copies(&self) -> u32 {
        self.available_copies
    }

    pub fn outstanding_requests(&self) -> &[RequestId] {
        &self.outstanding
    }

    pub fn work_type(&self) -> WorkType {
        self.format.work_type()
    }

    // ==========================================
    // 库存变动
    // ==========================================

    /// 借出一本: 可借副本 -1, 记入未结借阅, 生成"被借出"通知
    pub fn lend(&mut self, request_id: RequestId) -> Result<Notification, InventoryUnderflow> {
        if self.available_copies == 0 {
            return Err(InventoryUnderflow {
                work_id: self.id,
                requested: -1,
                available: 0,
            });
        }
        self.available_copies -= 1;
        self.outstanding.push(request_id);
        Ok(self.notification(NotificationKind::Requested))
    }

    /// 收回一本: 可借副本 +1; 从 0 变为 1 时生成"可借"通知
    pub fn take_back(&mut self) -> Option<Notification> {
        if self.available_copies >= self.total_copies {
            return None;
        }
        self.available_copies += 1;
        (self.available_copies == 1).then(|| self.notification(NotificationKind::Available))
    }

    /// 解除未结借阅（归还无罚金 / 罚金结清后）
    pub fn release_request(&mut self, request_id: RequestId) {
        self.outstanding.retain(|id| *id != request_id);
    }

    /// 调整馆藏: 总副本与可借副本同步增减
    ///
    /// 可借副本将为负时不做任何修改; 从 0 增加时生成"可借"通知
    pub fn change_inventory(&mut self, amount: i32) -> Result<Option<Notification>, InventoryUnderflow> {
        let underflow = || InventoryUnderflow {
            work_id: self.id,
            requested: amount,
            available: self.available_copies,
        };
        let available = i64::from(self.available_copies) + i64::from(amount);
        let total = i64::from(self.total_copies) + i64::from(amount);
        if available < 0 {
            return Err(underflow());
        }
        let available = u32::try_from(available).map_err(|_| underflow())?;
        let total = u32::try_from(total).map_err(|_| underflow())?;

        let was_empty = self.available_copies == 0;
        self.available_copies = available;
        self.total_copies = total;

        Ok((amount > 0 && was_empty).then(|| self.notification(NotificationKind::Available)))
    }

    /// 总副本数降为 0 → 需要下架
    pub fn should_be_decommissioned(&self) -> bool {
        self.total_copies == 0
    }

    // ==========================================
    // 通知订阅
    // ==========================================

    pub fn subscribe(&mut self, user_id: UserId, kind: NotificationKind) {
        self.subscribers.insert(Subscription { kind, user_id });
    }

    pub fn unsubscribe(&mut self, user_id: UserId, kind: NotificationKind) {
        self.subscribers.remove(&Subscription { kind, user_id });
    }

    pub fn clear_subscribers(&mut self) {
        self.subscribers.clear();
    }

    /// 订阅了指定类型通知的读者
    pub fn subscribers_of(&self, kind: NotificationKind) -> impl Iterator<Item = UserId> + '_ {
        self.subscribers
            .iter()
            .filter(move |s| s.kind == kind)
            .map(|s| s.user_id)
    }

    /// 标题或任一创作者姓名包含检索词（已小写）
    pub fn matches_term(&self, lowercase_term: &str) -> bool {
        self.title.to_lowercase().contains(lowercase_term)
            || self
                .format
                .creator_names()
                .iter()
                .any(|name| name.to_lowercase().contains(lowercase_term))
    }

    fn notification(&self, kind: NotificationKind) -> Notification {
        Notification::new(kind, self.id, &self.to_string())
    }
}

impl fmt::Display for Work {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} de {} - {} - {} - {} - {} - {} - {}",
            self.id,
            self.available_copies,
            self.total_copies,
            self.work_type(),
            self.title,
            self.price,
            self.category,
            self.format.creator_names().join("; "),
            self.format.code(),
        )
    }
}

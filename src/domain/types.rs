// ==========================================
// 图书借阅系统 - 领域类型定义
// ==========================================
// 职责: 标识类型、作品类别、通知类型、读者分级
// 红线: 纯值类型, 不含状态, 可按值复制
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 读者 ID（从 1 开始递增）
pub type UserId = u32;
/// 作品 ID（从 1 开始递增）
pub type WorkId = u32;
/// 借阅记录 ID（从 1 开始递增）
pub type RequestId = u32;
/// 系统日（绝对天数, 初始为 1）
pub type Day = i32;

// ==========================================
// 作品类别 (Work Category)
// ==========================================
// 红线: REFERENCE 类作品永不外借
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkCategory {
    Reference, // 参考书
    Fiction,   // 小说
    Scitech,   // 科技类
}

impl WorkCategory {
    /// 是否允许外借
    pub fn is_loanable(self) -> bool {
        !matches!(self, WorkCategory::Reference)
    }
}

impl fmt::Display for WorkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkCategory::Reference => write!(f, "Referência"),
            WorkCategory::Fiction => write!(f, "Ficção"),
            WorkCategory::Scitech => write!(f, "Técnica e Científica"),
        }
    }
}

impl FromStr for WorkCategory {
    type Err = String;

    /// 导入文件中的类别标记（REFERENCE / FICTION / SCITECH）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "REFERENCE" => Ok(WorkCategory::Reference),
            "FICTION" => Ok(WorkCategory::Fiction),
            "SCITECH" => Ok(WorkCategory::Scitech),
            other => Err(format!("未知作品类别: {}", other)),
        }
    }
}

// ==========================================
// 作品载体 (Work Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkType {
    Book,
    Dvd,
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkType::Book => write!(f, "Livro"),
            WorkType::Dvd => write!(f, "DVD"),
        }
    }
}

// ==========================================
// 通知类型 (Notification Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// 作品被借出
    Requested,
    /// 作品重新有可借副本
    Available,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::Requested => write!(f, "REQUISIÇÃO"),
            NotificationKind::Available => write!(f, "DISPONIBILIDADE"),
        }
    }
}

// ==========================================
// 读者分级 (Classification)
// ==========================================
// 三个分级各自决定: 同时在借上限 / 单本价格上限 / 借期
// 迁移逻辑见 engine::classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    #[default]
    Normal, // 普通
    Faltoso,   // 失信（多次逾期）
    Cumpridor, // 守约（连续按时归还）
}

impl Classification {
    /// 同时在借上限
    pub fn max_simultaneous_requests(self) -> usize {
        match self {
            Classification::Normal => 3,
            Classification::Faltoso => 1,
            Classification::Cumpridor => 5,
        }
    }

    /// 单本价格上限（None 表示不限）
    pub fn max_request_price(self) -> Option<i32> {
        match self {
            Classification::Normal | Classification::Faltoso => Some(25),
            Classification::Cumpridor => None,
        }
    }

    /// 借期天数, 按作品总副本数分档: 1 本 / 不超过 5 本 / 5 本以上
    pub fn loan_duration(self, total_copies: u32) -> Day {
        match self {
            Classification::Normal => match total_copies {
                0 | 1 => 3,
                2..=5 => 8,
                _ => 15,
            },
            Classification::Faltoso => 2,
            Classification::Cumpridor => match total_copies {
                0 | 1 => 8,
                2..=5 => 15,
                _ => 30,
            },
        }
    }

    /// 价格是否在上限以内
    pub fn allows_price(self, price: i32) -> bool {
        self.max_request_price().map_or(true, |max| price <= max)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Normal => write!(f, "NORMAL"),
            Classification::Faltoso => write!(f, "FALTOSO"),
            Classification::Cumpridor => write!(f, "CUMPRIDOR"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_limits() {
        assert_eq!(Classification::Normal.max_simultaneous_requests(), 3);
        assert_eq!(Classification::Faltoso.max_simultaneous_requests(), 1);
        assert_eq!(Classification::Cumpridor.max_simultaneous_requests(), 5);

        assert_eq!(Classification::Normal.max_request_price(), Some(25));
        assert_eq!(Classification::Faltoso.max_request_price(), Some(25));
        assert!(Classification::Cumpridor.allows_price(i32::MAX));
        assert!(!Classification::Normal.allows_price(26));
        assert!(Classification::Normal.allows_price(25));
    }

    #[test]
    fn test_loan_duration_tiers() {
        assert_eq!(Classification::Normal.loan_duration(1), 3);
        assert_eq!(Classification::Normal.loan_duration(5), 8);
        assert_eq!(Classification::Normal.loan_duration(6), 15);

        // 失信读者不分档
        assert_eq!(Classification::Faltoso.loan_duration(1), 2);
        assert_eq!(Classification::Faltoso.loan_duration(40), 2);

        assert_eq!(Classification::Cumpridor.loan_duration(1), 8);
        assert_eq!(Classification::Cumpridor.loan_duration(3), 15);
        assert_eq!(Classification::Cumpridor.loan_duration(9), 30);
    }

    #[test]
    fn test_category_parse_and_loanable() {
        assert_eq!("REFERENCE".parse::<WorkCategory>(), Ok(WorkCategory::Reference));
        assert_eq!("SCITECH".parse::<WorkCategory>(), Ok(WorkCategory::Scitech));
        assert!("POETRY".parse::<WorkCategory>().is_err());
        assert!(!WorkCategory::Reference.is_loanable());
        assert!(WorkCategory::Fiction.is_loanable());
    }

    #[test]
    fn test_notification_kind_labels() {
        assert_eq!(NotificationKind::Available.to_string(), "DISPONIBILIDADE");
        assert_eq!(NotificationKind::Requested.to_string(), "REQUISIÇÃO");
    }
}

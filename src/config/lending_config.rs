// ==========================================
// 图书借阅系统 - 借阅配置
// ==========================================
// 职责: 罚金费率、初始日期、快照库路径
// 默认: fine_per_day=5, initial_day=1, 快照库位于用户数据目录
// ==========================================

use crate::domain::types::Day;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// 显式指定快照库路径的环境变量
pub const DB_PATH_ENV: &str = "LIBRARY_LENDING_DB_PATH";

pub const DEFAULT_FINE_PER_DAY: i32 = 5;
pub const DEFAULT_INITIAL_DAY: Day = 1;

// ==========================================
// ConfigError
// ==========================================
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置值无效: {key}={value}")]
    InvalidValue { key: String, value: String },

    #[error("配置校验失败: {0}")]
    Validation(String),

    #[error("锁获取失败: {0}")]
    LockError(String),

    #[error("配置存储错误: {0}")]
    Database(#[from] rusqlite::Error),
}

// ==========================================
// LendingConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LendingConfig {
    /// 每逾期一天的罚金（EUR）
    pub fine_per_day: i32,
    /// 新建馆藏的起始日
    pub initial_day: Day,
    /// 快照库路径（None 时取默认路径）
    #[serde(default)]
    pub snapshot_path: Option<String>,
}

impl Default for LendingConfig {
    fn default() -> Self {
        Self {
            fine_per_day: DEFAULT_FINE_PER_DAY,
            initial_day: DEFAULT_INITIAL_DAY,
            snapshot_path: None,
        }
    }
}

impl LendingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fine_per_day <= 0 {
            return Err(ConfigError::Validation(format!(
                "fine_per_day 必须为正数: {}",
                self.fine_per_day
            )));
        }
        if self.initial_day < 1 {
            return Err(ConfigError::Validation(format!(
                "initial_day 必须 >= 1: {}",
                self.initial_day
            )));
        }
        Ok(())
    }

    /// 实际使用的快照库路径
    pub fn db_path(&self) -> String {
        self.snapshot_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .unwrap_or_else(get_default_db_path)
    }
}

/// 默认快照库路径
///
/// 优先读取 LIBRARY_LENDING_DB_PATH; 否则放在用户数据目录下
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./library_lending.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("library-lending");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("library_lending.db");
        }
    }
    path.to_string_lossy().to_string()
}

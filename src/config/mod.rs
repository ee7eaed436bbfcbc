// ==========================================
// 图书借阅系统 - 配置层
// ==========================================
// 职责: 借阅配置（默认值 + config_kv 覆写 + 环境变量）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod lending_config;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use lending_config::{get_default_db_path, ConfigError, LendingConfig, DB_PATH_ENV};

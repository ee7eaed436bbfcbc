// ==========================================
// 图书借阅系统 - 导入层
// ==========================================
// 职责: 解析 ':' 分隔的条目文件, 登记读者、作品与创作者
// ==========================================

pub mod entry_importer;
pub mod entry_parser;
pub mod error;

// 重导出核心类型
pub use entry_importer::{EntryImporter, ImportSummary};
pub use entry_parser::{EntryParser, ImportEntry, ParsedLine};
pub use error::{ImportError, ImportResult};

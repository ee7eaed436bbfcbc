// ==========================================
// 图书借阅系统 - 条目导入器
// ==========================================
// 流程: 解析全部行 → 依序登记读者/作品（创作者随作品登记）
// 红线: 任一条目失败时整体回滚, 馆藏保持导入前状态
// ==========================================

use crate::api::lending_service::LendingService;
use crate::importer::entry_parser::{EntryParser, ImportEntry, ParsedLine};
use crate::importer::error::{ImportError, ImportResult};
use std::path::Path;

/// 导入统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub users: usize,
    pub works: usize,
}

pub struct EntryImporter;

impl EntryImporter {
    /// 导入文件
    pub fn import_file(service: &mut LendingService, path: impl AsRef<Path>) -> ImportResult<ImportSummary> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "开始导入");
        let lines = EntryParser::parse_path(path)?;
        Self::apply(service, lines)
    }

    /// 导入内存文本
    pub fn import_str(service: &mut LendingService, text: &str) -> ImportResult<ImportSummary> {
        let lines = EntryParser::parse_str(text)?;
        Self::apply(service, lines)
    }

    fn apply(service: &mut LendingService, lines: Vec<ParsedLine>) -> ImportResult<ImportSummary> {
        let backup = service.library().clone();
        let mut summary = ImportSummary::default();

        for ParsedLine { row, line, entry } in lines {
            let registered = match entry {
                ImportEntry::User { name, email } => service
                    .register_user(&name, &email)
                    .map(|_| summary.users += 1),
                ImportEntry::Work(draft) => service.register_work(draft).map(|_| summary.works += 1),
            };

            if let Err(e) = registered {
                tracing::warn!(row, %line, error = %e, "导入条目被拒绝, 回滚本次导入");
                *service.library_mut() = backup;
                return Err(ImportError::UnrecognizedEntry {
                    row,
                    line,
                    reason: e.to_string(),
                });
            }
        }

        tracing::info!(users = summary.users, works = summary.works, "导入完成");
        Ok(summary)
    }
}

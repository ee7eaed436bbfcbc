// ==========================================
// 图书借阅系统 - 导入文件解析器
// ==========================================
// 格式: 每行一个条目, ':' 分隔, 无表头
// - USER:姓名:邮箱
// - BOOK:标题:作者(逗号分隔):价格:类别:ISBN:副本数
// - DVD:标题:导演:价格:类别:IGAC:副本数
// ==========================================

use crate::domain::types::WorkCategory;
use crate::domain::work::{NewWork, WorkFormat};
use crate::importer::error::{ImportError, ImportResult};
use csv::{ByteRecord, ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// 解析出的条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportEntry {
    User { name: String, email: String },
    Work(NewWork),
}

/// 带行信息的条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub row: usize,
    pub line: String,
    pub entry: ImportEntry,
}

pub struct EntryParser;

impl EntryParser {
    /// 解析导入文件
    pub fn parse_path(path: &Path) -> ImportResult<Vec<ParsedLine>> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        let file = File::open(path)?;
        Self::parse_reader(file)
    }

    /// 解析内存中的导入文本
    pub fn parse_str(text: &str) -> ImportResult<Vec<ParsedLine>> {
        Self::parse_reader(text.as_bytes())
    }

    fn parse_reader<R: Read>(reader: R) -> ImportResult<Vec<ParsedLine>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b':')
            .has_headers(false)
            .quoting(false)
            .flexible(true) // 各类条目字段数不同
            .from_reader(reader);

        let mut lines = Vec::new();
        for result in reader.byte_records() {
            let record = result?;
            let row = record.position().map_or(0, |p| p.line() as usize);
            let record = match StringRecord::from_byte_record(record) {
                Ok(record) => record,
                Err(err) => {
                    let reason = format!("条目不是有效的 UTF-8: {}", err.utf8_error());
                    let line = lossy_line(&err.into_byte_record());
                    tracing::warn!(row, %line, %reason, "导入条目无法识别");
                    return Err(ImportError::UnrecognizedEntry { row, line, reason });
                }
            };
            let fields: Vec<&str> = record.iter().collect();
            let line = fields.join(":");

            match Self::parse_fields(&fields) {
                Ok(entry) => lines.push(ParsedLine { row, line, entry }),
                Err(reason) => {
                    tracing::warn!(row, %line, %reason, "导入条目无法识别");
                    return Err(ImportError::UnrecognizedEntry { row, line, reason });
                }
            }
        }
        Ok(lines)
    }

    /// 按条目类型解析一行的字段
    pub fn parse_fields(fields: &[&str]) -> Result<ImportEntry, String> {
        let kind = fields.first().copied().unwrap_or_default();
        match kind {
            "USER" => {
                expect_fields(fields, 3, "读者")?;
                Ok(ImportEntry::User {
                    name: fields[1].to_string(),
                    email: fields[2].to_string(),
                })
            }
            "BOOK" => {
                expect_fields(fields, 7, "图书")?;
                let authors = fields[2]
                    .split(',')
                    .map(|name| name.trim().to_string())
                    .collect();
                Ok(ImportEntry::Work(NewWork {
                    title: fields[1].to_string(),
                    price: parse_number(fields[3], "价格")?,
                    category: fields[4].parse::<WorkCategory>()?,
                    total_copies: parse_number(fields[6], "副本数")?,
                    format: WorkFormat::Book {
                        isbn: fields[5].to_string(),
                        authors,
                    },
                }))
            }
            "DVD" => {
                expect_fields(fields, 7, "DVD")?;
                Ok(ImportEntry::Work(NewWork {
                    title: fields[1].to_string(),
                    price: parse_number(fields[3], "价格")?,
                    category: fields[4].parse::<WorkCategory>()?,
                    total_copies: parse_number(fields[6], "副本数")?,
                    format: WorkFormat::Dvd {
                        igac: fields[5].to_string(),
                        director: fields[2].trim().to_string(),
                    },
                }))
            }
            other => Err(format!("未知条目类型: {}", other)),
        }
    }
}

/// 按 ':' 重新拼接原始字段, 非法字节以替换字符显示
fn lossy_line(record: &ByteRecord) -> String {
    record
        .iter()
        .map(String::from_utf8_lossy)
        .collect::<Vec<_>>()
        .join(":")
}

fn expect_fields(fields: &[&str], expected: usize, what: &str) -> Result<(), String> {
    if fields.len() == expected {
        Ok(())
    } else {
        Err(format!(
            "{}条目字段数应为 {}, 实际 {}",
            what,
            expected,
            fields.len()
        ))
    }
}

fn parse_number(raw: &str, field: &str) -> Result<i32, String> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| format!("{}不是整数: {}", field, raw))
}

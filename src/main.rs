// ==========================================
// 图书借阅系统 - 命令行入口
// ==========================================
// 流程: 初始化日志 → 打开快照库 → 加载配置与快照 → (可选) 导入条目文件 → 保存
// 用法: library-lending [条目文件]
// ==========================================

use anyhow::{Context, Result};
use library_lending::config::{ConfigManager, LendingConfig};
use library_lending::db::{ensure_schema, open_sqlite_connection};
use library_lending::importer::EntryImporter;
use library_lending::repository::LibrarySnapshotRepository;
use library_lending::{logging, LendingService, QueryApi};
use std::sync::{Arc, Mutex};

fn main() -> Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", library_lending::APP_NAME);
    tracing::info!("系统版本: {}", library_lending::VERSION);
    tracing::info!("==================================================");

    // 获取数据库路径
    let base = LendingConfig::default();
    let db_path = base.db_path();
    tracing::info!("使用数据库: {}", db_path);

    let conn = open_sqlite_connection(&db_path)
        .with_context(|| format!("无法打开数据库: {}", db_path))?;
    ensure_schema(&conn).context("建表失败")?;
    let conn = Arc::new(Mutex::new(conn));

    let config = ConfigManager::from_connection(conn.clone())?
        .load_lending_config(base)
        .context("借阅配置无效")?;
    tracing::info!(fine_per_day = config.fine_per_day, "借阅配置已加载");

    let repo = LibrarySnapshotRepository::from_connection(conn)?;
    let mut service = match repo.load().context("快照加载失败")? {
        Some(library) => LendingService::from_library(library, config),
        None => {
            tracing::info!("未找到快照, 创建空馆藏");
            LendingService::new(config)
        }
    };

    if let Some(path) = std::env::args().nth(1) {
        let summary = EntryImporter::import_file(&mut service, &path)
            .with_context(|| format!("导入失败: {}", path))?;
        tracing::info!(users = summary.users, works = summary.works, "条目文件已导入");
    }

    {
        let query = QueryApi::new(service.library());
        tracing::info!(
            current_day = query.current_day(),
            users = query.users().len(),
            works = query.works().len(),
            "馆藏概况"
        );
    }

    repo.save(service.library_mut()).context("快照保存失败")?;
    Ok(())
}

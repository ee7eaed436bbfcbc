// ==========================================
// 图书借阅系统 - 馆藏快照仓储
// ==========================================
// 职责: 整库快照的保存/加载（library_snapshot 单行表, JSON 载荷）
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::library::Library;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// LibrarySnapshotRepository
// ==========================================
pub struct LibrarySnapshotRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LibrarySnapshotRepository {
    /// 打开数据库并创建仓储实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            ensure_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 是否已存在快照
    pub fn has_snapshot(&self) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let exists = conn
            .query_row("SELECT 1 FROM library_snapshot WHERE id = 1", [], |_row| Ok(()))
            .optional()?
            .is_some();
        Ok(exists)
    }

    /// 保存快照
    ///
    /// 馆藏未修改且已有快照时跳过, 返回 false; 保存后清除修改标记
    pub fn save(&self, library: &mut Library) -> RepositoryResult<bool> {
        if !library.is_modified() && self.has_snapshot()? {
            tracing::debug!("馆藏未修改, 跳过保存");
            return Ok(false);
        }

        let payload = serde_json::to_string(&*library)?;
        {
            let conn = self.get_conn()?;
            conn.execute(
                "INSERT INTO library_snapshot (id, payload, current_day, saved_at)
                 VALUES (1, ?1, ?2, datetime('now'))
                 ON CONFLICT(id) DO UPDATE SET
                    payload = ?1, current_day = ?2, saved_at = datetime('now')",
                params![payload, library.current_day()],
            )?;
        }
        library.mark_saved();

        tracing::info!(
            current_day = library.current_day(),
            bytes = payload.len(),
            "馆藏快照已保存"
        );
        Ok(true)
    }

    /// 加载快照（不存在时返回 None）
    pub fn load(&self) -> RepositoryResult<Option<Library>> {
        let conn = self.get_conn()?;
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM library_snapshot WHERE id = 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(raw) => {
                let library: Library = serde_json::from_str(&raw)?;
                tracing::info!(current_day = library.current_day(), "馆藏快照已加载");
                Ok(Some(library))
            }
            None => Ok(None),
        }
    }

    /// 删除快照
    pub fn clear(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM library_snapshot", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> LibrarySnapshotRepository {
        let conn = Connection::open_in_memory().unwrap();
        LibrarySnapshotRepository::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_load_without_snapshot() {
        assert!(repo().load().unwrap().is_none());
    }

    #[test]
    fn test_save_skips_unmodified_after_first_save() {
        let repo = repo();
        let mut library = Library::new(3);

        // 首次保存即使未修改也写入
        assert!(repo.save(&mut library).unwrap());
        assert!(!repo.save(&mut library).unwrap());

        library.mark_modified();
        assert!(repo.save(&mut library).unwrap());
        assert!(!library.is_modified());

        let loaded = repo.load().unwrap().unwrap();
        assert_eq!(loaded, library);
        assert_eq!(loaded.current_day(), 3);
    }

    #[test]
    fn test_clear() {
        let repo = repo();
        repo.save(&mut Library::default()).unwrap();
        repo.clear().unwrap();
        assert!(!repo.has_snapshot().unwrap());
    }
}

// ==========================================
// 馆藏快照持久化集成测试
// ==========================================
// 覆盖: 保存 → 重新打开 → 加载后继续借还; 配置覆写与快照共库
// ==========================================


use library_lending::config::{config_keys, ConfigManager, LendingConfig};
use library_lending::repository::LibrarySnapshotRepository;
use library_lending::{LendingService, NotificationKind};
use test_helpers::*;

#[test]
fn test_snapshot_round_trip_preserves_whole_graph() {
    let (_temp_file, db_path) = create_test_db().unwrap();

    let mut service = new_service();
    let ana = add_user(&mut service, "Ana");
    let rui = add_user(&mut service, "Rui");
    let work = add_fiction(&mut service, "Os Maias", 10, 1);
    service.subscribe(rui, work, NotificationKind::Available).unwrap();
    service.request_work(ana, work).unwrap();
    service.advance_date(6).unwrap();
    service.return_work(ana, work).unwrap();
    assert!(service.library().is_modified());

    {
        let repo = LibrarySnapshotRepository::new(&db_path).unwrap();
        assert!(repo.save(service.library_mut()).unwrap());
        assert!(!service.library().is_modified());
    }

    // 重新打开数据库
    let repo = LibrarySnapshotRepository::new(&db_path).unwrap();
    let restored = repo.load().unwrap().expect("应存在快照");
    assert_eq!(&restored, service.library());
    assert_eq!(restored.current_day(), 7);

    // 恢复后继续运行: 罚金、通知、ID 计数器均保留
    let mut resumed = LendingService::from_library(restored, LendingConfig::default());
    assert_eq!(resumed.take_notifications(rui).unwrap().len(), 1);
    assert_eq!(resumed.pay_fine(ana).unwrap().amount, 15);
    assert_eq!(add_user(&mut resumed, "Zé"), 3);
    assert_active_invariant(&resumed);
}

#[test]
fn test_unmodified_library_is_not_rewritten() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let repo = LibrarySnapshotRepository::new(&db_path).unwrap();

    let mut service = new_service();
    add_user(&mut service, "Ana");
    assert!(repo.save(service.library_mut()).unwrap());
    assert!(!repo.save(service.library_mut()).unwrap());

    service.advance_date(1).unwrap();
    assert!(repo.save(service.library_mut()).unwrap());
}

#[test]
fn test_config_overrides_share_database_with_snapshot() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let manager = ConfigManager::new(&db_path).unwrap();
    manager.set_global_config_value(config_keys::FINE_PER_DAY, "2").unwrap();
    manager.set_global_config_value(config_keys::INITIAL_DAY, "10").unwrap();

    let config = manager.load_lending_config(LendingConfig::default()).unwrap();
    let mut service = LendingService::new(config);
    assert_eq!(service.current_day(), 10);

    let user = add_user(&mut service, "Ana");
    let work = add_fiction(&mut service, "Único", 10, 1);
    assert_eq!(service.request_work(user, work).unwrap(), 13);
    service.advance_date(5).unwrap();
    assert_eq!(service.return_work(user, work).unwrap().fine, 4);

    let repo = LibrarySnapshotRepository::new(&db_path).unwrap();
    repo.save(service.library_mut()).unwrap();
    assert!(repo.load().unwrap().is_some());
}

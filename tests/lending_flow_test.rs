// ==========================================
// 借还流程集成测试
// ==========================================
// 覆盖: 借出 → 逾期 → 罚金 → 结清; 规则链顺序; 分级迁移; active 不变式
// ==========================================


use library_lending::engine::LedgerError;
use library_lending::{Classification, LendingError, WorkCategory};
use test_helpers::*;

// ==========================================
// 罚金与结清
// ==========================================

#[test]
fn test_late_return_fine_and_settlement() {
    let mut service = new_service();
    let u1 = add_user(&mut service, "Ana");
    let w1 = add_fiction(&mut service, "Os Maias", 10, 1);

    let deadline = service.request_work(u1, w1).unwrap();
    assert_eq!(deadline, 4);
    assert_eq!(service.library().work(w1).unwrap().available_copies(), 0);

    // 读者仍为正常状态, 无可结清项
    assert_eq!(service.pay_fine(u1), Err(LendingError::UserNotSuspended(u1)));

    service.advance_date(5).unwrap();
    assert_eq!(service.current_day(), 6);
    assert!(!service.library().user(u1).unwrap().is_active());
    assert_active_invariant(&service);

    // 逾期但尚未归还: 无罚金可缴
    assert_eq!(service.pay_fine(u1), Err(LendingError::NoOutstandingFine(u1)));

    let outcome = service.return_work(u1, w1).unwrap();
    assert_eq!(outcome.fine, 10);
    assert!(!outcome.closed);
    let user = service.library().user(u1).unwrap();
    assert_eq!(user.total_fines(), 10);
    assert!(!user.is_active());
    assert_eq!(user.to_string(), "1 - Ana - ana@biblioteca.pt - NORMAL - SUSPENSO - EUR 10");
    assert_active_invariant(&service);

    let settlement = service.pay_fine(u1).unwrap();
    assert_eq!(settlement.amount, 10);
    assert!(settlement.reactivated);
    let user = service.library().user(u1).unwrap();
    assert_eq!(user.total_fines(), 0);
    assert!(user.is_active());
    assert!(user.active_requests().is_empty());
    assert_active_invariant(&service);

    // 第二次缴费必须失败, 且不重复扣款
    assert_eq!(service.pay_fine(u1), Err(LendingError::UserNotSuspended(u1)));
    assert_eq!(service.library().user(u1).unwrap().total_fines(), 0);
}

#[test]
fn test_settlement_keeps_user_suspended_with_other_overdue_loan() {
    let mut service = new_service();
    let user = add_user(&mut service, "Rui");
    let w1 = add_fiction(&mut service, "Livro Um", 10, 1);
    let w2 = add_fiction(&mut service, "Livro Dois", 10, 2);

    assert_eq!(service.request_work(user, w1).unwrap(), 4);
    assert_eq!(service.request_work(user, w2).unwrap(), 9);

    service.advance_date(4).unwrap(); // 第 5 天: w1 逾期
    service.return_work(user, w1).unwrap();
    service.advance_date(5).unwrap(); // 第 10 天: w2 也逾期

    let settlement = service.pay_fine(user).unwrap();
    assert_eq!(settlement.amount, 5);
    assert!(!settlement.reactivated);
    assert!(!service.library().user(user).unwrap().is_active());
    assert_active_invariant(&service);
}

#[test]
fn test_return_without_loan_is_rejected() {
    let mut service = new_service();
    let user = add_user(&mut service, "Rui");
    let work = add_fiction(&mut service, "Livro", 10, 1);

    assert_eq!(
        service.return_work(user, work),
        Err(LendingError::WorkNotBorrowed { user_id: user, work_id: work })
    );

    service.request_work(user, work).unwrap();
    service.return_work(user, work).unwrap();
    // 已归还的借阅不能再次归还
    assert!(matches!(
        service.return_work(user, work),
        Err(LendingError::WorkNotBorrowed { .. })
    ));
    assert_inventory_invariant(&service);
}

// ==========================================
// 规则链
// ==========================================

#[test]
fn test_availability_reported_before_price() {
    let mut service = new_service();
    let rich = add_user(&mut service, "Beatriz");
    let normal = add_user(&mut service, "Carlos");
    promote_to_cumpridor(&mut service, rich);
    assert_eq!(
        service.library().user(rich).unwrap().classification(),
        Classification::Cumpridor
    );

    let expensive = add_fiction(&mut service, "Edição de Luxo", 40, 1);

    // 只有价格规则失败
    assert_eq!(service.request_work(normal, expensive).unwrap_err().rule_id(), Some(6));

    // Cumpridor 无价格上限
    service.request_work(rich, expensive).unwrap();

    // 无副本且超价: 报告规则 3
    let err = service.request_work(normal, expensive).unwrap_err();
    assert_eq!(err.rule_id(), Some(3));
}

#[test]
fn test_reference_work_never_lent() {
    let mut service = new_service();
    let normal = add_user(&mut service, "Duarte");
    let exemplary = add_user(&mut service, "Eva");
    promote_to_cumpridor(&mut service, exemplary);

    let dictionary = service
        .register_work(book("Dicionário", &["Academia"], 10, WorkCategory::Reference, 5))
        .unwrap();

    for user in [normal, exemplary] {
        assert_eq!(service.request_work(user, dictionary).unwrap_err().rule_id(), Some(5));
    }
    assert_eq!(service.library().work(dictionary).unwrap().available_copies(), 5);
}

#[test]
fn test_duplicate_and_limit_rules() {
    let mut service = new_service();
    let user = add_user(&mut service, "Filipa");
    let works: Vec<_> = (1..=4)
        .map(|i| add_fiction(&mut service, &format!("Volume {}", i), 10, 2))
        .collect();

    service.request_work(user, works[0]).unwrap();
    assert_eq!(service.request_work(user, works[0]).unwrap_err().rule_id(), Some(1));

    service.request_work(user, works[1]).unwrap();
    service.request_work(user, works[2]).unwrap();
    // Normal 最多同时 3 本
    assert_eq!(service.request_work(user, works[3]).unwrap_err().rule_id(), Some(4));
}

#[test]
fn test_suspended_user_cannot_borrow() {
    let mut service = new_service();
    let user = add_user(&mut service, "Gil");
    let w1 = add_fiction(&mut service, "Primeiro", 10, 1);
    let w2 = add_fiction(&mut service, "Segundo", 10, 1);

    service.request_work(user, w1).unwrap();
    service.advance_date(10).unwrap();
    assert_eq!(service.request_work(user, w2).unwrap_err().rule_id(), Some(2));
}

// ==========================================
// 分级迁移
// ==========================================

#[test]
fn test_faltoso_limits_and_recovery_to_cumpridor() {
    let mut service = new_service();
    let user = add_user(&mut service, "Helena");
    demote_to_faltoso(&mut service, user);
    assert_eq!(
        service.library().user(user).unwrap().classification(),
        Classification::Faltoso
    );

    // Faltoso: 借期固定 2 天, 同时最多 1 本
    let w1 = add_fiction(&mut service, "Curto Prazo", 10, 10);
    let w2 = add_fiction(&mut service, "Outro", 10, 10);
    let today = service.current_day();
    assert_eq!(service.request_work(user, w1).unwrap(), today + 2);
    assert_eq!(service.request_work(user, w2).unwrap_err().rule_id(), Some(4));
    service.return_work(user, w1).unwrap();

    // 再按时归还 2 次（共 3 次）→ 恢复为 Normal
    for _ in 0..2 {
        service.request_work(user, w1).unwrap();
        service.return_work(user, w1).unwrap();
    }
    assert_eq!(
        service.library().user(user).unwrap().classification(),
        Classification::Normal
    );

    // 再按时 2 次（共 5 次）→ Cumpridor
    for _ in 0..2 {
        service.request_work(user, w1).unwrap();
        service.return_work(user, w1).unwrap();
    }
    assert_eq!(
        service.library().user(user).unwrap().classification(),
        Classification::Cumpridor
    );
    assert_active_invariant(&service);
}

#[test]
fn test_deadline_fixed_at_borrow_time() {
    let mut service = new_service();
    let user = add_user(&mut service, "Inês");
    let single = add_fiction(&mut service, "Exemplar Único", 10, 1);
    let few = add_fiction(&mut service, "Poucos", 10, 5);
    let many = add_fiction(&mut service, "Muitos", 10, 6);

    assert_eq!(service.request_work(user, single).unwrap(), 4);
    assert_eq!(service.request_work(user, few).unwrap(), 9);
    assert_eq!(service.request_work(user, many).unwrap(), 16);

    let request = service
        .library()
        .user(user)
        .and_then(|u| u.history().first().copied())
        .and_then(|id| service.library().request(id))
        .unwrap();
    assert_eq!(request.work_id, many);
    assert_eq!(request.deadline, 16);
}

// ==========================================
// 数值越界
// ==========================================

#[test]
fn test_extremely_late_return_is_rejected_without_changes() {
    let mut service = new_service();
    let user = add_user(&mut service, "Ana");
    let work = add_fiction(&mut service, "Os Maias", 10, 1);
    service.request_work(user, work).unwrap();
    service.advance_date(1_000_000_000).unwrap();
    let before = service.library().clone();

    // 逾期约 10 亿天 × 5 超出 i32
    assert_eq!(
        service.return_work(user, work),
        Err(LendingError::Ledger(LedgerError::FineOverflow {
            user_id: user,
            request_id: 1
        }))
    );
    assert_eq!(service.library(), &before);
    assert_eq!(service.library().work(work).unwrap().available_copies(), 0);
}

#[test]
fn test_fine_balance_overflow_is_rejected_without_changes() {
    let mut service = new_service();
    let user = add_user(&mut service, "Ana");
    let w1 = add_fiction(&mut service, "Primeiro", 10, 1);
    let w2 = add_fiction(&mut service, "Segundo", 10, 1);
    service.request_work(user, w1).unwrap();
    service.request_work(user, w2).unwrap();
    service.advance_date(240_000_003).unwrap();

    assert_eq!(service.return_work(user, w1).unwrap().fine, 1_200_000_000);
    let before = service.library().clone();

    assert_eq!(
        service.return_work(user, w2),
        Err(LendingError::Ledger(LedgerError::FineOverflow {
            user_id: user,
            request_id: 2
        }))
    );
    assert_eq!(service.library(), &before);
    assert_eq!(service.library().user(user).unwrap().total_fines(), 1_200_000_000);
    assert_active_invariant(&service);
}

#[test]
fn test_date_overflow_is_rejected() {
    let mut service = new_service();
    assert_eq!(
        service.advance_date(i32::MAX),
        Err(LendingError::DayOverflow {
            today: 1,
            days: i32::MAX
        })
    );
    assert_eq!(service.current_day(), 1);
}

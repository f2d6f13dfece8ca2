//! 资产生命周期状态机单元测试
//!
//! 覆盖完整的状态转换矩阵

use helpdesk_system::models::asset::AssetStatus;
use helpdesk_system::models::history::HistoryAction;
use helpdesk_system::services::lifecycle::{plan, LifecycleAction};

const ALL_STATUSES: [AssetStatus; 6] = [
    AssetStatus::Available,
    AssetStatus::InUse,
    AssetStatus::Maintenance,
    AssetStatus::Disposed,
    AssetStatus::Lost,
    AssetStatus::Retired,
];

// ==================== 借出 / 归还 ====================

#[test]
fn test_check_out_matrix() {
    for status in ALL_STATUSES {
        let result = plan(status, LifecycleAction::CheckOut);
        if status == AssetStatus::Available {
            let p = result.unwrap();
            assert_eq!(p.new_status, AssetStatus::InUse);
            assert!(!p.clear_assignment);
            assert_eq!(p.history_action, HistoryAction::CheckedOut);
        } else {
            assert!(result.is_err(), "check out from {:?} should fail", status);
        }
    }
}

#[test]
fn test_check_in_matrix() {
    for status in ALL_STATUSES {
        let result = plan(status, LifecycleAction::CheckIn);
        if status == AssetStatus::InUse {
            let p = result.unwrap();
            assert_eq!(p.new_status, AssetStatus::Available);
            assert!(p.clear_assignment);
            assert_eq!(p.history_action, HistoryAction::CheckedIn);
        } else {
            assert!(result.is_err(), "check in from {:?} should fail", status);
        }
    }
}

// ==================== 遗失 / 维修流程 ====================

#[test]
fn test_mark_as_broken_matrix() {
    // 任意状态都可标记遗失，资产转入 lost 并释放借出信息
    for status in ALL_STATUSES {
        let p = plan(status, LifecycleAction::MarkAsBroken).unwrap();
        assert_eq!(p.new_status, AssetStatus::Lost);
        assert!(p.clear_assignment, "mark broken from {:?} must clear assignment", status);
        assert_eq!(p.history_action, HistoryAction::MarkedAsBroken);
    }
}

#[test]
fn test_send_for_repair_matrix() {
    // 报废/遗失的资产也可以回厂维修
    for status in ALL_STATUSES {
        let p = plan(status, LifecycleAction::SendForRepair).unwrap();
        assert_eq!(p.new_status, AssetStatus::Maintenance);
        assert!(!p.clear_assignment);
        assert_eq!(p.history_action, HistoryAction::SentForRepair);
    }
}

#[test]
fn test_complete_repair_only_from_maintenance() {
    let action = LifecycleAction::CompleteRepair {
        return_status: AssetStatus::Available,
    };

    for status in ALL_STATUSES {
        let result = plan(status, action);
        if status == AssetStatus::Maintenance {
            let p = result.unwrap();
            assert_eq!(p.new_status, AssetStatus::Available);
        } else {
            assert!(result.is_err());
        }
    }
}

#[test]
fn test_complete_repair_cannot_return_to_maintenance() {
    assert!(plan(
        AssetStatus::Maintenance,
        LifecycleAction::CompleteRepair {
            return_status: AssetStatus::Maintenance
        }
    )
    .is_err());
}

#[test]
fn test_complete_repair_to_disposed_releases_assignment() {
    // 维修结论是报废，借出信息一并清除
    let p = plan(
        AssetStatus::Maintenance,
        LifecycleAction::CompleteRepair {
            return_status: AssetStatus::Disposed,
        },
    )
    .unwrap();
    assert_eq!(p.new_status, AssetStatus::Disposed);
    assert!(p.clear_assignment);
}

// ==================== 直接状态设置 ====================

#[test]
fn test_set_status_rejects_noop() {
    for status in ALL_STATUSES {
        assert!(plan(status, LifecycleAction::SetStatus { target: status }).is_err());
    }
}

#[test]
fn test_set_status_rejects_direct_in_use() {
    // in_use 只能通过借出流程进入
    for status in ALL_STATUSES {
        if status == AssetStatus::InUse {
            continue;
        }
        assert!(plan(
            status,
            LifecycleAction::SetStatus {
                target: AssetStatus::InUse
            }
        )
        .is_err());
    }
}

#[test]
fn test_disposed_and_lost_release_assignment() {
    for target in [AssetStatus::Disposed, AssetStatus::Lost] {
        for current in [AssetStatus::Available, AssetStatus::InUse, AssetStatus::Maintenance] {
            let p = plan(current, LifecycleAction::SetStatus { target }).unwrap();
            assert_eq!(p.new_status, target);
            assert!(p.clear_assignment, "{:?} -> {:?} must clear assignment", current, target);
            assert_eq!(p.history_action, HistoryAction::StatusChanged);
        }
    }
}

#[test]
fn test_leaving_in_use_always_clears_assignment() {
    for target in [AssetStatus::Available, AssetStatus::Maintenance, AssetStatus::Retired] {
        let p = plan(AssetStatus::InUse, LifecycleAction::SetStatus { target }).unwrap();
        assert!(p.clear_assignment, "in_use -> {:?} must clear assignment", target);
    }
}

#[test]
fn test_set_status_between_idle_states_keeps_assignment_flag_low() {
    let p = plan(
        AssetStatus::Available,
        LifecycleAction::SetStatus {
            target: AssetStatus::Retired,
        },
    )
    .unwrap();
    assert!(!p.clear_assignment);
}

//! 领域模型单元测试
//!
//! 测试状态、动作和角色枚举的字符串表示

use helpdesk_system::models::asset::AssetStatus;
use helpdesk_system::models::history::HistoryAction;
use helpdesk_system::models::user::UserRole;

#[test]
fn test_asset_status_round_trip() {
    let statuses = [
        AssetStatus::Available,
        AssetStatus::InUse,
        AssetStatus::Maintenance,
        AssetStatus::Disposed,
        AssetStatus::Lost,
        AssetStatus::Retired,
    ];

    for status in statuses {
        assert_eq!(AssetStatus::parse(status.as_str()), Some(status));
    }

    assert_eq!(AssetStatus::parse("unknown"), None);
    assert_eq!(AssetStatus::parse("Available"), None); // 区分大小写
}

#[test]
fn test_asset_status_strings() {
    assert_eq!(AssetStatus::Available.as_str(), "available");
    assert_eq!(AssetStatus::InUse.as_str(), "in_use");
    assert_eq!(AssetStatus::Maintenance.as_str(), "maintenance");
    assert_eq!(AssetStatus::Disposed.as_str(), "disposed");
    assert_eq!(AssetStatus::Lost.as_str(), "lost");
    assert_eq!(AssetStatus::Retired.as_str(), "retired");
}

#[test]
fn test_asset_status_serde_matches_as_str() {
    // JSON 表示与数据库字符串保持一致
    let json = serde_json::to_string(&AssetStatus::InUse).unwrap();
    assert_eq!(json, "\"in_use\"");

    let parsed: AssetStatus = serde_json::from_str("\"maintenance\"").unwrap();
    assert_eq!(parsed, AssetStatus::Maintenance);
}

#[test]
fn test_terminal_statuses_release_assignment() {
    assert!(AssetStatus::Disposed.releases_assignment());
    assert!(AssetStatus::Lost.releases_assignment());
    assert!(!AssetStatus::Available.releases_assignment());
    assert!(!AssetStatus::InUse.releases_assignment());
    assert!(!AssetStatus::Maintenance.releases_assignment());
    assert!(!AssetStatus::Retired.releases_assignment());
}

#[test]
fn test_history_action_strings() {
    assert_eq!(HistoryAction::Created.as_str(), "created");
    assert_eq!(HistoryAction::Updated.as_str(), "updated");
    assert_eq!(HistoryAction::CheckedOut.as_str(), "checked_out");
    assert_eq!(HistoryAction::CheckedIn.as_str(), "checked_in");
    assert_eq!(HistoryAction::StatusChanged.as_str(), "status_changed");
    assert_eq!(HistoryAction::MarkedAsBroken.as_str(), "marked_as_broken");
    assert_eq!(HistoryAction::SentForRepair.as_str(), "sent_for_repair");
    assert_eq!(HistoryAction::Deleted.as_str(), "deleted");
    assert_eq!(HistoryAction::Replicated.as_str(), "replicated");
}

#[test]
fn test_user_role_round_trip() {
    for role in [UserRole::Admin, UserRole::Manager, UserRole::User] {
        assert_eq!(UserRole::parse(role.as_str()), Some(role));
    }
    assert_eq!(UserRole::parse("superuser"), None);
}

#[test]
fn test_only_admin_role_is_admin() {
    assert!(UserRole::Admin.is_admin());
    assert!(!UserRole::Manager.is_admin());
    assert!(!UserRole::User.is_admin());
}

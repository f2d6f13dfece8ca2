//! 资产服务集成测试
//!
//! 在真实数据库上验证生命周期事务：状态变更、历史写入和
//! 借出信息清理必须同时生效。需要 TEST_DATABASE_URL。

use helpdesk_system::{
    auth::ActorContext,
    models::{
        asset::{AssetStatus, BulkStatusRequest, CheckInRequest, CheckOutRequest, CreateAssetRequest, MarkBrokenRequest, StatusChangeRequest},
        history::HistoryListFilters,
        user::UserRole,
    },
};
use serial_test::serial;

mod common;

fn actor(data: &common::TestData, admin: bool) -> ActorContext {
    ActorContext {
        user_id: if admin { data.admin_id } else { data.user_id },
        username: if admin { "admin".to_string() } else { "alice".to_string() },
        role: if admin { UserRole::Admin } else { UserRole::User },
        organisation_id: data.organisation_id,
    }
}

fn create_request(name: &str) -> CreateAssetRequest {
    CreateAssetRequest {
        asset_tag: None,
        asset_id: None,
        name: Some(name.to_string()),
        serial_number: None,
        description: None,
        model: None,
        category_id: None,
        make_id: None,
        department_id: None,
        location_id: None,
        purchase_date: None,
        purchase_price: None,
        warranty_expiry: None,
    }
}

#[tokio::test]
#[serial]
#[ignore] // 需要数据库
async fn test_create_allocates_default_tag_and_writes_history() {
    let config = common::create_test_config();
    let pool = common::setup_test_db(&config).await;
    let data = common::setup_test_data(&pool).await;
    let state = common::create_test_app_state(pool);
    let actor = actor(&data, false);

    let asset = state
        .asset_service
        .create(&actor, &create_request("Test laptop"))
        .await
        .unwrap();

    // 未配置标签格式时使用默认前缀
    assert_eq!(asset.asset_tag, "AS-0001");
    assert_eq!(asset.status, "available");

    let (history, total) = state
        .history_service
        .list(data.organisation_id, asset.id, &HistoryListFilters::default(), 50, 0)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(history[0].action, "created");
    assert_eq!(history[0].performed_by_name.as_deref(), Some("alice"));
}

#[tokio::test]
#[serial]
#[ignore] // 需要数据库
async fn test_check_out_and_check_in_cycle() {
    let config = common::create_test_config();
    let pool = common::setup_test_db(&config).await;
    let data = common::setup_test_data(&pool).await;
    let state = common::create_test_app_state(pool);
    let actor = actor(&data, false);

    let asset = state
        .asset_service
        .create(&actor, &create_request("Shared projector"))
        .await
        .unwrap();

    let checked_out = state
        .asset_service
        .check_out(
            &actor,
            asset.id,
            &CheckOutRequest {
                checked_out_to: Some(data.user_id),
                assigned_to: Some("Alice".to_string()),
                expected_return_date: None,
                notes: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(checked_out.status, "in_use");
    assert_eq!(checked_out.assigned_to.as_deref(), Some("Alice"));

    // 已借出的资产不能再次借出
    let err = state
        .asset_service
        .check_out(
            &actor,
            asset.id,
            &CheckOutRequest {
                checked_out_to: Some(data.admin_id),
                assigned_to: None,
                expected_return_date: None,
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), 409);

    let checked_in = state
        .asset_service
        .check_in(&actor, asset.id, &CheckInRequest { notes: None })
        .await
        .unwrap();
    assert_eq!(checked_in.status, "available");
    assert!(checked_in.assigned_to.is_none());
    assert!(checked_in.checked_out_to.is_none());

    let (history, _) = state
        .history_service
        .list(data.organisation_id, asset.id, &HistoryListFilters::default(), 50, 0)
        .await
        .unwrap();
    let actions: Vec<&str> = history.iter().map(|h| h.action.as_str()).collect();
    assert!(actions.contains(&"checked_out"));
    assert!(actions.contains(&"checked_in"));
}

#[tokio::test]
#[serial]
#[ignore] // 需要数据库
async fn test_dispose_clears_assignment_atomically() {
    let config = common::create_test_config();
    let pool = common::setup_test_db(&config).await;
    let data = common::setup_test_data(&pool).await;
    let state = common::create_test_app_state(pool);
    let actor = actor(&data, false);

    let asset = state
        .asset_service
        .create(&actor, &create_request("Dying desktop"))
        .await
        .unwrap();
    state
        .asset_service
        .check_out(
            &actor,
            asset.id,
            &CheckOutRequest {
                checked_out_to: None,
                assigned_to: Some("Bob".to_string()),
                expected_return_date: None,
                notes: None,
            },
        )
        .await
        .unwrap();

    let disposed = state
        .asset_service
        .change_status(
            &actor,
            asset.id,
            &StatusChangeRequest {
                status: "disposed".to_string(),
                notes: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(disposed.status, "disposed");
    assert!(disposed.assigned_to.is_none());
    assert!(disposed.checked_out_at.is_none());
}

#[tokio::test]
#[serial]
#[ignore] // 需要数据库
async fn test_bulk_status_reports_partial_failures() {
    let config = common::create_test_config();
    let pool = common::setup_test_db(&config).await;
    let data = common::setup_test_data(&pool).await;
    let state = common::create_test_app_state(pool);
    let actor = actor(&data, true);

    let a = state.asset_service.create(&actor, &create_request("Asset A")).await.unwrap();
    let b = state.asset_service.create(&actor, &create_request("Asset B")).await.unwrap();

    // B 先报废，再批量报废时 B 因状态未变化而失败
    state
        .asset_service
        .change_status(
            &actor,
            b.id,
            &StatusChangeRequest {
                status: "disposed".to_string(),
                notes: None,
            },
        )
        .await
        .unwrap();

    let outcome = state
        .asset_service
        .bulk_change_status(
            &actor,
            &BulkStatusRequest {
                asset_ids: vec![a.id, b.id],
                status: "disposed".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome.updated, 1);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].asset_id, b.id);

    let refreshed = state.asset_service.get(&actor, a.id).await.unwrap();
    assert_eq!(refreshed.asset.status, AssetStatus::Disposed.as_str());
}

#[tokio::test]
#[serial]
#[ignore] // 需要数据库
async fn test_bulk_status_reports_missing_asset() {
    let config = common::create_test_config();
    let pool = common::setup_test_db(&config).await;
    let data = common::setup_test_data(&pool).await;
    let state = common::create_test_app_state(pool);
    let actor = actor(&data, true);

    let a = state.asset_service.create(&actor, &create_request("Asset A")).await.unwrap();
    let missing = uuid::Uuid::new_v4();

    let outcome = state
        .asset_service
        .bulk_change_status(
            &actor,
            &BulkStatusRequest {
                asset_ids: vec![a.id, missing],
                status: "retired".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome.updated, 1);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].asset_id, missing);
}

#[tokio::test]
#[serial]
#[ignore] // 需要数据库
async fn test_mark_as_broken_moves_to_lost_and_clears_assignment() {
    let config = common::create_test_config();
    let pool = common::setup_test_db(&config).await;
    let data = common::setup_test_data(&pool).await;
    let state = common::create_test_app_state(pool);
    let actor = actor(&data, false);

    let asset = state
        .asset_service
        .create(&actor, &create_request("Wandering tablet"))
        .await
        .unwrap();
    state
        .asset_service
        .check_out(
            &actor,
            asset.id,
            &CheckOutRequest {
                checked_out_to: Some(data.user_id),
                assigned_to: Some("Alice".to_string()),
                expected_return_date: None,
                notes: None,
            },
        )
        .await
        .unwrap();

    let lost = state
        .asset_service
        .mark_as_broken(
            &actor,
            asset.id,
            &MarkBrokenRequest {
                broken_date: Some(chrono::Utc::now().date_naive()),
                notes: Some("Left on the train".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(lost.status, "lost");
    assert!(lost.assigned_to.is_none());
    assert!(lost.checked_out_to.is_none());
    assert!(lost.checked_out_at.is_none());

    let (history, _) = state
        .history_service
        .list(data.organisation_id, asset.id, &HistoryListFilters::default(), 50, 0)
        .await
        .unwrap();
    let entry = history
        .iter()
        .find(|h| h.action == "marked_as_broken")
        .expect("marked_as_broken entry");
    assert_eq!(entry.old_value.as_deref(), Some("in_use"));
    assert_eq!(entry.new_value.as_deref(), Some("lost"));
}

#[tokio::test]
#[serial]
#[ignore] // 需要数据库
async fn test_tag_format_crud_drives_allocation() {
    use helpdesk_system::models::tag::UpsertTagFormatRequest;

    let config = common::create_test_config();
    let pool = common::setup_test_db(&config).await;
    let data = common::setup_test_data(&pool).await;
    let state = common::create_test_app_state(pool);
    let actor = actor(&data, false);

    let format = state
        .tag_service
        .upsert_format(
            data.organisation_id,
            &UpsertTagFormatRequest {
                category_id: None,
                prefix: "IT-".to_string(),
                padding_length: Some(5),
            },
        )
        .await
        .unwrap();
    assert_eq!(format.prefix, "IT-");

    let asset = state
        .asset_service
        .create(&actor, &create_request("Managed switch"))
        .await
        .unwrap();
    assert_eq!(asset.asset_tag, "IT-00001");

    assert!(state
        .tag_service
        .delete_format(data.organisation_id, format.id)
        .await
        .unwrap());
    let formats = state.tag_service.list_formats(data.organisation_id).await.unwrap();
    assert!(formats.is_empty());
}

#[tokio::test]
#[serial]
#[ignore] // 需要数据库
async fn test_repair_with_completion_date_created_as_completed() {
    use helpdesk_system::models::asset::RepairRequestBody;

    let config = common::create_test_config();
    let pool = common::setup_test_db(&config).await;
    let data = common::setup_test_data(&pool).await;
    let state = common::create_test_app_state(pool);
    let actor = actor(&data, false);

    let asset = state
        .asset_service
        .create(&actor, &create_request("Repaired printer"))
        .await
        .unwrap();

    // 补录历史维修：创建时即带完成日期
    state
        .asset_service
        .send_for_repair(
            &actor,
            asset.id,
            &RepairRequestBody {
                issue_description: "Paper feed jammed".to_string(),
                cost: Some(35.0),
                completed_date: Some(chrono::Utc::now()),
                notes: None,
            },
        )
        .await
        .unwrap();

    let repairs = state.asset_service.list_repairs(&actor, asset.id).await.unwrap();
    assert_eq!(repairs.len(), 1);
    assert_eq!(repairs[0].status, "completed");
    assert!(repairs[0].completed_at.is_some());

    // 不带完成日期时照常开立为进行中
    state
        .asset_service
        .send_for_repair(
            &actor,
            asset.id,
            &RepairRequestBody {
                issue_description: "Fuser overheating".to_string(),
                cost: None,
                completed_date: None,
                notes: None,
            },
        )
        .await
        .unwrap();

    let repairs = state.asset_service.list_repairs(&actor, asset.id).await.unwrap();
    assert!(repairs.iter().any(|r| r.status == "in_progress"));
}

#[tokio::test]
#[serial]
#[ignore] // 需要数据库
async fn test_soft_deleted_asset_hidden_but_tag_reserved() {
    let config = common::create_test_config();
    let pool = common::setup_test_db(&config).await;
    let data = common::setup_test_data(&pool).await;
    let state = common::create_test_app_state(pool);
    let actor = actor(&data, false);

    let asset = state
        .asset_service
        .create(&actor, &create_request("Short lived"))
        .await
        .unwrap();
    assert_eq!(asset.asset_tag, "AS-0001");

    state.asset_service.delete(&actor, asset.id).await.unwrap();

    let err = state.asset_service.get(&actor, asset.id).await.unwrap_err();
    assert_eq!(err.code(), 404);

    // 软删除的标签仍占用编号，不会被复用
    let next = state
        .asset_service
        .create(&actor, &create_request("Replacement"))
        .await
        .unwrap();
    assert_eq!(next.asset_tag, "AS-0002");
}

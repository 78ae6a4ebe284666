use std::sync::Arc;

use assert_matches::assert_matches;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::models::{AppointmentError, DraftUpdate};
use appointment_cell::services::live_list::AppointmentHub;
use appointment_cell::services::review::{
    ReviewDesk, CONFIRMATION_FIELDS_MESSAGE, DEFAULT_REJECTION_NOTE,
};
use session_cell::SessionService;
use shared_models::appointment::AppointmentRecord;
use shared_store::StoreClient;
use shared_utils::test_utils::{MockStoreResponses, TestConfig};

async fn mount_admin_auth(mock_server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockStoreResponses::admin_identity_response()),
        )
        .mount(mock_server)
        .await;
}

fn record_from(value: serde_json::Value) -> AppointmentRecord {
    serde_json::from_value(value).unwrap()
}

async fn desk_with_records(
    mock_server: &MockServer,
    records: Vec<AppointmentRecord>,
) -> ReviewDesk {
    let mut test_config = TestConfig::with_credential("deploy-secret");
    test_config.store_url = mock_server.uri();
    let config = test_config.to_arc();

    let store = Arc::new(StoreClient::new(&config));
    let session = Arc::new(SessionService::new(Arc::clone(&config), Arc::clone(&store)));
    session.bootstrap().await;

    let hub = Arc::new(AppointmentHub::new());
    hub.apply_snapshot(records).await;

    ReviewDesk::new(store, session, hub)
}

#[tokio::test]
async fn test_open_unknown_appointment_is_not_found() {
    let mock_server = MockServer::start().await;
    mount_admin_auth(&mock_server).await;

    let desk = desk_with_records(&mock_server, vec![]).await;
    let result = desk.open("missing").await;

    assert_matches!(result, Err(AppointmentError::NotFound));
    assert!(desk.current().await.is_none());
}

#[tokio::test]
async fn test_open_pending_prefills_requested_date() {
    let mock_server = MockServer::start().await;
    mount_admin_auth(&mock_server).await;

    let record = record_from(MockStoreResponses::pending_appointment(
        "apt-1",
        "María Pérez",
        "2024-06-01",
    ));
    let desk = desk_with_records(&mock_server, vec![record]).await;

    let selection = desk.open("apt-1").await.unwrap();

    assert_eq!(selection.appointment.id, "apt-1");
    assert_eq!(selection.draft.confirmation_date, "2024-06-01");
    assert!(selection.draft.confirmation_time.is_empty());
    assert!(selection.draft.cost.is_empty());
}

#[tokio::test]
async fn test_open_confirmed_prefills_existing_confirmation() {
    let mock_server = MockServer::start().await;
    mount_admin_auth(&mock_server).await;

    let record = record_from(MockStoreResponses::confirmed_appointment(
        "apt-2",
        "Ana Gómez",
        "2024-06-01",
        "2024-06-03",
        "14:00",
        50.0,
    ));
    let desk = desk_with_records(&mock_server, vec![record]).await;

    let selection = desk.open("apt-2").await.unwrap();

    // Existing confirmation values win over the requested date
    assert_eq!(selection.draft.confirmation_date, "2024-06-03");
    assert_eq!(selection.draft.confirmation_time, "14:00");
    assert_eq!(selection.draft.cost, "50");
}

#[tokio::test]
async fn test_reopening_discards_unsaved_edits() {
    let mock_server = MockServer::start().await;
    mount_admin_auth(&mock_server).await;

    let record = record_from(MockStoreResponses::pending_appointment(
        "apt-1",
        "María Pérez",
        "2024-06-01",
    ));
    let desk = desk_with_records(&mock_server, vec![record]).await;

    desk.open("apt-1").await.unwrap();
    desk.edit_draft(DraftUpdate {
        confirmation_time: Some("14:00".to_string()),
        ..Default::default()
    })
    .await
    .unwrap();

    let reopened = desk.open("apt-1").await.unwrap();
    assert!(reopened.draft.confirmation_time.is_empty());
}

#[tokio::test]
async fn test_edit_draft_without_selection_is_rejected() {
    let mock_server = MockServer::start().await;
    mount_admin_auth(&mock_server).await;

    let desk = desk_with_records(&mock_server, vec![]).await;
    let result = desk
        .edit_draft(DraftUpdate {
            cost: Some("50.00".to_string()),
            ..Default::default()
        })
        .await;

    assert_matches!(result, Err(AppointmentError::NoSelection));
}

#[tokio::test]
async fn test_confirm_with_incomplete_draft_never_calls_store() {
    let mock_server = MockServer::start().await;
    mount_admin_auth(&mock_server).await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&mock_server)
        .await;

    let record = record_from(MockStoreResponses::pending_appointment(
        "apt-1",
        "María Pérez",
        "2024-06-01",
    ));
    let desk = desk_with_records(&mock_server, vec![record]).await;

    desk.open("apt-1").await.unwrap();
    // Prefill leaves time and cost empty for a pending record
    let result = desk.confirm().await;

    assert_matches!(
        result,
        Err(AppointmentError::ValidationError(message)) => {
            assert_eq!(message, CONFIRMATION_FIELDS_MESSAGE);
        }
    );

    // The dialog stays open so the admin can finish the draft
    assert!(desk.current().await.is_some());
}

#[tokio::test]
async fn test_confirm_writes_decision_and_closes_selection() {
    let mock_server = MockServer::start().await;
    mount_admin_auth(&mock_server).await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", "eq.apt-1"))
        .and(query_param("app_id", "eq.salon-test"))
        .and(body_partial_json(serde_json::json!({
            "status": "CONFIRMED",
            "confirmation_date": "2024-06-03",
            "confirmation_time": "14:00",
            "cost": 50.0
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let record = record_from(MockStoreResponses::pending_appointment(
        "apt-1",
        "María Pérez",
        "2024-06-01",
    ));
    let desk = desk_with_records(&mock_server, vec![record]).await;

    desk.open("apt-1").await.unwrap();
    desk.edit_draft(DraftUpdate {
        confirmation_date: Some("2024-06-03".to_string()),
        confirmation_time: Some("14:00".to_string()),
        cost: Some("50.00".to_string()),
        ..Default::default()
    })
    .await
    .unwrap();

    let result = desk.confirm().await;

    assert!(result.is_ok(), "Expected confirm to succeed, got: {:?}", result.err());
    assert_eq!(result.unwrap(), "apt-1");
    assert!(desk.current().await.is_none());
}

#[tokio::test]
async fn test_confirm_with_unparseable_cost_is_rejected() {
    let mock_server = MockServer::start().await;
    mount_admin_auth(&mock_server).await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&mock_server)
        .await;

    let record = record_from(MockStoreResponses::pending_appointment(
        "apt-1",
        "María Pérez",
        "2024-06-01",
    ));
    let desk = desk_with_records(&mock_server, vec![record]).await;

    desk.open("apt-1").await.unwrap();
    desk.edit_draft(DraftUpdate {
        confirmation_time: Some("14:00".to_string()),
        cost: Some("abc".to_string()),
        ..Default::default()
    })
    .await
    .unwrap();

    let result = desk.confirm().await;
    assert_matches!(result, Err(AppointmentError::InvalidCost(value)) => {
        assert_eq!(value, "abc");
    });

    // Still open; a corrected but negative cost is rejected the same way
    desk.edit_draft(DraftUpdate {
        cost: Some("-1".to_string()),
        ..Default::default()
    })
    .await
    .unwrap();

    let result = desk.confirm().await;
    assert_matches!(result, Err(AppointmentError::InvalidCost(_)));
}

#[tokio::test]
async fn test_reject_clears_confirmation_and_uses_default_note() {
    let mock_server = MockServer::start().await;
    mount_admin_auth(&mock_server).await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", "eq.apt-1"))
        .and(body_partial_json(serde_json::json!({
            "status": "REJECTED",
            "confirmation_date": "",
            "confirmation_time": "",
            "cost": null,
            "notes": DEFAULT_REJECTION_NOTE
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let record = record_from(MockStoreResponses::pending_appointment(
        "apt-1",
        "María Pérez",
        "2024-06-01",
    ));
    let desk = desk_with_records(&mock_server, vec![record]).await;

    desk.open("apt-1").await.unwrap();
    let result = desk.reject().await;

    assert!(result.is_ok(), "Expected reject to succeed, got: {:?}", result.err());
    assert!(desk.current().await.is_none());
}

#[tokio::test]
async fn test_reject_keeps_admin_notes_when_present() {
    let mock_server = MockServer::start().await;
    mount_admin_auth(&mock_server).await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(serde_json::json!({
            "status": "REJECTED",
            "notes": "Llamar para reagendar"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let record = record_from(MockStoreResponses::pending_appointment(
        "apt-1",
        "María Pérez",
        "2024-06-01",
    ));
    let desk = desk_with_records(&mock_server, vec![record]).await;

    desk.open("apt-1").await.unwrap();
    desk.edit_draft(DraftUpdate {
        notes: Some("Llamar para reagendar".to_string()),
        ..Default::default()
    })
    .await
    .unwrap();

    let result = desk.reject().await;
    assert!(result.is_ok(), "Expected reject to succeed, got: {:?}", result.err());
}

#[tokio::test]
async fn test_store_failure_keeps_selection_open() {
    let mock_server = MockServer::start().await;
    mount_admin_auth(&mock_server).await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(MockStoreResponses::error_response("boom", "500")),
        )
        .mount(&mock_server)
        .await;

    let record = record_from(MockStoreResponses::pending_appointment(
        "apt-1",
        "María Pérez",
        "2024-06-01",
    ));
    let desk = desk_with_records(&mock_server, vec![record]).await;

    desk.open("apt-1").await.unwrap();
    desk.edit_draft(DraftUpdate {
        confirmation_time: Some("14:00".to_string()),
        cost: Some("50.00".to_string()),
        ..Default::default()
    })
    .await
    .unwrap();

    let result = desk.confirm().await;
    assert_matches!(result, Err(AppointmentError::StoreError(_)));

    // Selection and draft survive so the admin can retry
    let selection = desk.current().await.unwrap();
    assert_eq!(selection.draft.cost, "50.00");
}

#[tokio::test]
async fn test_close_discards_selection_without_writing() {
    let mock_server = MockServer::start().await;
    mount_admin_auth(&mock_server).await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&mock_server)
        .await;

    let record = record_from(MockStoreResponses::pending_appointment(
        "apt-1",
        "María Pérez",
        "2024-06-01",
    ));
    let desk = desk_with_records(&mock_server, vec![record]).await;

    desk.open("apt-1").await.unwrap();
    assert!(desk.close().await);
    assert!(desk.current().await.is_none());
    assert!(!desk.close().await);
}

// tests/workflow.rs
//
// Fluxo completo contra um Postgres real:
// DATABASE_URL=postgres://... cargo test -- --ignored

mod common;

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;

use common::RecordingNotifier;
use salesops_backend::{
    common::error::AppError,
    config::AppState,
    models::{
        line_item::LineItemPayload,
        purchase_order::{NewPurchaseOrder, OrderType, PurchaseOrderItemPayload},
        quotation::{CreateQuotationPayload, UpdateQuotationPayload},
        rfq::{CreateRfqPayload, RfqDetail, RfqItemPayload, UpdateRfqPayload},
        series::{CreateSeriesPayload, UpdateSeriesPayload},
        team::CreateTeamMemberPayload,
        work_order::{CreateWorkOrderPayload, UpdateWorkOrderPayload},
    },
};

fn state(pool: PgPool) -> (AppState, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    (common::state_with(pool, notifier.clone()), notifier)
}

async fn series(state: &AppState, name: &str, prefix: &str) -> i64 {
    let payload: CreateSeriesPayload =
        serde_json::from_value(json!({"series_name": name, "prefix": prefix})).unwrap();
    state.series_service.create(payload).await.unwrap().id
}

async fn rfq(state: &AppState, series_id: i64, extra: serde_json::Value) -> RfqDetail {
    let mut body = json!({"series": series_id, "company_name": "Acme Industrial"});
    if let (Some(body), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
        body.extend(extra.clone());
    }
    let payload: CreateRfqPayload = serde_json::from_value(body).unwrap();
    state.rfq_service.create(payload).await.unwrap()
}

async fn member(state: &AppState, name: &str, email: Option<&str>) -> i64 {
    let payload: CreateTeamMemberPayload = serde_json::from_value(json!({
        "name": name,
        "designation": "Sales Engineer",
        "email": email,
    }))
    .unwrap();
    state.team_service.create(payload).await.unwrap().id
}

fn priced_item(name: &str, quantity: i32, unit_price: i64) -> LineItemPayload {
    LineItemPayload {
        item_name: Some(name.to_string()),
        quantity: Some(quantity),
        unit_price: Some(Decimal::new(unit_price, 0)),
        ..Default::default()
    }
}

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn concurrent_rfqs_never_share_a_number(pool: PgPool) {
    let (state, _) = state(pool);
    let series_id = series(&state, "RFQ 2025", "RFQ").await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let state = state.clone();
        handles.push(tokio::spawn(async move { rfq(&state, series_id, json!({})).await }));
    }

    let mut numbers = Vec::new();
    for handle in handles {
        numbers.push(handle.await.unwrap().rfq.rfq_no.unwrap());
    }
    numbers.sort();
    numbers.dedup();
    assert_eq!(numbers.len(), 8);
    assert_eq!(state.series_service.get(series_id).await.unwrap().current_sequence, 8);
}

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn quotation_requires_a_completed_rfq(pool: PgPool) {
    let (state, _) = state(pool.clone());
    let series_id = series(&state, "RFQ", "RFQ").await;
    let open = rfq(&state, series_id, json!({"current_status": "Processing"})).await;

    let result = state
        .quotation_service
        .create(CreateQuotationPayload { rfq: open.rfq.id, ..Default::default() })
        .await;

    assert!(matches!(result, Err(AppError::FieldValidation(ref e)) if e.contains_key("rfq")));
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotations")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn deleting_an_rfq_renumbers_its_series(pool: PgPool) {
    let (state, _) = state(pool);
    let series_id = series(&state, "Work", "WO").await;

    let mut ids = Vec::new();
    for _ in 0..4 {
        ids.push(rfq(&state, series_id, json!({})).await.rfq.id);
    }

    state.rfq_service.delete(ids[1]).await.unwrap();

    let mut numbers = Vec::new();
    for id in [ids[0], ids[2], ids[3]] {
        numbers.push(state.rfq_service.get(id).await.unwrap().rfq.rfq_no.unwrap());
    }
    assert_eq!(numbers, ["WO-0000001", "WO-0000002", "WO-0000003"]);
    assert_eq!(state.series_service.get(series_id).await.unwrap().current_sequence, 3);
}

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn quotation_items_are_diffed_by_id(pool: PgPool) {
    let (state, _) = state(pool);
    let series_id = series(&state, "RFQ", "RFQ").await;
    let done = rfq(&state, series_id, json!({"current_status": "Completed"})).await;

    let created = state
        .quotation_service
        .create(CreateQuotationPayload {
            rfq: done.rfq.id,
            items: vec![priced_item("Gauge", 2, 10)],
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(created.items.len(), 1);
    assert_eq!(created.items[0].total_price, Decimal::new(20, 0));
    let original_id = created.items[0].id;

    let mut kept = priced_item("Gauge", 5, 10);
    kept.id = Some(original_id);
    let updated = state
        .quotation_service
        .update(
            created.quotation.id,
            UpdateQuotationPayload {
                items: Some(vec![kept, priced_item("Probe", 1, 3)]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.items.len(), 2);
    let same = updated.items.iter().find(|i| i.id == original_id).unwrap();
    assert_eq!(same.quantity, Some(5));
    assert_eq!(same.total_price, Decimal::new(50, 0));
    assert_eq!(updated.items.iter().filter(|i| i.id != original_id).count(), 1);
}

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn assignment_needs_an_email_and_notifies_twice(pool: PgPool) {
    let (state, notifier) = state(pool.clone());
    let series_id = series(&state, "RFQ", "RFQ").await;

    let silent = member(&state, "Ravi Menon", None).await;
    let payload: CreateRfqPayload = serde_json::from_value(json!({
        "series": series_id,
        "company_name": "Acme Industrial",
        "assign_to": silent,
    }))
    .unwrap();
    let rejected = state.rfq_service.create(payload).await;
    assert!(matches!(rejected, Err(AppError::FieldValidation(ref e)) if e.contains_key("assign_to")));

    let reachable = member(&state, "Anita Rao", Some("anita@example.com")).await;
    let created = rfq(&state, series_id, json!({"assign_to": reachable})).await;
    assert_eq!(created.email_sent, Some(true));
    assert_eq!(notifier.attempts(), 2);

    // Notificador fora do ar: a RFQ é gravada e email_sent vem falso
    let failing = Arc::new(RecordingNotifier::failing());
    let offline = common::state_with(pool, failing.clone());
    let created = rfq(&offline, series_id, json!({"assign_to": reachable})).await;
    assert_eq!(created.email_sent, Some(false));
    assert!(created.rfq.rfq_no.is_some());
    assert_eq!(failing.attempts(), 2);
}

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn purchase_order_with_zero_quantity_persists_nothing(pool: PgPool) {
    let (state, _) = state(pool.clone());
    let series_id = series(&state, "RFQ", "RFQ").await;
    let done = rfq(&state, series_id, json!({"current_status": "Completed"})).await;
    let quotation = state
        .quotation_service
        .create(CreateQuotationPayload {
            rfq: done.rfq.id,
            items: vec![priced_item("Gauge", 2, 10)],
            ..Default::default()
        })
        .await
        .unwrap();

    let result = state
        .purchase_order_service
        .create(NewPurchaseOrder {
            quotation: quotation.quotation.id,
            client_po_number: "PO/118".to_string(),
            order_type: OrderType::Full,
            items: vec![PurchaseOrderItemPayload {
                quotation_item: None,
                item: priced_item("Gauge", 0, 10),
            }],
            po_file: None,
        })
        .await;
    assert!(matches!(result, Err(AppError::FieldValidation(_))));

    let (orders, items): (i64, i64) = sqlx::query_as(
        "SELECT (SELECT COUNT(*) FROM purchase_orders), (SELECT COUNT(*) FROM purchase_order_items)",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!((orders, items), (0, 0));
    assert_eq!(
        state.quotation_service.get(quotation.quotation.id).await.unwrap().quotation.current_status,
        "Pending"
    );
}

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn rfq_update_copies_contact_and_items_to_its_quotation(pool: PgPool) {
    let (state, _) = state(pool);
    let series_id = series(&state, "RFQ", "RFQ").await;
    let done = rfq(
        &state,
        series_id,
        json!({
            "current_status": "Completed",
            "items": [{"item_name": "Gauge", "quantity": 2, "unit_price": 10}],
        }),
    )
    .await;

    let quotation = state
        .quotation_service
        .create(CreateQuotationPayload { rfq: done.rfq.id, ..Default::default() })
        .await
        .unwrap();
    assert_eq!(quotation.items.len(), 1);
    assert_eq!(quotation.items[0].total_price, Decimal::new(20, 0));

    // Itens sem preço vêm da RFQ como estão, com total zero
    let payload: UpdateRfqPayload = serde_json::from_value(json!({
        "company_name": "Globex Metrology",
        "attention_name": "Priya Nair",
        "items": [
            {"item_name": "Valve", "quantity": 3, "unit_price": 4},
            {"item_name": "Cable"},
        ],
    }))
    .unwrap();
    state.rfq_service.update(done.rfq.id, payload).await.unwrap();

    let synced = state.quotation_service.get(quotation.quotation.id).await.unwrap();
    assert_eq!(synced.quotation.company_name.as_deref(), Some("Globex Metrology"));
    assert_eq!(synced.quotation.attention_name.as_deref(), Some("Priya Nair"));

    let names: Vec<_> = synced.items.iter().map(|i| i.item_name.as_deref().unwrap()).collect();
    assert_eq!(names, ["Valve", "Cable"]);
    assert_eq!(synced.items[0].total_price, Decimal::new(12, 0));
    assert_eq!(synced.items[1].unit_price, None);
    assert_eq!(synced.items[1].total_price, Decimal::ZERO);
}

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn work_order_inherits_the_rfq_assignee(pool: PgPool) {
    let (state, _) = state(pool);
    let series_id = series(&state, "RFQ", "RFQ").await;
    let owner = member(&state, "Anita Rao", Some("anita@example.com")).await;
    let other = member(&state, "Ravi Menon", None).await;
    let done = rfq(&state, series_id, json!({"current_status": "Completed", "assign_to": owner})).await;
    let quotation = state
        .quotation_service
        .create(CreateQuotationPayload {
            rfq: done.rfq.id,
            items: vec![priced_item("Gauge", 1, 10)],
            ..Default::default()
        })
        .await
        .unwrap();

    let listed = state.quotation_service.list(None).await.unwrap();
    let summary = listed[0].rfq_details.as_ref().unwrap();
    assert_eq!(summary.rfq_no, done.rfq.rfq_no);
    assert_eq!(summary.assign_to_name.as_deref(), Some("Anita Rao"));

    let payload: CreateWorkOrderPayload = serde_json::from_value(json!({
        "quotation": quotation.quotation.id,
        "date_received": "2025-06-02",
        "items": [{"item_name": "Gauge", "quantity": 1}],
    }))
    .unwrap();
    let created = state.work_order_service.create(payload).await.unwrap();
    assert_eq!(created.work_order.assigned_to, Some(owner));
    assert_eq!(created.assigned_to_name.as_deref(), Some("Anita Rao"));

    let reassigned: UpdateWorkOrderPayload = serde_json::from_value(json!({"assigned_to": other})).unwrap();
    let updated = state.work_order_service.update(created.work_order.id, reassigned).await.unwrap();
    assert_eq!(updated.work_order.assigned_to, Some(other));

    // null limpa o responsável e ele volta a ser o da RFQ
    let cleared: UpdateWorkOrderPayload = serde_json::from_value(json!({"assigned_to": null})).unwrap();
    let updated = state.work_order_service.update(created.work_order.id, cleared).await.unwrap();
    assert_eq!(updated.work_order.assigned_to, Some(owner));
}

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn series_sequence_cannot_be_rewound(pool: PgPool) {
    let (state, _) = state(pool);
    let series_id = series(&state, "RFQ", "RFQ").await;
    for _ in 0..3 {
        rfq(&state, series_id, json!({})).await;
    }

    let rewind = UpdateSeriesPayload { current_sequence: Some(0), ..Default::default() };
    let result = state.series_service.update(series_id, rewind).await;
    assert!(matches!(result, Err(AppError::FieldValidation(ref e)) if e.contains_key("current_sequence")));
    assert_eq!(state.series_service.get(series_id).await.unwrap().current_sequence, 3);

    let skip = UpdateSeriesPayload { current_sequence: Some(10), ..Default::default() };
    state.series_service.update(series_id, skip).await.unwrap();
    let next = rfq(&state, series_id, json!({})).await;
    assert_eq!(next.rfq.rfq_no.as_deref(), Some("RFQ-0000011"));
}

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn colliding_rfq_number_is_reported_on_series(pool: PgPool) {
    let (state, _) = state(pool.clone());
    let old = series(&state, "Legacy", "QA").await;
    rfq(&state, old, json!({})).await;

    // O prefixo antigo fica livre e uma nova série passa a gerar QA-0000001 de novo
    let renamed = UpdateSeriesPayload { prefix: Some("QB".into()), ..Default::default() };
    state.series_service.update(old, renamed).await.unwrap();
    let fresh = series(&state, "Fresh", "QA").await;

    let payload: CreateRfqPayload =
        serde_json::from_value(json!({"series": fresh, "company_name": "Acme Industrial"})).unwrap();
    let result = state.rfq_service.create(payload).await;
    assert!(matches!(result, Err(AppError::FieldValidation(ref e)) if e.contains_key("series")));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rfqs").fetch_one(&pool).await.unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn moving_an_rfq_item_to_a_missing_rfq_is_a_validation_error(pool: PgPool) {
    let (state, _) = state(pool);
    let series_id = series(&state, "RFQ", "RFQ").await;
    let open = rfq(&state, series_id, json!({})).await;

    let item = state
        .rfq_service
        .create_item(RfqItemPayload { rfq: open.rfq.id, item: priced_item("Gauge", 1, 10) })
        .await
        .unwrap();

    let result = state
        .rfq_service
        .update_item(item.id, RfqItemPayload { rfq: 999_999, item: priced_item("Gauge", 2, 10) })
        .await;
    assert!(matches!(result, Err(AppError::FieldValidation(ref e)) if e.contains_key("rfq")));
    assert_eq!(state.rfq_service.get_item(item.id).await.unwrap().quantity, Some(1));
}

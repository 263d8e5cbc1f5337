use actix_web::{http::StatusCode, web};
use chrono::Utc;
use stripe_tools::{webhook::sign_payload, StripeConfig};
use wax_common::Secret;
use waxline_engine::{db_types::OrderStatus, events::EventProducers, OrderFlowApi};

use super::{
    helpers::{pending_order, post_raw},
    mocks::MockOrderDb,
};
use crate::stripe_routes::StripeWebhookRoute;

const WEBHOOK_SECRET: &str = "whsec_endpoint_test";

fn stripe_config() -> StripeConfig {
    StripeConfig {
        api_url: "http://127.0.0.1:9".to_string(),
        secret_key: Secret::new("sk_test".to_string()),
        webhook_secret: Secret::new(WEBHOOK_SECRET.to_string()),
    }
}

fn event_body(event_type: &str, order_id: Option<&str>) -> String {
    let metadata = match order_id {
        Some(id) => format!(r#"{{"orderId":"{id}"}}"#),
        None => "{}".to_string(),
    };
    format!(r#"{{"id":"evt_1","type":"{event_type}","data":{{"object":{{"id":"cs_1","metadata":{metadata}}}}}}}"#)
}

fn signed_headers(body: &str) -> Vec<(&'static str, String)> {
    let timestamp = Utc::now().timestamp();
    let signature = sign_payload(&Secret::new(WEBHOOK_SECRET.to_string()), timestamp, body.as_bytes());
    vec![("Stripe-Signature", format!("t={timestamp},v1={signature}"))]
}

fn webhook_service(db: MockOrderDb) -> impl FnOnce(&mut actix_web::web::ServiceConfig) {
    move |cfg| {
        let api = OrderFlowApi::new(db, EventProducers::default());
        cfg.service(StripeWebhookRoute::<MockOrderDb>::new())
            .app_data(web::Data::new(api))
            .app_data(web::Data::new(stripe_config()));
    }
}

#[actix_web::test]
async fn verified_settlement_marks_the_order_paid() {
    let _ = env_logger::try_init().ok();
    let mut db = MockOrderDb::new();
    db.expect_fetch_order_by_id().returning(|id| Ok(Some(pending_order(id.as_str(), "cust-1"))));
    db.expect_update_order_status()
        .withf(|id, status| id.as_str() == "order-1" && *status == OrderStatus::Paid)
        .returning(|id, status| {
            let mut order = pending_order(id.as_str(), "cust-1");
            order.status = status;
            Ok(order)
        })
        .times(1);

    let body = event_body("checkout.session.completed", Some("order-1"));
    let headers = signed_headers(&body);
    let (status, response) = post_raw("/webhook", body.into_bytes(), headers, webhook_service(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, r#"{"received":true}"#);
}

#[actix_web::test]
async fn verified_failure_marks_the_order_failed() {
    let _ = env_logger::try_init().ok();
    let mut db = MockOrderDb::new();
    db.expect_fetch_order_by_id().returning(|id| Ok(Some(pending_order(id.as_str(), "cust-1"))));
    db.expect_update_order_status()
        .withf(|id, status| id.as_str() == "order-2" && *status == OrderStatus::Failed)
        .returning(|id, status| {
            let mut order = pending_order(id.as_str(), "cust-1");
            order.status = status;
            Ok(order)
        })
        .times(1);

    let body = event_body("payment_intent.payment_failed", Some("order-2"));
    let headers = signed_headers(&body);
    let (status, response) = post_raw("/webhook", body.into_bytes(), headers, webhook_service(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, r#"{"received":true}"#);
}

#[actix_web::test]
async fn forged_delivery_never_reaches_the_state_machine() {
    let _ = env_logger::try_init().ok();
    let mut db = MockOrderDb::new();
    db.expect_fetch_order_by_id().never();
    db.expect_update_order_status().never();

    let body = event_body("checkout.session.completed", Some("order-1"));
    let timestamp = Utc::now().timestamp();
    let headers = vec![("Stripe-Signature", format!("t={timestamp},v1=deadbeef"))];
    let (status, response) = post_raw("/webhook", body.into_bytes(), headers, webhook_service(db)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response.contains("verification"));
}

#[actix_web::test]
async fn missing_signature_header_is_rejected() {
    let _ = env_logger::try_init().ok();
    let mut db = MockOrderDb::new();
    db.expect_fetch_order_by_id().never();
    db.expect_update_order_status().never();

    let body = event_body("checkout.session.completed", Some("order-1"));
    let (status, _) = post_raw("/webhook", body.into_bytes(), vec![], webhook_service(db)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn unknown_event_type_is_acknowledged_without_action() {
    let _ = env_logger::try_init().ok();
    let mut db = MockOrderDb::new();
    db.expect_fetch_order_by_id().never();
    db.expect_update_order_status().never();

    let body = event_body("customer.subscription.updated", None);
    let headers = signed_headers(&body);
    let (status, response) = post_raw("/webhook", body.into_bytes(), headers, webhook_service(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, r#"{"received":true}"#);
}

#[actix_web::test]
async fn settlement_without_order_id_fails_closed() {
    let _ = env_logger::try_init().ok();
    let mut db = MockOrderDb::new();
    db.expect_fetch_order_by_id().never();
    db.expect_update_order_status().never();

    let body = event_body("checkout.session.completed", None);
    let headers = signed_headers(&body);
    let (status, _) = post_raw("/webhook", body.into_bytes(), headers, webhook_service(db)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn settlement_for_unknown_order_provokes_redelivery() {
    let _ = env_logger::try_init().ok();
    let mut db = MockOrderDb::new();
    db.expect_fetch_order_by_id().returning(|_| Ok(None));
    db.expect_update_order_status().never();

    let body = event_body("checkout.session.completed", Some("ghost"));
    let headers = signed_headers(&body);
    let (status, _) = post_raw("/webhook", body.into_bytes(), headers, webhook_service(db)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

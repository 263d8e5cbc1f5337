use actix_web::{http::StatusCode, web};
use serde_json::{json, Value};
use stripe_tools::StripeApi;
use wax_common::Secret;
use waxline_engine::{
    db_types::OrderStatus,
    events::EventProducers,
    traits::OrderScope,
    OrderFlowApi,
};

use super::{
    helpers::{get_request, pending_order, post_json},
    mocks::MockOrderDb,
};
use crate::{
    config::CheckoutUrls,
    routes::{AllOrdersRoute, CreateOrderRoute, CustomerOrdersRoute, OrderByIdRoute, ReattemptCheckoutRoute},
};

fn stripe_api() -> StripeApi {
    // Points at a closed port: these tests must never reach the provider, and would fail with a
    // gateway error if they did.
    let config = stripe_tools::StripeConfig {
        api_url: "http://127.0.0.1:9".to_string(),
        secret_key: Secret::new("sk_test".to_string()),
        webhook_secret: Secret::new("whsec_test".to_string()),
    };
    StripeApi::new(config).expect("client construction cannot fail with a valid key")
}

fn orders_service(db: MockOrderDb) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let api = OrderFlowApi::new(db, EventProducers::default());
        cfg.service(CreateOrderRoute::<MockOrderDb>::new())
            .service(CustomerOrdersRoute::<MockOrderDb>::new())
            .service(AllOrdersRoute::<MockOrderDb>::new())
            .service(OrderByIdRoute::<MockOrderDb>::new())
            .service(ReattemptCheckoutRoute::<MockOrderDb>::new())
            .app_data(web::Data::new(api))
            .app_data(web::Data::new(stripe_api()))
            .app_data(web::Data::new(CheckoutUrls::default()));
    }
}

#[actix_web::test]
async fn customer_orders_are_scoped_and_newest_first() {
    let _ = env_logger::try_init().ok();
    let mut db = MockOrderDb::new();
    db.expect_fetch_orders()
        .withf(|scope| *scope == OrderScope::Customer("cust-1".to_string()))
        .returning(|_| Ok(vec![pending_order("order-2", "cust-1"), pending_order("order-1", "cust-1")]))
        .times(1);

    let (status, body) = get_request("/orders/customer/cust-1", orders_service(db)).await;
    assert_eq!(status, StatusCode::OK);
    let orders: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(orders.as_array().unwrap().len(), 2);
    assert_eq!(orders[0]["order_id"], "order-2");
    assert_eq!(orders[1]["order_id"], "order-1");
}

#[actix_web::test]
async fn listing_every_order_uses_the_explicit_admin_scope() {
    let _ = env_logger::try_init().ok();
    let mut db = MockOrderDb::new();
    db.expect_fetch_orders()
        .withf(|scope| *scope == OrderScope::All)
        .returning(|_| {
            Ok(vec![
                pending_order("order-3", "cust-2"),
                pending_order("order-2", "cust-1"),
                pending_order("order-1", "cust-1"),
            ])
        })
        .times(1);

    let (status, body) = get_request("/orders", orders_service(db)).await;
    assert_eq!(status, StatusCode::OK);
    let orders: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(orders.as_array().unwrap().len(), 3);
}

#[actix_web::test]
async fn missing_order_is_not_found() {
    let _ = env_logger::try_init().ok();
    let mut db = MockOrderDb::new();
    db.expect_fetch_order_by_id().returning(|_| Ok(None));

    let (status, _) = get_request("/order/ghost", orders_service(db)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn settled_order_checkout_is_refused_before_the_provider_is_called() {
    let _ = env_logger::try_init().ok();
    let mut db = MockOrderDb::new();
    db.expect_fetch_order_by_id().returning(|id| {
        let mut order = pending_order(id.as_str(), "cust-1");
        order.status = OrderStatus::Paid;
        Ok(Some(order))
    });
    db.expect_fetch_listing().never();
    db.expect_set_checkout_session().never();

    let (status, body) = post_json("/order/order-1/checkout", json!({}), orders_service(db)).await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert!(body.contains("pending"));
}

#[actix_web::test]
async fn failed_order_checkout_is_refused_too() {
    let _ = env_logger::try_init().ok();
    let mut db = MockOrderDb::new();
    db.expect_fetch_order_by_id().returning(|id| {
        let mut order = pending_order(id.as_str(), "cust-1");
        order.status = OrderStatus::Failed;
        Ok(Some(order))
    });
    db.expect_fetch_listing().never();
    db.expect_set_checkout_session().never();

    let (status, _) = post_json("/order/order-1/checkout", json!({}), orders_service(db)).await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
}

#[actix_web::test]
async fn order_creation_with_unknown_listing_is_all_or_nothing() {
    let _ = env_logger::try_init().ok();
    let mut db = MockOrderDb::new();
    db.expect_fetch_listing().returning(|_| Ok(None));
    db.expect_insert_order().never();
    db.expect_set_checkout_session().never();

    let request = json!({ "customer_id": "cust-1", "listing_ids": ["ghost"] });
    let (status, _) = post_json("/orders", request, orders_service(db)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

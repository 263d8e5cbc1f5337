use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use chrono::{TimeZone, Utc};
use wax_common::Cents;
use waxline_engine::db_types::{LineItem, Order, OrderId, OrderStatus};

/// A one-line-item pending order with fixed timestamps, for mock responses.
pub fn pending_order(order_id: &str, customer_id: &str) -> Order {
    Order {
        order_id: OrderId(order_id.to_string()),
        customer_id: customer_id.to_string(),
        items: vec![LineItem { id: 1, listing_id: "listing-a".into(), unit_price: Cents::from(1000) }],
        total_amount: Cents::from(1000),
        currency: "USD".to_string(),
        status: OrderStatus::Pending,
        checkout_session_id: None,
        created_at: Utc.with_ymd_and_hms(2024, 2, 29, 13, 30, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 2, 29, 13, 30, 0).unwrap(),
    }
}

pub async fn get_request<F>(path: &str, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let req = TestRequest::get().uri(path).to_request();
    let service = test::init_service(App::new().configure(configure)).await;
    let res = test::call_service(&service, req).await;
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}

pub async fn post_json<F>(path: &str, json: serde_json::Value, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let req = TestRequest::post().uri(path).set_json(&json).to_request();
    let service = test::init_service(App::new().configure(configure)).await;
    let res = test::call_service(&service, req).await;
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}

pub async fn post_raw<F>(
    path: &str,
    body: Vec<u8>,
    headers: Vec<(&'static str, String)>,
    configure: F,
) -> (StatusCode, String)
where
    F: FnOnce(&mut ServiceConfig),
{
    let mut req = TestRequest::post().uri(path).set_payload(body);
    for (name, value) in headers {
        req = req.insert_header((name, value));
    }
    let service = test::init_service(App::new().configure(configure)).await;
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}

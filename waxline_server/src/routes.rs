//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module
//! neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the
//! current thread will cause the current worker to stop processing new requests. For this
//! reason, any long, non-cpu-bound operation (e.g. I/O, database operations, etc.) should be
//! expressed as futures or asynchronous functions, which get executed concurrently by the
//! worker threads.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use waxline_engine::{
    db_types::OrderId,
    traits::{CatalogLookup, OrderDatabase, OrderScope},
    OrderFlowApi,
};

use crate::{
    checkout::open_checkout_session,
    config::CheckoutUrls,
    data_objects::{CheckoutResponse, NewOrderRequest},
    errors::ServerError,
};

// Actix cannot register generic handlers directly, so each one is wrapped in a unit struct
// implementing `HttpServiceFactory` via the `route!` macro. The single generic parameter is the
// storage backend; it must satisfy every trait listed after `impl`.
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<B>(core::marker::PhantomData<fn() -> B>);}
        paste::paste! { impl<B> [<$name:camel Route>]<B> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> B>)
            }
        }}
        paste::paste! { impl<B> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<B>
        where
            B: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<B>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(create_order => Post "/orders" impl OrderDatabase, CatalogLookup);
/// Creates a new order for the requested listings and immediately opens a checkout session for
/// it, returning the provider's redirect URL. If the session cannot be opened, the order stays
/// pending and the checkout can be re-attempted.
pub async fn create_order<B>(
    body: web::Json<NewOrderRequest>,
    api: web::Data<OrderFlowApi<B>>,
    stripe: web::Data<stripe_tools::StripeApi>,
    urls: web::Data<CheckoutUrls>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderDatabase + CatalogLookup,
{
    let request = body.into_inner();
    debug!("📦️ New order request from customer {} for {} listing(s)", request.customer_id, request.listing_ids.len());
    let order = api.create_order(&request.customer_id, &request.listing_ids).await?;
    let redirect_url = open_checkout_session(api.get_ref(), stripe.get_ref(), urls.get_ref(), &order).await?;
    Ok(HttpResponse::Ok().json(CheckoutResponse { order_id: order.order_id, redirect_url }))
}

route!(customer_orders => Get "/orders/customer/{customer_id}" impl OrderDatabase);
/// Lists one customer's orders, newest first.
pub async fn customer_orders<B>(
    path: web::Path<String>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderDatabase,
{
    let customer_id = path.into_inner();
    trace!("📦️ GET orders for customer {customer_id}");
    let orders = api.fetch_orders(OrderScope::Customer(customer_id)).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(all_orders => Get "/orders" impl OrderDatabase);
/// Lists every order in the store, regardless of owner. This is the administrative surface:
/// the privilege check happens in whatever gateway fronts this deployment, and the scope
/// escalation is spelled out here rather than inferred from a missing parameter.
pub async fn all_orders<B>(api: web::Data<OrderFlowApi<B>>) -> Result<HttpResponse, ServerError>
where B: OrderDatabase {
    trace!("📦️ GET all orders (administrative scope)");
    let orders = api.fetch_orders(OrderScope::All).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(order_by_id => Get "/order/{order_id}" impl OrderDatabase);
pub async fn order_by_id<B>(path: web::Path<String>, api: web::Data<OrderFlowApi<B>>) -> Result<HttpResponse, ServerError>
where B: OrderDatabase {
    let order_id = OrderId(path.into_inner());
    let order = api
        .fetch_order(&order_id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Order {order_id} does not exist")))?;
    Ok(HttpResponse::Ok().json(order))
}

route!(reattempt_checkout => Post "/order/{order_id}/checkout" impl OrderDatabase, CatalogLookup);
/// Re-attempts payment for a still-pending order by opening a fresh checkout session. The new
/// session id overwrites the previous one; an already-settled order is refused before the
/// provider is ever contacted.
pub async fn reattempt_checkout<B>(
    path: web::Path<String>,
    api: web::Data<OrderFlowApi<B>>,
    stripe: web::Data<stripe_tools::StripeApi>,
    urls: web::Data<CheckoutUrls>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderDatabase + CatalogLookup,
{
    let order_id = OrderId(path.into_inner());
    let order = api
        .fetch_order(&order_id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Order {order_id} does not exist")))?;
    let redirect_url = open_checkout_session(api.get_ref(), stripe.get_ref(), urls.get_ref(), &order).await?;
    Ok(HttpResponse::Ok().json(CheckoutResponse { order_id: order.order_id, redirect_url }))
}

use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use stripe_tools::StripeApi;
use waxline_engine::{events::EventProducers, OrderFlowApi, SqliteDatabase};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::notifications::create_notification_event_handlers,
    routes::{health, AllOrdersRoute, CreateOrderRoute, CustomerOrdersRoute, OrderByIdRoute, ReattemptCheckoutRoute},
    stripe_routes::StripeWebhookRoute,
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    // The listener registry is assembled exactly once, before the server starts; the workers
    // only ever see cloned producer handles.
    let handlers = create_notification_event_handlers(&config.notifications, db.clone())?;
    let producers = handlers.producers();
    let _dispatchers = handlers.start_handlers().await;
    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let stripe_api = StripeApi::new(config.stripe.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(db.clone(), producers.clone());
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("waxline::access_log"))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(stripe_api.clone()))
            .app_data(web::Data::new(config.stripe.clone()))
            .app_data(web::Data::new(config.checkout.clone()));
        let stripe_scope = web::scope("/stripe").service(StripeWebhookRoute::<SqliteDatabase>::new());
        app.service(health)
            .service(CreateOrderRoute::<SqliteDatabase>::new())
            .service(CustomerOrdersRoute::<SqliteDatabase>::new())
            .service(AllOrdersRoute::<SqliteDatabase>::new())
            .service(OrderByIdRoute::<SqliteDatabase>::new())
            .service(ReattemptCheckoutRoute::<SqliteDatabase>::new())
            .service(stripe_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}

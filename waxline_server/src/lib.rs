//! # Waxline order server
//! This crate hosts the HTTP surface of the Waxline order backend. It is responsible for:
//! * accepting order-creation requests and handing back the provider's checkout redirect URL;
//! * listening for signed settlement webhooks from the payment provider and driving the order
//!   state machine with them;
//! * fanning settlement announcements out to the notification listeners, off the
//!   payment-critical path.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more
//! information.
//!
//! ## Routes
//! * `/health`: a health check route that returns a 200 OK response.
//! * `/orders` (POST): create an order and open a checkout session for it.
//! * `/orders/customer/{customer_id}`: the customer's orders, newest first.
//! * `/orders` (GET): every order in the store (administrative scope).
//! * `/order/{order_id}`: a single order.
//! * `/order/{order_id}/checkout`: re-attempt payment for a still-pending order.
//! * `/stripe/webhook`: the signed settlement webhook intake.
pub mod checkout;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;
pub mod stripe_routes;

#[cfg(test)]
mod endpoint_tests;

//! Waxline Order Engine
//!
//! The order engine owns the lifecycle of a checkout attempt for the Waxline marketplace: from
//! aggregate creation, through the external checkout session, to the settlement outcome that the
//! payment provider delivers asynchronously. It is provider-agnostic; everything Stripe-shaped
//! lives in the server and its integration crates.
//!
//! The library is divided into three main sections:
//! 1. Database management and control ([`mod@sqlite`] behind the `sqlite` feature). You should
//!    never need to access the database directly; use the public API instead. The exception is
//!    the data types, which are defined in the [`mod@db_types`] module and are public.
//! 2. The public API ([`OrderFlowApi`]). It creates order aggregates, records checkout sessions
//!    and applies settlement outcomes. Backends implement the traits in [`mod@traits`] in order
//!    to drive it.
//! 3. The event system ([`mod@events`]). When an order settles (or fails to), the engine
//!    publishes an event on a typed in-process registry so that side effects like notifications
//!    stay off the payment-critical path.
pub mod db_types;
pub mod events;
mod order_flow_api;
#[cfg(feature = "sqlite")]
mod sqlite;
pub mod traits;

pub use order_flow_api::{OrderFlowApi, OrderFlowError};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;

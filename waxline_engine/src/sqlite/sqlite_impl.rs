//! `SqliteDatabase` is the in-tree storage backend for the order engine.
//!
//! It implements the full trait family from the [`crate::traits`] module over a single SQLite
//! pool. Order mutations are single `UPDATE ... RETURNING` statements, so concurrent settlement
//! deliveries for one order collapse to whichever write lands last; the aggregate insert is the
//! one multi-statement operation and runs inside a transaction.
use std::fmt::Debug;

use sqlx::SqlitePool;

use super::db::{customers, listings, new_pool, orders};
use crate::{
    db_types::{CustomerContact, Listing, ListingId, NewOrder, Order, OrderId, OrderStatus},
    traits::{CatalogLookup, CustomerDirectory, OrderDatabase, OrderScope, OrderStoreError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, OrderStoreError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Seeds or updates a catalog row. Not part of the storage traits: the catalog is owned by
    /// another service, and this is only here for ops tooling and tests.
    pub async fn add_listing(&self, listing: &Listing) -> Result<(), OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        listings::upsert_listing(listing, &mut conn).await?;
        Ok(())
    }

    /// Seeds or updates a customer contact row. Same caveat as [`Self::add_listing`].
    pub async fn add_contact(&self, contact: &CustomerContact) -> Result<(), OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        customers::upsert_contact(contact, &mut conn).await?;
        Ok(())
    }

    pub async fn close(&mut self) {
        self.pool.close().await;
    }
}

impl OrderDatabase for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderStoreError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::insert_order(order, &mut tx).await?;
        tx.commit().await?;
        Ok(order)
    }

    async fn fetch_order_by_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_id(order_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_orders(&self, scope: OrderScope) -> Result<Vec<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_orders(scope, &mut conn).await?;
        Ok(orders)
    }

    async fn update_order_status(&self, order_id: &OrderId, status: OrderStatus) -> Result<Order, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::update_order_status(order_id, status, &mut conn).await
    }

    async fn set_checkout_session(
        &self,
        order_id: &OrderId,
        customer_id: &str,
        session_id: &str,
    ) -> Result<Order, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::set_checkout_session(order_id, customer_id, session_id, &mut conn).await
    }
}

impl CatalogLookup for SqliteDatabase {
    async fn fetch_listing(&self, id: &ListingId) -> Result<Option<Listing>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let listing = listings::fetch_listing(id, &mut conn).await?;
        Ok(listing)
    }
}

impl CustomerDirectory for SqliteDatabase {
    async fn fetch_contact(&self, customer_id: &str) -> Result<Option<CustomerContact>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let contact = customers::fetch_contact(customer_id, &mut conn).await?;
        Ok(contact)
    }
}

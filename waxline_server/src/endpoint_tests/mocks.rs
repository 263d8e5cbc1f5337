use mockall::mock;
use waxline_engine::{
    db_types::{Listing, ListingId, NewOrder, Order, OrderId, OrderStatus},
    traits::{CatalogLookup, OrderDatabase, OrderScope, OrderStoreError},
};

mock! {
    pub OrderDb {}
    impl OrderDatabase for OrderDb {
        async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderStoreError>;
        async fn fetch_order_by_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError>;
        async fn fetch_orders(&self, scope: OrderScope) -> Result<Vec<Order>, OrderStoreError>;
        async fn update_order_status(&self, order_id: &OrderId, status: OrderStatus) -> Result<Order, OrderStoreError>;
        async fn set_checkout_session(&self, order_id: &OrderId, customer_id: &str, session_id: &str) -> Result<Order, OrderStoreError>;
    }
    impl CatalogLookup for OrderDb {
        async fn fetch_listing(&self, id: &ListingId) -> Result<Option<Listing>, OrderStoreError>;
    }
}

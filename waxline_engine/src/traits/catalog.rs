use crate::{
    db_types::{Listing, ListingId},
    traits::OrderStoreError,
};

/// Read-only view of the catalog. Order creation resolves every requested listing through this
/// boundary to capture its current price; the catalog itself is managed elsewhere.
#[allow(async_fn_in_trait)]
pub trait CatalogLookup {
    async fn fetch_listing(&self, id: &ListingId) -> Result<Option<Listing>, OrderStoreError>;
}

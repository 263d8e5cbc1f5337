use crate::{db_types::CustomerContact, traits::OrderStoreError};

/// Lookup for an order owner's contact details. Notification listeners re-fetch these on every
/// event rather than having them embedded in event payloads.
#[allow(async_fn_in_trait)]
pub trait CustomerDirectory {
    async fn fetch_contact(&self, customer_id: &str) -> Result<Option<CustomerContact>, OrderStoreError>;
}

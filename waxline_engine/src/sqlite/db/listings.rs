use sqlx::SqliteConnection;

use crate::db_types::{Listing, ListingId};

pub async fn fetch_listing(id: &ListingId, conn: &mut SqliteConnection) -> Result<Option<Listing>, sqlx::Error> {
    sqlx::query_as("SELECT id, title, artist, unit_price, currency FROM listings WHERE id = $1")
        .bind(id.as_str())
        .fetch_optional(conn)
        .await
}

/// Inserts or replaces a catalog row. The catalog is owned by another service; this exists for
/// seeding and for tests.
pub async fn upsert_listing(listing: &Listing, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
            INSERT INTO listings (id, title, artist, unit_price, currency)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET title = $2, artist = $3, unit_price = $4, currency = $5, updated_at = CURRENT_TIMESTAMP;
        "#,
    )
    .bind(listing.id.as_str())
    .bind(&listing.title)
    .bind(&listing.artist)
    .bind(listing.unit_price)
    .bind(&listing.currency)
    .execute(conn)
    .await?;
    Ok(())
}

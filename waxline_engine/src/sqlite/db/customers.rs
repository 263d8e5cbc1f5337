use sqlx::SqliteConnection;

use crate::db_types::CustomerContact;

pub async fn fetch_contact(customer_id: &str, conn: &mut SqliteConnection) -> Result<Option<CustomerContact>, sqlx::Error> {
    sqlx::query_as("SELECT id, email, first_name FROM customers WHERE id = $1")
        .bind(customer_id)
        .fetch_optional(conn)
        .await
}

/// Inserts or replaces a contact row. Account management is owned by another service; this
/// exists for seeding and for tests.
pub async fn upsert_contact(contact: &CustomerContact, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
            INSERT INTO customers (id, email, first_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET email = $2, first_name = $3;
        "#,
    )
    .bind(&contact.customer_id)
    .bind(&contact.email)
    .bind(&contact.first_name)
    .execute(conn)
    .await?;
    Ok(())
}

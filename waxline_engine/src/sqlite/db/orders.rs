use chrono::{DateTime, Utc};
use log::{debug, trace};
use sqlx::{FromRow, SqliteConnection};
use wax_common::Cents;

use crate::{
    db_types::{LineItem, NewOrder, Order, OrderId, OrderStatus},
    traits::{OrderScope, OrderStoreError},
};

/// The flat `orders` row. Line items live in their own table and are stitched back on here
/// after every read.
#[derive(Debug, Clone, FromRow)]
struct OrderRow {
    order_id: OrderId,
    customer_id: String,
    total_amount: Cents,
    currency: String,
    status: OrderStatus,
    checkout_session_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<LineItem>) -> Order {
        Order {
            order_id: self.order_id,
            customer_id: self.customer_id,
            items,
            total_amount: self.total_amount,
            currency: self.currency,
            status: self.status,
            checkout_session_id: self.checkout_session_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Inserts the order row and all of its line items using the given connection. This is not
/// atomic on its own. Embed the call inside a transaction and pass `&mut *tx` as the connection
/// argument to get all-or-nothing behaviour.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, OrderStoreError> {
    let row: OrderRow = sqlx::query_as(
        r#"
            INSERT INTO orders (order_id, customer_id, total_amount, currency, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(order.order_id.clone())
    .bind(order.customer_id)
    .bind(order.total_amount)
    .bind(order.currency)
    .bind(OrderStatus::Pending.to_string())
    .fetch_one(&mut *conn)
    .await?;
    for item in order.items {
        sqlx::query("INSERT INTO order_items (order_id, listing_id, unit_price) VALUES ($1, $2, $3)")
            .bind(row.order_id.clone())
            .bind(item.listing_id)
            .bind(item.unit_price)
            .execute(&mut *conn)
            .await?;
    }
    let items = fetch_line_items(&row.order_id, conn).await?;
    debug!("📝️ Order [{}] inserted with {} line items", row.order_id, items.len());
    Ok(row.into_order(items))
}

pub async fn fetch_line_items(order_id: &OrderId, conn: &mut SqliteConnection) -> Result<Vec<LineItem>, sqlx::Error> {
    sqlx::query_as("SELECT id, listing_id, unit_price FROM order_items WHERE order_id = $1 ORDER BY id")
        .bind(order_id.as_str())
        .fetch_all(conn)
        .await
}

/// Returns the order with the given id, with its line items attached.
pub async fn fetch_order_by_id(order_id: &OrderId, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let row: Option<OrderRow> = sqlx::query_as("SELECT * FROM orders WHERE order_id = $1")
        .bind(order_id.as_str())
        .fetch_optional(&mut *conn)
        .await?;
    match row {
        Some(row) => {
            let items = fetch_line_items(&row.order_id, conn).await?;
            Ok(Some(row.into_order(items)))
        },
        None => Ok(None),
    }
}

/// Fetches the orders visible in `scope`, newest first.
pub async fn fetch_orders(scope: OrderScope, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let rows: Vec<OrderRow> = match &scope {
        OrderScope::Customer(customer_id) => {
            sqlx::query_as("SELECT * FROM orders WHERE customer_id = $1 ORDER BY created_at DESC, rowid DESC")
                .bind(customer_id)
                .fetch_all(&mut *conn)
                .await?
        },
        OrderScope::All => {
            sqlx::query_as("SELECT * FROM orders ORDER BY created_at DESC, rowid DESC").fetch_all(&mut *conn).await?
        },
    };
    trace!("📝️ fetch_orders({scope:?}) matched {} orders", rows.len());
    let mut orders = Vec::with_capacity(rows.len());
    for row in rows {
        let items = fetch_line_items(&row.order_id, conn).await?;
        orders.push(row.into_order(items));
    }
    Ok(orders)
}

/// Overwrites the order status and bumps `updated_at`. The write is unconditional. Legality of
/// the transition is the caller's concern.
pub async fn update_order_status(
    order_id: &OrderId,
    status: OrderStatus,
    conn: &mut SqliteConnection,
) -> Result<Order, OrderStoreError> {
    let row: Option<OrderRow> = sqlx::query_as(
        "UPDATE orders SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE order_id = $2 RETURNING *",
    )
    .bind(status.to_string())
    .bind(order_id.as_str())
    .fetch_optional(&mut *conn)
    .await?;
    match row {
        Some(row) => {
            let items = fetch_line_items(&row.order_id, conn).await?;
            Ok(row.into_order(items))
        },
        None => Err(OrderStoreError::OrderNotFound(order_id.clone())),
    }
}

/// Records the provider's checkout session id. The `customer_id` predicate is the authorisation
/// check: a mismatched owner looks identical to a missing order.
pub async fn set_checkout_session(
    order_id: &OrderId,
    customer_id: &str,
    session_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Order, OrderStoreError> {
    let row: Option<OrderRow> = sqlx::query_as(
        "UPDATE orders SET checkout_session_id = $1, updated_at = CURRENT_TIMESTAMP WHERE order_id = $2 AND \
         customer_id = $3 RETURNING *",
    )
    .bind(session_id)
    .bind(order_id.as_str())
    .bind(customer_id)
    .fetch_optional(&mut *conn)
    .await?;
    match row {
        Some(row) => {
            let items = fetch_line_items(&row.order_id, conn).await?;
            Ok(row.into_order(items))
        },
        None => Err(OrderStoreError::OrderNotFound(order_id.clone())),
    }
}

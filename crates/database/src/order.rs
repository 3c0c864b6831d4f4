//! Order operations.

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::lead;
use crate::models::{Lead, LeadStatus, LeadUpdate, NewOrder, Order, OrderStatus};
use crate::validation::validate_text;

fn validate_order(order: &NewOrder) -> Result<()> {
    validate_text("client_name", &order.client_name)?;
    validate_text("client_contact", &order.client_contact)?;
    validate_text("service_name", &order.service_name)?;
    validate_text("agreed_price", &order.agreed_price)?;
    Ok(())
}

async fn insert_with<'e, E>(executor: E, order: &NewOrder) -> Result<Order>
where
    E: PgExecutor<'e>,
{
    let created = sqlx::query_as::<_, Order>(
        r#"
        INSERT INTO orders (
            page_id, sender_id, client_name, client_contact, service_name, agreed_price, status
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, page_id, sender_id, client_name, client_contact, service_name,
                  agreed_price, status, created_at
        "#,
    )
    .bind(&order.page_id)
    .bind(&order.sender_id)
    .bind(order.client_name.trim())
    .bind(order.client_contact.trim())
    .bind(order.service_name.trim())
    .bind(order.agreed_price.trim())
    .bind(OrderStatus::PendingConfiguration.as_str())
    .fetch_one(executor)
    .await?;

    Ok(created)
}

/// Create an order in `Pending Configuration`.
pub async fn create_order(pool: &PgPool, order: &NewOrder) -> Result<Order> {
    validate_order(order)?;
    let created = insert_with(pool, order).await?;

    tracing::info!(order_id = %created.id, service = %created.service_name, "Order created");
    Ok(created)
}

/// Record a sale and close the buyer's lead atomically.
///
/// The lead for `(page_id, sender_id)` gets the client name, the service
/// and status `Closed`. Either both rows are written or neither is.
pub async fn create_order_and_close_lead(
    pool: &PgPool,
    page_id: &str,
    sender_id: &str,
    order: &NewOrder,
) -> Result<(Order, Lead)> {
    let update = LeadUpdate {
        name: Some(order.client_name.clone()),
        interested_service: Some(order.service_name.clone()),
        status: Some(LeadStatus::Closed),
        ..Default::default()
    };
    validate_order(order)?;
    lead::validate_update(&update)?;

    let mut tx = pool.begin().await?;
    let created = insert_with(&mut *tx, order).await?;
    let closed = lead::upsert_with(&mut *tx, page_id, sender_id, &update).await?;
    tx.commit().await?;

    tracing::info!(
        order_id = %created.id,
        lead_id = %closed.id,
        service = %created.service_name,
        "Order created, lead closed"
    );
    Ok((created, closed))
}

/// List all orders, newest first.
pub async fn list_orders(pool: &PgPool) -> Result<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(
        r#"
        SELECT id, page_id, sender_id, client_name, client_contact, service_name,
               agreed_price, status, created_at
        FROM orders
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(orders)
}

/// Get an order by ID.
pub async fn get_order(pool: &PgPool, id: Uuid) -> Result<Order> {
    sqlx::query_as::<_, Order>(
        r#"
        SELECT id, page_id, sender_id, client_name, client_contact, service_name,
               agreed_price, status, created_at
        FROM orders
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Order",
        id: id.to_string(),
    })
}

/// Move an order to a new status.
pub async fn update_status(pool: &PgPool, id: Uuid, status: OrderStatus) -> Result<Order> {
    sqlx::query_as::<_, Order>(
        r#"
        UPDATE orders
        SET status = $2
        WHERE id = $1
        RETURNING id, page_id, sender_id, client_name, client_contact, service_name,
                  agreed_price, status, created_at
        "#,
    )
    .bind(id)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Order",
        id: id.to_string(),
    })
}

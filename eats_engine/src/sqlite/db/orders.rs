use chrono::Utc;
use eats_common::Pkr;
use log::*;
use sqlx::{QueryBuilder, SqliteConnection};

use super::is_unique_violation;
use crate::{
    db_types::{NewOrder, Order, OrderDetails, OrderId, OrderItem, OrderStatusType},
    order_objects::OrderQueryFilter,
    traits::OrderFlowError,
};

const ORDER_DETAILS_QUERY: &str = r#"
    SELECT
        orders.*,
        restaurants.name AS restaurant_name,
        restaurants.image_url AS restaurant_image,
        users.fullname AS user_fullname,
        users.email AS user_email
    FROM orders
    JOIN restaurants ON restaurants.id = orders.restaurant_id
    JOIN users ON users.id = orders.user_id
"#;

/// Inserts the order and its line items. This is not atomic on its own. Run it inside a transaction (passing
/// `&mut tx` as the connection) so that an order is never saved without its items.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<i64, OrderFlowError> {
    let NewOrder { order_id, user_id, restaurant_id, delivery_details, items, created_at } = order;
    let id: i64 = sqlx::query_scalar(
        r#"
            INSERT INTO orders (
                order_id,
                user_id,
                restaurant_id,
                delivery_name,
                delivery_email,
                delivery_address,
                delivery_city,
                total_amount,
                status,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, 0, 'pending', $8, $8)
            RETURNING id;
        "#,
    )
    .bind(&order_id)
    .bind(user_id)
    .bind(restaurant_id)
    .bind(delivery_details.name)
    .bind(delivery_details.email)
    .bind(delivery_details.address)
    .bind(delivery_details.city)
    .bind(created_at)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            OrderFlowError::OrderAlreadyExists(order_id.clone())
        } else {
            e.into()
        }
    })?;
    for (position, item) in items.into_iter().enumerate() {
        #[allow(clippy::cast_possible_wrap)]
        let position = position as i64;
        sqlx::query(
            r#"
                INSERT INTO order_items (order_id, position, menu_id, name, image, price, quantity)
                VALUES ($1, $2, $3, $4, $5, $6, $7);
            "#,
        )
        .bind(id)
        .bind(position)
        .bind(item.menu_id)
        .bind(item.name)
        .bind(item.image)
        .bind(item.price)
        .bind(item.quantity)
        .execute(&mut *conn)
        .await?;
    }
    trace!("🗃️ Order {order_id} saved with id {id}");
    Ok(id)
}

pub async fn fetch_items_for_order(id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, sqlx::Error> {
    sqlx::query_as(
        "SELECT menu_id, name, image, price, quantity FROM order_items WHERE order_id = $1 ORDER BY position ASC",
    )
    .bind(id)
    .fetch_all(conn)
    .await
}

async fn attach_items(mut order: Order, conn: &mut SqliteConnection) -> Result<Order, sqlx::Error> {
    order.items = fetch_items_for_order(order.id, conn).await?;
    Ok(order)
}

/// Returns the order (with its line items) for the corresponding `order_id`.
pub async fn fetch_order_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order: Option<Order> =
        sqlx::query_as("SELECT * FROM orders WHERE order_id = $1").bind(order_id).fetch_optional(&mut *conn).await?;
    match order {
        Some(order) => Ok(Some(attach_items(order, conn).await?)),
        None => Ok(None),
    }
}

pub async fn fetch_order_details_for_user(
    user_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderDetails>, sqlx::Error> {
    let sql = format!("{ORDER_DETAILS_QUERY} WHERE orders.user_id = $1 ORDER BY orders.created_at ASC, orders.id ASC");
    let details: Vec<OrderDetails> = sqlx::query_as(&sql).bind(user_id).fetch_all(&mut *conn).await?;
    attach_items_to_details(details, conn).await
}

pub async fn fetch_order_details_for_restaurant(
    restaurant_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderDetails>, sqlx::Error> {
    let sql =
        format!("{ORDER_DETAILS_QUERY} WHERE orders.restaurant_id = $1 ORDER BY orders.created_at ASC, orders.id ASC");
    let details: Vec<OrderDetails> = sqlx::query_as(&sql).bind(restaurant_id).fetch_all(&mut *conn).await?;
    attach_items_to_details(details, conn).await
}

async fn attach_items_to_details(
    details: Vec<OrderDetails>,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderDetails>, sqlx::Error> {
    let mut result = Vec::with_capacity(details.len());
    for mut d in details {
        d.order.items = fetch_items_for_order(d.order.id, &mut *conn).await?;
        result.push(d);
    }
    Ok(result)
}

/// Orders (with line items) matching the filter, oldest first.
pub async fn search_orders(query: OrderQueryFilter, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT * FROM orders ");
    if !query.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(order_id) = query.order_id {
        where_clause.push("order_id = ");
        where_clause.push_bind_unseparated(order_id.0);
    }
    if let Some(user_id) = query.user_id {
        where_clause.push("user_id = ");
        where_clause.push_bind_unseparated(user_id);
    }
    if let Some(restaurant_id) = query.restaurant_id {
        where_clause.push("restaurant_id = ");
        where_clause.push_bind_unseparated(restaurant_id);
    }
    if let Some(statuses) = query.status.filter(|s| !s.is_empty()) {
        where_clause.push("status IN (");
        for (i, status) in statuses.into_iter().enumerate() {
            if i > 0 {
                where_clause.push_unseparated(", ");
            }
            where_clause.push_bind_unseparated(status.to_string());
        }
        where_clause.push_unseparated(")");
    }
    if let Some(since) = query.since {
        where_clause.push("created_at >= ");
        where_clause.push_bind_unseparated(since);
    }
    if let Some(until) = query.until {
        where_clause.push("created_at <= ");
        where_clause.push_bind_unseparated(until);
    }
    builder.push(" ORDER BY created_at ASC, id ASC");

    trace!("🗃️ Executing query: {}", builder.sql());
    let orders: Vec<Order> = builder.build_query_as::<Order>().fetch_all(&mut *conn).await?;
    trace!("🗃️ Result of search_orders: {}", orders.len());
    let mut result = Vec::with_capacity(orders.len());
    for order in orders {
        result.push(attach_items(order, &mut *conn).await?);
    }
    Ok(result)
}

/// Overwrites the total (when given) and confirms a pending order. Orders further down the pipeline keep their
/// status.
pub async fn confirm_order(
    order_id: &OrderId,
    total: Option<Pkr>,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
            UPDATE orders SET
                total_amount = COALESCE($1, total_amount),
                status = CASE WHEN status = 'pending' THEN 'confirmed' ELSE status END,
                updated_at = $2
            WHERE order_id = $3
        "#,
    )
    .bind(total)
    .bind(Utc::now())
    .bind(order_id)
    .execute(&mut *conn)
    .await?
    .rows_affected();
    if rows == 0 {
        return Ok(None);
    }
    fetch_order_by_order_id(order_id, conn).await
}

pub async fn update_order_status(
    order_id: &OrderId,
    status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let rows = sqlx::query("UPDATE orders SET status = $1, updated_at = $2 WHERE order_id = $3")
        .bind(status)
        .bind(Utc::now())
        .bind(order_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    if rows == 0 {
        return Ok(None);
    }
    fetch_order_by_order_id(order_id, conn).await
}

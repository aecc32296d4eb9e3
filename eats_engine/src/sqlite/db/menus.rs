use chrono::Utc;
use log::*;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::db_types::{MenuItem, MenuItemUpdate, NewMenuItem};

pub async fn insert_menu_item(
    restaurant_id: i64,
    item: NewMenuItem,
    conn: &mut SqliteConnection,
) -> Result<MenuItem, sqlx::Error> {
    let now = Utc::now();
    sqlx::query_as(
        r#"
            INSERT INTO menu_items (restaurant_id, name, description, price, image, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING *;
        "#,
    )
    .bind(restaurant_id)
    .bind(item.name.trim())
    .bind(item.description)
    .bind(item.price)
    .bind(item.image)
    .bind(now)
    .fetch_one(conn)
    .await
}

/// The restaurant's menu, in the order the items were added.
pub async fn fetch_menu(restaurant_id: i64, conn: &mut SqliteConnection) -> Result<Vec<MenuItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM menu_items WHERE restaurant_id = $1 ORDER BY id ASC")
        .bind(restaurant_id)
        .fetch_all(conn)
        .await
}

pub async fn fetch_menu_item(id: i64, conn: &mut SqliteConnection) -> Result<Option<MenuItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM menu_items WHERE id = $1").bind(id).fetch_optional(conn).await
}

pub async fn update_menu_item(
    id: i64,
    update: MenuItemUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<MenuItem>, sqlx::Error> {
    let mut builder = QueryBuilder::new("UPDATE menu_items SET ");
    let mut set_clause = builder.separated(", ");
    if let Some(name) = update.name {
        set_clause.push("name = ");
        set_clause.push_bind_unseparated(name.trim().to_string());
    }
    if let Some(description) = update.description {
        set_clause.push("description = ");
        set_clause.push_bind_unseparated(description);
    }
    if let Some(price) = update.price {
        set_clause.push("price = ");
        set_clause.push_bind_unseparated(price);
    }
    if let Some(image) = update.image {
        set_clause.push("image = ");
        set_clause.push_bind_unseparated(image);
    }
    set_clause.push("updated_at = ");
    set_clause.push_bind_unseparated(Utc::now());
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING *");
    trace!("🗃️ Executing query: {}", builder.sql());
    builder.build_query_as::<MenuItem>().fetch_optional(conn).await
}

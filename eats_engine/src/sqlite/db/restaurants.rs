use chrono::Utc;
use log::*;
use sqlx::{QueryBuilder, SqliteConnection};

use super::is_unique_violation;
use crate::{
    db_types::{NewRestaurant, Restaurant, RestaurantUpdate},
    restaurant_objects::RestaurantQuery,
    traits::RestaurantApiError,
};

fn cuisines_json(cuisines: &[String]) -> Result<String, RestaurantApiError> {
    let cleaned = cuisines.iter().map(|c| c.trim()).filter(|c| !c.is_empty()).collect::<Vec<&str>>();
    serde_json::to_string(&cleaned).map_err(|e| RestaurantApiError::ValidationError(e.to_string()))
}

pub async fn insert_restaurant(
    owner_id: i64,
    restaurant: NewRestaurant,
    conn: &mut SqliteConnection,
) -> Result<Restaurant, RestaurantApiError> {
    let cuisines = cuisines_json(&restaurant.cuisines)?;
    let now = Utc::now();
    let restaurant = sqlx::query_as(
        r#"
            INSERT INTO restaurants (
                user_id, name, city, country, delivery_time, cuisines, image_url, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING *;
        "#,
    )
    .bind(owner_id)
    .bind(restaurant.name.trim())
    .bind(restaurant.city.trim())
    .bind(restaurant.country.trim())
    .bind(restaurant.delivery_time)
    .bind(cuisines)
    .bind(restaurant.image_url)
    .bind(now)
    .fetch_one(conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            RestaurantApiError::RestaurantAlreadyExists(owner_id)
        } else {
            e.into()
        }
    })?;
    Ok(restaurant)
}

pub async fn update_restaurant(
    id: i64,
    update: RestaurantUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Restaurant>, RestaurantApiError> {
    let mut builder = QueryBuilder::new("UPDATE restaurants SET ");
    let mut set_clause = builder.separated(", ");
    if let Some(name) = update.name {
        set_clause.push("name = ");
        set_clause.push_bind_unseparated(name.trim().to_string());
    }
    if let Some(city) = update.city {
        set_clause.push("city = ");
        set_clause.push_bind_unseparated(city.trim().to_string());
    }
    if let Some(country) = update.country {
        set_clause.push("country = ");
        set_clause.push_bind_unseparated(country.trim().to_string());
    }
    if let Some(delivery_time) = update.delivery_time {
        set_clause.push("delivery_time = ");
        set_clause.push_bind_unseparated(delivery_time);
    }
    if let Some(cuisines) = update.cuisines {
        set_clause.push("cuisines = ");
        set_clause.push_bind_unseparated(cuisines_json(&cuisines)?);
    }
    if let Some(image_url) = update.image_url {
        set_clause.push("image_url = ");
        set_clause.push_bind_unseparated(image_url);
    }
    set_clause.push("updated_at = ");
    set_clause.push_bind_unseparated(Utc::now());
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING *");
    trace!("🗃️ Executing query: {}", builder.sql());
    let restaurant = builder.build_query_as::<Restaurant>().fetch_optional(conn).await?;
    Ok(restaurant)
}

pub async fn fetch_restaurant(id: i64, conn: &mut SqliteConnection) -> Result<Option<Restaurant>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM restaurants WHERE id = $1").bind(id).fetch_optional(conn).await
}

pub async fn fetch_restaurant_for_owner(
    owner_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Restaurant>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM restaurants WHERE user_id = $1").bind(owner_id).fetch_optional(conn).await
}

/// Text matching is a case-insensitive substring match on the name, city or country. Cuisine matching is
/// case-insensitive and exact.
pub async fn search_restaurants(
    query: RestaurantQuery,
    conn: &mut SqliteConnection,
) -> Result<Vec<Restaurant>, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT * FROM restaurants WHERE 1 = 1");
    if let Some(text) = query.search_text {
        let pattern = format!("%{}%", text.to_lowercase());
        builder.push(" AND (lower(name) LIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR lower(city) LIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR lower(country) LIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
    let cuisines =
        query.cuisines.iter().map(|c| c.trim().to_lowercase()).filter(|c| !c.is_empty()).collect::<Vec<String>>();
    if !cuisines.is_empty() {
        builder.push(" AND EXISTS (SELECT 1 FROM json_each(restaurants.cuisines) WHERE lower(json_each.value) IN (");
        let mut list = builder.separated(", ");
        for cuisine in cuisines {
            list.push_bind(cuisine);
        }
        builder.push("))");
    }
    builder.push(" ORDER BY name ASC, id ASC");
    trace!("🗃️ Executing query: {}", builder.sql());
    builder.build_query_as::<Restaurant>().fetch_all(conn).await
}

use chrono::Utc;
use log::*;
use sqlx::{QueryBuilder, SqliteConnection};

use super::is_unique_violation;
use crate::{
    db_types::{NewUserAccount, ProfileUpdate, UserAccount, UserCredentials},
    traits::AccountApiError,
};

pub async fn insert_user(user: NewUserAccount, conn: &mut SqliteConnection) -> Result<UserAccount, AccountApiError> {
    let now = Utc::now();
    let email = user.email.clone();
    sqlx::query_as(
        r#"
            INSERT INTO users (fullname, email, password_hash, contact, admin, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING *;
        "#,
    )
    .bind(user.fullname)
    .bind(user.email)
    .bind(user.password_hash)
    .bind(user.contact)
    .bind(user.admin)
    .bind(now)
    .fetch_one(conn)
    .await
    .map_err(|e| if is_unique_violation(&e) { AccountApiError::EmailAlreadyRegistered(email) } else { e.into() })
}

pub async fn fetch_user(id: i64, conn: &mut SqliteConnection) -> Result<Option<UserAccount>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(id).fetch_optional(conn).await
}

/// Emails are stored with a case-insensitive collation, so any capitalisation matches.
pub async fn fetch_credentials(
    email: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<UserCredentials>, sqlx::Error> {
    sqlx::query_as("SELECT id, email, password_hash FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(conn)
        .await
}

pub async fn update_last_login(id: i64, conn: &mut SqliteConnection) -> Result<Option<UserAccount>, sqlx::Error> {
    sqlx::query_as("UPDATE users SET last_login = $1 WHERE id = $2 RETURNING *")
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn update_profile(
    id: i64,
    update: ProfileUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<UserAccount>, sqlx::Error> {
    let mut builder = QueryBuilder::new("UPDATE users SET ");
    let mut set_clause = builder.separated(", ");
    let fields = [
        ("fullname", update.fullname),
        ("contact", update.contact),
        ("address", update.address),
        ("city", update.city),
        ("country", update.country),
        ("profile_picture", update.profile_picture),
    ];
    for (column, value) in fields {
        if let Some(value) = value {
            set_clause.push(format!("{column} = "));
            set_clause.push_bind_unseparated(value.trim().to_string());
        }
    }
    set_clause.push("updated_at = ");
    set_clause.push_bind_unseparated(Utc::now());
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING *");
    trace!("🗃️ Executing query: {}", builder.sql());
    builder.build_query_as::<UserAccount>().fetch_optional(conn).await
}

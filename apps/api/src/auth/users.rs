use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::UserRow;

/// Fields required to insert a new user. Secrets arrive already hashed.
pub struct NewUser<'a> {
    pub username: &'a str,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub security_question: &'a str,
    pub security_answer_hash: &'a str,
}

pub async fn find_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Looks a user up by email when the identifier contains `@`, otherwise by username.
pub async fn find_by_identifier(
    pool: &PgPool,
    identifier: &str,
) -> Result<Option<UserRow>, sqlx::Error> {
    let identifier = identifier.trim().to_lowercase();
    if identifier.contains('@') {
        find_by_email(pool, &identifier).await
    } else {
        find_by_username(pool, &identifier).await
    }
}

pub async fn insert_user(
    pool: &PgPool,
    user: NewUser<'_>,
    now: DateTime<Utc>,
) -> Result<UserRow, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users
            (id, username, name, email, password_hash,
             security_question, security_answer_hash, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.username)
    .bind(user.name)
    .bind(user.email)
    .bind(user.password_hash)
    .bind(user.security_question)
    .bind(user.security_answer_hash)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// New secrets for an account, already hashed. `None` keeps the stored value.
#[derive(Debug)]
pub struct CredentialUpdate {
    pub password_hash: String,
    pub security_question: Option<String>,
    pub security_answer_hash: Option<String>,
}

/// Replaces the password and, when given, the security question and answer in one statement.
pub async fn update_credentials(
    pool: &PgPool,
    id: Uuid,
    update: &CredentialUpdate,
    now: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE users
        SET password_hash = $1,
            security_question = COALESCE($2, security_question),
            security_answer_hash = COALESCE($3, security_answer_hash),
            updated_at = $4
        WHERE id = $5
        "#,
    )
    .bind(&update.password_hash)
    .bind(update.security_question.as_deref())
    .bind(update.security_answer_hash.as_deref())
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

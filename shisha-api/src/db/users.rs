//! User rows and profile activity queries

use shisha_common::models::{MixActionRecord, User, UserActionDetail};
use shisha_common::{Error, Result};
use sqlx::SqlitePool;

use super::mixes;

/// User by Telegram id
pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
    let row = sqlx::query_as::<
        _,
        (i64, Option<String>, Option<String>, Option<String>, String, String),
    >(
        "SELECT id, username, first_name, last_name, role, created_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(
        |(id, username, first_name, last_name, role, created_at)| User {
            id,
            username,
            first_name,
            last_name,
            role,
            created_at,
        },
    ))
}

/// A user's actions, newest first, each with the acted-on mix resolved
///
/// Soft-deleted mixes are still included so order history stays complete.
pub async fn list_user_actions(pool: &SqlitePool, user_id: i64) -> Result<Vec<UserActionDetail>> {
    let rows = sqlx::query_as::<_, (i64, i64, i64, String, Option<i64>, Option<String>, String)>(
        r#"
        SELECT id, user_id, mix_id, type, table_number, comment, created_at
        FROM mix_actions
        WHERE user_id = ?
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut actions = Vec::with_capacity(rows.len());
    for (id, user_id, mix_id, kind_raw, table_number, comment, created_at) in rows {
        let mix = mixes::get_mix_any(pool, mix_id).await?;
        actions.push(UserActionDetail {
            action: MixActionRecord {
                id,
                user_id,
                mix_id,
                kind: kind_raw
                    .parse()
                    .map_err(|_| Error::Internal(format!("corrupt action type: {}", kind_raw)))?,
                table_number,
                comment,
                created_at,
            },
            mix,
        });
    }
    Ok(actions)
}

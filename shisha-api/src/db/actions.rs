//! Mix action aggregation
//!
//! Consumes LIKE/DISLIKE/ORDER events and keeps the mix counters
//! consistent. The partial unique index on mix_actions absorbs duplicate
//! votes at the storage layer; the counter only moves when a row was
//! actually inserted, so repeated likes can never double-count. Counter
//! updates are SQL-level increments, never read-modify-write.

use shisha_common::models::{ActionType, MixActionRecord};
use shisha_common::{Error, Result};
use sqlx::SqlitePool;

/// Outcome of recording an action
#[derive(Debug)]
pub struct RecordedAction {
    pub action: MixActionRecord,
    /// Name of the acted-on mix, for order notifications
    pub mix_name: String,
    /// False when a duplicate LIKE/DISLIKE was absorbed as a no-op
    pub inserted: bool,
}

/// Record an action against a mix and update its counters in one
/// transaction
pub async fn record_action(
    pool: &SqlitePool,
    mix_id: i64,
    user_id: i64,
    kind: ActionType,
    table_number: Option<i64>,
    comment: Option<&str>,
) -> Result<RecordedAction> {
    let mut tx = pool.begin().await?;

    let mix_name: Option<String> =
        sqlx::query_scalar("SELECT name FROM mixes WHERE id = ? AND is_deleted = 0")
            .bind(mix_id)
            .fetch_optional(&mut *tx)
            .await?;
    let mix_name = mix_name.ok_or_else(|| Error::NotFound(format!("mix {}", mix_id)))?;

    sqlx::query("INSERT OR IGNORE INTO users (id) VALUES (?)")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let (action_id, inserted) = match kind {
        ActionType::Order => {
            // Orders are a pure append log: every call inserts a row and
            // bumps the counter
            let result = sqlx::query(
                r#"
                INSERT INTO mix_actions (user_id, mix_id, type, table_number, comment)
                VALUES (?, ?, 'ORDER', ?, ?)
                "#,
            )
            .bind(user_id)
            .bind(mix_id)
            .bind(table_number)
            .bind(comment)
            .execute(&mut *tx)
            .await?;

            sqlx::query("UPDATE mixes SET orders_count = orders_count + 1 WHERE id = ?")
                .bind(mix_id)
                .execute(&mut *tx)
                .await?;

            (result.last_insert_rowid(), true)
        }
        ActionType::Like | ActionType::Dislike => {
            // INSERT OR IGNORE rides on idx_mix_actions_unique_vote; a
            // duplicate vote affects zero rows and must not re-increment
            let result = sqlx::query(
                "INSERT OR IGNORE INTO mix_actions (user_id, mix_id, type) VALUES (?, ?, ?)",
            )
            .bind(user_id)
            .bind(mix_id)
            .bind(kind.as_str())
            .execute(&mut *tx)
            .await?;

            let inserted = result.rows_affected() == 1;
            if inserted {
                let update = match kind {
                    ActionType::Like => {
                        "UPDATE mixes SET likes_count = likes_count + 1, rating = rating + 1 WHERE id = ?"
                    }
                    _ => {
                        "UPDATE mixes SET dislikes_count = dislikes_count + 1, rating = rating - 1 WHERE id = ?"
                    }
                };
                sqlx::query(update).bind(mix_id).execute(&mut *tx).await?;
            }

            let action_id = if inserted {
                result.last_insert_rowid()
            } else {
                sqlx::query_scalar(
                    "SELECT id FROM mix_actions WHERE user_id = ? AND mix_id = ? AND type = ?",
                )
                .bind(user_id)
                .bind(mix_id)
                .bind(kind.as_str())
                .fetch_one(&mut *tx)
                .await?
            };

            (action_id, inserted)
        }
    };

    let row = sqlx::query_as::<_, (i64, i64, i64, String, Option<i64>, Option<String>, String)>(
        r#"
        SELECT id, user_id, mix_id, type, table_number, comment, created_at
        FROM mix_actions WHERE id = ?
        "#,
    )
    .bind(action_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    let (id, user_id, mix_id, kind_raw, table_number, comment, created_at) = row;
    Ok(RecordedAction {
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
        mix_name,
        inserted,
    })
}

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::postgres::PgExecutor;

use crate::common::CoreError;

/// A mutual-interest pairing between two users.
///
/// The pair is unordered: `user_one_id` happens to be the user who completed
/// the reciprocal swipe, but nothing may depend on that. Existence checks go
/// through `find_by_pair`, which tests both orderings. Rows are
/// soft-deleted; every query here filters on `deleted_at IS NULL`, and a
/// partial unique index on the unordered pair guarantees at most one live
/// match per pair.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Match {
    pub id: i64,
    pub user_one_id: i64,
    pub user_two_id: i64,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    pub async fn insert(
        user_one_id: i64,
        user_two_id: i64,
        executor: impl PgExecutor<'_>,
    ) -> Result<Self, CoreError> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO matches (user_one_id, user_two_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_one_id)
        .bind(user_two_id)
        .fetch_one(executor)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(
        id: i64,
        executor: impl PgExecutor<'_>,
    ) -> Result<Option<Self>, CoreError> {
        sqlx::query_as::<_, Self>("SELECT * FROM matches WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(Into::into)
    }

    /// Look up the live match for an unordered pair.
    pub async fn find_by_pair(
        user_a: i64,
        user_b: i64,
        executor: impl PgExecutor<'_>,
    ) -> Result<Option<Self>, CoreError> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM matches
             WHERE ((user_one_id = $1 AND user_two_id = $2)
                 OR (user_one_id = $2 AND user_two_id = $1))
               AND deleted_at IS NULL",
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    /// Tombstone a match. The row stays for audit; live queries stop
    /// returning it and the pair becomes free to match again.
    pub async fn soft_delete(id: i64, executor: impl PgExecutor<'_>) -> Result<(), CoreError> {
        let result = sqlx::query(
            "UPDATE matches SET deleted_at = now(), updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::MatchNotFound);
        }
        Ok(())
    }

    /// True when the pair `{a, b}` equals this match's pair, in either order.
    pub fn pair_equals(&self, user_a: i64, user_b: i64) -> bool {
        (self.user_one_id == user_a && self.user_two_id == user_b)
            || (self.user_one_id == user_b && self.user_two_id == user_a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(user_one_id: i64, user_two_id: i64) -> Match {
        Match {
            id: 1,
            user_one_id,
            user_two_id,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn pair_equality_is_unordered() {
        let m = sample(7, 3);
        assert!(m.pair_equals(7, 3));
        assert!(m.pair_equals(3, 7));
        assert!(!m.pair_equals(3, 4));
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;
use sqlx::{Postgres, QueryBuilder};

use crate::common::CoreError;
use crate::kernel::GeoIndex;

/// Profile gender, stored as the `gender` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "gender")]
pub enum Gender {
    #[sqlx(rename = "M")]
    #[serde(rename = "M")]
    Male,
    #[sqlx(rename = "F")]
    #[serde(rename = "F")]
    Female,
    #[sqlx(rename = "O")]
    #[serde(rename = "O")]
    Other,
}

/// User model - SQL persistence layer
///
/// `h3_cell` is a denormalization of (latitude, longitude) at the configured
/// resolution; every write path that touches coordinates re-derives it, so
/// it is never stale. `likes_count` is only ever changed through
/// `increment_likes`, an atomic in-database add.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub gender: Gender,
    pub dob: NaiveDate,
    pub latitude: f64,
    pub longitude: f64,
    pub h3_cell: i64,
    pub likes_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when registering a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub gender: Gender,
    pub dob: NaiveDate,
    pub latitude: f64,
    pub longitude: f64,
}

impl User {
    pub async fn find_by_id(
        id: i64,
        executor: impl PgExecutor<'_>,
    ) -> Result<Option<Self>, CoreError> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_email(
        email: &str,
        executor: impl PgExecutor<'_>,
    ) -> Result<Option<Self>, CoreError> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(executor)
            .await
            .map_err(Into::into)
    }

    /// Insert a new user, deriving the spatial cell from the coordinates.
    pub async fn insert(
        new_user: &NewUser,
        geo: &GeoIndex,
        executor: impl PgExecutor<'_>,
    ) -> Result<Self, CoreError> {
        let h3_cell = geo.cell_for(new_user.latitude, new_user.longitude)?;

        sqlx::query_as::<_, Self>(
            "INSERT INTO users (email, password_hash, name, gender, dob, latitude, longitude, h3_cell)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *",
        )
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.name)
        .bind(new_user.gender)
        .bind(new_user.dob)
        .bind(new_user.latitude)
        .bind(new_user.longitude)
        .bind(h3_cell)
        .fetch_one(executor)
        .await
        .map_err(Into::into)
    }

    /// Move a user, re-deriving the spatial cell in the same statement.
    pub async fn update_location(
        id: i64,
        latitude: f64,
        longitude: f64,
        geo: &GeoIndex,
        executor: impl PgExecutor<'_>,
    ) -> Result<Option<Self>, CoreError> {
        let h3_cell = geo.cell_for(latitude, longitude)?;

        sqlx::query_as::<_, Self>(
            "UPDATE users
             SET latitude = $2, longitude = $3, h3_cell = $4, updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(latitude)
        .bind(longitude)
        .bind(h3_cell)
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    /// Add `delta` to a user's likes counter as a single atomic statement.
    ///
    /// Never expressed as read-modify-write: concurrent swipers contend on
    /// this row and must not lose updates.
    pub async fn increment_likes(
        id: i64,
        delta: i64,
        executor: impl PgExecutor<'_>,
    ) -> Result<(), CoreError> {
        let result = sqlx::query(
            "UPDATE users SET likes_count = likes_count + $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(delta)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::UserNotFound);
        }
        Ok(())
    }

    /// Compound candidate query for discovery.
    ///
    /// All predicates are applied in a single SQL statement; results come
    /// back most-liked first, capped at `limit`. No in-memory post-filtering.
    pub async fn find_candidates(
        exclude_id: i64,
        dob_range: Option<(NaiveDate, NaiveDate)>,
        gender: Option<Gender>,
        cells: Option<Vec<i64>>,
        limit: i64,
        executor: impl PgExecutor<'_>,
    ) -> Result<Vec<Self>, CoreError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM users WHERE id <> ");
        query.push_bind(exclude_id);

        if let Some((earliest, latest)) = dob_range {
            query.push(" AND dob BETWEEN ");
            query.push_bind(earliest);
            query.push(" AND ");
            query.push_bind(latest);
        }
        if let Some(gender) = gender {
            query.push(" AND gender = ");
            query.push_bind(gender);
        }
        if let Some(cells) = cells {
            query.push(" AND h3_cell = ANY(");
            query.push_bind(cells);
            query.push(")");
        }

        query.push(" ORDER BY likes_count DESC, id ASC LIMIT ");
        query.push_bind(limit);

        query
            .build_query_as::<Self>()
            .fetch_all(executor)
            .await
            .map_err(Into::into)
    }
}

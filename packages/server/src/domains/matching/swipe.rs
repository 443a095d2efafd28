//! Swipe decision procedure.
//!
//! A positive swipe either records a one-sided intent in the cache or, when
//! the other side already swiped, consumes that intent and persists a match.
//! All relational writes of one swipe run inside a single unit-of-work
//! transaction; the cache sits outside that boundary.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::common::CoreError;
use crate::domains::matching::models::Match;
use crate::domains::users::User;
use crate::kernel::uow::UowTransaction;
use crate::kernel::{ServerDeps, SwipeCache, UnitOfWork};

/// One-directional expression of interest or disinterest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SwipeAction {
    Like,
    Pass,
}

impl SwipeAction {
    pub fn token(self) -> &'static str {
        match self {
            Self::Like => "LIKE",
            Self::Pass => "PASS",
        }
    }
}

impl fmt::Display for SwipeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Cache key for "actor performed `action` toward target".
///
/// Format: `<actorId>.<ACTION>.<targetId>`, e.g. user 1 likes user 2 =
/// `1.LIKE.2`.
pub fn intent_key(actor_id: i64, action: SwipeAction, target_id: i64) -> String {
    format!("{actor_id}.{action}.{target_id}")
}

pub struct MatchEngine {
    pool: sqlx::PgPool,
    cache: SwipeCache,
    uow: UnitOfWork,
    intent_ttl: Duration,
}

impl MatchEngine {
    pub fn new(deps: &ServerDeps) -> Self {
        Self {
            pool: deps.db_pool.clone(),
            cache: deps.swipe_cache.clone(),
            uow: deps.uow.clone(),
            intent_ttl: Duration::from_secs(
                u64::from(deps.config.swipe_intent_ttl_days) * 24 * 60 * 60,
            ),
        }
    }

    /// Perform a swipe from `swiper_id` toward `swiped_id`.
    ///
    /// Both users must exist. A `Pass` completes with no side effects. For a
    /// `Like`:
    ///
    /// - the reciprocal intent key (`<swiped>.LIKE.<swiper>`) is consumed
    ///   atomically (GETDEL), so two racing reciprocal swipes cannot both
    ///   observe it;
    /// - no reciprocal intent: the swiper's own intent is written with a
    ///   bounded TTL and the swiped user's likes counter is incremented;
    ///   returns `None`;
    /// - reciprocal intent found: a match row for the pair is created and
    ///   re-read inside the same transaction, the likes counter is
    ///   incremented; returns the persisted match.
    ///
    /// The cache is not part of the transaction. If the transaction rolls
    /// back after an intent was consumed or written, cache and database
    /// disagree until the key expires or the affected user swipes again;
    /// no compensating write is attempted. Cache failures abort the whole
    /// swipe. Nothing is retried here.
    pub async fn swipe(
        &self,
        swiper_id: i64,
        swiped_id: i64,
        action: SwipeAction,
    ) -> Result<Option<Match>, CoreError> {
        if swiper_id == swiped_id {
            return Err(CoreError::Validation("cannot swipe on yourself".into()));
        }

        let swiper = User::find_by_id(swiper_id, &self.pool)
            .await?
            .ok_or(CoreError::UserNotFound)?;
        let swiped = User::find_by_id(swiped_id, &self.pool)
            .await?
            .ok_or(CoreError::UserNotFound)?;

        if action == SwipeAction::Pass {
            tracing::debug!(swiper_id, swiped_id, "pass swipe, no side effects");
            return Ok(None);
        }

        let cache = self.cache.clone();
        let intent_ttl = self.intent_ttl;

        let result = self
            .uow
            .execute(move |tx: &mut UowTransaction| {
                Box::pin(async move {
                    let reciprocal_key = intent_key(swiped.id, SwipeAction::Like, swiper.id);

                    let reciprocal = cache
                        .take(&reciprocal_key)
                        .await
                        .map_err(|e| CoreError::wrap("reciprocal intent check failed", e))?;

                    let matched = match reciprocal {
                        None => {
                            let own_key = intent_key(swiper.id, SwipeAction::Like, swiped.id);
                            cache
                                .set(&own_key, SwipeAction::Like.token(), intent_ttl)
                                .await
                                .map_err(|e| CoreError::wrap("cache save failed", e))?;
                            tracing::info!(
                                swiper_id = swiper.id,
                                swiped_id = swiped.id,
                                "swipe intent recorded"
                            );
                            None
                        }
                        Some(_) => {
                            Match::insert(swiper.id, swiped.id, &mut **tx)
                                .await
                                .map_err(|e| CoreError::wrap("match save failed", e))?;

                            let persisted = Match::find_by_pair(swiper.id, swiped.id, &mut **tx)
                                .await?
                                .ok_or(CoreError::MatchNotFound)?;
                            tracing::info!(match_id = persisted.id, "match occurred");
                            Some(persisted)
                        }
                    };

                    User::increment_likes(swiped.id, 1, &mut **tx)
                        .await
                        .map_err(|e| CoreError::wrap("increment likes failed", e))?;

                    Ok(matched)
                })
            })
            .await
            .map_err(|e| {
                tracing::error!(swiper_id, swiped_id, error = %e, "swipe failed");
                CoreError::wrap("handle swipe failed", e)
            })?;

        Ok(result)
    }
}

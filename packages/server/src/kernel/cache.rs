//! Durable TTL-bounded key/value store for one-sided swipe intents.
//!
//! Backed by Redis. This store sits outside the unit-of-work transaction
//! boundary: a relational rollback does not undo a cache write. The swipe
//! engine tolerates that asymmetry (the key expires, or the user swipes
//! again).

use std::time::Duration;

use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::common::CoreError;

/// Namespace prefix for every key written by this app.
const KEY_PREFIX: &str = "EMBER_APP_";

/// Async Redis client for swipe intents.
///
/// Cheap to clone; all clones share one multiplexed connection. Constructed
/// once at startup and injected through `ServerDeps` - no global state.
#[derive(Clone)]
pub struct SwipeCache {
    conn: ConnectionManager,
}

impl SwipeCache {
    pub async fn connect(redis_url: &str) -> Result<Self, CoreError> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self { conn })
    }

    /// Store `value` under `key` with a bounded time-to-live.
    pub async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CoreError> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(Self::namespaced(key), value, ttl.as_secs())
            .await?;
        Ok(())
    }

    /// Fetch the value under `key`.
    ///
    /// An absent or expired key is `CacheKeyNotFound`, distinguishable from
    /// a store failure.
    pub async fn get(&self, key: &str) -> Result<String, CoreError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(Self::namespaced(key)).await?;
        value.ok_or(CoreError::CacheKeyNotFound)
    }

    /// Atomically fetch and delete the value under `key` (GETDEL).
    ///
    /// Two concurrent callers cannot both observe the same value, which is
    /// what makes the reciprocal-intent check in the swipe engine safe
    /// against the check-then-act race.
    pub async fn take(&self, key: &str) -> Result<Option<String>, CoreError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = redis::cmd("GETDEL")
            .arg(Self::namespaced(key))
            .query_async(&mut conn)
            .await?;
        Ok(value)
    }

    /// Delete `key`. Deleting an absent key is not an error.
    pub async fn delete(&self, key: &str) -> Result<(), CoreError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(Self::namespaced(key)).await?;
        Ok(())
    }

    fn namespaced(key: &str) -> String {
        format!("{KEY_PREFIX}{key}")
    }
}

//! Central dependency container handed to the engines.
//!
//! Everything here is constructed once at startup (or in the test harness)
//! and injected; there are no lazily-initialized globals.

use sqlx::PgPool;

use crate::config::Config;
use crate::kernel::{GeoIndex, SwipeCache, UnitOfWork};

#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    pub swipe_cache: SwipeCache,
    pub geo: GeoIndex,
    pub uow: UnitOfWork,
    pub config: Config,
}

impl ServerDeps {
    pub fn new(db_pool: PgPool, swipe_cache: SwipeCache, geo: GeoIndex, config: Config) -> Self {
        let uow = UnitOfWork::new(db_pool.clone());
        Self {
            db_pool,
            swipe_cache,
            geo,
            uow,
            config,
        }
    }
}

//! Test harness with testcontainers for integration testing.
//!
//! Containers are shared across all tests for performance: Postgres and
//! Redis start once on the first test. Each harness then gets its own
//! freshly migrated database, so count-based assertions never see another
//! test's rows. Redis is shared, so user id sequences are offset per
//! harness to keep swipe-intent keys disjoint.

use anyhow::{Context, Result};
use sqlx::PgPool;
use std::sync::atomic::{AtomicU64, Ordering};
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use testcontainers_modules::redis::Redis;
use tokio::sync::OnceCell;

use ember_core::kernel::{GeoIndex, ServerDeps, SwipeCache};
use ember_core::Config;

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    pg_host: String,
    pg_port: u16,
    redis_url: String,
    admin_pool: PgPool,
    // Keep containers alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
    _redis: ContainerAsync<Redis>,
}

/// Global shared infrastructure - initialized once, reused by all tests.
static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

/// Monotonic counter for per-harness database names and id-sequence offsets.
static HARNESS_COUNTER: AtomicU64 = AtomicU64::new(1);

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Respect RUST_LOG; try_init avoids panicking if already installed.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=200"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?.to_string();
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let admin_url = format!("postgresql://postgres:postgres@{pg_host}:{pg_port}/postgres");

        let redis = Redis::default()
            .start()
            .await
            .context("Failed to start Redis container")?;

        let redis_host = redis.get_host().await?;
        let redis_port = redis.get_host_port_ipv4(6379).await?;
        let redis_url = format!("redis://{redis_host}:{redis_port}");

        let admin_pool = PgPool::connect(&admin_url)
            .await
            .context("Failed to connect to Postgres")?;

        Ok(Self {
            pg_host,
            pg_port,
            redis_url,
            admin_pool,
            _postgres: postgres,
            _redis: redis,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Per-test infrastructure: a dedicated database on the shared containers.
pub struct TestHarness {
    pub db_pool: PgPool,
    pub swipe_cache: SwipeCache,
    pub deps: ServerDeps,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        // Pools are dropped; per-test databases are left on the throwaway
        // container.
    }
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let index = HARNESS_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("ember_test_{index}");
        sqlx::query(&format!("CREATE DATABASE {db_name}"))
            .execute(&infra.admin_pool)
            .await
            .context("Failed to create test database")?;

        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/{}",
            infra.pg_host, infra.pg_port, db_name
        );
        let db_pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to test database")?;

        sqlx::migrate!("./migrations")
            .run(&db_pool)
            .await
            .context("Failed to run migrations")?;

        // Shared Redis: offset this database's user ids so swipe-intent
        // keys never collide with another test's users.
        sqlx::query("SELECT setval('users_id_seq', $1, false)")
            .bind((index * 100_000) as i64)
            .execute(&db_pool)
            .await
            .context("Failed to offset user id sequence")?;

        let swipe_cache = SwipeCache::connect(&infra.redis_url)
            .await
            .context("Failed to connect to test Redis")?;

        let config = Config {
            database_url: db_url,
            redis_url: infra.redis_url.clone(),
            port: 0,
            h3_resolution: 7,
            discovery_min_age: 18,
            discovery_max_age: 60,
            discovery_page_size: 10,
            swipe_intent_ttl_days: 30,
        };
        let geo = GeoIndex::new(config.h3_resolution)?;
        let deps = ServerDeps::new(db_pool.clone(), swipe_cache.clone(), geo, config);

        Ok(Self {
            db_pool,
            swipe_cache,
            deps,
        })
    }

    pub fn geo(&self) -> &GeoIndex {
        &self.deps.geo
    }
}

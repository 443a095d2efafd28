//! Unit of work: one Postgres transaction per logical operation.
//!
//! The block receives the open transaction and runs every statement of the
//! operation against it, in order. `Ok` commits, `Err` rolls back and the
//! block's error is propagated unchanged. A panic or a cancelled caller
//! drops the transaction, and sqlx rolls back an uncommitted transaction on
//! drop, so the operation can never be left half-committed.
//!
//! The block is handed the transaction itself rather than the coordinator,
//! so a block cannot open a second, nested transaction for the same logical
//! operation.

use futures::future::BoxFuture;
use sqlx::{PgPool, Postgres, Transaction};

use crate::common::CoreError;

/// A transaction open for the duration of one unit-of-work block.
///
/// Model query methods take `impl PgExecutor`, so inside a block they are
/// run against this transaction via `&mut **tx`; outside a block the same
/// methods run against the pool.
pub type UowTransaction = Transaction<'static, Postgres>;

#[derive(Clone)]
pub struct UnitOfWork {
    pool: PgPool,
}

impl UnitOfWork {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run `block` inside a single transaction.
    ///
    /// All writes issued through the transaction either all commit or all
    /// roll back. Errors from the block are returned to the caller as-is;
    /// wrapping with operation context is the block author's job.
    pub async fn execute<T, F>(&self, block: F) -> Result<T, CoreError>
    where
        F: for<'t> FnOnce(&'t mut UowTransaction) -> BoxFuture<'t, Result<T, CoreError>>,
    {
        let mut tx = self.pool.begin().await?;

        match block(&mut tx).await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "transaction rollback failed");
                }
                Err(err)
            }
        }
    }
}

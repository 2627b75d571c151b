use std::panic::{self, AssertUnwindSafe};

use crate::error::MiddlewareDbError;

use super::Connection;

pub const BEGIN_TRAN: &str = "BEGIN TRAN";
pub const COMMIT_TRAN: &str = "COMMIT TRAN";
pub const ROLLBACK_TRAN: &str = "ROLLBACK TRAN";

/// State of the transaction opened by [`Connection::transaction`].
#[derive(Debug, Default)]
pub(crate) struct TransactionState {
    active: bool,
}

impl TransactionState {
    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn level(&self) -> u32 {
        u32::from(self.active)
    }
}

impl Connection {
    /// Run `work` inside a transaction.
    ///
    /// Drivers with trusted native transactions use the handle's own
    /// begin/commit/rollback. All others get literal `BEGIN TRAN` /
    /// `COMMIT TRAN` / `ROLLBACK TRAN` statements on the write handle.
    ///
    /// Exactly one of commit or rollback is issued. When `work` fails the
    /// rollback runs first and the original error is returned unchanged; if
    /// the rollback fails as well both errors come back as
    /// [`MiddlewareDbError::RollbackFailed`]. A panic in `work` is rolled back
    /// and then resumed.
    ///
    /// Transactions do not nest: calling this from inside `work` returns
    /// [`MiddlewareDbError::NestedTransaction`] without touching the handle.
    ///
    /// ```rust,no_run
    /// # use sybase_middleware::prelude::*;
    /// # fn demo(conn: &mut Connection) -> Result<(), MiddlewareDbError> {
    /// let moved = conn.transaction(|tx| {
    ///     let amount = RowValues::Int(10);
    ///     let out = tx.update(
    ///         "update accounts set bal = bal - ? where id = ?",
    ///         &[amount.clone(), RowValues::Int(1)],
    ///     )?;
    ///     let into = tx.update(
    ///         "update accounts set bal = bal + ? where id = ?",
    ///         &[amount, RowValues::Int(2)],
    ///     )?;
    ///     Ok(out + into)
    /// })?;
    /// # let _ = moved;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    /// Returns the error from begin, from `work`, or from commit.
    pub fn transaction<T, F>(&mut self, work: F) -> Result<T, MiddlewareDbError>
    where
        F: FnOnce(&mut Connection) -> Result<T, MiddlewareDbError>,
    {
        if self.tx_state.active {
            return Err(MiddlewareDbError::NestedTransaction);
        }

        self.begin_marker()?;
        self.tx_state.active = true;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| work(&mut *self)));
        self.tx_state.active = false;

        match outcome {
            Ok(Ok(value)) => {
                self.commit_marker()?;
                Ok(value)
            }
            Ok(Err(original)) => {
                tracing::warn!(error = %original, "unit of work failed, rolling back");
                match self.rollback_marker() {
                    Ok(()) => Err(original),
                    Err(rollback) => {
                        tracing::error!(error = %rollback, "rollback failed");
                        Err(MiddlewareDbError::RollbackFailed {
                            original: Box::new(original),
                            rollback: Box::new(rollback),
                        })
                    }
                }
            }
            Err(payload) => {
                tracing::warn!("unit of work panicked, rolling back");
                if let Err(rollback) = self.rollback_marker() {
                    tracing::error!(error = %rollback, "rollback after panic failed");
                }
                panic::resume_unwind(payload)
            }
        }
    }

    /// 1 while a transaction opened by [`transaction`](Connection::transaction)
    /// is running, 0 otherwise.
    #[must_use]
    pub fn transaction_level(&self) -> u32 {
        self.tx_state.level()
    }

    fn begin_marker(&mut self) -> Result<(), MiddlewareDbError> {
        if self.supports_native_transactions() {
            tracing::debug!("begin native transaction");
            self.write.begin_native()
        } else {
            self.pass_through(BEGIN_TRAN)
        }
    }

    fn commit_marker(&mut self) -> Result<(), MiddlewareDbError> {
        if self.supports_native_transactions() {
            tracing::debug!("commit native transaction");
            self.write.commit_native()
        } else {
            self.pass_through(COMMIT_TRAN)
        }
    }

    fn rollback_marker(&mut self) -> Result<(), MiddlewareDbError> {
        if self.supports_native_transactions() {
            tracing::debug!("rollback native transaction");
            self.write.rollback_native()
        } else {
            self.pass_through(ROLLBACK_TRAN)
        }
    }

    /// Raw text straight to the write handle: no bindings, no result, no
    /// dry-run short circuit, no query log.
    fn pass_through(&mut self, sql: &str) -> Result<(), MiddlewareDbError> {
        tracing::debug!(sql, "transaction marker");
        self.write.execute_batch(sql)
    }
}

//! Staged, all-or-nothing settlement of ledger movements.
//!
//! A pool operation first stages every movement it needs, then executes
//! them as a unit. If a ledger rejects a movement, every movement already
//! applied is reverted in reverse order before the error is returned, so
//! the ledgers end exactly where they started.

use super::ledger::{LedgerPair, Movement, PoolSide, Principal};
use crate::error::PoolError;

/// Movements staged for one pool operation.
#[derive(Debug)]
pub struct Settlement {
    custodian: Principal,
    legs: Vec<(PoolSide, Movement)>,
}

impl Settlement {
    /// Starts an empty settlement for the pool custody account `custodian`.
    #[must_use]
    pub fn new(custodian: Principal) -> Self {
        Self {
            custodian,
            legs: Vec::with_capacity(2),
        }
    }

    /// Stages `movement` against the ledger of `side`. Zero-amount movements
    /// are dropped.
    #[must_use]
    pub fn stage(mut self, side: PoolSide, movement: Movement) -> Self {
        if !movement.amount().is_zero() {
            self.legs.push((side, movement));
        }
        self
    }

    /// Applies every staged movement in order.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::TransferRejected`] naming the asset whose ledger
    /// refused; all movements applied before it have been reverted.
    pub fn execute(self, ledgers: &mut LedgerPair) -> Result<(), PoolError> {
        for (index, (side, movement)) in self.legs.iter().enumerate() {
            let ledger = ledgers.get_mut(*side);
            let Err(source) = ledger.apply(self.custodian, movement) else {
                continue;
            };
            let asset = ledger.asset();
            tracing::warn!(%asset, ?movement, error = %source, "ledger rejected movement");

            let applied = self.legs.get(..index).unwrap_or_default();
            for (done_side, done) in applied.iter().rev() {
                let ledger = ledgers.get_mut(*done_side);
                if let Err(err) = ledger.revert(self.custodian, done) {
                    tracing::error!(
                        asset = %ledger.asset(),
                        movement = ?done,
                        error = %err,
                        "failed to revert applied movement"
                    );
                }
            }
            return Err(PoolError::TransferRejected { asset, source });
        }
        Ok(())
    }
}

//! Balance-ledger seam between the pool and the two token accounts.
//!
//! The pool never owns balances itself. It asks one [`BalanceLedger`] per
//! asset to pull value from a caller into the pool's custody account or to
//! push value back out. [`LedgerPair`] binds the two ledgers to the pool's
//! sides.

use std::fmt;

use alloy_primitives::{Address, U256};

/// Identifier of a tradable asset (the token account's address).
pub type AssetId = Address;

/// Opaque identity of a party invoking an operation.
pub type Principal = Address;

/// Reasons a ledger declines a movement of value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The sender does not hold enough of the asset.
    #[error("insufficient balance: {owner} holds {available}, needs {required}")]
    InsufficientBalance {
        /// Account being debited.
        owner: Principal,
        /// Its current balance.
        available: U256,
        /// Amount requested.
        required: U256,
    },

    /// The spender has not been authorized for enough of the owner's balance.
    #[error("insufficient allowance: {spender} may spend {allowed} for {owner}, needs {required}")]
    InsufficientAllowance {
        /// Account being debited.
        owner: Principal,
        /// Account spending on the owner's behalf.
        spender: Principal,
        /// Remaining allowance.
        allowed: U256,
        /// Amount requested.
        required: U256,
    },

    /// Value cannot be sent from this account.
    #[error("invalid sender: {0}")]
    InvalidSender(Principal),

    /// Value cannot be sent to this account.
    #[error("invalid receiver: {0}")]
    InvalidReceiver(Principal),

    /// Crediting the account would overflow 256 bits.
    #[error("balance overflow for {0}")]
    BalanceOverflow(Principal),
}

/// One staged movement of value between the pool custody account and a
/// principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Move `amount` from `owner` into custody, spending custody's allowance.
    Pull {
        /// Account the value is taken from.
        owner: Principal,
        /// Amount in the asset's smallest unit.
        amount: U256,
    },
    /// Move `amount` out of custody to `recipient`.
    Push {
        /// Account receiving the value.
        recipient: Principal,
        /// Amount in the asset's smallest unit.
        amount: U256,
    },
}

impl Movement {
    /// Returns the amount carried by this movement.
    #[must_use]
    pub const fn amount(&self) -> U256 {
        match self {
            Self::Pull { amount, .. } | Self::Push { amount, .. } => *amount,
        }
    }
}

/// Fungible-balance ledger for a single asset.
///
/// Every method is atomic: it either applies completely or returns an error
/// with no effect.
pub trait BalanceLedger: fmt::Debug + Send + Sync {
    /// Asset this ledger accounts for.
    fn asset(&self) -> AssetId;

    /// Human-readable token name.
    fn name(&self) -> &str;

    /// Ticker symbol.
    fn symbol(&self) -> &str;

    /// Decimal places of the smallest unit.
    fn decimals(&self) -> u8;

    /// Total amount in existence.
    fn total_supply(&self) -> U256;

    /// Current balance of `owner`.
    fn balance_of(&self, owner: Principal) -> U256;

    /// Amount `spender` may still move out of `owner`'s balance.
    fn allowance(&self, owner: Principal, spender: Principal) -> U256;

    /// Authorizes `spender` to move up to `amount` out of `owner`'s balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidSender`] or
    /// [`LedgerError::InvalidReceiver`] for the zero address.
    fn approve(
        &mut self,
        owner: Principal,
        spender: Principal,
        amount: U256,
    ) -> Result<(), LedgerError>;

    /// Moves `amount` from `owner` to `recipient` on behalf of `spender`.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError`] if the allowance or balance is too small or
    /// an account is invalid.
    fn transfer_from(
        &mut self,
        spender: Principal,
        owner: Principal,
        recipient: Principal,
        amount: U256,
    ) -> Result<(), LedgerError>;

    /// Moves `amount` from `sender` to `recipient`.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError`] if the balance is too small or an account
    /// is invalid.
    fn transfer(
        &mut self,
        sender: Principal,
        recipient: Principal,
        amount: U256,
    ) -> Result<(), LedgerError>;

    /// Undoes a movement previously applied with [`BalanceLedger::apply`],
    /// restoring balances and any allowance it consumed.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError`] if the ledger can no longer restore the
    /// previous state.
    fn revert(&mut self, custodian: Principal, movement: &Movement) -> Result<(), LedgerError>;

    /// Applies a staged movement relative to the `custodian` account.
    ///
    /// # Errors
    ///
    /// Propagates the rejection of the underlying transfer.
    fn apply(&mut self, custodian: Principal, movement: &Movement) -> Result<(), LedgerError> {
        match *movement {
            Movement::Pull { owner, amount } => {
                self.transfer_from(custodian, owner, custodian, amount)
            }
            Movement::Push { recipient, amount } => self.transfer(custodian, recipient, amount),
        }
    }
}

/// One of the pool's two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolSide {
    /// The first asset.
    A,
    /// The second asset.
    B,
}

impl PoolSide {
    /// Returns the opposite side.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

/// The two ledgers a pool settles against, one per side.
#[derive(Debug)]
pub struct LedgerPair {
    a: Box<dyn BalanceLedger>,
    b: Box<dyn BalanceLedger>,
}

impl LedgerPair {
    /// Pairs the ledgers for side A and side B.
    #[must_use]
    pub fn new(a: Box<dyn BalanceLedger>, b: Box<dyn BalanceLedger>) -> Self {
        Self { a, b }
    }

    /// Returns the ledger for `side`.
    #[must_use]
    pub fn get(&self, side: PoolSide) -> &dyn BalanceLedger {
        match side {
            PoolSide::A => self.a.as_ref(),
            PoolSide::B => self.b.as_ref(),
        }
    }

    /// Returns the ledger for `side` mutably.
    pub fn get_mut(&mut self, side: PoolSide) -> &mut dyn BalanceLedger {
        match side {
            PoolSide::A => self.a.as_mut(),
            PoolSide::B => self.b.as_mut(),
        }
    }

    /// Returns the side whose ledger accounts for `asset`, if any.
    #[must_use]
    pub fn side_of(&self, asset: AssetId) -> Option<PoolSide> {
        if self.a.asset() == asset {
            Some(PoolSide::A)
        } else if self.b.asset() == asset {
            Some(PoolSide::B)
        } else {
            None
        }
    }
}

//! In-memory ERC-20 style token ledger.
//!
//! [`TokenLedger`] backs the two pool assets when the host runs standalone.
//! It keeps balances and allowances in hash maps and follows the usual
//! fungible-token rules: no transfers from or to the zero address, and
//! `transfer_from` consumes the spender's allowance.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};

use super::ledger::{AssetId, BalanceLedger, LedgerError, Movement, Principal};

/// Decimal places of every token minted by this ledger.
pub const TOKEN_DECIMALS: u8 = 18;

/// Fungible token with balances and allowances held in memory.
#[derive(Debug, Clone)]
pub struct TokenLedger {
    asset: AssetId,
    name: String,
    symbol: String,
    total_supply: U256,
    balances: HashMap<Principal, U256>,
    allowances: HashMap<(Principal, Principal), U256>,
}

impl TokenLedger {
    /// Creates an empty token at address `asset`.
    #[must_use]
    pub fn new(asset: AssetId, name: &str, symbol: &str) -> Self {
        Self {
            asset,
            name: name.to_string(),
            symbol: symbol.to_string(),
            total_supply: U256::ZERO,
            balances: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    /// Creates `amount` new tokens owned by `to`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidReceiver`] for the zero address and
    /// [`LedgerError::BalanceOverflow`] if the supply would overflow.
    pub fn mint(&mut self, to: Principal, amount: U256) -> Result<(), LedgerError> {
        if to.is_zero() {
            return Err(LedgerError::InvalidReceiver(to));
        }
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow(to))?;
        self.credit(to, amount)?;
        self.total_supply = supply;
        Ok(())
    }

    fn credit(&mut self, to: Principal, amount: U256) -> Result<(), LedgerError> {
        let balance = self.balances.entry(to).or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow(to))?;
        Ok(())
    }

    /// Moves value between two accounts without address checks.
    fn move_balance(
        &mut self,
        from: Principal,
        to: Principal,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let available = self.balance_of(from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                owner: from,
                available,
                required: amount,
            })?;
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow(to))?;
        self.balances.insert(from, remaining);
        self.balances.insert(to, credited);
        Ok(())
    }
}

impl BalanceLedger for TokenLedger {
    fn asset(&self) -> AssetId {
        self.asset
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn decimals(&self) -> u8 {
        TOKEN_DECIMALS
    }

    fn total_supply(&self) -> U256 {
        self.total_supply
    }

    fn balance_of(&self, owner: Principal) -> U256 {
        self.balances.get(&owner).copied().unwrap_or_default()
    }

    fn allowance(&self, owner: Principal, spender: Principal) -> U256 {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    fn approve(
        &mut self,
        owner: Principal,
        spender: Principal,
        amount: U256,
    ) -> Result<(), LedgerError> {
        if owner.is_zero() {
            return Err(LedgerError::InvalidSender(owner));
        }
        if spender.is_zero() {
            return Err(LedgerError::InvalidReceiver(spender));
        }
        self.allowances.insert((owner, spender), amount);
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: Principal,
        owner: Principal,
        recipient: Principal,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let allowed = self.allowance(owner, spender);
        let remaining = allowed
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientAllowance {
                owner,
                spender,
                allowed,
                required: amount,
            })?;
        self.transfer(owner, recipient, amount)?;
        if allowed != U256::MAX {
            self.allowances.insert((owner, spender), remaining);
        }
        Ok(())
    }

    fn transfer(
        &mut self,
        sender: Principal,
        recipient: Principal,
        amount: U256,
    ) -> Result<(), LedgerError> {
        if sender.is_zero() {
            return Err(LedgerError::InvalidSender(sender));
        }
        if recipient.is_zero() {
            return Err(LedgerError::InvalidReceiver(recipient));
        }
        self.move_balance(sender, recipient, amount)
    }

    fn revert(&mut self, custodian: Principal, movement: &Movement) -> Result<(), LedgerError> {
        match *movement {
            Movement::Pull { owner, amount } => {
                let allowed = self.allowance(owner, custodian);
                let restored = if allowed == U256::MAX {
                    allowed
                } else {
                    allowed
                        .checked_add(amount)
                        .ok_or(LedgerError::BalanceOverflow(owner))?
                };
                self.move_balance(custodian, owner, amount)?;
                self.allowances.insert((owner, custodian), restored);
                Ok(())
            }
            Movement::Push { recipient, amount } => {
                self.move_balance(recipient, custodian, amount)
            }
        }
    }
}

//! Two-asset constant-product pool engine.
//!
//! [`Pool`] owns the reserve state. Each mutating operation validates its
//! inputs against the current reserves, computes the next reserves, settles
//! the required ledger movements through a [`Settlement`], and only then
//! commits the new reserves. Any failure leaves both the reserves and the
//! ledgers exactly as they were.

use alloy_primitives::U256;
use serde::Serialize;

use super::ledger::{AssetId, LedgerPair, Movement, PoolSide, Principal};
use super::math;
use super::settlement::Settlement;
use crate::error::PoolError;

/// Direction of a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapDirection {
    /// Sell asset A, receive asset B.
    AToB,
    /// Sell asset B, receive asset A.
    BToA,
}

impl SwapDirection {
    /// Side receiving the input.
    #[must_use]
    pub const fn input(self) -> PoolSide {
        match self {
            Self::AToB => PoolSide::A,
            Self::BToA => PoolSide::B,
        }
    }

    /// Side paying the output.
    #[must_use]
    pub const fn output(self) -> PoolSide {
        self.input().other()
    }

    /// Direction that sells the asset on `side`.
    #[must_use]
    pub const fn selling(side: PoolSide) -> Self {
        match side {
            PoolSide::A => Self::AToB,
            PoolSide::B => Self::BToA,
        }
    }
}

/// Record of a committed liquidity change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidityReceipt {
    /// Principal that added or removed liquidity.
    pub caller: Principal,
    /// Amount of asset A moved.
    pub amount_a: U256,
    /// Amount of asset B moved.
    pub amount_b: U256,
    /// Reserve of asset A after the change.
    pub reserve_a: U256,
    /// Reserve of asset B after the change.
    pub reserve_b: U256,
}

/// Record of a committed swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapReceipt {
    /// Principal that swapped.
    pub caller: Principal,
    /// Asset sold to the pool.
    pub asset_in: AssetId,
    /// Amount sold.
    pub amount_in: U256,
    /// Asset bought from the pool.
    pub asset_out: AssetId,
    /// Amount bought.
    pub amount_out: U256,
    /// Part of `amount_in` withheld as fee.
    pub fee: U256,
    /// Reserve of asset A after the swap.
    pub reserve_a: U256,
    /// Reserve of asset B after the swap.
    pub reserve_b: U256,
}

/// Reserve state of a two-asset pool.
///
/// Reserves change only through [`Pool::add_liquidity`],
/// [`Pool::remove_liquidity`] and the swap operations. The asset
/// identifiers, creator and custody account are fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    asset_a: AssetId,
    asset_b: AssetId,
    creator: Principal,
    custodian: Principal,
    reserve_a: U256,
    reserve_b: U256,
}

impl Pool {
    /// Creates an empty pool trading `asset_a` against `asset_b`.
    ///
    /// `custodian` is the account holding the pool's balances on both
    /// ledgers. `creator` is recorded for provenance only.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidAsset`] if an asset is the zero address or both
    ///   assets are the same.
    /// - [`PoolError::InvalidPrincipal`] if `custodian` is the zero address.
    pub fn create(
        asset_a: AssetId,
        asset_b: AssetId,
        creator: Principal,
        custodian: Principal,
    ) -> Result<Self, PoolError> {
        if asset_a.is_zero() {
            return Err(PoolError::InvalidAsset(
                "asset A is the zero address".to_string(),
            ));
        }
        if asset_b.is_zero() {
            return Err(PoolError::InvalidAsset(
                "asset B is the zero address".to_string(),
            ));
        }
        if asset_a == asset_b {
            return Err(PoolError::InvalidAsset(format!(
                "asset A and asset B are both {asset_a}"
            )));
        }
        if custodian.is_zero() {
            return Err(PoolError::InvalidPrincipal(custodian));
        }
        Ok(Self {
            asset_a,
            asset_b,
            creator,
            custodian,
            reserve_a: U256::ZERO,
            reserve_b: U256::ZERO,
        })
    }

    /// First traded asset.
    #[must_use]
    pub const fn asset_a(&self) -> AssetId {
        self.asset_a
    }

    /// Second traded asset.
    #[must_use]
    pub const fn asset_b(&self) -> AssetId {
        self.asset_b
    }

    /// Principal that created the pool.
    #[must_use]
    pub const fn creator(&self) -> Principal {
        self.creator
    }

    /// Account holding the pool's balances.
    #[must_use]
    pub const fn custodian(&self) -> Principal {
        self.custodian
    }

    /// Current reserve of asset A.
    #[must_use]
    pub const fn reserve_a(&self) -> U256 {
        self.reserve_a
    }

    /// Current reserve of asset B.
    #[must_use]
    pub const fn reserve_b(&self) -> U256 {
        self.reserve_b
    }

    /// Asset traded on `side`.
    #[must_use]
    pub const fn asset(&self, side: PoolSide) -> AssetId {
        match side {
            PoolSide::A => self.asset_a,
            PoolSide::B => self.asset_b,
        }
    }

    /// Reserve held on `side`.
    #[must_use]
    pub const fn reserve(&self, side: PoolSide) -> U256 {
        match side {
            PoolSide::A => self.reserve_a,
            PoolSide::B => self.reserve_b,
        }
    }

    /// Side trading `asset`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::UnknownAsset`] if `asset` is not traded here.
    pub fn side_of(&self, asset: AssetId) -> Result<PoolSide, PoolError> {
        if asset == self.asset_a {
            Ok(PoolSide::A)
        } else if asset == self.asset_b {
            Ok(PoolSide::B)
        } else {
            Err(PoolError::UnknownAsset(asset))
        }
    }

    /// Rejects callers that cannot move funds against this pool.
    ///
    /// The custody account would only move balances to itself, so reserves
    /// would drift from what the pool actually holds.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidPrincipal`] for the zero address or the
    /// custody account.
    pub fn check_caller(&self, caller: Principal) -> Result<(), PoolError> {
        if caller.is_zero() || caller == self.custodian {
            return Err(PoolError::InvalidPrincipal(caller));
        }
        Ok(())
    }

    /// Checks that `ledgers` account for this pool's assets on the matching
    /// sides.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidAsset`] on a mismatch.
    pub fn check_ledgers(&self, ledgers: &LedgerPair) -> Result<(), PoolError> {
        for side in [PoolSide::A, PoolSide::B] {
            let bound = ledgers.get(side).asset();
            if bound != self.asset(side) {
                return Err(PoolError::InvalidAsset(format!(
                    "ledger for side {side:?} accounts for {bound}, expected {}",
                    self.asset(side)
                )));
            }
        }
        Ok(())
    }

    /// `reserve_a * reserve_b` without overflow.
    #[must_use]
    pub fn k(&self) -> alloy_primitives::U512 {
        math::invariant(self.reserve_a, self.reserve_b)
    }

    /// Deposits `amount_a` and `amount_b` from `caller` into the pool.
    ///
    /// No ratio is enforced against the existing reserves.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidPrincipal`] if `caller` is the custody account.
    /// - [`PoolError::InvalidAmount`] if either amount is zero.
    /// - [`PoolError::TransferRejected`] if a ledger refuses to pull funds.
    /// - [`PoolError::ArithmeticOverflow`] if a reserve would overflow.
    pub fn add_liquidity(
        &mut self,
        ledgers: &mut LedgerPair,
        caller: Principal,
        amount_a: U256,
        amount_b: U256,
    ) -> Result<LiquidityReceipt, PoolError> {
        self.check_caller(caller)?;
        if amount_a.is_zero() || amount_b.is_zero() {
            return Err(PoolError::InvalidAmount);
        }
        let reserve_a = self
            .reserve_a
            .checked_add(amount_a)
            .ok_or(PoolError::ArithmeticOverflow)?;
        let reserve_b = self
            .reserve_b
            .checked_add(amount_b)
            .ok_or(PoolError::ArithmeticOverflow)?;

        Settlement::new(self.custodian)
            .stage(
                PoolSide::A,
                Movement::Pull {
                    owner: caller,
                    amount: amount_a,
                },
            )
            .stage(
                PoolSide::B,
                Movement::Pull {
                    owner: caller,
                    amount: amount_b,
                },
            )
            .execute(ledgers)?;

        self.reserve_a = reserve_a;
        self.reserve_b = reserve_b;
        Ok(LiquidityReceipt {
            caller,
            amount_a,
            amount_b,
            reserve_a,
            reserve_b,
        })
    }

    /// Withdraws `amount_a` and `amount_b` from the pool to `caller`.
    ///
    /// Any caller may withdraw up to the full reserves; no per-provider
    /// share is tracked.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidPrincipal`] if `caller` is the custody account.
    /// - [`PoolError::InvalidAmount`] if both amounts are zero.
    /// - [`PoolError::InsufficientLiquidity`] if either amount exceeds its
    ///   reserve.
    /// - [`PoolError::TransferRejected`] if a ledger refuses to pay out.
    pub fn remove_liquidity(
        &mut self,
        ledgers: &mut LedgerPair,
        caller: Principal,
        amount_a: U256,
        amount_b: U256,
    ) -> Result<LiquidityReceipt, PoolError> {
        self.check_caller(caller)?;
        if amount_a.is_zero() && amount_b.is_zero() {
            return Err(PoolError::InvalidAmount);
        }
        let (Some(reserve_a), Some(reserve_b)) = (
            self.reserve_a.checked_sub(amount_a),
            self.reserve_b.checked_sub(amount_b),
        ) else {
            return Err(PoolError::InsufficientLiquidity);
        };

        Settlement::new(self.custodian)
            .stage(
                PoolSide::A,
                Movement::Push {
                    recipient: caller,
                    amount: amount_a,
                },
            )
            .stage(
                PoolSide::B,
                Movement::Push {
                    recipient: caller,
                    amount: amount_b,
                },
            )
            .execute(ledgers)?;

        self.reserve_a = reserve_a;
        self.reserve_b = reserve_b;
        Ok(LiquidityReceipt {
            caller,
            amount_a,
            amount_b,
            reserve_a,
            reserve_b,
        })
    }

    /// Output `caller` would receive for selling `amount_in` in `direction`,
    /// computed against the current reserves without mutating anything.
    ///
    /// # Errors
    ///
    /// Same validation errors as [`Pool::swap`].
    pub fn quote(&self, direction: SwapDirection, amount_in: U256) -> Result<U256, PoolError> {
        math::amount_out(
            amount_in,
            self.reserve(direction.input()),
            self.reserve(direction.output()),
        )
    }

    /// Sells `amount_in` of asset A for asset B.
    ///
    /// # Errors
    ///
    /// See [`Pool::swap`].
    pub fn swap_a_for_b(
        &mut self,
        ledgers: &mut LedgerPair,
        caller: Principal,
        amount_in: U256,
    ) -> Result<SwapReceipt, PoolError> {
        self.swap(ledgers, caller, SwapDirection::AToB, amount_in)
    }

    /// Sells `amount_in` of asset B for asset A.
    ///
    /// # Errors
    ///
    /// See [`Pool::swap`].
    pub fn swap_b_for_a(
        &mut self,
        ledgers: &mut LedgerPair,
        caller: Principal,
        amount_in: U256,
    ) -> Result<SwapReceipt, PoolError> {
        self.swap(ledgers, caller, SwapDirection::BToA, amount_in)
    }

    /// Sells `amount_in` of the input asset of `direction` at the
    /// fee-adjusted constant-product price.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidPrincipal`] if `caller` is the custody account.
    /// - [`PoolError::InvalidAmount`] if `amount_in` is zero.
    /// - [`PoolError::InsufficientOutput`] if the output rounds to zero or
    ///   exceeds the output reserve.
    /// - [`PoolError::TransferRejected`] if a ledger refuses either leg.
    /// - [`PoolError::ArithmeticOverflow`] on 256-bit overflow.
    pub fn swap(
        &mut self,
        ledgers: &mut LedgerPair,
        caller: Principal,
        direction: SwapDirection,
        amount_in: U256,
    ) -> Result<SwapReceipt, PoolError> {
        self.check_caller(caller)?;
        let input = direction.input();
        let output = direction.output();
        let amount_out = self.quote(direction, amount_in)?;

        let reserve_in = self
            .reserve(input)
            .checked_add(amount_in)
            .ok_or(PoolError::ArithmeticOverflow)?;
        let reserve_out = self
            .reserve(output)
            .checked_sub(amount_out)
            .ok_or(PoolError::InsufficientOutput)?;

        Settlement::new(self.custodian)
            .stage(
                input,
                Movement::Pull {
                    owner: caller,
                    amount: amount_in,
                },
            )
            .stage(
                output,
                Movement::Push {
                    recipient: caller,
                    amount: amount_out,
                },
            )
            .execute(ledgers)?;

        let k_before = self.k();
        match direction {
            SwapDirection::AToB => {
                self.reserve_a = reserve_in;
                self.reserve_b = reserve_out;
            }
            SwapDirection::BToA => {
                self.reserve_b = reserve_in;
                self.reserve_a = reserve_out;
            }
        }
        debug_assert!(self.k() >= k_before, "swap decreased the k-invariant");

        Ok(SwapReceipt {
            caller,
            asset_in: self.asset(input),
            amount_in,
            asset_out: self.asset(output),
            amount_out,
            fee: math::fee_amount(amount_in),
            reserve_a: self.reserve_a,
            reserve_b: self.reserve_b,
        })
    }

    /// Price of `asset` denominated in the other asset, scaled by
    /// [`math::SCALE`].
    ///
    /// # Errors
    ///
    /// - [`PoolError::UnknownAsset`] if `asset` is not traded here.
    /// - [`PoolError::EmptyPool`] if the reserve of `asset` is zero.
    /// - [`PoolError::ArithmeticOverflow`] on 256-bit overflow.
    pub fn get_price(&self, asset: AssetId) -> Result<U256, PoolError> {
        let side = self.side_of(asset)?;
        math::spot_price(self.reserve(side), self.reserve(side.other()))?
            .ok_or(PoolError::EmptyPool(asset))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::ledger::BalanceLedger;
    use crate::domain::token_ledger::TokenLedger;
    use alloy_primitives::Address;
    use tokio_test::assert_ok;

    fn token_a() -> Address {
        Address::repeat_byte(0xaa)
    }

    fn token_b() -> Address {
        Address::repeat_byte(0xbb)
    }

    fn owner() -> Address {
        Address::repeat_byte(0x01)
    }

    fn custody() -> Address {
        Address::repeat_byte(0x0f)
    }

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    fn setup() -> (Pool, LedgerPair) {
        let mut a = TokenLedger::new(token_a(), "TokenA", "TKA");
        let mut b = TokenLedger::new(token_b(), "TokenB", "TKB");
        assert_ok!(a.mint(owner(), u(1_000_000)));
        assert_ok!(b.mint(owner(), u(1_000_000)));
        assert_ok!(a.approve(owner(), custody(), U256::MAX));
        assert_ok!(b.approve(owner(), custody(), U256::MAX));
        let Ok(pool) = Pool::create(token_a(), token_b(), owner(), custody()) else {
            panic!("valid pool");
        };
        (pool, LedgerPair::new(Box::new(a), Box::new(b)))
    }

    #[test]
    fn create_rejects_bad_assets() {
        assert!(matches!(
            Pool::create(Address::ZERO, token_b(), owner(), custody()),
            Err(PoolError::InvalidAsset(_))
        ));
        assert!(matches!(
            Pool::create(token_a(), token_a(), owner(), custody()),
            Err(PoolError::InvalidAsset(_))
        ));
        assert_eq!(
            Pool::create(token_a(), token_b(), owner(), Address::ZERO),
            Err(PoolError::InvalidPrincipal(Address::ZERO))
        );
    }

    #[test]
    fn new_pool_is_empty() {
        let (pool, ledgers) = setup();
        assert_eq!(pool.reserve_a(), U256::ZERO);
        assert_eq!(pool.reserve_b(), U256::ZERO);
        assert_eq!(pool.creator(), owner());
        assert_ok!(pool.check_ledgers(&ledgers));
    }

    #[test]
    fn mismatched_ledgers_are_rejected() {
        let (pool, _) = setup();
        let swapped = LedgerPair::new(
            Box::new(TokenLedger::new(token_b(), "TokenB", "TKB")),
            Box::new(TokenLedger::new(token_a(), "TokenA", "TKA")),
        );
        assert!(matches!(
            pool.check_ledgers(&swapped),
            Err(PoolError::InvalidAsset(_))
        ));
    }

    #[test]
    fn add_liquidity_moves_funds_into_custody() {
        let (mut pool, mut ledgers) = setup();
        let Ok(receipt) = pool.add_liquidity(&mut ledgers, owner(), u(100), u(200)) else {
            panic!("add liquidity failed");
        };
        assert_eq!(receipt.reserve_a, u(100));
        assert_eq!(receipt.reserve_b, u(200));
        assert_eq!(ledgers.get(PoolSide::A).balance_of(custody()), u(100));
        assert_eq!(ledgers.get(PoolSide::B).balance_of(custody()), u(200));
    }

    #[test]
    fn swap_reference_trade() {
        let (mut pool, mut ledgers) = setup();
        assert_ok!(pool.add_liquidity(&mut ledgers, owner(), u(100), u(200)));

        let Ok(receipt) = pool.swap_a_for_b(&mut ledgers, owner(), u(10)) else {
            panic!("swap failed");
        };
        assert_eq!(receipt.amount_out, u(18));
        assert_eq!(receipt.asset_in, token_a());
        assert_eq!(receipt.asset_out, token_b());
        assert_eq!(pool.reserve_a(), u(110));
        assert_eq!(pool.reserve_b(), u(182));
    }

    #[test]
    fn swap_b_for_a_mirrors() {
        let (mut pool, mut ledgers) = setup();
        assert_ok!(pool.add_liquidity(&mut ledgers, owner(), u(200), u(100)));

        let Ok(receipt) = pool.swap_b_for_a(&mut ledgers, owner(), u(10)) else {
            panic!("swap failed");
        };
        assert_eq!(receipt.amount_out, u(18));
        assert_eq!(pool.reserve_b(), u(110));
        assert_eq!(pool.reserve_a(), u(182));
    }

    #[test]
    fn quote_does_not_mutate() {
        let (mut pool, mut ledgers) = setup();
        assert_ok!(pool.add_liquidity(&mut ledgers, owner(), u(100), u(200)));
        let before = pool.clone();
        assert_eq!(pool.quote(SwapDirection::AToB, u(10)), Ok(u(18)));
        assert_eq!(pool, before);
    }

    #[test]
    fn remove_more_than_reserve_fails() {
        let (mut pool, mut ledgers) = setup();
        assert_ok!(pool.add_liquidity(&mut ledgers, owner(), u(100), u(200)));
        assert_eq!(
            pool.remove_liquidity(&mut ledgers, owner(), u(200), u(400)),
            Err(PoolError::InsufficientLiquidity)
        );
        assert_eq!(
            pool.remove_liquidity(&mut ledgers, owner(), u(50), u(201)),
            Err(PoolError::InsufficientLiquidity)
        );
        assert_eq!(pool.reserve_a(), u(100));
    }

    #[test]
    fn custody_account_cannot_trade_against_itself() {
        let (mut pool, mut ledgers) = setup();
        assert_ok!(pool.add_liquidity(&mut ledgers, owner(), u(100), u(200)));
        assert_ok!(ledgers.get_mut(PoolSide::A).approve(custody(), custody(), U256::MAX));
        assert_ok!(ledgers.get_mut(PoolSide::B).approve(custody(), custody(), U256::MAX));
        let before = pool.clone();

        let rejected = Err(PoolError::InvalidPrincipal(custody()));
        assert_eq!(
            pool.add_liquidity(&mut ledgers, custody(), u(100), u(200)).map(|_| ()),
            rejected
        );
        assert_eq!(
            pool.remove_liquidity(&mut ledgers, custody(), u(10), u(20)).map(|_| ()),
            rejected
        );
        assert_eq!(
            pool.swap_a_for_b(&mut ledgers, custody(), u(10)).map(|_| ()),
            rejected
        );
        assert_eq!(pool, before);
        assert_eq!(ledgers.get(PoolSide::A).balance_of(custody()), u(100));
        assert_eq!(ledgers.get(PoolSide::B).balance_of(custody()), u(200));

        assert_ok!(pool.remove_liquidity(&mut ledgers, owner(), u(100), u(200)));
    }

    #[test]
    fn remove_nothing_is_invalid() {
        let (mut pool, mut ledgers) = setup();
        assert_eq!(
            pool.remove_liquidity(&mut ledgers, owner(), U256::ZERO, U256::ZERO),
            Err(PoolError::InvalidAmount)
        );
    }

    #[test]
    fn remove_one_side_only() {
        let (mut pool, mut ledgers) = setup();
        assert_ok!(pool.add_liquidity(&mut ledgers, owner(), u(100), u(200)));
        assert_ok!(pool.remove_liquidity(&mut ledgers, owner(), u(40), U256::ZERO));
        assert_eq!(pool.reserve_a(), u(60));
        assert_eq!(pool.reserve_b(), u(200));
    }

    #[test]
    fn prices_in_both_directions() {
        let (mut pool, mut ledgers) = setup();
        assert_ok!(pool.add_liquidity(&mut ledgers, owner(), u(100), u(200)));
        assert_eq!(pool.get_price(token_a()), Ok(u(2) * math::SCALE));
        assert_eq!(pool.get_price(token_b()), Ok(math::SCALE / u(2)));
    }

    #[test]
    fn price_on_empty_pool_is_rejected() {
        let (pool, _) = setup();
        assert_eq!(
            pool.get_price(token_a()),
            Err(PoolError::EmptyPool(token_a()))
        );
    }

    #[test]
    fn price_of_unknown_asset_is_rejected() {
        let (pool, _) = setup();
        let other = Address::repeat_byte(0xcc);
        assert_eq!(pool.get_price(other), Err(PoolError::UnknownAsset(other)));
    }

    #[test]
    fn direction_sides() {
        assert_eq!(SwapDirection::AToB.input(), PoolSide::A);
        assert_eq!(SwapDirection::AToB.output(), PoolSide::B);
        assert_eq!(SwapDirection::selling(PoolSide::B), SwapDirection::BToA);
    }
}

//! Property tests for the constant-product pool engine.
//!
//! Exercises the engine directly against in-memory token ledgers, without
//! the HTTP host.

#![allow(clippy::panic)]

use alloy_primitives::{Address, U256, U512, address};
use simple_dex::domain::math::SCALE;
use simple_dex::domain::{BalanceLedger, LedgerPair, Pool, PoolSide, TokenLedger};
use simple_dex::error::PoolError;

const ASSET_A: Address = address!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
const ASSET_B: Address = address!("0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");
const LP: Address = address!("0x0000000000000000000000000000000000000001");
const TRADER: Address = address!("0x0000000000000000000000000000000000000002");
const STRANGER: Address = address!("0x0000000000000000000000000000000000000003");
const CUSTODY: Address = address!("0x000000000000000000000000000000000000000f");

fn u(v: u64) -> U256 {
    U256::from(v)
}

fn wide(v: U256) -> U512 {
    v.widening_mul(U256::from(1u64))
}

/// Pool plus ledgers where `LP` and `TRADER` hold `supply` of both assets
/// and have approved the custody account without limit.
struct Fixture {
    pool: Pool,
    ledgers: LedgerPair,
}

impl Fixture {
    fn new(supply: U256) -> Self {
        let mut token_a = TokenLedger::new(ASSET_A, "TokenA", "TKA");
        let mut token_b = TokenLedger::new(ASSET_B, "TokenB", "TKB");
        for who in [LP, TRADER] {
            for token in [&mut token_a, &mut token_b] {
                let (Ok(()), Ok(())) = (
                    token.mint(who, supply),
                    token.approve(who, CUSTODY, U256::MAX),
                ) else {
                    panic!("fixture setup failed");
                };
            }
        }
        let Ok(pool) = Pool::create(ASSET_A, ASSET_B, LP, CUSTODY) else {
            panic!("valid pool");
        };
        Self {
            pool,
            ledgers: LedgerPair::new(Box::new(token_a), Box::new(token_b)),
        }
    }

    fn seeded(reserve_a: u64, reserve_b: u64) -> Self {
        let mut fixture = Self::new(u(1_000_000_000_000));
        let result = fixture.add(LP, u(reserve_a), u(reserve_b));
        assert!(result.is_ok(), "seeding failed: {result:?}");
        fixture
    }

    fn add(&mut self, who: Address, a: U256, b: U256) -> Result<(), PoolError> {
        self.pool
            .add_liquidity(&mut self.ledgers, who, a, b)
            .map(|_| ())
    }

    fn remove(&mut self, who: Address, a: U256, b: U256) -> Result<(), PoolError> {
        self.pool
            .remove_liquidity(&mut self.ledgers, who, a, b)
            .map(|_| ())
    }

    fn reserves(&self) -> (U256, U256) {
        (self.pool.reserve_a(), self.pool.reserve_b())
    }

    fn balance(&self, side: PoolSide, who: Address) -> U256 {
        self.ledgers.get(side).balance_of(who)
    }
}

#[test]
fn add_liquidity_increases_reserves_exactly() {
    let mut fx = Fixture::seeded(1_000, 3_000);
    for (a, b) in [(1u64, 1u64), (7, 300), (12_345, 2)] {
        let before = fx.reserves();
        assert!(fx.add(LP, u(a), u(b)).is_ok());
        assert_eq!(fx.reserves(), (before.0 + u(a), before.1 + u(b)));
    }
}

#[test]
fn zero_amount_liquidity_fails_and_keeps_reserves() {
    let mut fx = Fixture::seeded(100, 200);
    for (a, b) in [(0u64, 5u64), (5, 0), (0, 0)] {
        assert_eq!(fx.add(LP, u(a), u(b)), Err(PoolError::InvalidAmount));
        assert_eq!(fx.reserves(), (u(100), u(200)));
    }
    assert_eq!(
        fx.remove(LP, U256::ZERO, U256::ZERO),
        Err(PoolError::InvalidAmount)
    );
}

#[test]
fn remove_liquidity_within_reserves_is_exact() {
    let mut fx = Fixture::seeded(500, 800);
    assert!(fx.remove(STRANGER, u(200), u(0)).is_ok());
    assert_eq!(fx.reserves(), (u(300), u(800)));
    assert_eq!(fx.balance(PoolSide::A, STRANGER), u(200));

    assert!(fx.remove(TRADER, u(300), u(800)).is_ok());
    assert_eq!(fx.reserves(), (U256::ZERO, U256::ZERO));
}

#[test]
fn overdrawn_removal_fails_without_effect() {
    let mut fx = Fixture::seeded(500, 800);
    for (a, b) in [(501u64, 0u64), (0, 801), (501, 801)] {
        assert_eq!(
            fx.remove(LP, u(a), u(b)),
            Err(PoolError::InsufficientLiquidity)
        );
        assert_eq!(fx.reserves(), (u(500), u(800)));
    }
}

#[test]
fn reference_swap_matches_integer_formula() {
    let mut fx = Fixture::seeded(100, 200);
    let before_b = fx.balance(PoolSide::B, TRADER);

    let result = fx.pool.swap_a_for_b(&mut fx.ledgers, TRADER, u(10));
    let Ok(receipt) = result else {
        panic!("swap failed: {result:?}");
    };
    assert_eq!(receipt.amount_out, u(18));
    assert_eq!(receipt.asset_in, ASSET_A);
    assert_eq!(receipt.asset_out, ASSET_B);
    assert_eq!(fx.reserves(), (u(110), u(182)));
    assert_eq!(fx.balance(PoolSide::B, TRADER), before_b + u(18));
    assert_eq!(fx.balance(PoolSide::A, CUSTODY), u(110));
}

#[test]
fn k_never_decreases_over_a_swap_sequence() {
    let mut fx = Fixture::seeded(1_000_000, 2_500_000);
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    for step in 0..200 {
        seed = seed
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        let amount = u((seed >> 33) % 50_000 + 1);
        let k_before = fx.pool.k();
        let result = if seed & 1 == 0 {
            fx.pool.swap_a_for_b(&mut fx.ledgers, TRADER, amount)
        } else {
            fx.pool.swap_b_for_a(&mut fx.ledgers, TRADER, amount)
        };
        match result {
            Ok(_) => assert!(fx.pool.k() >= k_before, "k decreased at step {step}"),
            Err(PoolError::InsufficientOutput) => assert_eq!(fx.pool.k(), k_before),
            Err(other) => panic!("unexpected error at step {step}: {other:?}"),
        }
    }
}

#[test]
fn price_product_is_scale_squared_within_rounding() {
    let scale_sq: U512 = SCALE.widening_mul(SCALE);

    let fx = Fixture::seeded(100, 200);
    let (Ok(pa), Ok(pb)) = (fx.pool.get_price(ASSET_A), fx.pool.get_price(ASSET_B)) else {
        panic!("prices defined");
    };
    assert_eq!(pa, SCALE * u(2));
    let product: U512 = pa.widening_mul(pb);
    assert_eq!(product, scale_sq);

    let fx = Fixture::seeded(3, 7);
    let (Ok(pa), Ok(pb)) = (fx.pool.get_price(ASSET_A), fx.pool.get_price(ASSET_B)) else {
        panic!("prices defined");
    };
    let product: U512 = pa.widening_mul(pb);
    assert!(product <= scale_sq);
    // floor(x) * floor(y) misses x * y by less than floor(x) + floor(y) + 1.
    let slack = wide(pa) + wide(pb);
    assert!(scale_sq - product <= slack);
}

#[test]
fn price_queries_reject_unknown_and_empty() {
    let fx = Fixture::new(u(1_000));
    assert_eq!(
        fx.pool.get_price(STRANGER),
        Err(PoolError::UnknownAsset(STRANGER))
    );
    assert_eq!(
        fx.pool.get_price(ASSET_A),
        Err(PoolError::EmptyPool(ASSET_A))
    );
}

#[test]
fn oversized_swap_on_tiny_pool_fails() {
    let mut fx = Fixture::new(U256::MAX / u(2));
    assert!(fx.add(LP, u(1), u(1)).is_ok());

    let huge = U256::from(10u64).pow(u(30));
    let result = fx.pool.swap_a_for_b(&mut fx.ledgers, TRADER, huge);
    assert_eq!(result.map(|_| ()), Err(PoolError::InsufficientOutput));
    assert_eq!(fx.reserves(), (u(1), u(1)));
}

#[test]
fn zero_swaps_always_fail() {
    for fx in [Fixture::new(u(10)), Fixture::seeded(100, 200)] {
        let mut fx = fx;
        let before = fx.reserves();
        assert_eq!(
            fx.pool
                .swap_a_for_b(&mut fx.ledgers, TRADER, U256::ZERO)
                .map(|_| ()),
            Err(PoolError::InvalidAmount)
        );
        assert_eq!(
            fx.pool
                .swap_b_for_a(&mut fx.ledgers, TRADER, U256::ZERO)
                .map(|_| ()),
            Err(PoolError::InvalidAmount)
        );
        assert_eq!(fx.reserves(), before);
    }
}

#[test]
fn add_then_remove_round_trips() {
    let mut fx = Fixture::seeded(4_000, 9_000);
    let before = fx.reserves();
    let lp_a = fx.balance(PoolSide::A, LP);

    assert!(fx.add(LP, u(123), u(456)).is_ok());
    assert!(fx.remove(LP, u(123), u(456)).is_ok());

    assert_eq!(fx.reserves(), before);
    assert_eq!(fx.balance(PoolSide::A, LP), lp_a);
}

#[test]
fn rejected_transfer_leaves_everything_unchanged() {
    let mut fx = Fixture::seeded(100, 200);

    // STRANGER holds asset A with an allowance but no asset B at all.
    let Ok(()) = fx
        .ledgers
        .get_mut(PoolSide::A)
        .transfer(LP, STRANGER, u(50))
    else {
        panic!("funding stranger failed");
    };
    let Ok(()) = fx
        .ledgers
        .get_mut(PoolSide::A)
        .approve(STRANGER, CUSTODY, u(50))
    else {
        panic!("approval failed");
    };

    let result = fx.add(STRANGER, u(50), u(50));
    let Err(PoolError::TransferRejected { asset, .. }) = result else {
        panic!("expected transfer rejection, got {result:?}");
    };
    assert_eq!(asset, ASSET_B);
    assert_eq!(fx.reserves(), (u(100), u(200)));
    assert_eq!(fx.balance(PoolSide::A, STRANGER), u(50));
    assert_eq!(fx.balance(PoolSide::A, CUSTODY), u(100));
    assert_eq!(fx.ledgers.get(PoolSide::A).allowance(STRANGER, CUSTODY), u(50));

    let swap = fx.pool.swap_b_for_a(&mut fx.ledgers, STRANGER, u(10));
    assert!(matches!(swap, Err(PoolError::TransferRejected { .. })));
    assert_eq!(fx.reserves(), (u(100), u(200)));
}

#[test]
fn reserves_stay_equal_to_custody_balances() {
    let mut fx = Fixture::seeded(100, 200);
    for side in [PoolSide::A, PoolSide::B] {
        let Ok(()) = fx.ledgers.get_mut(side).approve(CUSTODY, CUSTODY, U256::MAX) else {
            panic!("self-approval failed");
        };
    }

    assert_eq!(
        fx.add(CUSTODY, u(100), u(200)),
        Err(PoolError::InvalidPrincipal(CUSTODY))
    );
    let swap = fx.pool.swap_a_for_b(&mut fx.ledgers, CUSTODY, u(10));
    assert!(matches!(swap, Err(PoolError::InvalidPrincipal(who)) if who == CUSTODY));
    assert_eq!(
        fx.remove(CUSTODY, u(1), u(1)),
        Err(PoolError::InvalidPrincipal(CUSTODY))
    );

    let (reserve_a, reserve_b) = fx.reserves();
    assert_eq!(fx.balance(PoolSide::A, CUSTODY), reserve_a);
    assert_eq!(fx.balance(PoolSide::B, CUSTODY), reserve_b);

    // The whole pool can still be withdrawn.
    assert_eq!(fx.remove(LP, reserve_a, reserve_b), Ok(()));
    assert_eq!(fx.reserves(), (U256::ZERO, U256::ZERO));
}

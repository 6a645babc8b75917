//! # Pool Allocation Engine
//!
//! Redistributes carbon balance across a pool of ships so that surplus
//! covers deficit, without minting or destroying CB. Given each member's
//! pre-pool balance, the allocator computes post-pool balances under three
//! invariants:
//!
//! 1. **Conservation** — `sum(cb_after) == sum(cb_before)`. Every transfer
//!    decrements one running balance and increments another by the same
//!    amount.
//! 2. **Surplus non-negativity** — a member entering with `cb_before ≥ 0`
//!    never exits negative.
//! 3. **Deficit non-worsening** — a member entering with `cb_before < 0`
//!    never exits below its entry balance.
//!
//! ## Algorithm
//!
//! Greedy deterministic two-cursor merge, O(n log n):
//! members are partitioned into surplus (`cb_before ≥ 0`) and deficit
//! (`cb_before < 0`) groups, each ordered by `cb_before` descending
//! (largest surplus and least-negative deficit serviced first; the ordering
//! is a tie-break policy that must be reproduced exactly for bit-for-bit
//! output parity). A surplus cursor and a deficit cursor walk their groups,
//! transferring `min(available, need)` at each step and advancing whichever
//! member is exhausted — both at once on an exact match.
//!
//! Leftover surplus is legal and stays with its owners. Leftover deficit
//! cannot occur: the `sum(cb_before) ≥ 0` precondition guarantees total
//! surplus covers total deficit, so the deficit cursor always exhausts
//! first or together with the surplus cursor.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use fueleu_core::ShipId;

/// Errors from pool allocation. Both are hard preconditions — the
/// algorithm never runs on an infeasible pool.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PoolError {
    /// The pool has no members.
    #[error("pool must have at least one member")]
    EmptyPool,

    /// The pool's aggregate CB is negative — no allocation can cover it.
    #[error("pool infeasible: sum of cb_before ({sum}) must be >= 0")]
    NegativePoolSum {
        /// The negative aggregate.
        sum: f64,
    },

    /// A member's pre-pool CB is NaN or infinite.
    #[error("invalid input: cb_before for ship {ship_id} must be a finite number (received {cb_before})")]
    NonFiniteCb {
        /// The offending member.
        ship_id: ShipId,
        /// The rejected value.
        cb_before: f64,
    },
}

/// A pool member as submitted for allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolMemberInput {
    /// The member ship.
    pub ship_id: ShipId,
    /// Pre-pool carbon balance, in gCO₂e.
    pub cb_before: f64,
}

/// A pool member with its allocated post-pool balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolMember {
    /// The member ship.
    pub ship_id: ShipId,
    /// Pre-pool carbon balance, in gCO₂e.
    pub cb_before: f64,
    /// Post-pool carbon balance, in gCO₂e.
    pub cb_after: f64,
}

/// Allocate surplus CB to deficits across the pool.
///
/// Returns the members with `cb_after` populated, ordered by `cb_before`
/// descending (the allocation service order: all surplus members, then all
/// deficit members). Inputs are not mutated; calling twice with identical
/// inputs yields bit-identical output.
///
/// # Errors
///
/// - [`PoolError::EmptyPool`] — `members` is empty.
/// - [`PoolError::NonFiniteCb`] — a member's `cb_before` is NaN or infinite.
/// - [`PoolError::NegativePoolSum`] — `sum(cb_before) < 0`.
pub fn allocate(members: &[PoolMemberInput]) -> Result<Vec<PoolMember>, PoolError> {
    if members.is_empty() {
        return Err(PoolError::EmptyPool);
    }

    for m in members {
        if !m.cb_before.is_finite() {
            return Err(PoolError::NonFiniteCb {
                ship_id: m.ship_id.clone(),
                cb_before: m.cb_before,
            });
        }
    }

    let total: f64 = members.iter().map(|m| m.cb_before).sum();
    if total < 0.0 {
        return Err(PoolError::NegativePoolSum { sum: total });
    }

    // Running balances start at cb_before. Sort descending; the stable sort
    // keeps submission order among equal balances, so the service order is
    // fully deterministic.
    let mut pool: Vec<PoolMember> = members
        .iter()
        .map(|m| PoolMember {
            ship_id: m.ship_id.clone(),
            cb_before: m.cb_before,
            cb_after: m.cb_before,
        })
        .collect();
    pool.sort_by(|a, b| b.cb_before.total_cmp(&a.cb_before));

    // Partition point: surplus (cb_before >= 0) precede deficits after the
    // descending sort.
    let deficit_start = pool.partition_point(|m| m.cb_before >= 0.0);
    let (surplus, deficit) = pool.split_at_mut(deficit_start);

    let mut si = 0;
    let mut di = 0;

    while si < surplus.len() && di < deficit.len() {
        let available = surplus[si].cb_after;
        // Remaining deficit: how far the running balance is still below zero.
        let need = -deficit[di].cb_after;

        if available <= 0.0 {
            si += 1;
            continue;
        }
        if need <= 0.0 {
            di += 1;
            continue;
        }

        let transfer = available.min(need);
        surplus[si].cb_after -= transfer;
        deficit[di].cb_after += transfer;

        // Advance whichever member is exhausted; both on an exact match.
        if deficit[di].cb_after >= 0.0 {
            di += 1;
        }
        if surplus[si].cb_after <= 0.0 {
            si += 1;
        }
    }

    // Must hold by construction given the precondition; violations would be
    // an allocator bug, not bad input.
    debug_assert!(
        pool.iter()
            .filter(|m| m.cb_before >= 0.0)
            .all(|m| m.cb_after >= 0.0),
        "surplus member exited negative"
    );
    debug_assert!(
        pool.iter()
            .filter(|m| m.cb_before < 0.0)
            .all(|m| m.cb_after >= m.cb_before),
        "deficit member exited worse than it entered"
    );

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn member(id: &str, cb: f64) -> PoolMemberInput {
        PoolMemberInput {
            ship_id: ShipId::new(id).unwrap(),
            cb_before: cb,
        }
    }

    fn total_after(pool: &[PoolMember]) -> f64 {
        pool.iter().map(|m| m.cb_after).sum()
    }

    fn find<'a>(pool: &'a [PoolMember], id: &str) -> &'a PoolMember {
        pool.iter().find(|m| m.ship_id.as_str() == id).unwrap()
    }

    #[test]
    fn empty_pool_rejected() {
        assert_eq!(allocate(&[]), Err(PoolError::EmptyPool));
    }

    #[test]
    fn negative_sum_rejected() {
        let err = allocate(&[member("R001", 100.0), member("R002", -200.0)]).unwrap_err();
        assert!(matches!(err, PoolError::NegativePoolSum { sum } if sum == -100.0));
    }

    #[test]
    fn nan_member_rejected() {
        let err = allocate(&[member("R001", f64::NAN)]).unwrap_err();
        assert!(matches!(err, PoolError::NonFiniteCb { .. }));
    }

    #[test]
    fn exactly_balanced_pool_zeroes_everyone() {
        // One surplus exactly covering two deficits.
        let pool = allocate(&[
            member("R001", 1_000_000.0),
            member("R002", -500_000.0),
            member("R003", -500_000.0),
        ])
        .unwrap();

        assert_eq!(find(&pool, "R001").cb_after, 0.0);
        assert_eq!(find(&pool, "R002").cb_after, 0.0);
        assert_eq!(find(&pool, "R003").cb_after, 0.0);
        assert_eq!(total_after(&pool), 0.0);
    }

    #[test]
    fn leftover_surplus_stays_with_owners() {
        let pool = allocate(&[
            member("R001", 800_000.0),
            member("R002", 700_000.0),
            member("R003", -600_000.0),
            member("R004", -400_000.0),
        ])
        .unwrap();

        // Both deficits fully zeroed.
        assert_eq!(find(&pool, "R003").cb_after, 0.0);
        assert_eq!(find(&pool, "R004").cb_after, 0.0);

        // Largest surplus serviced first against the least-negative deficit:
        // R001 covers R004 (400k) and 400k of R003; R002 covers the rest.
        assert_eq!(find(&pool, "R001").cb_after, 0.0);
        assert_eq!(find(&pool, "R002").cb_after, 500_000.0);
        assert_eq!(total_after(&pool), 500_000.0);
    }

    #[test]
    fn one_surplus_covers_uneven_deficits() {
        let pool = allocate(&[
            member("R001", 900_000.0),
            member("R002", -100_000.0),
            member("R003", -800_000.0),
        ])
        .unwrap();

        assert_eq!(find(&pool, "R002").cb_after, 0.0);
        assert_eq!(find(&pool, "R003").cb_after, 0.0);
        assert_eq!(find(&pool, "R001").cb_after, 0.0);
        assert_eq!(total_after(&pool), 0.0);
    }

    #[test]
    fn all_surplus_pool_is_untouched() {
        let pool = allocate(&[member("R001", 10.0), member("R002", 0.0)]).unwrap();
        assert_eq!(find(&pool, "R001").cb_after, 10.0);
        assert_eq!(find(&pool, "R002").cb_after, 0.0);
    }

    #[test]
    fn single_deficit_free_member() {
        let pool = allocate(&[member("R001", 42.0)]).unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].cb_after, 42.0);
    }

    #[test]
    fn zero_cb_member_counts_as_surplus() {
        // sum == 0 with a zero-balance member: legal, nothing to transfer
        // from it.
        let pool = allocate(&[
            member("R001", 0.0),
            member("R002", 500.0),
            member("R003", -500.0),
        ])
        .unwrap();
        assert_eq!(find(&pool, "R001").cb_after, 0.0);
        assert_eq!(find(&pool, "R002").cb_after, 0.0);
        assert_eq!(find(&pool, "R003").cb_after, 0.0);
    }

    #[test]
    fn exact_match_advances_both_cursors() {
        // Each transfer is an exact surplus/need match, so both cursors
        // advance together twice: two one-shot transfers, no cursor
        // stranded mid-group.
        let pool = allocate(&[
            member("R001", 100_000.0),
            member("R002", 100_000.0),
            member("R003", -100_000.0),
            member("R004", -100_000.0),
        ])
        .unwrap();

        for id in ["R001", "R002", "R003", "R004"] {
            assert_eq!(find(&pool, id).cb_after, 0.0);
        }
    }

    #[test]
    fn output_order_is_cb_before_descending() {
        let pool = allocate(&[
            member("R004", -400_000.0),
            member("R001", 800_000.0),
            member("R003", -600_000.0),
            member("R002", 700_000.0),
        ])
        .unwrap();
        let order: Vec<&str> = pool.iter().map(|m| m.ship_id.as_str()).collect();
        assert_eq!(order, vec!["R001", "R002", "R004", "R003"]);
    }

    #[test]
    fn allocation_is_idempotent() {
        let members = vec![
            member("R001", 123_456.789),
            member("R002", -23_456.789),
            member("R003", -100_000.0),
        ];
        let a = allocate(&members).unwrap();
        let b = allocate(&members).unwrap();
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.ship_id, y.ship_id);
            assert_eq!(x.cb_after.to_bits(), y.cb_after.to_bits());
        }
    }

    // ---- property tests ----

    prop_compose! {
        // Integer-valued balances (whole gCO₂e). Everything stays exactly
        // representable in f64, so transfers and sums incur no rounding and
        // the invariants can be checked without slack from FP noise.
        fn arb_members()(cbs in prop::collection::vec(-1_000_000_000i64..1_000_000_000, 1..24)) -> Vec<PoolMemberInput> {
            cbs.into_iter()
                .enumerate()
                .map(|(i, cb)| PoolMemberInput {
                    ship_id: ShipId::new(format!("S{i:03}")).unwrap(),
                    cb_before: cb as f64,
                })
                .collect()
        }
    }

    proptest! {
        #[test]
        fn invariants_hold_for_any_feasible_pool(members in arb_members()) {
            let total: f64 = members.iter().map(|m| m.cb_before).sum();
            match allocate(&members) {
                Err(PoolError::NegativePoolSum { sum }) => {
                    prop_assert!(total < 0.0);
                    prop_assert_eq!(sum, total);
                }
                Ok(pool) => {
                    prop_assert!(total >= 0.0);

                    // Conservation within floating tolerance.
                    let after: f64 = pool.iter().map(|m| m.cb_after).sum();
                    let scale = members.iter().map(|m| m.cb_before.abs()).sum::<f64>().max(1.0);
                    prop_assert!((after - total).abs() <= 1e-6 * scale,
                        "conservation violated: before={} after={}", total, after);

                    for m in &pool {
                        if m.cb_before >= 0.0 {
                            prop_assert!(m.cb_after >= 0.0,
                                "surplus {} went negative: {}", m.ship_id, m.cb_after);
                        } else {
                            prop_assert!(m.cb_after >= m.cb_before,
                                "deficit {} worsened: {} -> {}", m.ship_id, m.cb_before, m.cb_after);
                        }
                    }
                }
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }
        }

        #[test]
        fn reallocation_of_allocated_pool_is_stable(members in arb_members()) {
            prop_assume!(members.iter().map(|m| m.cb_before).sum::<f64>() >= 0.0);
            // Feeding the output balances back in must change nothing:
            // deficits are already covered.
            let first = allocate(&members).unwrap();
            let again: Vec<PoolMemberInput> = first
                .iter()
                .map(|m| PoolMemberInput { ship_id: m.ship_id.clone(), cb_before: m.cb_after })
                .collect();
            let second = allocate(&again).unwrap();
            for m in &second {
                prop_assert_eq!(m.cb_after.to_bits(), m.cb_before.to_bits());
            }
        }
    }
}

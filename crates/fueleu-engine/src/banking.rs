//! # Banking Ledger Rules
//!
//! Stateless validation of CB banking operations. The ledger itself is an
//! append-only log owned by the persistence layer; this module decides
//! whether a deposit or withdrawal is admissible and, on success, produces
//! the single signed entry to append. Nothing is written on failure — each
//! decision is atomic and local.
//!
//! The banked balance for a `(ship, year)` pair is always the sum of its
//! entries. [`apply_banked`] reports the post-withdrawal sum as a derived
//! convenience value; the authoritative figure is re-summed from the log by
//! the caller and must match exactly.
//!
//! Callers must serialize read-modify-write per `(ship, year)`: the rules
//! here are only as good as the snapshot and running sum passed in.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use fueleu_core::ShipId;

/// Errors from banking ledger validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BankingError {
    /// The requested amount is not a positive finite number.
    #[error("amount must be a positive number (received {amount})")]
    InvalidAmount {
        /// The rejected amount.
        amount: f64,
    },

    /// No compliance snapshot exists for the ship/year pair.
    #[error("no compliance data found for ship {ship_id} in year {year}")]
    NoSnapshot {
        /// The ship the deposit was requested for.
        ship_id: ShipId,
        /// The compliance year.
        year: i32,
    },

    /// The latest snapshot holds no surplus to bank.
    #[error("cannot bank: CB must be positive (current CB: {cb_gco2eq})")]
    NoSurplus {
        /// The non-positive CB of the latest snapshot.
        cb_gco2eq: f64,
    },

    /// The requested deposit exceeds the available surplus.
    #[error("cannot bank: amount ({amount}) exceeds available CB ({available})")]
    AmountExceedsAvailable {
        /// The requested deposit.
        amount: f64,
        /// The surplus available in the latest snapshot.
        available: f64,
    },

    /// There is no banked CB to withdraw from.
    #[error("no banked CB available to apply (current banked sum: {banked_sum})")]
    NoBankedBalance {
        /// The non-positive running banked sum.
        banked_sum: f64,
    },

    /// The requested withdrawal exceeds the banked balance.
    #[error("cannot apply: amount ({amount}) exceeds banked CB ({banked_sum})")]
    AmountExceedsBanked {
        /// The requested withdrawal.
        amount: f64,
        /// The current banked sum.
        banked_sum: f64,
    },
}

/// A CB snapshot supplied by the caller — the latest computed compliance
/// state for a `(ship, year)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CbSnapshot {
    /// Signed carbon balance, in gCO₂e.
    pub cb_gco2eq: f64,
    /// Energy of the reporting period, in MJ.
    pub energy_mj: f64,
}

/// A signed ledger entry to be appended by the caller.
///
/// Positive amount = deposit (bank surplus); negative = withdrawal (apply
/// banked CB). Entries are immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Ship the entry belongs to.
    pub ship_id: ShipId,
    /// Compliance year the entry belongs to.
    pub year: i32,
    /// Signed CB amount, in gCO₂e.
    pub amount_gco2eq: f64,
    /// Optional free-text annotation.
    pub note: Option<String>,
}

/// Result of a successful withdrawal: the entry to append plus the derived
/// post-withdrawal banked sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Withdrawal {
    /// The negative-amount entry to append to the ledger.
    pub entry: LedgerEntry,
    /// Advisory new banked sum (`current_banked_sum - amount`). The caller
    /// re-derives the authoritative sum from the log after appending.
    pub new_banked_sum: f64,
}

fn validate_amount(amount: f64) -> Result<(), BankingError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(BankingError::InvalidAmount { amount });
    }
    Ok(())
}

/// Validate a surplus deposit and produce the positive ledger entry.
///
/// `latest_snapshot` is the most recent compliance snapshot for
/// `(ship_id, year)`, or `None` if no snapshot exists.
///
/// # Errors
///
/// - [`BankingError::InvalidAmount`] — `amount` is not a positive finite number.
/// - [`BankingError::NoSnapshot`] — no snapshot exists for the pair.
/// - [`BankingError::NoSurplus`] — the snapshot's CB is ≤ 0.
/// - [`BankingError::AmountExceedsAvailable`] — `amount` exceeds the snapshot's CB.
pub fn bank_surplus(
    ship_id: &ShipId,
    year: i32,
    amount: f64,
    latest_snapshot: Option<&CbSnapshot>,
) -> Result<LedgerEntry, BankingError> {
    validate_amount(amount)?;

    let snapshot = latest_snapshot.ok_or_else(|| BankingError::NoSnapshot {
        ship_id: ship_id.clone(),
        year,
    })?;

    if snapshot.cb_gco2eq <= 0.0 {
        return Err(BankingError::NoSurplus {
            cb_gco2eq: snapshot.cb_gco2eq,
        });
    }

    if amount > snapshot.cb_gco2eq {
        return Err(BankingError::AmountExceedsAvailable {
            amount,
            available: snapshot.cb_gco2eq,
        });
    }

    Ok(LedgerEntry {
        ship_id: ship_id.clone(),
        year,
        amount_gco2eq: amount,
        note: None,
    })
}

/// Validate a withdrawal against the running banked sum and produce the
/// negative ledger entry plus the derived new sum.
///
/// `amount == current_banked_sum` is legal and drives the balance to
/// exactly zero.
///
/// # Errors
///
/// - [`BankingError::InvalidAmount`] — `amount` is not a positive finite number.
/// - [`BankingError::NoBankedBalance`] — the current banked sum is ≤ 0.
/// - [`BankingError::AmountExceedsBanked`] — `amount` exceeds the banked sum.
pub fn apply_banked(
    ship_id: &ShipId,
    year: i32,
    amount: f64,
    current_banked_sum: f64,
) -> Result<Withdrawal, BankingError> {
    validate_amount(amount)?;

    if current_banked_sum <= 0.0 {
        return Err(BankingError::NoBankedBalance {
            banked_sum: current_banked_sum,
        });
    }

    if amount > current_banked_sum {
        return Err(BankingError::AmountExceedsBanked {
            amount,
            banked_sum: current_banked_sum,
        });
    }

    Ok(Withdrawal {
        entry: LedgerEntry {
            ship_id: ship_id.clone(),
            year,
            amount_gco2eq: -amount,
            note: None,
        },
        new_banked_sum: current_banked_sum - amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ship(id: &str) -> ShipId {
        ShipId::new(id).unwrap()
    }

    fn snapshot(cb: f64) -> CbSnapshot {
        CbSnapshot {
            cb_gco2eq: cb,
            energy_mj: 205_000_000.0,
        }
    }

    // ---- bank_surplus ----

    #[test]
    fn deposit_produces_positive_entry() {
        let entry = bank_surplus(&ship("R001"), 2024, 100_000.0, Some(&snapshot(250_000.0))).unwrap();
        assert_eq!(entry.amount_gco2eq, 100_000.0);
        assert_eq!(entry.year, 2024);
        assert_eq!(entry.ship_id.as_str(), "R001");
        assert!(entry.note.is_none());
    }

    #[test]
    fn deposit_of_entire_surplus_is_legal() {
        let entry = bank_surplus(&ship("R001"), 2024, 250_000.0, Some(&snapshot(250_000.0))).unwrap();
        assert_eq!(entry.amount_gco2eq, 250_000.0);
    }

    #[test]
    fn deposit_rejects_non_positive_amount() {
        let snap = snapshot(250_000.0);
        for amount in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                bank_surplus(&ship("R001"), 2024, amount, Some(&snap)),
                Err(BankingError::InvalidAmount { .. })
            ));
        }
    }

    #[test]
    fn deposit_rejects_missing_snapshot() {
        let err = bank_surplus(&ship("R009"), 2024, 1.0, None).unwrap_err();
        assert!(matches!(err, BankingError::NoSnapshot { ref ship_id, year: 2024 } if ship_id.as_str() == "R009"));
        assert!(err.to_string().contains("R009"));
    }

    #[test]
    fn deposit_rejects_deficit_snapshot() {
        assert!(matches!(
            bank_surplus(&ship("R001"), 2024, 1.0, Some(&snapshot(-349_183_200.0))),
            Err(BankingError::NoSurplus { .. })
        ));
        // Exactly zero CB is also not a surplus.
        assert!(matches!(
            bank_surplus(&ship("R001"), 2024, 1.0, Some(&snapshot(0.0))),
            Err(BankingError::NoSurplus { .. })
        ));
    }

    #[test]
    fn deposit_rejects_amount_over_surplus() {
        assert_eq!(
            bank_surplus(&ship("R001"), 2024, 250_000.1, Some(&snapshot(250_000.0))),
            Err(BankingError::AmountExceedsAvailable {
                amount: 250_000.1,
                available: 250_000.0,
            })
        );
    }

    // ---- apply_banked ----

    #[test]
    fn withdrawal_produces_negative_entry_and_new_sum() {
        let w = apply_banked(&ship("R002"), 2024, 50_000.0, 120_000.0).unwrap();
        assert_eq!(w.entry.amount_gco2eq, -50_000.0);
        assert_eq!(w.new_banked_sum, 70_000.0);
    }

    #[test]
    fn withdrawal_of_entire_balance_reaches_exactly_zero() {
        let w = apply_banked(&ship("R002"), 2024, 120_000.0, 120_000.0).unwrap();
        assert_eq!(w.new_banked_sum, 0.0);
        assert_eq!(w.entry.amount_gco2eq, -120_000.0);
    }

    #[test]
    fn withdrawal_rejects_non_positive_amount() {
        for amount in [0.0, -10.0, f64::NAN] {
            assert!(matches!(
                apply_banked(&ship("R002"), 2024, amount, 120_000.0),
                Err(BankingError::InvalidAmount { .. })
            ));
        }
    }

    #[test]
    fn withdrawal_rejects_empty_balance() {
        assert!(matches!(
            apply_banked(&ship("R002"), 2024, 1.0, 0.0),
            Err(BankingError::NoBankedBalance { .. })
        ));
        assert!(matches!(
            apply_banked(&ship("R002"), 2024, 1.0, -5.0),
            Err(BankingError::NoBankedBalance { .. })
        ));
    }

    #[test]
    fn withdrawal_rejects_amount_over_balance() {
        assert_eq!(
            apply_banked(&ship("R002"), 2024, 120_000.5, 120_000.0),
            Err(BankingError::AmountExceedsBanked {
                amount: 120_000.5,
                banked_sum: 120_000.0,
            })
        );
    }

    #[test]
    fn deposit_then_withdrawal_round_trips_the_ledger_sum() {
        // Simulate the caller's append-only ledger.
        let mut ledger: Vec<LedgerEntry> = Vec::new();
        let snap = snapshot(300_000.0);

        ledger.push(bank_surplus(&ship("R001"), 2024, 200_000.0, Some(&snap)).unwrap());
        let sum: f64 = ledger.iter().map(|e| e.amount_gco2eq).sum();
        assert_eq!(sum, 200_000.0);

        let w = apply_banked(&ship("R001"), 2024, 75_000.0, sum).unwrap();
        ledger.push(w.entry);
        let resummed: f64 = ledger.iter().map(|e| e.amount_gco2eq).sum();
        assert_eq!(resummed, w.new_banked_sum);
        assert_eq!(resummed, 125_000.0);
    }
}

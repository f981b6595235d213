//! Debt settlement over a balance map.
//!
//! Consumes the balance mapping produced by the statistics pass (or any
//! externally constructed equivalent) and produces an ordered list of
//! settling transactions. Stateless and re-entrant: the only working
//! state is two local vectors and the result list.

use crate::money::round2;
use log::debug;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// A settling transfer: `from_member_id` owes `amount` to `to_member_id`.
///
/// `amount` is always strictly positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub from_member_id: u64,
    pub to_member_id: u64,
    pub amount: Decimal,
}

/// Working entry for the greedy reduction.
#[derive(Debug, Clone, Copy)]
struct CreditDebt {
    member_id: u64,
    balance: Decimal,
}

/// Produces the transactions settling `balances` to zero.
///
/// `Some(id)` routes every transfer through that member; `None` (the
/// host wire value `0`) selects the optimal mode.
pub fn settle_bills(balances: &HashMap<u64, Decimal>, center_on: Option<u64>) -> Vec<Transaction> {
    match center_on {
        Some(center_member_id) => settle_centered(balances, center_member_id),
        None => settle_optimal(balances),
    }
}

/// Settlement routed entirely through one member.
///
/// Every other member with a positive balance receives it from the
/// center; every member with a negative balance pays it to the center.
/// Zero balances are skipped. Transactions are emitted in ascending
/// member id order.
pub fn settle_centered(
    balances: &HashMap<u64, Decimal>,
    center_member_id: u64,
) -> Vec<Transaction> {
    let mut results = Vec::new();
    for (member_id, balance) in sorted_entries(balances) {
        if member_id == center_member_id {
            continue;
        }
        if balance > Decimal::ZERO {
            results.push(Transaction {
                from_member_id: center_member_id,
                to_member_id: member_id,
                amount: balance,
            });
        } else if balance < Decimal::ZERO {
            results.push(Transaction {
                from_member_id: member_id,
                to_member_id: center_member_id,
                amount: -balance,
            });
        }
    }
    results
}

/// Greedy transaction-count-minimizing settlement.
///
/// Members are classified as creditors or debitors by their balance
/// rounded to two decimals (the raw map is never rounded), then the
/// largest creditor is repeatedly paired with the most indebted debitor
/// for the smaller of the two absolute balances. Ties on the extreme
/// balance go to the lowest member id. The result is bounded by
/// `nonzero members - 1` transactions for a zero-sum balance map.
pub fn settle_optimal(balances: &HashMap<u64, Decimal>) -> Vec<Transaction> {
    let mut crediters = Vec::new();
    let mut debiters = Vec::new();
    for (member_id, balance) in sorted_entries(balances) {
        let rounded = round2(balance);
        if rounded > Decimal::ZERO {
            crediters.push(CreditDebt { member_id, balance });
        } else if rounded < Decimal::ZERO {
            debiters.push(CreditDebt { member_id, balance });
        }
    }
    reduce_balances(crediters, debiters)
}

/// Iterative largest-creditor / most-indebted-debitor pairing.
///
/// Both working vectors stay in ascending member id order and entries
/// are only mutated in place or removed, so scanning with strict
/// comparisons selects the lowest id among equal extremes. Every
/// iteration zeroes at least one entry, which bounds the loop even for
/// imbalanced inputs.
fn reduce_balances(mut crediters: Vec<CreditDebt>, mut debiters: Vec<CreditDebt>) -> Vec<Transaction> {
    let mut results = Vec::new();

    while !crediters.is_empty() && !debiters.is_empty() {
        let ci = index_of_largest(&crediters);
        let di = index_of_most_negative(&debiters);

        let amount = crediters[ci]
            .balance
            .abs()
            .min(debiters[di].balance.abs());
        debug!(
            "Settling {} from member {} to member {}",
            amount, debiters[di].member_id, crediters[ci].member_id
        );
        results.push(Transaction {
            from_member_id: debiters[di].member_id,
            to_member_id: crediters[ci].member_id,
            amount,
        });

        debiters[di].balance += amount;
        crediters[ci].balance -= amount;

        if debiters[di].balance >= Decimal::ZERO {
            debiters.remove(di);
        }
        if crediters[ci].balance <= Decimal::ZERO {
            crediters.remove(ci);
        }
    }

    results
}

fn index_of_largest(entries: &[CreditDebt]) -> usize {
    let mut best = 0;
    for (i, entry) in entries.iter().enumerate().skip(1) {
        if entry.balance > entries[best].balance {
            best = i;
        }
    }
    best
}

fn index_of_most_negative(entries: &[CreditDebt]) -> usize {
    let mut best = 0;
    for (i, entry) in entries.iter().enumerate().skip(1) {
        if entry.balance < entries[best].balance {
            best = i;
        }
    }
    best
}

fn sorted_entries(balances: &HashMap<u64, Decimal>) -> Vec<(u64, Decimal)> {
    let mut entries: Vec<(u64, Decimal)> = balances
        .iter()
        .map(|(member_id, balance)| (*member_id, *balance))
        .collect();
    entries.sort_unstable_by_key(|(member_id, _)| *member_id);
    entries
}

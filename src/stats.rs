//! Balance statistics over a project's bills.
//!
//! Reduces a filtered bill list plus member weights into per-member
//! aggregates. The pass is a pure function over the supplied snapshot:
//! it allocates fresh result maps and never mutates its inputs.

use crate::bill::{Bill, BillState, CATEGORY_REIMBURSEMENT};
use crate::member::Member;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// Host-facing sentinel: match any category.
pub const CATEGORY_FILTER_ALL: i64 = -1000;
/// Host-facing sentinel: match any category except reimbursement.
pub const CATEGORY_FILTER_ALL_EXCEPT_REIMBURSEMENT: i64 = -100;
/// Host-facing sentinel: match any payment mode.
pub const PAYMODE_FILTER_ALL: i64 = -1000;

/// Category restriction applied when computing statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Match every bill.
    #[default]
    Any,
    /// Match every bill except internal reimbursement entries.
    AnyExceptReimbursement,
    /// Match bills with exactly this category id.
    Only(i64),
}

impl CategoryFilter {
    /// Maps the legacy sentinel encoding to a filter.
    pub fn from_id(id: i64) -> Self {
        match id {
            CATEGORY_FILTER_ALL => CategoryFilter::Any,
            CATEGORY_FILTER_ALL_EXCEPT_REIMBURSEMENT => CategoryFilter::AnyExceptReimbursement,
            other => CategoryFilter::Only(other),
        }
    }

    fn matches(&self, category_id: i64) -> bool {
        match self {
            CategoryFilter::Any => true,
            CategoryFilter::AnyExceptReimbursement => category_id != CATEGORY_REIMBURSEMENT,
            CategoryFilter::Only(id) => category_id == *id,
        }
    }
}

/// Payment-mode restriction applied when computing statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentModeFilter {
    /// Match every bill.
    #[default]
    Any,
    /// Match bills with exactly this payment-mode id.
    Only(i64),
}

impl PaymentModeFilter {
    /// Maps the legacy sentinel encoding to a filter.
    pub fn from_id(id: i64) -> Self {
        match id {
            PAYMODE_FILTER_ALL => PaymentModeFilter::Any,
            other => PaymentModeFilter::Only(other),
        }
    }

    fn matches(&self, payment_mode_id: i64) -> bool {
        match self {
            PaymentModeFilter::Any => true,
            PaymentModeFilter::Only(id) => payment_mode_id == *id,
        }
    }
}

/// Criteria restricting which bills enter the statistics.
///
/// Date bounds are inclusive, zero-padded `YYYY-MM-DD` strings compared
/// lexicographically, which equals chronological order for that format.
/// The default filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct StatisticsFilter {
    pub category: CategoryFilter,
    pub payment_mode: PaymentModeFilter,
    pub date_min: Option<String>,
    pub date_max: Option<String>,
}

impl StatisticsFilter {
    fn matches(&self, bill: &Bill) -> bool {
        self.category.matches(bill.category_id)
            && self.payment_mode.matches(bill.payment_mode_id)
            && self
                .date_min
                .as_deref()
                .map_or(true, |min| bill.date.as_str() >= min)
            && self
                .date_max
                .as_deref()
                .map_or(true, |max| bill.date.as_str() <= max)
    }
}

/// Aggregate figures for one member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemberStats {
    /// Number of matching bills this member paid.
    pub nb_bills: u32,

    /// Total amount this member paid.
    pub paid: Decimal,

    /// Total share of matching bills attributed to this member.
    pub spent: Decimal,

    /// Net position: positive = is owed money, negative = owes money.
    pub balance: Decimal,
}

/// Result of a statistics pass.
#[derive(Debug, Clone, Default)]
pub struct ProjectStatistics {
    /// Number of bills that survived the filters.
    pub nb_bills: u32,

    /// Per-member aggregates keyed by member id, one entry per supplied
    /// member (zeroed when the member touched no matching bill).
    pub members: HashMap<u64, MemberStats>,
}

impl ProjectStatistics {
    /// Extracts the plain balance map consumed by settlement.
    pub fn balances(&self) -> HashMap<u64, Decimal> {
        self.members
            .iter()
            .map(|(id, stats)| (*id, stats.balance))
            .collect()
    }
}

/// Reduces bills and member weights into per-member statistics.
///
/// Deleted bills and bills failing `filter` are skipped. Each surviving
/// bill credits its payer with the full amount and debits every ower
/// with `amount * weight / total_ower_weight`. A bill whose owers sum to
/// zero weight keeps the payer contribution and distributes nothing. A
/// bill referencing a member absent from `members` contributes nothing
/// for that reference; the inconsistency is logged at warn level.
pub fn compute_statistics(
    bills: &[Bill],
    members: &[Member],
    filter: &StatisticsFilter,
) -> ProjectStatistics {
    let mut stats = ProjectStatistics {
        nb_bills: 0,
        members: members
            .iter()
            .map(|member| (member.id, MemberStats::default()))
            .collect(),
    };
    let weights: HashMap<u64, Decimal> = members
        .iter()
        .map(|member| (member.id, member.weight))
        .collect();

    for bill in bills {
        if bill.state == BillState::Deleted {
            continue;
        }
        if !filter.matches(bill) {
            debug!("Bill {}: filtered out", bill.id);
            continue;
        }
        stats.nb_bills += 1;

        match stats.members.get_mut(&bill.payer_id) {
            Some(payer) => {
                payer.nb_bills += 1;
                payer.paid += bill.amount;
                payer.balance += bill.amount;
            }
            None => warn!(
                "Bill {}: payer {} is not in the member table, payer side skipped",
                bill.id, bill.payer_id
            ),
        }

        let total_weight: Decimal = bill
            .owers
            .iter()
            .filter_map(|ower| weights.get(&ower.member_id))
            .copied()
            .sum();
        if total_weight.is_zero() {
            debug!("Bill {}: zero total ower weight, nothing to distribute", bill.id);
            continue;
        }

        for ower in &bill.owers {
            let Some(weight) = weights.get(&ower.member_id).copied() else {
                warn!(
                    "Bill {}: ower {} is not in the member table, treated as zero weight",
                    bill.id, ower.member_id
                );
                continue;
            };
            let share = bill.amount * weight / total_weight;

            // Safety: the weight table and the stats table are both seeded from `members`
            let entry = stats
                .members
                .get_mut(&ower.member_id)
                .expect("member exists");
            entry.balance -= share;
            entry.spent += share;
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::BillOwer;
    use crate::money::balance_tolerance;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn member(id: u64, weight: &str) -> Member {
        Member::new(id, &format!("m{id}"), dec(weight))
    }

    fn bill(id: u64, payer_id: u64, amount: &str, ower_ids: &[u64]) -> Bill {
        let mut bill = Bill::new(id, &format!("bill {id}"), payer_id, dec(amount), "2024-03-01");
        bill.owers = ower_ids
            .iter()
            .map(|&member_id| BillOwer { member_id })
            .collect();
        bill
    }

    fn equal_members() -> Vec<Member> {
        vec![member(1, "1"), member(2, "1"), member(3, "1")]
    }

    #[test]
    fn test_equal_split_bill() {
        // One bill of 30 paid by A, owed by A, B, C
        let members = equal_members();
        let bills = vec![bill(1, 1, "30", &[1, 2, 3])];

        let stats = compute_statistics(&bills, &members, &StatisticsFilter::default());

        assert_eq!(stats.nb_bills, 1);
        assert_eq!(stats.members[&1].balance, dec("20"));
        assert_eq!(stats.members[&2].balance, dec("-10"));
        assert_eq!(stats.members[&3].balance, dec("-10"));
        assert_eq!(stats.members[&1].paid, dec("30"));
        assert_eq!(stats.members[&1].spent, dec("10"));
        assert_eq!(stats.members[&1].nb_bills, 1);
        assert_eq!(stats.members[&2].nb_bills, 0);
    }

    #[test]
    fn test_payer_not_among_owers() {
        // Payer A owes nothing; B carries the full amount
        let members = equal_members();
        let bills = vec![bill(1, 1, "50", &[2])];

        let stats = compute_statistics(&bills, &members, &StatisticsFilter::default());

        assert_eq!(stats.members[&1].balance, dec("50"));
        assert_eq!(stats.members[&2].balance, dec("-50"));
        assert_eq!(stats.members[&3].balance, dec("0"));
        assert_eq!(stats.members[&2].spent, dec("50"));
    }

    #[test]
    fn test_weighted_shares() {
        // weight(B)=2, weight(C)=1: B carries 20 of 30, C carries 10
        let members = vec![member(1, "1"), member(2, "2"), member(3, "1")];
        let bills = vec![bill(1, 1, "30", &[2, 3])];

        let stats = compute_statistics(&bills, &members, &StatisticsFilter::default());

        assert_eq!(stats.members[&1].balance, dec("30"));
        assert_eq!(stats.members[&2].balance, dec("-20"));
        assert_eq!(stats.members[&3].balance, dec("-10"));
        assert_eq!(stats.members[&2].spent, dec("20"));
        assert_eq!(stats.members[&3].spent, dec("10"));
    }

    #[test]
    fn test_deleted_bill_contributes_nothing() {
        let members = equal_members();
        let mut deleted = bill(1, 1, "1000", &[1, 2, 3]);
        deleted.state = BillState::Deleted;
        let bills = vec![deleted, bill(2, 2, "9", &[1, 2, 3])];

        let stats = compute_statistics(&bills, &members, &StatisticsFilter::default());

        assert_eq!(stats.nb_bills, 1);
        assert_eq!(stats.members[&1].balance, dec("-3"));
        assert_eq!(stats.members[&2].balance, dec("6"));
        assert_eq!(stats.members[&1].paid, dec("0"));
    }

    #[test]
    fn test_zero_owers_keeps_payer_side() {
        let members = equal_members();
        let bills = vec![bill(1, 1, "30", &[])];

        let stats = compute_statistics(&bills, &members, &StatisticsFilter::default());

        assert_eq!(stats.nb_bills, 1);
        assert_eq!(stats.members[&1].paid, dec("30"));
        assert_eq!(stats.members[&1].balance, dec("30"));
        assert_eq!(stats.members[&2].spent, dec("0"));
    }

    #[test]
    fn test_missing_ower_treated_as_zero_weight() {
        // Member 9 is not in the table; the bill splits between 2 and 3 only
        let members = equal_members();
        let bills = vec![bill(1, 1, "30", &[2, 3, 9])];

        let stats = compute_statistics(&bills, &members, &StatisticsFilter::default());

        assert_eq!(stats.members[&2].balance, dec("-15"));
        assert_eq!(stats.members[&3].balance, dec("-15"));
        assert!(!stats.members.contains_key(&9));
    }

    #[test]
    fn test_missing_payer_still_counts_bill() {
        let members = equal_members();
        let bills = vec![bill(1, 9, "30", &[1, 2, 3])];

        let stats = compute_statistics(&bills, &members, &StatisticsFilter::default());

        assert_eq!(stats.nb_bills, 1);
        assert_eq!(stats.members[&1].balance, dec("-10"));
        assert_eq!(stats.members[&2].balance, dec("-10"));
        assert_eq!(stats.members[&3].balance, dec("-10"));
    }

    #[test]
    fn test_negative_amount_refund() {
        let members = equal_members();
        let bills = vec![bill(1, 1, "-30", &[1, 2, 3])];

        let stats = compute_statistics(&bills, &members, &StatisticsFilter::default());

        assert_eq!(stats.members[&1].balance, dec("-20"));
        assert_eq!(stats.members[&2].balance, dec("10"));
        assert_eq!(stats.members[&1].paid, dec("-30"));
        assert_eq!(stats.members[&2].spent, dec("-10"));
    }

    #[test]
    fn test_balances_sum_to_zero() {
        // Uneven weights and a three-way split that does not divide evenly
        let members = vec![member(1, "1"), member(2, "2"), member(3, "1.5")];
        let bills = vec![
            bill(1, 1, "100", &[1, 2, 3]),
            bill(2, 2, "33.34", &[1, 3]),
            bill(3, 3, "0.05", &[1, 2, 3]),
            bill(4, 1, "-12.30", &[2, 3]),
        ];

        let stats = compute_statistics(&bills, &members, &StatisticsFilter::default());

        let total: Decimal = stats.members.values().map(|s| s.balance).sum();
        assert!(
            total.abs() < balance_tolerance(),
            "balances must conserve: {total}"
        );
    }

    #[test]
    fn test_category_filter_exact() {
        let members = equal_members();
        let mut groceries = bill(1, 1, "30", &[1, 2, 3]);
        groceries.category_id = crate::bill::CATEGORY_GROCERIES;
        let rent = bill(2, 2, "60", &[1, 2, 3]);
        let bills = vec![groceries, rent];

        let filter = StatisticsFilter {
            category: CategoryFilter::Only(crate::bill::CATEGORY_GROCERIES),
            ..StatisticsFilter::default()
        };
        let stats = compute_statistics(&bills, &members, &filter);

        assert_eq!(stats.nb_bills, 1);
        assert_eq!(stats.members[&1].paid, dec("30"));
        assert_eq!(stats.members[&2].paid, dec("0"));
    }

    #[test]
    fn test_category_filter_excludes_reimbursement() {
        let members = equal_members();
        let mut refund = bill(1, 2, "10", &[1]);
        refund.category_id = CATEGORY_REIMBURSEMENT;
        let bills = vec![refund, bill(2, 1, "30", &[1, 2, 3])];

        let filter = StatisticsFilter {
            category: CategoryFilter::AnyExceptReimbursement,
            ..StatisticsFilter::default()
        };
        let stats = compute_statistics(&bills, &members, &filter);

        assert_eq!(stats.nb_bills, 1);
        assert_eq!(stats.members[&2].paid, dec("0"));
    }

    #[test]
    fn test_exact_filter_still_matches_reimbursement() {
        let members = equal_members();
        let mut refund = bill(1, 2, "10", &[1]);
        refund.category_id = CATEGORY_REIMBURSEMENT;
        let bills = vec![refund];

        let filter = StatisticsFilter {
            category: CategoryFilter::Only(CATEGORY_REIMBURSEMENT),
            ..StatisticsFilter::default()
        };
        assert_eq!(compute_statistics(&bills, &members, &filter).nb_bills, 1);
    }

    #[test]
    fn test_payment_mode_filter() {
        let members = equal_members();
        let mut card = bill(1, 1, "30", &[1, 2, 3]);
        card.payment_mode_id = crate::paymode::PAYMODE_ID_CARD;
        let cash = bill(2, 2, "60", &[1, 2, 3]);
        let bills = vec![card, cash];

        let filter = StatisticsFilter {
            payment_mode: PaymentModeFilter::Only(crate::paymode::PAYMODE_ID_CARD),
            ..StatisticsFilter::default()
        };
        assert_eq!(compute_statistics(&bills, &members, &filter).nb_bills, 1);
    }

    #[test]
    fn test_date_range_bounds_are_inclusive() {
        let members = equal_members();
        let mut bills = Vec::new();
        for (id, date) in [(1, "2024-01-15"), (2, "2024-02-01"), (3, "2024-02-29")] {
            let mut b = bill(id, 1, "10", &[1, 2, 3]);
            b.date = date.to_string();
            bills.push(b);
        }

        let filter = StatisticsFilter {
            date_min: Some("2024-02-01".to_string()),
            date_max: Some("2024-02-29".to_string()),
            ..StatisticsFilter::default()
        };
        assert_eq!(compute_statistics(&bills, &members, &filter).nb_bills, 2);
    }

    #[test]
    fn test_narrower_filters_never_increase_bill_count() {
        let members = equal_members();
        let mut bills = Vec::new();
        for id in 1..=6 {
            let mut b = bill(id, 1, "10", &[1, 2, 3]);
            b.date = format!("2024-0{id}-01");
            b.category_id = if id % 2 == 0 { -1 } else { 0 };
            bills.push(b);
        }

        let wide = StatisticsFilter {
            date_min: Some("2024-01-01".to_string()),
            date_max: Some("2024-06-30".to_string()),
            ..StatisticsFilter::default()
        };
        let narrow_dates = StatisticsFilter {
            date_min: Some("2024-02-01".to_string()),
            date_max: Some("2024-05-31".to_string()),
            ..StatisticsFilter::default()
        };
        let narrow_category = StatisticsFilter {
            category: CategoryFilter::Only(-1),
            ..narrow_dates.clone()
        };

        let wide_count = compute_statistics(&bills, &members, &wide).nb_bills;
        let narrow_count = compute_statistics(&bills, &members, &narrow_dates).nb_bills;
        let narrowest_count = compute_statistics(&bills, &members, &narrow_category).nb_bills;

        assert!(narrow_count <= wide_count);
        assert!(narrowest_count <= narrow_count);
    }

    #[test]
    fn test_empty_inputs_yield_zeroed_stats() {
        let members = equal_members();
        let stats = compute_statistics(&[], &members, &StatisticsFilter::default());

        assert_eq!(stats.nb_bills, 0);
        assert_eq!(stats.members.len(), 3);
        assert!(stats.members.values().all(|s| *s == MemberStats::default()));
    }

    #[test]
    fn test_filter_from_sentinel_ids() {
        assert_eq!(CategoryFilter::from_id(-1000), CategoryFilter::Any);
        assert_eq!(
            CategoryFilter::from_id(-100),
            CategoryFilter::AnyExceptReimbursement
        );
        assert_eq!(CategoryFilter::from_id(-11), CategoryFilter::Only(-11));
        assert_eq!(PaymentModeFilter::from_id(-1000), PaymentModeFilter::Any);
        assert_eq!(PaymentModeFilter::from_id(-1), PaymentModeFilter::Only(-1));
    }

    #[test]
    fn test_balances_extraction() {
        let members = equal_members();
        let bills = vec![bill(1, 1, "30", &[1, 2, 3])];
        let stats = compute_statistics(&bills, &members, &StatisticsFilter::default());

        let balances = stats.balances();
        assert_eq!(balances[&1], dec("20"));
        assert_eq!(balances[&2], dec("-10"));
    }
}

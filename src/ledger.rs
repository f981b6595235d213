//! CSV adapter around the statistics and settlement passes.
//!
//! Mirrors the host's data contract: members and bills stream in as CSV
//! rows, statistics and settlement plans stream out as CSV. Invalid rows
//! are logged at warn level and skipped. The computations themselves
//! perform no I/O.

use crate::bill::{Bill, BillRecord};
use crate::error::Result;
use crate::member::{Member, MemberRecord};
use crate::paymode::PaymentModeRegistry;
use crate::settlement::{settle_bills, Transaction};
use crate::stats::{compute_statistics, ProjectStatistics, StatisticsFilter};
use csv::{ReaderBuilder, Trim};
use log::warn;
use std::io::{Read, Write};

/// An in-memory snapshot of one project's members and bills.
///
/// # Output Ordering
///
/// Statistics rows are written sorted by member id in ascending order to
/// ensure deterministic, reproducible output; settlement rows follow the
/// plan order, which is itself deterministic.
pub struct Ledger {
    /// Members of the project.
    members: Vec<Member>,

    /// Bills of the project, including deleted/edited entries.
    bills: Vec<Bill>,

    /// Payment-mode code table used when parsing bill rows.
    paymodes: PaymentModeRegistry,
}

impl Ledger {
    /// Creates an empty ledger with the built-in payment modes.
    pub fn new() -> Self {
        Self::with_payment_modes(PaymentModeRegistry::new())
    }

    /// Creates an empty ledger with a custom payment-mode registry.
    pub fn with_payment_modes(paymodes: PaymentModeRegistry) -> Self {
        Ledger {
            members: Vec::new(),
            bills: Vec::new(),
            paymodes,
        }
    }

    /// Members loaded so far.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Bills loaded so far.
    pub fn bills(&self) -> &[Bill] {
        &self.bills
    }

    /// Loads members from a CSV reader in streaming fashion.
    ///
    /// Records are read one at a time; invalid rows are logged at warn
    /// level and skipped.
    pub fn load_members<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<MemberRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => match record.parse() {
                    Some(member) => self.members.push(member),
                    None => warn!("Row {}: Failed to parse member record", row_num),
                },
                Err(e) => warn!("Row {}: CSV parse error: {}", row_num, e),
            }
        }

        Ok(())
    }

    /// Loads bills from a CSV reader in streaming fashion.
    ///
    /// Payment-mode fields may use either numeric ids or the legacy
    /// letter codes resolved through this ledger's registry. Invalid
    /// rows are logged at warn level and skipped.
    pub fn load_bills<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<BillRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => match record.parse(&self.paymodes) {
                    Some(bill) => self.bills.push(bill),
                    None => warn!("Row {}: Failed to parse bill record", row_num),
                },
                Err(e) => warn!("Row {}: CSV parse error: {}", row_num, e),
            }
        }

        Ok(())
    }

    /// Computes per-member statistics for the current snapshot.
    pub fn statistics(&self, filter: &StatisticsFilter) -> ProjectStatistics {
        compute_statistics(&self.bills, &self.members, filter)
    }

    /// Computes the settlement plan for the current snapshot.
    ///
    /// Balances come from an unfiltered statistics pass. `Some(id)`
    /// centers the plan on that member; `None` selects the optimal mode.
    pub fn settlement(&self, center_on: Option<u64>) -> Vec<Transaction> {
        let stats = self.statistics(&StatisticsFilter::default());
        settle_bills(&stats.balances(), center_on)
    }

    /// Writes a statistics pass as CSV, sorted by member id.
    ///
    /// Monetary columns are formatted with two decimal places.
    pub fn write_statistics<W: Write>(&self, stats: &ProjectStatistics, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["member", "nb_bills", "paid", "spent", "balance"])?;

        // Sort by member id for deterministic output
        let mut rows: Vec<_> = stats.members.iter().collect();
        rows.sort_by_key(|(member_id, _)| **member_id);

        for (member_id, member_stats) in rows {
            csv_writer.write_record([
                member_id.to_string(),
                member_stats.nb_bills.to_string(),
                format!("{:.2}", member_stats.paid),
                format!("{:.2}", member_stats.spent),
                format!("{:.2}", member_stats.balance),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Writes a settlement plan as CSV in plan order.
    pub fn write_settlement<W: Write>(
        &self,
        transactions: &[Transaction],
        writer: W,
    ) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["from", "to", "amount"])?;

        for transaction in transactions {
            csv_writer.write_record([
                transaction.from_member_id.to_string(),
                transaction.to_member_id.to_string(),
                format!("{:.2}", transaction.amount),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

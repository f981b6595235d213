//! # Split Ledger
//!
//! A balance accounting and debt-settlement engine for shared-expense
//! projects: members record bills paid by one of them and owed by a
//! weighted subset, the engine reduces them into per-member balances
//! and produces the transfers that settle everyone back to zero.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: amounts and weights use `rust_decimal`
//! - **Pure computation**: statistics and settlement are synchronous
//!   passes over an in-memory snapshot with no I/O and no shared state
//! - **Deterministic output**: orderings and tie-breaks are fixed by
//!   member id
//!
//! ## Example
//!
//! ```no_run
//! use split_ledger::{Ledger, StatisticsFilter};
//! use std::io::Cursor;
//!
//! let members = "id,name,weight,activated\n1,Alice,1,true\n2,Bob,1,true\n";
//! let bills = "id,what,payer,amount,date,category,paymode,state,owers\n\
//!              1,Groceries,1,30.0,2024-03-01,-1,c,ok,1 2\n";
//! let mut ledger = Ledger::new();
//! ledger.load_members(Cursor::new(members)).unwrap();
//! ledger.load_bills(Cursor::new(bills)).unwrap();
//! let stats = ledger.statistics(&StatisticsFilter::default());
//! let plan = ledger.settlement(None);
//! ```

pub mod bill;
pub mod error;
pub mod ledger;
pub mod member;
pub mod money;
pub mod paymode;
pub mod settlement;
pub mod stats;

pub use bill::{Bill, BillOwer, BillRecord, BillState};
pub use error::{LedgerError, Result};
pub use ledger::Ledger;
pub use member::{Member, MemberRecord};
pub use money::round2;
pub use paymode::PaymentModeRegistry;
pub use settlement::{settle_bills, settle_centered, settle_optimal, Transaction};
pub use stats::{
    compute_statistics, CategoryFilter, MemberStats, PaymentModeFilter, ProjectStatistics,
    StatisticsFilter,
};

//! Split Ledger CLI
//!
//! Loads a project's members and bills from CSV and prints either
//! per-member statistics or a settlement plan.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- members.csv bills.csv stats > stats.csv
//! cargo run -- members.csv bills.csv settle 0 > plan.csv
//! ```
//!
//! The stats command accepts optional category and payment-mode filter
//! ids in the legacy sentinel encoding (`-1000` = any, `-100` = any
//! category except reimbursement). For settle, a center member id of
//! `0` (or no id) selects the optimal mode.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use split_ledger::{
    CategoryFilter, Ledger, LedgerError, PaymentModeFilter, Result, StatisticsFilter,
};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        return Err(LedgerError::MissingArgument);
    }

    let mut ledger = Ledger::new();
    ledger.load_members(BufReader::new(File::open(&args[1])?))?;
    ledger.load_bills(BufReader::new(File::open(&args[2])?))?;

    let stdout = io::stdout();
    let handle = stdout.lock();

    match args.get(3).map(String::as_str).unwrap_or("stats") {
        "stats" => {
            let category = match args.get(4) {
                Some(raw) => CategoryFilter::from_id(parse_id("category-id", raw)?),
                None => CategoryFilter::Any,
            };
            let payment_mode = match args.get(5) {
                Some(raw) => PaymentModeFilter::from_id(parse_id("paymode-id", raw)?),
                None => PaymentModeFilter::Any,
            };
            let filter = StatisticsFilter {
                category,
                payment_mode,
                ..StatisticsFilter::default()
            };
            let stats = ledger.statistics(&filter);
            ledger.write_statistics(&stats, handle)?;
        }
        "settle" => {
            let center = match args.get(4) {
                Some(raw) => {
                    let id: u64 = raw.parse().map_err(|_| LedgerError::InvalidArgument {
                        name: "center-member-id",
                        value: raw.clone(),
                    })?;
                    // 0 is reserved: use optimal mode
                    (id != 0).then_some(id)
                }
                None => None,
            };
            let transactions = ledger.settlement(center);
            ledger.write_settlement(&transactions, handle)?;
        }
        other => {
            return Err(LedgerError::UnknownCommand {
                command: other.to_string(),
            })
        }
    }

    Ok(())
}

fn parse_id(name: &'static str, raw: &str) -> Result<i64> {
    raw.parse().map_err(|_| LedgerError::InvalidArgument {
        name,
        value: raw.to_string(),
    })
}

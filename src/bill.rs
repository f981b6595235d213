//! Bill model and CSV record parsing.

use crate::paymode::{PaymentModeRegistry, PAYMODE_ID_NONE};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// No category assigned.
pub const CATEGORY_NONE: i64 = 0;
/// Built-in category ids shared with Cospend-style servers.
pub const CATEGORY_GROCERIES: i64 = -1;
pub const CATEGORY_LEISURE: i64 = -2;
pub const CATEGORY_RENT: i64 = -3;
pub const CATEGORY_BILLS: i64 = -4;
pub const CATEGORY_CULTURE: i64 = -5;
pub const CATEGORY_HEALTH: i64 = -6;
pub const CATEGORY_SHOPPING: i64 = -10;
/// Reserved for internal balancing bills; excluded from spending
/// statistics under the "all except reimbursement" filter.
pub const CATEGORY_REIMBURSEMENT: i64 = -11;
pub const CATEGORY_RESTAURANT: i64 = -12;
pub const CATEGORY_ACCOMODATION: i64 = -13;
pub const CATEGORY_TRANSPORT: i64 = -14;
pub const CATEGORY_SPORT: i64 = -15;

/// Bill lifecycle state used by host synchronization.
///
/// Only `Deleted` matters to accounting: deleted bills are excluded from
/// every statistic. The other states describe pending sync work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BillState {
    #[default]
    Ok,
    Added,
    Edited,
    Deleted,
}

impl BillState {
    /// Resolves the numeric wire value (0..=3) used by hosts.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(BillState::Ok),
            1 => Some(BillState::Added),
            2 => Some(BillState::Edited),
            3 => Some(BillState::Deleted),
            _ => None,
        }
    }
}

impl FromStr for BillState {
    type Err = ();

    /// Accepts both the state name and its numeric wire value.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ok" | "0" => Ok(BillState::Ok),
            "added" | "1" => Ok(BillState::Added),
            "edited" | "2" => Ok(BillState::Edited),
            "deleted" | "3" => Ok(BillState::Deleted),
            _ => Err(()),
        }
    }
}

/// A member owing a share of a bill.
///
/// The effective share is proportional to the member's current weight,
/// resolved from the member table at computation time, never stored here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillOwer {
    /// Owing member's id.
    pub member_id: u64,
}

/// One recorded shared expense.
#[derive(Debug, Clone)]
pub struct Bill {
    /// Unique bill identifier.
    pub id: u64,

    /// Label describing the expense.
    pub what: String,

    /// Member who paid the bill.
    pub payer_id: u64,

    /// Amount paid. May be negative for refund-style entries.
    pub amount: Decimal,

    /// Zero-padded `YYYY-MM-DD` date; lexicographic order equals
    /// chronological order.
    pub date: String,

    /// Category id, used only for filtering.
    pub category_id: i64,

    /// Payment-mode id, used only for filtering.
    pub payment_mode_id: i64,

    /// Lifecycle state.
    pub state: BillState,

    /// Owing members; order is irrelevant.
    pub owers: Vec<BillOwer>,
}

impl Bill {
    /// Creates a bill in `Ok` state with no category, payment mode or
    /// owers assigned.
    pub fn new(id: u64, what: &str, payer_id: u64, amount: Decimal, date: &str) -> Self {
        Bill {
            id,
            what: what.to_string(),
            payer_id,
            amount,
            date: date.to_string(),
            category_id: CATEGORY_NONE,
            payment_mode_id: PAYMODE_ID_NONE,
            state: BillState::Ok,
            owers: Vec::new(),
        }
    }

    /// Iterates the ids of the owing members.
    pub fn ower_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.owers.iter().map(|ower| ower.member_id)
    }
}

/// Raw bill row as read from CSV.
///
/// `owers` is a space-separated member id list; `paymode` accepts either
/// a numeric id or a legacy one-letter code.
#[derive(Debug, Deserialize)]
pub struct BillRecord {
    /// Bill ID (u64)
    pub id: u64,

    /// Expense label
    pub what: String,

    /// Paying member's id
    pub payer: u64,

    /// Amount paid
    pub amount: String,

    /// Date as zero-padded YYYY-MM-DD
    pub date: String,

    /// Category id (defaults to none)
    pub category: Option<String>,

    /// Payment-mode id or legacy code (defaults to none)
    pub paymode: Option<String>,

    /// Lifecycle state name or numeric value (defaults to ok)
    pub state: Option<String>,

    /// Space-separated owing member ids
    pub owers: Option<String>,
}

impl BillRecord {
    /// Parses the raw CSV record into a [`Bill`].
    ///
    /// Returns `None` if the amount, category, payment mode, state or any
    /// ower id fails to parse. A missing or empty ower list is accepted;
    /// the resulting bill distributes nothing.
    pub fn parse(&self, paymodes: &PaymentModeRegistry) -> Option<Bill> {
        let amount = Decimal::from_str(self.amount.trim()).ok()?;

        let category_id = match self.category.as_deref().map(str::trim) {
            None | Some("") => CATEGORY_NONE,
            Some(raw) => raw.parse().ok()?,
        };

        let payment_mode_id = match self.paymode.as_deref().map(str::trim) {
            None | Some("") => PAYMODE_ID_NONE,
            Some(raw) => Self::parse_paymode(raw, paymodes)?,
        };

        let state = match self.state.as_deref().map(str::trim) {
            None | Some("") => BillState::Ok,
            Some(raw) => raw.parse().ok()?,
        };

        let owers = match self.owers.as_deref().map(str::trim) {
            None | Some("") => Vec::new(),
            Some(raw) => raw
                .split_whitespace()
                .map(|token| token.parse().ok().map(|member_id| BillOwer { member_id }))
                .collect::<Option<Vec<_>>>()?,
        };

        Some(Bill {
            id: self.id,
            what: self.what.trim().to_string(),
            payer_id: self.payer,
            amount,
            date: self.date.trim().to_string(),
            category_id,
            payment_mode_id,
            state,
            owers,
        })
    }

    /// Parses a payment-mode field as a numeric id, falling back to the
    /// legacy one-letter code table.
    fn parse_paymode(raw: &str, paymodes: &PaymentModeRegistry) -> Option<i64> {
        if let Ok(id) = raw.parse() {
            return Some(id);
        }
        let mut chars = raw.chars();
        let code = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        paymodes.id_for_code(code)
    }
}

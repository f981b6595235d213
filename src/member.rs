//! Project member model and CSV record parsing.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// A member of a shared-expense project.
///
/// Identity is immutable; `weight` and `activated` may change over the
/// project's life. Deactivated members stay in the member table so that
/// historical bills keep resolving their weight.
#[derive(Debug, Clone)]
pub struct Member {
    /// Unique member identifier.
    pub id: u64,

    /// Display name.
    pub name: String,

    /// Relative share multiplier applied when splitting a bill.
    pub weight: Decimal,

    /// Whether the member may participate in new bills. Accounting
    /// ignores this flag: deactivated members keep their history.
    pub activated: bool,
}

impl Member {
    /// Creates an activated member with the given weight.
    pub fn new(id: u64, name: &str, weight: Decimal) -> Self {
        Member {
            id,
            name: name.to_string(),
            weight,
            activated: true,
        }
    }

    /// Creates an activated member with the default weight of 1.
    pub fn with_default_weight(id: u64, name: &str) -> Self {
        Member::new(id, name, Decimal::ONE)
    }
}

/// Raw member row as read from CSV.
///
/// `weight` and `activated` are optional columns defaulting to 1 and true.
#[derive(Debug, Deserialize)]
pub struct MemberRecord {
    /// Member ID (u64)
    pub id: u64,

    /// Display name
    pub name: String,

    /// Relative share weight (positive; defaults to 1)
    pub weight: Option<String>,

    /// Activation flag (defaults to true)
    pub activated: Option<String>,
}

impl MemberRecord {
    /// Parses the raw CSV record into a [`Member`].
    ///
    /// Returns `None` if the weight is not a positive number or the
    /// activated flag is unrecognized.
    pub fn parse(&self) -> Option<Member> {
        let weight = match self.weight.as_deref().map(str::trim) {
            None | Some("") => Decimal::ONE,
            Some(raw) => Decimal::from_str(raw).ok()?,
        };
        if weight <= Decimal::ZERO {
            return None;
        }

        let activated = match self.activated.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(raw) => parse_flag(raw)?,
        };

        Some(Member {
            id: self.id,
            name: self.name.trim().to_string(),
            weight,
            activated,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

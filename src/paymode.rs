//! Payment-mode identifier registry.
//!
//! Bills carry a numeric payment-mode id; older hosts speak one-letter
//! codes instead. The mapping between the two is configuration supplied
//! when the registry is built, never mutable global state.

use std::collections::HashMap;

/// No payment mode recorded.
pub const PAYMODE_ID_NONE: i64 = 0;
/// Credit/debit card.
pub const PAYMODE_ID_CARD: i64 = -1;
/// Cash.
pub const PAYMODE_ID_CASH: i64 = -2;
/// Check.
pub const PAYMODE_ID_CHECK: i64 = -3;
/// Bank transfer.
pub const PAYMODE_ID_TRANSFER: i64 = -4;
/// Online payment service.
pub const PAYMODE_ID_ONLINE_SERVICE: i64 = -5;

/// Bidirectional map between legacy one-letter payment-mode codes and
/// numeric ids.
///
/// Built-in pairs cover the reserved negative ids; projects may register
/// additional pairs for their own positive ids.
#[derive(Debug, Clone)]
pub struct PaymentModeRegistry {
    code_to_id: HashMap<char, i64>,
    id_to_code: HashMap<i64, char>,
}

impl PaymentModeRegistry {
    /// Builds a registry holding the built-in modes.
    pub fn new() -> Self {
        let mut registry = PaymentModeRegistry {
            code_to_id: HashMap::new(),
            id_to_code: HashMap::new(),
        };
        for (code, id) in [
            ('n', PAYMODE_ID_NONE),
            ('c', PAYMODE_ID_CARD),
            ('b', PAYMODE_ID_CASH),
            ('f', PAYMODE_ID_CHECK),
            ('t', PAYMODE_ID_TRANSFER),
            ('o', PAYMODE_ID_ONLINE_SERVICE),
        ] {
            registry.insert(code, id);
        }
        registry
    }

    /// Registers a code/id pair, replacing any mapping either side had.
    pub fn insert(&mut self, code: char, id: i64) {
        if let Some(old_id) = self.code_to_id.insert(code, id) {
            if old_id != id {
                self.id_to_code.remove(&old_id);
            }
        }
        if let Some(old_code) = self.id_to_code.insert(id, code) {
            if old_code != code {
                self.code_to_id.remove(&old_code);
            }
        }
    }

    /// Resolves a legacy one-letter code to its numeric id.
    pub fn id_for_code(&self, code: char) -> Option<i64> {
        self.code_to_id.get(&code).copied()
    }

    /// Resolves a numeric id back to its legacy one-letter code.
    pub fn code_for_id(&self, id: i64) -> Option<char> {
        self.id_to_code.get(&id).copied()
    }
}

impl Default for PaymentModeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

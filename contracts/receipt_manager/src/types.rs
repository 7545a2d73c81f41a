//! # Types
//!
//! Shared data structures used across the receipt manager.
//!
//! ## Receipt lifecycle
//!
//! A [`Receipt`] carries two one-way settlement flags. Their combination is
//! exposed as [`ReceiptStatus`]:
//!
//! ```text
//! Issued ──► Refunded   (buyer, inside the return window)
//!    └─────► Released   (seller, after the return window)
//! ```
//!
//! Both `Refunded` and `Released` are terminal. No transition leads back to
//! `Issued`, and the flags are never both set.

use soroban_sdk::{contracttype, Address};

/// Settlement state of a receipt, derived from its flags.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReceiptStatus {
    /// Funds are held in custody.
    Issued,
    /// Buyer reclaimed the purchase amount.
    Refunded,
    /// Seller withdrew the purchase amount.
    Released,
}

/// One purchase held in custody for a buyer.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Receipt {
    /// Amount taken into custody, in token base units. Always positive.
    pub purchase_amount: i128,
    /// Ledger timestamp at issuance.
    pub purchase_time: u64,
    /// Set once the buyer has been refunded.
    pub refund_issued: bool,
    /// Set once the seller has been paid out.
    pub funds_released: bool,
}

impl Receipt {
    pub fn new(purchase_amount: i128, purchase_time: u64) -> Self {
        Self {
            purchase_amount,
            purchase_time,
            refund_issued: false,
            funds_released: false,
        }
    }

    /// True once the funds have left custody in either direction.
    pub fn is_settled(&self) -> bool {
        self.refund_issued || self.funds_released
    }

    pub fn status(&self) -> ReceiptStatus {
        if self.refund_issued {
            ReceiptStatus::Refunded
        } else if self.funds_released {
            ReceiptStatus::Released
        } else {
            ReceiptStatus::Issued
        }
    }
}

/// Ledger configuration, written once by `init`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerConfig {
    /// The only address allowed to issue receipts and collect released funds.
    pub seller: Address,
    /// SAC token held in custody.
    pub token: Address,
    /// Return window in seconds.
    pub return_window: u64,
}

//! # Events
//!
//! Every settlement-relevant change is published as a contract event with the
//! buyer as the second topic, so indexers can follow one buyer's history.
//!
//! | Topic        | Data            |
//! |--------------|-----------------|
//! | `"issued"`   | `ReceiptIssued` |
//! | `"refunded"` | `RefundIssued`  |
//! | `"released"` | `FundsReleased` |

use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReceiptIssued {
    pub buyer: Address,
    pub purchase_amount: i128,
    pub receipt_index: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RefundIssued {
    pub buyer: Address,
    pub refund_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsReleased {
    pub buyer: Address,
    pub receipt_index: u32,
    pub released_amount: i128,
}

pub fn emit_receipt_issued(env: &Env, buyer: Address, purchase_amount: i128, receipt_index: u32) {
    let topics = (symbol_short!("issued"), buyer.clone());
    let data = ReceiptIssued {
        buyer,
        purchase_amount,
        receipt_index,
    };
    env.events().publish(topics, data);
}

pub fn emit_refund_issued(env: &Env, buyer: Address, refund_amount: i128) {
    let topics = (symbol_short!("refunded"), buyer.clone());
    let data = RefundIssued {
        buyer,
        refund_amount,
    };
    env.events().publish(topics, data);
}

pub fn emit_funds_released(env: &Env, buyer: Address, receipt_index: u32, released_amount: i128) {
    let topics = (symbol_short!("released"), buyer.clone());
    let data = FundsReleased {
        buyer,
        receipt_index,
        released_amount,
    };
    env.events().publish(topics, data);
}

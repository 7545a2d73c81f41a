#![allow(dead_code)]

extern crate std;

use soroban_sdk::{token, Address, Env};

use crate::types::{Receipt, ReceiptStatus};
use crate::{ReceiptManagerClient, MAX_PAGE_SIZE};

/// INV-1: Every receipt holds a strictly positive amount.
pub fn assert_amount_positive(receipt: &Receipt) {
    assert!(
        receipt.purchase_amount > 0,
        "INV-1 violated: receipt holds non-positive amount ({})",
        receipt.purchase_amount
    );
}

/// INV-2: Refund and release flags are mutually exclusive.
pub fn assert_flags_exclusive(receipt: &Receipt) {
    assert!(
        !(receipt.refund_issued && receipt.funds_released),
        "INV-2 violated: receipt is both refunded and released"
    );
}

/// INV-3: Settlement flags are one-way and the purchase data never changes.
pub fn assert_receipt_progression(before: &Receipt, after: &Receipt) {
    assert_eq!(
        before.purchase_amount, after.purchase_amount,
        "INV-3 violated: purchase_amount changed"
    );
    assert_eq!(
        before.purchase_time, after.purchase_time,
        "INV-3 violated: purchase_time changed"
    );
    assert!(
        !before.refund_issued || after.refund_issued,
        "INV-3 violated: refund_issued was reset"
    );
    assert!(
        !before.funds_released || after.funds_released,
        "INV-3 violated: funds_released was reset"
    );
}

/// INV-4: Only `Issued -> Refunded` and `Issued -> Released` are legal moves.
pub fn assert_valid_status_transition(from: &ReceiptStatus, to: &ReceiptStatus) {
    let valid = from == to
        || matches!(
            (from, to),
            (ReceiptStatus::Issued, ReceiptStatus::Refunded)
                | (ReceiptStatus::Issued, ReceiptStatus::Released)
        );

    assert!(
        valid,
        "INV-4 violated: invalid status transition from {:?} to {:?}",
        from, to
    );
}

/// Run all stateless receipt invariants.
pub fn assert_all_receipt_invariants(receipt: &Receipt) {
    assert_amount_positive(receipt);
    assert_flags_exclusive(receipt);
}

/// Every buyer, read page by page.
pub fn all_buyers(client: &ReceiptManagerClient) -> std::vec::Vec<Address> {
    let mut buyers = std::vec::Vec::new();
    let mut start = 0u32;
    loop {
        let page = client.get_buyers(&start, &MAX_PAGE_SIZE);
        if page.is_empty() {
            return buyers;
        }
        start += page.len();
        buyers.extend(page.iter());
    }
}

/// Every receipt of `buyer`, read page by page.
pub fn all_receipts(client: &ReceiptManagerClient, buyer: &Address) -> std::vec::Vec<Receipt> {
    let mut receipts = std::vec::Vec::new();
    let mut start = 0u32;
    loop {
        let page = client.get_receipts(buyer, &start, &MAX_PAGE_SIZE);
        if page.is_empty() {
            return receipts;
        }
        start += page.len();
        receipts.extend(page.iter());
    }
}

/// Sum of `purchase_amount` over unsettled receipts, computed from scratch.
pub fn unsettled_total(client: &ReceiptManagerClient) -> i128 {
    let mut total = 0i128;
    for buyer in all_buyers(client) {
        let mut held = 0i128;
        for receipt in all_receipts(client, &buyer) {
            assert_all_receipt_invariants(&receipt);
            if !receipt.is_settled() {
                held += receipt.purchase_amount;
            }
        }
        assert_eq!(
            client.held_balance_of(&buyer),
            held,
            "INV-5 violated: held_balance_of disagrees with the buyer's receipts"
        );
        total += held;
    }
    total
}

/// Sum of every `held_balance` page.
pub fn total_held(client: &ReceiptManagerClient) -> i128 {
    let count = client.buyer_count();
    let mut total = 0i128;
    let mut start = 0u32;
    while start < count {
        total += client.held_balance(&start, &MAX_PAGE_SIZE);
        start += MAX_PAGE_SIZE;
    }
    total
}

/// INV-5: The contract's token balance equals the unsettled total, and the
/// ledger's own `held_balance` pages agree with both.
pub fn assert_custody_conserved(env: &Env, client: &ReceiptManagerClient, token: &Address) {
    let expected = unsettled_total(client);
    let actual = token::Client::new(env, token).balance(&client.address);
    assert_eq!(
        actual, expected,
        "INV-5 violated: custody balance {} != unsettled total {}",
        actual, expected
    );
    assert_eq!(
        total_held(client),
        expected,
        "INV-5 violated: held_balance disagrees with receipts"
    );
}

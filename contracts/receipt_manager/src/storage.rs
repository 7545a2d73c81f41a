//! # Storage
//!
//! Typed helpers over the two Soroban storage tiers used by the receipt manager.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key          | Type           | Description                          |
//! |--------------|----------------|--------------------------------------|
//! | `Config`     | `LedgerConfig` | Seller, custody token, return window |
//! | `BuyerCount` | `u32`          | Number of registered buyers          |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                     | Type           | Description                         |
//! |-------------------------|----------------|-------------------------------------|
//! | `Buyer(index)`          | `Address`      | Buyers in order of first issuance   |
//! | `ReceiptCount(buyer)`   | `u32`          | Length of the buyer's receipt list  |
//! | `Receipt(buyer, index)` | `Receipt`      | One receipt                         |
//! | `Held(buyer)`           | `i128`         | Sum of the buyer's unsettled amounts |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! Receipts are append-only: an index, once handed out, always addresses the
//! same receipt and entries are never removed. Only the settlement flags of an
//! existing entry are ever rewritten.
//!
//! Every entry has a fixed size, so no write grows with the number of buyers or
//! receipts. List reads are paginated and capped at [`MAX_PAGE_SIZE`].

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::types::{LedgerConfig, Receipt};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

/// Largest page returned by a single list query.
pub const MAX_PAGE_SIZE: u32 = 100;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Ledger configuration (Instance).
    Config,
    /// Number of registered buyers (Instance).
    BuyerCount,
    /// Buyer at a registration index (Persistent).
    Buyer(u32),
    /// Number of receipts issued to a buyer (Persistent).
    ReceiptCount(Address),
    /// A single receipt keyed by buyer and index (Persistent).
    Receipt(Address, u32),
    /// Unsettled amount held for a buyer (Persistent).
    Held(Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn save_config(env: &Env, config: &LedgerConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

pub fn load_config(env: &Env) -> Result<LedgerConfig, Error> {
    let config = env
        .storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)?;
    bump_instance(env);
    Ok(config)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

// ─────────────────────────────────────────────────────────
// Buyer registry
// ─────────────────────────────────────────────────────────

pub fn buyer_count(env: &Env) -> u32 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::BuyerCount)
        .unwrap_or(0)
}

fn register_buyer(env: &Env, buyer: &Address) {
    let index = buyer_count(env);
    let key = DataKey::Buyer(index);
    env.storage().persistent().set(&key, buyer);
    bump_persistent(env, &key);
    env.storage()
        .instance()
        .set(&DataKey::BuyerCount, &(index + 1));
}

pub fn load_buyer(env: &Env, index: u32) -> Result<Address, Error> {
    let key = DataKey::Buyer(index);
    let buyer = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::NotFound)?;
    bump_persistent(env, &key);
    Ok(buyer)
}

/// Buyers `start..start + limit` in registration order.
pub fn load_buyers(env: &Env, start: u32, limit: u32) -> Result<Vec<Address>, Error> {
    let end = page_end(start, limit, buyer_count(env))?;
    let mut buyers = Vec::new(env);
    for index in start..end {
        buyers.push_back(load_buyer(env, index)?);
    }
    Ok(buyers)
}

/// Exclusive end of the page `start..start + limit` within `len` items.
/// A page starting past the end is empty.
fn page_end(start: u32, limit: u32, len: u32) -> Result<u32, Error> {
    if limit == 0 || limit > MAX_PAGE_SIZE {
        return Err(Error::InvalidPageSize);
    }
    Ok(start.saturating_add(limit).min(len).max(start))
}

// ─────────────────────────────────────────────────────────
// Receipts
// ─────────────────────────────────────────────────────────

/// Number of receipts ever issued to `buyer`.
pub fn receipt_count(env: &Env, buyer: &Address) -> u32 {
    let key = DataKey::ReceiptCount(buyer.clone());
    match env.storage().persistent().get(&key) {
        Some(count) => {
            bump_persistent(env, &key);
            count
        }
        None => 0,
    }
}

/// Append `receipt` to the buyer's list and return its index.
///
/// The first receipt for a buyer also registers them in the buyer list.
pub fn append_receipt(env: &Env, buyer: &Address, receipt: &Receipt) -> u32 {
    let index = receipt_count(env, buyer);
    if index == 0 {
        register_buyer(env, buyer);
    }

    let receipt_key = DataKey::Receipt(buyer.clone(), index);
    env.storage().persistent().set(&receipt_key, receipt);
    bump_persistent(env, &receipt_key);

    let count_key = DataKey::ReceiptCount(buyer.clone());
    env.storage().persistent().set(&count_key, &(index + 1));
    bump_persistent(env, &count_key);

    index
}

pub fn load_receipt(env: &Env, buyer: &Address, index: u32) -> Result<Receipt, Error> {
    let key = DataKey::Receipt(buyer.clone(), index);
    let receipt = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::NotFound)?;
    bump_persistent(env, &key);
    Ok(receipt)
}

/// Overwrite an existing receipt (settlement flag updates only).
pub fn save_receipt(env: &Env, buyer: &Address, index: u32, receipt: &Receipt) {
    let key = DataKey::Receipt(buyer.clone(), index);
    env.storage().persistent().set(&key, receipt);
    bump_persistent(env, &key);
}

/// Receipts `start..start + limit` of `buyer` in issuance order.
pub fn load_receipts(
    env: &Env,
    buyer: &Address,
    start: u32,
    limit: u32,
) -> Result<Vec<Receipt>, Error> {
    let end = page_end(start, limit, receipt_count(env, buyer))?;
    let mut receipts = Vec::new(env);
    for index in start..end {
        receipts.push_back(load_receipt(env, buyer, index)?);
    }
    Ok(receipts)
}

// ─────────────────────────────────────────────────────────
// Held amounts
// ─────────────────────────────────────────────────────────

/// Sum of `buyer`'s unsettled receipts.
pub fn held_of(env: &Env, buyer: &Address) -> i128 {
    let key = DataKey::Held(buyer.clone());
    match env.storage().persistent().get(&key) {
        Some(held) => {
            bump_persistent(env, &key);
            held
        }
        None => 0,
    }
}

/// Add `delta` (negative on settlement) to `buyer`'s held amount.
pub fn adjust_held(env: &Env, buyer: &Address, delta: i128) -> Result<i128, Error> {
    let held = held_of(env, buyer)
        .checked_add(delta)
        .ok_or(Error::Overflow)?;
    let key = DataKey::Held(buyer.clone());
    env.storage().persistent().set(&key, &held);
    bump_persistent(env, &key);
    Ok(held)
}

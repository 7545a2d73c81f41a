//! # Receipt Manager Contract
//!
//! An escrow ledger for retail purchases. The seller takes a buyer's payment
//! into custody and receives a receipt index in return. For a fixed return
//! window the buyer may reclaim the full amount. Once the window has passed
//! the seller may collect it.
//!
//! | Phase      | Entry Point(s)                                          |
//! |------------|---------------------------------------------------------|
//! | Bootstrap  | [`ReceiptManager::init`]                                |
//! | Purchase   | [`ReceiptManager::issue_receipt`]                       |
//! | Return     | [`ReceiptManager::request_return`]                      |
//! | Settlement | [`ReceiptManager::release_funds`]                       |
//! | Queries    | `get_receipt`, `get_receipts`, `receipt_count`, `get_buyers`, `buyer_count`, `receipt_status`, `refund_deadline`, `held_balance`, `held_balance_of`, `get_config`, `role_of` |
//!
//! List queries are paginated: they take `start` and `limit` and return at most
//! `MAX_PAGE_SIZE` items per call.
//!
//! ## Settlement safety
//!
//! Every receipt is settled at most once. The settlement flag is persisted
//! **before** funds leave the contract, and a rejected payout returns
//! [`Error::TransferFailed`], which makes the host discard the flag together
//! with everything else the call wrote.
//!
//! Authorization lives in [`access`], storage in [`storage`] and window
//! arithmetic in [`window`].

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, log, token, Address, Env, Vec};

pub mod access;
pub mod events;
mod storage;
mod types;
pub mod window;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;

pub use access::Role;
pub use storage::MAX_PAGE_SIZE;
pub use types::{LedgerConfig, Receipt, ReceiptStatus};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Caller does not hold the role the operation requires.
    Unauthorized = 1,
    /// Purchase amount is zero or negative.
    InvalidAmount = 2,
    /// No receipt at this buyer/index.
    NotFound = 3,
    /// Receipt has already been refunded or released.
    AlreadySettled = 4,
    /// Return window has closed.
    WindowClosed = 5,
    /// Return window is still open; funds cannot be released yet.
    WindowOpen = 6,
    /// The token contract rejected the payout.
    TransferFailed = 7,
    AlreadyInitialized = 8,
    NotInitialized = 9,
    /// Return window must be between 1 and `MAX_RETURN_WINDOW_DAYS` days.
    InvalidReturnWindow = 10,
    Overflow = 11,
    /// Page `limit` must be between 1 and `MAX_PAGE_SIZE`.
    InvalidPageSize = 12,
}

#[contract]
pub struct ReceiptManager;

#[contractimpl]
impl ReceiptManager {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Bind the seller, the custody token and the return window.
    ///
    /// Must be called exactly once immediately after deployment. The
    /// configuration cannot be changed afterwards.
    ///
    /// - `seller` must sign the transaction.
    /// - `return_window_days` must be in `1..=MAX_RETURN_WINDOW_DAYS`.
    pub fn init(
        env: Env,
        seller: Address,
        token: Address,
        return_window_days: u32,
    ) -> Result<(), Error> {
        seller.require_auth();

        if storage::has_config(&env) {
            return Err(Error::AlreadyInitialized);
        }
        if return_window_days == 0 || return_window_days > window::MAX_RETURN_WINDOW_DAYS {
            return Err(Error::InvalidReturnWindow);
        }

        let config = LedgerConfig {
            seller,
            token,
            return_window: window::days_to_seconds(return_window_days),
        };
        storage::save_config(&env, &config);

        log!(&env, "ledger initialised", config.seller, return_window_days);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Receipt lifecycle
    // ─────────────────────────────────────────────────────────

    /// Take `purchase_amount` from the seller into custody on behalf of
    /// `buyer` and return the new receipt's index.
    ///
    /// Indices are per buyer, start at 0 and are never reused.
    pub fn issue_receipt(
        env: Env,
        caller: Address,
        buyer: Address,
        purchase_amount: i128,
    ) -> Result<u32, Error> {
        let config = storage::load_config(&env)?;
        access::require_seller(&config, &caller)?;

        if purchase_amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let token_client = token::Client::new(&env, &config.token);
        token_client.transfer(&caller, &env.current_contract_address(), &purchase_amount);

        let receipt = Receipt::new(purchase_amount, window::now(&env));
        let index = storage::append_receipt(&env, &buyer, &receipt);
        storage::adjust_held(&env, &buyer, purchase_amount)?;

        log!(&env, "receipt issued", buyer, index, purchase_amount);
        events::emit_receipt_issued(&env, buyer, purchase_amount, index);

        Ok(index)
    }

    pub fn get_receipt(env: Env, buyer: Address, index: u32) -> Result<Receipt, Error> {
        storage::load_receipt(&env, &buyer, index)
    }

    /// Refund receipt `index` of `buyer` in full.
    ///
    /// `buyer` must sign. Checks run in this order: the receipt exists, it is
    /// unsettled, and the return window is still open.
    pub fn request_return(env: Env, buyer: Address, index: u32) -> Result<i128, Error> {
        let config = storage::load_config(&env)?;
        buyer.require_auth();

        let mut receipt = storage::load_receipt(&env, &buyer, index)?;
        if receipt.is_settled() {
            return Err(Error::AlreadySettled);
        }
        if !window::is_open(window::now(&env), receipt.purchase_time, config.return_window) {
            log!(&env, "Return window has closed", buyer, index);
            return Err(Error::WindowClosed);
        }

        // Flag first, then pay out.
        receipt.refund_issued = true;
        storage::save_receipt(&env, &buyer, index, &receipt);
        storage::adjust_held(&env, &buyer, -receipt.purchase_amount)?;
        Self::pay_out(&env, &config, &buyer, receipt.purchase_amount)?;

        log!(&env, "refund issued", buyer, index, receipt.purchase_amount);
        events::emit_refund_issued(&env, buyer, receipt.purchase_amount);

        Ok(receipt.purchase_amount)
    }

    /// Pay receipt `index` of `buyer` out to the seller once its return window
    /// has passed.
    pub fn release_funds(
        env: Env,
        caller: Address,
        buyer: Address,
        index: u32,
    ) -> Result<i128, Error> {
        let config = storage::load_config(&env)?;
        access::require_seller(&config, &caller)?;

        let mut receipt = storage::load_receipt(&env, &buyer, index)?;
        if receipt.is_settled() {
            return Err(Error::AlreadySettled);
        }
        if !window::has_elapsed(window::now(&env), receipt.purchase_time, config.return_window) {
            return Err(Error::WindowOpen);
        }

        receipt.funds_released = true;
        storage::save_receipt(&env, &buyer, index, &receipt);
        storage::adjust_held(&env, &buyer, -receipt.purchase_amount)?;
        Self::pay_out(&env, &config, &config.seller, receipt.purchase_amount)?;

        log!(&env, "funds released", buyer, index, receipt.purchase_amount);
        events::emit_funds_released(&env, buyer, index, receipt.purchase_amount);

        Ok(receipt.purchase_amount)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn get_config(env: Env) -> Result<LedgerConfig, Error> {
        storage::load_config(&env)
    }

    pub fn seller(env: Env) -> Result<Address, Error> {
        Ok(storage::load_config(&env)?.seller)
    }

    /// Return window in seconds.
    pub fn return_window(env: Env) -> Result<u64, Error> {
        Ok(storage::load_config(&env)?.return_window)
    }

    pub fn receipt_count(env: Env, buyer: Address) -> u32 {
        storage::receipt_count(&env, &buyer)
    }

    /// Receipts `start..start + limit` of `buyer` in index order.
    ///
    /// A page past the end is empty. `InvalidPageSize` unless
    /// `1 <= limit <= MAX_PAGE_SIZE`.
    pub fn get_receipts(
        env: Env,
        buyer: Address,
        start: u32,
        limit: u32,
    ) -> Result<Vec<Receipt>, Error> {
        storage::load_receipts(&env, &buyer, start, limit)
    }

    /// Buyers `start..start + limit` in order of first purchase.
    pub fn get_buyers(env: Env, start: u32, limit: u32) -> Result<Vec<Address>, Error> {
        storage::load_buyers(&env, start, limit)
    }

    pub fn buyer_count(env: Env) -> u32 {
        storage::buyer_count(&env)
    }

    pub fn receipt_status(env: Env, buyer: Address, index: u32) -> Result<ReceiptStatus, Error> {
        Ok(storage::load_receipt(&env, &buyer, index)?.status())
    }

    /// Last ledger timestamp at which `request_return` can succeed.
    pub fn refund_deadline(env: Env, buyer: Address, index: u32) -> Result<u64, Error> {
        let config = storage::load_config(&env)?;
        let receipt = storage::load_receipt(&env, &buyer, index)?;
        Ok(window::refund_deadline(receipt.purchase_time, config.return_window))
    }

    /// Amount in custody for the buyers `start..start + limit`.
    ///
    /// Summing the pages `0, MAX_PAGE_SIZE, 2 * MAX_PAGE_SIZE, ..` up to
    /// `buyer_count` gives the total custody balance.
    pub fn held_balance(env: Env, start: u32, limit: u32) -> Result<i128, Error> {
        let mut total: i128 = 0;
        for buyer in storage::load_buyers(&env, start, limit)?.iter() {
            total = total
                .checked_add(storage::held_of(&env, &buyer))
                .ok_or(Error::Overflow)?;
        }
        Ok(total)
    }

    /// Sum of `buyer`'s unsettled receipts.
    pub fn held_balance_of(env: Env, buyer: Address) -> i128 {
        storage::held_of(&env, &buyer)
    }

    pub fn role_of(env: Env, address: Address) -> Result<Option<Role>, Error> {
        let config = storage::load_config(&env)?;
        Ok(access::role_of(&env, &config, &address))
    }

    // ─────────────────────────────────────────────────────────
    // Internal Helpers
    // ─────────────────────────────────────────────────────────

    /// Move `amount` out of custody to `to`.
    fn pay_out(env: &Env, config: &LedgerConfig, to: &Address, amount: i128) -> Result<(), Error> {
        let token_client = token::Client::new(env, &config.token);
        match token_client.try_transfer(&env.current_contract_address(), to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(Error::TransferFailed),
        }
    }
}

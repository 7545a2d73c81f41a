//! # Access control
//!
//! The ledger knows two roles:
//!
//! ```text
//! Seller ── issues receipts, collects funds after the return window
//! Buyer  ── reclaims funds of its own receipts inside the return window
//! ```
//!
//! The seller is fixed by `init`. A buyer is any address holding at least one
//! receipt. An address that is both (a seller issuing to itself) is reported
//! as `Seller`.
//!
//! Identity is checked before `require_auth` so that a caller naming the wrong
//! address is rejected with `Error::Unauthorized` rather than an auth trap.
//!
//! Buyer operations need no guard here: `request_return` calls
//! `buyer.require_auth()` and only ever reads `buyer`'s own receipt list.

use soroban_sdk::{contracttype, Address, Env};

use crate::storage;
use crate::types::LedgerConfig;
use crate::Error;

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    Seller,
    Buyer,
}

/// Assert that `caller` is the configured seller and has signed.
pub fn require_seller(config: &LedgerConfig, caller: &Address) -> Result<(), Error> {
    if caller != &config.seller {
        return Err(Error::Unauthorized);
    }
    caller.require_auth();
    Ok(())
}

/// Role held by `address`, or `None` for a stranger.
pub fn role_of(env: &Env, config: &LedgerConfig, address: &Address) -> Option<Role> {
    if address == &config.seller {
        Some(Role::Seller)
    } else if storage::receipt_count(env, address) > 0 {
        Some(Role::Buyer)
    } else {
        None
    }
}

//! Return-window arithmetic.
//!
//! All times are ledger timestamps in seconds. The window is inclusive at its
//! end: a refund is still accepted when exactly `return_window` seconds have
//! elapsed, and release becomes possible one second later. The two predicates
//! are exact complements, so every instant belongs to exactly one of them.

use soroban_sdk::Env;

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Upper bound on the configurable window (~10 years).
pub const MAX_RETURN_WINDOW_DAYS: u32 = 3_650;

/// Convert a window length in days to seconds.
pub fn days_to_seconds(days: u32) -> u64 {
    days as u64 * SECONDS_PER_DAY
}

/// Current ledger time.
pub fn now(env: &Env) -> u64 {
    env.ledger().timestamp()
}

/// Seconds since `purchase_time`, clamped at zero.
pub fn elapsed(now: u64, purchase_time: u64) -> u64 {
    now.saturating_sub(purchase_time)
}

/// True while the buyer may still request a refund.
pub fn is_open(now: u64, purchase_time: u64, return_window: u64) -> bool {
    elapsed(now, purchase_time) <= return_window
}

/// True once the funds may be released to the seller.
pub fn has_elapsed(now: u64, purchase_time: u64, return_window: u64) -> bool {
    !is_open(now, purchase_time, return_window)
}

/// Last timestamp at which a refund is accepted.
pub fn refund_deadline(purchase_time: u64, return_window: u64) -> u64 {
    purchase_time.saturating_add(return_window)
}
